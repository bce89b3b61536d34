//! Binary codec of script trees.
//!
//! A serialized script is a header, the body and a 4-byte checksum. The
//! header is either the legacy single library version byte of old expression
//! scripts, or `[0, content type | V2 flag, library version]`. dApps carry a
//! meta block, then counted declarations, callables and verifier. Two
//! integer encodings exist: big-endian fixed width (V1) and LEB128 varints
//! with zig-zag longs (V2).

mod reader;
mod writer;

use alloc::string::String;
use core::fmt;
use ride_core::secure_hash;

pub use self::reader::deserialize;
pub use self::writer::serialize;

pub(crate) const TOKEN_LONG: u8 = 0;
pub(crate) const TOKEN_BYTES: u8 = 1;
pub(crate) const TOKEN_STRING: u8 = 2;
pub(crate) const TOKEN_IF: u8 = 3;
pub(crate) const TOKEN_BLOCK_V1: u8 = 4;
pub(crate) const TOKEN_REF: u8 = 5;
pub(crate) const TOKEN_TRUE: u8 = 6;
pub(crate) const TOKEN_FALSE: u8 = 7;
pub(crate) const TOKEN_GETTER: u8 = 8;
pub(crate) const TOKEN_FUNCTION_CALL: u8 = 9;
pub(crate) const TOKEN_BLOCK_V2: u8 = 10;

pub(crate) const DECLARATION_LET: u8 = 0;
pub(crate) const DECLARATION_FUNCTION: u8 = 1;

pub(crate) const FUNCTION_NATIVE: u8 = 0;
pub(crate) const FUNCTION_USER: u8 = 1;

pub(crate) const CONTENT_EXPRESSION: u8 = 1;
pub(crate) const CONTENT_DAPP: u8 = 2;
pub(crate) const V2_FLAG: u8 = 0x80;

/// Version of the only meta block format.
pub(crate) const META_VERSION: u32 = 0;

pub(crate) const CHECKSUM_LENGTH: usize = 4;

/// Deepest node nesting accepted from the wire.
pub const MAX_NESTING: usize = 512;

/// Wire format of a serialized tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
	/// Fixed-width big-endian integers.
	V1,
	/// Varint integers.
	V2,
}

pub(crate) fn checksum(body: &[u8]) -> [u8; CHECKSUM_LENGTH] {
	let mut out = [0_u8; CHECKSUM_LENGTH];
	out.copy_from_slice(&secure_hash(body).as_bytes()[..CHECKSUM_LENGTH]);
	out
}

/// Failure to serialize a malformed tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
	/// Top-level declaration other than a let or a function.
	UnexpectedDeclaration,
	/// Verifier of a dApp that is not a function declaration.
	InvalidVerifier,
	/// Expression script without an expression.
	MissingExpression,
	/// Let or function inside an expression without a continuation.
	MissingBlock(String),
	/// Length that does not fit the wire counters.
	TooLong(usize),
	UnsupportedVersion(u8),
}

impl fmt::Display for EncodeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UnexpectedDeclaration => write!(f, "unexpected top-level declaration"),
			Self::InvalidVerifier => write!(f, "verifier of a dApp must be a function declaration"),
			Self::MissingExpression => write!(f, "expression script without expression"),
			Self::MissingBlock(name) => write!(f, "declaration '{}' has no block", name),
			Self::TooLong(len) => write!(f, "length {} does not fit the wire format", len),
			Self::UnsupportedVersion(v) => write!(f, "unsupported library version {}", v),
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// Failure to decode script bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
	/// Input ended before a value was complete.
	UnexpectedEnd { needed: usize, available: usize },
	InvalidChecksum,
	UnsupportedVersion(u8),
	InvalidContentType(u8),
	UnknownToken(u8),
	UnknownDeclaration(u8),
	UnknownFunctionType(u8),
	UnsupportedMetaVersion(u32),
	InvalidMeta(String),
	InvalidUtf8,
	/// Varint longer than its target type.
	VarintOverflow,
	NestingTooDeep,
	/// More than one verifier.
	InvalidVerifierCount(u32),
	/// Top-level declaration of an unexpected kind.
	InvalidDeclaration,
	TrailingBytes(usize),
}

impl fmt::Display for DecodeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UnexpectedEnd { needed, available } => write!(
				f, "unexpected end of script: {} bytes needed, {} available", needed, available
			),
			Self::InvalidChecksum => write!(f, "invalid script checksum"),
			Self::UnsupportedVersion(v) => write!(f, "unsupported library version {}", v),
			Self::InvalidContentType(t) => write!(f, "invalid content type {}", t),
			Self::UnknownToken(t) => write!(f, "unknown node token {}", t),
			Self::UnknownDeclaration(t) => write!(f, "unknown declaration type {}", t),
			Self::UnknownFunctionType(t) => write!(f, "unknown function type {}", t),
			Self::UnsupportedMetaVersion(v) => write!(f, "unsupported meta version {}", v),
			Self::InvalidMeta(e) => write!(f, "invalid dApp meta: {}", e),
			Self::InvalidUtf8 => write!(f, "invalid UTF-8 string"),
			Self::VarintOverflow => write!(f, "varint overflow"),
			Self::NestingTooDeep => write!(f, "nesting deeper than {}", MAX_NESTING),
			Self::InvalidVerifierCount(n) => write!(f, "{} verifiers, at most 1 expected", n),
			Self::InvalidDeclaration => write!(f, "invalid top-level declaration"),
			Self::TrailingBytes(n) => write!(f, "{} trailing bytes", n),
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
