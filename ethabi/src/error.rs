use alloc::string::String;
use core::fmt;
use crate::Selector;

/// ABI decoding and method table errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
	/// A read needs more bytes than the payload holds.
	ShortData { required: usize, length: usize },
	/// Offset or length does not fit in 63 bits.
	Overflow,
	/// Decoded payloads exceed the size of the call data.
	ExcessiveData,
	/// No method with the selector.
	UnknownSelector(Selector),
	/// Bool word other than 0 or 1.
	InvalidBool,
	/// String payload is not UTF-8.
	InvalidUtf8,
	/// Malformed union tuple.
	InvalidUnion(&'static str),
	/// Union index does not select one of the remaining fields.
	UnionIndex { index: i64, count: usize },
	/// Malformed payment entry.
	InvalidPayment(&'static str),
	/// Two methods of one table share a selector.
	SelectorCollision { selector: Selector, first: String, second: String },
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ShortData { required, length } => {
				write!(f, "abi: length insufficient {} require {}", length, required)
			},
			Self::Overflow => f.write_str("abi: offset or length larger than int64"),
			Self::ExcessiveData => f.write_str("abi: decoded data exceeds call data size"),
			Self::UnknownSelector(selector) => write!(f, "abi: no method with selector {}", selector),
			Self::InvalidBool => f.write_str("abi: improperly encoded boolean value"),
			Self::InvalidUtf8 => f.write_str("abi: string is not valid utf-8"),
			Self::InvalidUnion(reason) => write!(f, "abi: failed to convert tuple to union, {}", reason),
			Self::UnionIndex { index, count } => write!(
				f,
				"abi: failed to convert tuple to union, union index ({}) out of elems count ({})",
				index, count
			),
			Self::InvalidPayment(reason) => write!(f, "abi: invalid payment, {}", reason),
			Self::SelectorCollision { selector, first, second } => write!(
				f,
				"abi: selector {} of {} collides with {}",
				selector, second, first
			),
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
