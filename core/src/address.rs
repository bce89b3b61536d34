use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use fixed_hash::construct_fixed_hash;
use crate::{secure_hash, H160, PublicKey};

/// Version byte of an account address.
pub const ADDRESS_VERSION: u8 = 1;
/// Version byte of a serialized alias.
pub const ALIAS_VERSION: u8 = 2;

const ALIAS_MIN_LENGTH: usize = 4;
const ALIAS_MAX_LENGTH: usize = 30;
const ALIAS_ALPHABET: &str = "-.0123456789@_abcdefghijklmnopqrstuvwxyz";
const CHECKSUM_LENGTH: usize = 4;
const BODY_LENGTH: usize = 20;
const HEADER_LENGTH: usize = 2;

construct_fixed_hash! {
	/// Account address: version, chain scheme, 20-byte body and a 4-byte checksum.
	pub struct Address(26);
}

impl Address {
	/// Address owned by the account with the given public key.
	#[must_use]
	pub fn from_public_key(scheme: u8, public_key: &PublicKey) -> Self {
		let hash = secure_hash(public_key.as_bytes());
		Self::from_body(scheme, &hash.as_bytes()[..BODY_LENGTH])
	}

	/// Address owned by the Ethereum account with the given address.
	#[must_use]
	pub fn from_ethereum(scheme: u8, address: &H160) -> Self {
		Self::from_body(scheme, address.as_bytes())
	}

	fn from_body(scheme: u8, body: &[u8]) -> Self {
		let mut data = [0_u8; 26];
		data[0] = ADDRESS_VERSION;
		data[1] = scheme;
		data[HEADER_LENGTH..HEADER_LENGTH + BODY_LENGTH].copy_from_slice(body);
		let checksum = secure_hash(&data[..HEADER_LENGTH + BODY_LENGTH]);
		data[HEADER_LENGTH + BODY_LENGTH..].copy_from_slice(&checksum.as_bytes()[..CHECKSUM_LENGTH]);
		Self(data)
	}

	/// Parses and validates raw address bytes.
	#[must_use]
	pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
		if bytes.len() != Self::len_bytes() {
			return None;
		}
		let address = Self::from_slice(bytes);
		if address.is_valid() {
			Some(address)
		} else {
			None
		}
	}

	/// Chain scheme byte.
	#[must_use]
	pub const fn scheme(&self) -> u8 {
		self.0[1]
	}

	/// The 20-byte body, which is also the Ethereum form of the address.
	#[must_use]
	pub fn body(&self) -> H160 {
		H160::from_slice(&self.0[HEADER_LENGTH..HEADER_LENGTH + BODY_LENGTH])
	}

	/// Checks the version byte and the checksum.
	#[must_use]
	pub fn is_valid(&self) -> bool {
		let checksum = secure_hash(&self.0[..HEADER_LENGTH + BODY_LENGTH]);
		self.0[0] == ADDRESS_VERSION
			&& self.0[HEADER_LENGTH + BODY_LENGTH..] == checksum.as_bytes()[..CHECKSUM_LENGTH]
	}
}

/// Named pointer to an address.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alias {
	pub scheme: u8,
	pub alias: String,
}

impl Alias {
	#[must_use]
	pub fn new(scheme: u8, alias: &str) -> Self {
		Self { scheme, alias: alias.into() }
	}

	/// Checks length and alphabet.
	#[must_use]
	pub fn is_valid(&self) -> bool {
		let len = self.alias.len();
		(ALIAS_MIN_LENGTH..=ALIAS_MAX_LENGTH).contains(&len)
			&& self.alias.chars().all(|c| ALIAS_ALPHABET.contains(c))
	}

	/// Binary form: version, scheme, big-endian length and the alias bytes.
	#[must_use]
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(4 + self.alias.len());
		out.push(ALIAS_VERSION);
		out.push(self.scheme);
		out.extend_from_slice(&(self.alias.len() as u16).to_be_bytes());
		out.extend_from_slice(self.alias.as_bytes());
		out
	}
}

impl fmt::Display for Alias {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "alias:{}:{}", self.scheme as char, self.alias)
	}
}

/// Either an address or an alias that resolves to one.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Recipient {
	Address(Address),
	Alias(Alias),
}

impl Recipient {
	#[must_use]
	pub const fn address(&self) -> Option<&Address> {
		match self {
			Self::Address(address) => Some(address),
			Self::Alias(_) => None,
		}
	}

	/// Bytes of the address or of the alias.
	#[must_use]
	pub fn to_bytes(&self) -> Vec<u8> {
		match self {
			Self::Address(address) => address.as_bytes().to_vec(),
			Self::Alias(alias) => alias.to_bytes(),
		}
	}
}

impl From<Address> for Recipient {
	fn from(address: Address) -> Self {
		Self::Address(address)
	}
}

impl From<Alias> for Recipient {
	fn from(alias: Alias) -> Self {
		Self::Alias(alias)
	}
}

impl fmt::Display for Recipient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Address(address) => write!(f, "{:x}", address),
			Self::Alias(alias) => alias.fmt(f),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn address_from_public_key_is_valid() {
		let address = Address::from_public_key(b'W', &PublicKey::repeat_byte(7));
		assert!(address.is_valid());
		assert_eq!(address.scheme(), b'W');
		assert_eq!(Address::from_bytes(address.as_bytes()), Some(address));
	}

	#[test]
	fn mainnet_address_of_public_key() {
		let address = Address::from_public_key(b'W', &PublicKey::repeat_byte(1));
		assert_eq!(
			hex::encode(address.as_bytes()),
			"015701bd1a0b60a2022196e4853439e5dc33a6a2ba4ef6683fe7"
		);
	}

	#[test]
	fn corrupted_checksum_is_rejected() {
		let address = Address::from_ethereum(b'T', &H160::repeat_byte(0x11));
		let mut raw = address.as_bytes().to_vec();
		raw[25] ^= 0xff;
		assert_eq!(Address::from_bytes(&raw), None);
		assert_eq!(address.body(), H160::repeat_byte(0x11));
	}

	#[test]
	fn alias_validation() {
		assert!(Alias::new(b'W', "good-alias@1").is_valid());
		assert!(!Alias::new(b'W', "abc").is_valid());
		assert!(!Alias::new(b'W', "UPPER").is_valid());
		assert_eq!(Alias::new(b'W', "alice").to_string(), "alias:W:alice");
	}
}
