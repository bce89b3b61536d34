use alloc::string::String;
use blake2::digest::consts::U32;
use blake2::Blake2b;
use sha3::{Digest, Keccak256};
use crate::{H160, H256, H512};

type Blake2b256 = Blake2b<U32>;

#[must_use]
pub fn keccak256(data: &[u8]) -> H256 {
	H256::from_slice(Keccak256::digest(data).as_slice())
}

/// Blake2b with a 32-byte output, used for derived asset and lease ids.
#[must_use]
pub fn fast_hash(data: &[u8]) -> H256 {
	H256::from_slice(<Blake2b256 as blake2::Digest>::digest(data).as_slice())
}

/// Keccak-256 of the Blake2b-256 digest: address bodies and checksums, script checksums.
#[must_use]
pub fn secure_hash(data: &[u8]) -> H256 {
	keccak256(fast_hash(data).as_bytes())
}

/// Ethereum address of an uncompressed secp256k1 public key.
#[must_use]
pub fn ethereum_address(public_key: &H512) -> H160 {
	H160::from(keccak256(public_key.as_bytes()))
}

/// Mixed-case checksum encoding of an Ethereum address (EIP-55).
#[must_use]
pub fn ethereum_checksum(address: &H160) -> String {
	const HEX: &[u8; 16] = b"0123456789abcdef";

	let mut lower = String::with_capacity(40);
	for byte in address.as_bytes() {
		lower.push(HEX[usize::from(byte >> 4)] as char);
		lower.push(HEX[usize::from(byte & 0x0f)] as char);
	}
	let hash = keccak256(lower.as_bytes());

	let mut out = String::with_capacity(42);
	out.push_str("0x");
	for (i, c) in lower.chars().enumerate() {
		let shift = if i % 2 == 0 { 4 } else { 0 };
		let nibble = (hash.as_bytes()[i / 2] >> shift) & 0x0f;
		if nibble >= 8 {
			out.push(c.to_ascii_uppercase());
		} else {
			out.push(c);
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keccak_of_empty_input() {
		assert_eq!(
			hex::encode(keccak256(&[]).as_bytes()),
			"c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
		);
	}

	#[test]
	fn fast_hash_of_empty_input() {
		assert_eq!(
			hex::encode(fast_hash(&[]).as_bytes()),
			"0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
		);
	}

	#[test]
	fn secure_hash_is_keccak_over_blake2b() {
		// checksum of the always-true expression script `AQa3b8tH`
		assert_eq!(hex::encode(&secure_hash(&[0x01, 0x06]).as_bytes()[..4]), "b76fcb47");
	}

	#[test]
	fn checksum_matches_known_address() {
		let raw = hex::decode("9a1989946ae4249aac19ac7a038d24aab03c3d8c").unwrap();
		let address = H160::from_slice(&raw);
		assert_eq!(ethereum_checksum(&address), "0x9a1989946ae4249AAC19ac7a038d24Aab03c3D8c");
	}
}
