use fixed_hash::{construct_fixed_hash, impl_fixed_hash_conversions};
use uint::construct_uint;

construct_fixed_hash! {
	/// Fixed-size uninterpreted hash type with 20 bytes (160 bits) size.
	pub struct H160(20);
}
construct_fixed_hash! {
	/// Fixed-size uninterpreted hash type with 32 bytes (256 bits) size.
	pub struct H256(32);
}
construct_fixed_hash! {
	/// Fixed-size uninterpreted hash type with 64 bytes (512 bits) size.
	pub struct H512(64);
}
construct_fixed_hash! {
	/// Curve25519 account public key.
	pub struct PublicKey(32);
}

impl_fixed_hash_conversions!(H256, H160);

construct_uint! {
	/// 256-bit unsigned integer.
	pub struct U256(4);
}

impl_rlp::impl_uint_rlp!(U256, 4);
impl_rlp::impl_fixed_hash_rlp!(H160, 20);
impl_rlp::impl_fixed_hash_rlp!(H256, 32);

impl U256 {
	/// Big-endian bytes of the value.
	#[must_use]
	pub fn to_be_bytes(self) -> [u8; 32] {
		let mut data = [0_u8; 32];
		self.to_big_endian(&mut data);
		data
	}
}

/// Add Serde serialization support to a fixed-sized hash type created by `construct_fixed_hash!`.
#[cfg(feature = "with-serde")]
macro_rules! impl_fixed_hash_serde {
	($name: ident, $len: expr) => {
		impl serde::Serialize for $name {
			fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
			where
				S: serde::Serializer,
			{
				serializer.serialize_bytes(self.as_bytes())
			}
		}

		impl<'de> serde::Deserialize<'de> for $name {
			fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
			where
				D: serde::Deserializer<'de>,
			{
				struct Visitor;
				impl<'de> serde::de::Visitor<'de> for Visitor {
					type Value = $name;

					fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
						formatter.write_str(stringify!($name))
					}

					fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
						if v.len() != $len {
							return Err(E::invalid_length(v.len(), &self));
						}
						Ok($name::from_slice(v))
					}
				}

				deserializer.deserialize_bytes(Visitor)
			}
		}
	};
}

#[cfg(feature = "with-serde")]
impl_fixed_hash_serde!(H160, 20);
#[cfg(feature = "with-serde")]
impl_fixed_hash_serde!(H256, 32);
#[cfg(feature = "with-serde")]
impl_fixed_hash_serde!(H512, 64);
#[cfg(feature = "with-serde")]
impl_fixed_hash_serde!(PublicKey, 32);
#[cfg(feature = "with-serde")]
impl_fixed_hash_serde!(Address, 26);

#[cfg(feature = "with-serde")]
use crate::Address;

#[cfg(feature = "with-serde")]
impl serde::Serialize for U256 {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_bytes(&self.to_be_bytes())
	}
}

#[cfg(feature = "with-serde")]
impl<'de> serde::Deserialize<'de> for U256 {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		struct Visitor;
		impl<'de> serde::de::Visitor<'de> for Visitor {
			type Value = U256;

			fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
				formatter.write_str("U256")
			}

			fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
				if v.len() > 32 {
					return Err(E::invalid_length(v.len(), &self));
				}
				Ok(U256::from_big_endian(v))
			}
		}

		deserializer.deserialize_bytes(Visitor)
	}
}
