use alloc::string::String;
use alloc::vec::Vec;
use ride_core::{Address, H256, PublicKey};

/// Asset description visible to scripts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetInfo {
	pub id: H256,
	pub quantity: i64,
	pub decimals: u8,
	pub issuer: Address,
	pub issuer_public_key: PublicKey,
	pub reissuable: bool,
	pub scripted: bool,
	pub sponsored: bool,
}

/// Asset description with the fields added in library version 4.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FullAssetInfo {
	pub info: AssetInfo,
	pub name: String,
	pub description: String,
	/// Zero when the asset is not sponsored.
	pub sponsorship_cost: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockHeader {
	pub timestamp: u64,
	pub height: u64,
	pub base_target: u64,
	#[cfg_attr(feature = "with-serde", serde(with = "serde_bytes"))]
	pub generation_signature: Vec<u8>,
	pub generator_public_key: PublicKey,
	/// Present from the block version that introduced verifiable randomness.
	pub vrf: Option<Vec<u8>>,
}

/// Native token balances of an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalanceDetails {
	pub available: i64,
	pub regular: i64,
	pub generating: i64,
	pub effective: i64,
}
