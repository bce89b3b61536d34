use alloc::vec::Vec;
use ride_core::{Address, H256, PublicKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderType {
	Buy,
	Sell,
}

impl OrderType {
	/// Instance name of the RIDE value.
	#[must_use]
	pub const fn instance(self) -> &'static str {
		match self {
			Self::Buy => "Buy",
			Self::Sell => "Sell",
		}
	}
}

/// Exchange order signed by a trader.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
	pub version: u8,
	pub id: H256,
	pub sender_public_key: PublicKey,
	pub matcher_public_key: PublicKey,
	pub amount_asset: Option<H256>,
	pub price_asset: Option<H256>,
	pub order_type: OrderType,
	pub price: u64,
	pub amount: u64,
	pub timestamp: u64,
	pub expiration: u64,
	pub matcher_fee: u64,
	pub matcher_fee_asset: Option<H256>,
	#[cfg_attr(feature = "with-serde", serde(with = "serde_bytes"))]
	pub body_bytes: Vec<u8>,
	pub proofs: Vec<Vec<u8>>,
}

impl Order {
	#[must_use]
	pub fn sender(&self, scheme: u8) -> Address {
		Address::from_public_key(scheme, &self.sender_public_key)
	}
}
