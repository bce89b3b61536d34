use alloc::string::String;
use alloc::vec::Vec;
use ride_core::{Address, H256, PublicKey, Recipient};
use super::DataEntry;

/// State change requested by a dApp.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScriptAction {
	/// Data entry write or deletion.
	Data(DataEntry),
	Transfer {
		recipient: Recipient,
		amount: i64,
		/// `None` for the native token.
		asset: Option<H256>,
	},
	Issue {
		/// Derived from the invoking transaction and the nonce.
		id: H256,
		name: String,
		description: String,
		quantity: i64,
		decimals: i64,
		reissuable: bool,
		script: Option<Vec<u8>>,
		nonce: i64,
	},
	Reissue {
		asset: H256,
		quantity: i64,
		reissuable: bool,
	},
	Burn {
		asset: H256,
		quantity: i64,
	},
	Sponsorship {
		asset: H256,
		/// Zero cancels the sponsorship.
		min_fee: i64,
	},
	Lease {
		/// Derived from the invoking transaction and the nonce.
		id: H256,
		recipient: Recipient,
		amount: i64,
		nonce: i64,
	},
	LeaseCancel {
		lease_id: H256,
	},
}

impl ScriptAction {
	/// Data entries count against their own limit.
	#[must_use]
	pub const fn is_data(&self) -> bool {
		matches!(self, Self::Data(_))
	}
}

/// Action together with the dApp that performed it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvokeAction {
	pub dapp: Address,
	pub action: ScriptAction,
}

/// Transfer made by a dApp, as seen by the script of the transferred asset.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FullScriptTransfer {
	/// Id of the invoking transaction.
	pub id: H256,
	pub sender: Address,
	pub sender_public_key: PublicKey,
	pub recipient: Recipient,
	pub asset: Option<H256>,
	pub amount: i64,
	pub timestamp: u64,
}
