use alloc::string::String;
use alloc::vec::Vec;
use ride_core::{Address, Alias, H256, PublicKey, Recipient};
use super::{Argument, DataEntry, EthereumTransaction, Order, ScriptPayment};

/// Fields shared by every native transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
	pub version: u8,
	pub id: H256,
	pub sender_public_key: PublicKey,
	pub fee: u64,
	pub timestamp: u64,
	#[cfg_attr(feature = "with-serde", serde(with = "serde_bytes"))]
	pub body_bytes: Vec<u8>,
	pub proofs: Vec<Vec<u8>>,
}

/// Transaction body together with its header.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signed<T> {
	pub header: Header,
	pub body: T,
}

impl<T> Signed<T> {
	pub const fn new(header: Header, body: T) -> Self {
		Self { header, body }
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genesis {
	pub recipient: Address,
	pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payment {
	pub recipient: Address,
	pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Issue {
	pub name: String,
	pub description: String,
	pub quantity: u64,
	pub decimals: u8,
	pub reissuable: bool,
	pub script: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transfer {
	pub recipient: Recipient,
	/// `None` for the native token.
	pub asset: Option<H256>,
	pub amount: u64,
	pub fee_asset: Option<H256>,
	#[cfg_attr(feature = "with-serde", serde(with = "serde_bytes"))]
	pub attachment: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reissue {
	pub asset: H256,
	pub quantity: u64,
	pub reissuable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Burn {
	pub asset: H256,
	pub quantity: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exchange {
	pub buy_order: Order,
	pub sell_order: Order,
	pub price: u64,
	pub amount: u64,
	pub buy_matcher_fee: u64,
	pub sell_matcher_fee: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lease {
	pub recipient: Recipient,
	pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaseCancel {
	pub lease_id: H256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateAlias {
	pub alias: Alias,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassTransferEntry {
	pub recipient: Recipient,
	pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassTransfer {
	pub asset: Option<H256>,
	pub transfers: Vec<MassTransferEntry>,
	#[cfg_attr(feature = "with-serde", serde(with = "serde_bytes"))]
	pub attachment: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Data {
	pub entries: Vec<DataEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetScript {
	pub script: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sponsorship {
	pub asset: H256,
	/// Zero cancels the sponsorship.
	pub min_asset_fee: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetAssetScript {
	pub asset: H256,
	pub script: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvokeScript {
	pub dapp: Recipient,
	/// Empty for the default function.
	pub function: String,
	pub arguments: Vec<Argument>,
	pub payments: Vec<ScriptPayment>,
	pub fee_asset: Option<H256>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateAssetInfo {
	pub asset: H256,
	pub name: String,
	pub description: String,
	pub fee_asset: Option<H256>,
}

/// Call of a standalone expression. Known to the protocol, not convertible to a script value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvokeExpression {
	#[cfg_attr(feature = "with-serde", serde(with = "serde_bytes"))]
	pub expression: Vec<u8>,
	pub fee_asset: Option<H256>,
}

/// Every transaction a script can be asked to verify.
#[derive(Debug)]
pub enum Transaction {
	Genesis(Signed<Genesis>),
	Payment(Signed<Payment>),
	Issue(Signed<Issue>),
	Transfer(Signed<Transfer>),
	Reissue(Signed<Reissue>),
	Burn(Signed<Burn>),
	Exchange(Signed<Exchange>),
	Lease(Signed<Lease>),
	LeaseCancel(Signed<LeaseCancel>),
	CreateAlias(Signed<CreateAlias>),
	MassTransfer(Signed<MassTransfer>),
	Data(Signed<Data>),
	SetScript(Signed<SetScript>),
	Sponsorship(Signed<Sponsorship>),
	SetAssetScript(Signed<SetAssetScript>),
	InvokeScript(Signed<InvokeScript>),
	UpdateAssetInfo(Signed<UpdateAssetInfo>),
	InvokeExpression(Signed<InvokeExpression>),
	Ethereum(EthereumTransaction),
}

impl Transaction {
	/// Header of a native transaction.
	#[must_use]
	pub const fn header(&self) -> Option<&Header> {
		match self {
			Self::Genesis(tx) => Some(&tx.header),
			Self::Payment(tx) => Some(&tx.header),
			Self::Issue(tx) => Some(&tx.header),
			Self::Transfer(tx) => Some(&tx.header),
			Self::Reissue(tx) => Some(&tx.header),
			Self::Burn(tx) => Some(&tx.header),
			Self::Exchange(tx) => Some(&tx.header),
			Self::Lease(tx) => Some(&tx.header),
			Self::LeaseCancel(tx) => Some(&tx.header),
			Self::CreateAlias(tx) => Some(&tx.header),
			Self::MassTransfer(tx) => Some(&tx.header),
			Self::Data(tx) => Some(&tx.header),
			Self::SetScript(tx) => Some(&tx.header),
			Self::Sponsorship(tx) => Some(&tx.header),
			Self::SetAssetScript(tx) => Some(&tx.header),
			Self::InvokeScript(tx) => Some(&tx.header),
			Self::UpdateAssetInfo(tx) => Some(&tx.header),
			Self::InvokeExpression(tx) => Some(&tx.header),
			Self::Ethereum(_) => None,
		}
	}

	#[must_use]
	pub fn id(&self) -> H256 {
		match self {
			Self::Ethereum(tx) => tx.id(),
			_ => self.header().map_or_else(H256::zero, |header| header.id),
		}
	}

	/// Name of the transaction type, as used in diagnostics.
	#[must_use]
	pub const fn type_name(&self) -> &'static str {
		match self {
			Self::Genesis(_) => "Genesis",
			Self::Payment(_) => "Payment",
			Self::Issue(_) => "Issue",
			Self::Transfer(_) => "Transfer",
			Self::Reissue(_) => "Reissue",
			Self::Burn(_) => "Burn",
			Self::Exchange(_) => "Exchange",
			Self::Lease(_) => "Lease",
			Self::LeaseCancel(_) => "LeaseCancel",
			Self::CreateAlias(_) => "CreateAlias",
			Self::MassTransfer(_) => "MassTransfer",
			Self::Data(_) => "Data",
			Self::SetScript(_) => "SetScript",
			Self::Sponsorship(_) => "Sponsorship",
			Self::SetAssetScript(_) => "SetAssetScript",
			Self::InvokeScript(_) => "InvokeScript",
			Self::UpdateAssetInfo(_) => "UpdateAssetInfo",
			Self::InvokeExpression(_) => "InvokeExpression",
			Self::Ethereum(_) => "Ethereum",
		}
	}
}
