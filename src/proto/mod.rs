//! # Protocol types
//!
//! Transactions, orders and the actions a dApp produces, in the form the
//! converter turns into RIDE values and back.

mod actions;
mod arguments;
mod data_entry;
mod ethereum;
mod info;
mod order;
mod transaction;

pub use self::actions::{FullScriptTransfer, InvokeAction, ScriptAction};
pub use self::arguments::Argument;
pub use self::data_entry::DataEntry;
pub use self::ethereum::{
	AccessListTx, AccessTuple, DynamicFeeTx, EthereumTransaction, EthereumTransactionKind,
	EthereumTxData, EthereumTxError, EthereumTxType, LegacyTx, DIFF_ETH_WAVES, ETHEREUM_TRANSACTION_TYPE,
};
pub use self::info::{AssetInfo, BalanceDetails, BlockHeader, FullAssetInfo};
pub use self::order::{Order, OrderType};
pub use self::transaction::{
	Burn, CreateAlias, Data, Exchange, Genesis, Header, InvokeExpression, InvokeScript, Issue, Lease,
	LeaseCancel, MassTransfer, MassTransferEntry, Payment, Reissue, SetAssetScript, SetScript, Signed,
	Sponsorship, Transaction, Transfer, UpdateAssetInfo,
};

pub use ride_ethabi::Payment as ScriptPayment;

/// Number of proof slots exposed to scripts.
pub const PROOFS_COUNT: usize = 8;
