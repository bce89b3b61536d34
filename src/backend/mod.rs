//! # Chain state backends
//!
//! Backends store the chain state scripts read, and expose it to the
//! executor. Evaluation never writes to a backend: effects leave the
//! executor as [`InvokeAction`]s that an [`ApplyBackend`] may apply.

mod memory;

pub use self::memory::{MemoryAccount, MemoryBackend, MemoryLease, MemoryVicinity};

use alloc::vec::Vec;
use ride_core::{Address, Alias, H160, H256, PublicKey};
use crate::proto::{BalanceDetails, BlockHeader, DataEntry, FullAssetInfo, InvokeAction};

/// Read-only view of the chain state.
pub trait Backend {
	/// Chain scheme byte.
	fn scheme(&self) -> u8;
	/// Current blockchain height.
	fn height(&self) -> u64;
	/// Header of the block at the given height.
	fn block_header(&self, height: u64) -> Option<BlockHeader>;

	/// Balance of an account, `None` for the native token.
	fn balance(&self, address: &Address, asset: Option<&H256>) -> i64;
	/// Native token balances with leases taken into account.
	fn full_waves_balance(&self, address: &Address) -> BalanceDetails;
	/// Data entry of an account.
	fn data_entry(&self, address: &Address, key: &str) -> Option<DataEntry>;
	/// Serialized script of an account.
	fn script(&self, address: &Address) -> Option<Vec<u8>>;
	/// Public key of an account, known once it signed a transaction.
	fn public_key(&self, address: &Address) -> Option<PublicKey>;

	fn asset_info(&self, asset: &H256) -> Option<FullAssetInfo>;
	fn resolve_alias(&self, alias: &Alias) -> Option<Address>;
	/// Asset addressed by an ERC-20 call of an Ethereum transaction.
	fn asset_by_ethereum_address(&self, address: &H160) -> Option<H256>;
}

/// Backend that can apply the actions of a successful invocation.
pub trait ApplyBackend {
	fn apply<I>(&mut self, actions: I)
	where
		I: IntoIterator<Item = InvokeAction>;
}
