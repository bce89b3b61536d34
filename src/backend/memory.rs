use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::convert::TryFrom;
use ride_core::{Address, Alias, H160, H256, PublicKey, Recipient};
use super::{ApplyBackend, Backend};
use crate::proto::{
	AssetInfo, BalanceDetails, BlockHeader, DataEntry, FullAssetInfo, InvokeAction, ScriptAction,
};

/// Vicinity value of a memory backend.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryVicinity {
	/// Chain scheme byte.
	pub scheme: u8,
	/// Current blockchain height.
	pub height: u64,
	/// Known block headers, looked up by their height.
	pub blocks: Vec<BlockHeader>,
}

/// Account information of a memory backend.
#[derive(Default, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryAccount {
	pub public_key: Option<PublicKey>,
	/// Balances by asset, `None` for the native token.
	pub balances: BTreeMap<Option<H256>, i64>,
	/// Account data storage.
	pub data: BTreeMap<String, DataEntry>,
	/// Serialized script, empty when the account has none.
	#[cfg_attr(feature = "with-serde", serde(with = "serde_bytes"))]
	pub script: Vec<u8>,
}

impl MemoryAccount {
	fn credit(&mut self, asset: Option<H256>, amount: i64) {
		let balance = self.balances.entry(asset).or_insert(0);
		*balance = balance.saturating_add(amount);
	}
}

/// Lease started by an account.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryLease {
	pub sender: Address,
	pub recipient: Address,
	pub amount: i64,
	pub active: bool,
}

/// Memory backend, storing all state values in `BTreeMap`s in memory.
#[derive(Clone, Debug)]
pub struct MemoryBackend<'vicinity> {
	vicinity: &'vicinity MemoryVicinity,
	state: BTreeMap<Address, MemoryAccount>,
	assets: BTreeMap<H256, FullAssetInfo>,
	aliases: BTreeMap<String, Address>,
	leases: BTreeMap<H256, MemoryLease>,
}

impl<'vicinity> MemoryBackend<'vicinity> {
	/// Create a new memory backend.
	#[must_use]
	pub fn new(vicinity: &'vicinity MemoryVicinity, state: BTreeMap<Address, MemoryAccount>) -> Self {
		Self {
			vicinity,
			state,
			assets: BTreeMap::new(),
			aliases: BTreeMap::new(),
			leases: BTreeMap::new(),
		}
	}

	#[must_use]
	pub fn with_asset(mut self, info: FullAssetInfo) -> Self {
		self.assets.insert(info.info.id, info);
		self
	}

	#[must_use]
	pub fn with_alias(mut self, alias: &str, address: Address) -> Self {
		self.aliases.insert(String::from(alias), address);
		self
	}

	/// Get the underlying `BTreeMap` storing the state.
	#[must_use]
	pub const fn state(&self) -> &BTreeMap<Address, MemoryAccount> {
		&self.state
	}

	#[must_use]
	pub const fn assets(&self) -> &BTreeMap<H256, FullAssetInfo> {
		&self.assets
	}

	#[must_use]
	pub const fn leases(&self) -> &BTreeMap<H256, MemoryLease> {
		&self.leases
	}

	fn account_mut(&mut self, address: Address) -> &mut MemoryAccount {
		self.state.entry(address).or_insert_with(MemoryAccount::default)
	}

	fn recipient_address(&self, recipient: &Recipient) -> Option<Address> {
		match recipient {
			Recipient::Address(address) => Some(*address),
			Recipient::Alias(alias) => self.resolve_alias(alias),
		}
	}

	fn leased(&self, address: &Address) -> (i64, i64) {
		self.leases.values()
			.filter(|lease| lease.active)
			.fold((0_i64, 0_i64), |(out, incoming), lease| {
				let out = if lease.sender == *address { out.saturating_add(lease.amount) } else { out };
				let incoming = if lease.recipient == *address {
					incoming.saturating_add(lease.amount)
				} else {
					incoming
				};
				(out, incoming)
			})
	}

	fn apply_action(&mut self, dapp: Address, action: ScriptAction) {
		match action {
			ScriptAction::Data(entry) => {
				let account = self.account_mut(dapp);
				match entry {
					DataEntry::Delete { key } => {
						account.data.remove(&key);
					},
					entry => {
						account.data.insert(String::from(entry.key()), entry);
					},
				}
			},
			ScriptAction::Transfer { recipient, amount, asset } => {
				match self.recipient_address(&recipient) {
					Some(target) => {
						self.account_mut(dapp).credit(asset, amount.saturating_neg());
						self.account_mut(target).credit(asset, amount);
					},
					None => log::warn!(target: "ride", "transfer to unknown recipient {} skipped", recipient),
				}
			},
			ScriptAction::Issue { id, name, description, quantity, decimals, reissuable, script, .. } => {
				let issuer_public_key = self.state.get(&dapp)
					.and_then(|account| account.public_key)
					.unwrap_or_else(PublicKey::zero);
				let info = AssetInfo {
					id,
					quantity,
					decimals: u8::try_from(decimals).unwrap_or_default(),
					issuer: dapp,
					issuer_public_key,
					reissuable,
					scripted: script.is_some(),
					sponsored: false,
				};
				self.assets.insert(id, FullAssetInfo { info, name, description, sponsorship_cost: 0 });
				self.account_mut(dapp).credit(Some(id), quantity);
			},
			ScriptAction::Reissue { asset, quantity, reissuable } => {
				if let Some(info) = self.assets.get_mut(&asset) {
					info.info.quantity = info.info.quantity.saturating_add(quantity);
					info.info.reissuable = reissuable;
				}
				self.account_mut(dapp).credit(Some(asset), quantity);
			},
			ScriptAction::Burn { asset, quantity } => {
				if let Some(info) = self.assets.get_mut(&asset) {
					info.info.quantity = info.info.quantity.saturating_sub(quantity);
				}
				self.account_mut(dapp).credit(Some(asset), quantity.saturating_neg());
			},
			ScriptAction::Sponsorship { asset, min_fee } => {
				if let Some(info) = self.assets.get_mut(&asset) {
					info.sponsorship_cost = u64::try_from(min_fee).unwrap_or_default();
					info.info.sponsored = min_fee > 0;
				}
			},
			ScriptAction::Lease { id, recipient, amount, .. } => {
				match self.recipient_address(&recipient) {
					Some(target) => {
						self.leases.insert(id, MemoryLease { sender: dapp, recipient: target, amount, active: true });
					},
					None => log::warn!(target: "ride", "lease to unknown recipient {} skipped", recipient),
				}
			},
			ScriptAction::LeaseCancel { lease_id } => {
				if let Some(lease) = self.leases.get_mut(&lease_id) {
					lease.active = false;
				}
			},
		}
	}
}

impl<'vicinity> Backend for MemoryBackend<'vicinity> {
	fn scheme(&self) -> u8 { self.vicinity.scheme }
	fn height(&self) -> u64 { self.vicinity.height }

	fn block_header(&self, height: u64) -> Option<BlockHeader> {
		if height == 0 || height > self.vicinity.height {
			return None
		}
		self.vicinity.blocks.iter().find(|block| block.height == height).cloned()
	}

	fn balance(&self, address: &Address, asset: Option<&H256>) -> i64 {
		self.state.get(address)
			.and_then(|account| account.balances.get(&asset.copied()).copied())
			.unwrap_or_default()
	}

	fn full_waves_balance(&self, address: &Address) -> BalanceDetails {
		let regular = self.balance(address, None);
		let (out, incoming) = self.leased(address);
		let available = regular.saturating_sub(out);
		let effective = available.saturating_add(incoming);
		BalanceDetails { available, regular, generating: effective, effective }
	}

	fn data_entry(&self, address: &Address, key: &str) -> Option<DataEntry> {
		self.state.get(address).and_then(|account| account.data.get(key).cloned())
	}

	fn script(&self, address: &Address) -> Option<Vec<u8>> {
		self.state.get(address)
			.filter(|account| !account.script.is_empty())
			.map(|account| account.script.clone())
	}

	fn public_key(&self, address: &Address) -> Option<PublicKey> {
		self.state.get(address).and_then(|account| account.public_key)
	}

	fn asset_info(&self, asset: &H256) -> Option<FullAssetInfo> {
		self.assets.get(asset).cloned()
	}

	fn resolve_alias(&self, alias: &Alias) -> Option<Address> {
		if alias.scheme != self.vicinity.scheme {
			return None
		}
		self.aliases.get(&alias.alias).copied()
	}

	/// The Ethereum address of an asset is the first 20 bytes of its id.
	fn asset_by_ethereum_address(&self, address: &H160) -> Option<H256> {
		self.assets.keys()
			.find(|id| &id.as_bytes()[..H160::len_bytes()] == address.as_bytes())
			.copied()
	}
}

impl<'vicinity> ApplyBackend for MemoryBackend<'vicinity> {
	fn apply<I>(&mut self, actions: I)
	where
		I: IntoIterator<Item = InvokeAction>,
	{
		for InvokeAction { dapp, action } in actions {
			self.apply_action(dapp, action);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloc::vec;

	fn address(byte: u8) -> Address {
		Address::from_public_key(b'T', &PublicKey::repeat_byte(byte))
	}

	fn vicinity() -> MemoryVicinity {
		MemoryVicinity {
			scheme: b'T',
			height: 10,
			blocks: vec![BlockHeader { height: 9, timestamp: 1, ..BlockHeader::default() }],
		}
	}

	fn funded(byte: u8, amount: i64) -> (Address, MemoryAccount) {
		let mut account = MemoryAccount { public_key: Some(PublicKey::repeat_byte(byte)), ..MemoryAccount::default() };
		account.balances.insert(None, amount);
		(address(byte), account)
	}

	#[test]
	fn block_headers_are_bounded_by_height() {
		let vicinity = vicinity();
		let backend = MemoryBackend::new(&vicinity, BTreeMap::new());
		assert_eq!(backend.block_header(9).map(|block| block.timestamp), Some(1));
		assert_eq!(backend.block_header(11), None);
		assert_eq!(backend.block_header(0), None);
	}

	#[test]
	fn applies_transfers_and_data() {
		let vicinity = vicinity();
		let state = vec![funded(1, 1_000)].into_iter().collect();
		let mut backend = MemoryBackend::new(&vicinity, state).with_alias("bob1", address(2));

		backend.apply(vec![
			InvokeAction {
				dapp: address(1),
				action: ScriptAction::Transfer {
					recipient: Alias::new(b'T', "bob1").into(),
					amount: 300,
					asset: None,
				},
			},
			InvokeAction {
				dapp: address(1),
				action: ScriptAction::Data(DataEntry::Integer { key: String::from("n"), value: 7 }),
			},
		]);
		assert_eq!(backend.balance(&address(1), None), 700);
		assert_eq!(backend.balance(&address(2), None), 300);
		assert_eq!(
			backend.data_entry(&address(1), "n"),
			Some(DataEntry::Integer { key: String::from("n"), value: 7 }),
		);

		backend.apply(vec![InvokeAction {
			dapp: address(1),
			action: ScriptAction::Data(DataEntry::Delete { key: String::from("n") }),
		}]);
		assert_eq!(backend.data_entry(&address(1), "n"), None);
	}

	#[test]
	fn leases_move_effective_balance() {
		let vicinity = vicinity();
		let state = vec![funded(1, 1_000)].into_iter().collect();
		let mut backend = MemoryBackend::new(&vicinity, state);
		let id = H256::repeat_byte(5);
		backend.apply(vec![InvokeAction {
			dapp: address(1),
			action: ScriptAction::Lease { id, recipient: address(2).into(), amount: 400, nonce: 0 },
		}]);

		let sender = backend.full_waves_balance(&address(1));
		assert_eq!((sender.regular, sender.available, sender.effective), (1_000, 600, 600));
		assert_eq!(backend.full_waves_balance(&address(2)).effective, 400);

		backend.apply(vec![InvokeAction { dapp: address(1), action: ScriptAction::LeaseCancel { lease_id: id } }]);
		assert_eq!(backend.full_waves_balance(&address(1)).available, 1_000);
	}

	#[test]
	fn issued_assets_are_found_by_ethereum_address() {
		let vicinity = vicinity();
		let mut backend = MemoryBackend::new(&vicinity, vec![funded(1, 0)].into_iter().collect());
		let id = H256::repeat_byte(0xab);
		backend.apply(vec![InvokeAction {
			dapp: address(1),
			action: ScriptAction::Issue {
				id,
				name: String::from("Token"),
				description: String::new(),
				quantity: 50,
				decimals: 2,
				reissuable: true,
				script: None,
				nonce: 0,
			},
		}]);
		assert_eq!(backend.balance(&address(1), Some(&id)), 50);
		assert_eq!(backend.asset_by_ethereum_address(&H160::repeat_byte(0xab)), Some(id));
		assert_eq!(backend.asset_info(&id).map(|info| info.info.issuer_public_key), Some(PublicKey::repeat_byte(1)));
	}
}
