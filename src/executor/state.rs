use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use ride_core::{Address, ErrorKind, EvaluationError, H256, Recipient};
use crate::proto::{DataEntry, InvokeAction, ScriptAction};

/// Effects of the dApp-to-dApp invocations made so far by one evaluation.
///
/// A nested invocation runs on a [`substate`](Self::substate) that sees the
/// effects already recorded here. When it returns successfully it is merged
/// back, otherwise it is dropped and only the error carries its complexity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrappedState {
	actions: Vec<InvokeAction>,
	complexity: u32,
	depth: Option<usize>,
	data: BTreeMap<(Address, String), DataEntry>,
	balances: BTreeMap<(Address, Option<H256>), i64>,
}

impl WrappedState {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Actions of completed nested invocations, in completion order.
	#[must_use]
	pub fn actions(&self) -> &[InvokeAction] {
		&self.actions
	}

	/// Complexity spent by completed nested invocations.
	#[must_use]
	pub const fn complexity(&self) -> u32 {
		self.complexity
	}

	/// Nesting of the invocation running on this state, `None` at the top.
	#[must_use]
	pub const fn depth(&self) -> Option<usize> {
		self.depth
	}

	/// Create a substate for a nested invocation.
	pub fn substate(&self, max_depth: usize) -> Result<Self, EvaluationError> {
		let depth = self.depth.map_or(0, |n| n + 1);
		if depth >= max_depth {
			return Err(ErrorKind::RuntimeError.error(format!(
				"invocation depth {} exceeds {}",
				depth + 1, max_depth
			)))
		}
		Ok(Self {
			actions: Vec::new(),
			complexity: 0,
			depth: Some(depth),
			data: self.data.clone(),
			balances: self.balances.clone(),
		})
	}

	/// Merge a substate whose invocation succeeded.
	///
	/// Actions of the invocations it made come before its own actions.
	pub fn merge_succeed(
		&mut self,
		mut substate: Self,
		dapp: Address,
		actions: Vec<ScriptAction>,
		complexity: u32,
	) -> Result<(), EvaluationError> {
		for action in &actions {
			substate.record(dapp, action)?;
		}
		self.complexity = self.complexity
			.saturating_add(substate.complexity)
			.saturating_add(complexity);
		self.actions.append(&mut substate.actions);
		self.actions.extend(actions.into_iter().map(|action| InvokeAction { dapp, action }));
		self.data = substate.data;
		self.balances = substate.balances;
		Ok(())
	}

	/// Merge a substate whose invocation failed: none of its effects survive.
	pub fn merge_fail(&mut self, substate: Self) {
		log::debug!(
			target: "ride",
			"nested invocation at depth {:?} of {:?} failed, {} actions discarded",
			substate.depth,
			self.depth,
			substate.actions.len(),
		);
	}

	/// Data entry written by a nested invocation; a `Delete` entry hides the stored one.
	#[must_use]
	pub fn data_entry(&self, address: &Address, key: &str) -> Option<&DataEntry> {
		self.data.get(&(*address, String::from(key)))
	}

	/// Change of a balance made by nested invocations.
	#[must_use]
	pub fn balance_diff(&self, address: &Address, asset: Option<&H256>) -> i64 {
		self.balances.get(&(*address, asset.copied())).copied().unwrap_or_default()
	}

	/// Moves an attached payment from the caller to the invoked dApp.
	pub fn transfer(
		&mut self,
		source: Address,
		target: Address,
		asset: Option<H256>,
		amount: i64,
	) -> Result<(), EvaluationError> {
		self.withdraw(source, asset, amount)?;
		self.deposit(target, asset, amount)?;
		self.actions.push(InvokeAction {
			dapp: source,
			action: ScriptAction::Transfer { recipient: target.into(), amount, asset },
		});
		Ok(())
	}

	fn withdraw(&mut self, address: Address, asset: Option<H256>, amount: i64) -> Result<(), EvaluationError> {
		let amount = amount.checked_neg().ok_or_else(|| overflow(&address))?;
		self.deposit(address, asset, amount)
	}

	fn deposit(&mut self, address: Address, asset: Option<H256>, amount: i64) -> Result<(), EvaluationError> {
		let balance = self.balances.entry((address, asset)).or_insert(0);
		*balance = balance.checked_add(amount).ok_or_else(|| overflow(&address))?;
		Ok(())
	}

	/// Makes the effects of an action visible to later reads.
	fn record(&mut self, dapp: Address, action: &ScriptAction) -> Result<(), EvaluationError> {
		match action {
			ScriptAction::Data(entry) => {
				self.data.insert((dapp, String::from(entry.key())), entry.clone());
			},
			ScriptAction::Transfer { recipient: Recipient::Address(target), amount, asset } => {
				self.withdraw(dapp, *asset, *amount)?;
				self.deposit(*target, *asset, *amount)?;
			},
			ScriptAction::Issue { id, quantity, .. } => self.deposit(dapp, Some(*id), *quantity)?,
			ScriptAction::Reissue { asset, quantity, .. } => self.deposit(dapp, Some(*asset), *quantity)?,
			ScriptAction::Burn { asset, quantity } => self.withdraw(dapp, Some(*asset), *quantity)?,
			ScriptAction::Transfer { .. }
			| ScriptAction::Sponsorship { .. }
			| ScriptAction::Lease { .. }
			| ScriptAction::LeaseCancel { .. } => (),
		}
		Ok(())
	}
}

fn overflow(address: &Address) -> EvaluationError {
	ErrorKind::RuntimeError.error(format!("balance of {:x} overflows", address))
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloc::vec;
	use ride_core::PublicKey;

	fn address(byte: u8) -> Address {
		Address::from_public_key(b'T', &PublicKey::repeat_byte(byte))
	}

	fn write(key: &str, value: i64) -> ScriptAction {
		ScriptAction::Data(DataEntry::Integer { key: String::from(key), value })
	}

	#[test]
	fn depth_is_limited() {
		let top = WrappedState::new();
		let first = top.substate(2).unwrap();
		assert_eq!(first.depth(), Some(0));
		let second = first.substate(2).unwrap();
		let err = second.substate(2).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::RuntimeError);
		assert_eq!(err.message(), "invocation depth 3 exceeds 2");
	}

	#[test]
	fn inner_actions_precede_outer_ones() {
		let mut top = WrappedState::new();
		let mut outer = top.substate(10).unwrap();
		let inner = outer.substate(10).unwrap();

		outer.merge_succeed(inner, address(2), vec![write("inner", 1)], 30).unwrap();
		top.merge_succeed(outer, address(1), vec![write("outer", 2)], 20).unwrap();

		assert_eq!(top.complexity(), 50);
		let order: Vec<_> = top.actions().iter().map(|action| action.dapp).collect();
		assert_eq!(order, vec![address(2), address(1)]);
		assert!(top.data_entry(&address(2), "inner").is_some());
	}

	#[test]
	fn failed_substates_leave_no_effects() {
		let mut top = WrappedState::new();
		let mut sub = top.substate(10).unwrap();
		sub.transfer(address(1), address(2), None, 10).unwrap();
		top.merge_fail(sub);
		assert_eq!(top.balance_diff(&address(1), None), 0);
		assert!(top.actions().is_empty());
	}

	#[test]
	fn payments_and_transfers_move_balances() {
		let mut top = WrappedState::new();
		let mut sub = top.substate(10).unwrap();
		sub.transfer(address(1), address(2), None, 10).unwrap();
		let transfer = ScriptAction::Transfer { recipient: address(3).into(), amount: 4, asset: None };
		top.merge_succeed(sub, address(2), vec![transfer], 1).unwrap();

		assert_eq!(top.balance_diff(&address(1), None), -10);
		assert_eq!(top.balance_diff(&address(2), None), 6);
		assert_eq!(top.balance_diff(&address(3), None), 4);
		assert_eq!(top.actions().len(), 2);
	}
}
