use alloc::format;
use alloc::vec::Vec;
use ride_core::{Address, Alias, ErrorKind, EvaluationError, H256, Object, PublicKey, Tree, Value};
use ride_gasometer::Gasometer;
use ride_runtime::{max_chain_invoke_complexity, Config, Handler, Step};
use crate::backend::Backend;
use crate::converter::{
	asset_info_to_object, balance_details_to_object, block_info_to_object, failure,
	full_asset_info_to_object, invocation_to_object, nested_invocation, order_to_object,
	transaction_to_object, values_to_arguments, ActionEnvironment,
};
use crate::proto::{Order, ScriptPayment, Transaction};
use crate::serialization::deserialize;
use super::state::WrappedState;

/// Evaluation environment over a read-only backend.
pub struct Environment<'backend, B> {
	backend: &'backend B,
	config: &'static Config,
	gasometer: Gasometer<'static>,
	this: Address,
	transaction: Option<Value>,
	transaction_id: Option<H256>,
	invocation: Option<Object>,
	state: WrappedState,
	/// Complexity spent by the invocations this one is nested in.
	spent_by_callers: u32,
}

impl<'backend, B: Backend> Environment<'backend, B> {
	/// Environment of a script of the given library version run by `this`,
	/// limited to the verifier complexity.
	pub fn new(backend: &'backend B, lib_version: u8, this: Address) -> Result<Self, EvaluationError> {
		let config = Config::for_version(lib_version)?;
		Ok(Self {
			backend,
			config,
			gasometer: Gasometer::new(config.max_verifier_complexity, config),
			this,
			transaction: None,
			transaction_id: None,
			invocation: None,
			state: WrappedState::new(),
			spent_by_callers: 0,
		})
	}

	/// Environment of an account script verifying a transaction.
	pub fn for_transaction(
		backend: &'backend B,
		lib_version: u8,
		this: Address,
		tx: &Transaction,
	) -> Result<Self, EvaluationError> {
		let mut env = Self::new(backend, lib_version, this)?;
		env.transaction = Some(transaction_to_object(backend.scheme(), tx)?.into());
		env.transaction_id = Some(tx.id());
		Ok(env)
	}

	/// Environment of an account script verifying an order.
	pub fn for_order(
		backend: &'backend B,
		lib_version: u8,
		this: Address,
		order: &Order,
	) -> Result<Self, EvaluationError> {
		let mut env = Self::new(backend, lib_version, this)?;
		env.transaction = Some(order_to_object(backend.scheme(), order)?.into());
		Ok(env)
	}

	/// Environment of a callable of `dapp` invoked by a transaction.
	///
	/// The kind of an Ethereum transaction must be resolved beforehand, see
	/// [`guess_ethereum_kind`](super::guess_ethereum_kind).
	pub fn for_invocation(
		backend: &'backend B,
		lib_version: u8,
		dapp: Address,
		tx: &Transaction,
	) -> Result<Self, EvaluationError> {
		let mut env = Self::for_transaction(backend, lib_version, dapp, tx)?;
		env.invocation = Some(invocation_to_object(lib_version, backend.scheme(), tx)?);
		let limit = env.config.max_callable_complexity;
		Ok(env.with_limit(limit))
	}

	/// Replaces the complexity limit of the evaluation.
	#[must_use]
	pub fn with_limit(mut self, limit: u32) -> Self {
		self.gasometer = Gasometer::new(limit, self.config);
		self
	}

	#[must_use]
	pub const fn backend(&self) -> &'backend B {
		self.backend
	}

	#[must_use]
	pub const fn this_address(&self) -> Address {
		self.this
	}

	#[must_use]
	pub const fn lib_version(&self) -> u8 {
		self.config.lib_version
	}

	/// Complexity spent by this evaluation, nested invocations excluded.
	#[must_use]
	pub const fn complexity(&self) -> u32 {
		self.gasometer.used()
	}

	/// Complexity spent by this evaluation and the nested invocations it made.
	#[must_use]
	pub const fn total_complexity(&self) -> u32 {
		self.gasometer.used().saturating_add(self.state.complexity())
	}

	#[must_use]
	pub const fn state(&self) -> &WrappedState {
		&self.state
	}

	#[must_use]
	pub fn into_state(self) -> WrappedState {
		self.state
	}

	fn address_of(&self, alias: &Alias) -> Result<Address, EvaluationError> {
		self.backend
			.resolve_alias(alias)
			.ok_or_else(|| failure(format!("alias '{}' not found", alias)))
	}

	fn current_balance(&self, state: &WrappedState, address: &Address, asset: Option<&H256>) -> Result<i64, EvaluationError> {
		self.backend.balance(address, asset)
			.checked_add(state.balance_diff(address, asset))
			.ok_or_else(|| ErrorKind::RuntimeError.error(format!("balance of {:x} overflows", address)))
	}

	fn load_dapp(&self, dapp: &Address) -> Result<Tree, EvaluationError> {
		let script = self.backend.script(dapp)
			.ok_or_else(|| failure(format!("account {:x} has no script", dapp)))?;
		let tree = deserialize(&script)
			.map_err(|error| failure(format!("failed to load script of {:x}: {}", dapp, error)))?;
		if !tree.is_dapp() || tree.lib_version < 5 {
			return Err(failure(format!(
				"script of {:x} of library version {} cannot be invoked",
				dapp, tree.lib_version
			)))
		}
		Ok(tree)
	}
}

fn attached_payment(value: &Value) -> Result<ScriptPayment, EvaluationError> {
	let object = value.as_object()
		.filter(|object| object.instance() == "AttachedPayment")
		.ok_or_else(|| failure(format!("unexpected payment type '{}'", value.instance_of())))?;
	let asset = match object.get("assetId") {
		None | Some(Value::Unit) => None,
		Some(Value::Bytes(bytes)) if bytes.len() == H256::len_bytes() => Some(H256::from_slice(bytes)),
		Some(other) => return Err(failure(format!("invalid payment asset of type '{}'", other.instance_of()))),
	};
	let amount = object.get("amount")
		.and_then(Value::as_int)
		.ok_or_else(|| failure("payment amount is not Int"))?;
	if amount < 0 {
		return Err(failure(format!("negative payment amount {}", amount)))
	}
	Ok(ScriptPayment { asset, amount })
}

impl<'backend, B: Backend> Handler for Environment<'backend, B> {
	fn config(&self) -> &'static Config {
		self.config
	}

	fn scheme(&self) -> u8 {
		self.backend.scheme()
	}

	fn height(&self) -> u64 {
		self.backend.height()
	}

	fn this(&self) -> Value {
		Value::Address(self.this)
	}

	fn transaction(&self) -> Result<Value, EvaluationError> {
		self.transaction.clone().ok_or_else(|| failure("no transaction in the evaluation context"))
	}

	fn invocation(&self) -> Result<Value, EvaluationError> {
		self.invocation.clone()
			.map(Value::from)
			.ok_or_else(|| failure("no invocation in the evaluation context"))
	}

	fn last_block(&self) -> Result<Value, EvaluationError> {
		self.block_info(self.backend.height())
	}

	fn pre_validate(&mut self, step: Step<'_>) -> Result<(), EvaluationError> {
		self.gasometer.record_step(step)
	}

	fn complexity(&self) -> u32 {
		self.gasometer.used()
	}

	fn resolve_alias(&self, alias: &Alias) -> Result<Address, EvaluationError> {
		self.address_of(alias)
	}

	fn data_entry(&self, address: &Address, key: &str) -> Result<Option<Value>, EvaluationError> {
		let value = match self.state.data_entry(address, key) {
			Some(entry) => entry.value(),
			None => self.backend.data_entry(address, key).and_then(|entry| entry.value()),
		};
		Ok(value)
	}

	fn balance(&self, address: &Address, asset: Option<H256>) -> Result<i64, EvaluationError> {
		self.current_balance(&self.state, address, asset.as_ref())
	}

	fn balance_details(&self, address: &Address) -> Result<Value, EvaluationError> {
		let mut details = self.backend.full_waves_balance(address);
		let diff = self.state.balance_diff(address, None);
		details.available = details.available.saturating_add(diff);
		details.regular = details.regular.saturating_add(diff);
		details.generating = details.generating.saturating_add(diff);
		details.effective = details.effective.saturating_add(diff);
		Ok(balance_details_to_object(&details).into())
	}

	fn asset_info(&self, asset: &H256) -> Result<Value, EvaluationError> {
		match self.backend.asset_info(asset) {
			None => Ok(Value::Unit),
			Some(info) if self.config.lib_version >= 4 => Ok(full_asset_info_to_object(&info)?.into()),
			Some(info) => Ok(asset_info_to_object(&info.info).into()),
		}
	}

	fn block_info(&self, height: u64) -> Result<Value, EvaluationError> {
		match self.backend.block_header(height) {
			Some(header) => Ok(block_info_to_object(self.backend.scheme(), &header)?.into()),
			None => Ok(Value::Unit),
		}
	}

	fn invoke(
		&mut self,
		dapp: &Address,
		function: &str,
		arguments: Vec<Value>,
		payments: Vec<Value>,
	) -> Result<Value, EvaluationError> {
		let chain_limit = max_chain_invoke_complexity(self.config.lib_version)?;
		let parent = self.invocation.as_ref()
			.ok_or_else(|| failure("invoke is only allowed from a callable function"))?;
		let arguments = values_to_arguments(&arguments)
			.map_err(|error| error.wrap(format!("failed to call function '{}'", function)))?;
		let payments = payments.iter().map(attached_payment).collect::<Result<Vec<_>, _>>()?;
		let tree = self.load_dapp(dapp)?;
		let config = Config::for_version(tree.lib_version)?;

		let mut state = self.state.substate(self.config.max_invoke_depth)?;
		for payment in &payments {
			state.transfer(self.this, *dapp, payment.asset, payment.amount)?;
			if self.current_balance(&state, &self.this, payment.asset.as_ref())? < 0 {
				return Err(ErrorKind::RuntimeError.error(format!(
					"not enough balance for payment of {} to {:x}",
					payment.amount, dapp
				)))
			}
		}

		let caller_public_key = self.backend.public_key(&self.this).unwrap_or_else(PublicKey::zero);
		let spent = self.spent_by_callers.saturating_add(self.total_complexity());
		let remaining = chain_limit.saturating_sub(spent);
		let depth = state.depth().unwrap_or_default();
		let mut child = Environment {
			backend: self.backend,
			config,
			gasometer: Gasometer::new(config.max_callable_complexity.min(remaining), config),
			this: *dapp,
			transaction: self.transaction.clone(),
			transaction_id: self.transaction_id,
			invocation: Some(nested_invocation(parent, self.this, &caller_public_key, &payments)),
			state,
			spent_by_callers: spent,
		};

		log::debug!(target: "ride", "invoking {}() of {:x} at depth {}", function, dapp, depth);
		event!(Call { dapp, function, depth });
		match super::run_callable(&mut child, &tree, function, &arguments) {
			Ok(actions) => {
				let complexity = child.complexity();
				event!(Exit { dapp, complexity, succeed: true });
				self.state.merge_succeed(child.into_state(), *dapp, actions, complexity)?;
				Ok(Value::Unit)
			},
			Err(error) => {
				event!(Exit { dapp, complexity: error.complexity(), succeed: false });
				self.state.merge_fail(child.into_state());
				if error.is_classified() {
					Err(error)
				} else {
					Err(error.reclassify(ErrorKind::InternalInvocationError))
				}
			},
		}
	}
}

impl<'backend, B: Backend> ActionEnvironment for Environment<'backend, B> {
	fn scheme(&self) -> u8 {
		self.backend.scheme()
	}

	fn transaction_id(&self) -> Option<H256> {
		self.transaction_id
	}

	fn resolve_alias(&self, alias: &Alias) -> Result<Address, EvaluationError> {
		self.address_of(alias)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloc::collections::BTreeMap;
	use alloc::string::String;
	use alloc::vec;
	use crate::backend::{MemoryAccount, MemoryBackend, MemoryVicinity};
	use crate::proto::{DataEntry, BlockHeader};

	fn address(byte: u8) -> Address {
		Address::from_public_key(b'T', &PublicKey::repeat_byte(byte))
	}

	fn vicinity() -> MemoryVicinity {
		MemoryVicinity {
			scheme: b'T',
			height: 3,
			blocks: vec![BlockHeader { height: 3, timestamp: 77, ..BlockHeader::default() }],
		}
	}

	fn state() -> BTreeMap<Address, MemoryAccount> {
		let mut account = MemoryAccount::default();
		account.balances.insert(None, 500);
		account.data.insert(String::from("k"), DataEntry::Integer { key: String::from("k"), value: 9 });
		vec![(address(1), account)].into_iter().collect()
	}

	#[test]
	fn reads_go_through_the_backend() {
		let vicinity = vicinity();
		let backend = MemoryBackend::new(&vicinity, state());
		let env = Environment::new(&backend, 5, address(1)).unwrap();

		assert_eq!(env.data_entry(&address(1), "k"), Ok(Some(Value::Int(9))));
		assert_eq!(env.data_entry(&address(1), "missing"), Ok(None));
		assert_eq!(Handler::balance(&env, &address(1), None), Ok(500));
		let block = env.last_block().unwrap();
		assert_eq!(block.as_object().and_then(|b| b.get("timestamp")), Some(&Value::Int(77)));
		assert_eq!(env.block_info(4), Ok(Value::Unit));
		assert_eq!(env.asset_info(&H256::zero()), Ok(Value::Unit));
		assert!(env.transaction().is_err());
	}

	#[test]
	fn complexity_limit_is_enforced() {
		let vicinity = vicinity();
		let backend = MemoryBackend::new(&vicinity, BTreeMap::new());
		let mut env = Environment::new(&backend, 3, address(1)).unwrap().with_limit(2);
		env.pre_validate(Step::Constant).unwrap();
		env.pre_validate(Step::Constant).unwrap();
		assert!(env.pre_validate(Step::Constant).is_err());
		assert_eq!(env.complexity(), 3);
	}

	#[test]
	fn invoke_needs_an_invocation_context() {
		let vicinity = vicinity();
		let backend = MemoryBackend::new(&vicinity, state());
		let mut env = Environment::new(&backend, 5, address(1)).unwrap();
		let err = env.invoke(&address(2), "default", vec![], vec![]).unwrap_err();
		assert_eq!(err.message(), "invoke is only allowed from a callable function");

		let mut v4 = Environment::new(&backend, 4, address(1)).unwrap();
		assert_eq!(v4.invoke(&address(2), "default", vec![], vec![]).unwrap_err().kind(), ErrorKind::RuntimeError);
	}

	#[test]
	fn payments_must_be_attached_payments() {
		let payment: Value = Object::new("AttachedPayment")
			.with("assetId", Value::Unit)
			.with("amount", 5_i64)
			.into();
		assert_eq!(attached_payment(&payment), Ok(ScriptPayment { asset: None, amount: 5 }));

		let negative: Value = Object::new("AttachedPayment")
			.with("assetId", Value::Unit)
			.with("amount", -1_i64)
			.into();
		assert!(attached_payment(&negative).is_err());
		assert!(attached_payment(&Value::Int(1)).is_err());
	}
}
