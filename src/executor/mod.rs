//! Script execution against a [`Backend`].
//!
//! [`call_verifier`] runs the verifier of an account script or dApp.
//! [`call_function`] runs a callable and collects the actions of the whole
//! invocation chain, together with the complexity spent on it. Failures
//! carry the spent complexity so the caller can still charge for it.

mod environment;
mod state;

pub use self::environment::Environment;
pub use self::state::WrappedState;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use ride_core::{ErrorKind, EvaluationError, Tree, Value};
use ride_ethabi::MethodsMap;
use ride_runtime::{max_chain_invoke_complexity, Runtime};
use crate::backend::Backend;
use crate::converter::{argument_to_value, decoded_arguments, failure, object_to_actions};
use crate::proto::{
	Argument, EthereumTransaction, EthereumTransactionKind, InvokeAction, ScriptAction, Transaction,
};
use crate::serialization::deserialize;

/// Outcome of a verifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifierResult {
	pub approved: bool,
	pub complexity: u32,
}

/// Outcome of a callable and of the invocations it made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DAppResult {
	/// Actions of nested invocations first, then the callable's own.
	pub actions: Vec<InvokeAction>,
	pub complexity: u32,
}

fn check_version<B: Backend>(env: &Environment<'_, B>, tree: &Tree) -> Result<(), EvaluationError> {
	if env.lib_version() != tree.lib_version {
		return Err(ErrorKind::RuntimeError.error(format!(
			"script of library version {} in an environment of version {}",
			tree.lib_version,
			env.lib_version()
		)))
	}
	Ok(())
}

/// Runs the verifier of a script.
pub fn call_verifier<B: Backend>(env: &mut Environment<'_, B>, tree: &Tree) -> Result<VerifierResult, EvaluationError> {
	check_version(env, tree)?;
	let this = env.this_address();
	log::debug!(target: "ride", "verifying with the script of {:x}", this);
	event!(Verify { this: &this });

	let result = Runtime::new(&mut *env).evaluate_verifier(tree);
	let complexity = env.complexity();
	let value = result.map_err(|error| {
		let error = if error.is_classified() { error } else { error.reclassify(ErrorKind::RuntimeError) };
		error.wrap("failed to call verifier").with_complexity(complexity)
	})?;
	match value {
		Value::Boolean(approved) => {
			log::debug!(target: "ride", "verifier of {:x} returned {} at complexity {}", this, approved, complexity);
			Ok(VerifierResult { approved, complexity })
		},
		other => Err(failure(format!("verifier returned {} instead of Boolean", other.instance_of()))
			.with_complexity(complexity)),
	}
}

fn is_dapp_result(lib_version: u8, value: &Value) -> bool {
	match value {
		Value::List(_) => lib_version >= 4,
		Value::Object(object) => {
			lib_version == 3 && matches!(object.instance(), "WriteSet" | "TransferSet" | "ScriptResult")
		},
		_ => false,
	}
}

fn check_limits<B: Backend>(env: &Environment<'_, B>, actions: &[ScriptAction]) -> Result<(), EvaluationError> {
	let config = ride_runtime::Handler::config(env);
	let data = actions.iter().filter(|action| action.is_data()).count();
	let other = actions.len() - data;
	if data > config.max_data_entries {
		return Err(ErrorKind::RuntimeError.error(format!(
			"too many data entries: {} > {}", data, config.max_data_entries
		)))
	}
	if other > config.max_actions {
		return Err(ErrorKind::RuntimeError.error(format!(
			"too many actions: {} > {}", other, config.max_actions
		)))
	}
	Ok(())
}

/// Evaluates a callable and converts its result, without merging anything.
/// Errors carry the complexity of the callable and of its nested invocations.
pub(crate) fn run_callable<B: Backend>(
	env: &mut Environment<'_, B>,
	tree: &Tree,
	name: &str,
	arguments: &[Argument],
) -> Result<Vec<ScriptAction>, EvaluationError> {
	let name = if name.is_empty() { "default" } else { name };
	check_version(env, tree)?;
	let values = arguments.iter().map(argument_to_value).collect();

	let result = Runtime::new(&mut *env).evaluate_function(tree, name, values);
	let spent = env.total_complexity();
	let value = result.map_err(|error| {
		let error = if error.is_classified() { error } else { error.wrap("unhandled error") };
		error.with_complexity(spent)
	})?;
	if !is_dapp_result(tree.lib_version, &value) {
		return Err(failure(format!(
			"invalid result of call function '{}': {}",
			name,
			value.instance_of()
		)).with_complexity(spent))
	}
	let actions = object_to_actions(&*env, &value).map_err(|error| error.with_complexity(spent))?;
	check_limits(env, &actions).map_err(|error| error.with_complexity(spent))?;
	Ok(actions)
}

/// Runs a callable of a dApp; an empty name calls the default function.
pub fn call_function<B: Backend>(
	env: &mut Environment<'_, B>,
	tree: &Tree,
	name: &str,
	arguments: &[Argument],
) -> Result<DAppResult, EvaluationError> {
	let dapp = env.this_address();
	log::debug!(target: "ride", "calling {}() of {:x}", name, dapp);
	event!(Call { dapp: &dapp, function: name, depth: 0 });

	let local = run_callable(env, tree, name, arguments)?;
	let own = local.into_iter().map(|action| InvokeAction { dapp, action });
	if tree.lib_version < 5 {
		let complexity = env.complexity();
		event!(Exit { dapp: &dapp, complexity, succeed: true });
		return Ok(DAppResult { actions: own.collect(), complexity })
	}

	let complexity = env.total_complexity();
	let limit = max_chain_invoke_complexity(tree.lib_version)?;
	if complexity > limit {
		return Err(ErrorKind::RuntimeError.error(format!(
			"evaluation complexity {} exceeds {} limit for library version {}",
			complexity, limit, tree.lib_version
		)).with_complexity(complexity))
	}
	let mut actions = env.state().actions().to_vec();
	actions.extend(own);
	log::debug!(target: "ride", "{}() of {:x} produced {} actions at complexity {}", name, dapp, actions.len(), complexity);
	event!(Exit { dapp: &dapp, complexity, succeed: true });
	Ok(DAppResult { actions, complexity })
}

/// Determines what an Ethereum transaction does, once.
///
/// Empty call data transfers the native token. An ERC-20 `transfer` to the
/// Ethereum address of a known asset transfers that asset. Anything else
/// invokes the dApp at the destination, decoded against its callables.
pub fn guess_ethereum_kind<'tx, B: Backend>(
	backend: &B,
	tx: &'tx EthereumTransaction,
) -> Result<&'tx EthereumTransactionKind, EvaluationError> {
	tx.kind_or_try_init(|| {
		let to = tx.inner().to().ok_or_else(|| failure("contract creation is not supported"))?;
		let data = tx.inner().data();
		if data.is_empty() {
			return Ok(EthereumTransactionKind::TransferWaves)
		}

		let erc20 = MethodsMap::erc20();
		if let Ok(decoded) = erc20.parse_call_data(data) {
			if let Some(asset) = backend.asset_by_ethereum_address(to) {
				return EthereumTransactionKind::erc20_transfer(asset, decoded)
					.map_err(|error| failure(format!("invalid ERC-20 transfer: {}", error)))
			}
		}

		let dapp = ride_core::Address::from_ethereum(backend.scheme(), to);
		let script = backend.script(&dapp)
			.ok_or_else(|| failure(format!("account {:x} has no script", dapp)))?;
		let tree = deserialize(&script)
			.map_err(|error| failure(format!("failed to load script of {:x}: {}", dapp, error)))?;
		let meta = tree.meta.as_ref()
			.ok_or_else(|| failure(format!("script of {:x} is not a dApp", dapp)))?;
		let decoded = MethodsMap::from_dapp_meta(meta, true)
			.and_then(|methods| methods.parse_call_data(data))
			.map_err(|error| failure(format!("failed to decode call data: {}", error)))?;
		Ok(EthereumTransactionKind::InvokeScript(decoded))
	})
}

/// Callable name and arguments of an invoking transaction.
pub fn callable_of(tx: &Transaction) -> Result<(String, Vec<Argument>), EvaluationError> {
	match tx {
		Transaction::InvokeScript(invoke) => {
			Ok((invoke.body.function.clone(), invoke.body.arguments.clone()))
		},
		Transaction::Ethereum(ethereum) => match ethereum.kind() {
			Some(EthereumTransactionKind::InvokeScript(data)) => {
				let arguments = decoded_arguments(data)
					.map_err(|error| error.wrap(format!("failed to call function '{}'", data.name)))?;
				Ok((data.name.clone(), arguments))
			},
			_ => Err(failure("ethereum transaction does not invoke a callable")),
		},
		other => Err(failure(format!("{} transaction does not invoke a callable", other.type_name()))),
	}
}
