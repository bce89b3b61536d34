use alloc::vec::Vec;
use ride_core::{Address, Alias, EvaluationError, H256, Value};
use crate::Config;

/// Unit of evaluation work charged against the complexity limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step<'a> {
	/// Literal.
	Constant,
	/// Let binding.
	Let(&'a str),
	/// Name lookup.
	Reference(&'a str),
	/// If-then-else.
	Conditional,
	/// Field access.
	Property(&'a str),
	/// Call of a built-in with its catalogue cost.
	Native { name: &'static str, cost: u32 },
	/// Call of a function declared in the script.
	UserFunction(&'a str),
}

/// Environment of an evaluation.
pub trait Handler {
	/// Constants of the evaluated library version.
	fn config(&self) -> &'static Config;
	/// Chain scheme byte.
	fn scheme(&self) -> u8;
	/// Current blockchain height.
	fn height(&self) -> u64;
	/// Address of the evaluated account or dApp.
	fn this(&self) -> Value;
	/// The transaction or order being verified.
	fn transaction(&self) -> Result<Value, EvaluationError>;
	/// Invocation context of a callable.
	fn invocation(&self) -> Result<Value, EvaluationError>;
	/// Info of the last block.
	fn last_block(&self) -> Result<Value, EvaluationError>;

	/// Charges a step, failing when a limit is exceeded.
	fn pre_validate(&mut self, step: Step<'_>) -> Result<(), EvaluationError>;
	/// Complexity spent so far by this evaluation.
	fn complexity(&self) -> u32;

	fn resolve_alias(&self, alias: &Alias) -> Result<Address, EvaluationError>;
	/// Data entry value of an account, `None` when absent.
	fn data_entry(&self, address: &Address, key: &str) -> Result<Option<Value>, EvaluationError>;
	/// Balance in the given asset, `None` for the native token.
	fn balance(&self, address: &Address, asset: Option<H256>) -> Result<i64, EvaluationError>;
	/// `BalanceDetails` object of an account.
	fn balance_details(&self, address: &Address) -> Result<Value, EvaluationError>;
	/// `Asset` object, or `Unit` when the asset is unknown.
	fn asset_info(&self, asset: &H256) -> Result<Value, EvaluationError>;
	/// `BlockInfo` object, or `Unit` when the height is not reached.
	fn block_info(&self, height: u64) -> Result<Value, EvaluationError>;

	/// Invokes a callable of another dApp.
	fn invoke(
		&mut self,
		dapp: &Address,
		function: &str,
		arguments: Vec<Value>,
		payments: Vec<Value>,
	) -> Result<Value, EvaluationError>;
}
