//! # Converter
//!
//! Projection of transactions, orders and chain data into RIDE objects, and
//! of the objects a dApp returns back into [`ScriptAction`](crate::proto::ScriptAction)s.
//!
//! Objects carry their instance tag and the field names scripts read, so a
//! `TransferTransaction` built here answers `tx.amount` the way the script
//! expects.

mod actions;
mod arguments;
mod objects;

use alloc::string::String;
use ride_core::{ErrorKind, EvaluationError, Value};

pub use self::actions::{
	convert_to_action, generate_issue_id, generate_lease_id, object_to_actions, ActionEnvironment,
	IssueFields,
};
pub use self::arguments::{
	argument_to_value, data_type_to_value, decoded_arguments, value_to_argument,
};
pub use self::objects::{
	asset_info_to_object, attached_payment_to_object, balance_details_to_object,
	block_info_to_object, data_entry_to_object, full_asset_info_to_object, invocation_to_object,
	order_to_object, script_transfer_to_object, transaction_to_object,
};

pub(crate) use self::arguments::values_to_arguments;
pub(crate) use self::objects::nested_invocation;

pub(crate) fn failure<M: Into<String>>(message: M) -> EvaluationError {
	ErrorKind::EvaluationFailure.error(message)
}

pub(crate) fn unexpected(value: &Value) -> EvaluationError {
	failure(alloc::format!("unexpected type '{}'", value.instance_of()))
}
