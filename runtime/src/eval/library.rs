use alloc::format;
use alloc::vec::Vec;
use core::convert::TryFrom;
use ride_core::{Address, Alias, ErrorKind, EvaluationError, Object, PublicKey, Recipient, Value};
use super::natives::Native;
use super::{
	arity, expect_bool, expect_bytes, expect_int, expect_list, expect_recipient, expect_string,
	failure, Runtime,
};
use crate::Handler;

/// First id given to standard library functions called by name.
pub const LIBRARY_ID_BASE: u16 = 0x8000;

macro_rules! library {
	( $( $name:literal => ($cost:literal, $since:literal, $function:ident), )* ) => {
		const NAMES: &[&str] = &[ $( $name ),* ];

		/// Looks a standard library function up by name.
		pub(crate) fn function<H: Handler>(name: &str) -> Option<Native<H>> {
			match name {
				$( $name => Some(Native { name: $name, cost: $cost, since: $since, function: $function::<H> }), )*
				_ => None,
			}
		}
	};
}

library! {
	"!" => (1, 1, not),
	"!=" => (1, 1, ne),
	"-" => (1, 1, neg),
	"throw" => (1, 1, terminate),
	"Unit" => (1, 1, unit),
	"isDefined" => (1, 1, is_defined),
	"extract" => (1, 1, extract),
	"value" => (2, 4, extract),
	"valueOrElse" => (2, 4, value_or_else),

	"Address" => (1, 1, address),
	"Alias" => (1, 1, alias),
	"addressFromPublicKey" => (82, 1, address_from_public_key),

	"DataEntry" => (2, 3, data_entry),
	"IntegerEntry" => (2, 4, integer_entry),
	"BooleanEntry" => (2, 4, boolean_entry),
	"BinaryEntry" => (2, 4, binary_entry),
	"StringEntry" => (2, 4, string_entry),
	"DeleteEntry" => (2, 4, delete_entry),

	"ScriptTransfer" => (3, 3, script_transfer),
	"WriteSet" => (1, 3, write_set),
	"TransferSet" => (1, 3, transfer_set),
	"ScriptResult" => (2, 3, script_result),
	"AttachedPayment" => (2, 4, attached_payment),
	"Issue" => (7, 4, issue),
	"Reissue" => (3, 4, reissue),
	"Burn" => (2, 4, burn),
	"SponsorFee" => (2, 4, sponsor_fee),
	"Lease" => (3, 5, lease),
	"LeaseCancel" => (1, 5, lease_cancel),
}

/// Numeric id the compiler uses for a standard library function.
#[must_use]
pub fn library_function_id(name: &str) -> Option<u16> {
	let index = NAMES.iter().position(|candidate| *candidate == name)?;
	u16::try_from(index).ok().map(|index| LIBRARY_ID_BASE + index)
}

fn not<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("!", args, value);
	Ok(Value::Boolean(!expect_bool("!", value)?))
}

fn ne<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("!=", args, a, b);
	Ok(Value::Boolean(a != b))
}

fn neg<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!("-", args, value);
	Ok(Value::Int(checked_or_fail!("-", value.checked_neg())))
}

fn terminate<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	if !args.is_empty() {
		return Err(arity("throw", 0, args.len()))
	}
	Err(ErrorKind::UserError.error("explicit script termination"))
}

fn unit<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	if !args.is_empty() {
		return Err(arity("Unit", 0, args.len()))
	}
	Ok(Value::Unit)
}

fn is_defined<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("isDefined", args, value);
	Ok(Value::Boolean(!value.is_unit()))
}

fn extract<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("value", args, value);
	if value.is_unit() {
		return Err(failure("value() called on unit value"))
	}
	Ok(value)
}

fn value_or_else<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("valueOrElse", args, value, default);
	Ok(if value.is_unit() { default } else { value })
}

fn address<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_bytes!("Address", args, bytes);
	let address = Address::from_bytes(&bytes)
		.ok_or_else(|| failure(format!("invalid address of {} bytes", bytes.len())))?;
	Ok(Value::Address(address))
}

fn alias<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("Alias", args, name);
	let alias = Alias::new(rt.handler.scheme(), &expect_string("Alias", name)?);
	Ok(Value::Recipient(Recipient::Alias(alias)))
}

fn address_from_public_key<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_bytes!("addressFromPublicKey", args, key);
	if key.len() != PublicKey::len_bytes() {
		return Err(failure(format!("invalid public key of {} bytes", key.len())))
	}
	let address = Address::from_public_key(rt.handler.scheme(), &PublicKey::from_slice(&key));
	Ok(Value::Address(address))
}

fn entry(instance: &str, name: &str, key: Value, value: Value) -> Result<Value, EvaluationError> {
	let key = expect_string(name, key)?;
	Ok(Object::new(instance).with("key", key).with("value", value).into())
}

fn data_entry<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("DataEntry", args, key, value);
	match value {
		Value::Int(_) | Value::Boolean(_) | Value::Bytes(_) | Value::String(_) => entry("DataEntry", "DataEntry", key, value),
		other => Err(ErrorKind::Undefined.error(format!(
			"DataEntry: unsupported value type {}", other.instance_of()
		))),
	}
}

fn integer_entry<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("IntegerEntry", args, key, value);
	let value = expect_int("IntegerEntry", value)?;
	entry("IntegerEntry", "IntegerEntry", key, Value::Int(value))
}

fn boolean_entry<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("BooleanEntry", args, key, value);
	let value = expect_bool("BooleanEntry", value)?;
	entry("BooleanEntry", "BooleanEntry", key, Value::Boolean(value))
}

fn binary_entry<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("BinaryEntry", args, key, value);
	let value = expect_bytes("BinaryEntry", value)?;
	entry("BinaryEntry", "BinaryEntry", key, Value::Bytes(value))
}

fn string_entry<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("StringEntry", args, key, value);
	let value = expect_string("StringEntry", value)?;
	entry("StringEntry", "StringEntry", key, Value::String(value))
}

fn delete_entry<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("DeleteEntry", args, key);
	let key = expect_string("DeleteEntry", key)?;
	Ok(Object::new("DeleteEntry").with("key", key).into())
}

fn script_transfer<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("ScriptTransfer", args, recipient, amount, asset);
	let recipient = expect_recipient("ScriptTransfer", recipient)?;
	let amount = expect_int("ScriptTransfer", amount)?;
	Ok(Object::new("ScriptTransfer")
		.with("recipient", Value::Recipient(recipient))
		.with("amount", amount)
		.with("asset", asset)
		.into())
}

fn write_set<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("WriteSet", args, data);
	let data = expect_list("WriteSet", data)?;
	Ok(Object::new("WriteSet").with("data", Value::List(data)).into())
}

fn transfer_set<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("TransferSet", args, transfers);
	let transfers = expect_list("TransferSet", transfers)?;
	Ok(Object::new("TransferSet").with("transfers", Value::List(transfers)).into())
}

fn script_result<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("ScriptResult", args, write_set, transfer_set);
	Ok(Object::new("ScriptResult")
		.with("writeSet", write_set)
		.with("transferSet", transfer_set)
		.into())
}

fn attached_payment<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("AttachedPayment", args, asset, amount);
	let amount = expect_int("AttachedPayment", amount)?;
	Ok(Object::new("AttachedPayment").with("assetId", asset).with("amount", amount).into())
}

/// `Issue(name, description, quantity, decimals, isReissuable[, compiledScript[, nonce]])`
fn issue<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	if !(5..=7).contains(&args.len()) {
		return Err(arity("Issue", 7, args.len()))
	}
	let mut args = args.into_iter();
	let mut next = || args.next().unwrap_or(Value::Unit);
	let name = expect_string("Issue", next())?;
	let description = expect_string("Issue", next())?;
	let quantity = expect_int("Issue", next())?;
	let decimals = expect_int("Issue", next())?;
	let reissuable = expect_bool("Issue", next())?;
	let script = next();
	let nonce = match next() {
		Value::Unit => 0,
		other => expect_int("Issue", other)?,
	};
	Ok(Object::new("Issue")
		.with("name", name)
		.with("description", description)
		.with("quantity", quantity)
		.with("decimals", decimals)
		.with("isReissuable", reissuable)
		.with("compiledScript", script)
		.with("nonce", nonce)
		.into())
}

fn reissue<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("Reissue", args, asset, quantity, reissuable);
	let asset = expect_bytes("Reissue", asset)?;
	let quantity = expect_int("Reissue", quantity)?;
	let reissuable = expect_bool("Reissue", reissuable)?;
	Ok(Object::new("Reissue")
		.with("assetId", asset)
		.with("quantity", quantity)
		.with("isReissuable", reissuable)
		.into())
}

fn burn<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("Burn", args, asset, quantity);
	let asset = expect_bytes("Burn", asset)?;
	let quantity = expect_int("Burn", quantity)?;
	Ok(Object::new("Burn").with("assetId", asset).with("quantity", quantity).into())
}

fn sponsor_fee<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("SponsorFee", args, asset, fee);
	let asset = expect_bytes("SponsorFee", asset)?;
	Ok(Object::new("SponsorFee").with("assetId", asset).with("minSponsoredAssetFee", fee).into())
}

/// `Lease(recipient, amount[, nonce])`
fn lease<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	if !(2..=3).contains(&args.len()) {
		return Err(arity("Lease", 3, args.len()))
	}
	let mut args = args.into_iter();
	let mut next = || args.next().unwrap_or(Value::Unit);
	let recipient = expect_recipient("Lease", next())?;
	let amount = expect_int("Lease", next())?;
	let nonce = match next() {
		Value::Unit => 0,
		other => expect_int("Lease", other)?,
	};
	Ok(Object::new("Lease")
		.with("recipient", Value::Recipient(recipient))
		.with("amount", amount)
		.with("nonce", nonce)
		.into())
}

fn lease_cancel<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_bytes!("LeaseCancel", args, id);
	Ok(Object::new("LeaseCancel").with("leaseId", id).into())
}
