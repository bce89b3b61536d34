use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::convert::TryFrom;
use ride_core::{keccak256, ErrorKind, EvaluationError, Recipient, Value, H256};
use super::{expect_list, expect_recipient, expect_string, failure, Runtime};
use crate::tracing::Event;
use crate::Handler;

pub(crate) type NativeFunction<H> = fn(&mut Runtime<'_, H>, Vec<Value>) -> Result<Value, EvaluationError>;

/// Catalogue entry of a built-in function.
pub(crate) struct Native<H> {
	pub name: &'static str,
	pub cost: u32,
	/// First library version the function is available in.
	pub since: u8,
	pub function: NativeFunction<H>,
}

macro_rules! catalogue {
	( $( $id:literal => ($name:literal, $cost:literal, $since:literal, $function:ident), )* ) => {
		/// Looks a built-in function up by its numeric id.
		pub(crate) fn native<H: Handler>(id: u16) -> Option<Native<H>> {
			match id {
				$( $id => Some(Native { name: $name, cost: $cost, since: $since, function: $function::<H> }), )*
				_ => None,
			}
		}

		/// Name of a built-in function, for diagnostics.
		#[must_use]
		pub fn native_name(id: u16) -> Option<&'static str> {
			match id {
				$( $id => Some($name), )*
				_ => None,
			}
		}
	};
}

catalogue! {
	0 => ("==", 1, 1, eq),
	1 => ("_isInstanceOf", 1, 1, instance_of),
	2 => ("throw", 1, 1, throw),

	100 => ("+", 1, 1, sum_long),
	101 => ("-", 1, 1, sub_long),
	102 => (">", 1, 1, gt_long),
	103 => (">=", 1, 1, ge_long),
	104 => ("*", 1, 1, mul_long),
	105 => ("/", 1, 1, div_long),
	106 => ("%", 1, 1, mod_long),
	107 => ("fraction", 1, 1, fraction),

	200 => ("size", 1, 1, size_bytes),
	201 => ("take", 1, 1, take_bytes),
	202 => ("drop", 1, 1, drop_bytes),
	203 => ("+", 10, 1, concat_bytes),

	300 => ("+", 10, 1, concat_strings),
	303 => ("take", 1, 1, take_string),
	304 => ("drop", 1, 1, drop_string),
	305 => ("size", 1, 1, size_string),

	400 => ("size", 2, 1, size_list),
	401 => ("getElement", 2, 1, get_element),
	410 => ("toBytes", 1, 1, int_to_bytes),
	411 => ("toBytes", 1, 1, string_to_bytes),
	412 => ("toBytes", 1, 1, bool_to_bytes),
	420 => ("toString", 1, 1, int_to_string),
	421 => ("toString", 1, 1, bool_to_string),

	501 => ("keccak256", 10, 1, keccak),

	1003 => ("assetBalance", 100, 1, asset_balance),
	1004 => ("assetInfo", 100, 3, asset_info),
	1005 => ("blockInfoByHeight", 100, 3, block_info_by_height),
	1011 => ("wavesBalance", 100, 4, waves_balance),
	1020 => ("invoke", 75, 5, invoke),
	1021 => ("reentrantInvoke", 75, 5, invoke),

	1050 => ("getInteger", 100, 1, get_integer),
	1051 => ("getBoolean", 100, 1, get_boolean),
	1052 => ("getBinary", 100, 1, get_binary),
	1053 => ("getString", 100, 1, get_string),
	1060 => ("addressFromRecipient", 100, 1, address_from_recipient),

	1100 => ("cons", 2, 1, cons),
	1101 => (":+", 1, 4, append),
	1102 => ("++", 4, 4, concat_lists),
}

fn normalize(value: Value) -> Value {
	match value {
		Value::Recipient(Recipient::Address(address)) => Value::Address(address),
		other => other,
	}
}

fn eq<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("==", args, a, b);
	Ok(Value::Boolean(normalize(a) == normalize(b)))
}

fn instance_of<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("_isInstanceOf", args, value, name);
	let name = expect_string("_isInstanceOf", name)?;
	Ok(Value::Boolean(value.instance_of() == name))
}

fn throw<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("throw", args, message);
	Err(ErrorKind::UserError.error(expect_string("throw", message)?))
}

fn sum_long<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!("+", args, a, b);
	Ok(Value::Int(checked_or_fail!("+", a.checked_add(b))))
}

fn sub_long<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!("-", args, a, b);
	Ok(Value::Int(checked_or_fail!("-", a.checked_sub(b))))
}

fn gt_long<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!(">", args, a, b);
	Ok(Value::Boolean(a > b))
}

fn ge_long<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!(">=", args, a, b);
	Ok(Value::Boolean(a >= b))
}

fn mul_long<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!("*", args, a, b);
	Ok(Value::Int(checked_or_fail!("*", a.checked_mul(b))))
}

fn division_by_zero(name: &str) -> EvaluationError {
	ErrorKind::RuntimeError.error(format!("{}: division by zero", name))
}

/// Division rounding toward negative infinity.
fn div_long<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!("/", args, a, b);
	if b == 0 {
		return Err(division_by_zero("/"))
	}
	let quotient = checked_or_fail!("/", a.checked_div(b));
	if a % b != 0 && (a < 0) != (b < 0) {
		Ok(Value::Int(quotient - 1))
	} else {
		Ok(Value::Int(quotient))
	}
}

/// Remainder with the sign of the divisor.
fn mod_long<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!("%", args, a, b);
	if b == 0 {
		return Err(division_by_zero("%"))
	}
	let remainder = a.wrapping_rem(b);
	if remainder != 0 && (remainder < 0) != (b < 0) {
		Ok(Value::Int(remainder + b))
	} else {
		Ok(Value::Int(remainder))
	}
}

/// `a * b / c` without intermediate overflow.
fn fraction<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!("fraction", args, a, b, c);
	if c == 0 {
		return Err(division_by_zero("fraction"))
	}
	let result = i128::from(a) * i128::from(b) / i128::from(c);
	Ok(Value::Int(checked_or_fail!("fraction", i64::try_from(result).ok())))
}

/// Clamps a length argument into `0..=len`.
fn clamp(n: i64, len: usize) -> usize {
	usize::try_from(n.max(0)).map_or(len, |n| n.min(len))
}

fn len_value(len: usize) -> Value {
	Value::Int(i64::try_from(len).unwrap_or(i64::MAX))
}

fn size_bytes<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_bytes!("size", args, bytes);
	Ok(len_value(bytes.len()))
}

fn take_bytes<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("take", args, bytes, n);
	let mut bytes = super::expect_bytes("take", bytes)?;
	let n = clamp(super::expect_int("take", n)?, bytes.len());
	bytes.truncate(n);
	Ok(Value::Bytes(bytes))
}

fn drop_bytes<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("drop", args, bytes, n);
	let bytes = super::expect_bytes("drop", bytes)?;
	let n = clamp(super::expect_int("drop", n)?, bytes.len());
	Ok(Value::bytes(&bytes[n..]))
}

fn concat_bytes<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_bytes!("+", args, a, b);
	let max = rt.handler.config().max_bytes_size;
	if a.len().checked_add(b.len()).map_or(true, |size| size > max) {
		return Err(ErrorKind::RuntimeError.error(format!("byte vector exceeds {} bytes", max)))
	}
	let mut out = a;
	out.extend_from_slice(&b);
	Ok(Value::Bytes(out))
}

fn concat_strings<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("+", args, a, b);
	let mut a = expect_string("+", a)?;
	let b = expect_string("+", b)?;
	let max = rt.handler.config().max_bytes_size;
	if a.len().checked_add(b.len()).map_or(true, |size| size > max) {
		return Err(ErrorKind::RuntimeError.error(format!("string exceeds {} bytes", max)))
	}
	a.push_str(&b);
	Ok(Value::String(a))
}

fn take_string<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("take", args, string, n);
	let string = expect_string("take", string)?;
	let n = clamp(super::expect_int("take", n)?, string.chars().count());
	Ok(Value::String(string.chars().take(n).collect()))
}

fn drop_string<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("drop", args, string, n);
	let string = expect_string("drop", string)?;
	let n = clamp(super::expect_int("drop", n)?, string.chars().count());
	Ok(Value::String(string.chars().skip(n).collect()))
}

fn size_string<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("size", args, string);
	Ok(len_value(expect_string("size", string)?.chars().count()))
}

fn size_list<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("size", args, list);
	Ok(len_value(expect_list("size", list)?.len()))
}

fn get_element<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("getElement", args, list, index);
	let mut list = expect_list("getElement", list)?;
	let index = super::expect_int("getElement", index)?;
	let len = list.len();
	match usize::try_from(index) {
		Ok(index) if index < len => Ok(list.swap_remove(index)),
		_ => Err(ErrorKind::RuntimeError.error(format!(
			"index {} out of bounds for list of size {}", index, len
		))),
	}
}

fn check_list_size<H: Handler>(rt: &Runtime<'_, H>, len: usize) -> Result<(), EvaluationError> {
	let max = rt.handler.config().max_list_size;
	if len > max {
		return Err(ErrorKind::RuntimeError.error(format!("list exceeds {} elements", max)))
	}
	Ok(())
}

fn cons<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("cons", args, head, tail);
	let tail = expect_list("cons", tail)?;
	check_list_size(rt, tail.len() + 1)?;
	let mut list = Vec::with_capacity(tail.len() + 1);
	list.push(head);
	list.extend(tail);
	Ok(Value::List(list))
}

fn append<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!(":+", args, list, element);
	let mut list = expect_list(":+", list)?;
	check_list_size(rt, list.len() + 1)?;
	list.push(element);
	Ok(Value::List(list))
}

fn concat_lists<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("++", args, a, b);
	let mut a = expect_list("++", a)?;
	let b = expect_list("++", b)?;
	check_list_size(rt, a.len() + b.len())?;
	a.extend(b);
	Ok(Value::List(a))
}

fn int_to_bytes<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!("toBytes", args, value);
	Ok(Value::bytes(&value.to_be_bytes()))
}

fn string_to_bytes<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("toBytes", args, value);
	Ok(Value::Bytes(expect_string("toBytes", value)?.into_bytes()))
}

fn bool_to_bytes<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("toBytes", args, value);
	let value = super::expect_bool("toBytes", value)?;
	Ok(Value::bytes(&[u8::from(value)]))
}

fn int_to_string<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!("toString", args, value);
	Ok(Value::String(value.to_string()))
}

fn bool_to_string<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("toString", args, value);
	Ok(Value::String(super::expect_bool("toString", value)?.to_string()))
}

fn keccak<H: Handler>(_: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_bytes!("keccak256", args, data);
	Ok(Value::bytes(keccak256(&data).as_bytes()))
}

fn asset_id(name: &str, value: Value) -> Result<Option<H256>, EvaluationError> {
	match value {
		Value::Unit => Ok(None),
		Value::Bytes(bytes) if bytes.len() == H256::len_bytes() => Ok(Some(H256::from_slice(&bytes))),
		Value::Bytes(bytes) => Err(failure(format!("{}: invalid asset id of {} bytes", name, bytes.len()))),
		other => Err(ErrorKind::Undefined.error(format!(
			"{}: expected ByteVector|Unit, got {}", name, other.instance_of()
		))),
	}
}

fn asset_balance<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("assetBalance", args, recipient, asset);
	let address = rt.address(expect_recipient("assetBalance", recipient)?)?;
	let asset = asset_id("assetBalance", asset)?;
	Ok(Value::Int(rt.handler.balance(&address, asset)?))
}

fn waves_balance<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("wavesBalance", args, recipient);
	let address = rt.address(expect_recipient("wavesBalance", recipient)?)?;
	rt.handler.balance_details(&address)
}

fn asset_info<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("assetInfo", args, asset);
	match asset_id("assetInfo", asset)? {
		Some(asset) => rt.handler.asset_info(&asset),
		None => Ok(Value::Unit),
	}
}

fn block_info_by_height<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop_int!("blockInfoByHeight", args, height);
	match u64::try_from(height) {
		Ok(height) => rt.handler.block_info(height),
		Err(_) => Ok(Value::Unit),
	}
}

/// Reads a data entry, yielding `Unit` when it is absent or of another type.
fn state_read<H: Handler>(
	rt: &mut Runtime<'_, H>,
	name: &str,
	instance: &str,
	args: Vec<Value>,
) -> Result<Value, EvaluationError> {
	pop!(name, args, recipient, key);
	let address = rt.address(expect_recipient(name, recipient)?)?;
	let key = expect_string(name, key)?;
	let value = rt.handler.data_entry(&address, &key)?;
	Event::StateRead { key: &key, value: value.as_ref() }.emit();
	Ok(value.filter(|value| value.instance_of() == instance).unwrap_or(Value::Unit))
}

fn get_integer<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	state_read(rt, "getInteger", "Int", args)
}

fn get_boolean<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	state_read(rt, "getBoolean", "Boolean", args)
}

fn get_binary<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	state_read(rt, "getBinary", "ByteVector", args)
}

fn get_string<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	state_read(rt, "getString", "String", args)
}

fn address_from_recipient<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("addressFromRecipient", args, recipient);
	let address = rt.address(expect_recipient("addressFromRecipient", recipient)?)?;
	Ok(Value::Address(address))
}

/// Calls a callable of another dApp; the callee's result is not returned to the script.
fn invoke<H: Handler>(rt: &mut Runtime<'_, H>, args: Vec<Value>) -> Result<Value, EvaluationError> {
	pop!("invoke", args, dapp, function, arguments, payments);
	let dapp = rt.address(expect_recipient("invoke", dapp)?)?;
	let function: String = match function {
		Value::Unit => "default".into(),
		other => expect_string("invoke", other)?,
	};
	let arguments = expect_list("invoke", arguments)?;
	let payments = expect_list("invoke", payments)?;
	Event::Invoke { function: &function }.emit();
	rt.handler.invoke(&dapp, &function, arguments, payments)?;
	Ok(Value::Unit)
}
