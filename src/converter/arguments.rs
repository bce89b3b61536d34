use alloc::format;
use alloc::vec::Vec;
use ride_core::{EvaluationError, Value};
use ride_ethabi::{DataType, DecodedCallData};
use crate::proto::Argument;
use super::failure;

/// Value a callable receives for a transaction argument.
#[must_use]
pub fn argument_to_value(argument: &Argument) -> Value {
	match argument {
		Argument::Integer(value) => Value::Int(*value),
		Argument::Boolean(value) => Value::Boolean(*value),
		Argument::String(value) => Value::String(value.clone()),
		Argument::Binary(value) => Value::Bytes(value.clone()),
		Argument::List(items) => Value::List(items.iter().map(argument_to_value).collect()),
	}
}

/// Argument of a nested invocation, only plain values and lists of them are accepted.
pub fn value_to_argument(value: &Value) -> Result<Argument, EvaluationError> {
	match value {
		Value::Int(value) => Ok(Argument::Integer(*value)),
		Value::Boolean(value) => Ok(Argument::Boolean(*value)),
		Value::String(value) => Ok(Argument::String(value.clone())),
		Value::Bytes(value) => Ok(Argument::Binary(value.clone())),
		Value::List(items) => items.iter()
			.map(value_to_argument)
			.collect::<Result<Vec<_>, _>>()
			.map(Argument::List),
		other => Err(failure(format!("unknown argument type '{}'", other.instance_of()))),
	}
}

/// RIDE value of a decoded ABI value.
#[must_use]
pub fn data_type_to_value(data: &DataType) -> Value {
	match data {
		DataType::Int(value) => Value::Int(*value),
		DataType::BigInt(value) => Value::BigInt(value.clone()),
		DataType::Bool(value) => Value::Boolean(*value),
		DataType::String(value) => Value::String(value.clone()),
		DataType::Bytes(value) => Value::Bytes(value.clone()),
		DataType::List(items) => Value::List(items.iter().map(data_type_to_value).collect()),
	}
}

/// Transaction arguments of ABI-decoded call data.
pub fn decoded_arguments(data: &DecodedCallData) -> Result<Vec<Argument>, EvaluationError> {
	data.values()
		.enumerate()
		.map(|(index, value)| {
			value_to_argument(&data_type_to_value(value)).map_err(|error| {
				error.wrap(format!(
					"failed to convert argument {} of '{}'",
					index + 1,
					data.name
				))
			})
		})
		.collect()
}

/// Arguments converted one by one, the first failure names its position.
pub(crate) fn values_to_arguments(values: &[Value]) -> Result<Vec<Argument>, EvaluationError> {
	values.iter()
		.enumerate()
		.map(|(index, value)| {
			value_to_argument(value).map_err(|error| {
				error.wrap(format!("invalid argument {}", index + 1))
			})
		})
		.collect()
}
