//! RIDE runtime values.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use num_bigint::BigInt;
use crate::{Address, Recipient};

/// Value produced or consumed while evaluating a script.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
	Int(i64),
	BigInt(BigInt),
	Boolean(bool),
	String(String),
	Bytes(#[cfg_attr(feature = "with-serde", serde(with = "serde_bytes"))] Vec<u8>),
	List(Vec<Value>),
	Object(Object),
	Unit,
	Address(Address),
	Recipient(Recipient),
}

impl Value {
	/// Name of the RIDE type of the value, as seen by `instanceOf` and error messages.
	#[must_use]
	pub fn instance_of(&self) -> &str {
		match self {
			Self::Int(_) => "Int",
			Self::BigInt(_) => "BigInt",
			Self::Boolean(_) => "Boolean",
			Self::String(_) => "String",
			Self::Bytes(_) => "ByteVector",
			Self::List(_) => "List[Any]",
			Self::Object(object) => object.instance(),
			Self::Unit => "Unit",
			Self::Address(_) => "Address",
			Self::Recipient(Recipient::Address(_)) => "Address",
			Self::Recipient(Recipient::Alias(_)) => "Alias",
		}
	}

	#[must_use]
	pub fn string(value: &str) -> Self {
		Self::String(value.into())
	}

	#[must_use]
	pub fn bytes(value: &[u8]) -> Self {
		Self::Bytes(value.to_vec())
	}

	/// `Unit` for `None`, the mapped value otherwise.
	pub fn optional<T, F: FnOnce(T) -> Self>(value: Option<T>, f: F) -> Self {
		value.map_or(Self::Unit, f)
	}

	#[must_use]
	pub const fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(value) => Some(*value),
			_ => None,
		}
	}

	#[must_use]
	pub const fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Boolean(value) => Some(*value),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::Bytes(value) => Some(value),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(value) => Some(value),
			_ => None,
		}
	}

	#[must_use]
	pub const fn as_object(&self) -> Option<&Object> {
		match self {
			Self::Object(value) => Some(value),
			_ => None,
		}
	}

	#[must_use]
	pub const fn is_unit(&self) -> bool {
		matches!(self, Self::Unit)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<u8>> for Value {
	fn from(value: Vec<u8>) -> Self {
		Self::Bytes(value)
	}
}

impl From<Object> for Value {
	fn from(value: Object) -> Self {
		Self::Object(value)
	}
}

impl From<Address> for Value {
	fn from(value: Address) -> Self {
		Self::Address(value)
	}
}

/// Record with named fields tagged by its instance type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Object {
	instance: String,
	fields: BTreeMap<String, Value>,
}

impl Object {
	#[must_use]
	pub fn new(instance: &str) -> Self {
		Self { instance: instance.into(), fields: BTreeMap::new() }
	}

	/// Adds a field, replacing a previous one with the same name.
	#[must_use]
	pub fn with<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
		self.insert(name, value);
		self
	}

	pub fn insert<V: Into<Value>>(&mut self, name: &str, value: V) {
		self.fields.insert(name.into(), value.into());
	}

	#[must_use]
	pub fn instance(&self) -> &str {
		&self.instance
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.get(name)
	}

	#[must_use]
	pub const fn fields(&self) -> &BTreeMap<String, Value> {
		&self.fields
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn objects_compare_regardless_of_field_order() {
		let a = Object::new("AssetPair").with("amountAsset", Value::Unit).with("priceAsset", 1_i64);
		let b = Object::new("AssetPair").with("priceAsset", 1_i64).with("amountAsset", Value::Unit);
		assert_eq!(a, b);
		assert_eq!(Value::from(a).instance_of(), "AssetPair");
	}

	#[test]
	fn later_field_replaces_earlier() {
		let object = Object::new("X").with("f", 1_i64).with("f", true);
		assert_eq!(object.get("f"), Some(&Value::Boolean(true)));
		assert_eq!(object.fields().len(), 1);
	}
}
