//! JSON ABI descriptions of method tables, for wallets building call data.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::Serialize;
use crate::{Argument, Method, Type};

#[derive(Serialize)]
struct AbiInput {
	name: String,
	#[serde(rename = "type")]
	ty: String,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	components: Vec<AbiInput>,
}

#[derive(Serialize)]
struct AbiEntry<'a> {
	name: &'a str,
	#[serde(rename = "type")]
	kind: &'static str,
	inputs: Vec<AbiInput>,
}

fn json_type(ty: &Type) -> String {
	match ty {
		// Wallets send Waves addresses as raw bytes.
		Type::Address => "bytes".into(),
		Type::Tuple(_) => "tuple".into(),
		Type::Slice(elem) => format!("{}[]", json_type(elem)),
		other => other.canonical(),
	}
}

fn components(ty: &Type) -> Vec<AbiInput> {
	match ty {
		Type::Tuple(fields) => fields.iter().map(input).collect(),
		Type::Slice(elem) => components(elem),
		_ => Vec::new(),
	}
}

fn input(argument: &Argument) -> AbiInput {
	AbiInput {
		name: argument.name.clone(),
		ty: json_type(&argument.ty),
		components: components(&argument.ty),
	}
}

/// Renders methods as a JSON ABI array, payments last.
pub fn abi_json<'a, I: IntoIterator<Item = &'a Method>>(methods: I) -> Result<String, serde_json::Error> {
	let entries: Vec<AbiEntry<'_>> = methods
		.into_iter()
		.map(|method| AbiEntry {
			name: &method.raw_name,
			kind: "function",
			inputs: method.inputs.iter().chain(method.payments.iter()).map(input).collect(),
		})
		.collect();
	serde_json::to_string(&entries)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::MethodsMap;
	use alloc::boxed::Box;

	#[test]
	fn erc20_json() {
		let json = abi_json(MethodsMap::erc20().methods()).unwrap();
		let value: serde_json::Value = serde_json::from_str(&json).unwrap();
		let expected = serde_json::json!([{
			"name": "transfer",
			"type": "function",
			"inputs": [
				{ "name": "_to", "type": "bytes" },
				{ "name": "_value", "type": "uint256" }
			]
		}]);
		assert_eq!(value, expected);
	}

	#[test]
	fn json_with_all_types() {
		let method = Method::new(
			"testFunction",
			vec![
				Argument::new("stringVar", Type::String),
				Argument::new("sliceVar", Type::Slice(Box::new(Type::Int(64)))),
				Argument::new(
					"tupleVar",
					Type::Tuple(vec![
						Argument::new("union_index", Type::Uint(8)),
						Argument::new("boolVar", Type::Bool),
					]),
				),
			],
			Some(crate::method::payments_argument()),
		);
		let json = abi_json(core::iter::once(&method)).unwrap();
		let value: serde_json::Value = serde_json::from_str(&json).unwrap();
		let expected = serde_json::json!([{
			"name": "testFunction",
			"type": "function",
			"inputs": [
				{ "name": "stringVar", "type": "string" },
				{ "name": "sliceVar", "type": "int64[]" },
				{ "name": "tupleVar", "type": "tuple", "components": [
					{ "name": "union_index", "type": "uint8" },
					{ "name": "boolVar", "type": "bool" }
				]},
				{ "name": "payments", "type": "tuple[]", "components": [
					{ "name": "assetId", "type": "bytes" },
					{ "name": "amount", "type": "int64" }
				]}
			]
		}]);
		assert_eq!(value, expected);
	}
}
