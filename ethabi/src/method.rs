use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use once_cell::race::OnceBox;
use ride_core::{keccak256, DAppMeta};
use crate::unpack::unpack_call;
use crate::{Argument, DecodedArgument, DecodedCallData, Error, Type};

/// Canonical signature of the ERC-20 `transfer` method.
pub const ERC20_TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";

/// First 4 bytes of the Keccak-256 hash of a canonical signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector(pub [u8; 4]);

impl Selector {
	/// Selector at the start of call data.
	#[must_use]
	pub fn from_call_data(data: &[u8]) -> Option<Self> {
		let mut selector = [0_u8; 4];
		selector.copy_from_slice(data.get(..4)?);
		Some(Self(selector))
	}
}

impl fmt::Display for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for byte in &self.0 {
			write!(f, "{:02x}", byte)?;
		}
		Ok(())
	}
}

/// Canonical method signature `name(type,type,...)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature(String);

impl Signature {
	#[must_use]
	pub fn new(signature: &str) -> Self {
		Self(signature.into())
	}

	fn from_parts<'a, I: Iterator<Item = &'a Type>>(name: &str, types: I) -> Self {
		let types: Vec<String> = types.map(Type::canonical).collect();
		Self(format!("{}({})", name, types.join(",")))
	}

	#[must_use]
	pub fn selector(&self) -> Selector {
		let hash = keccak256(self.0.as_bytes());
		let mut selector = [0_u8; 4];
		selector.copy_from_slice(&hash.as_bytes()[..4]);
		Selector(selector)
	}

	/// Method name without the argument list.
	#[must_use]
	pub fn name(&self) -> &str {
		self.0.split('(').next().unwrap_or_default()
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Callable method with its selector computed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Method {
	pub raw_name: String,
	pub inputs: Vec<Argument>,
	/// Trailing attached payments argument.
	pub payments: Option<Argument>,
	pub signature: Signature,
	selector: Selector,
}

impl Method {
	#[must_use]
	pub fn new(raw_name: &str, inputs: Vec<Argument>, payments: Option<Argument>) -> Self {
		let signature = Signature::from_parts(
			raw_name,
			inputs.iter().chain(payments.iter()).map(|argument| &argument.ty),
		);
		let selector = signature.selector();
		Self { raw_name: raw_name.into(), inputs, payments, signature, selector }
	}

	#[must_use]
	pub const fn selector(&self) -> Selector {
		self.selector
	}
}

/// `(bytes assetId, int64 amount)[]`
#[must_use]
pub fn payments_argument() -> Argument {
	Argument::new(
		"payments",
		Type::Slice(Box::new(Type::Tuple(vec![
			Argument::new("assetId", Type::Bytes),
			Argument::new("amount", Type::Int(64)),
		]))),
	)
}

/// Selector-indexed method table.
#[derive(Clone, Debug, Default)]
pub struct MethodsMap {
	methods: BTreeMap<Selector, Method>,
	parse_payments: bool,
}

static ERC20: OnceBox<MethodsMap> = OnceBox::new();

impl MethodsMap {
	/// Builds a table, rejecting selector collisions.
	pub fn new(methods: Vec<Method>, parse_payments: bool) -> Result<Self, Error> {
		let mut table: BTreeMap<Selector, Method> = BTreeMap::new();
		for method in methods {
			let selector = method.selector();
			if let Some(existing) = table.get(&selector) {
				return Err(Error::SelectorCollision {
					selector,
					first: existing.signature.to_string(),
					second: method.signature.to_string(),
				});
			}
			table.insert(selector, method);
		}
		Ok(Self { methods: table, parse_payments })
	}

	/// Table of the ERC-20 methods recognized for asset transfers.
	pub fn erc20() -> &'static Self {
		ERC20.get_or_init(|| {
			let transfer = Method::new(
				"transfer",
				vec![Argument::new("_to", Type::Address), Argument::new("_value", Type::Uint(256))],
				None,
			);
			let mut methods = BTreeMap::new();
			methods.insert(transfer.selector(), transfer);
			Box::new(Self { methods, parse_payments: false })
		})
	}

	/// Table of the callables declared in dApp metadata.
	pub fn from_dapp_meta(meta: &DAppMeta, parse_payments: bool) -> Result<Self, Error> {
		let methods = meta
			.functions
			.iter()
			.map(|function| {
				let inputs = function
					.arguments
					.iter()
					.enumerate()
					.map(|(i, ty)| Argument::new(&format!("arg{}", i), Type::from_meta(ty)))
					.collect();
				let payments = if parse_payments { Some(payments_argument()) } else { None };
				Method::new(&function.name, inputs, payments)
			})
			.collect();
		Self::new(methods, parse_payments)
	}

	#[must_use]
	pub fn method(&self, selector: &Selector) -> Option<&Method> {
		self.methods.get(selector)
	}

	pub fn methods(&self) -> impl Iterator<Item = &Method> {
		self.methods.values()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.methods.is_empty()
	}

	/// Decodes call data: a selector followed by the ABI-encoded arguments.
	pub fn parse_call_data(&self, data: &[u8]) -> Result<DecodedCallData, Error> {
		let selector = Selector::from_call_data(data)
			.ok_or(Error::ShortData { required: 4, length: data.len() })?;
		let method = self.method(&selector).ok_or_else(|| {
			log::debug!(target: "ride::ethabi", "unknown selector {}", selector);
			Error::UnknownSelector(selector)
		})?;
		log::trace!(target: "ride::ethabi", "decoding call data of {}", method.signature);

		let (values, payments) = unpack_call(method, &data[4..], self.parse_payments)?;
		let inputs = method
			.inputs
			.iter()
			.cloned()
			.zip(values)
			.map(|(argument, value)| DecodedArgument { argument, value })
			.collect();
		Ok(DecodedCallData {
			signature: method.signature.clone(),
			name: method.raw_name.clone(),
			inputs,
			payments,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{DataType, Payment};
	use ride_core::{ethereum_checksum, BigInt, FunctionMeta, MetaType, H160, H256};

	#[test]
	fn erc20_transfer_selector() {
		assert_eq!(Signature::new(ERC20_TRANSFER_SIGNATURE).selector().to_string(), "a9059cbb");
		let method = MethodsMap::erc20().methods().next().unwrap();
		assert_eq!(method.signature.as_str(), ERC20_TRANSFER_SIGNATURE);
		assert_eq!(method.signature.name(), "transfer");
	}

	#[test]
	fn decode_erc20_transfer() {
		let data = hex::decode(
			"a9059cbb0000000000000000000000009a1989946ae4249aac19ac7a038d24aab03c3d8c\
			 000000000000000000000000000000000000000000002c5b68601cc92ad60000",
		)
		.unwrap();
		let call = MethodsMap::erc20().parse_call_data(&data).unwrap();
		assert_eq!(call.name, "transfer");
		assert_eq!(call.signature.as_str(), ERC20_TRANSFER_SIGNATURE);
		match &call.inputs[0].value {
			DataType::Bytes(address) => assert_eq!(
				ethereum_checksum(&H160::from_slice(address)),
				"0x9a1989946ae4249AAC19ac7a038d24Aab03c3D8c"
			),
			other => panic!("unexpected {:?}", other),
		}
		assert_eq!(
			call.inputs[1].value,
			DataType::BigInt("209470300000000000000000".parse::<BigInt>().unwrap())
		);
	}

	#[test]
	fn decode_custom_method() {
		let method = Method::new(
			"minta",
			vec![
				Argument::new("_token", Type::Address),
				Argument::new("_id", Type::Uint(256)),
				Argument::new("_supply", Type::Uint(256)),
				Argument::new("_listPrice", Type::Uint(256)),
				Argument::new("_fee", Type::Uint(256)),
			],
			None,
		);
		assert_eq!(method.selector().to_string(), "e00c88d6");
		let table = MethodsMap::new(vec![method], false).unwrap();
		let data = hex::decode(
			"e00c88d6000000000000000000000000892555e75350e11f2058d086c72b9c94c9493d72\
			 00000000000000000000000000000000000000000000000000000000000000a5\
			 0000000000000000000000000000000000000000000000056bc75e2d63100000\
			 0000000000000000000000000000000000000000000000056bc75e2d63100000\
			 000000000000000000000000000000000000000000000000000000000000000a",
		)
		.unwrap();
		let call = table.parse_call_data(&data).unwrap();
		let values: Vec<&DataType> = call.values().collect();
		let big = |s: &str| DataType::BigInt(s.parse::<BigInt>().unwrap());
		assert_eq!(values[1], &big("165"));
		assert_eq!(values[2], &big("100000000000000000000"));
		assert_eq!(values[3], &big("100000000000000000000"));
		assert_eq!(values[4], &big("10"));
	}

	#[test]
	fn decode_with_dapp_meta() {
		let meta = DAppMeta {
			version: 1,
			functions: vec![FunctionMeta {
				name: "some_test_fn".into(),
				arguments: vec![MetaType::Boolean, MetaType::String, MetaType::String],
			}],
		};
		let table = MethodsMap::from_dapp_meta(&meta, false).unwrap();
		let data = hex::decode(
			"7afebf3b\
			 0000000000000000000000000000000000000000000000000000000000000001\
			 0000000000000000000000000000000000000000000000000000000000000060\
			 00000000000000000000000000000000000000000000000000000000000000a0\
			 0000000000000000000000000000000000000000000000000000000000000008\
			 6173666173646673000000000000000000000000000000000000000000000000\
			 0000000000000000000000000000000000000000000000000000000000000015\
			 657468657265756d2061626920746573742e2e2e2e0000000000000000000000",
		)
		.unwrap();
		let call = table.parse_call_data(&data).unwrap();
		let values: Vec<DataType> = call.values().cloned().collect();
		assert_eq!(
			values,
			vec![
				DataType::Bool(true),
				DataType::String("asfasdfs".into()),
				DataType::String("ethereum abi test....".into()),
			]
		);
	}

	#[test]
	fn decode_payments() {
		let meta = DAppMeta {
			version: 1,
			functions: vec![FunctionMeta { name: "deposit".into(), arguments: vec![MetaType::Int] }],
		};
		let table = MethodsMap::from_dapp_meta(&meta, true).unwrap();
		let method = table.methods().next().unwrap();
		assert_eq!(method.signature.as_str(), "deposit(int64,(bytes,int64)[])");

		let word = |v: u64| {
			let mut w = vec![0_u8; 24];
			w.extend_from_slice(&v.to_be_bytes());
			w
		};
		let mut data = method.selector().0.to_vec();
		data.extend(word(5));
		// payments list
		data.extend(word(64));
		data.extend(word(2));
		// offsets of the two tuples, relative to the list body
		data.extend(word(64));
		data.extend(word(160));
		// tuple 0: empty asset id, amount 10
		data.extend(word(64));
		data.extend(word(10));
		data.extend(word(0));
		// tuple 1: 32-byte asset id, amount 20
		data.extend(word(64));
		data.extend(word(20));
		data.extend(word(32));
		data.extend(vec![0x11_u8; 32]);

		let call = table.parse_call_data(&data).unwrap();
		assert_eq!(call.inputs[0].value, DataType::Int(5));
		assert_eq!(
			call.payments,
			vec![
				Payment { asset: None, amount: 10 },
				Payment { asset: Some(H256::repeat_byte(0x11)), amount: 20 },
			]
		);
	}

	#[test]
	fn unknown_selector_and_short_data() {
		let table = MethodsMap::erc20();
		assert!(matches!(table.parse_call_data(&[1, 2, 3]), Err(Error::ShortData { .. })));
		assert!(matches!(
			table.parse_call_data(&[1, 2, 3, 4]),
			Err(Error::UnknownSelector(_))
		));
	}

	#[test]
	fn selector_collisions_are_rejected() {
		let a = Method::new("f", vec![], None);
		let b = Method::new("f", vec![], None);
		assert!(matches!(MethodsMap::new(vec![a, b], false), Err(Error::SelectorCollision { .. })));
	}
}
