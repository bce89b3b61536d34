use alloc::string::String;
use alloc::vec::Vec;
use ride_core::{BigInt, H256};
use crate::{Argument, Signature};

/// Decoded ABI value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataType {
	/// Integers up to 64 bits.
	Int(i64),
	/// Wider integers.
	BigInt(BigInt),
	Bool(bool),
	String(String),
	/// Byte strings and addresses.
	Bytes(Vec<u8>),
	List(Vec<DataType>),
}

/// Attached payment decoded from the trailing payments argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payment {
	/// `None` for the native token.
	pub asset: Option<H256>,
	pub amount: i64,
}

/// Declared argument together with its decoded value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedArgument {
	pub argument: Argument,
	pub value: DataType,
}

/// Result of decoding call data against a method table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCallData {
	pub signature: Signature,
	pub name: String,
	pub inputs: Vec<DecodedArgument>,
	pub payments: Vec<Payment>,
}

impl DecodedCallData {
	/// Decoded values in declaration order.
	pub fn values(&self) -> impl Iterator<Item = &DataType> {
		self.inputs.iter().map(|input| &input.value)
	}
}
