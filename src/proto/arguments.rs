use alloc::string::String;
use alloc::vec::Vec;

/// Argument of an invoke script transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Argument {
	Integer(i64),
	Boolean(bool),
	String(String),
	Binary(#[cfg_attr(feature = "with-serde", serde(with = "serde_bytes"))] Vec<u8>),
	List(Vec<Argument>),
}
