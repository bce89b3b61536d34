//! Core layer for RIDE: primitives, the value model and the script tree.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
	clippy::module_name_repetitions,
	clippy::missing_errors_doc,
	clippy::missing_panics_doc
)]

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod address;
mod crypto;
mod error;
mod primitive_types;
mod tree;
mod utils;
mod value;

pub use crate::address::{Address, Alias, Recipient, ADDRESS_VERSION, ALIAS_VERSION};
pub use crate::crypto::{keccak256, fast_hash, secure_hash, ethereum_address, ethereum_checksum};
pub use crate::error::{ErrorKind, EvaluationError};
pub use crate::primitive_types::{H160, H256, H512, PublicKey, U256};
pub use crate::tree::{
	Assignment, ContentType, DAppMeta, Function, FunctionDeclaration, FunctionMeta, MetaType, Node,
	Tree,
};
pub use crate::utils::{I256, Sign, u256_to_bigint};
pub use crate::value::{Object, Value};

pub use num_bigint::BigInt;

/// Highest library version understood by this core.
pub const MAX_LIB_VERSION: u8 = 6;
