//! Ethereum ABI call data decoding for RIDE invocations.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
	clippy::module_name_repetitions,
	clippy::missing_errors_doc,
	clippy::missing_panics_doc
)]

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod data;
mod error;
mod json;
mod method;
mod types;
mod unpack;

pub use crate::data::{DataType, DecodedArgument, DecodedCallData, Payment};
pub use crate::error::Error;
pub use crate::json::abi_json;
pub use crate::method::{Method, MethodsMap, Selector, Signature, ERC20_TRANSFER_SIGNATURE};
pub use crate::types::{Argument, Type};
