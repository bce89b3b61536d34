//! Tree-walking evaluator of RIDE scripts.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
	clippy::module_name_repetitions,
	clippy::missing_errors_doc,
	clippy::missing_panics_doc
)]

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod eval;
mod config;
mod handler;
pub mod tracing;

pub use crate::config::{max_chain_invoke_complexity, Config};
pub use crate::eval::{library_function_id, native_name, Runtime, MAX_EVALUATION_DEPTH, PREDEFINED};
pub use crate::handler::{Handler, Step};
