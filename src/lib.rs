//! Execution core of RIDE smart contracts: script codec, compiler,
//! transaction converter and evaluator with complexity accounting.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
	clippy::module_name_repetitions,
	clippy::missing_errors_doc,
	clippy::missing_panics_doc
)]

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use ride_core::*;
pub use ride_runtime::*;
pub use ride_gasometer as gasometer;
pub use ride_ethabi as ethabi;

#[cfg(feature = "tracing")]
pub mod tracing;

#[cfg(feature = "tracing")]
macro_rules! event {
	($x:expr) => {
		use crate::tracing::Event::*;
		crate::tracing::with(|listener| listener.event($x));
	};
}

#[cfg(not(feature = "tracing"))]
macro_rules! event {
	($x:expr) => {};
}

pub mod serialization;
pub mod compiler;
pub mod proto;
pub mod converter;
pub mod backend;
pub mod executor;
