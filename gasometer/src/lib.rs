//! Complexity metering for RIDE evaluation.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
	clippy::module_name_repetitions,
	clippy::missing_errors_doc,
	clippy::missing_panics_doc
)]

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod tracing;

mod consts;
mod costs;

use ride_core::{ErrorKind, EvaluationError};
use ride_runtime::{Config, Step};

pub use crate::costs::step_cost;

macro_rules! event {
	($x:expr) => {
		use crate::tracing::Event::*;
		$x.emit();
	}
}

/// Complexity state at the time of an event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
	pub limit: u32,
	pub used: u32,
}

/// Complexity meter of one evaluation.
#[derive(Clone, Debug)]
pub struct Gasometer<'config> {
	config: &'config Config,
	limit: u32,
	used: u32,
}

impl<'config> Gasometer<'config> {
	#[must_use]
	pub const fn new(limit: u32, config: &'config Config) -> Self {
		Self { config, limit, used: 0 }
	}

	#[must_use]
	pub const fn config(&self) -> &'config Config {
		self.config
	}

	#[must_use]
	pub const fn limit(&self) -> u32 {
		self.limit
	}

	/// Complexity recorded so far, including the step that exceeded the limit.
	#[must_use]
	pub const fn used(&self) -> u32 {
		self.used
	}

	#[must_use]
	pub const fn remaining(&self) -> u32 {
		self.limit.saturating_sub(self.used)
	}

	#[must_use]
	pub const fn snapshot(&self) -> Snapshot {
		Snapshot { limit: self.limit, used: self.used }
	}

	/// Records the cost of an evaluation step.
	pub fn record_step(&mut self, step: Step<'_>) -> Result<(), EvaluationError> {
		self.record_cost(step_cost(step, self.config))
	}

	/// Records an explicit cost.
	pub fn record_cost(&mut self, cost: u32) -> Result<(), EvaluationError> {
		self.used = self.used.saturating_add(cost);
		if self.used > self.limit {
			event!(LimitExceeded { cost, snapshot: self.snapshot() });
			return Err(ErrorKind::RuntimeError.error(alloc::format!(
				"evaluation complexity {} exceeds {}",
				self.used, self.limit
			)))
		}
		event!(RecordCost { cost, snapshot: self.snapshot() });
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn limit_is_inclusive() {
		let config = Config::for_version(5).unwrap();
		let mut gasometer = Gasometer::new(3, config);
		gasometer.record_step(Step::Constant).unwrap();
		gasometer.record_cost(2).unwrap();
		assert_eq!(gasometer.remaining(), 0);
		let err = gasometer.record_step(Step::Reference("x")).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::RuntimeError);
		assert_eq!(gasometer.used(), 4);
	}

	#[test]
	fn saturates_instead_of_wrapping() {
		let config = Config::for_version(3).unwrap();
		let mut gasometer = Gasometer::new(u32::MAX, config);
		gasometer.record_cost(u32::MAX).unwrap();
		assert!(gasometer.record_cost(1).is_ok());
		assert_eq!(gasometer.used(), u32::MAX);
	}
}
