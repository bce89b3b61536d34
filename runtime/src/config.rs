use ride_core::{ErrorKind, EvaluationError, MAX_LIB_VERSION};

/// Protocol constants of one library version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
	/// Library version the constants apply to.
	pub lib_version: u8,
	/// Complexity limit of a verifier or an expression script.
	pub max_verifier_complexity: u32,
	/// Complexity limit of one callable function.
	pub max_callable_complexity: u32,
	/// Complexity limit of a whole chain of nested invocations.
	pub max_chain_invoke_complexity: Option<u32>,
	/// Maximum nesting of dApp-to-dApp invocations.
	pub max_invoke_depth: usize,
	/// Maximum number of actions of a callable result.
	pub max_actions: usize,
	/// Maximum number of data entries of a callable result.
	pub max_data_entries: usize,
	/// Maximum number of list elements.
	pub max_list_size: usize,
	/// Maximum size of a byte vector.
	pub max_bytes_size: usize,
	/// Reference and property steps are charged the legacy way.
	pub legacy_costs: bool,
}

impl Config {
	/// Library version 1 and 2 constants.
	#[must_use]
	pub const fn v1() -> Self {
		Self {
			lib_version: 1,
			max_verifier_complexity: 2000,
			max_callable_complexity: 2000,
			max_chain_invoke_complexity: None,
			max_invoke_depth: 0,
			max_actions: 0,
			max_data_entries: 0,
			max_list_size: 1000,
			max_bytes_size: 32 * 1024,
			legacy_costs: true,
		}
	}

	#[must_use]
	pub const fn v2() -> Self {
		Self { lib_version: 2, ..Self::v1() }
	}

	/// Library version 3: dApps.
	#[must_use]
	pub const fn v3() -> Self {
		Self {
			lib_version: 3,
			max_callable_complexity: 4000,
			max_actions: 10,
			max_data_entries: 100,
			legacy_costs: false,
			..Self::v1()
		}
	}

	#[must_use]
	pub const fn v4() -> Self {
		Self { lib_version: 4, ..Self::v3() }
	}

	/// Library version 5: dApp-to-dApp invocations.
	#[must_use]
	pub const fn v5() -> Self {
		Self {
			lib_version: 5,
			max_callable_complexity: 10000,
			max_chain_invoke_complexity: Some(26000),
			max_invoke_depth: 100,
			max_actions: 30,
			..Self::v4()
		}
	}

	#[must_use]
	pub const fn v6() -> Self {
		Self {
			lib_version: 6,
			max_chain_invoke_complexity: Some(52000),
			..Self::v5()
		}
	}

	/// Constants of the given library version.
	pub fn for_version(lib_version: u8) -> Result<&'static Self, EvaluationError> {
		match lib_version {
			1 => Ok(&V1),
			2 => Ok(&V2),
			3 => Ok(&V3),
			4 => Ok(&V4),
			5 => Ok(&V5),
			6 => Ok(&V6),
			_ => Err(ErrorKind::RuntimeError.error(alloc::format!(
				"unsupported library version {} (max {})",
				lib_version, MAX_LIB_VERSION
			))),
		}
	}
}

static V1: Config = Config::v1();
static V2: Config = Config::v2();
static V3: Config = Config::v3();
static V4: Config = Config::v4();
static V5: Config = Config::v5();
static V6: Config = Config::v6();

/// Complexity limit of a chain of nested invocations.
pub fn max_chain_invoke_complexity(lib_version: u8) -> Result<u32, EvaluationError> {
	Config::for_version(lib_version)?.max_chain_invoke_complexity.ok_or_else(|| {
		ErrorKind::RuntimeError.error(alloc::format!(
			"no chained invocations in library version {}",
			lib_version
		))
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn chain_limits() {
		assert_eq!(max_chain_invoke_complexity(5), Ok(26000));
		assert_eq!(max_chain_invoke_complexity(6), Ok(52000));
		assert!(max_chain_invoke_complexity(4).is_err());
		assert!(Config::for_version(7).is_err());
		assert!(Config::for_version(0).is_err());
	}
}
