use crate::consts::*;
use ride_runtime::{Config, Step};

/// Complexity of one evaluation step under the given library constants.
#[must_use]
pub const fn step_cost(step: Step<'_>, config: &Config) -> u32 {
	match step {
		Step::Constant => G_CONSTANT,
		Step::Conditional => G_CONDITIONAL,
		Step::Native { cost, .. } => cost,
		Step::Reference(_) => if config.legacy_costs { G_LEGACY_REFERENCE } else { G_REFERENCE },
		Step::Let(_) => if config.legacy_costs { G_LEGACY_LET } else { G_LET },
		Step::Property(_) => if config.legacy_costs { G_LEGACY_PROPERTY } else { G_PROPERTY },
		Step::UserFunction(_) => if config.legacy_costs { G_LEGACY_USER_FUNCTION } else { G_USER_FUNCTION },
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn legacy_versions_charge_more_for_names() {
		let v2 = Config::for_version(2).unwrap();
		let v5 = Config::for_version(5).unwrap();
		assert_eq!(step_cost(Step::Reference("x"), v2), 2);
		assert_eq!(step_cost(Step::Reference("x"), v5), 1);
		assert_eq!(step_cost(Step::Let("x"), v2), 5);
		assert_eq!(step_cost(Step::UserFunction("f"), v2), 0);
		assert_eq!(step_cost(Step::Native { name: "+", cost: 10 }, v5), 10);
	}
}
