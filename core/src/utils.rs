#![allow(clippy::use_self)]

use core::cmp::Ordering;
use num_bigint::{BigInt, Sign as BigSign};
use crate::U256;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Sign {
	Plus,
	Minus,
	NoSign,
}

const SIGN_BIT_MASK: U256 = U256([0xffff_ffff_ffff_ffff, 0xffff_ffff_ffff_ffff,
								  0xffff_ffff_ffff_ffff, 0x7fff_ffff_ffff_ffff]);

/// Two's complement view of a 256-bit word.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct I256(pub Sign, pub U256);

impl I256 {
	/// Zero value of I256.
	#[must_use]
	pub const fn zero() -> I256 { I256(Sign::NoSign, U256::zero()) }
	/// Minimum value of I256.
	#[must_use]
	pub fn min_value() -> I256 { I256(Sign::Minus, (U256::max_value() & SIGN_BIT_MASK) + U256::from(1_u64)) }

	#[must_use]
	pub fn is_negative(&self) -> bool { self.0 == Sign::Minus }
}

impl Ord for I256 {
	fn cmp(&self, other: &I256) -> Ordering {
		#[allow(clippy::match_same_arms)]
		match (self.0, other.0) {
			(Sign::NoSign, Sign::NoSign) => Ordering::Equal,
			(Sign::NoSign, Sign::Plus) => Ordering::Less,
			(Sign::NoSign, Sign::Minus) => Ordering::Greater,
			(Sign::Minus, Sign::NoSign) => Ordering::Less,
			(Sign::Minus, Sign::Plus) => Ordering::Less,
			(Sign::Minus, Sign::Minus) => self.1.cmp(&other.1).reverse(),
			(Sign::Plus, Sign::Minus) => Ordering::Greater,
			(Sign::Plus, Sign::NoSign) => Ordering::Greater,
			(Sign::Plus, Sign::Plus) => self.1.cmp(&other.1),
		}
	}
}

impl PartialOrd for I256 {
	fn partial_cmp(&self, other: &I256) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Default for I256 { fn default() -> I256 { I256::zero() } }
impl From<U256> for I256 {
	fn from(val: U256) -> I256 {
		if val == U256::zero() {
			I256::zero()
		} else if val & SIGN_BIT_MASK == val {
			I256(Sign::Plus, val)
		} else {
			// The minimum value wraps onto itself and keeps its magnitude.
			I256(Sign::Minus, (!val).overflowing_add(U256::from(1_u64)).0)
		}
	}
}

impl From<I256> for BigInt {
	fn from(value: I256) -> BigInt {
		let magnitude = u256_to_bigint(value.1);
		match value.0 {
			Sign::Minus => -magnitude,
			Sign::Plus | Sign::NoSign => magnitude,
		}
	}
}

/// Unsigned interpretation of a 256-bit word.
#[must_use]
pub fn u256_to_bigint(value: U256) -> BigInt {
	BigInt::from_bytes_be(BigSign::Plus, &value.to_be_bytes())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn all_ones_is_minus_one() {
		let word = U256::max_value();
		let signed = I256::from(word);
		assert!(signed.is_negative());
		assert_eq!(BigInt::from(signed), BigInt::from(-1));
	}

	#[test]
	fn minimum_value_keeps_magnitude() {
		let word = U256::one() << 255;
		let signed = I256::from(word);
		assert_eq!(signed, I256::min_value());
		assert!(signed < I256::zero());
	}

	#[test]
	fn positive_words_are_unchanged() {
		let word = U256::from(1_000_u64);
		assert_eq!(BigInt::from(I256::from(word)), BigInt::from(1000));
		assert_eq!(u256_to_bigint(U256::max_value()).bits(), 256);
	}
}
