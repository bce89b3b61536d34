use alloc::format;
use alloc::string::String;
use core::fmt;

/// Classification of an evaluation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
	/// Unclassified failure.
	Undefined,
	/// Raised by the script itself with `throw`.
	UserError,
	/// Resource limits and invariants of the evaluator.
	RuntimeError,
	/// Failure inside a nested dApp invocation.
	InternalInvocationError,
	/// Malformed values, failed conversions and missing data.
	EvaluationFailure,
}

impl ErrorKind {
	/// Creates an error of this kind.
	pub fn error<M: Into<String>>(self, message: M) -> EvaluationError {
		EvaluationError { kind: self, message: message.into(), complexity: 0 }
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Undefined => "undefined error",
			Self::UserError => "user error",
			Self::RuntimeError => "runtime error",
			Self::InternalInvocationError => "internal invocation error",
			Self::EvaluationFailure => "evaluation failure",
		};
		f.write_str(name)
	}
}

/// Evaluation error annotated with the complexity spent before it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvaluationError {
	kind: ErrorKind,
	message: String,
	complexity: u32,
}

impl EvaluationError {
	#[must_use]
	pub const fn kind(&self) -> ErrorKind {
		self.kind
	}

	#[must_use]
	pub fn message(&self) -> &str {
		&self.message
	}

	#[must_use]
	pub const fn complexity(&self) -> u32 {
		self.complexity
	}

	/// Whether the error carries a recognized kind.
	#[must_use]
	pub fn is_classified(&self) -> bool {
		self.kind != ErrorKind::Undefined
	}

	/// Adds spent complexity to the annotation.
	#[must_use]
	pub fn with_complexity(mut self, complexity: u32) -> Self {
		self.complexity = self.complexity.saturating_add(complexity);
		self
	}

	/// Prefixes the message with a context, keeping kind and complexity.
	#[must_use]
	pub fn wrap<C: fmt::Display>(mut self, context: C) -> Self {
		self.message = format!("{}: {}", context, self.message);
		self
	}

	/// Re-labels the error with a new kind, keeping message and complexity.
	#[must_use]
	pub fn reclassify(mut self, kind: ErrorKind) -> Self {
		self.kind = kind;
		self
	}
}

impl fmt::Display for EvaluationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.kind, self.message)
	}
}

#[cfg(feature = "std")]
impl std::error::Error for EvaluationError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wrapping_keeps_kind_and_complexity() {
		let error = ErrorKind::EvaluationFailure.error("bad field").with_complexity(10).wrap("Burn");
		assert_eq!(error.kind(), ErrorKind::EvaluationFailure);
		assert_eq!(error.complexity(), 10);
		assert_eq!(error.message(), "Burn: bad field");
		assert_eq!(error.with_complexity(5).complexity(), 15);
	}

	#[test]
	fn undefined_errors_are_unclassified() {
		assert!(!ErrorKind::Undefined.error("x").is_classified());
		assert!(ErrorKind::UserError.error("x").is_classified());
	}
}
