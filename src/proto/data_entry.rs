use alloc::string::String;
use alloc::vec::Vec;
use ride_core::Value;

/// Key-value entry of an account data storage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataEntry {
	Integer { key: String, value: i64 },
	Boolean { key: String, value: bool },
	Binary {
		key: String,
		#[cfg_attr(feature = "with-serde", serde(with = "serde_bytes"))]
		value: Vec<u8>,
	},
	String { key: String, value: String },
	/// Removes the key.
	Delete { key: String },
}

impl DataEntry {
	#[must_use]
	pub fn key(&self) -> &str {
		match self {
			Self::Integer { key, .. }
			| Self::Boolean { key, .. }
			| Self::Binary { key, .. }
			| Self::String { key, .. }
			| Self::Delete { key } => key,
		}
	}

	#[must_use]
	pub const fn is_delete(&self) -> bool {
		matches!(self, Self::Delete { .. })
	}

	/// Value a script reads for the key, `None` for a deletion.
	#[must_use]
	pub fn value(&self) -> Option<Value> {
		match self {
			Self::Integer { value, .. } => Some(Value::Int(*value)),
			Self::Boolean { value, .. } => Some(Value::Boolean(*value)),
			Self::Binary { value, .. } => Some(Value::Bytes(value.clone())),
			Self::String { value, .. } => Some(Value::String(value.clone())),
			Self::Delete { .. } => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deletions_have_no_value() {
		let entry = DataEntry::Binary { key: String::from("k"), value: alloc::vec![1, 2] };
		assert_eq!(entry.value(), Some(Value::Bytes(alloc::vec![1, 2])));
		assert_eq!(DataEntry::Delete { key: String::from("k") }.value(), None);
	}
}
