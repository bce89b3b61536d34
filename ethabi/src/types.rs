use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use ride_core::MetaType;

/// Size of one ABI word.
pub const WORD: usize = 32;

/// ABI type of an argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
	/// Signed integer with the given width in bits.
	Int(usize),
	/// Unsigned integer with the given width in bits.
	Uint(usize),
	Bool,
	String,
	Bytes,
	Address,
	/// Dynamic array.
	Slice(Box<Type>),
	Tuple(Vec<Argument>),
}

/// Named, typed argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Argument {
	pub name: String,
	pub ty: Type,
}

impl Argument {
	#[must_use]
	pub fn new(name: &str, ty: Type) -> Self {
		Self { name: name.into(), ty }
	}
}

impl Type {
	/// Whether values of this type are stored behind an offset.
	#[must_use]
	pub fn is_dynamic(&self) -> bool {
		match self {
			Self::Slice(_) | Self::String | Self::Bytes => true,
			Self::Tuple(fields) => fields.iter().any(|f| f.ty.is_dynamic()),
			_ => false,
		}
	}

	/// Whether the word at the value position points to a length-prefixed payload.
	#[must_use]
	pub const fn requires_length_prefix(&self) -> bool {
		matches!(self, Self::Slice(_) | Self::String | Self::Bytes)
	}

	/// Bytes occupied in the head of the enclosing sequence.
	#[must_use]
	pub fn head_size(&self) -> usize {
		match self {
			Self::Tuple(fields) if !self.is_dynamic() => {
				fields.iter().map(|f| f.ty.head_size()).sum()
			},
			_ => WORD,
		}
	}

	/// Canonical name used in signatures.
	#[must_use]
	pub fn canonical(&self) -> String {
		match self {
			Self::Int(size) => format!("int{}", size),
			Self::Uint(size) => format!("uint{}", size),
			Self::Bool => "bool".into(),
			Self::String => "string".into(),
			Self::Bytes => "bytes".into(),
			Self::Address => "address".into(),
			Self::Slice(elem) => format!("{}[]", elem.canonical()),
			Self::Tuple(fields) => {
				let inner: Vec<String> = fields.iter().map(|f| f.ty.canonical()).collect();
				format!("({})", inner.join(","))
			},
		}
	}

	/// ABI type of a dApp callable argument.
	#[must_use]
	pub fn from_meta(meta: &MetaType) -> Self {
		match meta {
			MetaType::Int => Self::Int(64),
			MetaType::Boolean => Self::Bool,
			MetaType::String => Self::String,
			MetaType::Bytes => Self::Bytes,
			MetaType::List(inner) => Self::Slice(Box::new(Self::from_meta(inner))),
			MetaType::Union(variants) => {
				let mut fields = Vec::with_capacity(variants.len() + 1);
				fields.push(Argument::new("union_index", Self::Uint(8)));
				for variant in variants {
					fields.push(Argument::new(variant_name(variant), Self::from_meta(variant)));
				}
				Self::Tuple(fields)
			},
		}
	}
}

const fn variant_name(meta: &MetaType) -> &'static str {
	match meta {
		MetaType::Int => "intVar",
		MetaType::Boolean => "boolVar",
		MetaType::String => "stringVar",
		MetaType::Bytes => "bytesVar",
		MetaType::List(_) => "sliceVar",
		MetaType::Union(_) => "unionVar",
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.canonical())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn canonical_names() {
		let payments = Type::Slice(Box::new(Type::Tuple(vec![
			Argument::new("assetId", Type::Bytes),
			Argument::new("amount", Type::Int(64)),
		])));
		assert_eq!(payments.canonical(), "(bytes,int64)[]");
		assert!(payments.is_dynamic());
	}

	#[test]
	fn static_tuples_are_inlined() {
		let tuple = Type::Tuple(vec![
			Argument::new("a", Type::Uint(256)),
			Argument::new("b", Type::Bool),
			Argument::new("c", Type::Address),
		]);
		assert!(!tuple.is_dynamic());
		assert_eq!(tuple.head_size(), 96);
		assert_eq!(Type::String.head_size(), 32);
	}

	#[test]
	fn union_meta_becomes_indexed_tuple() {
		let ty = Type::from_meta(&MetaType::Union(vec![MetaType::String, MetaType::Int]));
		assert_eq!(ty.canonical(), "(uint8,string,int64)");
	}
}
