//! Script tree: the parsed form of a RIDE program.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

/// Kind of a compiled script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentType {
	/// Single expression acting as a verifier.
	Expression,
	/// Set of callable functions with an optional verifier.
	DApp,
}

/// Parsed program.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tree {
	pub content: ContentType,
	pub lib_version: u8,
	/// Callable signatures, present on dApps.
	pub meta: Option<DAppMeta>,
	/// Global lets and functions of a dApp.
	pub declarations: Vec<Node>,
	/// Callable functions of a dApp, each with an invocation parameter.
	pub functions: Vec<FunctionDeclaration>,
	/// The expression of a script, or the verifier function of a dApp.
	pub verifier: Option<Node>,
}

impl Tree {
	/// Expression script.
	#[must_use]
	pub fn expression(lib_version: u8, body: Node) -> Self {
		Self {
			content: ContentType::Expression,
			lib_version,
			meta: None,
			declarations: Vec::new(),
			functions: Vec::new(),
			verifier: Some(body),
		}
	}

	/// dApp without declarations, functions and verifier.
	#[must_use]
	pub fn dapp(lib_version: u8) -> Self {
		Self {
			content: ContentType::DApp,
			lib_version,
			meta: Some(DAppMeta::default()),
			declarations: Vec::new(),
			functions: Vec::new(),
			verifier: None,
		}
	}

	#[must_use]
	pub fn is_dapp(&self) -> bool {
		self.content == ContentType::DApp
	}

	#[must_use]
	pub const fn has_verifier(&self) -> bool {
		self.verifier.is_some()
	}

	/// Callable function with the given name.
	#[must_use]
	pub fn function(&self, name: &str) -> Option<&FunctionDeclaration> {
		self.functions.iter().find(|f| f.name == name)
	}
}

/// Callee of a function call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Function {
	/// Built-in function identified by its numeric id.
	Native(u16),
	/// Function declared in the script or in the standard library, by name.
	User(String),
}

/// Let binding.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
	pub name: String,
	pub expression: Box<Node>,
	/// Continuation; absent for top-level declarations.
	pub block: Option<Box<Node>>,
	/// `false` marks the legacy let-block form.
	pub new_block: bool,
}

/// Function declaration, optionally a callable or verifier entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDeclaration {
	pub name: String,
	pub arguments: Vec<String>,
	pub body: Box<Node>,
	/// Continuation; absent for top-level declarations.
	pub block: Option<Box<Node>>,
	/// Name of the implicit invocation context argument of entry points.
	pub invocation_parameter: Option<String>,
}

/// Expression node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
	Long(i64),
	Bytes(#[cfg_attr(feature = "with-serde", serde(with = "serde_bytes"))] Vec<u8>),
	Boolean(bool),
	String(String),
	Conditional {
		condition: Box<Node>,
		true_branch: Box<Node>,
		false_branch: Box<Node>,
	},
	Assignment(Assignment),
	Reference(String),
	FunctionDeclaration(FunctionDeclaration),
	FunctionCall {
		function: Function,
		arguments: Vec<Node>,
	},
	Property {
		object: Box<Node>,
		name: String,
	},
}

impl Node {
	#[must_use]
	pub fn reference(name: &str) -> Self {
		Self::Reference(name.into())
	}

	#[must_use]
	pub fn string(value: &str) -> Self {
		Self::String(value.into())
	}

	#[must_use]
	pub fn native(id: u16, arguments: Vec<Node>) -> Self {
		Self::FunctionCall { function: Function::Native(id), arguments }
	}

	#[must_use]
	pub fn user(name: &str, arguments: Vec<Node>) -> Self {
		Self::FunctionCall { function: Function::User(name.into()), arguments }
	}

	#[must_use]
	pub fn conditional(condition: Node, true_branch: Node, false_branch: Node) -> Self {
		Self::Conditional {
			condition: Box::new(condition),
			true_branch: Box::new(true_branch),
			false_branch: Box::new(false_branch),
		}
	}

	#[must_use]
	pub fn property(object: Node, name: &str) -> Self {
		Self::Property { object: Box::new(object), name: name.into() }
	}

	/// `let name = expression; block`
	#[must_use]
	pub fn let_in(name: &str, expression: Node, block: Node) -> Self {
		Self::Assignment(Assignment {
			name: name.into(),
			expression: Box::new(expression),
			block: Some(Box::new(block)),
			new_block: true,
		})
	}

	/// Top-level let declaration.
	#[must_use]
	pub fn global(name: &str, expression: Node) -> Self {
		Self::Assignment(Assignment {
			name: name.into(),
			expression: Box::new(expression),
			block: None,
			new_block: true,
		})
	}
}

impl FunctionDeclaration {
	#[must_use]
	pub fn new(name: &str, arguments: &[&str], body: Node) -> Self {
		Self {
			name: name.into(),
			arguments: arguments.iter().map(|&a| a.into()).collect(),
			body: Box::new(body),
			block: None,
			invocation_parameter: None,
		}
	}

	/// Marks the function as an entry point receiving the invocation context.
	#[must_use]
	pub fn callable(mut self, invocation_parameter: &str) -> Self {
		self.invocation_parameter = Some(invocation_parameter.into());
		self
	}
}

const META_NESTING_LIMIT: usize = 16;

/// Argument type recorded in dApp metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaType {
	Int,
	Boolean,
	String,
	Bytes,
	List(Box<MetaType>),
	Union(Vec<MetaType>),
}

/// Signature of one callable function.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionMeta {
	pub name: String,
	pub arguments: Vec<MetaType>,
}

/// Descriptor of the callable functions of a dApp.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DAppMeta {
	pub version: u32,
	pub functions: Vec<FunctionMeta>,
}

impl MetaType {
	const fn tag(&self) -> u8 {
		match self {
			Self::Int => 0,
			Self::Boolean => 1,
			Self::String => 2,
			Self::Bytes => 3,
			Self::List(_) => 4,
			Self::Union(_) => 5,
		}
	}

	fn decode_nested(rlp: &Rlp<'_>, depth: usize) -> Result<Self, DecoderError> {
		if depth > META_NESTING_LIMIT {
			return Err(DecoderError::Custom("meta type nesting is too deep"));
		}
		let tag: u8 = rlp.val_at(0)?;
		let expected = match tag {
			0..=3 => 1,
			_ => 2,
		};
		if rlp.item_count()? != expected {
			return Err(DecoderError::RlpIncorrectListLen);
		}
		match tag {
			0 => Ok(Self::Int),
			1 => Ok(Self::Boolean),
			2 => Ok(Self::String),
			3 => Ok(Self::Bytes),
			4 => Ok(Self::List(Box::new(Self::decode_nested(&rlp.at(1)?, depth + 1)?))),
			5 => {
				let variants = rlp.at(1)?;
				let mut types = Vec::new();
				for item in variants.iter() {
					types.push(Self::decode_nested(&item, depth + 1)?);
				}
				Ok(Self::Union(types))
			},
			_ => Err(DecoderError::Custom("unknown meta type tag")),
		}
	}
}

impl Encodable for MetaType {
	fn rlp_append(&self, s: &mut RlpStream) {
		match self {
			Self::List(inner) => {
				s.begin_list(2);
				s.append(&self.tag());
				s.append(inner.as_ref());
			},
			Self::Union(types) => {
				s.begin_list(2);
				s.append(&self.tag());
				s.append_list::<MetaType, MetaType>(types);
			},
			_ => {
				s.begin_list(1);
				s.append(&self.tag());
			},
		}
	}
}

impl Decodable for MetaType {
	fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
		Self::decode_nested(rlp, 0)
	}
}

impl Encodable for FunctionMeta {
	fn rlp_append(&self, s: &mut RlpStream) {
		s.begin_list(2);
		s.append(&self.name);
		s.append_list::<MetaType, MetaType>(&self.arguments);
	}
}

impl Decodable for FunctionMeta {
	fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
		if rlp.item_count()? != 2 {
			return Err(DecoderError::RlpIncorrectListLen);
		}
		Ok(Self { name: rlp.val_at(0)?, arguments: rlp.list_at(1)? })
	}
}

impl Encodable for DAppMeta {
	fn rlp_append(&self, s: &mut RlpStream) {
		s.begin_list(2);
		s.append(&self.version);
		s.append_list::<FunctionMeta, FunctionMeta>(&self.functions);
	}
}

impl Decodable for DAppMeta {
	fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
		if rlp.item_count()? != 2 {
			return Err(DecoderError::RlpIncorrectListLen);
		}
		Ok(Self { version: rlp.val_at(0)?, functions: rlp.list_at(1)? })
	}
}
