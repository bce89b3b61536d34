use alloc::vec::Vec;
use core::convert::TryFrom;
use ride_core::{ContentType, FunctionDeclaration, Function, Node, Tree, MAX_LIB_VERSION};
use super::*;

struct Writer {
	out: Vec<u8>,
	format: Format,
}

impl Writer {
	fn byte(&mut self, value: u8) {
		self.out.push(value);
	}

	fn varint(&mut self, mut value: u64) {
		while value >= 0x80 {
			self.out.push((value as u8 & 0x7f) | 0x80);
			value >>= 7;
		}
		self.out.push(value as u8);
	}

	fn u16(&mut self, value: u16) {
		match self.format {
			Format::V1 => self.out.extend_from_slice(&value.to_be_bytes()),
			Format::V2 => self.varint(u64::from(value)),
		}
	}

	fn u32(&mut self, value: u32) {
		match self.format {
			Format::V1 => self.out.extend_from_slice(&value.to_be_bytes()),
			Format::V2 => self.varint(u64::from(value)),
		}
	}

	fn len(&mut self, len: usize) -> Result<(), EncodeError> {
		let len = u32::try_from(len).map_err(|_| EncodeError::TooLong(len))?;
		self.u32(len);
		Ok(())
	}

	fn i64(&mut self, value: i64) {
		match self.format {
			Format::V1 => self.out.extend_from_slice(&value.to_be_bytes()),
			Format::V2 => self.varint(((value << 1) ^ (value >> 63)) as u64),
		}
	}

	fn bytes(&mut self, data: &[u8]) -> Result<(), EncodeError> {
		self.len(data.len())?;
		self.out.extend_from_slice(data);
		Ok(())
	}

	fn string(&mut self, value: &str) -> Result<(), EncodeError> {
		self.bytes(value.as_bytes())
	}

	fn header(&mut self, tree: &Tree) {
		let content = match tree.content {
			ContentType::Expression => CONTENT_EXPRESSION,
			ContentType::DApp => CONTENT_DAPP,
		};
		match (self.format, tree.content) {
			(Format::V1, ContentType::Expression) => self.byte(tree.lib_version),
			(Format::V1, ContentType::DApp) => {
				self.byte(0);
				self.byte(content);
				self.byte(tree.lib_version);
			},
			(Format::V2, _) => {
				self.byte(0);
				self.byte(content | V2_FLAG);
				self.byte(tree.lib_version);
			},
		}
	}

	fn meta(&mut self, tree: &Tree) -> Result<(), EncodeError> {
		self.u32(META_VERSION);
		let meta = tree.meta.clone().unwrap_or_default();
		self.bytes(&rlp::encode(&meta))
	}

	fn declaration(&mut self, declaration: &Node) -> Result<(), EncodeError> {
		match declaration {
			Node::Assignment(assignment) => {
				self.byte(DECLARATION_LET);
				self.string(&assignment.name)?;
				self.node(&assignment.expression)
			},
			Node::FunctionDeclaration(function) => self.function_declaration(function),
			_ => Err(EncodeError::UnexpectedDeclaration),
		}
	}

	fn function_declaration(&mut self, function: &FunctionDeclaration) -> Result<(), EncodeError> {
		self.byte(DECLARATION_FUNCTION);
		self.string(&function.name)?;
		self.len(function.arguments.len())?;
		for argument in &function.arguments {
			self.string(argument)?;
		}
		self.node(&function.body)
	}

	/// Callable or verifier: invocation parameter, then the declaration.
	fn entry_point(&mut self, function: &FunctionDeclaration) -> Result<(), EncodeError> {
		self.string(function.invocation_parameter.as_deref().unwrap_or_default())?;
		self.function_declaration(function)
	}

	fn node(&mut self, node: &Node) -> Result<(), EncodeError> {
		match node {
			Node::Long(value) => {
				self.byte(TOKEN_LONG);
				self.i64(*value);
			},
			Node::Bytes(value) => {
				self.byte(TOKEN_BYTES);
				self.bytes(value)?;
			},
			Node::Boolean(true) => self.byte(TOKEN_TRUE),
			Node::Boolean(false) => self.byte(TOKEN_FALSE),
			Node::String(value) => {
				self.byte(TOKEN_STRING);
				self.string(value)?;
			},
			Node::Conditional { condition, true_branch, false_branch } => {
				self.byte(TOKEN_IF);
				self.node(condition)?;
				self.node(true_branch)?;
				self.node(false_branch)?;
			},
			Node::Assignment(assignment) => {
				let block = assignment.block.as_ref()
					.ok_or_else(|| EncodeError::MissingBlock(assignment.name.clone()))?;
				if assignment.new_block {
					self.byte(TOKEN_BLOCK_V2);
					self.byte(DECLARATION_LET);
				} else {
					self.byte(TOKEN_BLOCK_V1);
				}
				self.string(&assignment.name)?;
				self.node(&assignment.expression)?;
				self.node(block)?;
			},
			Node::Reference(name) => {
				self.byte(TOKEN_REF);
				self.string(name)?;
			},
			Node::FunctionDeclaration(function) => {
				let block = function.block.as_ref()
					.ok_or_else(|| EncodeError::MissingBlock(function.name.clone()))?;
				self.byte(TOKEN_BLOCK_V2);
				self.function_declaration(function)?;
				self.node(block)?;
			},
			Node::FunctionCall { function, arguments } => {
				self.byte(TOKEN_FUNCTION_CALL);
				match function {
					Function::Native(id) => {
						self.byte(FUNCTION_NATIVE);
						self.u16(*id);
					},
					Function::User(name) => {
						self.byte(FUNCTION_USER);
						self.string(name)?;
					},
				}
				self.len(arguments.len())?;
				for argument in arguments {
					self.node(argument)?;
				}
			},
			Node::Property { object, name } => {
				self.byte(TOKEN_GETTER);
				self.node(object)?;
				self.string(name)?;
			},
		}
		Ok(())
	}
}

/// Serializes a tree in the given wire format, checksum included.
pub fn serialize(tree: &Tree, format: Format) -> Result<Vec<u8>, EncodeError> {
	if tree.lib_version == 0 || tree.lib_version > MAX_LIB_VERSION {
		return Err(EncodeError::UnsupportedVersion(tree.lib_version))
	}

	let mut writer = Writer { out: Vec::new(), format };
	writer.header(tree);
	match tree.content {
		ContentType::Expression => {
			let expression = tree.verifier.as_ref().ok_or(EncodeError::MissingExpression)?;
			writer.node(expression)?;
		},
		ContentType::DApp => {
			writer.meta(tree)?;
			writer.len(tree.declarations.len())?;
			for declaration in &tree.declarations {
				writer.declaration(declaration)?;
			}
			writer.len(tree.functions.len())?;
			for function in &tree.functions {
				writer.entry_point(function)?;
			}
			match &tree.verifier {
				Some(Node::FunctionDeclaration(verifier)) => {
					writer.u32(1);
					writer.entry_point(verifier)?;
				},
				Some(_) => return Err(EncodeError::InvalidVerifier),
				None => writer.u32(0),
			}
		},
	}

	let sum = checksum(&writer.out);
	writer.out.extend_from_slice(&sum);
	log::trace!(target: "ride::serialization", "serialized {:?} script of {} bytes", format, writer.out.len());
	Ok(writer.out)
}
