use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::min;
use core::convert::TryFrom;
use ride_core::{
	Assignment, ContentType, DAppMeta, Function, FunctionDeclaration, Node, Tree, MAX_LIB_VERSION,
};
use super::*;

struct Reader<'a> {
	data: &'a [u8],
	position: usize,
	format: Format,
	depth: usize,
}

impl<'a> Reader<'a> {
	fn remaining(&self) -> usize {
		self.data.len() - self.position
	}

	fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
		let available = self.remaining();
		if len > available {
			return Err(DecodeError::UnexpectedEnd { needed: len, available })
		}
		let slice = &self.data[self.position..self.position + len];
		self.position += len;
		Ok(slice)
	}

	fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
		let mut out = [0_u8; N];
		out.copy_from_slice(self.take(N)?);
		Ok(out)
	}

	fn byte(&mut self) -> Result<u8, DecodeError> {
		Ok(self.take(1)?[0])
	}

	fn varint(&mut self) -> Result<u64, DecodeError> {
		let mut value = 0_u64;
		for shift in (0..64).step_by(7) {
			let byte = self.byte()?;
			let bits = u64::from(byte & 0x7f);
			if shift == 63 && bits > 1 {
				return Err(DecodeError::VarintOverflow)
			}
			value |= bits << shift;
			if byte & 0x80 == 0 {
				return Ok(value)
			}
		}
		Err(DecodeError::VarintOverflow)
	}

	fn u16(&mut self) -> Result<u16, DecodeError> {
		match self.format {
			Format::V1 => Ok(u16::from_be_bytes(self.array()?)),
			Format::V2 => u16::try_from(self.varint()?).map_err(|_| DecodeError::VarintOverflow),
		}
	}

	fn u32(&mut self) -> Result<u32, DecodeError> {
		match self.format {
			Format::V1 => Ok(u32::from_be_bytes(self.array()?)),
			Format::V2 => u32::try_from(self.varint()?).map_err(|_| DecodeError::VarintOverflow),
		}
	}

	fn i64(&mut self) -> Result<i64, DecodeError> {
		match self.format {
			Format::V1 => Ok(i64::from_be_bytes(self.array()?)),
			Format::V2 => {
				let raw = self.varint()?;
				Ok((raw >> 1) as i64 ^ -((raw & 1) as i64))
			},
		}
	}

	/// Element count, with the capacity to reserve bounded by the remaining input.
	fn count(&mut self) -> Result<(usize, usize), DecodeError> {
		let count = self.u32()? as usize;
		Ok((count, min(count, self.remaining())))
	}

	fn bytes(&mut self) -> Result<&'a [u8], DecodeError> {
		let len = self.u32()? as usize;
		self.take(len)
	}

	fn string(&mut self) -> Result<String, DecodeError> {
		let bytes = self.bytes()?;
		core::str::from_utf8(bytes).map(String::from).map_err(|_| DecodeError::InvalidUtf8)
	}

	fn meta(&mut self) -> Result<DAppMeta, DecodeError> {
		let version = self.u32()?;
		if version != META_VERSION {
			return Err(DecodeError::UnsupportedMetaVersion(version))
		}
		let bytes = self.bytes()?;
		rlp::decode(bytes).map_err(|e| DecodeError::InvalidMeta(format!("{:?}", e)))
	}

	fn declaration(&mut self) -> Result<Node, DecodeError> {
		match self.byte()? {
			DECLARATION_LET => {
				let name = self.string()?;
				let expression = self.node()?;
				Ok(Node::Assignment(Assignment {
					name,
					expression: Box::new(expression),
					block: None,
					new_block: true,
				}))
			},
			DECLARATION_FUNCTION => Ok(Node::FunctionDeclaration(self.function_declaration()?)),
			other => Err(DecodeError::UnknownDeclaration(other)),
		}
	}

	/// Function declaration after its declaration type byte.
	fn function_declaration(&mut self) -> Result<FunctionDeclaration, DecodeError> {
		let name = self.string()?;
		let (count, capacity) = self.count()?;
		let mut arguments = Vec::with_capacity(capacity);
		for _ in 0..count {
			arguments.push(self.string()?);
		}
		let body = self.node()?;
		Ok(FunctionDeclaration {
			name,
			arguments,
			body: Box::new(body),
			block: None,
			invocation_parameter: None,
		})
	}

	fn entry_point(&mut self) -> Result<FunctionDeclaration, DecodeError> {
		let parameter = self.string()?;
		match self.byte()? {
			DECLARATION_FUNCTION => {
				let mut function = self.function_declaration()?;
				if !parameter.is_empty() {
					function.invocation_parameter = Some(parameter);
				}
				Ok(function)
			},
			other => Err(DecodeError::UnknownDeclaration(other)),
		}
	}

	fn node(&mut self) -> Result<Node, DecodeError> {
		if self.depth >= MAX_NESTING {
			return Err(DecodeError::NestingTooDeep)
		}
		self.depth += 1;
		let node = self.node_inner();
		self.depth -= 1;
		node
	}

	fn node_inner(&mut self) -> Result<Node, DecodeError> {
		match self.byte()? {
			TOKEN_LONG => Ok(Node::Long(self.i64()?)),
			TOKEN_BYTES => Ok(Node::Bytes(self.bytes()?.to_vec())),
			TOKEN_STRING => Ok(Node::String(self.string()?)),
			TOKEN_TRUE => Ok(Node::Boolean(true)),
			TOKEN_FALSE => Ok(Node::Boolean(false)),
			TOKEN_IF => {
				let condition = self.node()?;
				let true_branch = self.node()?;
				let false_branch = self.node()?;
				Ok(Node::conditional(condition, true_branch, false_branch))
			},
			TOKEN_BLOCK_V1 => {
				let name = self.string()?;
				let expression = self.node()?;
				let block = self.node()?;
				Ok(Node::Assignment(Assignment {
					name,
					expression: Box::new(expression),
					block: Some(Box::new(block)),
					new_block: false,
				}))
			},
			TOKEN_BLOCK_V2 => match self.declaration()? {
				Node::Assignment(mut assignment) => {
					assignment.block = Some(Box::new(self.node()?));
					Ok(Node::Assignment(assignment))
				},
				Node::FunctionDeclaration(mut function) => {
					function.block = Some(Box::new(self.node()?));
					Ok(Node::FunctionDeclaration(function))
				},
				_ => Err(DecodeError::InvalidDeclaration),
			},
			TOKEN_REF => Ok(Node::Reference(self.string()?)),
			TOKEN_GETTER => {
				let object = self.node()?;
				let name = self.string()?;
				Ok(Node::property(object, &name))
			},
			TOKEN_FUNCTION_CALL => {
				let function = match self.byte()? {
					FUNCTION_NATIVE => Function::Native(self.u16()?),
					FUNCTION_USER => Function::User(self.string()?),
					other => return Err(DecodeError::UnknownFunctionType(other)),
				};
				let (count, capacity) = self.count()?;
				let mut arguments = Vec::with_capacity(capacity);
				for _ in 0..count {
					arguments.push(self.node()?);
				}
				Ok(Node::FunctionCall { function, arguments })
			},
			other => Err(DecodeError::UnknownToken(other)),
		}
	}

	fn header(&mut self) -> Result<(ContentType, u8), DecodeError> {
		let first = self.byte()?;
		let (content, lib_version) = if first == 0 {
			let flags = self.byte()?;
			self.format = if flags & V2_FLAG == 0 { Format::V1 } else { Format::V2 };
			let content = match flags & !V2_FLAG {
				CONTENT_EXPRESSION => ContentType::Expression,
				CONTENT_DAPP => ContentType::DApp,
				other => return Err(DecodeError::InvalidContentType(other)),
			};
			(content, self.byte()?)
		} else {
			(ContentType::Expression, first)
		};
		if lib_version == 0 || lib_version > MAX_LIB_VERSION {
			return Err(DecodeError::UnsupportedVersion(lib_version))
		}
		Ok((content, lib_version))
	}

	fn tree(&mut self) -> Result<Tree, DecodeError> {
		let (content, lib_version) = self.header()?;
		log::trace!(
			target: "ride::serialization",
			"decoding {:?} script, library version {}, format {:?}",
			content, lib_version, self.format,
		);
		let tree = match content {
			ContentType::Expression => Tree::expression(lib_version, self.node()?),
			ContentType::DApp => {
				let mut tree = Tree::dapp(lib_version);
				tree.meta = Some(self.meta()?);

				let (count, capacity) = self.count()?;
				tree.declarations.reserve(capacity);
				for _ in 0..count {
					tree.declarations.push(self.declaration()?);
				}

				let (count, capacity) = self.count()?;
				tree.functions.reserve(capacity);
				for _ in 0..count {
					tree.functions.push(self.entry_point()?);
				}

				tree.verifier = match self.u32()? {
					0 => None,
					1 => Some(Node::FunctionDeclaration(self.entry_point()?)),
					n => return Err(DecodeError::InvalidVerifierCount(n)),
				};
				tree
			},
		};
		match self.remaining() {
			0 => Ok(tree),
			n => Err(DecodeError::TrailingBytes(n)),
		}
	}
}

/// Decodes script bytes of either wire format, verifying the checksum.
pub fn deserialize(data: &[u8]) -> Result<Tree, DecodeError> {
	if data.len() < CHECKSUM_LENGTH {
		return Err(DecodeError::UnexpectedEnd { needed: CHECKSUM_LENGTH, available: data.len() })
	}
	let (body, sum) = data.split_at(data.len() - CHECKSUM_LENGTH);
	if checksum(body) != sum {
		log::warn!(target: "ride::serialization", "script checksum mismatch");
		return Err(DecodeError::InvalidChecksum)
	}

	let mut reader = Reader { data: body, position: 0, format: Format::V1, depth: 0 };
	reader.tree()
}
