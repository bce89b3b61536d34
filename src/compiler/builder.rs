use alloc::vec::Vec;
use core::convert::TryFrom;
use super::{Position, UniqueId};

/// Opcodes of the emitted bytecode. Operands are big-endian `u16`.
pub mod opcode {
	/// Return to the caller.
	pub const RETURN: u8 = 0;
	/// Push the value of a slot: `REF id`.
	pub const REF: u8 = 1;
	/// Pop a boolean and jump when it is false: `JUMP_IF_FALSE position`.
	pub const JUMP_IF_FALSE: u8 = 2;
	/// `JUMP position`
	pub const JUMP: u8 = 3;
	/// Replace an object by one of its fields: `PROPERTY name-constant-id`.
	pub const PROPERTY: u8 = 4;
	/// Call a built-in: `EXTERNAL_CALL function-id argc`.
	pub const EXTERNAL_CALL: u8 = 5;
	/// Call a script function by its slot: `CALL id`.
	pub const CALL: u8 = 6;
	/// Forget the cached value of a slot: `CLEAR_CACHE id`.
	pub const CLEAR_CACHE: u8 = 7;
	/// Store the top of the stack into a slot: `CACHE id`.
	pub const CACHE: u8 = 8;
	/// Drop the top of the stack.
	pub const POP: u8 = 9;
}

/// Growable bytecode buffer.
#[derive(Clone, Debug, Default)]
pub struct Builder {
	code: Vec<u8>,
}

impl Builder {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Offset of the next written byte.
	pub fn position(&self) -> Position {
		Position::try_from(self.code.len())
			.unwrap_or_else(|_| panic!("bytecode exceeds {} bytes", Position::MAX))
	}

	pub fn byte(&mut self, value: u8) {
		self.code.push(value);
	}

	pub fn u16(&mut self, value: u16) {
		self.code.extend_from_slice(&value.to_be_bytes());
	}

	pub fn op(&mut self, op: u8, operand: u16) {
		self.byte(op);
		self.u16(operand);
	}

	pub fn ret(&mut self) {
		self.byte(opcode::RETURN);
	}

	pub fn reference(&mut self, id: UniqueId) {
		self.op(opcode::REF, id);
	}

	/// Writes a jump with a placeholder target and returns the operand offset.
	pub fn jump(&mut self, op: u8) -> usize {
		self.byte(op);
		let at = self.code.len();
		self.u16(0);
		at
	}

	/// Points a previously written jump at `target`.
	pub fn patch(&mut self, at: usize, target: Position) {
		self.code[at..at + 2].copy_from_slice(&target.to_be_bytes());
	}

	#[must_use]
	pub fn bytes(&self) -> &[u8] {
		&self.code
	}

	#[must_use]
	pub fn into_bytes(self) -> Vec<u8> {
		self.code
	}
}
