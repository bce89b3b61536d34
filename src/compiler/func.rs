use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use ride_core::{Function, Value};
use super::states::{AssignmentState, CallState, ConditionalState, PropertyState};
use super::*;

/// Body of a function declaration.
pub struct FuncState {
	prev: Box<dyn Fsm>,
	params: Params,
	name: String,
	id: UniqueId,
	/// Slots of the arguments, invocation parameter first.
	arguments: Vec<UniqueId>,
	invocation: Option<String>,
	deferred: Vec<Box<dyn Deferred>>,
	defers: Defers,
}

impl FuncState {
	/// Allocates the function slot in the enclosing scope and the argument
	/// slots in a new child scope.
	pub fn new(
		prev: Box<dyn Fsm>,
		params: &Params,
		name: &str,
		arguments: &[String],
		invocation: Option<&str>,
	) -> Self {
		let id = params.next();
		params.references.set(name, id);
		log::trace!(
			target: "ride::compiler",
			"function {} (slot {}) with {} arguments, tx {}",
			name, id, arguments.len(), params.tx_id,
		);

		let params = params.child();
		let ids = invocation
			.into_iter()
			.chain(arguments.iter().map(String::as_str))
			.map(|argument| {
				let slot = params.next();
				params.references.set(argument, slot);
				params.set_cell(slot, Cell {
					value: None,
					position: None,
					constant: false,
					debug: format!("argument {} of {}", argument, name),
				});
				slot
			})
			.collect();

		Self {
			prev,
			params,
			name: name.into(),
			id,
			arguments: ids,
			invocation: invocation.map(String::from),
			deferred: Vec::new(),
			defers: Rc::new(RefCell::new(Vec::new())),
		}
	}
}

impl Fsm for FuncState {
	transitions!();

	fn describe(&self) -> String {
		format!("function {}", self.name)
	}

	fn ret(self: Box<Self>) -> Box<dyn Fsm> {
		let this = *self;
		let body = FuncBody {
			name: this.name,
			id: this.id,
			arguments: this.arguments,
			invocation: this.invocation,
			deferred: this.deferred,
			defers: this.defers,
		};
		this.prev.ret_function(body)
	}
}

/// Finished function waiting to be written.
pub struct FuncBody {
	name: String,
	id: UniqueId,
	arguments: Vec<UniqueId>,
	invocation: Option<String>,
	deferred: Vec<Box<dyn Deferred>>,
	defers: Defers,
}

impl FuncBody {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Callables and verifiers receive the invocation context.
	pub const fn is_entry_point(&self) -> bool {
		self.invocation.is_some()
	}

	/// Writes the argument prologue, the body and then the lets of the body,
	/// recording the position of every slot written.
	pub fn write(&self, params: &Params) {
		{
			let mut builder = params.builder.borrow_mut();
			let position = builder.position();
			params.set_position(self.id, position, format!("function {}", self.name));
			for id in self.arguments.iter().rev() {
				builder.op(opcode::CACHE, *id);
				builder.byte(opcode::POP);
			}
		}

		if self.deferred.len() != 1 {
			panic!(
				"function {} has {} body expressions, tx {}",
				self.name, self.deferred.len(), params.tx_id
			);
		}
		self.deferred[0].write(params);

		let lets = self.defers.borrow();
		for binding in lets.iter() {
			binding.body.clean(params);
		}
		params.builder.borrow_mut().ret();

		for binding in lets.iter() {
			let position = params.builder.borrow().position();
			params.set_position(binding.id, position, binding.debug.clone());
			binding.body.write(params);
		}
	}
}
