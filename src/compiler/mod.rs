//! Slot compiler of script trees.
//!
//! The tree is walked once, driving a state machine: each state collects
//! deferred writers for the nodes below it and hands a single writer to its
//! parent on return. Names resolve to slot ids during the walk, bytecode is
//! emitted afterwards by the top-level state. Functions and lets are laid
//! out after the code using them; a reference is a `REF` of the slot id
//! whose position is recorded in the cell table.
//!
//! Inputs are trees that already passed the earlier compilation stages, so
//! broken invariants (unresolved names, impossible transitions) panic.

macro_rules! transitions {
	() => {
		fn long(mut self: Box<Self>, value: i64) -> Box<dyn Fsm> {
			let constant = self.params.constant(Value::Int(value));
			self.deferred.push(Box::new(constant));
			self
		}

		fn boolean(mut self: Box<Self>, value: bool) -> Box<dyn Fsm> {
			let constant = self.params.constant(Value::Boolean(value));
			self.deferred.push(Box::new(constant));
			self
		}

		fn string(mut self: Box<Self>, value: &str) -> Box<dyn Fsm> {
			let constant = self.params.constant(Value::string(value));
			self.deferred.push(Box::new(constant));
			self
		}

		fn bytes(mut self: Box<Self>, value: &[u8]) -> Box<dyn Fsm> {
			let constant = self.params.constant(Value::bytes(value));
			self.deferred.push(Box::new(constant));
			self
		}

		fn reference(mut self: Box<Self>, name: &str) -> Box<dyn Fsm> {
			let id = self.params.resolve(name);
			self.deferred.push(Box::new(ConstantDeferred(id)));
			self
		}

		fn assignment(self: Box<Self>, name: &str) -> Box<dyn Fsm> {
			let params = self.params.clone();
			let defers = self.defers.clone();
			Box::new(AssignmentState::new(self, params, defers, name))
		}

		fn condition(self: Box<Self>) -> Box<dyn Fsm> {
			let params = self.params.clone();
			let defers = self.defers.clone();
			Box::new(ConditionalState::new(self, params, defers))
		}

		fn call(self: Box<Self>, function: &Function, argc: u16) -> Box<dyn Fsm> {
			let params = self.params.clone();
			let defers = self.defers.clone();
			Box::new(CallState::new(self, params, defers, function, argc))
		}

		fn property(self: Box<Self>, name: &str) -> Box<dyn Fsm> {
			let params = self.params.clone();
			let defers = self.defers.clone();
			Box::new(PropertyState::new(self, params, defers, name))
		}

		fn ret_deferred(mut self: Box<Self>, deferred: Box<dyn Deferred>) -> Box<dyn Fsm> {
			self.deferred.push(deferred);
			self
		}
	};
}

mod builder;
mod func;
mod scope;
mod states;

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::TryFrom;
use ride_core::{ContentType, Function, FunctionDeclaration, Node, Tree};

pub use self::builder::{opcode, Builder};
pub use self::scope::{Cell, Params, References};
use self::func::FuncBody;
use self::states::MainState;

/// Slot identifier.
pub type UniqueId = u16;
/// Bytecode offset.
pub type Position = u16;
/// Resolves a standard library function name to its call id.
pub type FunctionChecker = fn(&str) -> Option<u16>;

/// Writer of a piece of bytecode, run once the whole tree is walked.
pub trait Deferred {
	fn write(&self, params: &Params);
	/// Forgets the cached values owned by the writer.
	fn clean(&self, _params: &Params) {}
}

/// `REF id` of an already allocated slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantDeferred(pub UniqueId);

impl Deferred for ConstantDeferred {
	fn write(&self, params: &Params) {
		params.builder.borrow_mut().reference(self.0);
	}
}

/// Let bindings collected in one function or at the top level, in definition order.
pub(crate) type Defers = Rc<RefCell<Vec<Let>>>;

pub(crate) struct Let {
	pub id: UniqueId,
	pub body: Box<dyn Deferred>,
	pub debug: String,
}

/// Compiler state. Every transition consumes the state and yields the next one.
pub trait Fsm {
	/// Short description for diagnostics.
	fn describe(&self) -> String;

	fn assignment(self: Box<Self>, name: &str) -> Box<dyn Fsm>;
	/// Ends the current node, handing control back to the enclosing state.
	fn ret(self: Box<Self>) -> Box<dyn Fsm>;
	fn long(self: Box<Self>, value: i64) -> Box<dyn Fsm>;
	fn boolean(self: Box<Self>, value: bool) -> Box<dyn Fsm>;
	fn string(self: Box<Self>, value: &str) -> Box<dyn Fsm>;
	fn bytes(self: Box<Self>, value: &[u8]) -> Box<dyn Fsm>;
	fn reference(self: Box<Self>, name: &str) -> Box<dyn Fsm>;
	fn condition(self: Box<Self>) -> Box<dyn Fsm>;
	fn call(self: Box<Self>, function: &Function, argc: u16) -> Box<dyn Fsm>;
	fn property(self: Box<Self>, name: &str) -> Box<dyn Fsm>;
	/// Receives the writer of a finished child state.
	fn ret_deferred(self: Box<Self>, deferred: Box<dyn Deferred>) -> Box<dyn Fsm>;

	fn true_branch(self: Box<Self>) -> Box<dyn Fsm> {
		panic!("illegal call `true_branch` on {}", self.describe())
	}

	fn false_branch(self: Box<Self>) -> Box<dyn Fsm> {
		panic!("illegal call `false_branch` on {}", self.describe())
	}

	fn func(self: Box<Self>, name: &str, _arguments: &[String], _invocation: Option<&str>) -> Box<dyn Fsm> {
		panic!("illegal call `func` ({}) on {}", name, self.describe())
	}

	/// Receives a finished function.
	fn ret_function(self: Box<Self>, function: FuncBody) -> Box<dyn Fsm> {
		panic!("illegal return of function {} to {}", function.name(), self.describe())
	}

	/// Emits the bytecode of the whole compilation.
	fn emit(&self, _params: &Params) {
		panic!("unterminated {}", self.describe())
	}
}

/// Result of a compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Executable {
	pub bytecode: Vec<u8>,
	/// Offsets of the script expression (`""`) and of callables and verifier.
	pub entry_points: BTreeMap<String, Position>,
	pub cells: BTreeMap<UniqueId, Cell>,
}

impl Executable {
	#[must_use]
	pub fn entry_point(&self, name: &str) -> Option<Position> {
		self.entry_points.get(name).copied()
	}
}

fn argc(arguments: &[Node], params: &Params) -> u16 {
	u16::try_from(arguments.len())
		.unwrap_or_else(|_| panic!("{} call arguments, tx {}", arguments.len(), params.tx_id))
}

fn walk_function(fsm: Box<dyn Fsm>, function: &FunctionDeclaration, params: &Params) -> Box<dyn Fsm> {
	let fsm = fsm.func(&function.name, &function.arguments, function.invocation_parameter.as_deref());
	let fsm = walk(fsm, &function.body, params).ret();
	match &function.block {
		Some(block) => walk(fsm, block, params),
		None => fsm,
	}
}

fn walk(fsm: Box<dyn Fsm>, node: &Node, params: &Params) -> Box<dyn Fsm> {
	match node {
		Node::Long(value) => fsm.long(*value),
		Node::Boolean(value) => fsm.boolean(*value),
		Node::String(value) => fsm.string(value),
		Node::Bytes(value) => fsm.bytes(value),
		Node::Reference(name) => fsm.reference(name),
		Node::Conditional { condition, true_branch, false_branch } => {
			let fsm = walk(fsm.condition(), condition, params);
			let fsm = walk(fsm.true_branch(), true_branch, params);
			let fsm = walk(fsm.false_branch(), false_branch, params);
			fsm.ret()
		},
		Node::Assignment(assignment) => {
			let fsm = walk(fsm.assignment(&assignment.name), &assignment.expression, params).ret();
			match &assignment.block {
				Some(block) => walk(fsm, block, params),
				None => fsm,
			}
		},
		Node::FunctionDeclaration(function) => walk_function(fsm, function, params),
		Node::FunctionCall { function, arguments } => {
			let mut fsm = fsm.call(function, argc(arguments, params));
			for argument in arguments {
				fsm = walk(fsm, argument, params);
			}
			fsm.ret()
		},
		Node::Property { object, name } => walk(fsm.property(name), object, params).ret(),
	}
}

/// Compiles a tree into bytecode and its slot table.
///
/// `functions` resolves standard library names; `tx_id` only labels diagnostics.
#[must_use]
pub fn compile(tree: &Tree, functions: FunctionChecker, tx_id: &str) -> Executable {
	let params = Params::new(functions, tx_id);
	let mut fsm: Box<dyn Fsm> = Box::new(MainState::new(params.clone()));
	match tree.content {
		ContentType::Expression => {
			if let Some(expression) = &tree.verifier {
				fsm = walk(fsm, expression, &params);
			}
		},
		ContentType::DApp => {
			for declaration in &tree.declarations {
				fsm = walk(fsm, declaration, &params);
			}
			for function in &tree.functions {
				fsm = walk_function(fsm, function, &params);
			}
			if let Some(verifier) = &tree.verifier {
				fsm = walk(fsm, verifier, &params);
			}
		},
	}
	fsm.emit(&params);

	let executable = Executable {
		bytecode: params.builder.borrow().bytes().to_vec(),
		entry_points: params.entry_points.borrow().clone(),
		cells: params.cells.borrow().clone(),
	};
	log::debug!(
		target: "ride::compiler",
		"compiled {} bytes, {} slots, {} entry points, tx {}",
		executable.bytecode.len(), executable.cells.len(), executable.entry_points.len(), tx_id,
	);
	executable
}
