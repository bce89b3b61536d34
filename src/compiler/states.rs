use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::TryFrom;
use ride_core::{Function, Value};
use ride_runtime::PREDEFINED;
use super::func::{FuncBody, FuncState};
use super::*;

/// Top level of a script: global lets, functions and the script expression.
pub struct MainState {
	params: Params,
	deferred: Vec<Box<dyn Deferred>>,
	defers: Defers,
	functions: Vec<FuncBody>,
}

impl MainState {
	pub fn new(params: Params) -> Self {
		for name in &PREDEFINED {
			params.add_predefined(name);
		}
		Self { params, deferred: Vec::new(), defers: Rc::new(RefCell::new(Vec::new())), functions: Vec::new() }
	}
}

impl Fsm for MainState {
	transitions!();

	fn describe(&self) -> String {
		"main".into()
	}

	fn ret(self: Box<Self>) -> Box<dyn Fsm> {
		panic!("illegal call `ret` on main, tx {}", self.params.tx_id)
	}

	fn func(self: Box<Self>, name: &str, arguments: &[String], invocation: Option<&str>) -> Box<dyn Fsm> {
		let params = self.params.clone();
		Box::new(FuncState::new(self, &params, name, arguments, invocation))
	}

	fn ret_function(mut self: Box<Self>, function: FuncBody) -> Box<dyn Fsm> {
		self.functions.push(function);
		self
	}

	fn emit(&self, params: &Params) {
		if self.deferred.len() > 1 {
			panic!("{} top-level expressions, tx {}", self.deferred.len(), params.tx_id);
		}
		let lets = self.defers.borrow();
		if let Some(expression) = self.deferred.first() {
			let position = params.builder.borrow().position();
			params.entry_points.borrow_mut().insert(String::new(), position);
			expression.write(params);
			for binding in lets.iter() {
				binding.body.clean(params);
			}
			params.builder.borrow_mut().ret();
		}
		for binding in lets.iter() {
			let position = params.builder.borrow().position();
			params.set_position(binding.id, position, binding.debug.clone());
			binding.body.write(params);
		}
		for function in &self.functions {
			let position = params.builder.borrow().position();
			function.write(params);
			if function.is_entry_point() {
				params.entry_points.borrow_mut().insert(function.name().into(), position);
			}
		}
	}
}

/// Let binding: evaluates the expression once and caches it in the slot.
struct AssignmentBody {
	id: UniqueId,
	expression: Box<dyn Deferred>,
}

impl Deferred for AssignmentBody {
	fn write(&self, params: &Params) {
		self.expression.write(params);
		let mut builder = params.builder.borrow_mut();
		builder.op(opcode::CACHE, self.id);
		builder.ret();
	}

	fn clean(&self, params: &Params) {
		params.builder.borrow_mut().op(opcode::CLEAR_CACHE, self.id);
	}
}

pub struct AssignmentState {
	prev: Box<dyn Fsm>,
	params: Params,
	name: String,
	id: UniqueId,
	deferred: Vec<Box<dyn Deferred>>,
	defers: Defers,
}

impl AssignmentState {
	pub fn new(prev: Box<dyn Fsm>, params: Params, defers: Defers, name: &str) -> Self {
		let id = params.next();
		Self { prev, params, name: name.into(), id, deferred: Vec::new(), defers }
	}
}

impl Fsm for AssignmentState {
	transitions!();

	fn describe(&self) -> String {
		format!("let {}", self.name)
	}

	fn ret(self: Box<Self>) -> Box<dyn Fsm> {
		let this = *self;
		let mut deferred = this.deferred;
		if deferred.len() != 1 {
			panic!("let {} has {} expressions, tx {}", this.name, deferred.len(), this.params.tx_id);
		}
		let expression = deferred.remove(0);
		this.params.references.set(&this.name, this.id);
		this.defers.borrow_mut().push(Let {
			id: this.id,
			body: Box::new(AssignmentBody { id: this.id, expression }),
			debug: format!("let {}", this.name),
		});
		this.prev
	}
}

struct ConditionalBody {
	condition: Box<dyn Deferred>,
	true_branch: Box<dyn Deferred>,
	false_branch: Box<dyn Deferred>,
}

impl Deferred for ConditionalBody {
	fn write(&self, params: &Params) {
		self.condition.write(params);
		let otherwise = params.builder.borrow_mut().jump(opcode::JUMP_IF_FALSE);
		self.true_branch.write(params);
		let end = params.builder.borrow_mut().jump(opcode::JUMP);
		{
			let mut builder = params.builder.borrow_mut();
			let position = builder.position();
			builder.patch(otherwise, position);
		}
		self.false_branch.write(params);
		let mut builder = params.builder.borrow_mut();
		let position = builder.position();
		builder.patch(end, position);
	}
}

pub struct ConditionalState {
	prev: Box<dyn Fsm>,
	params: Params,
	deferred: Vec<Box<dyn Deferred>>,
	defers: Defers,
}

impl ConditionalState {
	pub fn new(prev: Box<dyn Fsm>, params: Params, defers: Defers) -> Self {
		Self { prev, params, deferred: Vec::new(), defers }
	}

	fn expect(&self, count: usize, at: &str) {
		if self.deferred.len() != count {
			panic!(
				"condition has {} parts at {}, expected {}, tx {}",
				self.deferred.len(), at, count, self.params.tx_id
			);
		}
	}
}

impl Fsm for ConditionalState {
	transitions!();

	fn describe(&self) -> String {
		"condition".into()
	}

	fn true_branch(self: Box<Self>) -> Box<dyn Fsm> {
		self.expect(1, "true branch");
		self
	}

	fn false_branch(self: Box<Self>) -> Box<dyn Fsm> {
		self.expect(2, "false branch");
		self
	}

	fn ret(self: Box<Self>) -> Box<dyn Fsm> {
		self.expect(3, "end");
		let this = *self;
		match <[Box<dyn Deferred>; 3]>::try_from(this.deferred) {
			Ok([condition, true_branch, false_branch]) => {
				let body = ConditionalBody { condition, true_branch, false_branch };
				this.prev.ret_deferred(Box::new(body))
			},
			Err(parts) => panic!("condition has {} parts, tx {}", parts.len(), this.params.tx_id),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Callee {
	/// Built-in or standard library function.
	External(u16),
	/// Function declared in the script, by slot.
	Script(UniqueId),
}

struct CallBody {
	callee: Callee,
	argc: u16,
	arguments: Vec<Box<dyn Deferred>>,
}

impl Deferred for CallBody {
	fn write(&self, params: &Params) {
		for argument in &self.arguments {
			argument.write(params);
		}
		let mut builder = params.builder.borrow_mut();
		match self.callee {
			Callee::External(id) => {
				builder.op(opcode::EXTERNAL_CALL, id);
				builder.u16(self.argc);
			},
			Callee::Script(id) => builder.op(opcode::CALL, id),
		}
	}
}

pub struct CallState {
	prev: Box<dyn Fsm>,
	params: Params,
	name: String,
	callee: Callee,
	argc: u16,
	deferred: Vec<Box<dyn Deferred>>,
	defers: Defers,
}

impl CallState {
	pub fn new(prev: Box<dyn Fsm>, params: Params, defers: Defers, function: &Function, argc: u16) -> Self {
		let (name, callee) = match function {
			Function::Native(id) => (format!("native {}", id), Callee::External(*id)),
			Function::User(name) => {
				let callee = match params.references.get(name) {
					Some(id) => Callee::Script(id),
					None => match (params.functions)(name) {
						Some(id) => Callee::External(id),
						None => panic!("function {} not found, tx {}", name, params.tx_id),
					},
				};
				(name.clone(), callee)
			},
		};
		Self { prev, params, name, callee, argc, deferred: Vec::new(), defers }
	}
}

impl Fsm for CallState {
	transitions!();

	fn describe(&self) -> String {
		format!("call of {}", self.name)
	}

	fn ret(self: Box<Self>) -> Box<dyn Fsm> {
		let this = *self;
		if this.deferred.len() != usize::from(this.argc) {
			panic!(
				"call of {} has {} arguments, {} declared, tx {}",
				this.name, this.deferred.len(), this.argc, this.params.tx_id
			);
		}
		let body = CallBody { callee: this.callee, argc: this.argc, arguments: this.deferred };
		this.prev.ret_deferred(Box::new(body))
	}
}

struct PropertyBody {
	object: Box<dyn Deferred>,
	name: UniqueId,
}

impl Deferred for PropertyBody {
	fn write(&self, params: &Params) {
		self.object.write(params);
		params.builder.borrow_mut().op(opcode::PROPERTY, self.name);
	}
}

pub struct PropertyState {
	prev: Box<dyn Fsm>,
	params: Params,
	name: String,
	deferred: Vec<Box<dyn Deferred>>,
	defers: Defers,
}

impl PropertyState {
	pub fn new(prev: Box<dyn Fsm>, params: Params, defers: Defers, name: &str) -> Self {
		Self { prev, params, name: name.into(), deferred: Vec::new(), defers }
	}
}

impl Fsm for PropertyState {
	transitions!();

	fn describe(&self) -> String {
		format!("property {}", self.name)
	}

	fn ret(self: Box<Self>) -> Box<dyn Fsm> {
		let this = *self;
		let mut deferred = this.deferred;
		if deferred.len() != 1 {
			panic!("property {} has {} objects, tx {}", this.name, deferred.len(), this.params.tx_id);
		}
		let object = deferred.remove(0);
		let name = this.params.constant(Value::String(this.name)).0;
		this.prev.ret_deferred(Box::new(PropertyBody { object, name }))
	}
}
