//! Tree-walking evaluation of RIDE scripts.

#[macro_use]
mod macros;
mod library;
mod natives;

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::TryFrom;
use ride_core::{
	Address, ContentType, ErrorKind, EvaluationError, Function, FunctionDeclaration, Node, Object,
	Recipient, Tree, Value,
};
use crate::tracing::Event;
use crate::{Handler, Step};

pub use self::library::library_function_id;
pub use self::natives::native_name;

/// Deepest nesting of expressions and let resolutions a script may reach.
pub const MAX_EVALUATION_DEPTH: usize = 256;

/// Names bound before any script declaration.
pub const PREDEFINED: [&str; 8] = ["unit", "nil", "height", "tx", "this", "lastBlock", "Buy", "Sell"];

enum Binding<'t> {
	Value(Value),
	/// Let expression, evaluated on first reference.
	Lazy {
		expression: &'t Node,
		scope: Scope<'t>,
		cache: RefCell<Option<Value>>,
	},
	/// Global resolved through the handler on first reference.
	Predefined {
		cache: RefCell<Option<Value>>,
	},
	Function {
		declaration: &'t FunctionDeclaration,
		scope: Scope<'t>,
	},
}

struct Frame<'t> {
	name: &'t str,
	binding: Binding<'t>,
	parent: Scope<'t>,
}

type Scope<'t> = Option<Rc<Frame<'t>>>;

fn bind<'t>(parent: &Scope<'t>, name: &'t str, binding: Binding<'t>) -> Scope<'t> {
	Some(Rc::new(Frame { name, binding, parent: parent.clone() }))
}

/// Values and functions live in separate namespaces.
fn lookup<'t>(scope: &Scope<'t>, name: &str, function: bool) -> Option<Rc<Frame<'t>>> {
	let mut current = scope.as_ref();
	while let Some(frame) = current {
		let is_function = matches!(frame.binding, Binding::Function { .. });
		if frame.name == name && is_function == function {
			return Some(Rc::clone(frame))
		}
		current = frame.parent.as_ref();
	}
	None
}

pub(crate) fn failure<M: Into<String>>(message: M) -> EvaluationError {
	ErrorKind::EvaluationFailure.error(message)
}

pub(crate) fn arity(name: &str, expected: usize, got: usize) -> EvaluationError {
	ErrorKind::Undefined.error(format!(
		"function '{}' takes {} arguments, {} given", name, expected, got
	))
}

fn mismatch(name: &str, expected: &str, value: &Value) -> EvaluationError {
	ErrorKind::Undefined.error(format!(
		"{}: expected {}, got {}", name, expected, value.instance_of()
	))
}

pub(crate) fn expect_int(name: &str, value: Value) -> Result<i64, EvaluationError> {
	match value {
		Value::Int(value) => Ok(value),
		other => Err(mismatch(name, "Int", &other)),
	}
}

pub(crate) fn expect_bool(name: &str, value: Value) -> Result<bool, EvaluationError> {
	match value {
		Value::Boolean(value) => Ok(value),
		other => Err(mismatch(name, "Boolean", &other)),
	}
}

pub(crate) fn expect_bytes(name: &str, value: Value) -> Result<Vec<u8>, EvaluationError> {
	match value {
		Value::Bytes(value) => Ok(value),
		other => Err(mismatch(name, "ByteVector", &other)),
	}
}

pub(crate) fn expect_string(name: &str, value: Value) -> Result<String, EvaluationError> {
	match value {
		Value::String(value) => Ok(value),
		other => Err(mismatch(name, "String", &other)),
	}
}

pub(crate) fn expect_list(name: &str, value: Value) -> Result<Vec<Value>, EvaluationError> {
	match value {
		Value::List(value) => Ok(value),
		other => Err(mismatch(name, "List[Any]", &other)),
	}
}

pub(crate) fn expect_recipient(name: &str, value: Value) -> Result<Recipient, EvaluationError> {
	match value {
		Value::Address(address) => Ok(Recipient::Address(address)),
		Value::Recipient(recipient) => Ok(recipient),
		other => Err(mismatch(name, "Address|Alias", &other)),
	}
}

/// Evaluator of one script run against a handler.
pub struct Runtime<'h, H> {
	pub(crate) handler: &'h mut H,
	depth: usize,
}

impl<'h, H: Handler> Runtime<'h, H> {
	pub fn new(handler: &'h mut H) -> Self {
		Self { handler, depth: 0 }
	}

	pub fn handler(&self) -> &H {
		self.handler
	}

	/// Complexity spent so far.
	pub fn complexity(&self) -> u32 {
		self.handler.complexity()
	}

	pub(crate) fn version(&self) -> u8 {
		self.handler.config().lib_version
	}

	/// Evaluates an expression script, or the verifier of a dApp.
	pub fn evaluate_verifier<'t>(&mut self, tree: &'t Tree) -> Result<Value, EvaluationError> {
		let verifier = tree.verifier.as_ref()
			.ok_or_else(|| failure("script has no verifier"))?;
		let root = root_scope();
		match (tree.content, verifier) {
			(ContentType::Expression, expression) => self.eval(expression, &root),
			(ContentType::DApp, Node::FunctionDeclaration(declaration)) => {
				if !declaration.arguments.is_empty() {
					return Err(failure("verifier must not take arguments"))
				}
				let scope = declare(&tree.declarations, &root)?;
				let scope = match &declaration.invocation_parameter {
					Some(parameter) => {
						let tx = self.handler.transaction()?;
						bind(&scope, parameter, Binding::Value(tx))
					},
					None => scope,
				};
				self.eval(&declaration.body, &scope)
			},
			(ContentType::DApp, _) => Err(failure("verifier of a dApp must be a function")),
		}
	}

	/// Evaluates a callable function of a dApp with already converted arguments.
	pub fn evaluate_function<'t>(
		&mut self,
		tree: &'t Tree,
		name: &str,
		arguments: Vec<Value>,
	) -> Result<Value, EvaluationError> {
		if !tree.is_dapp() {
			return Err(failure("expression script has no callable functions"))
		}
		let declaration = tree.function(name)
			.ok_or_else(|| failure(format!("function '{}' not found", name)))?;
		if declaration.arguments.len() != arguments.len() {
			return Err(failure(format!(
				"function '{}' takes {} arguments, {} given",
				name, declaration.arguments.len(), arguments.len()
			)))
		}

		let root = root_scope();
		let scope = declare(&tree.declarations, &root)?;
		let mut scope = match &declaration.invocation_parameter {
			Some(parameter) => {
				let invocation = self.handler.invocation()?;
				bind(&scope, parameter, Binding::Value(invocation))
			},
			None => scope,
		};
		for (parameter, value) in declaration.arguments.iter().zip(arguments) {
			scope = bind(&scope, parameter, Binding::Value(value));
		}
		self.eval(&declaration.body, &scope)
	}

	fn step(&mut self, step: Step<'_>) -> Result<(), EvaluationError> {
		Event::Step(step).emit();
		self.handler.pre_validate(step)
	}

	fn eval<'t>(&mut self, node: &'t Node, scope: &Scope<'t>) -> Result<Value, EvaluationError> {
		if self.depth >= MAX_EVALUATION_DEPTH {
			log::trace!(target: "ride", "evaluation depth {} reached", self.depth);
			return Err(ErrorKind::RuntimeError.error(format!("evaluation depth exceeds {}", MAX_EVALUATION_DEPTH)))
		}
		self.depth += 1;
		let result = self.eval_node(node, scope);
		self.depth -= 1;
		result
	}

	fn eval_node<'t>(&mut self, node: &'t Node, scope: &Scope<'t>) -> Result<Value, EvaluationError> {
		match node {
			Node::Long(value) => {
				self.step(Step::Constant)?;
				Ok(Value::Int(*value))
			},
			Node::Bytes(value) => {
				self.step(Step::Constant)?;
				Ok(Value::Bytes(value.clone()))
			},
			Node::Boolean(value) => {
				self.step(Step::Constant)?;
				Ok(Value::Boolean(*value))
			},
			Node::String(value) => {
				self.step(Step::Constant)?;
				Ok(Value::String(value.clone()))
			},
			Node::Conditional { condition, true_branch, false_branch } => {
				self.step(Step::Conditional)?;
				let condition = self.eval(condition, scope)?;
				if expect_bool("if", condition)? {
					self.eval(true_branch, scope)
				} else {
					self.eval(false_branch, scope)
				}
			},
			Node::Assignment(assignment) => {
				self.step(Step::Let(&assignment.name))?;
				let block = assignment.block.as_ref()
					.ok_or_else(|| failure(format!("let '{}' has no block", assignment.name)))?;
				let binding = Binding::Lazy {
					expression: &assignment.expression,
					scope: scope.clone(),
					cache: RefCell::new(None),
				};
				let inner = bind(scope, &assignment.name, binding);
				self.eval(block, &inner)
			},
			Node::FunctionDeclaration(declaration) => {
				let block = declaration.block.as_ref()
					.ok_or_else(|| failure(format!("function '{}' has no block", declaration.name)))?;
				let binding = Binding::Function { declaration, scope: scope.clone() };
				let inner = bind(scope, &declaration.name, binding);
				self.eval(block, &inner)
			},
			Node::Reference(name) => {
				self.step(Step::Reference(name))?;
				self.resolve(name, scope)
			},
			Node::Property { object, name } => {
				self.step(Step::Property(name))?;
				let object = self.eval(object, scope)?;
				property(object, name)
			},
			Node::FunctionCall { function, arguments } => self.call(function, arguments, scope),
		}
	}

	fn resolve<'t>(&mut self, name: &str, scope: &Scope<'t>) -> Result<Value, EvaluationError> {
		let frame = lookup(scope, name, false)
			.ok_or_else(|| failure(format!("reference '{}' not found", name)))?;
		match &frame.binding {
			Binding::Value(value) => Ok(value.clone()),
			Binding::Lazy { expression, scope, cache } => {
				if let Some(value) = cache.borrow().as_ref() {
					return Ok(value.clone())
				}
				let expression: &'t Node = *expression;
				let value = self.eval(expression, scope)?;
				*cache.borrow_mut() = Some(value.clone());
				Ok(value)
			},
			Binding::Predefined { cache } => {
				if let Some(value) = cache.borrow().as_ref() {
					return Ok(value.clone())
				}
				let value = self.predefined(name)?;
				*cache.borrow_mut() = Some(value.clone());
				Ok(value)
			},
			Binding::Function { .. } => Err(failure(format!("'{}' is a function", name))),
		}
	}

	fn predefined(&self, name: &str) -> Result<Value, EvaluationError> {
		match name {
			"unit" => Ok(Value::Unit),
			"nil" => Ok(Value::List(Vec::new())),
			"height" => i64::try_from(self.handler.height())
				.map(Value::Int)
				.map_err(|_| failure("height out of range")),
			"tx" => self.handler.transaction(),
			"this" => Ok(self.handler.this()),
			"lastBlock" => self.handler.last_block(),
			"Buy" => Ok(Object::new("Buy").into()),
			"Sell" => Ok(Object::new("Sell").into()),
			_ => Err(failure(format!("reference '{}' not found", name))),
		}
	}

	fn arguments<'t>(&mut self, arguments: &'t [Node], scope: &Scope<'t>) -> Result<Vec<Value>, EvaluationError> {
		arguments.iter().map(|argument| self.eval(argument, scope)).collect()
	}

	fn call<'t>(
		&mut self,
		function: &'t Function,
		arguments: &'t [Node],
		scope: &Scope<'t>,
	) -> Result<Value, EvaluationError> {
		match function {
			Function::Native(id) => {
				let native = natives::native::<H>(*id)
					.filter(|native| native.since <= self.version())
					.ok_or_else(|| failure(format!("native function {} not found", id)))?;
				let values = self.arguments(arguments, scope)?;
				self.step(Step::Native { name: native.name, cost: native.cost })?;
				(native.function)(self, values)
			},
			Function::User(name) => {
				if let Some(frame) = lookup(scope, name, true) {
					if let Binding::Function { declaration, scope: closure } = &frame.binding {
						let declaration: &'t FunctionDeclaration = *declaration;
						if declaration.arguments.len() != arguments.len() {
							return Err(arity(name, declaration.arguments.len(), arguments.len()))
						}
						let values = self.arguments(arguments, scope)?;
						self.step(Step::UserFunction(name))?;
						let mut inner = closure.clone();
						for (parameter, value) in declaration.arguments.iter().zip(values) {
							inner = bind(&inner, parameter, Binding::Value(value));
						}
						return self.eval(&declaration.body, &inner)
					}
				}

				let entry = library::function::<H>(name)
					.filter(|entry| entry.since <= self.version())
					.ok_or_else(|| failure(format!("function '{}' not found", name)))?;
				let values = self.arguments(arguments, scope)?;
				self.step(Step::Native { name: entry.name, cost: entry.cost })?;
				(entry.function)(self, values)
			},
		}
	}

	/// Resolves an alias through the handler.
	pub(crate) fn address(&self, recipient: Recipient) -> Result<Address, EvaluationError> {
		match recipient {
			Recipient::Address(address) => Ok(address),
			Recipient::Alias(alias) => self.handler.resolve_alias(&alias),
		}
	}
}

fn root_scope<'t>() -> Scope<'t> {
	PREDEFINED.iter().copied().fold(None, |scope, name| {
		bind(&scope, name, Binding::Predefined { cache: RefCell::new(None) })
	})
}

/// Folds top-level declarations into the scope in order.
fn declare<'t>(declarations: &'t [Node], root: &Scope<'t>) -> Result<Scope<'t>, EvaluationError> {
	let mut scope = root.clone();
	for declaration in declarations {
		scope = match declaration {
			Node::Assignment(assignment) => {
				let binding = Binding::Lazy {
					expression: &assignment.expression,
					scope: scope.clone(),
					cache: RefCell::new(None),
				};
				bind(&scope, &assignment.name, binding)
			},
			Node::FunctionDeclaration(declaration) => {
				let binding = Binding::Function { declaration, scope: scope.clone() };
				bind(&scope, &declaration.name, binding)
			},
			_ => return Err(failure("unexpected top-level declaration")),
		};
	}
	Ok(scope)
}

fn property(object: Value, name: &str) -> Result<Value, EvaluationError> {
	match (object, name) {
		(Value::Object(object), _) => object.get(name).cloned()
			.ok_or_else(|| failure(format!("{} has no field '{}'", object.instance(), name))),
		(Value::Address(address), "bytes")
		| (Value::Recipient(Recipient::Address(address)), "bytes") => Ok(Value::bytes(address.as_bytes())),
		(Value::Recipient(Recipient::Alias(alias)), "alias") => Ok(Value::String(alias.alias)),
		(other, _) => Err(failure(format!("{} has no field '{}'", other.instance_of(), name))),
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use alloc::boxed::Box;
	use alloc::collections::BTreeMap;
	use alloc::vec;
	use ride_core::{Alias, Assignment, H256};
	use crate::Config;

	/// Handler backed by in-memory maps, charging one unit per step.
	pub struct MockHandler {
		pub config: &'static Config,
		pub limit: u32,
		pub used: u32,
		pub steps: Vec<String>,
		pub data: BTreeMap<String, Value>,
		pub invocations: Vec<(Address, String, Vec<Value>)>,
	}

	impl MockHandler {
		pub fn new(config: &'static Config) -> Self {
			Self {
				config,
				limit: 1000,
				used: 0,
				steps: Vec::new(),
				data: BTreeMap::new(),
				invocations: Vec::new(),
			}
		}
	}

	pub fn this_address() -> Address {
		Address::from_public_key(b'W', &ride_core::PublicKey::repeat_byte(7))
	}

	impl Handler for MockHandler {
		fn config(&self) -> &'static Config { self.config }
		fn scheme(&self) -> u8 { b'W' }
		fn height(&self) -> u64 { 42 }
		fn this(&self) -> Value { Value::Address(this_address()) }
		fn transaction(&self) -> Result<Value, EvaluationError> {
			Ok(Object::new("TransferTransaction").with("fee", 100_000_i64).into())
		}
		fn invocation(&self) -> Result<Value, EvaluationError> {
			Ok(Object::new("Invocation").with("caller", Value::Address(this_address())).into())
		}
		fn last_block(&self) -> Result<Value, EvaluationError> {
			Ok(Object::new("BlockInfo").with("height", 42_i64).into())
		}
		fn pre_validate(&mut self, step: Step<'_>) -> Result<(), EvaluationError> {
			self.steps.push(format!("{:?}", step));
			self.used += 1;
			if self.used > self.limit {
				return Err(ErrorKind::RuntimeError.error("complexity limit exceeded"))
			}
			Ok(())
		}
		fn complexity(&self) -> u32 { self.used }
		fn resolve_alias(&self, alias: &Alias) -> Result<Address, EvaluationError> {
			if alias.alias == "known" {
				Ok(this_address())
			} else {
				Err(failure("alias not found"))
			}
		}
		fn data_entry(&self, _address: &Address, key: &str) -> Result<Option<Value>, EvaluationError> {
			Ok(self.data.get(key).cloned())
		}
		fn balance(&self, _address: &Address, asset: Option<H256>) -> Result<i64, EvaluationError> {
			Ok(if asset.is_some() { 5 } else { 1_000 })
		}
		fn balance_details(&self, _address: &Address) -> Result<Value, EvaluationError> {
			Ok(Object::new("BalanceDetails").with("available", 1_000_i64).into())
		}
		fn asset_info(&self, _asset: &H256) -> Result<Value, EvaluationError> {
			Ok(Value::Unit)
		}
		fn block_info(&self, height: u64) -> Result<Value, EvaluationError> {
			Ok(Object::new("BlockInfo").with("height", height as i64).into())
		}
		fn invoke(
			&mut self,
			dapp: &Address,
			function: &str,
			arguments: Vec<Value>,
			_payments: Vec<Value>,
		) -> Result<Value, EvaluationError> {
			self.invocations.push((*dapp, function.into(), arguments));
			Ok(Value::Unit)
		}
	}

	pub fn run(version: &'static Config, node: Node) -> Result<Value, EvaluationError> {
		let mut handler = MockHandler::new(version);
		let tree = Tree::expression(version.lib_version, node);
		Runtime::new(&mut handler).evaluate_verifier(&tree)
	}

	fn config() -> &'static Config {
		Config::for_version(5).unwrap()
	}

	#[test]
	fn evaluates_constants_and_conditionals() {
		let node = Node::conditional(
			Node::Boolean(false),
			Node::Long(1),
			Node::native(100, vec![Node::Long(2), Node::Long(3)]),
		);
		assert_eq!(run(config(), node).unwrap(), Value::Int(5));
	}

	#[test]
	fn condition_must_be_boolean() {
		let node = Node::conditional(Node::Long(1), Node::Long(1), Node::Long(2));
		let err = run(config(), node).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Undefined);
	}

	#[test]
	fn lets_are_lazy_and_memoized() {
		// let a = throw("boom"); 1
		let unused = Node::let_in(
			"a",
			Node::native(2, vec![Node::string("boom")]),
			Node::Long(1),
		);
		assert_eq!(run(config(), unused).unwrap(), Value::Int(1));

		let mut handler = MockHandler::new(config());
		let node = Node::let_in(
			"a",
			Node::native(100, vec![Node::Long(2), Node::Long(3)]),
			Node::native(100, vec![Node::reference("a"), Node::reference("a")]),
		);
		let tree = Tree::expression(5, node);
		let value = Runtime::new(&mut handler).evaluate_verifier(&tree).unwrap();
		assert_eq!(value, Value::Int(10));
		let natives = handler.steps.iter().filter(|step| step.starts_with("Native")).count();
		assert_eq!(natives, 2);
	}

	#[test]
	fn user_errors_come_from_throw() {
		let node = Node::native(2, vec![Node::string("boom")]);
		let err = run(config(), node).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::UserError);
		assert_eq!(err.message(), "boom");
	}

	#[test]
	fn functions_capture_their_scope() {
		// let x = 10; func f(y) = x + y; let x = 1; f(x)
		let call = Node::user("f", vec![Node::reference("x")]);
		let shadow = Node::let_in("x", Node::Long(1), call);
		let function = FunctionDeclaration {
			block: Some(Box::new(shadow)),
			..FunctionDeclaration::new(
				"f",
				&["y"],
				Node::native(100, vec![Node::reference("x"), Node::reference("y")]),
			)
		};
		let node = Node::let_in("x", Node::Long(10), Node::FunctionDeclaration(function));
		assert_eq!(run(config(), node).unwrap(), Value::Int(11));
	}

	#[test]
	fn unknown_reference_fails() {
		let err = run(config(), Node::reference("nope")).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::EvaluationFailure);
	}

	#[test]
	fn let_without_block_fails() {
		let node = Node::Assignment(Assignment {
			name: "a".into(),
			expression: Box::new(Node::Long(1)),
			block: None,
			new_block: false,
		});
		assert!(run(config(), node).is_err());
	}

	#[test]
	fn predefined_globals_resolve_through_the_handler() {
		assert_eq!(run(config(), Node::reference("height")).unwrap(), Value::Int(42));
		let fee = Node::property(Node::reference("tx"), "fee");
		assert_eq!(run(config(), fee).unwrap(), Value::Int(100_000));
		assert_eq!(run(config(), Node::reference("nil")).unwrap(), Value::List(vec![]));
	}

	#[test]
	fn complexity_limit_stops_evaluation() {
		let mut handler = MockHandler::new(config());
		handler.limit = 3;
		let node = Node::native(100, vec![
			Node::native(100, vec![Node::Long(1), Node::Long(2)]),
			Node::Long(3),
		]);
		let tree = Tree::expression(5, node);
		let err = Runtime::new(&mut handler).evaluate_verifier(&tree).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::RuntimeError);
		assert_eq!(handler.used, 4);
	}

	#[test]
	fn dapp_callable_binds_invocation_and_arguments() {
		let mut tree = Tree::dapp(5);
		tree.declarations.push(Node::global("base", Node::Long(100)));
		tree.functions.push(FunctionDeclaration::new(
			"call",
			&["amount"],
			Node::native(100, vec![Node::reference("base"), Node::reference("amount")]),
		).callable("i"));
		tree.functions.push(FunctionDeclaration::new(
			"who",
			&[],
			Node::property(Node::reference("i"), "caller"),
		).callable("i"));

		let mut handler = MockHandler::new(config());
		let mut runtime = Runtime::new(&mut handler);
		assert_eq!(runtime.evaluate_function(&tree, "call", vec![Value::Int(5)]).unwrap(), Value::Int(105));
		assert_eq!(
			runtime.evaluate_function(&tree, "who", vec![]).unwrap(),
			Value::Address(this_address()),
		);
		let err = runtime.evaluate_function(&tree, "missing", vec![]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::EvaluationFailure);
		let err = runtime.evaluate_function(&tree, "call", vec![]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::EvaluationFailure);
	}

	/// `let a0 = 0; let a1 = a0; ...` with a callable returning the last one.
	fn chained_globals(length: usize) -> Tree {
		let mut tree = Tree::dapp(5);
		tree.declarations.push(Node::global("a0", Node::Long(0)));
		for n in 1..length {
			tree.declarations.push(Node::global(&format!("a{}", n), Node::reference(&format!("a{}", n - 1))));
		}
		tree.functions.push(FunctionDeclaration::new(
			"last",
			&[],
			Node::reference(&format!("a{}", length - 1)),
		).callable("i"));
		tree
	}

	#[test]
	fn deep_let_chains_fail_instead_of_overflowing() {
		let mut handler = MockHandler::new(config());
		handler.limit = u32::MAX;
		let shallow = chained_globals(MAX_EVALUATION_DEPTH / 2);
		assert_eq!(Runtime::new(&mut handler).evaluate_function(&shallow, "last", vec![]).unwrap(), Value::Int(0));

		let deep = chained_globals(1000);
		let mut runtime = Runtime::new(&mut handler);
		let err = runtime.evaluate_function(&deep, "last", vec![]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::RuntimeError);
		assert!(err.message().starts_with("evaluation depth"));
		// depth unwinds with the error
		assert_eq!(runtime.evaluate_function(&shallow, "last", vec![]).unwrap(), Value::Int(0));
	}

	#[test]
	fn dapp_verifier_sees_the_transaction() {
		let mut tree = Tree::dapp(5);
		tree.verifier = Some(Node::FunctionDeclaration(FunctionDeclaration::new(
			"verify",
			&[],
			Node::native(0, vec![
				Node::property(Node::reference("t"), "fee"),
				Node::Long(100_000),
			]),
		).callable("t")));
		let mut handler = MockHandler::new(config());
		assert_eq!(Runtime::new(&mut handler).evaluate_verifier(&tree).unwrap(), Value::Boolean(true));
	}

	#[test]
	fn natives_are_gated_by_version() {
		let node = Node::native(1020, vec![
			Node::reference("this"),
			Node::string("f"),
			Node::reference("nil"),
			Node::reference("nil"),
		]);
		assert!(run(Config::for_version(4).unwrap(), node.clone()).is_err());
		assert_eq!(run(config(), node).unwrap(), Value::Unit);
	}

	#[test]
	fn address_properties() {
		let bytes = Node::property(Node::reference("this"), "bytes");
		assert_eq!(run(config(), bytes).unwrap(), Value::bytes(this_address().as_bytes()));
		let err = run(config(), Node::property(Node::Long(1), "bytes")).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::EvaluationFailure);
	}
}
