use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::{Cell as Counter, RefCell};
use ride_core::Value;
use super::{Builder, ConstantDeferred, FunctionChecker, Position, UniqueId};

/// Name to slot mapping of one lexical scope.
///
/// Bindings land in the scope's own map; parents are only read.
#[derive(Debug, Default)]
pub struct References {
	map: RefCell<BTreeMap<String, UniqueId>>,
	parent: Option<Rc<References>>,
}

impl References {
	#[must_use]
	pub fn new() -> Rc<Self> {
		Rc::new(Self::default())
	}

	/// Child scope seeing every binding of `parent`.
	#[must_use]
	pub fn child(parent: &Rc<Self>) -> Rc<Self> {
		Rc::new(Self { map: RefCell::new(BTreeMap::new()), parent: Some(parent.clone()) })
	}

	pub fn set(&self, name: &str, id: UniqueId) {
		self.map.borrow_mut().insert(name.into(), id);
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<UniqueId> {
		match self.map.borrow().get(name) {
			Some(id) => Some(*id),
			None => self.parent.as_ref().and_then(|parent| parent.get(name)),
		}
	}
}

/// Slot table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
	/// Value of a constant.
	pub value: Option<Value>,
	/// Bytecode offset of a function or let.
	pub position: Option<Position>,
	pub constant: bool,
	/// Human readable origin of the slot.
	pub debug: String,
}

/// State shared by every state of one compilation.
#[derive(Clone)]
pub struct Params {
	pub(crate) builder: Rc<RefCell<Builder>>,
	pub(crate) references: Rc<References>,
	pub(crate) functions: FunctionChecker,
	unique: Rc<Counter<UniqueId>>,
	pub(crate) cells: Rc<RefCell<BTreeMap<UniqueId, Cell>>>,
	pub(crate) entry_points: Rc<RefCell<BTreeMap<String, Position>>>,
	pub(crate) tx_id: Rc<str>,
}

impl Params {
	pub fn new(functions: FunctionChecker, tx_id: &str) -> Self {
		Self {
			builder: Rc::new(RefCell::new(Builder::new())),
			references: References::new(),
			functions,
			unique: Rc::new(Counter::new(0)),
			cells: Rc::new(RefCell::new(BTreeMap::new())),
			entry_points: Rc::new(RefCell::new(BTreeMap::new())),
			tx_id: tx_id.into(),
		}
	}

	/// Same compilation, fresh child scope.
	#[must_use]
	pub fn child(&self) -> Self {
		Self { references: References::child(&self.references), ..self.clone() }
	}

	/// Allocates a slot id; ids are never reused.
	pub fn next(&self) -> UniqueId {
		let id = self.unique.get().checked_add(1)
			.unwrap_or_else(|| panic!("slot ids exhausted, tx {}", self.tx_id));
		self.unique.set(id);
		id
	}

	pub fn set_cell(&self, id: UniqueId, cell: Cell) {
		self.cells.borrow_mut().insert(id, cell);
	}

	/// Records where the code of a slot starts.
	pub fn set_position(&self, id: UniqueId, position: Position, debug: String) {
		self.set_cell(id, Cell { value: None, position: Some(position), constant: false, debug });
	}

	pub fn add_predefined(&self, name: &str) {
		let id = self.next();
		self.references.set(name, id);
		self.set_cell(id, Cell { value: None, position: None, constant: false, debug: name.into() });
	}

	/// Allocates a constant slot.
	pub fn constant(&self, value: Value) -> ConstantDeferred {
		let id = self.next();
		let debug = format!("constant {:?}", value);
		self.set_cell(id, Cell { value: Some(value), position: None, constant: true, debug });
		ConstantDeferred(id)
	}

	/// Slot of a name visible from this scope.
	///
	/// Unresolved names come from an earlier broken stage and abort the compilation.
	pub fn resolve(&self, name: &str) -> UniqueId {
		self.references.get(name)
			.unwrap_or_else(|| panic!("reference {} not found, tx {}", name, self.tx_id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn child_scopes_shadow_without_touching_parent() {
		let parent = References::new();
		parent.set("a", 1);
		parent.set("b", 2);
		let child = References::child(&parent);
		child.set("a", 10);
		assert_eq!(child.get("a"), Some(10));
		assert_eq!(child.get("b"), Some(2));
		assert_eq!(parent.get("a"), Some(1));
		assert_eq!(child.get("c"), None);
	}

	#[test]
	fn ids_are_monotonic_across_child_params() {
		let params = Params::new(|_| None, "tx");
		let child = params.child();
		assert_eq!(params.next(), 1);
		assert_eq!(child.next(), 2);
		assert_eq!(params.next(), 3);
	}
}
