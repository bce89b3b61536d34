use std::collections::BTreeMap;

use ride::backend::{ApplyBackend, Backend, MemoryAccount, MemoryBackend, MemoryVicinity};
use ride::executor::{call_function, call_verifier, callable_of, Environment};
use ride::proto::{
	Argument, DataEntry, Header, InvokeAction, InvokeScript, ScriptAction, Signed, Transaction,
};
use ride::serialization::{deserialize, serialize, Format};
use ride::{Address, ErrorKind, FunctionDeclaration, Node, PublicKey, Tree, H256};

const SCHEME: u8 = b'T';

fn account(byte: u8) -> (Address, PublicKey) {
	let public_key = PublicKey::repeat_byte(byte);
	(Address::from_public_key(SCHEME, &public_key), public_key)
}

fn list(items: Vec<Node>) -> Node {
	items.into_iter().rev().fold(Node::reference("nil"), |tail, head| Node::native(1100, vec![head, tail]))
}

fn integer_entry(key: &str, value: Node) -> Node {
	Node::user("IntegerEntry", vec![Node::string(key), value])
}

/// `func callee(n) = [IntegerEntry("b", n), IntegerEntry("paid", size(i.payments))]`
/// `func boom(n) = throw("boom")` and `func bad(n) = n + "x"`.
fn callee_dapp() -> Tree {
	let mut tree = Tree::dapp(5);
	tree.functions.push(FunctionDeclaration::new(
		"callee",
		&["n"],
		list(vec![
			integer_entry("b", Node::reference("n")),
			integer_entry("paid", Node::native(400, vec![Node::property(Node::reference("i"), "payments")])),
		]),
	).callable("i"));
	tree.functions.push(FunctionDeclaration::new(
		"boom",
		&["n"],
		Node::native(2, vec![Node::string("boom")]),
	).callable("i"));
	tree.functions.push(FunctionDeclaration::new(
		"bad",
		&["n"],
		Node::native(100, vec![Node::reference("n"), Node::string("x")]),
	).callable("i"));
	tree
}

/// `func call() = if (invoke(callee, function, [7], [AttachedPayment(unit, 10)]) == unit)
/// then [IntegerEntry("a", 1)] else throw()`
fn caller_dapp(callee: &Address, function: &str) -> Tree {
	let invoke = Node::native(1020, vec![
		Node::user("Address", vec![Node::Bytes(callee.as_bytes().to_vec())]),
		Node::string(function),
		list(vec![Node::Long(7)]),
		list(vec![Node::user("AttachedPayment", vec![Node::reference("unit"), Node::Long(10)])]),
	]);
	let mut tree = Tree::dapp(5);
	tree.functions.push(FunctionDeclaration::new(
		"call",
		&[],
		Node::conditional(
			Node::native(0, vec![invoke, Node::reference("unit")]),
			list(vec![integer_entry("a", Node::Long(1))]),
			Node::native(2, vec![Node::string("unreachable")]),
		),
	).callable("i"));
	tree
}

/// `getInteger(this, "k") == getInteger(this, "k") == ...` over `leaves` reads,
/// costing `103 * leaves - 1`.
fn heavy(leaves: usize) -> Node {
	if leaves == 1 {
		return Node::native(1050, vec![Node::reference("this"), Node::string("k")])
	}
	let half = leaves / 2;
	Node::native(0, vec![heavy(half), heavy(leaves - half)])
}

/// Evaluates `heavy(leaves)`, then `rest`.
fn spend(leaves: usize, rest: Node) -> Node {
	Node::conditional(heavy(leaves), rest.clone(), rest)
}

/// `invoke(dapp, function, [7], [])`, then `rest`.
fn call_then(dapp: &Address, function: &str, rest: Node) -> Node {
	let invoke = Node::native(1020, vec![
		Node::user("Address", vec![Node::Bytes(dapp.as_bytes().to_vec())]),
		Node::string(function),
		list(vec![Node::Long(7)]),
		Node::reference("nil"),
	]);
	Node::conditional(
		Node::native(0, vec![invoke, Node::reference("unit")]),
		rest,
		Node::native(2, vec![Node::string("unreachable")]),
	)
}

/// dApp with the single callable `func <name>(n) = <body>`.
fn dapp_with(name: &str, body: Node) -> Tree {
	let mut tree = Tree::dapp(5);
	tree.functions.push(FunctionDeclaration::new(name, &["n"], body).callable("i"));
	tree
}

fn deploy(accounts: &[(Address, Tree)]) -> BTreeMap<Address, MemoryAccount> {
	accounts.iter()
		.map(|(address, tree)| {
			let script = serialize(tree, Format::V2).unwrap();
			(*address, MemoryAccount { script, ..MemoryAccount::default() })
		})
		.collect()
}

fn invoke_tx(sender: &PublicKey, dapp: &Address, function: &str) -> Transaction {
	Transaction::InvokeScript(Signed::new(
		Header {
			version: 2,
			id: H256::repeat_byte(0x77),
			sender_public_key: *sender,
			fee: 500_000,
			timestamp: 1_650_000_000_000,
			body_bytes: Vec::new(),
			proofs: Vec::new(),
		},
		InvokeScript {
			dapp: (*dapp).into(),
			function: function.into(),
			arguments: Vec::new(),
			payments: Vec::new(),
			fee_asset: None,
		},
	))
}

fn state(caller: (Address, PublicKey), callee: (Address, PublicKey)) -> BTreeMap<Address, MemoryAccount> {
	let script = serialize(&callee_dapp(), Format::V2).unwrap();
	let mut caller_account = MemoryAccount { public_key: Some(caller.1), ..MemoryAccount::default() };
	caller_account.balances.insert(None, 1_000);
	let callee_account = MemoryAccount { public_key: Some(callee.1), script, ..MemoryAccount::default() };
	vec![(caller.0, caller_account), (callee.0, callee_account)].into_iter().collect()
}

fn vicinity() -> MemoryVicinity {
	MemoryVicinity { scheme: SCHEME, height: 100, blocks: Vec::new() }
}

fn integer(key: &str, value: i64) -> ScriptAction {
	ScriptAction::Data(DataEntry::Integer { key: key.into(), value })
}

#[test]
fn nested_actions_come_before_the_callers() {
	let (a, a_key) = account(1);
	let (b, b_key) = account(2);
	let (_, user_key) = account(3);
	let vicinity = vicinity();
	let mut backend = MemoryBackend::new(&vicinity, state((a, a_key), (b, b_key)));

	let tree = caller_dapp(&b, "callee");
	let tx = invoke_tx(&user_key, &a, "call");
	let (function, arguments) = callable_of(&tx).unwrap();
	let mut env = Environment::for_invocation(&backend, 5, a, &tx).unwrap();
	let result = call_function(&mut env, &tree, &function, &arguments).unwrap();

	assert_eq!(result.actions, vec![
		InvokeAction { dapp: a, action: ScriptAction::Transfer { recipient: b.into(), amount: 10, asset: None } },
		InvokeAction { dapp: b, action: integer("b", 7) },
		InvokeAction { dapp: b, action: integer("paid", 1) },
		InvokeAction { dapp: a, action: integer("a", 1) },
	]);
	assert!(result.complexity > env.complexity());
	assert_eq!(result.complexity, env.total_complexity());
	drop(env);

	backend.apply(result.actions);
	assert_eq!(backend.balance(&a, None), 990);
	assert_eq!(backend.balance(&b, None), 10);
	assert_eq!(backend.data_entry(&b, "b"), Some(DataEntry::Integer { key: "b".into(), value: 7 }));
}

#[test]
fn failed_nested_invocation_reports_its_complexity() {
	let (a, a_key) = account(1);
	let (b, b_key) = account(2);
	let (_, user_key) = account(3);
	let vicinity = vicinity();
	let backend = MemoryBackend::new(&vicinity, state((a, a_key), (b, b_key)));

	let tree = caller_dapp(&b, "boom");
	let tx = invoke_tx(&user_key, &a, "call");
	let mut env = Environment::for_invocation(&backend, 5, a, &tx).unwrap();
	let err = call_function(&mut env, &tree, "call", &[]).unwrap_err();

	assert_eq!(err.kind(), ErrorKind::UserError);
	assert_eq!(err.message(), "boom");
	assert!(err.complexity() > env.complexity());
	assert!(env.state().actions().is_empty());
}

#[test]
fn payments_need_a_balance() {
	let (a, a_key) = account(1);
	let (b, b_key) = account(2);
	let vicinity = vicinity();
	let mut state = state((a, a_key), (b, b_key));
	state.get_mut(&a).unwrap().balances.insert(None, 5);
	let backend = MemoryBackend::new(&vicinity, state);

	let tree = caller_dapp(&b, "callee");
	let tx = invoke_tx(&account(3).1, &a, "call");
	let mut env = Environment::for_invocation(&backend, 5, a, &tx).unwrap();
	let err = call_function(&mut env, &tree, "call", &[]).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::RuntimeError);
	assert!(err.message().starts_with("not enough balance"));
}

#[test]
fn callables_of_old_versions_return_their_own_actions() {
	let (a, _) = account(1);
	let vicinity = vicinity();
	let backend = MemoryBackend::new(&vicinity, BTreeMap::new());

	let mut tree = Tree::dapp(4);
	tree.functions.push(FunctionDeclaration::new(
		"default",
		&["x"],
		list(vec![integer_entry("x", Node::reference("x"))]),
	).callable("i"));
	let tx = invoke_tx(&account(3).1, &a, "");
	let mut env = Environment::for_invocation(&backend, 4, a, &tx).unwrap();
	let result = call_function(&mut env, &tree, "", &[Argument::Integer(3)]).unwrap();
	assert_eq!(result.actions, vec![InvokeAction { dapp: a, action: integer("x", 3) }]);
	assert_eq!(result.complexity, env.complexity());

	let err = call_function(&mut env, &tree, "default", &[]).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::EvaluationFailure);
}

#[test]
fn stored_verifier_runs_after_a_round_trip() {
	let (a, _) = account(1);
	let vicinity = vicinity();
	let backend = MemoryBackend::new(&vicinity, BTreeMap::new());

	// height > 50
	let tree = Tree::expression(3, Node::native(102, vec![Node::reference("height"), Node::Long(50)]));
	for format in &[Format::V1, Format::V2] {
		let stored = deserialize(&serialize(&tree, *format).unwrap()).unwrap();
		let mut env = Environment::new(&backend, 3, a).unwrap();
		let result = call_verifier(&mut env, &stored).unwrap();
		assert!(result.approved);
		assert!(result.complexity > 0);
	}

	let mut env = Environment::new(&backend, 4, a).unwrap();
	assert_eq!(call_verifier(&mut env, &tree).unwrap_err().kind(), ErrorKind::RuntimeError);
}

#[test]
fn unclassified_nested_failures_are_internal_invocation_errors() {
	let (a, a_key) = account(1);
	let (b, b_key) = account(2);
	let vicinity = vicinity();
	let backend = MemoryBackend::new(&vicinity, state((a, a_key), (b, b_key)));

	let tree = caller_dapp(&b, "bad");
	let tx = invoke_tx(&account(3).1, &a, "call");
	let mut env = Environment::for_invocation(&backend, 5, a, &tx).unwrap();
	let err = call_function(&mut env, &tree, "call", &[]).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::InternalInvocationError);
	assert!(err.message().starts_with("unhandled error"));
	assert!(err.complexity() > env.complexity());
}

#[test]
fn nested_budgets_stop_at_the_chain_limit() {
	let (a, _) = account(1);
	let (b, _) = account(2);
	let vicinity = vicinity();
	// 9271 per call, the third one runs out of the 26000 chain budget
	let burner = dapp_with("burn", spend(90, Node::reference("nil")));
	let backend = MemoryBackend::new(&vicinity, deploy(&[(b, burner)]));

	let tree = dapp_with("call", call_then(&b, "burn", call_then(&b, "burn", call_then(
		&b,
		"burn",
		list(vec![integer_entry("a", Node::Long(1))]),
	))));
	let tx = invoke_tx(&account(3).1, &a, "call");
	let mut env = Environment::for_invocation(&backend, 5, a, &tx).unwrap();
	let err = call_function(&mut env, &tree, "call", &[Argument::Integer(0)]).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::RuntimeError);
	assert!(err.complexity() > 26_000);
	assert!(err.complexity() <= 26_100);
	assert_eq!(env.state().complexity(), 2 * 9_271);
}

#[test]
fn callers_own_work_counts_toward_the_chain_limit() {
	let (a, _) = account(1);
	let (b, _) = account(2);
	let vicinity = vicinity();
	let burner = dapp_with("burn", spend(90, Node::reference("nil")));
	let backend = MemoryBackend::new(&vicinity, deploy(&[(b, burner)]));

	// two nested calls, then 8239 of its own
	let tree = dapp_with("call", call_then(&b, "burn", call_then(&b, "burn", spend(
		80,
		list(vec![integer_entry("a", Node::Long(1))]),
	))));
	let tx = invoke_tx(&account(3).1, &a, "call");
	let mut env = Environment::for_invocation(&backend, 5, a, &tx).unwrap();
	let err = call_function(&mut env, &tree, "call", &[Argument::Integer(0)]).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::RuntimeError);
	assert!(err.message().contains("26000"));
	assert!(env.complexity() <= 10_000);
	assert_eq!(err.complexity(), env.total_complexity());
	assert!(err.complexity() > 26_000);
}

#[test]
fn nested_calls_share_the_budget_of_all_callers() {
	let (a, _) = account(1);
	let (b, _) = account(2);
	let (c, _) = account(4);
	let vicinity = vicinity();
	let relay = dapp_with("relay", spend(95, call_then(&c, "burn", Node::reference("nil"))));
	let burner = dapp_with("burn", spend(90, Node::reference("nil")));
	let backend = MemoryBackend::new(&vicinity, deploy(&[(b, relay), (c, burner)]));

	let tree = dapp_with("call", spend(95, call_then(&b, "relay", Node::reference("nil"))));
	let tx = invoke_tx(&account(3).1, &a, "call");
	let mut env = Environment::for_invocation(&backend, 5, a, &tx).unwrap();
	let err = call_function(&mut env, &tree, "call", &[Argument::Integer(0)]).unwrap_err();
	// the innermost call gets what the two callers left of the chain budget
	assert_eq!(err.kind(), ErrorKind::RuntimeError);
	assert!(err.complexity() > 26_000);
	assert!(err.complexity() <= 26_100);
}
