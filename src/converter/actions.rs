use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use ride_core::{fast_hash, Address, Alias, EvaluationError, H256, Object, Recipient, Value};
use crate::proto::{DataEntry, ScriptAction};
use super::{failure, unexpected};

/// Fields of an `Issue` that determine the id of the new asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IssueFields<'a> {
	pub name: &'a str,
	pub description: &'a str,
	pub decimals: i64,
	pub quantity: i64,
	pub reissuable: bool,
	pub nonce: i64,
}

fn fast_hash_parts(parts: &[&[u8]]) -> H256 {
	let data: Vec<u8> = parts.concat();
	fast_hash(&data)
}

#[allow(clippy::cast_possible_truncation)]
fn short_string(value: &str) -> Vec<u8> {
	let mut out = Vec::with_capacity(2 + value.len());
	out.extend_from_slice(&(value.len() as u16).to_be_bytes());
	out.extend_from_slice(value.as_bytes());
	out
}

/// Id of an asset issued by a dApp.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn generate_issue_id(transaction_id: &H256, issue: &IssueFields<'_>) -> H256 {
	fast_hash_parts(&[
		&short_string(issue.name),
		&short_string(issue.description),
		&(issue.decimals as i32).to_be_bytes(),
		&issue.quantity.to_be_bytes(),
		&i16::from(issue.reissuable).to_be_bytes(),
		&issue.nonce.to_be_bytes(),
		transaction_id.as_bytes(),
	])
}

/// Id of a lease started by a dApp.
#[must_use]
pub fn generate_lease_id(transaction_id: &H256, recipient: &Recipient, amount: i64, nonce: i64) -> H256 {
	fast_hash_parts(&[
		transaction_id.as_bytes(),
		&recipient.to_bytes(),
		&amount.to_be_bytes(),
		&nonce.to_be_bytes(),
	])
}

/// What the conversion of actions needs from the execution environment.
pub trait ActionEnvironment {
	fn scheme(&self) -> u8;
	/// Id of the transaction being executed, `None` when there is none.
	fn transaction_id(&self) -> Option<H256>;
	fn resolve_alias(&self, alias: &Alias) -> Result<Address, EvaluationError>;

	fn issue_id(&self, transaction_id: &H256, issue: &IssueFields<'_>) -> H256 {
		generate_issue_id(transaction_id, issue)
	}

	fn lease_id(&self, transaction_id: &H256, recipient: &Recipient, amount: i64, nonce: i64) -> H256 {
		generate_lease_id(transaction_id, recipient, amount, nonce)
	}
}

fn property<'a>(object: &'a Object, name: &str) -> Result<&'a Value, EvaluationError> {
	object.get(name).ok_or_else(|| failure(format!("property '{}' not found", name)))
}

fn mismatch(name: &str, expected: &str, value: &Value) -> EvaluationError {
	failure(format!("property '{}' is not {}, got {}", name, expected, value.instance_of()))
}

fn int_property(object: &Object, name: &str) -> Result<i64, EvaluationError> {
	let value = property(object, name)?;
	value.as_int().ok_or_else(|| mismatch(name, "Int", value))
}

fn bool_property(object: &Object, name: &str) -> Result<bool, EvaluationError> {
	let value = property(object, name)?;
	value.as_bool().ok_or_else(|| mismatch(name, "Boolean", value))
}

fn string_property<'a>(object: &'a Object, name: &str) -> Result<&'a str, EvaluationError> {
	let value = property(object, name)?;
	value.as_str().ok_or_else(|| mismatch(name, "String", value))
}

fn bytes_property<'a>(object: &'a Object, name: &str) -> Result<&'a [u8], EvaluationError> {
	let value = property(object, name)?;
	value.as_bytes().ok_or_else(|| mismatch(name, "ByteVector", value))
}

fn digest_property(object: &Object, name: &str) -> Result<H256, EvaluationError> {
	let bytes = bytes_property(object, name)?;
	if bytes.len() != H256::len_bytes() {
		return Err(failure(format!("property '{}' has {} bytes instead of 32", name, bytes.len())))
	}
	Ok(H256::from_slice(bytes))
}

fn optional_asset_property(object: &Object, name: &str) -> Result<Option<H256>, EvaluationError> {
	match property(object, name)? {
		Value::Unit => Ok(None),
		_ => digest_property(object, name).map(Some),
	}
}

/// Aliases are resolved so actions always carry addresses.
fn recipient_property<E: ActionEnvironment + ?Sized>(
	env: &E,
	object: &Object,
	name: &str,
) -> Result<Recipient, EvaluationError> {
	match property(object, name)? {
		Value::Address(address) | Value::Recipient(Recipient::Address(address)) => Ok(Recipient::Address(*address)),
		Value::Recipient(Recipient::Alias(alias)) => env.resolve_alias(alias).map(Recipient::Address),
		other => Err(mismatch(name, "Address|Alias", other)),
	}
}

fn data_entry(object: &Object) -> Result<DataEntry, EvaluationError> {
	let key = String::from(string_property(object, "key")?);
	let entry = match object.instance() {
		"IntegerEntry" => DataEntry::Integer { key, value: int_property(object, "value")? },
		"BooleanEntry" => DataEntry::Boolean { key, value: bool_property(object, "value")? },
		"BinaryEntry" => DataEntry::Binary { key, value: bytes_property(object, "value")?.to_vec() },
		"StringEntry" => DataEntry::String { key, value: String::from(string_property(object, "value")?) },
		"DeleteEntry" => DataEntry::Delete { key },
		_ => match property(object, "value")? {
			Value::Int(value) => DataEntry::Integer { key, value: *value },
			Value::Boolean(value) => DataEntry::Boolean { key, value: *value },
			Value::String(value) => DataEntry::String { key, value: value.clone() },
			Value::Bytes(value) => DataEntry::Binary { key, value: value.clone() },
			other => {
				return Err(failure(format!("unexpected type of DataEntry '{}'", other.instance_of())))
			},
		},
	};
	Ok(entry)
}

fn issue<E: ActionEnvironment + ?Sized>(env: &E, object: &Object) -> Result<ScriptAction, EvaluationError> {
	let transaction_id = env.transaction_id().ok_or_else(|| failure("empty parent for IssueExpr"))?;
	let fields = IssueFields {
		name: string_property(object, "name")?,
		description: string_property(object, "description")?,
		decimals: int_property(object, "decimals")?,
		quantity: int_property(object, "quantity")?,
		reissuable: bool_property(object, "isReissuable")?,
		nonce: int_property(object, "nonce")?,
	};
	let script = match object.get("compiledScript") {
		None | Some(Value::Unit) => None,
		Some(_) => Some(bytes_property(object, "compiledScript")?.to_vec()),
	};
	Ok(ScriptAction::Issue {
		id: env.issue_id(&transaction_id, &fields),
		name: String::from(fields.name),
		description: String::from(fields.description),
		quantity: fields.quantity,
		decimals: fields.decimals,
		reissuable: fields.reissuable,
		script,
		nonce: fields.nonce,
	})
}

fn lease<E: ActionEnvironment + ?Sized>(env: &E, object: &Object) -> Result<ScriptAction, EvaluationError> {
	let transaction_id = env.transaction_id().ok_or_else(|| failure("empty parent for LeaseExpr"))?;
	let recipient = recipient_property(env, object, "recipient")?;
	let amount = int_property(object, "amount")?;
	let nonce = int_property(object, "nonce")?;
	Ok(ScriptAction::Lease {
		id: env.lease_id(&transaction_id, &recipient, amount, nonce),
		recipient,
		amount,
		nonce,
	})
}

fn script_transfer<E: ActionEnvironment + ?Sized>(env: &E, object: &Object) -> Result<ScriptAction, EvaluationError> {
	let recipient = recipient_property(env, object, "recipient")?;
	let amount = int_property(object, "amount")?;
	match optional_asset_property(object, "asset") {
		Ok(asset) => Ok(ScriptAction::Transfer { recipient, amount, asset }),
		// Historical mainnet results depend on this: a bad asset id yields an empty Waves transfer.
		Err(error) => {
			log::warn!(target: "ride", "ScriptTransfer to {} replaced by an empty transfer: {}", recipient, error);
			Ok(ScriptAction::Transfer { recipient, amount: 0, asset: None })
		},
	}
}

/// Converts one action object returned by a dApp.
pub fn convert_to_action<E: ActionEnvironment + ?Sized>(env: &E, value: &Value) -> Result<ScriptAction, EvaluationError> {
	let object = value.as_object().ok_or_else(|| unexpected(value))?;
	let action = match object.instance() {
		"Burn" => digest_property(object, "assetId").and_then(|asset| {
			Ok(ScriptAction::Burn { asset, quantity: int_property(object, "quantity")? })
		}),
		"BinaryEntry" | "BooleanEntry" | "DeleteEntry" | "IntegerEntry" | "StringEntry" | "DataEntry" => {
			data_entry(object).map(ScriptAction::Data)
		},
		"Issue" => issue(env, object),
		"Reissue" => digest_property(object, "assetId").and_then(|asset| {
			Ok(ScriptAction::Reissue {
				asset,
				quantity: int_property(object, "quantity")?,
				reissuable: bool_property(object, "isReissuable")?,
			})
		}),
		"ScriptTransfer" => script_transfer(env, object),
		"SponsorFee" => digest_property(object, "assetId").and_then(|asset| {
			Ok(ScriptAction::Sponsorship { asset, min_fee: int_property(object, "minSponsoredAssetFee")? })
		}),
		"Lease" => lease(env, object),
		"LeaseCancel" => digest_property(object, "leaseId").map(|lease_id| ScriptAction::LeaseCancel { lease_id }),
		_ => return Err(unexpected(value)),
	};
	action.map_err(|error| error.wrap(format!("failed to convert {} to ScriptAction", object.instance())))
}

fn list_to_actions<E: ActionEnvironment + ?Sized>(
	env: &E,
	items: &[Value],
	item: &str,
) -> Result<Vec<ScriptAction>, EvaluationError> {
	items.iter()
		.enumerate()
		.map(|(index, value)| {
			convert_to_action(env, value).map_err(|error| {
				error.wrap(format!("failed to convert {} {} of type '{}'", item, index + 1, value.instance_of()))
			})
		})
		.collect()
}

fn list_property<'a>(value: &'a Value, name: &str) -> Result<&'a [Value], EvaluationError> {
	let object = value.as_object().ok_or_else(|| unexpected(value))?;
	let list = property(object, name)
		.map_err(|error| error.wrap(format!("failed to convert {} to actions", object.instance())))?;
	list.as_list().ok_or_else(|| failure(format!("{} is not a list", name)))
}

/// Actions of a callable result: `WriteSet`, `TransferSet` and `ScriptResult`
/// objects of library version 3, lists of actions from version 4.
pub fn object_to_actions<E: ActionEnvironment + ?Sized>(env: &E, value: &Value) -> Result<Vec<ScriptAction>, EvaluationError> {
	match value {
		Value::List(items) => list_to_actions(env, items, "item"),
		_ => match value.instance_of() {
			"WriteSet" => list_to_actions(env, list_property(value, "data")?, "item"),
			"TransferSet" => list_to_actions(env, list_property(value, "transfers")?, "transfer"),
			"ScriptResult" => {
				let object = value.as_object().ok_or_else(|| unexpected(value))?;
				let writes = property(object, "writeSet").map_err(|error| error.wrap("ScriptResult has no writes"))?;
				let transfers = property(object, "transferSet")
					.map_err(|error| error.wrap("ScriptResult has no transfers"))?;
				let mut actions = object_to_actions(env, writes)
					.map_err(|error| error.wrap("failed to convert writes to ScriptActions"))?;
				actions.extend(
					object_to_actions(env, transfers)
						.map_err(|error| error.wrap("failed to convert transfers to ScriptActions"))?,
				);
				Ok(actions)
			},
			_ => Err(unexpected(value)),
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloc::vec;
	use ride_core::{ErrorKind, PublicKey};

	struct Env {
		transaction: Option<H256>,
	}

	fn bob() -> Address {
		Address::from_public_key(b'W', &PublicKey::repeat_byte(0xb0))
	}

	impl ActionEnvironment for Env {
		fn scheme(&self) -> u8 {
			b'W'
		}

		fn transaction_id(&self) -> Option<H256> {
			self.transaction
		}

		fn resolve_alias(&self, alias: &Alias) -> Result<Address, EvaluationError> {
			if alias.alias == "bob1" {
				Ok(bob())
			} else {
				Err(failure(format!("alias '{}' not found", alias)))
			}
		}
	}

	fn env() -> Env {
		Env { transaction: Some(H256::repeat_byte(0x11)) }
	}

	fn transfer(recipient: Value, asset: Value) -> Value {
		Object::new("ScriptTransfer")
			.with("recipient", recipient)
			.with("amount", 100_i64)
			.with("asset", asset)
			.into()
	}

	#[test]
	fn transfers_resolve_aliases() {
		let alias = Value::Recipient(Alias::new(b'W', "bob1").into());
		let action = convert_to_action(&env(), &transfer(alias, Value::Unit)).unwrap();
		assert_eq!(action, ScriptAction::Transfer { recipient: bob().into(), amount: 100, asset: None });

		let unknown = Value::Recipient(Alias::new(b'W', "nobody").into());
		let error = convert_to_action(&env(), &transfer(unknown, Value::Unit)).unwrap_err();
		assert!(error.message().starts_with("failed to convert ScriptTransfer to ScriptAction"));
	}

	#[test]
	fn malformed_transfer_asset_gives_empty_waves_transfer() {
		let action = convert_to_action(&env(), &transfer(Value::Address(bob()), Value::bytes(&[1, 2, 3]))).unwrap();
		assert_eq!(action, ScriptAction::Transfer { recipient: bob().into(), amount: 0, asset: None });
	}

	#[test]
	fn issue_needs_a_transaction() {
		let issue: Value = Object::new("Issue")
			.with("name", Value::string("Token"))
			.with("description", Value::string(""))
			.with("quantity", 1000_i64)
			.with("decimals", 2_i64)
			.with("isReissuable", true)
			.with("compiledScript", Value::Unit)
			.with("nonce", 0_i64)
			.into();
		let action = convert_to_action(&env(), &issue).unwrap();
		let fields = IssueFields {
			name: "Token",
			description: "",
			decimals: 2,
			quantity: 1000,
			reissuable: true,
			nonce: 0,
		};
		match action {
			ScriptAction::Issue { id, .. } => assert_eq!(id, generate_issue_id(&H256::repeat_byte(0x11), &fields)),
			other => panic!("unexpected action {:?}", other),
		}

		let error = convert_to_action(&Env { transaction: None }, &issue).unwrap_err();
		assert_eq!(error.message(), "failed to convert Issue to ScriptAction: empty parent for IssueExpr");
	}

	#[test]
	fn derived_ids_are_stable() {
		let tx = H256::repeat_byte(0x22);
		let fields = IssueFields { name: "A", description: "B", decimals: 8, quantity: 1, reissuable: false, nonce: 1 };
		assert_eq!(generate_issue_id(&tx, &fields), generate_issue_id(&tx, &fields));
		assert_ne!(generate_issue_id(&tx, &fields), generate_issue_id(&tx, &IssueFields { nonce: 2, ..fields }));

		let to = Recipient::from(bob());
		assert_eq!(generate_lease_id(&tx, &to, 5, 0), generate_lease_id(&tx, &to, 5, 0));
		assert_ne!(generate_lease_id(&tx, &to, 5, 0), generate_lease_id(&tx, &to, 6, 0));
	}

	#[test]
	fn derived_ids_match_known_values() {
		let tx = H256::repeat_byte(0x22);
		let fields = IssueFields { name: "A", description: "B", decimals: 8, quantity: 1, reissuable: false, nonce: 1 };
		assert_eq!(
			hex::encode(generate_issue_id(&tx, &fields).as_bytes()),
			"87cb663aab5c7dac167e76cd4d2590cb8b15402ca1c0f612d04305ee57abcfa4"
		);

		let to = Recipient::from(Address::from_ethereum(b'W', &ride_core::H160::repeat_byte(0x11)));
		assert_eq!(
			hex::encode(generate_lease_id(&tx, &to, 5, 0).as_bytes()),
			"054af0480d98d708e97356aaf4cd2750055ab109eb1382ccb9f77e49c4ceb0bd"
		);
	}

	#[test]
	fn script_result_keeps_writes_before_transfers() {
		let write: Value = Object::new("DataEntry")
			.with("key", Value::string("k"))
			.with("value", Value::bytes(&[1]))
			.into();
		let result: Value = Object::new("ScriptResult")
			.with("writeSet", Object::new("WriteSet").with("data", Value::List(vec![write])))
			.with(
				"transferSet",
				Object::new("TransferSet").with("transfers", Value::List(vec![transfer(Value::Address(bob()), Value::Unit)])),
			)
			.into();
		let actions = object_to_actions(&env(), &result).unwrap();
		assert_eq!(actions, vec![
			ScriptAction::Data(DataEntry::Binary { key: String::from("k"), value: vec![1] }),
			ScriptAction::Transfer { recipient: bob().into(), amount: 100, asset: None },
		]);
	}

	#[test]
	fn unknown_results_are_rejected() {
		let error = object_to_actions(&env(), &Object::new("Mystery").into()).unwrap_err();
		assert_eq!(error.kind(), ErrorKind::EvaluationFailure);
		assert_eq!(error.message(), "unexpected type 'Mystery'");

		let list = Value::List(vec![Object::new("LeaseCancel").with("leaseId", Value::bytes(&[0; 32])).into(), Value::Int(1)]);
		let error = object_to_actions(&env(), &list).unwrap_err();
		assert_eq!(error.message(), "failed to convert item 2 of type 'Int': unexpected type 'Int'");
	}
}
