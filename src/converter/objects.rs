use alloc::format;
use alloc::vec::Vec;
use core::convert::TryFrom;
use ride_core::{Address, EvaluationError, H256, Object, PublicKey, Recipient, Value};
use crate::proto::{
	AssetInfo, BalanceDetails, BlockHeader, DataEntry, EthereumTransaction,
	EthereumTransactionKind, EthereumTxError, FullAssetInfo, FullScriptTransfer, Header, Order,
	ScriptPayment, Signed, Transaction, PROOFS_COUNT,
};
use super::arguments::{argument_to_value, decoded_arguments};
use super::failure;

fn int(field: &str, value: u64) -> Result<Value, EvaluationError> {
	i64::try_from(value)
		.map(Value::Int)
		.map_err(|_| failure(format!("{} {} does not fit Int", field, value)))
}

fn optional_asset(asset: Option<&H256>) -> Value {
	Value::optional(asset, |id| Value::bytes(id.as_bytes()))
}

fn digest(id: &H256) -> Value {
	Value::bytes(id.as_bytes())
}

fn recipient(recipient: &Recipient) -> Value {
	Value::Recipient(recipient.clone())
}

/// Always eight slots, missing proofs are empty byte vectors.
fn proofs(proofs: &[Vec<u8>]) -> Value {
	Value::List(
		(0..PROOFS_COUNT)
			.map(|index| Value::Bytes(proofs.get(index).cloned().unwrap_or_default()))
			.collect(),
	)
}

fn script(script: Option<&Vec<u8>>) -> Value {
	Value::optional(script.filter(|script| !script.is_empty()), |script| Value::Bytes(script.clone()))
}

fn ethereum(error: EthereumTxError) -> EvaluationError {
	failure(format!("{}", error))
}

/// Fields shared by every signed transaction object.
fn signed(instance: &str, scheme: u8, header: &Header) -> Result<Object, EvaluationError> {
	Ok(Object::new(instance)
		.with("version", i64::from(header.version))
		.with("id", digest(&header.id))
		.with("sender", Address::from_public_key(scheme, &header.sender_public_key))
		.with("senderPublicKey", Value::bytes(header.sender_public_key.as_bytes()))
		.with("fee", int("fee", header.fee)?)
		.with("timestamp", int("timestamp", header.timestamp)?)
		.with("bodyBytes", header.body_bytes.clone())
		.with("proofs", proofs(&header.proofs)))
}

/// Single `payment` up to one payment, `payments` always.
fn with_payments(object: Object, payments: &[ScriptPayment]) -> Object {
	let list: Vec<Value> = payments.iter().map(|p| Value::from(attached_payment_to_object(p))).collect();
	let object = match list.as_slice() {
		[] => object.with("payment", Value::Unit),
		[single] => object.with("payment", single.clone()),
		_ => object,
	};
	object.with("payments", Value::List(list))
}

/// RIDE object of a transaction, as bound to `tx`.
pub fn transaction_to_object(scheme: u8, tx: &Transaction) -> Result<Object, EvaluationError> {
	let object = match tx {
		Transaction::Genesis(Signed { header, body }) => Object::new("GenesisTransaction")
			.with("version", i64::from(header.version))
			.with("id", digest(&header.id))
			.with("recipient", Value::Recipient(body.recipient.into()))
			.with("amount", int("amount", body.amount)?)
			.with("fee", 0_i64)
			.with("timestamp", int("timestamp", header.timestamp)?)
			.with("bodyBytes", header.body_bytes.clone()),
		Transaction::Payment(Signed { header, body }) => signed("PaymentTransaction", scheme, header)?
			.with("recipient", Value::Recipient(body.recipient.into()))
			.with("amount", int("amount", body.amount)?),
		Transaction::Issue(Signed { header, body }) => signed("IssueTransaction", scheme, header)?
			.with("name", body.name.clone())
			.with("description", body.description.clone())
			.with("quantity", int("quantity", body.quantity)?)
			.with("decimals", i64::from(body.decimals))
			.with("reissuable", body.reissuable)
			.with("script", script(body.script.as_ref())),
		Transaction::Transfer(Signed { header, body }) => signed("TransferTransaction", scheme, header)?
			.with("recipient", recipient(&body.recipient))
			.with("assetId", optional_asset(body.asset.as_ref()))
			.with("amount", int("amount", body.amount)?)
			.with("feeAssetId", optional_asset(body.fee_asset.as_ref()))
			.with("attachment", body.attachment.clone()),
		Transaction::Reissue(Signed { header, body }) => signed("ReissueTransaction", scheme, header)?
			.with("assetId", digest(&body.asset))
			.with("quantity", int("quantity", body.quantity)?)
			.with("reissuable", body.reissuable),
		Transaction::Burn(Signed { header, body }) => signed("BurnTransaction", scheme, header)?
			.with("assetId", digest(&body.asset))
			.with("quantity", int("quantity", body.quantity)?),
		Transaction::Exchange(Signed { header, body }) => signed("ExchangeTransaction", scheme, header)?
			.with("buyOrder", order_to_object(scheme, &body.buy_order)?)
			.with("sellOrder", order_to_object(scheme, &body.sell_order)?)
			.with("price", int("price", body.price)?)
			.with("amount", int("amount", body.amount)?)
			.with("buyMatcherFee", int("buyMatcherFee", body.buy_matcher_fee)?)
			.with("sellMatcherFee", int("sellMatcherFee", body.sell_matcher_fee)?),
		Transaction::Lease(Signed { header, body }) => signed("LeaseTransaction", scheme, header)?
			.with("recipient", recipient(&body.recipient))
			.with("amount", int("amount", body.amount)?),
		Transaction::LeaseCancel(Signed { header, body }) => signed("LeaseCancelTransaction", scheme, header)?
			.with("leaseId", digest(&body.lease_id)),
		Transaction::CreateAlias(Signed { header, body }) => signed("CreateAliasTransaction", scheme, header)?
			.with("alias", format!("{}", body.alias)),
		Transaction::MassTransfer(Signed { header, body }) => {
			let mut total = 0_i64;
			let mut transfers = Vec::with_capacity(body.transfers.len());
			for transfer in &body.transfers {
				let amount = i64::try_from(transfer.amount)
					.map_err(|_| failure(format!("transfer amount {} does not fit Int", transfer.amount)))?;
				total = total.checked_add(amount)
					.ok_or_else(|| failure("total amount of mass transfer overflows Int"))?;
				transfers.push(Value::from(
					Object::new("Transfer")
						.with("recipient", recipient(&transfer.recipient))
						.with("amount", amount),
				));
			}
			let count = i64::try_from(transfers.len()).map_err(|_| failure("too many transfers"))?;
			signed("MassTransferTransaction", scheme, header)?
				.with("assetId", optional_asset(body.asset.as_ref()))
				.with("transfers", Value::List(transfers))
				.with("transferCount", count)
				.with("totalAmount", total)
				.with("attachment", body.attachment.clone())
		},
		Transaction::Data(Signed { header, body }) => signed("DataTransaction", scheme, header)?
			.with("data", Value::List(body.entries.iter().map(data_entry_to_object).collect())),
		Transaction::SetScript(Signed { header, body }) => signed("SetScriptTransaction", scheme, header)?
			.with("script", script(body.script.as_ref())),
		Transaction::Sponsorship(Signed { header, body }) => signed("SponsorFeeTransaction", scheme, header)?
			.with("assetId", digest(&body.asset))
			.with("minSponsoredAssetFee", match body.min_asset_fee {
				0 => Value::Unit,
				fee => int("minSponsoredAssetFee", fee)?,
			}),
		Transaction::SetAssetScript(Signed { header, body }) => signed("SetAssetScriptTransaction", scheme, header)?
			.with("assetId", digest(&body.asset))
			.with("script", script(body.script.as_ref())),
		Transaction::InvokeScript(Signed { header, body }) => {
			let object = signed("InvokeScriptTransaction", scheme, header)?
				.with("dApp", recipient(&body.dapp))
				.with("feeAssetId", optional_asset(body.fee_asset.as_ref()))
				.with("function", body.function.clone())
				.with("args", Value::List(body.arguments.iter().map(argument_to_value).collect()));
			with_payments(object, &body.payments)
		},
		Transaction::UpdateAssetInfo(Signed { header, body }) => signed("UpdateAssetInfoTransaction", scheme, header)?
			.with("assetId", digest(&body.asset))
			.with("name", body.name.clone())
			.with("description", body.description.clone())
			.with("feeAssetId", optional_asset(body.fee_asset.as_ref())),
		Transaction::Ethereum(tx) => ethereum_to_object(scheme, tx)?,
		Transaction::InvokeExpression(_) => {
			return Err(failure(format!(
				"conversion to RIDE object is not implemented for {} transaction",
				tx.type_name()
			)))
		},
	};
	Ok(object)
}

/// Ethereum transactions look like native transfers or invocations; the kind must be resolved.
fn ethereum_to_object(scheme: u8, tx: &EthereumTransaction) -> Result<Object, EvaluationError> {
	let kind = tx.kind().ok_or_else(|| failure("kind of ethereum transaction is not resolved"))?;
	let sender = tx.sender(scheme).map_err(ethereum)?;
	let public_key = tx.sender_public_key().map_err(ethereum)?;
	let to = tx.recipient(scheme).map_err(ethereum)?;

	let object = match kind {
		EthereumTransactionKind::TransferWaves => Object::new("TransferTransaction")
			.with("recipient", Value::Recipient(to.into()))
			.with("assetId", Value::Unit)
			.with("amount", tx.amount().map_err(ethereum)?)
			.with("feeAssetId", Value::Unit)
			.with("attachment", Vec::new()),
		EthereumTransactionKind::TransferAssets { asset, recipient: holder, amount, .. } => Object::new("TransferTransaction")
			.with("recipient", Value::Recipient(Address::from_ethereum(scheme, holder).into()))
			.with("assetId", digest(asset))
			.with("amount", *amount)
			.with("feeAssetId", Value::Unit)
			.with("attachment", Vec::new()),
		EthereumTransactionKind::InvokeScript(data) => {
			let arguments = decoded_arguments(data)?;
			let object = Object::new("InvokeScriptTransaction")
				.with("dApp", Value::Recipient(to.into()))
				.with("feeAssetId", Value::Unit)
				.with("function", data.name.clone())
				.with("args", Value::List(arguments.iter().map(argument_to_value).collect()));
			with_payments(object, &data.payments)
		},
	};
	Ok(object
		.with("version", i64::from(tx.inner().tx_type() as u8))
		.with("id", digest(&tx.id()))
		.with("sender", sender)
		.with("senderPublicKey", Value::bytes(public_key.as_bytes()))
		.with("fee", int("fee", tx.fee())?)
		.with("timestamp", int("timestamp", tx.timestamp())?)
		.with("bodyBytes", Vec::new())
		.with("proofs", proofs(&[])))
}

pub fn order_to_object(scheme: u8, order: &Order) -> Result<Object, EvaluationError> {
	let pair = Object::new("AssetPair")
		.with("amountAsset", optional_asset(order.amount_asset.as_ref()))
		.with("priceAsset", optional_asset(order.price_asset.as_ref()));
	Ok(Object::new("Order")
		.with("id", digest(&order.id))
		.with("sender", order.sender(scheme))
		.with("senderPublicKey", Value::bytes(order.sender_public_key.as_bytes()))
		.with("matcherPublicKey", Value::bytes(order.matcher_public_key.as_bytes()))
		.with("assetPair", pair)
		.with("orderType", Object::new(order.order_type.instance()))
		.with("price", int("price", order.price)?)
		.with("amount", int("amount", order.amount)?)
		.with("timestamp", int("timestamp", order.timestamp)?)
		.with("expiration", int("expiration", order.expiration)?)
		.with("matcherFee", int("matcherFee", order.matcher_fee)?)
		.with("matcherFeeAssetId", optional_asset(order.matcher_fee_asset.as_ref()))
		.with("bodyBytes", order.body_bytes.clone())
		.with("proofs", proofs(&order.proofs)))
}

#[must_use]
pub fn asset_info_to_object(info: &AssetInfo) -> Object {
	Object::new("Asset")
		.with("id", digest(&info.id))
		.with("quantity", info.quantity)
		.with("decimals", i64::from(info.decimals))
		.with("issuer", info.issuer)
		.with("issuerPublicKey", Value::bytes(info.issuer_public_key.as_bytes()))
		.with("reissuable", info.reissuable)
		.with("scripted", info.scripted)
		.with("sponsored", info.sponsored)
}

/// `Asset` object of library version 4 and later.
pub fn full_asset_info_to_object(info: &FullAssetInfo) -> Result<Object, EvaluationError> {
	Ok(asset_info_to_object(&info.info)
		.with("name", info.name.clone())
		.with("description", info.description.clone())
		.with("minSponsoredFee", int("minSponsoredFee", info.sponsorship_cost)?))
}

/// `BlockInfo` object; the generator address is derived from its public key.
pub fn block_info_to_object(scheme: u8, header: &BlockHeader) -> Result<Object, EvaluationError> {
	let vrf = header.vrf.as_ref().filter(|vrf| !vrf.is_empty());
	Ok(Object::new("BlockInfo")
		.with("timestamp", int("timestamp", header.timestamp)?)
		.with("height", int("height", header.height)?)
		.with("baseTarget", int("baseTarget", header.base_target)?)
		.with("generationSignature", header.generation_signature.clone())
		.with("generator", Address::from_public_key(scheme, &header.generator_public_key))
		.with("generatorPublicKey", Value::bytes(header.generator_public_key.as_bytes()))
		.with("vrf", Value::optional(vrf, |vrf| Value::Bytes(vrf.clone()))))
}

#[must_use]
pub fn balance_details_to_object(details: &BalanceDetails) -> Object {
	Object::new("BalanceDetails")
		.with("available", details.available)
		.with("regular", details.regular)
		.with("generating", details.generating)
		.with("effective", details.effective)
}

#[must_use]
pub fn attached_payment_to_object(payment: &ScriptPayment) -> Object {
	Object::new("AttachedPayment")
		.with("assetId", optional_asset(payment.asset.as_ref()))
		.with("amount", payment.amount)
}

/// Typed entry object; deletions have no value representation and give `Unit`.
#[must_use]
pub fn data_entry_to_object(entry: &DataEntry) -> Value {
	let (instance, value) = match entry {
		DataEntry::Integer { value, .. } => ("IntegerEntry", Value::Int(*value)),
		DataEntry::Boolean { value, .. } => ("BooleanEntry", Value::Boolean(*value)),
		DataEntry::Binary { value, .. } => ("BinaryEntry", Value::Bytes(value.clone())),
		DataEntry::String { value, .. } => ("StringEntry", Value::String(value.clone())),
		DataEntry::Delete { .. } => return Value::Unit,
	};
	Object::new(instance).with("key", Value::string(entry.key())).with("value", value).into()
}

/// Transfer of a dApp presented to the script of the transferred asset.
pub fn script_transfer_to_object(transfer: &FullScriptTransfer) -> Result<Object, EvaluationError> {
	Ok(Object::new("TransferTransaction")
		.with("version", Value::Unit)
		.with("id", digest(&transfer.id))
		.with("sender", transfer.sender)
		.with("senderPublicKey", Value::bytes(transfer.sender_public_key.as_bytes()))
		.with("recipient", recipient(&transfer.recipient))
		.with("assetId", optional_asset(transfer.asset.as_ref()))
		.with("amount", transfer.amount)
		.with("feeAssetId", Value::Unit)
		.with("fee", Value::Unit)
		.with("timestamp", int("timestamp", transfer.timestamp)?)
		.with("attachment", Value::Unit)
		.with("bodyBytes", Value::Unit)
		.with("proofs", Value::Unit))
}

fn invocation(
	version: u8,
	id: H256,
	caller: Address,
	caller_public_key: &[u8],
	fee: u64,
	fee_asset: Option<&H256>,
) -> Result<Object, EvaluationError> {
	let object = Object::new("Invocation")
		.with("transactionId", digest(&id))
		.with("caller", caller)
		.with("callerPublicKey", Value::bytes(caller_public_key))
		.with("feeAssetId", optional_asset(fee_asset))
		.with("fee", int("fee", fee)?);
	Ok(if version >= 5 {
		object
			.with("originCaller", caller)
			.with("originCallerPublicKey", Value::bytes(caller_public_key))
	} else {
		object
	})
}

fn invocation_payments(version: u8, object: Object, payments: &[ScriptPayment]) -> Object {
	if version >= 4 {
		let list = payments.iter().map(|p| Value::from(attached_payment_to_object(p))).collect();
		object.with("payments", Value::List(list))
	} else {
		let first = payments.first().map(attached_payment_to_object);
		object.with("payment", Value::optional(first, Value::from))
	}
}

/// Implicit invocation context of a callable called by a transaction.
pub fn invocation_to_object(version: u8, scheme: u8, tx: &Transaction) -> Result<Object, EvaluationError> {
	match tx {
		Transaction::InvokeScript(Signed { header, body }) => {
			let caller = Address::from_public_key(scheme, &header.sender_public_key);
			let object = invocation(
				version,
				header.id,
				caller,
				header.sender_public_key.as_bytes(),
				header.fee,
				body.fee_asset.as_ref(),
			)?;
			Ok(invocation_payments(version, object, &body.payments))
		},
		Transaction::InvokeExpression(Signed { header, body }) => {
			let caller = Address::from_public_key(scheme, &header.sender_public_key);
			let object = invocation(
				version,
				header.id,
				caller,
				header.sender_public_key.as_bytes(),
				header.fee,
				body.fee_asset.as_ref(),
			)?;
			Ok(object.with("payments", Value::List(Vec::new())))
		},
		Transaction::Ethereum(tx) => {
			let payments = match tx.kind() {
				Some(EthereumTransactionKind::InvokeScript(data)) => &data.payments,
				_ => return Err(failure("ethereum transaction is not an invocation")),
			};
			let caller = tx.sender(scheme).map_err(ethereum)?;
			// 64-byte uncompressed key, unlike the 32-byte keys of native accounts.
			let public_key = tx.sender_public_key().map_err(ethereum)?;
			let object = invocation(version, tx.id(), caller, public_key.as_bytes(), tx.fee(), None)?;
			Ok(invocation_payments(version, object, payments))
		},
		other => Err(failure(format!(
			"{} transaction does not invoke a callable",
			other.type_name()
		))),
	}
}

/// Invocation context of a callable called from another dApp.
pub(crate) fn nested_invocation(
	parent: &Object,
	caller: Address,
	caller_public_key: &PublicKey,
	payments: &[ScriptPayment],
) -> Object {
	let mut object = Object::new("Invocation");
	for name in ["transactionId", "feeAssetId", "fee", "originCaller", "originCallerPublicKey"].iter() {
		if let Some(value) = parent.get(name) {
			object.insert(name, value.clone());
		}
	}
	let object = object
		.with("caller", caller)
		.with("callerPublicKey", Value::bytes(caller_public_key.as_bytes()));
	invocation_payments(5, object, payments)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloc::string::String;
	use alloc::vec;
	use ride_core::{Alias, ErrorKind};
	use crate::proto::{
		Data, Genesis, InvokeExpression, InvokeScript, MassTransfer, MassTransferEntry, OrderType,
		Transfer, Argument,
	};

	fn header() -> Header {
		Header {
			version: 2,
			id: H256::repeat_byte(1),
			sender_public_key: PublicKey::repeat_byte(2),
			fee: 100_000,
			timestamp: 1_600_000_000_000,
			body_bytes: vec![9, 9],
			proofs: vec![vec![3; 64]],
		}
	}

	fn invoke(payments: Vec<ScriptPayment>) -> Transaction {
		Transaction::InvokeScript(Signed::new(header(), InvokeScript {
			dapp: Alias::new(b'W', "market").into(),
			function: String::from("buy"),
			arguments: vec![Argument::Integer(5), Argument::String(String::from("x"))],
			payments,
			fee_asset: None,
		}))
	}

	#[test]
	fn transfer_object_has_script_field_names() {
		let tx = Transaction::Transfer(Signed::new(header(), Transfer {
			recipient: Alias::new(b'W', "bob1").into(),
			asset: Some(H256::repeat_byte(4)),
			amount: 500,
			fee_asset: None,
			attachment: vec![1, 2, 3],
		}));
		let object = transaction_to_object(b'W', &tx).unwrap();
		assert_eq!(object.instance(), "TransferTransaction");
		assert_eq!(object.get("amount"), Some(&Value::Int(500)));
		assert_eq!(object.get("feeAssetId"), Some(&Value::Unit));
		assert_eq!(object.get("assetId"), Some(&Value::bytes(&[4; 32])));
		assert_eq!(
			object.get("sender"),
			Some(&Value::Address(Address::from_public_key(b'W', &PublicKey::repeat_byte(2))))
		);
		match object.get("proofs") {
			Some(Value::List(proofs)) => {
				assert_eq!(proofs.len(), PROOFS_COUNT);
				assert_eq!(proofs[0], Value::Bytes(vec![3; 64]));
				assert_eq!(proofs[7], Value::Bytes(vec![]));
			},
			other => panic!("unexpected proofs {:?}", other),
		}
	}

	#[test]
	fn unsigned_amounts_must_fit_int() {
		let tx = Transaction::Genesis(Signed::new(header(), Genesis {
			recipient: Address::from_public_key(b'W', &PublicKey::zero()),
			amount: u64::MAX,
		}));
		let error = transaction_to_object(b'W', &tx).unwrap_err();
		assert_eq!(error.kind(), ErrorKind::EvaluationFailure);
	}

	#[test]
	fn mass_transfer_totals() {
		let to = Recipient::from(Address::from_public_key(b'W', &PublicKey::zero()));
		let tx = Transaction::MassTransfer(Signed::new(header(), MassTransfer {
			asset: None,
			transfers: vec![
				MassTransferEntry { recipient: to.clone(), amount: 10 },
				MassTransferEntry { recipient: to, amount: 15 },
			],
			attachment: vec![],
		}));
		let object = transaction_to_object(b'W', &tx).unwrap();
		assert_eq!(object.get("transferCount"), Some(&Value::Int(2)));
		assert_eq!(object.get("totalAmount"), Some(&Value::Int(25)));
	}

	#[test]
	fn deleted_entries_are_unit() {
		let tx = Transaction::Data(Signed::new(header(), Data {
			entries: vec![
				DataEntry::Integer { key: String::from("a"), value: 1 },
				DataEntry::Delete { key: String::from("b") },
			],
		}));
		let object = transaction_to_object(b'W', &tx).unwrap();
		let entry: Value = Object::new("IntegerEntry").with("key", Value::string("a")).with("value", 1_i64).into();
		assert_eq!(object.get("data"), Some(&Value::List(vec![entry, Value::Unit])));
	}

	#[test]
	fn invoke_expression_is_not_convertible() {
		let tx = Transaction::InvokeExpression(Signed::new(header(), InvokeExpression {
			expression: vec![1],
			fee_asset: None,
		}));
		let error = transaction_to_object(b'W', &tx).unwrap_err();
		assert!(error.message().contains("not implemented"));
		let invocation = invocation_to_object(5, b'W', &tx).unwrap();
		assert_eq!(invocation.get("payments"), Some(&Value::List(vec![])));
	}

	#[test]
	fn invocation_payments_depend_on_version() {
		let payment = ScriptPayment { asset: None, amount: 7 };
		let tx = invoke(vec![payment.clone()]);
		let attached: Value = attached_payment_to_object(&payment).into();

		let v3 = invocation_to_object(3, b'W', &tx).unwrap();
		assert_eq!(v3.get("payment"), Some(&attached));
		assert_eq!(v3.get("payments"), None);
		assert_eq!(v3.get("originCaller"), None);

		let v5 = invocation_to_object(5, b'W', &tx).unwrap();
		assert_eq!(v5.get("payments"), Some(&Value::List(vec![attached])));
		assert_eq!(v5.get("originCaller"), v5.get("caller"));
		assert_eq!(v5.get("transactionId"), Some(&Value::bytes(&[1; 32])));

		let object = transaction_to_object(b'W', &tx).unwrap();
		assert_eq!(object.get("function"), Some(&Value::string("buy")));
		assert_eq!(object.get("args"), Some(&Value::List(vec![Value::Int(5), Value::string("x")])));
	}

	#[test]
	fn nested_invocation_keeps_the_origin() {
		let tx = invoke(vec![]);
		let parent = invocation_to_object(5, b'W', &tx).unwrap();
		let dapp = Address::from_public_key(b'W', &PublicKey::repeat_byte(9));
		let nested = nested_invocation(&parent, dapp, &PublicKey::repeat_byte(9), &[]);
		assert_eq!(nested.get("caller"), Some(&Value::Address(dapp)));
		assert_eq!(nested.get("originCaller"), parent.get("caller"));
		assert_eq!(nested.get("fee"), parent.get("fee"));
	}

	#[test]
	fn block_and_order_objects() {
		let header = BlockHeader {
			timestamp: 1,
			height: 2,
			base_target: 3,
			generation_signature: vec![4],
			generator_public_key: PublicKey::repeat_byte(5),
			vrf: Some(vec![]),
		};
		let block = block_info_to_object(b'T', &header).unwrap();
		assert_eq!(block.get("vrf"), Some(&Value::Unit));
		assert_eq!(
			block.get("generator"),
			Some(&Value::Address(Address::from_public_key(b'T', &PublicKey::repeat_byte(5))))
		);

		let order = Order {
			version: 3,
			id: H256::repeat_byte(6),
			sender_public_key: PublicKey::repeat_byte(7),
			matcher_public_key: PublicKey::repeat_byte(8),
			amount_asset: None,
			price_asset: Some(H256::repeat_byte(9)),
			order_type: OrderType::Sell,
			price: 10,
			amount: 11,
			timestamp: 12,
			expiration: 13,
			matcher_fee: 14,
			matcher_fee_asset: None,
			body_bytes: vec![],
			proofs: vec![],
		};
		let object = order_to_object(b'T', &order).unwrap();
		assert_eq!(object.get("orderType"), Some(&Value::Object(Object::new("Sell"))));
		assert_eq!(
			object.get("assetPair").and_then(Value::as_object).and_then(|pair| pair.get("priceAsset")),
			Some(&Value::bytes(&[9; 32]))
		);
	}
}
