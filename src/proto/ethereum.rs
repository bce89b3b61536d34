//! Ethereum-signed transactions accepted by the chain.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::convert::TryFrom;
use core::fmt;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::FieldBytes;
use num_traits::ToPrimitive;
use once_cell::race::OnceBox;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use ride_core::{ethereum_address, keccak256, Address, H160, H256, H512, U256};
use ride_ethabi::{DataType, DecodedCallData};

/// Type byte of an Ethereum transaction in the binary transaction format.
pub const ETHEREUM_TRANSACTION_TYPE: u8 = 18;
/// Ethereum amounts have 18 decimals, native amounts have 8.
pub const DIFF_ETH_WAVES: u64 = 10_000_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EthereumTxType {
	Legacy = 0,
	AccessList = 1,
	DynamicFee = 2,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EthereumTxError {
	Empty,
	Rlp(DecoderError),
	/// Typed envelope with an unknown type byte.
	UnsupportedType(u8),
	TrailingBytes,
	/// Binary form not prefixed with the Ethereum transaction type.
	UnexpectedTransactionType(u8),
	InvalidSignature,
	/// Contract creation has no recipient.
	ContractCreation,
	/// Converted amount does not fit a signed 64-bit integer.
	AmountOverflow(U256),
	InvalidTransferArguments,
}

impl fmt::Display for EthereumTxError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("empty ethereum transaction bytes"),
			Self::Rlp(error) => write!(f, "malformed ethereum transaction rlp: {}", error),
			Self::UnsupportedType(ty) => write!(f, "ethereum transaction type {} not supported", ty),
			Self::TrailingBytes => f.write_str("trailing bytes after ethereum transaction"),
			Self::UnexpectedTransactionType(ty) => {
				write!(f, "incorrect transaction type {} for ethereum transaction", ty)
			},
			Self::InvalidSignature => f.write_str("invalid transaction v, r, s values"),
			Self::ContractCreation => f.write_str("recipient address is absent"),
			Self::AmountOverflow(value) => write!(f, "amount {} does not fit int64", value),
			Self::InvalidTransferArguments => f.write_str("malformed erc20 transfer arguments"),
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for EthereumTxError {}

impl From<DecoderError> for EthereumTxError {
	fn from(error: DecoderError) -> Self {
		Self::Rlp(error)
	}
}

/// Address and storage slots pre-declared by a typed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessTuple {
	pub address: H160,
	pub storage_keys: Vec<H256>,
}

impl Encodable for AccessTuple {
	fn rlp_append(&self, s: &mut RlpStream) {
		s.begin_list(2);
		s.append(&self.address);
		s.append_list(&self.storage_keys);
	}
}

impl Decodable for AccessTuple {
	fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
		if rlp.item_count()? != 2 {
			return Err(DecoderError::RlpIncorrectListLen)
		}
		Ok(Self { address: rlp.val_at(0)?, storage_keys: rlp.list_at(1)? })
	}
}

/// Pre-EIP-2718 transaction, with EIP-155 replay protection when `v` encodes a chain id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyTx {
	pub nonce: u64,
	pub gas_price: U256,
	pub gas: u64,
	pub to: Option<H160>,
	pub value: U256,
	pub data: Vec<u8>,
	pub v: U256,
	pub r: U256,
	pub s: U256,
}

/// EIP-2930 transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessListTx {
	pub chain_id: U256,
	pub nonce: u64,
	pub gas_price: U256,
	pub gas: u64,
	pub to: Option<H160>,
	pub value: U256,
	pub data: Vec<u8>,
	pub access_list: Vec<AccessTuple>,
	pub v: U256,
	pub r: U256,
	pub s: U256,
}

/// EIP-1559 transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynamicFeeTx {
	pub chain_id: U256,
	pub nonce: u64,
	pub gas_tip_cap: U256,
	pub gas_fee_cap: U256,
	pub gas: u64,
	pub to: Option<H160>,
	pub value: U256,
	pub data: Vec<u8>,
	pub access_list: Vec<AccessTuple>,
	pub v: U256,
	pub r: U256,
	pub s: U256,
}

fn append_to(s: &mut RlpStream, to: Option<&H160>) {
	match to {
		Some(address) => s.append(address),
		None => s.append_empty_data(),
	};
}

fn to_at(rlp: &Rlp<'_>, index: usize) -> Result<Option<H160>, DecoderError> {
	let item = rlp.at(index)?;
	if item.is_empty() {
		Ok(None)
	} else {
		item.as_val().map(Some)
	}
}

fn expect_items(rlp: &Rlp<'_>, count: usize) -> Result<(), DecoderError> {
	if rlp.item_count()? == count {
		Ok(())
	} else {
		Err(DecoderError::RlpIncorrectListLen)
	}
}

/// Parses one RLP item spanning the whole input.
fn exact(data: &[u8]) -> Result<Rlp<'_>, EthereumTxError> {
	let rlp = Rlp::new(data);
	if rlp.payload_info()?.total() != data.len() {
		return Err(EthereumTxError::TrailingBytes)
	}
	Ok(rlp)
}

fn typed(ty: EthereumTxType, s: RlpStream) -> Vec<u8> {
	let payload = s.out();
	let mut out = Vec::with_capacity(1 + payload.len());
	out.push(ty as u8);
	out.extend_from_slice(&payload);
	out
}

impl LegacyTx {
	/// Chain id encoded in `v`, `None` for unprotected transactions.
	#[must_use]
	pub fn chain_id(&self) -> Option<U256> {
		if self.v == U256::from(27) || self.v == U256::from(28) || self.v <= U256::one() {
			None
		} else {
			self.v.checked_sub(U256::from(35)).map(|v| v / 2)
		}
	}

	fn append_unsigned(&self, s: &mut RlpStream) {
		s.append(&self.nonce);
		s.append(&self.gas_price);
		s.append(&self.gas);
		append_to(s, self.to.as_ref());
		s.append(&self.value);
		s.append(&self.data);
	}

	fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
		expect_items(rlp, 9)?;
		Ok(Self {
			nonce: rlp.val_at(0)?,
			gas_price: rlp.val_at(1)?,
			gas: rlp.val_at(2)?,
			to: to_at(rlp, 3)?,
			value: rlp.val_at(4)?,
			data: rlp.val_at(5)?,
			v: rlp.val_at(6)?,
			r: rlp.val_at(7)?,
			s: rlp.val_at(8)?,
		})
	}

	fn recovery_id(&self) -> Option<U256> {
		match self.chain_id() {
			Some(chain_id) => self.v.checked_sub(chain_id * 2 + U256::from(35)),
			None if self.v <= U256::one() => Some(self.v),
			None => self.v.checked_sub(U256::from(27)),
		}
	}
}

impl AccessListTx {
	fn append_unsigned(&self, s: &mut RlpStream) {
		s.append(&self.chain_id);
		s.append(&self.nonce);
		s.append(&self.gas_price);
		s.append(&self.gas);
		append_to(s, self.to.as_ref());
		s.append(&self.value);
		s.append(&self.data);
		s.append_list(&self.access_list);
	}

	fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
		expect_items(rlp, 11)?;
		Ok(Self {
			chain_id: rlp.val_at(0)?,
			nonce: rlp.val_at(1)?,
			gas_price: rlp.val_at(2)?,
			gas: rlp.val_at(3)?,
			to: to_at(rlp, 4)?,
			value: rlp.val_at(5)?,
			data: rlp.val_at(6)?,
			access_list: rlp.list_at(7)?,
			v: rlp.val_at(8)?,
			r: rlp.val_at(9)?,
			s: rlp.val_at(10)?,
		})
	}
}

impl DynamicFeeTx {
	fn append_unsigned(&self, s: &mut RlpStream) {
		s.append(&self.chain_id);
		s.append(&self.nonce);
		s.append(&self.gas_tip_cap);
		s.append(&self.gas_fee_cap);
		s.append(&self.gas);
		append_to(s, self.to.as_ref());
		s.append(&self.value);
		s.append(&self.data);
		s.append_list(&self.access_list);
	}

	fn decode(rlp: &Rlp<'_>) -> Result<Self, DecoderError> {
		expect_items(rlp, 12)?;
		Ok(Self {
			chain_id: rlp.val_at(0)?,
			nonce: rlp.val_at(1)?,
			gas_tip_cap: rlp.val_at(2)?,
			gas_fee_cap: rlp.val_at(3)?,
			gas: rlp.val_at(4)?,
			to: to_at(rlp, 5)?,
			value: rlp.val_at(6)?,
			data: rlp.val_at(7)?,
			access_list: rlp.list_at(8)?,
			v: rlp.val_at(9)?,
			r: rlp.val_at(10)?,
			s: rlp.val_at(11)?,
		})
	}
}

/// Signed payload of an Ethereum transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EthereumTxData {
	Legacy(LegacyTx),
	AccessList(AccessListTx),
	DynamicFee(DynamicFeeTx),
}

impl EthereumTxData {
	#[must_use]
	pub const fn tx_type(&self) -> EthereumTxType {
		match self {
			Self::Legacy(_) => EthereumTxType::Legacy,
			Self::AccessList(_) => EthereumTxType::AccessList,
			Self::DynamicFee(_) => EthereumTxType::DynamicFee,
		}
	}

	/// Zero for unprotected legacy transactions.
	#[must_use]
	pub fn chain_id(&self) -> U256 {
		match self {
			Self::Legacy(tx) => tx.chain_id().unwrap_or_default(),
			Self::AccessList(tx) => tx.chain_id,
			Self::DynamicFee(tx) => tx.chain_id,
		}
	}

	#[must_use]
	pub const fn nonce(&self) -> u64 {
		match self {
			Self::Legacy(tx) => tx.nonce,
			Self::AccessList(tx) => tx.nonce,
			Self::DynamicFee(tx) => tx.nonce,
		}
	}

	#[must_use]
	pub const fn gas(&self) -> u64 {
		match self {
			Self::Legacy(tx) => tx.gas,
			Self::AccessList(tx) => tx.gas,
			Self::DynamicFee(tx) => tx.gas,
		}
	}

	#[must_use]
	pub const fn to(&self) -> Option<&H160> {
		match self {
			Self::Legacy(tx) => tx.to.as_ref(),
			Self::AccessList(tx) => tx.to.as_ref(),
			Self::DynamicFee(tx) => tx.to.as_ref(),
		}
	}

	#[must_use]
	pub const fn value(&self) -> U256 {
		match self {
			Self::Legacy(tx) => tx.value,
			Self::AccessList(tx) => tx.value,
			Self::DynamicFee(tx) => tx.value,
		}
	}

	#[must_use]
	pub fn data(&self) -> &[u8] {
		match self {
			Self::Legacy(tx) => &tx.data,
			Self::AccessList(tx) => &tx.data,
			Self::DynamicFee(tx) => &tx.data,
		}
	}

	/// Raw `(v, r, s)` signature values.
	#[must_use]
	pub const fn signature_values(&self) -> (U256, U256, U256) {
		match self {
			Self::Legacy(tx) => (tx.v, tx.r, tx.s),
			Self::AccessList(tx) => (tx.v, tx.r, tx.s),
			Self::DynamicFee(tx) => (tx.v, tx.r, tx.s),
		}
	}

	/// Canonical encoding: plain RLP for legacy transactions, type byte and RLP otherwise.
	#[must_use]
	pub fn encode(&self) -> Vec<u8> {
		match self {
			Self::Legacy(tx) => {
				let mut s = RlpStream::new_list(9);
				tx.append_unsigned(&mut s);
				s.append(&tx.v);
				s.append(&tx.r);
				s.append(&tx.s);
				s.out().to_vec()
			},
			Self::AccessList(tx) => {
				let mut s = RlpStream::new_list(11);
				tx.append_unsigned(&mut s);
				s.append(&tx.v);
				s.append(&tx.r);
				s.append(&tx.s);
				typed(EthereumTxType::AccessList, s)
			},
			Self::DynamicFee(tx) => {
				let mut s = RlpStream::new_list(12);
				tx.append_unsigned(&mut s);
				s.append(&tx.v);
				s.append(&tx.r);
				s.append(&tx.s);
				typed(EthereumTxType::DynamicFee, s)
			},
		}
	}

	/// Decodes the canonical encoding.
	pub fn decode(data: &[u8]) -> Result<Self, EthereumTxError> {
		let (&first, payload) = data.split_first().ok_or(EthereumTxError::Empty)?;
		if first > 0x7f {
			return Ok(Self::Legacy(LegacyTx::decode(&exact(data)?)?))
		}
		match first {
			1 => Ok(Self::AccessList(AccessListTx::decode(&exact(payload)?)?)),
			2 => Ok(Self::DynamicFee(DynamicFeeTx::decode(&exact(payload)?)?)),
			other => Err(EthereumTxError::UnsupportedType(other)),
		}
	}

	/// Hash the sender signed.
	#[must_use]
	pub fn signing_hash(&self) -> H256 {
		match self {
			Self::Legacy(tx) => {
				let mut s = RlpStream::new();
				match tx.chain_id() {
					Some(chain_id) => {
						s.begin_list(9);
						tx.append_unsigned(&mut s);
						s.append(&chain_id);
						s.append(&0_u8);
						s.append(&0_u8);
					},
					None => {
						s.begin_list(6);
						tx.append_unsigned(&mut s);
					},
				}
				keccak256(&s.out())
			},
			Self::AccessList(tx) => {
				let mut s = RlpStream::new_list(8);
				tx.append_unsigned(&mut s);
				keccak256(&typed(EthereumTxType::AccessList, s))
			},
			Self::DynamicFee(tx) => {
				let mut s = RlpStream::new_list(9);
				tx.append_unsigned(&mut s);
				keccak256(&typed(EthereumTxType::DynamicFee, s))
			},
		}
	}

	fn recovery_id(&self) -> Result<RecoveryId, EthereumTxError> {
		let id = match self {
			Self::Legacy(tx) => tx.recovery_id(),
			Self::AccessList(tx) => Some(tx.v),
			Self::DynamicFee(tx) => Some(tx.v),
		};
		id.filter(|id| *id <= U256::one())
			.and_then(|id| RecoveryId::from_byte(id.low_u32() as u8))
			.ok_or(EthereumTxError::InvalidSignature)
	}

	/// Uncompressed secp256k1 key of the signer, without the SEC1 tag byte.
	pub fn recover_sender(&self) -> Result<H512, EthereumTxError> {
		let (_, r, s) = self.signature_values();
		let signature = Signature::from_scalars(
			FieldBytes::clone_from_slice(&r.to_be_bytes()),
			FieldBytes::clone_from_slice(&s.to_be_bytes()),
		)
		.map_err(|_| EthereumTxError::InvalidSignature)?;
		// Homestead rule: only the lower half of the curve order is accepted for `s`.
		if signature.normalize_s().is_some() {
			return Err(EthereumTxError::InvalidSignature)
		}
		let key = VerifyingKey::recover_from_prehash(
			self.signing_hash().as_bytes(),
			&signature,
			self.recovery_id()?,
		)
		.map_err(|_| EthereumTxError::InvalidSignature)?;
		let point = key.to_encoded_point(false);
		match point.as_bytes() {
			[0x04, xy @ ..] if xy.len() == 64 => Ok(H512::from_slice(xy)),
			_ => Err(EthereumTxError::InvalidSignature),
		}
	}
}

/// What an Ethereum transaction does, decided from its call data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EthereumTransactionKind {
	/// Native token transfer, no call data.
	TransferWaves,
	/// ERC-20 `transfer` of an asset addressed by its Ethereum form.
	TransferAssets {
		asset: H256,
		recipient: H160,
		amount: i64,
		data: DecodedCallData,
	},
	/// Call of a dApp callable.
	InvokeScript(DecodedCallData),
}

impl EthereumTransactionKind {
	/// ERC-20 transfer from call data decoded against the ERC-20 table.
	pub fn erc20_transfer(asset: H256, data: DecodedCallData) -> Result<Self, EthereumTxError> {
		let (recipient, amount) = {
			let mut values = data.values();
			let recipient = match values.next() {
				Some(DataType::Bytes(bytes)) if bytes.len() == H160::len_bytes() => H160::from_slice(bytes),
				_ => return Err(EthereumTxError::InvalidTransferArguments),
			};
			let amount = match values.next() {
				Some(DataType::Int(amount)) => *amount,
				Some(DataType::BigInt(amount)) => amount.to_i64().ok_or(EthereumTxError::InvalidTransferArguments)?,
				_ => return Err(EthereumTxError::InvalidTransferArguments),
			};
			(recipient, amount)
		};
		Ok(Self::TransferAssets { asset, recipient, amount, data })
	}

	#[must_use]
	pub const fn decoded_data(&self) -> Option<&DecodedCallData> {
		match self {
			Self::TransferWaves => None,
			Self::TransferAssets { data, .. } | Self::InvokeScript(data) => Some(data),
		}
	}
}

/// Ethereum transaction with its id and lazily resolved sender and kind.
pub struct EthereumTransaction {
	inner: EthereumTxData,
	id: H256,
	sender: OnceBox<H512>,
	kind: OnceBox<EthereumTransactionKind>,
}

impl fmt::Debug for EthereumTransaction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EthereumTransaction")
			.field("id", &self.id)
			.field("inner", &self.inner)
			.field("kind", &self.kind.get())
			.finish()
	}
}

impl EthereumTransaction {
	/// Wraps signed data, the id is the hash of its canonical encoding.
	#[must_use]
	pub fn new(inner: EthereumTxData) -> Self {
		let id = keccak256(&inner.encode());
		Self { inner, id, sender: OnceBox::new(), kind: OnceBox::new() }
	}

	/// Transaction whose sender was already recovered elsewhere.
	#[must_use]
	pub fn with_sender(inner: EthereumTxData, sender_public_key: H512) -> Self {
		let tx = Self::new(inner);
		// A fresh cell is empty, the set cannot fail.
		let _ = tx.sender.set(Box::new(sender_public_key));
		tx
	}

	/// Decodes the canonical encoding.
	pub fn decode(canonical: &[u8]) -> Result<Self, EthereumTxError> {
		let inner = EthereumTxData::decode(canonical)?;
		log::trace!(target: "ride", "decoded ethereum transaction of type {:?}", inner.tx_type());
		Ok(Self::new(inner))
	}

	/// Decodes the binary transaction form: type byte followed by the canonical encoding.
	pub fn from_binary(bytes: &[u8]) -> Result<Self, EthereumTxError> {
		match bytes.split_first() {
			Some((&ETHEREUM_TRANSACTION_TYPE, canonical)) => Self::decode(canonical),
			Some((&other, _)) => Err(EthereumTxError::UnexpectedTransactionType(other)),
			None => Err(EthereumTxError::Empty),
		}
	}

	#[must_use]
	pub fn to_binary(&self) -> Vec<u8> {
		let canonical = self.inner.encode();
		let mut out = Vec::with_capacity(1 + canonical.len());
		out.push(ETHEREUM_TRANSACTION_TYPE);
		out.extend_from_slice(&canonical);
		out
	}

	#[must_use]
	pub const fn inner(&self) -> &EthereumTxData {
		&self.inner
	}

	#[must_use]
	pub const fn id(&self) -> H256 {
		self.id
	}

	/// Gas limit, charged as the fee.
	#[must_use]
	pub const fn fee(&self) -> u64 {
		self.inner.gas()
	}

	/// The nonce doubles as the timestamp.
	#[must_use]
	pub const fn timestamp(&self) -> u64 {
		self.inner.nonce()
	}

	/// Recovers the sender key once; later calls return the memoized key.
	pub fn sender_public_key(&self) -> Result<&H512, EthereumTxError> {
		self.sender.get_or_try_init(|| self.inner.recover_sender().map(Box::new))
	}

	pub fn sender(&self, scheme: u8) -> Result<Address, EthereumTxError> {
		let public_key = self.sender_public_key()?;
		Ok(Address::from_ethereum(scheme, &ethereum_address(public_key)))
	}

	pub fn recipient(&self, scheme: u8) -> Result<Address, EthereumTxError> {
		let to = self.inner.to().ok_or(EthereumTxError::ContractCreation)?;
		Ok(Address::from_ethereum(scheme, to))
	}

	/// Transferred value in native units.
	pub fn amount(&self) -> Result<i64, EthereumTxError> {
		let value = self.inner.value() / U256::from(DIFF_ETH_WAVES);
		if value > U256::from(i64::MAX as u64) {
			return Err(EthereumTxError::AmountOverflow(self.inner.value()))
		}
		i64::try_from(value.low_u64()).map_err(|_| EthereumTxError::AmountOverflow(self.inner.value()))
	}

	/// Kind resolved by an earlier `kind_or_try_init`.
	#[must_use]
	pub fn kind(&self) -> Option<&EthereumTransactionKind> {
		self.kind.get()
	}

	/// Resolves the kind once; later calls return the memoized kind.
	pub fn kind_or_try_init<F, E>(&self, f: F) -> Result<&EthereumTransactionKind, E>
	where
		F: FnOnce() -> Result<EthereumTransactionKind, E>,
	{
		self.kind.get_or_try_init(|| f().map(Box::new))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use k256::ecdsa::SigningKey;

	fn signed_legacy(chain_id: u64, value: U256) -> (EthereumTxData, H512) {
		let key = SigningKey::from_bytes(&FieldBytes::clone_from_slice(&[0x42; 32])).unwrap();
		let mut tx = LegacyTx {
			nonce: 1_479_168_000_000,
			gas_price: U256::one(),
			gas: 100_000,
			to: Some(H160::repeat_byte(0x24)),
			value,
			data: Vec::new(),
			v: U256::from(chain_id * 2 + 35),
			r: U256::zero(),
			s: U256::zero(),
		};
		let hash = EthereumTxData::Legacy(tx.clone()).signing_hash();
		let (signature, recovery) = key.sign_prehash_recoverable(hash.as_bytes()).unwrap();
		let (r, s) = signature.split_bytes();
		tx.v = U256::from(chain_id * 2 + 35 + u64::from(recovery.to_byte()));
		tx.r = U256::from_big_endian(&r);
		tx.s = U256::from_big_endian(&s);

		let point = key.verifying_key().to_encoded_point(false);
		(EthereumTxData::Legacy(tx), H512::from_slice(&point.as_bytes()[1..]))
	}

	#[test]
	fn recovers_sender_of_protected_legacy_transaction() {
		let (data, public_key) = signed_legacy(u64::from(b'W'), U256::from(1_000_000_000_000_000_u64));
		assert_eq!(data.chain_id(), U256::from(u64::from(b'W')));

		let tx = EthereumTransaction::decode(&data.encode()).unwrap();
		assert_eq!(tx.inner(), &data);
		assert_eq!(tx.sender_public_key().unwrap(), &public_key);
		assert_eq!(tx.id(), keccak256(&data.encode()));
		assert_eq!(tx.amount(), Ok(100_000));
		assert_eq!(
			tx.sender(b'W').unwrap(),
			Address::from_ethereum(b'W', &ethereum_address(&public_key))
		);
	}

	#[test]
	fn tampered_signature_recovers_another_key() {
		let (data, public_key) = signed_legacy(u64::from(b'T'), U256::zero());
		let mut tampered = match data {
			EthereumTxData::Legacy(tx) => tx,
			_ => unreachable!(),
		};
		tampered.value = U256::from(1);
		let recovered = EthereumTxData::Legacy(tampered).recover_sender();
		assert_ne!(recovered.ok(), Some(public_key));
	}

	#[test]
	fn typed_envelopes_keep_their_fields() {
		let tx = EthereumTxData::DynamicFee(DynamicFeeTx {
			chain_id: U256::from(84),
			nonce: 7,
			gas_tip_cap: U256::from(2),
			gas_fee_cap: U256::from(30),
			gas: 500_000,
			to: None,
			value: U256::zero(),
			data: vec![0xa9, 0x05, 0x9c, 0xbb],
			access_list: vec![AccessTuple { address: H160::repeat_byte(1), storage_keys: vec![H256::repeat_byte(2)] }],
			v: U256::one(),
			r: U256::from(3),
			s: U256::from(4),
		});
		let encoded = tx.encode();
		assert_eq!(encoded[0], 2);
		assert_eq!(EthereumTxData::decode(&encoded), Ok(tx));
	}

	#[test]
	fn malformed_input_is_rejected() {
		assert_eq!(EthereumTxData::decode(&[]), Err(EthereumTxError::Empty));
		assert_eq!(EthereumTxData::decode(&[0x05, 0xc0]), Err(EthereumTxError::UnsupportedType(5)));
		assert!(EthereumTxData::decode(&[0xf8, 0xff, 0x01]).is_err());
		assert!(EthereumTxData::decode(&[0x02, 0xc1, 0x80]).is_err());
		assert_eq!(
			EthereumTransaction::from_binary(&[3, 0xc0]).unwrap_err(),
			EthereumTxError::UnexpectedTransactionType(3)
		);

		let (data, _) = signed_legacy(1, U256::zero());
		let mut bytes = data.encode();
		bytes.push(0);
		assert_eq!(EthereumTxData::decode(&bytes), Err(EthereumTxError::TrailingBytes));
	}

	#[test]
	fn amount_must_fit_int64() {
		let (data, public_key) = signed_legacy(1, U256::max_value());
		let tx = EthereumTransaction::with_sender(data, public_key);
		assert!(matches!(tx.amount(), Err(EthereumTxError::AmountOverflow(_))));
		assert_eq!(tx.recipient(b'W').unwrap(), Address::from_ethereum(b'W', &H160::repeat_byte(0x24)));
	}

	#[test]
	fn kind_is_resolved_once() {
		let (data, _) = signed_legacy(1, U256::zero());
		let tx = EthereumTransaction::new(data);
		assert_eq!(tx.kind(), None);
		let kind = tx.kind_or_try_init::<_, ()>(|| Ok(EthereumTransactionKind::TransferWaves)).unwrap();
		assert_eq!(kind, &EthereumTransactionKind::TransferWaves);
		let again = tx.kind_or_try_init::<_, ()>(|| Err(())).unwrap();
		assert_eq!(again, &EthereumTransactionKind::TransferWaves);
	}
}
