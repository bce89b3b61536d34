//! Decoding of ABI-encoded argument sequences.
//!
//! Every offset and length read from the payload is checked against the
//! remaining buffer before it is used, and the total size of decoded
//! payloads is bounded by the size of the call data so that aliased
//! offsets cannot amplify memory use.

use alloc::string::String;
use alloc::vec::Vec;
use core::convert::TryFrom;
use num_traits::ToPrimitive;
use ride_core::{u256_to_bigint, BigInt, H256, I256, U256};
use crate::types::WORD;
use crate::{Argument, DataType, Error, Method, Payment, Type};

const MAX_OFFSET_BITS: usize = 63;

fn word_at(output: &[u8], index: usize) -> Result<&[u8], Error> {
	let end = index.checked_add(WORD).ok_or(Error::Overflow)?;
	output.get(index..end).ok_or(Error::ShortData { required: end, length: output.len() })
}

fn to_offset(value: U256) -> Result<usize, Error> {
	if value.bits() > MAX_OFFSET_BITS {
		return Err(Error::Overflow);
	}
	usize::try_from(value.low_u64()).map_err(|_| Error::Overflow)
}

/// Start and length of the length-prefixed payload referenced at `index`.
fn length_prefix_points_to(index: usize, output: &[u8]) -> Result<(usize, usize), Error> {
	let offset = U256::from_big_endian(word_at(output, index)?);
	let (offset_end, overflow) = offset.overflowing_add(U256::from(WORD));
	if overflow {
		return Err(Error::Overflow);
	}
	if offset_end > U256::from(output.len()) {
		return Err(Error::ShortData { required: to_offset(offset_end)?, length: output.len() });
	}
	let offset_end = to_offset(offset_end)?;

	let length = U256::from_big_endian(&output[offset_end - WORD..offset_end]);
	let (total, overflow) = length.overflowing_add(U256::from(offset_end));
	if overflow || total.bits() > MAX_OFFSET_BITS {
		return Err(Error::Overflow);
	}
	let total = to_offset(total)?;
	if total > output.len() {
		return Err(Error::ShortData { required: total, length: output.len() });
	}
	Ok((offset_end, total - offset_end))
}

/// Start of the dynamic tuple referenced at `index`.
fn tuple_points_to(index: usize, output: &[u8]) -> Result<usize, Error> {
	let offset = U256::from_big_endian(word_at(output, index)?);
	if offset > U256::from(output.len()) {
		return Err(Error::ShortData { required: to_offset(offset)?, length: output.len() });
	}
	to_offset(offset)
}

fn read_bool(word: &[u8]) -> Result<bool, Error> {
	if word[..WORD - 1].iter().any(|&b| b != 0) {
		return Err(Error::InvalidBool);
	}
	match word[WORD - 1] {
		0 => Ok(false),
		1 => Ok(true),
		_ => Err(Error::InvalidBool),
	}
}

fn tail<const N: usize>(word: &[u8]) -> [u8; N] {
	let mut out = [0_u8; N];
	out.copy_from_slice(&word[WORD - N..]);
	out
}

#[allow(clippy::cast_possible_wrap)]
fn read_integer(signed: bool, size: usize, word: &[u8]) -> DataType {
	match (signed, size) {
		(false, 8) => DataType::Int(i64::from(word[WORD - 1])),
		(false, 16) => DataType::Int(i64::from(u16::from_be_bytes(tail(word)))),
		(false, 32) => DataType::Int(i64::from(u32::from_be_bytes(tail(word)))),
		// Wraps like the reference decoder.
		(false, 64) => DataType::Int(u64::from_be_bytes(tail(word)) as i64),
		(false, _) => DataType::BigInt(u256_to_bigint(U256::from_big_endian(word))),
		(true, 8) => DataType::Int(i64::from(i8::from_be_bytes(tail(word)))),
		(true, 16) => DataType::Int(i64::from(i16::from_be_bytes(tail(word)))),
		(true, 32) => DataType::Int(i64::from(i32::from_be_bytes(tail(word)))),
		(true, 64) => DataType::Int(i64::from_be_bytes(tail(word))),
		(true, _) => DataType::BigInt(BigInt::from(I256::from(U256::from_big_endian(word)))),
	}
}

/// Stateful decoder over one call data payload.
pub(crate) struct Decoder {
	budget: usize,
}

impl Decoder {
	pub fn new(payload_length: usize) -> Self {
		Self { budget: payload_length }
	}

	fn charge(&mut self, bytes: usize) -> Result<(), Error> {
		self.budget = self.budget.checked_sub(bytes).ok_or(Error::ExcessiveData)?;
		Ok(())
	}

	/// Decodes a sequence of fields whose heads start at `start`.
	pub fn fields(
		&mut self,
		fields: &[Argument],
		output: &[u8],
		start: usize,
		unions: bool,
	) -> Result<Vec<DataType>, Error> {
		let mut values = Vec::with_capacity(fields.len());
		let mut index = start;
		for field in fields {
			values.push(self.value(index, &field.ty, output, unions)?);
			index = index.checked_add(field.ty.head_size()).ok_or(Error::Overflow)?;
		}
		Ok(values)
	}

	/// Decodes one value whose head is at `index`. With `unions` set, tuples
	/// are read as indexed unions, otherwise as plain records.
	pub fn value(
		&mut self,
		index: usize,
		ty: &Type,
		output: &[u8],
		unions: bool,
	) -> Result<DataType, Error> {
		let word = word_at(output, index)?;
		match ty {
			Type::Tuple(fields) => {
				let start = if ty.is_dynamic() { tuple_points_to(index, output)? } else { index };
				let tuple = &output[start..];
				if unions {
					self.union(fields, tuple)
				} else {
					Ok(DataType::List(self.fields(fields, tuple, 0, false)?))
				}
			},
			Type::Slice(elem) => {
				let (begin, length) = length_prefix_points_to(index, output)?;
				self.list(elem, &output[begin..], length, unions)
			},
			Type::String => {
				let payload = self.payload(index, output)?;
				String::from_utf8(payload.to_vec()).map(DataType::String).map_err(|_| Error::InvalidUtf8)
			},
			Type::Bytes => Ok(DataType::Bytes(self.payload(index, output)?.to_vec())),
			Type::Int(size) => Ok(read_integer(true, *size, word)),
			Type::Uint(size) => Ok(read_integer(false, *size, word)),
			Type::Bool => read_bool(word).map(DataType::Bool),
			Type::Address => Ok(DataType::Bytes(word[WORD - 20..].to_vec())),
		}
	}

	fn payload<'a>(&mut self, index: usize, output: &'a [u8]) -> Result<&'a [u8], Error> {
		let (begin, length) = length_prefix_points_to(index, output)?;
		self.charge(length)?;
		Ok(&output[begin..begin + length])
	}

	fn list(&mut self, elem: &Type, output: &[u8], size: usize, unions: bool) -> Result<DataType, Error> {
		let elem_size = elem.head_size();
		let required = size.checked_mul(elem_size).ok_or(Error::Overflow)?;
		if required > output.len() {
			return Err(Error::ShortData { required, length: output.len() });
		}
		self.charge(required)?;

		let mut values = Vec::with_capacity(size);
		for j in 0..size {
			values.push(self.value(j * elem_size, elem, output, unions)?);
		}
		Ok(DataType::List(values))
	}

	fn union(&mut self, fields: &[Argument], output: &[u8]) -> Result<DataType, Error> {
		let (first, rest) = match fields.split_first() {
			Some((first, rest)) if !rest.is_empty() => (first, rest),
			_ => return Err(Error::InvalidUnion("tuple must have at least two elements")),
		};
		if !matches!(first.ty, Type::Int(_) | Type::Uint(_)) {
			return Err(Error::InvalidUnion("first element of tuple must be a number"));
		}
		let index = match self.value(0, &first.ty, output, true)? {
			DataType::Int(index) => index,
			DataType::BigInt(index) => index
				.to_i64()
				.ok_or(Error::InvalidUnion("union index does not fit int64"))?,
			_ => return Err(Error::InvalidUnion("first element of tuple must be a number")),
		};
		let count = rest.len();
		let position = usize::try_from(index)
			.ok()
			.filter(|&position| position < count)
			.ok_or(Error::UnionIndex { index, count })?;

		let mut values = self.fields(rest, output, first.ty.head_size(), true)?;
		Ok(values.swap_remove(position))
	}
}

fn payment(value: DataType) -> Result<Payment, Error> {
	let mut fields = match value {
		DataType::List(fields) if fields.len() == 2 => fields,
		_ => return Err(Error::InvalidPayment("expected (bytes,int64) tuple")),
	};
	let amount = match fields.pop() {
		Some(DataType::Int(amount)) => amount,
		_ => return Err(Error::InvalidPayment("amount must be int64")),
	};
	let asset = match fields.pop() {
		Some(DataType::Bytes(asset)) if asset.is_empty() => None,
		Some(DataType::Bytes(asset)) if asset.len() == H256::len_bytes() => Some(H256::from_slice(&asset)),
		_ => return Err(Error::InvalidPayment("asset id must be empty or 32 bytes")),
	};
	Ok(Payment { asset, amount })
}

/// Decodes the arguments, and the payments when requested, of `method`.
pub(crate) fn unpack_call(
	method: &Method,
	payload: &[u8],
	parse_payments: bool,
) -> Result<(Vec<DataType>, Vec<Payment>), Error> {
	let mut decoder = Decoder::new(payload.len());
	let values = decoder.fields(&method.inputs, payload, 0, true)?;

	let mut payments = Vec::new();
	if let (true, Some(argument)) = (parse_payments, &method.payments) {
		let index = method
			.inputs
			.iter()
			.try_fold(0_usize, |acc, a| acc.checked_add(a.ty.head_size()))
			.ok_or(Error::Overflow)?;
		if let DataType::List(items) = decoder.value(index, &argument.ty, payload, false)? {
			for item in items {
				payments.push(payment(item)?);
			}
		} else {
			return Err(Error::InvalidPayment("payments must be a list"));
		}
	}
	Ok((values, payments))
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloc::boxed::Box;

	fn word(value: u64) -> Vec<u8> {
		let mut out = vec![0_u8; 24];
		out.extend_from_slice(&value.to_be_bytes());
		out
	}

	fn decode(fields: &[Argument], data: &[u8]) -> Result<Vec<DataType>, Error> {
		Decoder::new(data.len()).fields(fields, data, 0, true)
	}

	#[test]
	fn signed_and_unsigned_small_integers() {
		let mut data = vec![0xff_u8; 32];
		data.extend(vec![0xff_u8; 32]);
		let fields = [Argument::new("a", Type::Int(8)), Argument::new("b", Type::Uint(64))];
		let values = decode(&fields, &data).unwrap();
		assert_eq!(values[0], DataType::Int(-1));
		assert_eq!(values[1], DataType::Int(-1));
	}

	#[test]
	fn int256_uses_twos_complement() {
		let data = vec![0xff_u8; 32];
		let values = decode(&[Argument::new("a", Type::Int(256))], &data).unwrap();
		assert_eq!(values[0], DataType::BigInt(BigInt::from(-1)));
		let values = decode(&[Argument::new("a", Type::Uint(256))], &data).unwrap();
		assert!(matches!(&values[0], DataType::BigInt(v) if v.bits() == 256));
	}

	#[test]
	fn malformed_bool_is_rejected() {
		let data = word(2);
		assert_eq!(decode(&[Argument::new("b", Type::Bool)], &data), Err(Error::InvalidBool));
	}

	#[test]
	fn truncated_buffer_is_rejected() {
		let data = vec![0_u8; 31];
		assert!(matches!(
			decode(&[Argument::new("a", Type::Uint(8))], &data),
			Err(Error::ShortData { .. })
		));
	}

	#[test]
	fn offset_past_end_is_rejected() {
		let data = word(64);
		assert!(matches!(
			decode(&[Argument::new("s", Type::String)], &data),
			Err(Error::ShortData { .. })
		));
	}

	#[test]
	fn huge_offset_is_rejected() {
		let data = vec![0xff_u8; 32];
		assert_eq!(decode(&[Argument::new("s", Type::Bytes)], &data), Err(Error::Overflow));
		let mut data = vec![0x7f_u8];
		data.extend(vec![0xff_u8; 31]);
		assert!(decode(&[Argument::new("s", Type::Bytes)], &data).is_err());
	}

	#[test]
	fn huge_length_is_rejected() {
		let mut data = word(32);
		data.extend(vec![0xff_u8; 32]);
		assert_eq!(decode(&[Argument::new("s", Type::String)], &data), Err(Error::Overflow));
	}

	#[test]
	fn oversized_slice_is_rejected() {
		let mut data = word(32);
		data.extend(word(1_000));
		let slice = Type::Slice(Box::new(Type::Int(64)));
		assert!(matches!(decode(&[Argument::new("l", slice)], &data), Err(Error::ShortData { .. })));
	}

	#[test]
	fn aliased_payloads_exhaust_budget() {
		// Five strings all pointing at the same 60-byte payload.
		let mut data = Vec::new();
		for _ in 0..5 {
			data.extend(word(160));
		}
		data.extend(word(60));
		data.extend(vec![b'a'; 64]);
		let fields: Vec<Argument> = (0..5).map(|_| Argument::new("s", Type::String)).collect();
		assert_eq!(decode(&fields, &data), Err(Error::ExcessiveData));
	}

	fn union_type() -> Type {
		Type::Tuple(vec![
			Argument::new("union_index", Type::Uint(8)),
			Argument::new("intVar", Type::Int(64)),
			Argument::new("boolVar", Type::Bool),
		])
	}

	#[test]
	fn union_selects_indexed_field() {
		let mut data = word(1);
		data.extend(word(42));
		data.extend(word(1));
		let values = decode(&[Argument::new("u", union_type())], &data).unwrap();
		assert_eq!(values[0], DataType::Bool(true));

		let mut data = word(0);
		data.extend(word(42));
		data.extend(word(1));
		let values = decode(&[Argument::new("u", union_type())], &data).unwrap();
		assert_eq!(values[0], DataType::Int(42));
	}

	#[test]
	fn union_index_out_of_range_is_an_error() {
		let mut data = word(2);
		data.extend(word(42));
		data.extend(word(1));
		assert_eq!(
			decode(&[Argument::new("u", union_type())], &data),
			Err(Error::UnionIndex { index: 2, count: 2 })
		);
	}

	#[test]
	fn static_tuple_is_followed_by_next_argument() {
		let fields = [Argument::new("u", union_type()), Argument::new("x", Type::Uint(32))];
		let mut data = word(0);
		data.extend(word(7));
		data.extend(word(0));
		data.extend(word(99));
		let values = decode(&fields, &data).unwrap();
		assert_eq!(values, vec![DataType::Int(7), DataType::Int(99)]);
	}
}
