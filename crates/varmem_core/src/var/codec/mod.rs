//! Fixed-width little-endian encode/decode rules per scalar type.

use crate::var::bytes::Cursor;
use crate::var::{DataType, Result, ScalarValue, VarError};

/// Decode one value of scalar type `ty` from the front of `cursor`.
pub fn decode_and_advance(ty: DataType, cursor: &mut Cursor<'_>) -> Result<ScalarValue> {
	Ok(match ty {
		DataType::Boolean => ScalarValue::Bool(cursor.read_array::<1>()?[0] != 0),
		DataType::Int8 => ScalarValue::I8(i8::from_le_bytes(cursor.read_array()?)),
		DataType::Int16 => ScalarValue::I16(i16::from_le_bytes(cursor.read_array()?)),
		DataType::Int32 => ScalarValue::I32(i32::from_le_bytes(cursor.read_array()?)),
		DataType::Int64 => ScalarValue::I64(i64::from_le_bytes(cursor.read_array()?)),
		DataType::UInt8 => ScalarValue::U8(cursor.read_array::<1>()?[0]),
		DataType::UInt16 => ScalarValue::U16(u16::from_le_bytes(cursor.read_array()?)),
		DataType::UInt32 => ScalarValue::U32(u32::from_le_bytes(cursor.read_array()?)),
		DataType::UInt64 => ScalarValue::U64(u64::from_le_bytes(cursor.read_array()?)),
		#[cfg(feature = "f16")]
		DataType::Float16 => ScalarValue::F16(half::f16::from_le_bytes(cursor.read_array()?)),
		#[cfg(not(feature = "f16"))]
		DataType::Float16 => return Err(VarError::Float16Unsupported),
		DataType::Float32 => ScalarValue::F32(f32::from_le_bytes(cursor.read_array()?)),
		DataType::Float64 => ScalarValue::F64(f64::from_le_bytes(cursor.read_array()?)),
		DataType::Array => return Err(VarError::UnsupportedType { tag: ty.tag() }),
	})
}

/// Decode one value of scalar type `ty` from the start of `bytes`.
pub fn decode(ty: DataType, bytes: &[u8]) -> Result<ScalarValue> {
	decode_and_advance(ty, &mut Cursor::new(bytes))
}

/// Append the canonical encoding of `value` to `out`.
pub fn encode_into(value: &ScalarValue, out: &mut Vec<u8>) {
	match *value {
		ScalarValue::Bool(item) => out.push(u8::from(item)),
		ScalarValue::I8(item) => out.extend_from_slice(&item.to_le_bytes()),
		ScalarValue::I16(item) => out.extend_from_slice(&item.to_le_bytes()),
		ScalarValue::I32(item) => out.extend_from_slice(&item.to_le_bytes()),
		ScalarValue::I64(item) => out.extend_from_slice(&item.to_le_bytes()),
		ScalarValue::U8(item) => out.push(item),
		ScalarValue::U16(item) => out.extend_from_slice(&item.to_le_bytes()),
		ScalarValue::U32(item) => out.extend_from_slice(&item.to_le_bytes()),
		ScalarValue::U64(item) => out.extend_from_slice(&item.to_le_bytes()),
		#[cfg(feature = "f16")]
		ScalarValue::F16(item) => out.extend_from_slice(&item.to_le_bytes()),
		ScalarValue::F32(item) => out.extend_from_slice(&item.to_le_bytes()),
		ScalarValue::F64(item) => out.extend_from_slice(&item.to_le_bytes()),
	}
}

/// Canonical encoding of `value` as a value of type `ty`.
pub fn encode(ty: DataType, value: &ScalarValue) -> Result<Vec<u8>> {
	check_kind(ty, value, "")?;
	let mut out = Vec::with_capacity(ty.width().unwrap_or(0));
	encode_into(value, &mut out);
	Ok(out)
}

/// Fail unless `value` carries type `ty`; `field` names the owner in the error.
pub(crate) fn check_kind(ty: DataType, value: &ScalarValue, field: &str) -> Result<()> {
	if value.data_type() != ty {
		return Err(VarError::ValueTypeMismatch {
			field: field.to_owned(),
			expected: ty.as_str(),
			got: value.data_type().as_str(),
		});
	}
	Ok(())
}
