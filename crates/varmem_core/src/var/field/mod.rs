use std::fmt;

use crate::var::bytes::{Cursor, put_cstring};
use crate::var::codec::{self, check_kind};
use crate::var::{ArrayValue, DataType, Result, ScalarValue, VarError};

/// Named scalar entry of a structure.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
	/// Declared scalar type (never `Array`).
	pub ty: DataType,
	/// Field name, possibly empty.
	pub name: String,
	/// Current value; `None` encodes as the type's zero value.
	pub value: Option<ScalarValue>,
}

/// Named variable-length array entry of a structure.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayField {
	/// Declared element type (never `Array`).
	pub elem_type: DataType,
	/// Field name, possibly empty.
	pub name: String,
	/// Current contents; `None` encodes as a zero-length array.
	pub value: Option<ArrayValue>,
}

/// One entry of a structure: scalar or array.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
	/// Fixed-width scalar.
	Scalar(ScalarField),
	/// Count-prefixed array of scalars.
	Array(ArrayField),
}

impl Field {
	/// Scalar field holding the type's zero value.
	pub fn scalar(ty: DataType, name: impl Into<String>) -> Result<Self> {
		let value = ScalarValue::default_for(ty.ensure_supported()?)?;
		Ok(Self::Scalar(ScalarField {
			ty,
			name: name.into(),
			value: Some(value),
		}))
	}

	/// Array field holding a zero-length array.
	pub fn array(elem_type: DataType, name: impl Into<String>) -> Result<Self> {
		let name = name.into();
		if elem_type == DataType::Array {
			return Err(VarError::NestedArray { name });
		}
		Ok(Self::Array(ArrayField {
			elem_type: elem_type.ensure_supported()?,
			name,
			value: Some(ArrayValue::empty(elem_type)),
		}))
	}

	/// `uint8` array field holding `text` as UTF-8 bytes.
	pub fn text(name: impl Into<String>, text: &str) -> Self {
		Self::Array(ArrayField {
			elem_type: DataType::UInt8,
			name: name.into(),
			value: Some(ArrayValue::from(text)),
		})
	}

	/// Field name.
	pub fn name(&self) -> &str {
		match self {
			Self::Scalar(item) => &item.name,
			Self::Array(item) => &item.name,
		}
	}

	/// Declared wire type; `Array` for array fields.
	pub fn data_type(&self) -> DataType {
		match self {
			Self::Scalar(item) => item.ty,
			Self::Array(_) => DataType::Array,
		}
	}

	/// Element type for array fields.
	pub fn elem_type(&self) -> Option<DataType> {
		match self {
			Self::Scalar(_) => None,
			Self::Array(item) => Some(item.elem_type),
		}
	}

	/// True when the current value is absent.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Scalar(item) => item.value.is_none(),
			Self::Array(item) => item.value.is_none(),
		}
	}

	/// Same name and declared types, ignoring values.
	pub fn same_shape(&self, other: &Self) -> bool {
		self.name() == other.name() && self.data_type() == other.data_type() && self.elem_type() == other.elem_type()
	}

	/// Copy of this field with the value cleared.
	pub fn cleared(&self) -> Self {
		match self {
			Self::Scalar(item) => Self::Scalar(ScalarField {
				value: None,
				..item.clone()
			}),
			Self::Array(item) => Self::Array(ArrayField {
				value: None,
				..item.clone()
			}),
		}
	}

	/// Copy of this scalar field holding `value`.
	pub fn with_scalar(&self, value: ScalarValue) -> Result<Self> {
		match self {
			Self::Scalar(item) => {
				check_kind(item.ty, &value, &item.name)?;
				Ok(Self::Scalar(ScalarField {
					value: Some(value),
					..item.clone()
				}))
			}
			Self::Array(item) => Err(VarError::ValueTypeMismatch {
				field: item.name.clone(),
				expected: DataType::Array.as_str(),
				got: value.data_type().as_str(),
			}),
		}
	}

	/// Copy of this array field holding `value`.
	pub fn with_array(&self, value: ArrayValue) -> Result<Self> {
		match self {
			Self::Array(item) => {
				check_array(item.elem_type, &value, &item.name)?;
				Ok(Self::Array(ArrayField {
					value: Some(value),
					..item.clone()
				}))
			}
			Self::Scalar(item) => Err(VarError::ValueTypeMismatch {
				field: item.name.clone(),
				expected: item.ty.as_str(),
				got: DataType::Array.as_str(),
			}),
		}
	}

	/// Append schema bytes: type tag, element tag for arrays, NUL-terminated name.
	pub fn write_schema(&self, out: &mut Vec<u8>) {
		out.extend_from_slice(&self.data_type().tag().to_le_bytes());
		if let Some(elem_type) = self.elem_type() {
			out.extend_from_slice(&elem_type.tag().to_le_bytes());
		}
		put_cstring(out, self.name());
	}

	/// Schema bytes of this field alone.
	pub fn schema_bytes(&self) -> Vec<u8> {
		let mut out = Vec::new();
		self.write_schema(&mut out);
		out
	}

	/// Append value bytes: fixed width for scalars, `i32` count plus elements for arrays.
	pub fn write_value(&self, out: &mut Vec<u8>) -> Result<()> {
		match self {
			Self::Scalar(item) => {
				let value = match item.value {
					Some(value) => value,
					None => ScalarValue::default_for(item.ty)?,
				};
				check_kind(item.ty, &value, &item.name)?;
				codec::encode_into(&value, out);
			}
			Self::Array(item) => {
				let Some(value) = &item.value else {
					out.extend_from_slice(&0_i32.to_le_bytes());
					return Ok(());
				};
				check_array(item.elem_type, value, &item.name)?;
				let count = array_count(&item.name, value.len())?;
				out.extend_from_slice(&count.to_le_bytes());
				match value {
					ArrayValue::Bytes(bytes) => out.extend_from_slice(bytes),
					ArrayValue::Values(items) => {
						for element in items {
							codec::encode_into(element, out);
						}
					}
				}
			}
		}
		Ok(())
	}

	/// Value bytes of this field alone.
	pub fn value_bytes(&self) -> Result<Vec<u8>> {
		let mut out = Vec::new();
		self.write_value(&mut out)?;
		Ok(out)
	}

	/// Decode this field's value from the front of `cursor`, returning an updated copy.
	pub fn read_value(&self, cursor: &mut Cursor<'_>) -> Result<Self> {
		match self {
			Self::Scalar(item) => Ok(Self::Scalar(ScalarField {
				value: Some(codec::decode_and_advance(item.ty, cursor)?),
				..item.clone()
			})),
			Self::Array(item) => {
				let count = cursor.read_i32_le()?;
				let count = usize::try_from(count).map_err(|_| VarError::NegativeLength { len: i64::from(count) })?;
				let width = item.elem_type.width().unwrap_or(1);
				let need = count.saturating_mul(width);
				if need > cursor.remaining() {
					return Err(VarError::UnexpectedEof {
						at: cursor.pos(),
						need,
						rem: cursor.remaining(),
					});
				}

				let value = if item.elem_type == DataType::UInt8 {
					ArrayValue::Bytes(cursor.read_exact(count)?.to_vec())
				} else {
					let mut items = Vec::with_capacity(count);
					for _ in 0..count {
						items.push(codec::decode_and_advance(item.elem_type, cursor)?);
					}
					ArrayValue::Values(items)
				};

				Ok(Self::Array(ArrayField {
					value: Some(value),
					..item.clone()
				}))
			}
		}
	}

	/// Value equality for change detection.
	pub fn same_value(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Scalar(left), Self::Scalar(right)) => match (&left.value, &right.value) {
				(Some(left), Some(right)) => left.same_as(right),
				(None, None) => true,
				_ => false,
			},
			(Self::Array(left), Self::Array(right)) => match (&left.value, &right.value) {
				(Some(left), Some(right)) => left.same_as(right),
				(None, None) => true,
				_ => false,
			},
			_ => false,
		}
	}
}

impl fmt::Display for Field {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Scalar(item) => {
				write!(f, "{} {}", item.ty, item.name)?;
				if let Some(value) = &item.value {
					write!(f, " = {value}")?;
				}
				Ok(())
			}
			Self::Array(item) => {
				write!(f, "{}[] {}", item.elem_type, item.name)?;
				match &item.value {
					Some(ArrayValue::Bytes(bytes)) => write!(f, " = {:?}", String::from_utf8_lossy(bytes)),
					Some(value @ ArrayValue::Values(_)) => {
						let parts: Vec<String> = value.iter().map(|element| element.to_string()).collect();
						write!(f, " = [{}]", parts.join(", "))
					}
					None => Ok(()),
				}
			}
		}
	}
}

/// Element count as written on the wire.
fn array_count(name: &str, len: usize) -> Result<i32> {
	i32::try_from(len).map_err(|_| VarError::ArrayTooLong { name: name.to_owned(), len })
}

fn check_array(elem_type: DataType, value: &ArrayValue, field: &str) -> Result<()> {
	if let ArrayValue::Bytes(_) = value {
		if elem_type == DataType::UInt8 {
			return Ok(());
		}
		return Err(VarError::ValueTypeMismatch {
			field: field.to_owned(),
			expected: elem_type.as_str(),
			got: DataType::UInt8.as_str(),
		});
	}
	for element in value.iter() {
		check_kind(elem_type, &element, field)?;
	}
	Ok(())
}

#[cfg(test)]
mod tests;
