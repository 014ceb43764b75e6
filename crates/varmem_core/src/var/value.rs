use std::fmt;

use crate::var::{DataType, Result, VarError};

/// One decoded scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
	/// Boolean scalar.
	Bool(bool),
	/// 8-bit signed integer.
	I8(i8),
	/// 16-bit signed integer.
	I16(i16),
	/// 32-bit signed integer.
	I32(i32),
	/// 64-bit signed integer.
	I64(i64),
	/// 8-bit unsigned integer.
	U8(u8),
	/// 16-bit unsigned integer.
	U16(u16),
	/// 32-bit unsigned integer.
	U32(u32),
	/// 64-bit unsigned integer.
	U64(u64),
	/// Half-precision float.
	#[cfg(feature = "f16")]
	F16(half::f16),
	/// 32-bit float.
	F32(f32),
	/// 64-bit float.
	F64(f64),
}

impl ScalarValue {
	/// Zero value for a scalar type.
	pub fn default_for(ty: DataType) -> Result<Self> {
		Ok(match ty {
			DataType::Boolean => Self::Bool(false),
			DataType::Int8 => Self::I8(0),
			DataType::Int16 => Self::I16(0),
			DataType::Int32 => Self::I32(0),
			DataType::Int64 => Self::I64(0),
			DataType::UInt8 => Self::U8(0),
			DataType::UInt16 => Self::U16(0),
			DataType::UInt32 => Self::U32(0),
			DataType::UInt64 => Self::U64(0),
			#[cfg(feature = "f16")]
			DataType::Float16 => Self::F16(half::f16::ZERO),
			#[cfg(not(feature = "f16"))]
			DataType::Float16 => return Err(VarError::Float16Unsupported),
			DataType::Float32 => Self::F32(0.0),
			DataType::Float64 => Self::F64(0.0),
			DataType::Array => return Err(VarError::UnsupportedType { tag: DataType::Array.tag() }),
		})
	}

	/// Data type carried by this value.
	pub fn data_type(&self) -> DataType {
		match self {
			Self::Bool(_) => DataType::Boolean,
			Self::I8(_) => DataType::Int8,
			Self::I16(_) => DataType::Int16,
			Self::I32(_) => DataType::Int32,
			Self::I64(_) => DataType::Int64,
			Self::U8(_) => DataType::UInt8,
			Self::U16(_) => DataType::UInt16,
			Self::U32(_) => DataType::UInt32,
			Self::U64(_) => DataType::UInt64,
			#[cfg(feature = "f16")]
			Self::F16(_) => DataType::Float16,
			Self::F32(_) => DataType::Float32,
			Self::F64(_) => DataType::Float64,
		}
	}

	/// Equality used for change detection: floats compare by bit pattern, so `NaN` equals itself.
	pub fn same_as(&self, other: &Self) -> bool {
		match (self, other) {
			#[cfg(feature = "f16")]
			(Self::F16(left), Self::F16(right)) => left.to_bits() == right.to_bits(),
			(Self::F32(left), Self::F32(right)) => left.to_bits() == right.to_bits(),
			(Self::F64(left), Self::F64(right)) => left.to_bits() == right.to_bits(),
			_ => self == other,
		}
	}

	/// Parse a textual literal as a value of `ty`.
	pub fn parse_literal(ty: DataType, text: &str) -> Result<Self> {
		let invalid = || VarError::InvalidLiteral {
			kind: ty.as_str(),
			value: text.to_owned(),
		};
		let text = text.trim();
		Ok(match ty {
			DataType::Boolean => match text {
				"true" | "1" => Self::Bool(true),
				"false" | "0" => Self::Bool(false),
				_ => return Err(invalid()),
			},
			DataType::Int8 => Self::I8(text.parse().map_err(|_| invalid())?),
			DataType::Int16 => Self::I16(text.parse().map_err(|_| invalid())?),
			DataType::Int32 => Self::I32(text.parse().map_err(|_| invalid())?),
			DataType::Int64 => Self::I64(text.parse().map_err(|_| invalid())?),
			DataType::UInt8 => Self::U8(text.parse().map_err(|_| invalid())?),
			DataType::UInt16 => Self::U16(text.parse().map_err(|_| invalid())?),
			DataType::UInt32 => Self::U32(text.parse().map_err(|_| invalid())?),
			DataType::UInt64 => Self::U64(text.parse().map_err(|_| invalid())?),
			#[cfg(feature = "f16")]
			DataType::Float16 => Self::F16(half::f16::from_f32(text.parse().map_err(|_| invalid())?)),
			#[cfg(not(feature = "f16"))]
			DataType::Float16 => return Err(VarError::Float16Unsupported),
			DataType::Float32 => Self::F32(text.parse().map_err(|_| invalid())?),
			DataType::Float64 => Self::F64(text.parse().map_err(|_| invalid())?),
			DataType::Array => return Err(invalid()),
		})
	}
}

impl fmt::Display for ScalarValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(value) => write!(f, "{value}"),
			Self::I8(value) => write!(f, "{value}"),
			Self::I16(value) => write!(f, "{value}"),
			Self::I32(value) => write!(f, "{value}"),
			Self::I64(value) => write!(f, "{value}"),
			Self::U8(value) => write!(f, "{value}"),
			Self::U16(value) => write!(f, "{value}"),
			Self::U32(value) => write!(f, "{value}"),
			Self::U64(value) => write!(f, "{value}"),
			#[cfg(feature = "f16")]
			Self::F16(value) => write!(f, "{value}"),
			Self::F32(value) => write!(f, "{value}"),
			Self::F64(value) => write!(f, "{value}"),
		}
	}
}

/// Decoded array contents.
///
/// `uint8` arrays keep their raw bytes; every other element type holds scalar values.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
	/// Raw `uint8` contents, also used for strings.
	Bytes(Vec<u8>),
	/// Elements of a non-`uint8` element type.
	Values(Vec<ScalarValue>),
}

impl ArrayValue {
	/// Zero-length array for an element type.
	pub fn empty(elem_type: DataType) -> Self {
		if elem_type == DataType::UInt8 {
			Self::Bytes(Vec::new())
		} else {
			Self::Values(Vec::new())
		}
	}

	/// Number of elements.
	pub fn len(&self) -> usize {
		match self {
			Self::Bytes(items) => items.len(),
			Self::Values(items) => items.len(),
		}
	}

	/// True when the array has no elements.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Iterate elements as scalar values.
	pub fn iter(&self) -> impl Iterator<Item = ScalarValue> + '_ {
		let (bytes, values): (&[u8], &[ScalarValue]) = match self {
			Self::Bytes(items) => (items.as_slice(), Default::default()),
			Self::Values(items) => (Default::default(), items.as_slice()),
		};
		bytes.iter().map(|byte| ScalarValue::U8(*byte)).chain(values.iter().copied())
	}

	/// Elementwise comparison: different lengths or any differing position means changed.
	pub fn same_as(&self, other: &Self) -> bool {
		if let (Self::Bytes(left), Self::Bytes(right)) = (self, other) {
			return left == right;
		}
		self.len() == other.len() && self.iter().zip(other.iter()).all(|(left, right)| left.same_as(&right))
	}

	/// Lossy UTF-8 view of byte contents.
	pub fn as_text(&self) -> Option<String> {
		match self {
			Self::Bytes(items) => Some(String::from_utf8_lossy(items).into_owned()),
			Self::Values(_) => None,
		}
	}
}

impl From<&str> for ArrayValue {
	fn from(value: &str) -> Self {
		Self::Bytes(value.as_bytes().to_vec())
	}
}

impl From<Vec<u8>> for ArrayValue {
	fn from(value: Vec<u8>) -> Self {
		Self::Bytes(value)
	}
}
