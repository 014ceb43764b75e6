use std::fmt;

use crate::var::{Result, VarError};

/// Closed set of value kinds with their fixed wire tags.
///
/// Tags 5, 10, 11, 15 and 16 are reserved and never assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
	/// `bool`, 1 byte.
	Boolean,
	/// `i8`, 1 byte.
	Int8,
	/// `i16`, 2 bytes.
	Int16,
	/// `i32`, 4 bytes.
	Int32,
	/// `i64`, 8 bytes.
	Int64,
	/// `u8`, 1 byte.
	UInt8,
	/// `u16`, 2 bytes.
	UInt16,
	/// `u32`, 4 bytes.
	UInt32,
	/// `u64`, 8 bytes.
	UInt64,
	/// IEEE half precision, 2 bytes.
	Float16,
	/// `f32`, 4 bytes.
	Float32,
	/// `f64`, 8 bytes.
	Float64,
	/// Variable-length array of a scalar element type.
	Array,
}

impl DataType {
	/// Every known type, in tag order.
	pub const ALL: [DataType; 13] = [
		Self::Boolean,
		Self::Int8,
		Self::Int16,
		Self::Int32,
		Self::Int64,
		Self::UInt8,
		Self::UInt16,
		Self::UInt32,
		Self::UInt64,
		Self::Float16,
		Self::Float32,
		Self::Float64,
		Self::Array,
	];

	/// Wire tag written in schema bytes.
	pub fn tag(self) -> i32 {
		match self {
			Self::Boolean => 0,
			Self::Int8 => 1,
			Self::Int16 => 2,
			Self::Int32 => 3,
			Self::Int64 => 4,
			Self::UInt8 => 6,
			Self::UInt16 => 7,
			Self::UInt32 => 8,
			Self::UInt64 => 9,
			Self::Float16 => 12,
			Self::Float32 => 13,
			Self::Float64 => 14,
			Self::Array => 17,
		}
	}

	/// Resolve a wire tag, rejecting reserved and unknown tags.
	pub fn from_tag(tag: i32) -> Result<Self> {
		Self::ALL.into_iter().find(|item| item.tag() == tag).ok_or(VarError::UnsupportedType { tag })
	}

	/// Encoded width for scalar types, `None` for `Array`.
	pub fn width(self) -> Option<usize> {
		match self {
			Self::Boolean | Self::Int8 | Self::UInt8 => Some(1),
			Self::Int16 | Self::UInt16 | Self::Float16 => Some(2),
			Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
			Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
			Self::Array => None,
		}
	}

	/// True for every type except `Array`.
	pub fn is_scalar(self) -> bool {
		self != Self::Array
	}

	/// Fail with `Float16Unsupported` when this build cannot represent the type.
	pub fn ensure_supported(self) -> Result<Self> {
		if self == Self::Float16 && !cfg!(feature = "f16") {
			return Err(VarError::Float16Unsupported);
		}
		Ok(self)
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Boolean => "bool",
			Self::Int8 => "int8",
			Self::Int16 => "int16",
			Self::Int32 => "int32",
			Self::Int64 => "int64",
			Self::UInt8 => "uint8",
			Self::UInt16 => "uint16",
			Self::UInt32 => "uint32",
			Self::UInt64 => "uint64",
			Self::Float16 => "float16",
			Self::Float32 => "float32",
			Self::Float64 => "float64",
			Self::Array => "array",
		}
	}

	/// Parse a lowercase label produced by [`DataType::as_str`].
	pub fn from_label(label: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|item| item.as_str() == label)
	}
}

impl fmt::Display for DataType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
