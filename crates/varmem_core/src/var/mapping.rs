//! Rust type to wire type mapping for declaring structures from native values.

use crate::var::{ArrayField, ArrayValue, DataType, Field, ScalarField, ScalarValue};

/// Rust type usable as a structure field.
pub trait VarType: Sized {
	/// Declared wire type; `Array` for sequence types.
	const DATA_TYPE: DataType;

	/// Field named `name` holding `self`.
	fn into_field(self, name: impl Into<String>) -> Field;

	/// Value of a field with the matching shape.
	fn from_field(field: &Field) -> Option<Self>;
}

/// Rust type that maps to one scalar wire type; valid as an array element.
pub trait ScalarType: VarType + Copy {
	/// Wrap as a scalar value.
	fn into_scalar(self) -> ScalarValue;

	/// Unwrap a scalar value of the matching type.
	fn from_scalar(value: ScalarValue) -> Option<Self>;
}

/// Field named `name` holding the default value of `T`.
pub fn field_for<T: VarType + Default>(name: impl Into<String>) -> Field {
	T::default().into_field(name)
}

macro_rules! scalar_type {
	($ty:ty, $data_type:ident, $variant:ident) => {
		impl VarType for $ty {
			const DATA_TYPE: DataType = DataType::$data_type;

			fn into_field(self, name: impl Into<String>) -> Field {
				Field::Scalar(ScalarField {
					ty: Self::DATA_TYPE,
					name: name.into(),
					value: Some(self.into_scalar()),
				})
			}

			fn from_field(field: &Field) -> Option<Self> {
				match field {
					Field::Scalar(ScalarField { value: Some(value), .. }) => Self::from_scalar(*value),
					_ => None,
				}
			}
		}

		impl ScalarType for $ty {
			fn into_scalar(self) -> ScalarValue {
				ScalarValue::$variant(self)
			}

			fn from_scalar(value: ScalarValue) -> Option<Self> {
				match value {
					ScalarValue::$variant(item) => Some(item),
					_ => None,
				}
			}
		}
	};
}

scalar_type!(bool, Boolean, Bool);
scalar_type!(i8, Int8, I8);
scalar_type!(i16, Int16, I16);
scalar_type!(i32, Int32, I32);
scalar_type!(i64, Int64, I64);
scalar_type!(u8, UInt8, U8);
scalar_type!(u16, UInt16, U16);
scalar_type!(u32, UInt32, U32);
scalar_type!(u64, UInt64, U64);
#[cfg(feature = "f16")]
scalar_type!(half::f16, Float16, F16);
scalar_type!(f32, Float32, F32);
scalar_type!(f64, Float64, F64);

impl VarType for String {
	const DATA_TYPE: DataType = DataType::Array;

	fn into_field(self, name: impl Into<String>) -> Field {
		Field::text(name, &self)
	}

	fn from_field(field: &Field) -> Option<Self> {
		match field {
			Field::Array(ArrayField {
				elem_type: DataType::UInt8,
				value: Some(value),
				..
			}) => value.as_text(),
			_ => None,
		}
	}
}

impl<T: ScalarType> VarType for Vec<T> {
	const DATA_TYPE: DataType = DataType::Array;

	fn into_field(self, name: impl Into<String>) -> Field {
		let value = if T::DATA_TYPE == DataType::UInt8 {
			ArrayValue::Bytes(
				self.into_iter()
					.filter_map(|item| match item.into_scalar() {
						ScalarValue::U8(byte) => Some(byte),
						_ => None,
					})
					.collect(),
			)
		} else {
			ArrayValue::Values(self.into_iter().map(ScalarType::into_scalar).collect())
		};
		Field::Array(ArrayField {
			elem_type: T::DATA_TYPE,
			name: name.into(),
			value: Some(value),
		})
	}

	fn from_field(field: &Field) -> Option<Self> {
		match field {
			Field::Array(ArrayField {
				elem_type,
				value: Some(value),
				..
			}) if *elem_type == T::DATA_TYPE => value.iter().map(T::from_scalar).collect(),
			_ => None,
		}
	}
}
