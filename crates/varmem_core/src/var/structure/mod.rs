use std::fmt;

use crate::var::bytes::{Cursor, put_cstring};
use crate::var::{DataType, Field, Result, VarError};

/// Id written in place of a wire id for locally built structures.
pub const LOCAL_STRUCTURE_ID: i32 = -1;

/// Command id that marks a registration message.
pub const REGISTER_COMMAND_ID: i32 = 0;

/// Named, ordered schema of typed fields identified by an integer id.
///
/// Field order fixes both schema-byte order and value-byte order.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
	/// Structure id, or [`LOCAL_STRUCTURE_ID`].
	pub id: i32,
	/// Structure name.
	pub name: String,
	/// Fields in declaration order.
	pub fields: Vec<Field>,
}

impl Structure {
	/// Minimum schema length: id, empty name, and one field type tag.
	pub const MIN_SCHEMA_LEN: usize = 9;
	/// Shortest field declaration: type tag plus an empty NUL-terminated name.
	pub const MIN_FIELD_DECL_LEN: usize = 5;

	/// Structure with an explicit id.
	pub fn new(id: i32, name: impl Into<String>, fields: Vec<Field>) -> Self {
		Self {
			id,
			name: name.into(),
			fields,
		}
	}

	/// Structure not tied to an incoming wire id.
	pub fn local(name: impl Into<String>, fields: Vec<Field>) -> Self {
		Self::new(LOCAL_STRUCTURE_ID, name, fields)
	}

	/// Parse schema bytes: `i32` id, NUL-terminated name, then field declarations.
	///
	/// Field parsing stops once fewer than 5 bytes remain.
	pub fn parse_schema(bytes: &[u8]) -> Result<Self> {
		if bytes.len() < Self::MIN_SCHEMA_LEN {
			return Err(VarError::SchemaTooShort {
				len: bytes.len(),
				min: Self::MIN_SCHEMA_LEN,
			});
		}

		let mut cursor = Cursor::new(bytes);
		let id = cursor.read_i32_le()?;
		let name = cursor.read_cstring();

		let mut fields = Vec::new();
		while cursor.remaining() >= Self::MIN_FIELD_DECL_LEN {
			let ty = DataType::from_tag(cursor.read_i32_le()?)?;
			let elem_type = if ty == DataType::Array {
				Some(DataType::from_tag(cursor.read_i32_le()?)?)
			} else {
				None
			};
			let field_name = cursor.read_cstring();

			fields.push(match elem_type {
				Some(elem_type) => Field::array(elem_type, field_name)?,
				None => Field::scalar(ty, field_name)?,
			});
		}

		Ok(Self { id, name, fields })
	}

	/// Append schema bytes for the whole structure.
	pub fn write_schema(&self, out: &mut Vec<u8>) {
		out.extend_from_slice(&self.id.to_le_bytes());
		put_cstring(out, &self.name);
		for field in &self.fields {
			field.write_schema(out);
		}
	}

	/// Schema bytes for the whole structure.
	pub fn schema_bytes(&self) -> Vec<u8> {
		let mut out = Vec::new();
		self.write_schema(&mut out);
		out
	}

	/// Registration message: command id 0 followed by the schema bytes.
	pub fn register_command(&self) -> Vec<u8> {
		let mut out = REGISTER_COMMAND_ID.to_le_bytes().to_vec();
		self.write_schema(&mut out);
		out
	}

	/// Packed value bytes of every field, in field order.
	pub fn value_bytes(&self) -> Result<Vec<u8>> {
		let mut out = Vec::new();
		for field in &self.fields {
			field.write_value(&mut out)?;
		}
		Ok(out)
	}

	/// Update message: structure id followed by packed value bytes.
	pub fn update_command(&self) -> Result<Vec<u8>> {
		if self.id == REGISTER_COMMAND_ID {
			return Err(VarError::ReservedStructureId);
		}
		let mut out = self.id.to_le_bytes().to_vec();
		out.extend(self.value_bytes()?);
		Ok(out)
	}

	/// Decode every field in order from `cursor`, returning the updated fields.
	pub fn read_values(&self, cursor: &mut Cursor<'_>) -> Result<Vec<Field>> {
		self.fields.iter().map(|field| field.read_value(cursor)).collect()
	}

	/// Look up a field by name.
	pub fn field(&self, name: &str) -> Option<&Field> {
		self.fields.iter().find(|field| field.name() == name)
	}

	/// Position of a field by name.
	pub fn field_index(&self, name: &str) -> Option<usize> {
		self.fields.iter().position(|field| field.name() == name)
	}

	/// Same field count, order, names, and types.
	pub fn same_shape(&self, other: &Self) -> bool {
		self.fields.len() == other.fields.len() && self.fields.iter().zip(&other.fields).all(|(left, right)| left.same_shape(right))
	}
}

impl fmt::Display for Structure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} (id={})", self.name, self.id)?;
		for (idx, field) in self.fields.iter().enumerate() {
			write!(f, "\n\t[{idx:02}]: {field}")?;
		}
		Ok(())
	}
}
