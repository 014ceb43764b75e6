use crate::var::bytes::Cursor;
use crate::var::{DataType, Structure};

/// Bytes before the schema: content offset plus the schema-length slot.
pub const HEADER_LEN: usize = 16;
/// Alignment of the content region.
pub const CONTENT_ALIGN: usize = 16;
/// Size of the `i64` content-length prefix.
pub const CONTENT_HEADER_LEN: usize = 8;

/// Derived placement of one structure inside a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLayout {
	/// Length of the schema bytes (id, name, field declarations).
	pub schema_len: usize,
	/// Offset of the content region; always a multiple of [`CONTENT_ALIGN`].
	pub content_offset: usize,
}

impl MemoryLayout {
	/// Layout for `structure`.
	pub fn for_structure(structure: &Structure) -> Self {
		let schema_len = structure.schema_bytes().len();
		Self {
			schema_len,
			content_offset: align_up(HEADER_LEN + schema_len, CONTENT_ALIGN),
		}
	}

	/// Header region bytes: offsets, schema, zero padding up to `content_offset`.
	pub fn header_bytes(&self, structure: &Structure) -> Vec<u8> {
		let mut out = Vec::with_capacity(self.content_offset);
		out.extend_from_slice(&(self.content_offset as i64).to_le_bytes());
		out.extend_from_slice(&(self.schema_len as i64).to_le_bytes());
		structure.write_schema(&mut out);
		out.resize(self.content_offset, 0);
		out
	}

	/// First byte after the content-length prefix.
	pub fn values_offset(&self) -> usize {
		self.content_offset + CONTENT_HEADER_LEN
	}
}

/// Round `value` up to a multiple of `align`.
pub fn align_up(value: usize, align: usize) -> usize {
	value.div_ceil(align) * align
}

/// Schema bytes at the front of a zero-padded region whose exact length was not recorded.
///
/// Declarations are walked from the start until only zero bytes remain. A trailing `bool` field
/// with an empty name is all zeros and cannot be told apart from padding.
pub(crate) fn unpadded_schema(region: &[u8]) -> &[u8] {
	let mut cursor = Cursor::new(region);
	if cursor.read_i32_le().is_ok() {
		cursor.read_cstring_bytes();
		while cursor.remaining() >= Structure::MIN_FIELD_DECL_LEN && cursor.rest().iter().any(|byte| *byte != 0) {
			let Ok(tag) = cursor.read_i32_le() else {
				break;
			};
			if tag == DataType::Array.tag() && cursor.read_i32_le().is_err() {
				break;
			}
			cursor.read_cstring_bytes();
		}
	}
	let len = cursor.pos().max(Structure::MIN_SCHEMA_LEN);
	&region[..len.min(region.len())]
}
