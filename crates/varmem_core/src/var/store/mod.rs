//! Layout-aware reads and writes of one structure inside a shared region.
//!
//! Region layout (little-endian):
//!
//! ```text
//! 0   i64 content offset
//! 8   i64 schema length (0 when unknown)
//! 16  i32 id | name\0 | field declarations... | zero padding to 16
//! off i64 content length | packed field values...
//! ```

mod layout;

pub use layout::{CONTENT_ALIGN, CONTENT_HEADER_LEN, HEADER_LEN, MemoryLayout, align_up};

use crate::var::bytes::Cursor;
use crate::var::{Field, Payload, Result, SharedMemory, Structure, VarError};

/// One structure bound to one region.
#[derive(Debug)]
pub struct VarStore<M> {
	memory: M,
	structure: Structure,
	layout: MemoryLayout,
}

impl<M: SharedMemory> VarStore<M> {
	/// Lay `structure` out into `memory`: header, schema, and current field values.
	///
	/// Nothing is written when the layout does not fit.
	pub fn create(mut memory: M, structure: Structure) -> Result<Self> {
		let layout = MemoryLayout::for_structure(&structure);
		let mut bytes = layout.header_bytes(&structure);
		let content = structure.value_bytes()?;
		bytes.extend_from_slice(&(content.len() as i64).to_le_bytes());
		bytes.extend_from_slice(&content);
		ensure_fits(&memory, bytes.len())?;

		memory.write(0, &bytes)?;
		tracing::debug!(
			name = memory.name(),
			id = structure.id,
			content_offset = layout.content_offset,
			content_len = content.len(),
			"laid out structure"
		);

		Ok(Self { memory, structure, layout })
	}

	/// Bind `structure` to a region that already holds its layout.
	pub fn attach(memory: M, structure: Structure) -> Result<Self> {
		let layout = MemoryLayout::for_structure(&structure);
		let stored = read_content_offset(&memory)?;
		if stored != layout.content_offset as i64 {
			return Err(VarError::InvalidContentOffset {
				name: memory.name().to_owned(),
				offset: stored,
				capacity: memory.capacity() as u64,
			});
		}
		Ok(Self { memory, structure, layout })
	}

	/// Reconstruct the structure from the schema stored in `memory`.
	pub fn open_without_type(memory: M) -> Result<Self> {
		let offset = read_content_offset(&memory)?;
		let capacity = memory.capacity();
		let min = HEADER_LEN + Structure::MIN_SCHEMA_LEN;
		let content_offset = usize::try_from(offset)
			.ok()
			.filter(|value| *value >= min && value.saturating_add(CONTENT_HEADER_LEN) <= capacity)
			.ok_or_else(|| VarError::InvalidContentOffset {
				name: memory.name().to_owned(),
				offset,
				capacity: capacity as u64,
			})?;

		let header = memory.read(0, content_offset)?;
		let mut cursor = Cursor::new(&header);
		cursor.read_exact(8)?;
		let recorded = cursor.read_i64_le()?;
		let schema_region = cursor.rest();
		let schema = match usize::try_from(recorded) {
			Ok(len) if len > 0 && len <= schema_region.len() => &schema_region[..len],
			_ => layout::unpadded_schema(schema_region),
		};

		let structure = Structure::parse_schema(schema)?;
		let layout = MemoryLayout::for_structure(&structure);
		tracing::debug!(name = memory.name(), id = structure.id, fields = structure.fields.len(), "attached without type");

		Ok(Self {
			memory,
			structure,
			layout: MemoryLayout {
				content_offset,
				..layout
			},
		})
	}

	/// Structure schema bound to this region.
	pub fn structure(&self) -> &Structure {
		&self.structure
	}

	/// Region name.
	pub fn name(&self) -> &str {
		self.memory.name()
	}

	/// Byte offset of the content region.
	pub fn content_offset(&self) -> usize {
		self.layout.content_offset
	}

	/// Computed layout.
	pub fn layout(&self) -> MemoryLayout {
		self.layout
	}

	/// Underlying region.
	pub fn memory(&self) -> &M {
		&self.memory
	}

	/// Release the region.
	pub fn into_memory(self) -> M {
		self.memory
	}

	/// Decode the content region into a payload ordered like the structure.
	pub fn read(&self) -> Result<Payload> {
		let capacity = self.memory.capacity();
		let prefix = self.memory.read(self.layout.content_offset, CONTENT_HEADER_LEN)?;
		let content_len = i64::from_le_bytes(Cursor::new(&prefix).read_array()?);
		let len = usize::try_from(content_len)
			.ok()
			.filter(|len| self.layout.values_offset().saturating_add(*len) <= capacity)
			.ok_or_else(|| VarError::CapacityExceeded {
				name: self.name().to_owned(),
				need: (self.layout.values_offset() as u64).saturating_add(content_len.unsigned_abs()),
				capacity: capacity as u64,
			})?;

		let content = self.memory.read(self.layout.values_offset(), len)?;
		let fields = self.structure.read_values(&mut Cursor::new(&content))?;
		tracing::trace!(name = self.name(), content_len = len, "read content");
		Ok(Payload::from_fields(self.structure.id, fields))
	}

	/// Re-encode the whole content region from `fields`, which must match the structure shape.
	///
	/// Nothing is written when the content does not fit.
	pub fn write_fields(&mut self, fields: &[Field]) -> Result<()> {
		check_shape(&self.structure, fields)?;

		let mut bytes = vec![0_u8; CONTENT_HEADER_LEN];
		for field in fields {
			field.write_value(&mut bytes)?;
		}
		let content_len = (bytes.len() - CONTENT_HEADER_LEN) as i64;
		bytes[..CONTENT_HEADER_LEN].copy_from_slice(&content_len.to_le_bytes());

		ensure_fits(&self.memory, self.layout.content_offset + bytes.len())?;
		self.memory.write(self.layout.content_offset, &bytes)?;
		tracing::trace!(name = self.name(), content_len, "wrote content");
		Ok(())
	}

	/// Write every field value carried by `structure`.
	pub fn write(&mut self, structure: &Structure) -> Result<()> {
		self.write_fields(&structure.fields)
	}

	/// Merge `payload` over the values currently stored and re-encode the whole content region.
	///
	/// Fields missing from the payload keep their decoded on-buffer values.
	pub fn write_payload(&mut self, payload: &Payload) -> Result<()> {
		let current = self.read()?;
		let mut merged = Vec::with_capacity(self.structure.fields.len());
		for (index, field) in self.structure.fields.iter().enumerate() {
			let value = match payload.get(field.name()) {
				Some(update) if update.same_shape(field) => update,
				Some(update) => {
					return Err(VarError::FieldShapeMismatch {
						index,
						expected: field.to_string(),
						got: update.to_string(),
					});
				}
				None => current.get(field.name()).unwrap_or(field),
			};
			merged.push(value.clone());
		}

		if let Some(extra) = payload.iter().find(|item| self.structure.field(item.name()).is_none()) {
			return Err(VarError::FieldNotFound {
				name: extra.name().to_owned(),
			});
		}

		self.write_fields(&merged)
	}
}

fn read_content_offset<M: SharedMemory>(memory: &M) -> Result<i64> {
	let raw = memory.read(0, 8)?;
	Ok(i64::from_le_bytes(Cursor::new(&raw).read_array()?))
}

fn ensure_fits<M: SharedMemory>(memory: &M, need: usize) -> Result<()> {
	if need > memory.capacity() {
		return Err(VarError::CapacityExceeded {
			name: memory.name().to_owned(),
			need: need as u64,
			capacity: memory.capacity() as u64,
		});
	}
	Ok(())
}

fn check_shape(structure: &Structure, fields: &[Field]) -> Result<()> {
	for (index, expected) in structure.fields.iter().enumerate() {
		match fields.get(index) {
			Some(got) if got.same_shape(expected) => {}
			got => {
				return Err(VarError::FieldShapeMismatch {
					index,
					expected: expected.name().to_owned(),
					got: got.map(|item| item.name().to_owned()).unwrap_or_default(),
				});
			}
		}
	}
	if fields.len() > structure.fields.len() {
		let index = structure.fields.len();
		return Err(VarError::FieldShapeMismatch {
			index,
			expected: String::new(),
			got: fields[index].name().to_owned(),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests;
