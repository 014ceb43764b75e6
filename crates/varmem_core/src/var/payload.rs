use crate::var::{Field, Structure};

/// Decoded field values of one structure instance, in structure field order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Payload {
	/// Id of the structure the values belong to.
	pub structure_id: i32,
	fields: Vec<Field>,
}

impl Payload {
	/// Empty payload for a structure id.
	pub fn new(structure_id: i32) -> Self {
		Self {
			structure_id,
			fields: Vec::new(),
		}
	}

	/// Payload carrying every current field value of `structure`.
	pub fn from_structure(structure: &Structure) -> Self {
		Self {
			structure_id: structure.id,
			fields: structure.fields.clone(),
		}
	}

	/// Payload from already-ordered fields.
	pub fn from_fields(structure_id: i32, fields: Vec<Field>) -> Self {
		let mut out = Self::new(structure_id);
		for field in fields {
			out.insert(field);
		}
		out
	}

	/// Insert a field, replacing any field with the same name in place.
	pub fn insert(&mut self, field: Field) {
		match self.fields.iter_mut().find(|item| item.name() == field.name()) {
			Some(slot) => *slot = field,
			None => self.fields.push(field),
		}
	}

	/// Look up a field by name.
	pub fn get(&self, name: &str) -> Option<&Field> {
		self.fields.iter().find(|field| field.name() == name)
	}

	/// True when a field with `name` is present.
	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// True when the payload carries no fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Iterate fields in insertion order.
	pub fn iter(&self) -> std::slice::Iter<'_, Field> {
		self.fields.iter()
	}

	/// Consume into the field list.
	pub fn into_fields(self) -> Vec<Field> {
		self.fields
	}
}

impl<'a> IntoIterator for &'a Payload {
	type Item = &'a Field;
	type IntoIter = std::slice::Iter<'a, Field>;

	fn into_iter(self) -> Self::IntoIter {
		self.fields.iter()
	}
}
