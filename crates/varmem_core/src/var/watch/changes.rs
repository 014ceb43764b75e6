use std::collections::HashMap;

use crate::var::{Field, Payload, Result, SharedMemory, Structure, VarStore};

/// Fields whose values changed since the previous check.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
	/// Name of the region the values came from.
	pub source: String,
	/// Structure of the region.
	pub structure: Structure,
	/// Every value that was checked.
	pub raw: Payload,
	/// Changed fields with their new values, in payload order.
	pub changed: Vec<Field>,
}

impl ChangeSet {
	/// True when nothing changed.
	pub fn is_empty(&self) -> bool {
		self.changed.is_empty()
	}

	/// Number of changed fields.
	pub fn len(&self) -> usize {
		self.changed.len()
	}

	/// Changed field by name.
	pub fn get(&self, name: &str) -> Option<&Field> {
		self.changed.iter().find(|field| field.name() == name)
	}

	/// Names of changed fields.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.changed.iter().map(Field::name)
	}
}

/// Tracks the last seen value of every field of one store.
#[derive(Debug)]
pub struct StructureWatcher<M> {
	store: VarStore<M>,
	current: HashMap<String, Field>,
}

impl<M: SharedMemory> StructureWatcher<M> {
	/// Watch `store`; every field starts out with no known value.
	pub fn new(store: VarStore<M>) -> Self {
		let current = store
			.structure()
			.fields
			.iter()
			.map(|field| (field.name().to_owned(), field.cleared()))
			.collect();
		Self { store, current }
	}

	/// Attach to a region without knowing its structure.
	pub fn open(memory: M) -> Result<Self> {
		Ok(Self::new(VarStore::open_without_type(memory)?))
	}

	/// Region name.
	pub fn source_name(&self) -> &str {
		self.store.name()
	}

	/// Watched structure.
	pub fn structure(&self) -> &Structure {
		self.store.structure()
	}

	/// Last seen value of a field; empty until first observed.
	pub fn current(&self, name: &str) -> Option<&Field> {
		self.current.get(name)
	}

	/// Underlying store.
	pub fn store(&self) -> &VarStore<M> {
		&self.store
	}

	/// Underlying store, for writes.
	pub fn store_mut(&mut self) -> &mut VarStore<M> {
		&mut self.store
	}

	/// Read the store and diff it against the last seen values.
	pub fn check_for_changes(&mut self) -> Result<ChangeSet> {
		let payload = self.store.read()?;
		Ok(self.check_payload(payload))
	}

	/// Diff an externally supplied payload against the last seen values.
	pub fn check_payload(&mut self, payload: Payload) -> ChangeSet {
		let mut changed = Vec::new();

		for field in &payload {
			let Some(last) = self.current.get_mut(field.name()) else {
				tracing::trace!(source = self.store.name(), field = field.name(), "ignoring field outside structure");
				continue;
			};

			let differs = last.is_empty() || !last.same_value(field);
			let update = match field {
				Field::Scalar(_) => differs,
				Field::Array(_) => differs && !field.is_empty(),
			};
			if !update {
				continue;
			}
			if !field.is_empty() {
				changed.push(field.clone());
			}
			*last = field.clone();
		}

		tracing::trace!(source = self.store.name(), changed = changed.len(), "checked for changes");
		ChangeSet {
			source: self.store.name().to_owned(),
			structure: self.store.structure().clone(),
			raw: payload,
			changed,
		}
	}
}
