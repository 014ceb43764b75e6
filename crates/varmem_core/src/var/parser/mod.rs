use std::collections::HashMap;

use crate::var::bytes::Cursor;
use crate::var::structure::REGISTER_COMMAND_ID;
use crate::var::{Payload, Result, Structure, VarError};

/// Outcome of handling one command message.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
	/// A structure was registered under its declared id.
	Registered(Structure),
	/// Values for a known structure; fields carry the decoded values.
	Update(Structure),
	/// Update for an id that has not been registered.
	UnknownId(i32),
}

impl Command {
	/// Structure id the command refers to.
	pub fn structure_id(&self) -> i32 {
		match self {
			Self::Registered(structure) | Self::Update(structure) => structure.id,
			Self::UnknownId(id) => *id,
		}
	}

	/// Decoded values of an update command.
	pub fn payload(&self) -> Option<Payload> {
		match self {
			Self::Update(structure) => Some(Payload::from_structure(structure)),
			_ => None,
		}
	}
}

/// Decodes command messages and owns the id -> structure registry.
#[derive(Debug, Default)]
pub struct CommandParser {
	registry: HashMap<i32, Structure>,
}

impl CommandParser {
	/// Parser with an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Handle one message: id 0 registers a schema, any other id updates values.
	///
	/// Errors leave the registry unchanged.
	pub fn handle(&mut self, message: &[u8]) -> Result<Command> {
		if message.len() < 4 {
			return Err(VarError::MessageTooShort { len: message.len() });
		}

		let mut cursor = Cursor::new(message);
		let id = cursor.read_i32_le()?;

		if id == REGISTER_COMMAND_ID {
			let structure = Structure::parse_schema(cursor.rest())?;
			self.register(structure.clone())?;
			return Ok(Command::Registered(structure));
		}

		let Some(structure) = self.registry.get(&id) else {
			tracing::warn!(id, "update for unregistered structure id");
			return Ok(Command::UnknownId(id));
		};

		let fields = structure.read_values(&mut cursor)?;
		if cursor.remaining() > 0 {
			tracing::trace!(id, leftover = cursor.remaining(), "update carried trailing bytes");
		}

		Ok(Command::Update(Structure {
			fields,
			..structure.clone()
		}))
	}

	/// Insert a structure under its own id.
	///
	/// Re-registering an identical shape is accepted; a different shape under a known id is not.
	pub fn register(&mut self, structure: Structure) -> Result<()> {
		if structure.id == REGISTER_COMMAND_ID {
			return Err(VarError::ReservedStructureId);
		}
		if let Some(known) = self.registry.get(&structure.id) {
			if known.name == structure.name && known.same_shape(&structure) {
				return Ok(());
			}
			return Err(VarError::DuplicateStructureId { id: structure.id });
		}

		tracing::debug!(id = structure.id, name = %structure.name, fields = structure.fields.len(), "registered structure");
		self.registry.insert(structure.id, structure);
		Ok(())
	}

	/// Look up a registered structure.
	pub fn get(&self, id: i32) -> Option<&Structure> {
		self.registry.get(&id)
	}

	/// Number of registered structures.
	pub fn len(&self) -> usize {
		self.registry.len()
	}

	/// True when nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.registry.is_empty()
	}

	/// Iterate registered structures in unspecified order.
	pub fn structures(&self) -> impl Iterator<Item = &Structure> {
		self.registry.values()
	}

	/// Drop every registration.
	pub fn clear(&mut self) {
		self.registry.clear();
	}
}
