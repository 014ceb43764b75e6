mod bytes;
mod codec;
mod data_type;
mod error;
mod field;
mod mapping;
mod memory;
mod parser;
mod payload;
mod store;
mod structure;
mod value;
mod watch;

/// Bounded little-endian reader over a byte slice.
pub use bytes::Cursor;
/// Scalar value encode and decode entry points.
pub use codec::{decode, decode_and_advance, encode, encode_into};
/// Wire type tags.
pub use data_type::DataType;
/// Error and result aliases.
pub use error::{Result, VarError};
/// Structure field representation.
pub use field::{ArrayField, Field, ScalarField};
/// Native Rust type mapping for field declarations.
pub use mapping::{ScalarType, VarType, field_for};
/// Shared memory regions and region providers.
pub use memory::{FileMemory, HeapMemory, HeapRegistry, MemoryProvider, REGION_EXTENSION, RegionDir, SharedMemory, region_path};
/// Incoming message decoding and structure registry.
pub use parser::{Command, CommandParser};
/// Decoded structure values.
pub use payload::Payload;
/// Layout-aware region store.
pub use store::{CONTENT_ALIGN, CONTENT_HEADER_LEN, HEADER_LEN, MemoryLayout, VarStore, align_up};
/// Self-describing structure schema.
pub use structure::{LOCAL_STRUCTURE_ID, REGISTER_COMMAND_ID, Structure};
/// Decoded runtime value types.
pub use value::{ArrayValue, ScalarValue};
/// Change detection and background reading.
pub use watch::{AutoReader, ChangeSet, NameDirectory, NameWatcher, ReaderHandle, ReaderOptions, StructureWatcher, WatchEvent};
