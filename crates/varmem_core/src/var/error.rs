use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, VarError>;

/// Errors produced while parsing commands, laying out stores, and reading or writing values.
#[derive(Debug, Error)]
pub enum VarError {
	/// Filesystem or mapping IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Command message was shorter than the 4-byte id prefix.
	#[error("not a variable command: message length {len} < 4")]
	MessageTooShort {
		/// Received message length.
		len: usize,
	},
	/// Registration payload was shorter than the minimum schema.
	#[error("schema bytes too short: length {len} < {min}")]
	SchemaTooShort {
		/// Received schema length.
		len: usize,
		/// Minimum accepted length.
		min: usize,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Type tag outside the known tag table.
	#[error("unsupported data type tag {tag}")]
	UnsupportedType {
		/// Offending wire tag.
		tag: i32,
	},
	/// Array field declared with an array element type.
	#[error("nested array is not supported (field {name:?})")]
	NestedArray {
		/// Field name.
		name: String,
	},
	/// Half-precision field while the `f16` feature is disabled.
	#[error("float16 is not supported in this build")]
	Float16Unsupported,
	/// Array element count was negative.
	#[error("negative array length {len}")]
	NegativeLength {
		/// Parsed signed length.
		len: i64,
	},
	/// Array has more elements than an `i32` count can describe.
	#[error("array field {name:?} has {len} elements, more than an i32 count allows")]
	ArrayTooLong {
		/// Field name.
		name: String,
		/// Element count.
		len: usize,
	},
	/// Layout or content does not fit the region.
	#[error("capacity exceeded on {name:?}: need {need} bytes, capacity {capacity}")]
	CapacityExceeded {
		/// Region name.
		name: String,
		/// Required bytes, counted from offset 0.
		need: u64,
		/// Region capacity.
		capacity: u64,
	},
	/// Stored content offset cannot describe a valid layout.
	#[error("invalid content offset {offset} in {name:?} (capacity {capacity})")]
	InvalidContentOffset {
		/// Region name.
		name: String,
		/// Offset read from the region header.
		offset: i64,
		/// Region capacity.
		capacity: u64,
	},
	/// Structure id 0 is reserved for registration commands.
	#[error("structure id 0 is reserved for registration")]
	ReservedStructureId,
	/// A structure with the same id is already registered.
	#[error("structure id {id} is already registered")]
	DuplicateStructureId {
		/// Duplicate id.
		id: i32,
	},
	/// Value kind does not match the declared field type.
	#[error("value type mismatch on field {field:?}: expected {expected}, got {got}")]
	ValueTypeMismatch {
		/// Field name.
		field: String,
		/// Declared type label.
		expected: &'static str,
		/// Supplied value type label.
		got: &'static str,
	},
	/// Field name not present in the structure.
	#[error("field not found: {name:?}")]
	FieldNotFound {
		/// Requested field name.
		name: String,
	},
	/// Supplied field list does not match the structure shape.
	#[error("field shape mismatch at index {index}: expected {expected:?}, got {got:?}")]
	FieldShapeMismatch {
		/// Field position.
		index: usize,
		/// Expected field name.
		expected: String,
		/// Supplied field name.
		got: String,
	},
	/// A value literal could not be parsed for the field type.
	#[error("invalid {kind} literal: {value:?}")]
	InvalidLiteral {
		/// Target type label.
		kind: &'static str,
		/// User-provided text.
		value: String,
	},
	/// No region is registered under the name.
	#[error("region not found: {name:?}")]
	RegionNotFound {
		/// Requested region name.
		name: String,
	},
	/// A region with the name is already being watched.
	#[error("region already exists: {name:?}")]
	RegionExists {
		/// Duplicate region name.
		name: String,
	},
	/// Region name is not usable as a directory entry.
	#[error("invalid region name: {name:?}")]
	InvalidName {
		/// Offending name.
		name: String,
	},
}
