use std::io::{self, Write};
use std::path::PathBuf;

use varmem::var::{ArrayValue, DataType, Field, FileMemory, MemoryProvider, RegionDir, Result, ScalarValue, Structure, VarError, VarStore};

/// Environment variable naming the default region directory.
pub(crate) const DIR_ENV: &str = "VARMEM_DIR";

/// Resolve the region directory from the flag, `$VARMEM_DIR`, or `<tmp>/varmem`.
pub(crate) fn region_dir(flag: Option<PathBuf>) -> Result<RegionDir> {
	let dir = flag
		.or_else(|| std::env::var_os(DIR_ENV).map(PathBuf::from))
		.unwrap_or_else(|| std::env::temp_dir().join("varmem"));
	RegionDir::new(dir)
}

/// Attach to a named region and reconstruct its structure.
pub(crate) fn open_store(dir: &RegionDir, name: &str) -> Result<VarStore<FileMemory>> {
	VarStore::open_without_type(dir.open(name)?)
}

/// Write one pretty-printed JSON document to stdout.
pub(crate) fn emit_json<T: serde::Serialize>(value: &T) -> Result<()> {
	let mut out = io::stdout().lock();
	serde_json::to_writer_pretty(&mut out, value).map_err(io::Error::from)?;
	writeln!(out)?;
	Ok(())
}

/// Write one compact JSON line to stdout and flush it.
pub(crate) fn emit_json_line<T: serde::Serialize>(value: &T) -> Result<()> {
	let mut out = io::stdout().lock();
	serde_json::to_writer(&mut out, value).map_err(io::Error::from)?;
	writeln!(out)?;
	out.flush()?;
	Ok(())
}

/// Parse `type:name` or `elem[]:name` into a field holding its default value.
pub(crate) fn parse_field_spec(spec: &str) -> Result<Field> {
	let invalid = || VarError::InvalidLiteral {
		kind: "field spec",
		value: spec.to_owned(),
	};
	let (label, name) = spec.split_once(':').ok_or_else(invalid)?;
	match label.strip_suffix("[]") {
		Some(elem) => Field::array(DataType::from_label(elem).ok_or_else(invalid)?, name),
		None => {
			let ty = DataType::from_label(label).filter(|ty| ty.is_scalar()).ok_or_else(invalid)?;
			Field::scalar(ty, name)
		}
	}
}

/// Parse `name=value` against `structure`.
///
/// `uint8` arrays take the text verbatim; other arrays take comma-separated elements.
pub(crate) fn parse_assignment(structure: &Structure, assignment: &str) -> Result<Field> {
	let (name, text) = assignment.split_once('=').ok_or_else(|| VarError::InvalidLiteral {
		kind: "assignment",
		value: assignment.to_owned(),
	})?;
	let field = structure.field(name).ok_or_else(|| VarError::FieldNotFound { name: name.to_owned() })?;

	match field {
		Field::Scalar(item) => field.with_scalar(ScalarValue::parse_literal(item.ty, text)?),
		Field::Array(item) if item.elem_type == DataType::UInt8 => field.with_array(ArrayValue::from(text)),
		Field::Array(item) => {
			let values = text
				.split(',')
				.map(str::trim)
				.filter(|part| !part.is_empty())
				.map(|part| ScalarValue::parse_literal(item.elem_type, part))
				.collect::<Result<Vec<_>>>()?;
			field.with_array(ArrayValue::Values(values))
		}
	}
}

/// JSON rendering of one scalar.
pub(crate) fn scalar_json(value: ScalarValue) -> serde_json::Value {
	match value {
		ScalarValue::Bool(v) => serde_json::json!(v),
		ScalarValue::I8(v) => serde_json::json!(v),
		ScalarValue::I16(v) => serde_json::json!(v),
		ScalarValue::I32(v) => serde_json::json!(v),
		ScalarValue::I64(v) => serde_json::json!(v),
		ScalarValue::U8(v) => serde_json::json!(v),
		ScalarValue::U16(v) => serde_json::json!(v),
		ScalarValue::U32(v) => serde_json::json!(v),
		ScalarValue::U64(v) => serde_json::json!(v),
		ScalarValue::F16(v) => serde_json::json!(v.to_f32()),
		ScalarValue::F32(v) => serde_json::json!(v),
		ScalarValue::F64(v) => serde_json::json!(v),
	}
}

/// JSON rendering of a field value: `uint8` arrays as text when valid UTF-8, `null` when absent.
pub(crate) fn field_value_json(field: &Field) -> serde_json::Value {
	match field {
		Field::Scalar(item) => item.value.map_or(serde_json::Value::Null, scalar_json),
		Field::Array(item) => match &item.value {
			None => serde_json::Value::Null,
			Some(ArrayValue::Bytes(bytes)) => match std::str::from_utf8(bytes) {
				Ok(text) => serde_json::json!(text),
				Err(_) => serde_json::json!(bytes),
			},
			Some(value) => serde_json::Value::Array(value.iter().map(scalar_json).collect()),
		},
	}
}

/// Type label of a field: `int32` or `int32[]`.
pub(crate) fn field_type_label(field: &Field) -> String {
	match field.elem_type() {
		Some(elem) => format!("{elem}[]"),
		None => field.data_type().to_string(),
	}
}

#[derive(serde::Serialize)]
pub(crate) struct FieldJson {
	pub name: String,
	#[serde(rename = "type")]
	pub type_label: String,
	pub value: serde_json::Value,
}

impl FieldJson {
	pub(crate) fn from_field(field: &Field) -> Self {
		Self {
			name: field.name().to_owned(),
			type_label: field_type_label(field),
			value: field_value_json(field),
		}
	}
}

#[derive(serde::Serialize)]
pub(crate) struct ValuesJson {
	pub name: String,
	pub id: i32,
	pub fields: Vec<FieldJson>,
}

impl ValuesJson {
	pub(crate) fn new(name: &str, structure: &Structure, fields: &[Field]) -> Self {
		Self {
			name: name.to_owned(),
			id: structure.id,
			fields: fields.iter().map(FieldJson::from_field).collect(),
		}
	}
}
