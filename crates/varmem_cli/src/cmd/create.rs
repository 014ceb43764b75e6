use varmem::var::{LOCAL_STRUCTURE_ID, MemoryProvider, NameDirectory, RegionDir, Result, Structure, VarStore};

use crate::cmd::util::{ValuesJson, emit_json, parse_field_spec};

#[derive(clap::Args)]
pub struct Args {
	pub name: String,
	/// Field declaration `type:name` or `elem[]:name`, in order.
	#[arg(long = "field", required = true)]
	pub fields: Vec<String>,
	#[arg(long, default_value_t = LOCAL_STRUCTURE_ID, allow_negative_numbers = true)]
	pub id: i32,
	#[arg(long, default_value_t = 0x1000)]
	pub capacity: usize,
}

/// Lay out a new region holding default values for the declared fields.
pub fn run(dir: &RegionDir, args: Args) -> Result<()> {
	let Args { name, fields, id, capacity } = args;

	let fields = fields.iter().map(|spec| parse_field_spec(spec)).collect::<Result<Vec<_>>>()?;
	let structure = Structure::new(id, name.clone(), fields);
	let store = VarStore::create(dir.create(&name, capacity)?, structure)?;
	dir.add_name(&name)?;
	store.memory().flush()?;

	let payload = store.read()?;
	emit_json(&ValuesJson::new(&name, store.structure(), &payload.into_fields()))
}
