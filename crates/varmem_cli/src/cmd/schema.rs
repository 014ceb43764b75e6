use varmem::var::{RegionDir, Result};

use crate::cmd::util::{emit_json, field_type_label, open_store};

#[derive(clap::Args)]
pub struct Args {
	pub name: String,
	#[arg(long)]
	pub json: bool,
}

/// Print the structure reconstructed from a region's schema.
pub fn run(dir: &RegionDir, args: Args) -> Result<()> {
	let Args { name, json } = args;

	let store = open_store(dir, &name)?;
	let structure = store.structure();
	let layout = store.layout();

	if json {
		return emit_json(&SchemaJson {
			name,
			id: structure.id,
			structure: structure.name.clone(),
			schema_len: layout.schema_len,
			content_offset: layout.content_offset,
			fields: structure
				.fields
				.iter()
				.map(|field| SchemaFieldJson {
					name: field.name().to_owned(),
					type_label: field_type_label(field),
					tag: field.data_type().tag(),
				})
				.collect(),
		});
	}

	println!("region: {name}");
	println!("path: {}", store.memory().path().display());
	println!("schema_len: {}", layout.schema_len);
	println!("content_offset: {}", layout.content_offset);
	println!("{structure}");
	Ok(())
}

#[derive(serde::Serialize)]
struct SchemaJson {
	name: String,
	id: i32,
	structure: String,
	schema_len: usize,
	content_offset: usize,
	fields: Vec<SchemaFieldJson>,
}

#[derive(serde::Serialize)]
struct SchemaFieldJson {
	name: String,
	#[serde(rename = "type")]
	type_label: String,
	tag: i32,
}
