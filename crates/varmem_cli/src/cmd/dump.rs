use varmem::var::{RegionDir, Result};

use crate::cmd::util::{ValuesJson, emit_json, open_store};

#[derive(clap::Args)]
pub struct Args {
	pub name: String,
}

/// Print the current values of a region as JSON.
pub fn run(dir: &RegionDir, args: Args) -> Result<()> {
	let store = open_store(dir, &args.name)?;
	let payload = store.read()?;
	emit_json(&ValuesJson::new(&args.name, store.structure(), &payload.into_fields()))
}
