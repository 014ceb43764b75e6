use varmem::var::{Payload, RegionDir, Result};

use crate::cmd::util::{ValuesJson, emit_json, open_store, parse_assignment};

#[derive(clap::Args)]
pub struct Args {
	pub name: String,
	/// Assignments `field=value`; arrays take comma-separated elements.
	#[arg(required = true)]
	pub assignments: Vec<String>,
}

/// Merge-write parsed field values into a region and print the result.
pub fn run(dir: &RegionDir, args: Args) -> Result<()> {
	let Args { name, assignments } = args;

	let mut store = open_store(dir, &name)?;
	let mut payload = Payload::new(store.structure().id);
	for assignment in &assignments {
		payload.insert(parse_assignment(store.structure(), assignment)?);
	}
	store.write_payload(&payload)?;
	store.memory().flush()?;
	tracing::info!(name = %name, fields = payload.len(), "updated region");

	let current = store.read()?;
	emit_json(&ValuesJson::new(&name, store.structure(), &current.into_fields()))
}
