use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use varmem::var::{AutoReader, ReaderOptions, RegionDir, Result, WatchEvent};

use crate::cmd::util::{FieldJson, emit_json_line, field_type_label};

#[derive(clap::Args)]
pub struct Args {
	#[arg(long = "interval-ms", default_value_t = 10)]
	pub interval_ms: u64,
	/// Capacity of regions created by this reader.
	#[arg(long, default_value_t = 0x1000)]
	pub capacity: usize,
	/// Stop after this many polls instead of running until killed.
	#[arg(long)]
	pub ticks: Option<usize>,
}

/// Stream region discovery and value changes as JSON lines.
pub fn run(dir: RegionDir, args: Args) -> Result<()> {
	let Args { interval_ms, capacity, ticks } = args;
	let options = ReaderOptions {
		interval: Duration::from_millis(interval_ms),
		capacity,
	};
	let mut reader = AutoReader::new(dir.clone(), dir, options.clone());

	let Some(ticks) = ticks else {
		let stop = AtomicBool::new(false);
		let mut failed = None;
		reader.run(&stop, |event| {
			if let Err(err) = emit_event(&event) {
				failed = Some(err);
				stop.store(true, Ordering::Release);
			}
		})?;
		return failed.map_or(Ok(()), Err);
	};

	for tick in 0..ticks {
		for event in reader.tick()? {
			emit_event(&event)?;
		}
		if tick + 1 < ticks {
			std::thread::sleep(options.interval);
		}
	}
	Ok(())
}

fn emit_event(event: &WatchEvent) -> Result<()> {
	match event {
		WatchEvent::NameAdded { name, structure } => emit_json_line(&EventJson::NameAdded {
			name: name.clone(),
			id: structure.id,
			fields: structure
				.fields
				.iter()
				.map(|field| format!("{} {}", field_type_label(field), field.name()))
				.collect(),
		}),
		WatchEvent::ValueChanged(changes) => emit_json_line(&EventJson::Changed {
			name: changes.source.clone(),
			fields: changes.changed.iter().map(FieldJson::from_field).collect(),
		}),
	}
}

#[derive(serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum EventJson {
	NameAdded { name: String, id: i32, fields: Vec<String> },
	Changed { name: String, fields: Vec<FieldJson> },
}
