#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "varmem", about = "Shared-memory variable structure tools")]
struct Cli {
	/// Directory holding region files (default: $VARMEM_DIR or <tmp>/varmem).
	#[arg(long, global = true)]
	dir: Option<PathBuf>,
	/// Increase log verbosity on stderr.
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Schema(cmd::schema::Args),
	Dump(cmd::dump::Args),
	Create(cmd::create::Args),
	Set(cmd::set::Args),
	Watch(cmd::watch::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> varmem::var::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	let dir = cmd::util::region_dir(cli.dir)?;
	match cli.command {
		Commands::Schema(args) => cmd::schema::run(&dir, args),
		Commands::Dump(args) => cmd::dump::run(&dir, args),
		Commands::Create(args) => cmd::create::run(&dir, args),
		Commands::Set(args) => cmd::set::run(&dir, args),
		Commands::Watch(args) => cmd::watch::run(dir, args),
	}
}

fn init_tracing(verbose: u8) {
	let filter = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
		.with_writer(std::io::stderr)
		.init();
}
