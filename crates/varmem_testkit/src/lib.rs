//! Shared test helpers for workspace crates.

use tempfile::TempDir;

/// Fresh directory for file-backed regions, removed when dropped.
pub fn scratch_dir() -> TempDir {
	tempfile::Builder::new()
		.prefix("varmem-test-")
		.tempdir()
		.expect("scratch directory is created")
}
