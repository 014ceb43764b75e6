use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::var::memory::{REGION_EXTENSION, region_path};
use crate::var::{FileMemory, HeapMemory, NameDirectory, Result, SharedMemory, VarError};

/// Opens existing regions and creates new ones by name.
pub trait MemoryProvider {
	/// Region handle type.
	type Memory: SharedMemory;

	/// Attach to an existing region.
	fn open(&self, name: &str) -> Result<Self::Memory>;

	/// Create a zero-filled region.
	fn create(&self, name: &str, capacity: usize) -> Result<Self::Memory>;
}

#[derive(Debug, Default)]
struct HeapRegistryInner {
	regions: Vec<HeapMemory>,
	names: Vec<String>,
}

/// In-process region table plus its name list; clones share both.
#[derive(Debug, Clone, Default)]
pub struct HeapRegistry {
	inner: Arc<Mutex<HeapRegistryInner>>,
}

impl HeapRegistry {
	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}
}

impl MemoryProvider for HeapRegistry {
	type Memory = HeapMemory;

	fn open(&self, name: &str) -> Result<HeapMemory> {
		self.inner
			.lock()
			.regions
			.iter()
			.find(|region| region.name() == name)
			.cloned()
			.ok_or_else(|| VarError::RegionNotFound { name: name.to_owned() })
	}

	fn create(&self, name: &str, capacity: usize) -> Result<HeapMemory> {
		let mut inner = self.inner.lock();
		let region = HeapMemory::new(name, capacity);
		match inner.regions.iter_mut().find(|item| item.name() == name) {
			Some(slot) => *slot = region.clone(),
			None => inner.regions.push(region.clone()),
		}
		Ok(region)
	}
}

impl NameDirectory for HeapRegistry {
	fn names(&self) -> Result<Vec<String>> {
		Ok(self.inner.lock().names.clone())
	}

	fn add_name(&self, name: &str) -> Result<()> {
		let mut inner = self.inner.lock();
		if !inner.names.iter().any(|item| item == name) {
			inner.names.push(name.to_owned());
		}
		Ok(())
	}

	fn remove_name(&self, name: &str) -> Result<bool> {
		let mut inner = self.inner.lock();
		let before = inner.names.len();
		inner.names.retain(|item| item != name);
		Ok(inner.names.len() != before)
	}
}

/// Directory of file-backed regions; every `*.vsm` file is one named region.
#[derive(Debug, Clone)]
pub struct RegionDir {
	dir: PathBuf,
}

impl RegionDir {
	/// Use `dir`, creating it when missing.
	pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
		let dir = dir.into();
		fs::create_dir_all(&dir)?;
		Ok(Self { dir })
	}

	/// Directory path.
	pub fn path(&self) -> &Path {
		&self.dir
	}
}

impl MemoryProvider for RegionDir {
	type Memory = FileMemory;

	fn open(&self, name: &str) -> Result<FileMemory> {
		if !region_path(&self.dir, name)?.exists() {
			return Err(VarError::RegionNotFound { name: name.to_owned() });
		}
		FileMemory::open(&self.dir, name)
	}

	fn create(&self, name: &str, capacity: usize) -> Result<FileMemory> {
		FileMemory::create(&self.dir, name, capacity)
	}
}

impl NameDirectory for RegionDir {
	/// Region names sorted by file name.
	fn names(&self) -> Result<Vec<String>> {
		let mut names = Vec::new();
		for entry in fs::read_dir(&self.dir)? {
			let path = entry?.path();
			if path.extension().and_then(|ext| ext.to_str()) != Some(REGION_EXTENSION) {
				continue;
			}
			if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
				names.push(stem.to_owned());
			}
		}
		names.sort();
		Ok(names)
	}

	/// Names follow the region files, so there is nothing to record.
	fn add_name(&self, name: &str) -> Result<()> {
		region_path(&self.dir, name).map(|_| ())
	}

	fn remove_name(&self, name: &str) -> Result<bool> {
		let path = region_path(&self.dir, name)?;
		if !path.exists() {
			return Ok(false);
		}
		fs::remove_file(path)?;
		Ok(true)
	}
}
