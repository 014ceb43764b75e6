//! Named, fixed-capacity byte regions that stores lay structures out into.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memmap2::{MmapMut, MmapOptions};
use parking_lot::Mutex;

use crate::var::{Result, VarError};

mod provider;

pub use provider::{HeapRegistry, MemoryProvider, RegionDir};

/// File extension used for file-backed regions.
pub const REGION_EXTENSION: &str = "vsm";

/// A named byte region with bounded random access.
pub trait SharedMemory {
	/// Region name.
	fn name(&self) -> &str;

	/// Fixed capacity in bytes.
	fn capacity(&self) -> usize;

	/// Copy `len` bytes starting at `offset`.
	fn read(&self, offset: usize, len: usize) -> Result<Vec<u8>>;

	/// Overwrite bytes starting at `offset`.
	fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<()>;
}

impl<M: SharedMemory + ?Sized> SharedMemory for Box<M> {
	fn name(&self) -> &str {
		(**self).name()
	}

	fn capacity(&self) -> usize {
		(**self).capacity()
	}

	fn read(&self, offset: usize, len: usize) -> Result<Vec<u8>> {
		(**self).read(offset, len)
	}

	fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
		(**self).write(offset, bytes)
	}
}

/// In-process region; clones attach to the same bytes.
#[derive(Debug, Clone)]
pub struct HeapMemory {
	name: String,
	bytes: Arc<Mutex<Vec<u8>>>,
}

impl HeapMemory {
	/// Zero-filled region of `capacity` bytes.
	pub fn new(name: impl Into<String>, capacity: usize) -> Self {
		Self {
			name: name.into(),
			bytes: Arc::new(Mutex::new(vec![0; capacity])),
		}
	}

	/// Copy of the whole region.
	pub fn snapshot(&self) -> Vec<u8> {
		self.bytes.lock().clone()
	}
}

impl SharedMemory for HeapMemory {
	fn name(&self) -> &str {
		&self.name
	}

	fn capacity(&self) -> usize {
		self.bytes.lock().len()
	}

	fn read(&self, offset: usize, len: usize) -> Result<Vec<u8>> {
		let bytes = self.bytes.lock();
		let end = check_range(&self.name, offset, len, bytes.len())?;
		Ok(bytes[offset..end].to_vec())
	}

	fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
		let mut bytes = self.bytes.lock();
		let end = check_range(&self.name, offset, data.len(), bytes.len())?;
		bytes[offset..end].copy_from_slice(data);
		Ok(())
	}
}

/// File-backed region mapped into this process.
#[derive(Debug)]
pub struct FileMemory {
	name: String,
	path: PathBuf,
	mmap: MmapMut,
	_file: File,
}

impl FileMemory {
	/// Create (or resize) the region file for `name` in `dir` and map it.
	pub fn create(dir: impl AsRef<Path>, name: &str, capacity: usize) -> Result<Self> {
		let path = region_path(dir.as_ref(), name)?;
		let file = OpenOptions::new().read(true).write(true).create(true).truncate(false).open(&path)?;
		file.set_len(capacity as u64)?;
		tracing::debug!(name, path = %path.display(), capacity, "created file region");
		Self::map(name, path, file, capacity)
	}

	/// Map an existing region file; capacity is the file length.
	pub fn open(dir: impl AsRef<Path>, name: &str) -> Result<Self> {
		let path = region_path(dir.as_ref(), name)?;
		let file = OpenOptions::new().read(true).write(true).open(&path)?;
		let capacity = usize::try_from(file.metadata()?.len()).map_err(|_| VarError::CapacityExceeded {
			name: name.to_owned(),
			need: u64::MAX,
			capacity: usize::MAX as u64,
		})?;
		tracing::debug!(name, path = %path.display(), capacity, "opened file region");
		Self::map(name, path, file, capacity)
	}

	/// Path of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Flush pending writes to the backing file.
	pub fn flush(&self) -> Result<()> {
		self.mmap.flush()?;
		Ok(())
	}

	fn map(name: &str, path: PathBuf, file: File, capacity: usize) -> Result<Self> {
		// SAFETY: the mapping is kept alive together with its file; concurrent writers from other
		// processes are outside the single-writer contract and only affect byte contents.
		let mmap = unsafe { MmapOptions::new().len(capacity).map_mut(&file)? };
		Ok(Self {
			name: name.to_owned(),
			path,
			mmap,
			_file: file,
		})
	}
}

impl SharedMemory for FileMemory {
	fn name(&self) -> &str {
		&self.name
	}

	fn capacity(&self) -> usize {
		self.mmap.len()
	}

	fn read(&self, offset: usize, len: usize) -> Result<Vec<u8>> {
		let end = check_range(&self.name, offset, len, self.mmap.len())?;
		Ok(self.mmap[offset..end].to_vec())
	}

	fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
		let end = check_range(&self.name, offset, data.len(), self.mmap.len())?;
		self.mmap[offset..end].copy_from_slice(data);
		self.mmap.flush_async_range(offset, data.len())?;
		Ok(())
	}
}

/// Path of the region file for `name` inside `dir`.
pub fn region_path(dir: &Path, name: &str) -> Result<PathBuf> {
	let invalid = name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']);
	if invalid {
		return Err(VarError::InvalidName { name: name.to_owned() });
	}
	Ok(dir.join(format!("{name}.{REGION_EXTENSION}")))
}

fn check_range(name: &str, offset: usize, len: usize, capacity: usize) -> Result<usize> {
	match offset.checked_add(len) {
		Some(end) if end <= capacity => Ok(end),
		_ => Err(VarError::CapacityExceeded {
			name: name.to_owned(),
			need: (offset as u64).saturating_add(len as u64),
			capacity: capacity as u64,
		}),
	}
}
