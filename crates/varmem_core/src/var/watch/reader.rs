use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::var::{ChangeSet, MemoryProvider, NameDirectory, NameWatcher, Payload, Result, Structure, StructureWatcher, VarError, VarStore};

/// Polling interval and region sizing for [`AutoReader`].
#[derive(Debug, Clone)]
pub struct ReaderOptions {
	/// Sleep between ticks.
	pub interval: Duration,
	/// Capacity of regions created for new structures.
	pub capacity: usize,
}

impl Default for ReaderOptions {
	fn default() -> Self {
		Self {
			interval: Duration::from_millis(10),
			capacity: 0x1000,
		}
	}
}

/// Event produced by one reader tick.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
	/// A region name was discovered and its structure attached.
	NameAdded {
		/// Region name.
		name: String,
		/// Structure reconstructed from the region.
		structure: Structure,
	},
	/// Values of a watched region changed.
	ValueChanged(ChangeSet),
}

/// Discovers named regions and polls each of them for value changes.
pub struct AutoReader<D, P: MemoryProvider> {
	names: NameWatcher<D>,
	provider: P,
	watchers: BTreeMap<String, StructureWatcher<P::Memory>>,
	options: ReaderOptions,
}

impl<D: NameDirectory, P: MemoryProvider> AutoReader<D, P> {
	/// Reader over `directory`, attaching regions through `provider`.
	pub fn new(directory: D, provider: P, options: ReaderOptions) -> Self {
		Self {
			names: NameWatcher::new(directory),
			provider,
			watchers: BTreeMap::new(),
			options,
		}
	}

	/// Reader options.
	pub fn options(&self) -> &ReaderOptions {
		&self.options
	}

	/// Watcher for a region name.
	pub fn watcher(&self, name: &str) -> Option<&StructureWatcher<P::Memory>> {
		self.watchers.get(name)
	}

	/// Names of watched regions, sorted.
	pub fn watched(&self) -> impl Iterator<Item = &str> {
		self.watchers.keys().map(String::as_str)
	}

	/// One iteration: discover new names, then poll every watched region.
	pub fn tick(&mut self) -> Result<Vec<WatchEvent>> {
		let mut events = Vec::new();

		// a name is marked only once attached, so a region that is not laid out yet is retried
		for name in self.names.pending_names()? {
			if self.watchers.contains_key(&name) {
				self.names.mark_known(&name);
				continue;
			}
			let watcher = StructureWatcher::open(self.provider.open(&name)?)?;
			self.names.mark_known(&name);
			tracing::debug!(name = %name, structure = %watcher.structure().name, "attached region");
			events.push(WatchEvent::NameAdded {
				name: name.clone(),
				structure: watcher.structure().clone(),
			});
			self.watchers.insert(name, watcher);
		}

		for watcher in self.watchers.values_mut() {
			let changes = watcher.check_for_changes()?;
			if !changes.is_empty() {
				events.push(WatchEvent::ValueChanged(changes));
			}
		}

		Ok(events)
	}

	/// Tick until `stop` is set, handing every event to `sink` and sleeping between ticks.
	pub fn run(&mut self, stop: &AtomicBool, mut sink: impl FnMut(WatchEvent)) -> Result<()> {
		while !stop.load(Ordering::Acquire) {
			for event in self.tick()? {
				sink(event);
			}
			if stop.load(Ordering::Acquire) {
				break;
			}
			thread::sleep(self.options.interval);
		}
		Ok(())
	}

	/// Lay out a new structure in a fresh region and publish its name.
	///
	/// Every field is reported as changed.
	pub fn add_structure(&mut self, structure: Structure) -> Result<ChangeSet> {
		let name = structure.name.clone();
		if self.watchers.contains_key(&name) {
			return Err(VarError::RegionExists { name });
		}

		let payload = Payload::from_structure(&structure);
		let memory = self.provider.create(&name, self.options.capacity)?;
		let store = VarStore::create(memory, structure)?;
		self.names.add_name(&name)?;

		let mut watcher = StructureWatcher::new(store);
		let changes = watcher.check_payload(payload);
		tracing::debug!(name = %name, "added structure");
		self.watchers.insert(name, watcher);
		Ok(changes)
	}

	/// Diff a received payload and write it through when anything changed.
	///
	/// Unknown structures are added with the payload values applied.
	pub fn apply_payload(&mut self, structure: &Structure, payload: Payload) -> Result<ChangeSet> {
		if let Some(watcher) = self.watchers.get_mut(&structure.name) {
			let changes = watcher.check_payload(payload);
			if !changes.is_empty() {
				let present = changes.raw.iter().filter(|field| !field.is_empty()).cloned().collect();
				let write = Payload::from_fields(changes.raw.structure_id, present);
				watcher.store_mut().write_payload(&write)?;
			}
			return Ok(changes);
		}

		let mut seeded = structure.clone();
		for field in &mut seeded.fields {
			if let Some(update) = payload.get(field.name()).filter(|update| update.same_shape(field)) {
				*field = update.clone();
			}
		}
		self.add_structure(seeded)
	}

	/// Stop watching a region and withdraw its name.
	pub fn remove(&mut self, name: &str) -> Result<bool> {
		let watched = self.watchers.remove(name).is_some();
		let published = self.names.directory().remove_name(name)?;
		Ok(watched || published)
	}
}

impl<D, P> AutoReader<D, P>
where
	D: NameDirectory + Send + 'static,
	P: MemoryProvider + Send + 'static,
	P::Memory: Send + 'static,
{
	/// Run on a background thread until the returned handle is stopped or dropped.
	pub fn spawn(mut self, mut sink: impl FnMut(WatchEvent) + Send + 'static) -> ReaderHandle {
		let stop = Arc::new(AtomicBool::new(false));
		let flag = Arc::clone(&stop);
		let thread = thread::spawn(move || {
			let result = self.run(&flag, &mut sink);
			if let Err(err) = &result {
				tracing::error!(error = %err, "auto reader stopped");
			}
			result
		});
		ReaderHandle {
			stop,
			thread: Some(thread),
		}
	}
}

/// Handle to a spawned [`AutoReader`]; dropping it stops the loop.
pub struct ReaderHandle {
	stop: Arc<AtomicBool>,
	thread: Option<JoinHandle<Result<()>>>,
}

impl ReaderHandle {
	/// Request a stop; the current tick finishes first.
	pub fn request_stop(&self) {
		self.stop.store(true, Ordering::Release);
	}

	/// True once the loop has exited.
	pub fn is_finished(&self) -> bool {
		self.thread.as_ref().is_none_or(JoinHandle::is_finished)
	}

	/// Stop the loop and wait for it, returning the loop's result.
	pub fn stop(mut self) -> Result<()> {
		self.request_stop();
		self.join()
	}

	fn join(&mut self) -> Result<()> {
		match self.thread.take() {
			Some(thread) => thread
				.join()
				.unwrap_or_else(|_| Err(VarError::Io(std::io::Error::other("auto reader thread panicked")))),
			None => Ok(()),
		}
	}
}

impl Drop for ReaderHandle {
	fn drop(&mut self) {
		self.request_stop();
		let _ = self.join();
	}
}
