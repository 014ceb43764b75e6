use std::collections::HashSet;

use crate::var::Result;

/// Append-only list of region names published by writers.
pub trait NameDirectory {
	/// Current names in publication order.
	fn names(&self) -> Result<Vec<String>>;

	/// Publish a name; publishing a known name is a no-op.
	fn add_name(&self, name: &str) -> Result<()>;

	/// Withdraw a name, returning whether it was present.
	fn remove_name(&self, name: &str) -> Result<bool>;
}

/// Reports names that appear in a directory for the first time.
#[derive(Debug)]
pub struct NameWatcher<D> {
	directory: D,
	known: HashSet<String>,
}

impl<D: NameDirectory> NameWatcher<D> {
	/// Watcher that has seen nothing yet.
	pub fn new(directory: D) -> Self {
		Self {
			directory,
			known: HashSet::new(),
		}
	}

	/// Names never reported before, in directory order; marks them reported.
	pub fn check_new_names(&mut self) -> Result<Vec<String>> {
		let added = self.pending_names()?;
		for name in &added {
			self.mark_known(name);
		}
		Ok(added)
	}

	/// Names not yet reported, without marking them.
	///
	/// Callers that can fail while handling a name mark it with [`NameWatcher::mark_known`] only once
	/// handled, so a failed attempt is retried on the next check.
	pub fn pending_names(&self) -> Result<Vec<String>> {
		let pending: Vec<String> = self.directory.names()?.into_iter().filter(|name| !self.known.contains(name)).collect();
		if !pending.is_empty() {
			tracing::debug!(count = pending.len(), "discovered names");
		}
		Ok(pending)
	}

	/// Record `name` as reported.
	pub fn mark_known(&mut self, name: &str) {
		self.known.insert(name.to_owned());
	}

	/// Publish `name` and mark it as already reported.
	pub fn add_name(&mut self, name: &str) -> Result<()> {
		self.directory.add_name(name)?;
		self.known.insert(name.to_owned());
		Ok(())
	}

	/// Underlying directory.
	pub fn directory(&self) -> &D {
		&self.directory
	}
}
