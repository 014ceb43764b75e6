//! Polling change detection over stores and name directories.

mod changes;
mod names;
mod reader;

pub use changes::{ChangeSet, StructureWatcher};
pub use names::{NameDirectory, NameWatcher};
pub use reader::{AutoReader, ReaderHandle, ReaderOptions, WatchEvent};
