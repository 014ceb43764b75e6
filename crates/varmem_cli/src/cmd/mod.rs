/// Region creation command.
pub mod create;
/// Current value dump command.
pub mod dump;
/// Structure schema inspection command.
pub mod schema;
/// Field assignment command.
pub mod set;
/// Shared CLI parsing and JSON rendering helpers.
pub mod util;
/// Auto reader event stream command.
pub mod watch;
