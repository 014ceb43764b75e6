//! Public library API for sharing self-describing variable structures through shared memory.

/// Type codec, structure model, command parser, shared-memory store, and change watchers.
pub mod var;
