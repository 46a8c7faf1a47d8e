//! Local persistence: a key-value port plus the strip collection built on it.

/// Key-value persistence port and its implementations.
pub mod kv;
/// The strip collection.
pub mod strips;
