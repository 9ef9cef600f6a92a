//! Persist Cell - reactive state that survives reloads
//!
//! Core modules:
//! - `persistence`: Cell that mirrors its value into a store as JSON
//! - `runtime`: Executor setup and owners for signals and effects
//! - `store`: Key-value store capability (in-memory, namespaced)
//! - `platform`: Browser LocalStorage probe
//! - `error`: Store and persistence errors

pub mod error;
pub mod persistence;
pub mod platform;
pub mod runtime;
pub mod store;

#[cfg(test)]
mod test_support;

pub use error::{PersistError, StoreError};
pub use persistence::{Initial, PersistedCell, read_stored, use_local_storage, write_stored};
pub use platform::local_storage;
pub use reactive_graph::signal::{ReadSignal, WriteSignal};
pub use store::{MemoryStore, Namespaced, Store};
