//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, absent on native)

pub mod storage;

pub use storage::local_storage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
