//! Executor plumbing for reactive cells
//!
//! Effects run as local tasks on the executor installed here: tokio on
//! native, the browser microtask queue on wasm. An [`Owner`] plays the part
//! of the UI unit. Cleaning it up disposes its signals and effects, and any
//! write still waiting for the next tick is dropped with them.

pub use reactive_graph::owner::Owner;

use any_spawner::Executor;

/// Install the platform executor (no-op if one is already installed)
pub fn init_executor() {
    #[cfg(target_arch = "wasm32")]
    let result = Executor::init_wasm_bindgen();
    #[cfg(not(target_arch = "wasm32"))]
    let result = Executor::init_tokio();

    if result.is_err() {
        log::debug!("Executor already initialized");
    }
}

/// Yield until queued effects have had a chance to run
pub async fn tick() {
    Executor::tick().await;
}
