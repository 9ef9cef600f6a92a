//! Persist Cell demo entry point
//!
//! Runs the theme toggle: read a persisted theme, flip it, persist it, and
//! read it back from a fresh cell.

use std::rc::Rc;

use persist_cell::runtime::{self, Owner};
use persist_cell::{Store, use_local_storage};
use reactive_graph::traits::{GetUntracked, Update};

/// Slot the demo persists under
const THEME_KEY: &str = "theme";

/// Toggle the persisted theme and report what a fresh cell sees
async fn run_theme_demo(store: Option<Rc<dyn Store>>) {
    let owner = Owner::new();
    owner.with(|| {
        let (theme, set_theme) =
            use_local_storage::<String>(store.clone(), THEME_KEY, "light".to_string());
        log::info!("Theme on load: {}", theme.get_untracked());

        set_theme.update(|t| *t = if t == "dark" { "light" } else { "dark" }.to_string());
        log::info!("Theme after toggle: {}", theme.get_untracked());
    });

    // Let the write effect run, then tear the unit down
    runtime::tick().await;
    owner.cleanup();

    let fresh = Owner::new();
    fresh.with(|| {
        let (theme, _) = use_local_storage::<String>(store, THEME_KEY, "light".to_string());
        log::info!("Theme seen by a fresh cell: {}", theme.get_untracked());
    });
    fresh.cleanup();
}

#[cfg(target_arch = "wasm32")]
mod wasm_demo {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(start)]
    pub async fn wasm_main() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        persist_cell::runtime::init_executor();

        log::info!("Persist Cell demo starting...");
        super::run_theme_demo(persist_cell::local_storage()).await;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Persist Cell (native) starting...");
    log::info!("No LocalStorage outside the browser, using an in-memory store");

    runtime::init_executor();
    let rt = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(rt) => rt,
        Err(err) => {
            log::error!("Failed to start runtime: {}", err);
            return;
        }
    };

    let store: Rc<dyn Store> = Rc::new(persist_cell::MemoryStore::new());
    let local = tokio::task::LocalSet::new();
    rt.block_on(local.run_until(run_theme_demo(Some(Rc::clone(&store)))));

    match store.get(THEME_KEY) {
        Ok(Some(json)) => println!("{} = {}", THEME_KEY, json),
        Ok(None) => println!("{} not stored", THEME_KEY),
        Err(err) => eprintln!("Error reading {}: {}", THEME_KEY, err),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
