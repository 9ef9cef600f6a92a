//! LocalStorage capability
//!
//! [`local_storage`] is the one place that probes the environment. Its result
//! is handed to cells explicitly; `None` means "no persistent store here".

#[cfg(target_arch = "wasm32")]
mod web {
    use std::rc::Rc;

    use wasm_bindgen::{JsCast, JsValue};

    use crate::error::StoreError;
    use crate::store::Store;

    /// `window.localStorage`
    #[derive(Debug, Clone)]
    pub struct LocalStore {
        storage: web_sys::Storage,
    }

    impl LocalStore {
        pub fn new(storage: web_sys::Storage) -> Self {
            Self { storage }
        }
    }

    /// Map a thrown JS value onto a store error
    fn js_error(key: &str, value_len: usize, err: JsValue) -> StoreError {
        if let Some(dom) = err.dyn_ref::<web_sys::DomException>() {
            if dom.name() == "QuotaExceededError" {
                // The browser doesn't report its limit
                return StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed: key.len() + value_len,
                    limit: None,
                };
            }
            if dom.name() == "SecurityError" {
                return StoreError::Unavailable;
            }
            return StoreError::Backend(format!("{}: {}", dom.name(), dom.message()));
        }
        StoreError::Backend(format!("{:?}", err))
    }

    impl Store for LocalStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.storage.get_item(key).map_err(|e| js_error(key, 0, e))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.storage
                .set_item(key, value)
                .map_err(|e| js_error(key, value.len(), e))
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.storage.remove_item(key).map_err(|e| js_error(key, 0, e))
        }
    }

    /// LocalStorage of the current window, if any
    pub fn local_storage() -> Option<Rc<dyn Store>> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if storage.is_none() {
            log::warn!("LocalStorage unavailable, values will not persist");
        }
        storage.map(|s| Rc::new(LocalStore::new(s)) as Rc<dyn Store>)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{LocalStore, local_storage};

/// Native stub: there is no LocalStorage outside the browser
#[cfg(not(target_arch = "wasm32"))]
pub fn local_storage() -> Option<std::rc::Rc<dyn crate::store::Store>> {
    None
}
