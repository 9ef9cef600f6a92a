//! Reactive state persisted to a key-value store
//!
//! A [`PersistedCell`] reads its slot once on creation and writes every later
//! value back as JSON from a deferred effect. Memory is authoritative; the
//! store holds a best-effort copy:
//! - read or decode failures fall back to the initial value
//! - write or encode failures keep the new in-memory value
//!
//! Both are logged and never returned to the caller.

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use reactive_graph::effect::Effect;
use reactive_graph::signal::{ReadSignal, RwSignal, WriteSignal};
use reactive_graph::traits::{GetUntracked, Set, Update, With};

use crate::error::PersistError;
use crate::store::Store;

/// Initial value of a cell, used when nothing usable is stored
pub enum Initial<T> {
    Value(T),
    /// Only evaluated when the stored value is missing or unreadable
    Lazy(Box<dyn FnOnce() -> T>),
}

impl<T> Initial<T> {
    pub fn lazy(f: impl FnOnce() -> T + 'static) -> Self {
        Initial::Lazy(Box::new(f))
    }

    pub fn resolve(self) -> T {
        match self {
            Initial::Value(value) => value,
            Initial::Lazy(f) => f(),
        }
    }
}

impl<T> From<T> for Initial<T> {
    fn from(value: T) -> Self {
        Initial::Value(value)
    }
}

/// Read and decode the value at `key`
pub fn read_stored<T: DeserializeOwned>(
    store: &dyn Store,
    key: &str,
) -> Result<Option<T>, PersistError> {
    let Some(json) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|source| PersistError::Decode {
            key: key.to_string(),
            source,
        })
}

/// Encode `value` and write it at `key`
pub fn write_stored<T: Serialize + ?Sized>(
    store: &dyn Store,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let json = serde_json::to_string(value).map_err(|source| PersistError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)?;
    Ok(())
}

/// Stored value at `key`, or the resolved initial value
fn load_initial<T: DeserializeOwned>(
    store: Option<&dyn Store>,
    key: &str,
    initial: Initial<T>,
) -> T {
    let Some(store) = store else {
        return initial.resolve();
    };

    match read_stored(store, key) {
        Ok(Some(value)) => {
            log::debug!("Loaded {:?} from storage", key);
            value
        }
        Ok(None) => initial.resolve(),
        Err(err) => {
            log::error!("Error reading {:?} from storage: {}", key, err);
            initial.resolve()
        }
    }
}

/// A piece of reactive state mirrored into a persistent store
///
/// Signals and the write effect belong to the [`Owner`](crate::runtime::Owner)
/// current at creation. Cleaning that owner up ends persistence.
pub struct PersistedCell<T: Send + Sync + 'static> {
    value: RwSignal<T>,
    key: RwSignal<String>,
}

impl<T> PersistedCell<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Create the cell, reading `key` from `store` exactly once
    ///
    /// `store` is `None` where no persistent store exists; the cell then
    /// behaves as plain state and never attempts a write.
    pub fn new(
        store: Option<Rc<dyn Store>>,
        key: impl Into<String>,
        initial: impl Into<Initial<T>>,
    ) -> Self {
        let key = key.into();
        let current = load_initial(store.as_deref(), &key, initial.into());

        let value = RwSignal::new(current);
        let key = RwSignal::new(key);

        // Runs after the first commit, then after every change to value or key
        Effect::new(move || {
            let Some(store) = store.as_deref() else {
                return;
            };
            key.with(|key| match value.with(|v| write_stored(store, key, v)) {
                Ok(()) => log::debug!("Persisted {:?}", key),
                Err(err) => log::error!("Error writing {:?} to storage: {}", key, err),
            });
        });

        Self { value, key }
    }
}

impl<T: Send + Sync + 'static> PersistedCell<T> {
    /// Read handle to the in-memory value
    pub fn value(&self) -> ReadSignal<T> {
        self.value.read_only()
    }

    pub fn setter(&self) -> WriteSignal<T> {
        self.value.write_only()
    }

    pub fn set(&self, value: T) {
        self.value.set(value);
    }

    /// Compute the next value from the current one
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.value.update(|v| *v = f(&*v));
    }

    /// Slot the value is persisted under
    pub fn key(&self) -> String {
        self.key.get_untracked()
    }

    /// Move the cell to another slot
    ///
    /// The current value is written under the new key on the next tick.
    /// The new slot is not read and the old one is left in place.
    pub fn set_key(&self, key: impl Into<String>) {
        self.key.set(key.into());
    }

    /// Split into the `(value, setter)` pair
    pub fn into_pair(self) -> (ReadSignal<T>, WriteSignal<T>) {
        self.value.split()
    }
}

impl<T: Clone + Send + Sync + 'static> PersistedCell<T> {
    /// Current value, without tracking
    pub fn get(&self) -> T {
        self.value.get_untracked()
    }
}

/// Reactive state synced with LocalStorage (or any injected store)
///
/// ```
/// use std::rc::Rc;
/// use persist_cell::runtime::{self, Owner};
/// use persist_cell::{MemoryStore, Store, use_local_storage};
/// use reactive_graph::traits::{GetUntracked, Set};
///
/// runtime::init_executor();
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// rt.block_on(tokio::task::LocalSet::new().run_until(async {
///     let owner = Owner::new();
///     owner.set();
///
///     let store: Rc<dyn Store> = Rc::new(MemoryStore::new());
///     let (theme, set_theme) =
///         use_local_storage::<String>(Some(Rc::clone(&store)), "theme", "light".to_string());
///     assert_eq!(theme.get_untracked(), "light");
///
///     set_theme.set("dark".to_string());
///     runtime::tick().await;
///     assert_eq!(store.get("theme").unwrap().as_deref(), Some("\"dark\""));
/// }));
/// ```
pub fn use_local_storage<T>(
    store: Option<Rc<dyn Store>>,
    key: impl Into<String>,
    initial: impl Into<Initial<T>>,
) -> (ReadSignal<T>, WriteSignal<T>)
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    PersistedCell::new(store, key, initial).into_pair()
}
