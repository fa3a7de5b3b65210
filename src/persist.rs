//! Durable client-side preferences: favorites and the dark-mode flag.
//!
//! Each preference is a narrow repository over a [`KeyValueStore`]. Values
//! are stored as JSON text under a fixed key. Missing or unreadable values
//! are treated as "never set" and replaced by the default; only writes can
//! fail.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;
use crate::state::Favorites;

pub const FAVORITES_KEY: &str = "favorites";
pub const DARK_MODE_KEY: &str = "dark-mode";

/// String key-value storage scoped to the application.
pub trait KeyValueStore: Send {
    /// Raw stored text, `None` when the key was never written or can't be read.
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One file per key under a directory: `<dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data-local dir>/pokeview`, or `./pokeview` when the platform has none.
    pub fn default_dir() -> PathBuf {
        let base = dirs_next::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("pokeview")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "unreadable stored value");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::trace!(path = %path.display(), "stored value written");
        Ok(())
    }
}

/// In-memory store. Clones share the same map, so a clone handed to a fresh
/// repository behaves like a reload.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.get(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|err| {
            StorageError::Io(std::io::Error::other(format!("memory store poisoned: {err}")))
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn read_or_default<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    let Some(text) = store.get(key) else {
        return T::default();
    };
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(key, error = %err, "corrupt stored value, using default");
            T::default()
        }
    }
}

fn write_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let text = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &text)
}

/// Persisted set of favorite names.
pub struct FavoritesStore {
    store: Box<dyn KeyValueStore>,
    favorites: Favorites,
}

impl FavoritesStore {
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let names: Vec<String> = read_or_default(store.as_ref(), FAVORITES_KEY);
        Self {
            store,
            favorites: Favorites::new(names),
        }
    }

    /// Flip membership and persist the whole set. Nothing changes when the
    /// write fails.
    pub fn toggle(&mut self, name: &str) -> Result<bool, StorageError> {
        let mut next = self.favorites.clone();
        let member = next.toggle(name);
        write_json(self.store.as_mut(), FAVORITES_KEY, next.all())?;
        tracing::debug!(name, member, "favorite toggled");
        self.favorites = next;
        Ok(member)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.favorites.contains(name)
    }

    pub fn all(&self) -> &[String] {
        self.favorites.all()
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }
}

/// Called with the new flag whenever the theme changes.
pub type ThemeApplier = Box<dyn Fn(bool) + Send>;

/// Persisted dark-mode flag.
pub struct ThemePreference {
    store: Box<dyn KeyValueStore>,
    dark: bool,
    apply: ThemeApplier,
}

impl ThemePreference {
    pub fn load(store: Box<dyn KeyValueStore>, apply: ThemeApplier) -> Self {
        let dark = read_or_default(store.as_ref(), DARK_MODE_KEY);
        Self { store, dark, apply }
    }

    pub fn get(&self) -> bool {
        self.dark
    }

    /// Persist, then apply when the flag actually changed.
    pub fn set(&mut self, dark: bool) -> Result<(), StorageError> {
        write_json(self.store.as_mut(), DARK_MODE_KEY, &dark)?;
        if self.dark != dark {
            self.dark = dark;
            (self.apply)(dark);
        }
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<bool, StorageError> {
        let dark = !self.dark;
        self.set(dark)?;
        Ok(dark)
    }

    /// Push the current flag to the applier, used once at startup.
    pub fn apply(&self) {
        (self.apply)(self.dark);
    }
}
