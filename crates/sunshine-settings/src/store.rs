//! Stored preference values with change subscriptions.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use crate::preference::Preference;

/// Errors that can occur while loading or persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file is malformed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Opaque handle identifying a change subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&str) + Send + Sync>;

/// Stored preference values, keyed by preference key.
///
/// Persists to a TOML file when constructed with a path. Change callbacks
/// run on the thread that calls [`SettingsStore::set`] and receive the
/// changed preference's key; the store never mutates values on its own.
pub struct SettingsStore {
    path: Option<PathBuf>,
    values: RwLock<HashMap<String, String>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl SettingsStore {
    /// Load settings from a TOML file, seeding defaults for any preference
    /// that has no stored value yet. Creates the file if it doesn't exist.
    ///
    /// # Errors
    /// Returns [`SettingsError`] if the file cannot be read, parsed, or
    /// created.
    pub fn load(path: PathBuf, defaults: &[Preference]) -> Result<Self, SettingsError> {
        let mut values: HashMap<String, String> = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            toml::from_str::<BTreeMap<String, String>>(&contents)?
                .into_iter()
                .collect()
        } else {
            HashMap::new()
        };

        for pref in defaults {
            values
                .entry(pref.key.clone())
                .or_insert_with(|| pref.default.clone());
        }

        let store = Self {
            path: Some(path),
            values: RwLock::new(values),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        };
        store.save()?;
        Ok(store)
    }

    /// Create a store with no backing file, seeded from defaults.
    pub fn in_memory(defaults: &[Preference]) -> Self {
        let values = defaults
            .iter()
            .map(|p| (p.key.clone(), p.default.clone()))
            .collect();
        Self {
            path: None,
            values: RwLock::new(values),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        }
    }

    /// Current value for a preference key.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    /// Store a value, persist, and notify subscribers with the changed key.
    ///
    /// # Errors
    /// Returns [`SettingsError`] if persistence fails; the in-memory value is
    /// already updated at that point and no notification is sent.
    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<(), SettingsError> {
        {
            let mut values = self.values.write();
            values.insert(key.to_string(), value.into());
        }
        self.save()?;
        self.notify(key);
        Ok(())
    }

    /// Register a change callback. The callback receives the changed key.
    pub fn subscribe(&self, listener: impl Fn(&str) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a change callback. Returns false if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    fn notify(&self, key: &str) {
        // Snapshot the listeners and release the lock before invoking them,
        // so callbacks are free to read the store or call `set` again. A
        // callback that sets the key it is notified for will still recurse
        // forever; that is on the callback.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(key);
        }
    }

    fn save(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let snapshot: BTreeMap<String, String> = self
            .values
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let contents = toml::to_string_pretty(&snapshot)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
