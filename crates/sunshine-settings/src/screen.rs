//! Settings screen controller.
//!
//! Holds the preference definitions plus the displayed summary for each
//! one, and keeps the summaries current by subscribing to the store while
//! attached. The attach/detach pair mirrors the screen becoming visible
//! and leaving the screen.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::preference::{Preference, PreferenceKind};
use crate::store::{SettingsStore, SubscriptionId};

pub struct SettingsScreen {
    preferences: Vec<Preference>,
    store: Arc<SettingsStore>,
    summaries: RwLock<HashMap<String, String>>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl SettingsScreen {
    /// Build the screen from its preference definitions.
    ///
    /// Text preferences display their current raw value from the start;
    /// other kinds gain a summary when their value changes.
    pub fn new(preferences: Vec<Preference>, store: Arc<SettingsStore>) -> Arc<Self> {
        let mut summaries = HashMap::new();
        for pref in &preferences {
            if matches!(pref.kind, PreferenceKind::Text) {
                let value = store.get(&pref.key).unwrap_or_default();
                if let Some(summary) = pref.summary_for(&value) {
                    summaries.insert(pref.key.clone(), summary);
                }
            }
        }

        Arc::new(Self {
            preferences,
            store,
            summaries: RwLock::new(summaries),
            subscription: Mutex::new(None),
        })
    }

    /// Attach to the store: summaries refresh on every change until
    /// [`SettingsScreen::stop`] is called.
    pub fn start(self: &Arc<Self>) {
        let mut subscription = self.subscription.lock();
        if subscription.is_some() {
            tracing::warn!("Settings screen already attached");
            return;
        }

        let weak = Arc::downgrade(self);
        let id = self.store.subscribe(move |key| {
            if let Some(screen) = weak.upgrade() {
                screen.on_preference_changed(key);
            }
        });
        *subscription = Some(id);
    }

    /// Detach from the store.
    pub fn stop(&self) {
        if let Some(id) = self.subscription.lock().take() {
            self.store.unsubscribe(id);
        }
    }

    /// Whether the screen is currently subscribed to changes.
    pub fn is_attached(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// The displayed summary for a preference, if it has one.
    pub fn summary(&self, key: &str) -> Option<String> {
        self.summaries.read().get(key).cloned()
    }

    /// The preference definitions backing this screen.
    pub fn preferences(&self) -> &[Preference] {
        &self.preferences
    }

    fn on_preference_changed(&self, key: &str) {
        // Changes to keys this screen doesn't define are ignored.
        let Some(pref) = self.preferences.iter().find(|p| p.key == key) else {
            return;
        };
        if !pref.shows_summary() {
            return;
        }

        let value = self.store.get(key).unwrap_or_default();
        if let Some(summary) = pref.summary_for(&value) {
            tracing::debug!("Preference {} changed, summary now {:?}", key, summary);
            self.summaries.write().insert(key.to_string(), summary);
        }
    }
}

impl Drop for SettingsScreen {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.lock().take() {
            self.store.unsubscribe(id);
        }
    }
}
