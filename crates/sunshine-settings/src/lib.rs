//! User settings for Sunshine
//!
//! Preference definitions (the app's "preference resource"), a store with
//! change subscriptions, and the screen controller that keeps per-preference
//! summaries current.

pub mod preference;
pub mod screen;
pub mod store;

pub use preference::{general_preferences, Preference, PreferenceKind};
pub use screen::SettingsScreen;
pub use store::{SettingsError, SettingsStore, SubscriptionId};
