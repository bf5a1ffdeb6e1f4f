use serde::{Deserialize, Serialize};

/// The kind of a user-editable preference.
///
/// Summary rendering is decided per variant, so callers never inspect the
/// runtime type of a preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKind {
    /// Value chosen from a fixed list: `values[i]` is stored, `entries[i]`
    /// is displayed. The two vecs are index-aligned.
    List {
        entries: Vec<String>,
        values: Vec<String>,
    },
    /// Free-form text value.
    Text,
    /// Binary toggle, stored as `"true"`/`"false"`.
    Checkbox,
}

/// A user-editable preference definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    /// Stable key the value is stored under
    pub key: String,
    /// Display title
    pub title: String,
    /// Default stored value
    pub default: String,
    pub kind: PreferenceKind,
}

impl Preference {
    /// Render the summary shown under the preference title for a stored
    /// value.
    ///
    /// List preferences show the display label matching the value, falling
    /// back to the raw value as text when no entry matches. Text preferences
    /// show the raw value. Checkbox preferences show no summary.
    pub fn summary_for(&self, value: &str) -> Option<String> {
        match &self.kind {
            PreferenceKind::List { entries, values } => {
                let label = values
                    .iter()
                    .position(|v| v == value)
                    .and_then(|i| entries.get(i));
                match label {
                    Some(label) => Some(label.clone()),
                    // Degrade gracefully: an unrecognized stored value is
                    // shown as-is, not treated as an error.
                    None => Some(value.to_string()),
                }
            }
            PreferenceKind::Text => Some(value.to_string()),
            PreferenceKind::Checkbox => None,
        }
    }

    /// Whether this preference shows a summary at all.
    pub fn shows_summary(&self) -> bool {
        !matches!(self.kind, PreferenceKind::Checkbox)
    }
}

/// The general settings of the app: location, units, notifications.
pub fn general_preferences() -> Vec<Preference> {
    vec![
        Preference {
            key: "location".to_string(),
            title: "Location".to_string(),
            default: "94043,USA".to_string(),
            kind: PreferenceKind::Text,
        },
        Preference {
            key: "units".to_string(),
            title: "Temperature Units".to_string(),
            default: "metric".to_string(),
            kind: PreferenceKind::List {
                entries: vec!["Metric".to_string(), "Imperial".to_string()],
                values: vec!["metric".to_string(), "imperial".to_string()],
            },
        },
        Preference {
            key: "show_notifications".to_string(),
            title: "Weather Notifications".to_string(),
            default: "true".to_string(),
            kind: PreferenceKind::Checkbox,
        },
    ]
}
