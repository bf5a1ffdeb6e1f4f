//! Naming contract for the weather table.
//!
//! Defines the stable identifiers the rest of the application uses to
//! address weather records: the table and column names, the content URI
//! forms, and the date-range selection used for "today onwards" queries.
//!
//! The content authority is the one deploy-varied identifier, so it lives in
//! a [`WeatherContract`] value constructed once at startup and passed to
//! whichever component builds URIs; the table and column names are schema
//! and stay constants.

use chrono::Utc;
use url::Url;

use crate::date;
use crate::types::DataError;

/// URI scheme for records served by the app's data layer
pub const CONTENT_SCHEME: &str = "content";

/// Default content authority; a reverse-domain string unique to the app
pub const DEFAULT_AUTHORITY: &str = "com.example.android.sunshine";

/// Path segment addressing the weather collection
pub const PATH_WEATHER: &str = "weather";

/// Name of the weather table
pub const TABLE_NAME: &str = "weather";

/// Column names of the weather table. These are stable strings: stored
/// databases and record URIs depend on them not changing.
pub mod columns {
    pub const DATE: &str = "date";

    /// Condition code as returned by the weather API, identifies the icon
    pub const WEATHER_ID: &str = "weather_id";

    /// Min and max temperatures in °C for the day (stored as REAL)
    pub const MIN_TEMP: &str = "min";
    pub const MAX_TEMP: &str = "max";

    /// Humidity, stored as a REAL percentage
    pub const HUMIDITY: &str = "humidity";

    /// Pressure, stored as a REAL percentage-like unit
    pub const PRESSURE: &str = "pressure";

    /// Wind speed in mph
    pub const WIND_SPEED: &str = "wind";

    pub const DEGREES: &str = "degrees";
}

/// A parameterized selection: filter clause plus its bound arguments.
///
/// Arguments are bound at query time rather than interpolated into the
/// clause, so the clause text is constant for a given query shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub clause: String,
    pub args: Vec<i64>,
}

/// Addressing contract for cached weather records.
#[derive(Debug, Clone)]
pub struct WeatherContract {
    base_uri: Url,
}

impl WeatherContract {
    /// Create a contract for the given content authority.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidAuthority`] if the authority does not form
    /// a valid `content://` URI whose host is exactly the authority.
    pub fn new(authority: &str) -> Result<Self, DataError> {
        // `content` is a non-special scheme, so the parser tolerates an empty
        // host; an empty authority would yield URIs like `content:///weather`.
        if authority.is_empty() {
            return Err(DataError::InvalidAuthority {
                authority: String::new(),
                reason: "must not be empty".to_string(),
            });
        }
        let base_uri = Url::parse(&format!("{CONTENT_SCHEME}://{authority}/{PATH_WEATHER}"))
            .map_err(|e| DataError::InvalidAuthority {
                authority: authority.to_string(),
                reason: e.to_string(),
            })?;
        // Anything that does not survive as the URI host verbatim (stray path
        // segments, ports, userinfo) would address the wrong namespace.
        if base_uri.host_str() != Some(authority) {
            return Err(DataError::InvalidAuthority {
                authority: authority.to_string(),
                reason: "must be a plain host name".to_string(),
            });
        }
        Ok(Self { base_uri })
    }

    /// The URI of the whole weather collection: `content://<authority>/weather`.
    pub fn content_uri(&self) -> &Url {
        &self.base_uri
    }

    /// Build the URI of a single record by appending the date as the last
    /// path segment. Used for detail (point) queries.
    ///
    /// The caller is responsible for normalization; any value is accepted
    /// and stringified as-is.
    pub fn record_uri(&self, date: i64) -> Url {
        let mut uri = self.base_uri.clone();
        // The base URI always has a hierarchical path, so this cannot fail.
        if let Ok(mut segments) = uri.path_segments_mut() {
            segments.push(&date.to_string());
        }
        uri
    }

    /// Selection matching every record from the start of the current UTC day
    /// onwards. Used to query the forecast from today's date.
    pub fn selection_for_today_onwards(&self) -> Selection {
        Self::selection_from(Utc::now().timestamp_millis())
    }

    /// Selection matching every record from the start of the UTC day
    /// containing `raw_millis` onwards. The timestamp is normalized here, so
    /// callers can pass a raw clock reading.
    pub fn selection_from(raw_millis: i64) -> Selection {
        Selection {
            clause: format!("{} >= ?", columns::DATE),
            args: vec![date::normalize_date(raw_millis)],
        }
    }
}

impl Default for WeatherContract {
    fn default() -> Self {
        match Self::new(DEFAULT_AUTHORITY) {
            Ok(contract) => contract,
            // DEFAULT_AUTHORITY is a valid host name; parsing it cannot fail.
            Err(_) => unreachable!("default authority must parse"),
        }
    }
}
