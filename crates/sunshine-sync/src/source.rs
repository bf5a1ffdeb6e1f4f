//! Forecast source boundary and sync error types.

use sunshine_data::WeatherRecord;
use thiserror::Error;

/// Errors that can occur during a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The forecast source failed to deliver records.
    #[error("Forecast source error: {0}")]
    Source(String),

    /// The local cache rejected the write.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SyncError {
    /// Create a source error.
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Provider of forecast records.
///
/// This is the boundary to the network sync implementation, which lives
/// outside this crate. Implementations may block; the worker calls `fetch`
/// on the blocking pool.
///
/// Record dates delivered by a source are not trusted to be normalized;
/// the worker normalizes them before storage.
pub trait ForecastSource: Send + Sync {
    /// Fetch the forecast to cache, one record per day.
    ///
    /// # Errors
    /// Returns [`SyncError::Source`] when the forecast cannot be obtained.
    fn fetch(&self) -> SyncResult<Vec<WeatherRecord>>;
}
