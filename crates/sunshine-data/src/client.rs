//! Async client over the weather store.
//!
//! `WeatherClient` owns the store behind an `Arc<Mutex<_>>` and runs every
//! query on the blocking pool, giving tokio tasks (UI surfaces, the sync
//! worker) a shared async interface to the local cache.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;

use crate::contract::Selection;
use crate::store::SqliteWeatherStore;
use crate::types::WeatherRecord;

/// Async facade over [`SqliteWeatherStore`].
#[derive(Clone)]
pub struct WeatherClient {
    store: Arc<Mutex<SqliteWeatherStore>>,
}

impl WeatherClient {
    /// Wrap a store for shared async access.
    pub fn new(store: SqliteWeatherStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Upsert a batch of records in one transaction.
    pub async fn upsert_all(&self, records: Vec<WeatherRecord>) -> Result<()> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            store
                .lock()
                .upsert_all(&records)
                .map_err(|e| anyhow::anyhow!("{}", e))
        })
        .await?
    }

    /// Get the record for a single normalized date.
    ///
    /// Returns `Ok(None)` when no row exists for that day.
    pub async fn record_for_date(&self, date: i64) -> Result<Option<WeatherRecord>> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            store
                .lock()
                .record_for_date(date)
                .map_err(|e| anyhow::anyhow!("{}", e))
        })
        .await?
    }

    /// Query records matching a contract selection, ordered by date.
    pub async fn query(&self, selection: Selection) -> Result<Vec<WeatherRecord>> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            store
                .lock()
                .query(&selection)
                .map_err(|e| anyhow::anyhow!("{}", e))
        })
        .await?
    }

    /// Delete rows dated strictly before the given normalized date.
    ///
    /// Returns the number of deleted rows.
    pub async fn delete_before(&self, date: i64) -> Result<usize> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            store
                .lock()
                .delete_before(date)
                .map_err(|e| anyhow::anyhow!("{}", e))
        })
        .await?
    }

    /// Number of stored rows.
    pub async fn count(&self) -> Result<usize> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            store.lock().count().map_err(|e| anyhow::anyhow!("{}", e))
        })
        .await?
    }
}
