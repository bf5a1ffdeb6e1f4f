//! Sync trigger and worker task.

use std::sync::Arc;

use sunshine_data::{date, WeatherClient};
use tokio::sync::mpsc;

use crate::source::{ForecastSource, SyncError, SyncResult};

/// A request to the sync worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncRequest {
    /// Run a synchronization as soon as possible.
    Immediate,
}

/// Fire-and-forget handle for requesting sync runs.
///
/// Cheap to clone; every surface that needs to kick off a sync holds one.
#[derive(Clone)]
pub struct SyncRequester {
    tx: mpsc::UnboundedSender<SyncRequest>,
}

impl SyncRequester {
    /// Request that a synchronization run begin as soon as possible.
    ///
    /// No return value and no status: the request is queued and this
    /// returns immediately. A missing worker is logged, not surfaced.
    pub fn start_immediate_sync(&self) {
        if self.tx.send(SyncRequest::Immediate).is_err() {
            tracing::warn!("Sync requested but the sync worker is gone");
        }
    }
}

/// Worker task draining sync requests.
pub struct SyncWorker {
    rx: mpsc::UnboundedReceiver<SyncRequest>,
    source: Arc<dyn ForecastSource>,
    client: WeatherClient,
}

impl SyncWorker {
    /// Create a worker and the requester feeding it.
    pub fn new(
        source: Arc<dyn ForecastSource>,
        client: WeatherClient,
    ) -> (SyncRequester, SyncWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SyncRequester { tx }, SyncWorker { rx, source, client })
    }

    /// Service requests until every requester has been dropped.
    ///
    /// A failed run is logged and the worker keeps going; the next request
    /// gets a fresh attempt.
    pub async fn run(mut self) {
        while let Some(SyncRequest::Immediate) = self.rx.recv().await {
            if let Err(e) = self.sync_once().await {
                tracing::error!("Sync run failed: {}", e);
            }
        }
        tracing::debug!("Sync worker stopped: all requesters dropped");
    }

    /// One synchronization run: fetch, normalize, upsert, prune.
    pub async fn sync_once(&self) -> SyncResult<()> {
        let source = self.source.clone();
        let mut records = tokio::task::spawn_blocking(move || source.fetch())
            .await
            .map_err(|e| SyncError::source(e.to_string()))??;

        // Hold the date invariant regardless of what the source delivered.
        for record in &mut records {
            record.date = date::normalize_date(record.date);
        }

        let fetched = records.len();
        self.client
            .upsert_all(records)
            .await
            .map_err(|e| SyncError::storage(e.to_string()))?;

        // Retention: drop every day before the current one.
        let pruned = self
            .client
            .delete_before(date::normalized_utc_now())
            .await
            .map_err(|e| SyncError::storage(e.to_string()))?;

        tracing::info!("Sync complete: {} records upserted, {} pruned", fetched, pruned);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use sunshine_data::date::DAY_IN_MILLIS;
    use sunshine_data::{SqliteWeatherStore, WeatherContract, WeatherRecord};

    struct FixedForecast {
        records: Vec<WeatherRecord>,
    }

    impl ForecastSource for FixedForecast {
        fn fetch(&self) -> SyncResult<Vec<WeatherRecord>> {
            Ok(self.records.clone())
        }
    }

    struct FlakyForecast {
        calls: AtomicUsize,
        records: Vec<WeatherRecord>,
    }

    impl ForecastSource for FlakyForecast {
        fn fetch(&self) -> SyncResult<Vec<WeatherRecord>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(SyncError::source("backend unavailable"))
            } else {
                Ok(self.records.clone())
            }
        }
    }

    fn record(date: i64, weather_id: i64) -> WeatherRecord {
        WeatherRecord {
            date,
            weather_id,
            min_temp: 2.0,
            max_temp: 8.0,
            humidity: 70.0,
            pressure: 1012.0,
            wind_speed: 6.0,
            degrees: 45,
        }
    }

    fn client() -> WeatherClient {
        let store = SqliteWeatherStore::in_memory().expect("open store");
        WeatherClient::new(store)
    }

    #[tokio::test]
    async fn sync_normalizes_upserts_and_prunes() {
        let today = date::normalized_utc_now();
        // One stale day, plus today delivered with a time-of-day component.
        let source = Arc::new(FixedForecast {
            records: vec![
                record(today - DAY_IN_MILLIS, 600),
                record(today + 13 * 60 * 60 * 1000, 800),
                record(today + DAY_IN_MILLIS, 500),
            ],
        });
        let client = client();
        let (_requester, worker) = SyncWorker::new(source, client.clone());

        worker.sync_once().await.expect("sync");

        let forecast = client
            .query(WeatherContract::selection_from(today))
            .await
            .expect("query");
        let dates: Vec<i64> = forecast.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![today, today + DAY_IN_MILLIS]);
        // The stale day was pruned.
        assert_eq!(client.count().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn worker_drains_requests_until_requesters_drop() {
        let today = date::normalized_utc_now();
        let source = Arc::new(FixedForecast {
            records: vec![record(today, 800)],
        });
        let client = client();
        let (requester, worker) = SyncWorker::new(source, client.clone());

        let handle = tokio::spawn(worker.run());
        requester.start_immediate_sync();
        drop(requester);

        handle.await.expect("worker task");
        let found = client.record_for_date(today).await.expect("query");
        assert_eq!(found.map(|r| r.weather_id), Some(800));
    }

    #[tokio::test]
    async fn failed_run_does_not_stop_the_worker() {
        let today = date::normalized_utc_now();
        let source = Arc::new(FlakyForecast {
            calls: AtomicUsize::new(0),
            records: vec![record(today, 800)],
        });
        let client = client();
        let (requester, worker) = SyncWorker::new(source, client.clone());

        let handle = tokio::spawn(worker.run());
        requester.start_immediate_sync();
        requester.start_immediate_sync();
        drop(requester);
        handle.await.expect("worker task");

        // First request failed, second succeeded.
        assert_eq!(client.count().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn trigger_without_worker_is_silent() {
        let source = Arc::new(FixedForecast { records: vec![] });
        let (requester, worker) = SyncWorker::new(source, client());
        drop(worker);

        // Must not panic or block.
        requester.start_immediate_sync();
    }
}
