//! SQLite-based weather record storage.
//!
//! This module provides `SqliteWeatherStore`, the local store behind the
//! weather contract. One row per UTC day, keyed by the normalized date;
//! a sync run replaces the row for any day it re-delivers.

use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;

use crate::contract::Selection;
use crate::types::{DataError, WeatherRecord};

const SELECT_COLUMNS: &str =
    "date, weather_id, min, max, humidity, pressure, wind, degrees";

/// SQLite-based weather record store.
pub struct SqliteWeatherStore {
    conn: Connection,
}

impl SqliteWeatherStore {
    /// Create a new store at the given path.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns [`DataError::Database`] if the file cannot be opened or the
    /// schema cannot be created.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store. Used by tests and ephemeral sessions.
    ///
    /// # Errors
    /// Returns [`DataError::Database`] if the schema cannot be created.
    pub fn in_memory() -> Result<Self, DataError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    ///
    /// `date INTEGER PRIMARY KEY` enforces the one-row-per-day invariant;
    /// dates are normalized before they reach this layer.
    fn init_schema(&self) -> Result<(), DataError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS weather (
                date INTEGER PRIMARY KEY,
                weather_id INTEGER NOT NULL,
                min REAL NOT NULL,
                max REAL NOT NULL,
                humidity REAL NOT NULL,
                pressure REAL NOT NULL,
                wind REAL NOT NULL,
                degrees INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Convert a database row to a WeatherRecord.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<WeatherRecord> {
        Ok(WeatherRecord {
            date: row.get(0)?,
            weather_id: row.get(1)?,
            min_temp: row.get(2)?,
            max_temp: row.get(3)?,
            humidity: row.get(4)?,
            pressure: row.get(5)?,
            wind_speed: row.get(6)?,
            degrees: row.get(7)?,
        })
    }

    /// Insert a record, replacing any existing row for the same day.
    pub fn upsert(&self, record: &WeatherRecord) -> Result<(), DataError> {
        self.conn.execute(
            r#"
            INSERT INTO weather (date, weather_id, min, max, humidity, pressure, wind, degrees)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(date) DO UPDATE SET
                weather_id = excluded.weather_id,
                min = excluded.min,
                max = excluded.max,
                humidity = excluded.humidity,
                pressure = excluded.pressure,
                wind = excluded.wind,
                degrees = excluded.degrees
            "#,
            params![
                record.date,
                record.weather_id,
                record.min_temp,
                record.max_temp,
                record.humidity,
                record.pressure,
                record.wind_speed,
                record.degrees,
            ],
        )?;
        Ok(())
    }

    /// Upsert a batch of records inside a single transaction.
    pub fn upsert_all(&mut self, records: &[WeatherRecord]) -> Result<(), DataError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO weather (date, weather_id, min, max, humidity, pressure, wind, degrees)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(date) DO UPDATE SET
                    weather_id = excluded.weather_id,
                    min = excluded.min,
                    max = excluded.max,
                    humidity = excluded.humidity,
                    pressure = excluded.pressure,
                    wind = excluded.wind,
                    degrees = excluded.degrees
                "#,
            )?;
            for record in records {
                stmt.execute(params![
                    record.date,
                    record.weather_id,
                    record.min_temp,
                    record.max_temp,
                    record.humidity,
                    record.pressure,
                    record.wind_speed,
                    record.degrees,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!("Upserted {} weather records", records.len());
        Ok(())
    }

    /// Get the record for a single day, by normalized date.
    ///
    /// Returns `Ok(None)` when no row exists for that day; absence is not an
    /// error at this layer.
    pub fn record_for_date(&self, date: i64) -> Result<Option<WeatherRecord>, DataError> {
        let sql = format!("SELECT {} FROM weather WHERE date = ?1", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![date], Self::row_to_record)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Query records matching a contract selection, ordered by date.
    pub fn query(&self, selection: &Selection) -> Result<Vec<WeatherRecord>, DataError> {
        let sql = format!(
            "SELECT {} FROM weather WHERE {} ORDER BY date ASC",
            SELECT_COLUMNS, selection.clause
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(selection.args.iter()), Self::row_to_record)?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Delete rows dated strictly before the given normalized date.
    ///
    /// Returns the number of deleted rows. This is the retention path: the
    /// sync worker calls it after each successful run.
    pub fn delete_before(&self, date: i64) -> Result<usize, DataError> {
        let deleted = self
            .conn
            .execute("DELETE FROM weather WHERE date < ?1", params![date])?;
        if deleted > 0 {
            tracing::debug!("Deleted {} weather records before {}", deleted, date);
        }
        Ok(deleted)
    }

    /// Number of stored rows.
    pub fn count(&self) -> Result<usize, DataError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM weather", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::WeatherContract;
    use crate::date::DAY_IN_MILLIS;

    fn record(date: i64, weather_id: i64) -> WeatherRecord {
        WeatherRecord {
            date,
            weather_id,
            min_temp: 3.0,
            max_temp: 11.0,
            humidity: 72.0,
            pressure: 1015.0,
            wind_speed: 5.5,
            degrees: 180,
        }
    }

    fn store() -> SqliteWeatherStore {
        match SqliteWeatherStore::in_memory() {
            Ok(s) => s,
            Err(e) => panic!("failed to open in-memory store: {}", e),
        }
    }

    #[test]
    fn test_upsert_and_point_query() {
        let store = store();
        let day = 1_579_046_400_000;
        assert!(store.upsert(&record(day, 800)).is_ok());

        let found = store.record_for_date(day).ok().flatten();
        assert_eq!(found.map(|r| r.weather_id), Some(800));
    }

    #[test]
    fn test_point_query_missing_day_is_none() {
        let store = store();
        let found = store.record_for_date(0);
        assert!(matches!(found, Ok(None)));
    }

    #[test]
    fn test_upsert_replaces_same_day() {
        let store = store();
        let day = 1_579_046_400_000;
        assert!(store.upsert(&record(day, 800)).is_ok());
        assert!(store.upsert(&record(day, 500)).is_ok());

        assert_eq!(store.count().ok(), Some(1));
        let found = store.record_for_date(day).ok().flatten();
        assert_eq!(found.map(|r| r.weather_id), Some(500));
    }

    #[test]
    fn test_query_from_date_is_ordered_and_inclusive() {
        let mut store = store();
        let day = 1_579_046_400_000;
        let records = vec![
            record(day + DAY_IN_MILLIS, 500),
            record(day - DAY_IN_MILLIS, 600),
            record(day, 800),
        ];
        assert!(store.upsert_all(&records).is_ok());

        // Selection normalizes a mid-day timestamp down to `day`.
        let selection = WeatherContract::selection_from(day + DAY_IN_MILLIS / 2);
        let found = store.query(&selection).unwrap_or_default();
        let dates: Vec<i64> = found.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day, day + DAY_IN_MILLIS]);
    }

    #[test]
    fn test_delete_before_retains_today_onwards() {
        let mut store = store();
        let day = 1_579_046_400_000;
        let records = vec![
            record(day - 2 * DAY_IN_MILLIS, 800),
            record(day - DAY_IN_MILLIS, 800),
            record(day, 800),
            record(day + DAY_IN_MILLIS, 800),
        ];
        assert!(store.upsert_all(&records).is_ok());

        assert_eq!(store.delete_before(day).ok(), Some(2));
        assert_eq!(store.count().ok(), Some(2));
        assert!(matches!(store.record_for_date(day), Ok(Some(_))));
    }
}
