//! Local weather data layer for Sunshine
//!
//! Defines the naming contract for cached weather records (table, columns,
//! record URIs, date selections), the SQLite store behind it, and an async
//! client wrapper for use from tokio tasks.

pub mod client;
pub mod contract;
pub mod date;
pub mod store;
pub mod types;

pub use client::WeatherClient;
pub use contract::{Selection, WeatherContract};
pub use store::SqliteWeatherStore;
pub use types::{DataError, WeatherCondition, WeatherRecord};
