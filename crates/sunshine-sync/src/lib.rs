//! Background synchronization for Sunshine
//!
//! A fire-and-forget trigger plus the worker that services it. The worker
//! pulls a forecast from a [`ForecastSource`] (the external collaborator
//! that actually talks to a weather backend), writes it into the local
//! cache, and applies the retention policy.

pub mod source;
pub mod worker;

pub use source::{ForecastSource, SyncError, SyncResult};
pub use worker::{SyncRequest, SyncRequester, SyncWorker};
