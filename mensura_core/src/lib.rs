#![forbid(unsafe_code)]

//! Core domain model and trend pipeline for the Mensura measurement tracker.
//!
//! This crate provides:
//! - Domain types (records, measures, series)
//! - Input validation
//! - Persistence (JSONL log, CSV export/import)
//! - Trend views (raw, weekly, rolling) and the weight forecast
//! - The shared-secret access gate

pub mod types;
pub mod error;
pub mod validation;
pub mod config;
pub mod logging;
pub mod store;
pub mod csv_io;
pub mod trend;
pub mod forecast;
pub mod report;
pub mod access;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{JsonlLog, MeasurementLog};
pub use trend::{raw_series, rolling_mean, weekly_mean};
pub use forecast::{forecast_weight, Forecast, ForecastPoint, LinearFit, PointKind};
pub use report::{ForecastView, TrendReport, TrendSettings};
pub use access::{AccessGate, Session};
