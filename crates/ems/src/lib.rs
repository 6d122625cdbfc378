//! Employee records, reporting aggregation and export.
//!
//! The crate is split along the data flow of the admin panel: [`records`] owns the data
//! model and the store abstraction, [`reports`] narrows and aggregates records into summary
//! statistics and chart series, [`attendance`] computes per-employee attendance statistics,
//! and [`export`] renders the same datasets to CSV or PDF.

pub mod attendance;
pub mod config;
pub mod error;
pub mod export;
pub mod records;
pub mod reports;
pub mod telemetry;
