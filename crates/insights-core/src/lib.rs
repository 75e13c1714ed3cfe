//! Core domain layer for EV Insights.
//!
//! Defines the vehicle registration record model, the aggregate result
//! types produced by queries, shared numeric helpers, error types and
//! persisted CLI settings. Everything here is independent of how records
//! are read from disk.

pub mod error;
pub mod fields;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;
