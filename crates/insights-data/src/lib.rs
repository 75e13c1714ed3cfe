//! Data layer for EV Insights.
//!
//! Responsible for discovering and parsing CSV registration exports,
//! holding the loaded record set and serving the aggregation queries
//! the report views are built from.

pub mod aggregator;
pub mod engine;
pub mod reader;

pub use insights_core as core;
