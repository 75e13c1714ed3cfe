//! The query engine owning the loaded record set.
//!
//! A [`RegistryEngine`] is loaded once from a CSV source and then queried
//! any number of times. Loading takes `&mut self`, so the borrow checker
//! rules out a query observing a half-built record set; queries take
//! `&self` and recompute from the live records on every call.

use std::io::Read;
use std::path::Path;

use chrono::Utc;
use insights_core::error::Result;
use insights_core::models::{
    CountyDistribution, DashboardSummary, ManufacturerDistribution, ModelRanking, RangeBucket,
    UtilityDistribution, VehicleRecord, YearlyTrend,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::RegistryAggregator;
use crate::reader::{self, LoadReport};

// ── LoadMetadata ──────────────────────────────────────────────────────────────

/// Metadata recorded for the most recent successful load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadMetadata {
    /// Origin of the records (file path or reader label).
    pub source: String,
    /// ISO-8601 timestamp when the load completed.
    pub generated_at: String,
    /// Rows successfully converted into records.
    pub rows_parsed: usize,
    /// Structurally malformed rows dropped during parsing.
    pub rows_skipped: usize,
    /// Wall-clock seconds spent reading and parsing the source.
    pub load_time_seconds: f64,
}

// ── RegistryEngine ────────────────────────────────────────────────────────────

/// In-memory, load-once / query-many engine over vehicle registrations.
#[derive(Debug, Default)]
pub struct RegistryEngine {
    records: Vec<VehicleRecord>,
    last_load: Option<LoadMetadata>,
}

impl RegistryEngine {
    /// Empty engine. Every query returns zero-valued or empty results until
    /// a load succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine over an already-materialised record set (tests, embedding).
    pub fn from_records(records: Vec<VehicleRecord>) -> Self {
        Self {
            records,
            last_load: None,
        }
    }

    /// Load (or reload) the record set from a CSV file.
    ///
    /// The source is parsed into a fresh buffer first and the held record
    /// set is replaced in one assignment, so a failed load leaves the
    /// previous records untouched. Returns the number of parsed rows.
    pub fn load_from_path(&mut self, path: &Path) -> Result<usize> {
        let started = std::time::Instant::now();
        let (records, report) = reader::load_records(path)?;
        self.install(records, report, path.display().to_string(), started);
        Ok(self.records.len())
    }

    /// Load (or reload) the record set from any reader, labelled `source`.
    pub fn load_from_reader<R: Read>(&mut self, source: &str, input: R) -> Result<usize> {
        let started = std::time::Instant::now();
        let (records, report) = reader::read_records(input);
        self.install(records, report, source.to_string(), started);
        Ok(self.records.len())
    }

    /// Raw read-only view of the loaded records.
    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    /// Whether a source load has completed since construction.
    pub fn is_loaded(&self) -> bool {
        self.last_load.is_some()
    }

    /// Metadata for the most recent successful load, if any.
    pub fn last_load(&self) -> Option<&LoadMetadata> {
        self.last_load.as_ref()
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Vehicles per county with each county's share of the record set.
    pub fn county_distribution(&self) -> Vec<CountyDistribution> {
        RegistryAggregator::county_distribution(&self.records)
    }

    /// Registrations per model year, split by powertrain.
    pub fn yearly_trend(&self) -> Vec<YearlyTrend> {
        RegistryAggregator::yearly_trend(&self.records)
    }

    /// Vehicles per manufacturer with shares and mean known ranges.
    pub fn manufacturer_distribution(&self) -> Vec<ManufacturerDistribution> {
        RegistryAggregator::manufacturer_distribution(&self.records)
    }

    /// The `limit` most common (make, model) pairs.
    pub fn model_rankings(&self, limit: usize) -> Vec<ModelRanking> {
        RegistryAggregator::model_rankings(&self.records, limit)
    }

    /// Known-range vehicles across the fixed mile intervals.
    pub fn range_distribution(&self) -> Vec<RangeBucket> {
        RegistryAggregator::range_distribution(&self.records)
    }

    /// The ten most common serving utilities.
    pub fn utility_distribution(&self) -> Vec<UtilityDistribution> {
        RegistryAggregator::utility_distribution(&self.records)
    }

    /// Headline figures for the whole record set.
    pub fn dashboard_summary(&self) -> DashboardSummary {
        RegistryAggregator::dashboard_summary(&self.records)
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Swap in a freshly parsed record set and record the load metadata.
    fn install(
        &mut self,
        records: Vec<VehicleRecord>,
        report: LoadReport,
        source: String,
        started: std::time::Instant,
    ) {
        debug!(
            "Installing {} records from {} ({} skipped)",
            records.len(),
            source,
            report.rows_skipped
        );
        self.records = records;
        self.last_load = Some(LoadMetadata {
            source,
            generated_at: Utc::now().to_rfc3339(),
            rows_parsed: report.rows_parsed,
            rows_skipped: report.rows_skipped,
            load_time_seconds: started.elapsed().as_secs_f64(),
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
