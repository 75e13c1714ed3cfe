//! CSV dataset discovery and loading for EV Insights.
//!
//! Reads vehicle registration rows from the 17-column source export and
//! converts them into [`VehicleRecord`] structs for downstream aggregation.

use std::io::Read;
use std::path::{Path, PathBuf};

use insights_core::error::{InsightsError, Result};
use insights_core::fields::NumericField;
use insights_core::models::{Powertrain, VehicleRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Per-load accounting of parsed and dropped rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Rows successfully converted into records.
    pub rows_parsed: usize,
    /// Structurally malformed rows dropped by the CSV parser.
    pub rows_skipped: usize,
}

/// Find all `.csv` files recursively under `data_path`, sorted by path.
pub fn find_csv_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Parse CSV content into vehicle records.
///
/// The header row is discarded. Rows the CSV parser itself rejects (broken
/// quoting, invalid UTF-8) are counted in [`LoadReport::rows_skipped`] and
/// never abort the load. Field-level problems inside a structurally valid
/// row do NOT drop the row; the affected fields take their defaults, so a
/// record with a non-numeric model year is retained with `model_year == 0`.
pub fn read_records<R: Read>(reader: R) -> (Vec<VehicleRecord>, LoadReport) {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records: Vec<VehicleRecord> = Vec::new();
    let mut report = LoadReport::default();

    for row_result in csv_reader.records() {
        match row_result {
            Ok(row) => {
                records.push(record_from_row(&row));
                report.rows_parsed += 1;
            }
            Err(e) => {
                // An I/O failure is not row-local; the iterator would yield
                // it again forever. Stop at the first one.
                if e.is_io_error() {
                    warn!("I/O error while reading rows: {}", e);
                    break;
                }
                report.rows_skipped += 1;
                debug!("Skipping malformed row: {}", e);
            }
        }
    }

    if report.rows_skipped > 0 {
        warn!(
            "Skipped {} malformed rows ({} parsed)",
            report.rows_skipped, report.rows_parsed
        );
    }

    (records, report)
}

/// Load records from a CSV file on disk.
///
/// An unopenable source is the only fatal failure; it maps to
/// [`InsightsError::SourceUnreadable`].
pub fn load_records(path: &Path) -> Result<(Vec<VehicleRecord>, LoadReport)> {
    let file = std::fs::File::open(path).map_err(|source| InsightsError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let (records, report) = read_records(std::io::BufReader::new(file));
    debug!(
        "Loaded {} records from {} ({} skipped)",
        records.len(),
        path.display(),
        report.rows_skipped
    );
    Ok((records, report))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Convert one structurally valid CSV row into a record.
///
/// Columns are positional. Missing trailing columns and unparseable numeric
/// cells fall back to per-field defaults; columns beyond the 17 known ones
/// are ignored.
fn record_from_row(row: &csv::StringRecord) -> VehicleRecord {
    let field = |idx: usize| row.get(idx).unwrap_or("").trim();

    VehicleRecord {
        vin: field(0).to_string(),
        county: field(1).to_string(),
        city: field(2).to_string(),
        state: field(3).to_string(),
        postal_code: field(4).to_string(),
        model_year: NumericField::parse_u16(field(5)),
        make: field(6).to_string(),
        model: field(7).to_string(),
        powertrain: Powertrain::parse(field(8)),
        cafv_eligibility: field(9).to_string(),
        electric_range: NumericField::parse_u32(field(10)),
        base_msrp: NumericField::parse_u32(field(11)),
        legislative_district: NumericField::parse_u32(field(12)),
        dol_vehicle_id: field(13).to_string(),
        vehicle_location: field(14).to_string(),
        electric_utility: field(15).to_string(),
        census_tract: field(16).to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
