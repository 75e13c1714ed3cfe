//! Aggregation queries over the in-memory vehicle record set.
//!
//! Every query is a pure fold over `&[VehicleRecord]`: no shared state, no
//! caching, and a deterministic output ordering for identical input.

use std::collections::{BTreeMap, HashMap};

use insights_core::models::{
    CountyDistribution, DashboardSummary, ManufacturerDistribution, ModelRanking, RangeBucket,
    UtilityDistribution, VehicleRecord, YearlyTrend,
};
use insights_core::stats;

/// Labels of the fixed electric-range intervals, 50 miles wide, last open.
const RANGE_BUCKET_LABELS: [&str; 7] = [
    "0-50", "51-100", "101-150", "151-200", "201-250", "251-300", "301+",
];

/// Number of utilities reported by [`RegistryAggregator::utility_distribution`].
const TOP_UTILITIES: usize = 10;

// ── GroupAcc ──────────────────────────────────────────────────────────────────

/// Running totals for one grouping key.
#[derive(Debug, Clone, Default)]
struct GroupAcc {
    count: usize,
    range_sum: u64,
    range_count: usize,
    year_sum: u64,
    year_count: usize,
}

impl GroupAcc {
    /// Add a single record to the running totals. Unknown ranges and years
    /// count toward `count` but stay out of the respective sums.
    fn add(&mut self, record: &VehicleRecord) {
        self.count += 1;
        if record.has_known_range() {
            self.range_sum += u64::from(record.electric_range);
            self.range_count += 1;
        }
        if record.has_known_year() {
            self.year_sum += u64::from(record.model_year);
            self.year_count += 1;
        }
    }

    /// Mean range over the known-range subset, 0.0 when the subset is empty.
    fn avg_range(&self) -> f64 {
        stats::mean(self.range_sum, self.range_count)
    }

    /// Mean model year over the known-year subset, 0.0 when empty.
    fn avg_year(&self) -> f64 {
        stats::mean(self.year_sum, self.year_count)
    }
}

// ── RegistryAggregator ────────────────────────────────────────────────────────

/// Stateless helper computing the derived statistical views.
pub struct RegistryAggregator;

impl RegistryAggregator {
    /// Vehicles per county, largest first (ties by name), with each county's
    /// share of the full record set.
    pub fn county_distribution(records: &[VehicleRecord]) -> Vec<CountyDistribution> {
        let counts = Self::count_by_key(records, |r| Self::non_empty(&r.county));
        let total = records.len();

        Self::ranked_counts(counts)
            .into_iter()
            .map(|(name, count)| CountyDistribution {
                name,
                count,
                percentage: stats::percentage(count, total),
            })
            .collect()
    }

    /// Registration counts per model year, ascending, split into BEV and
    /// PHEV shares. Records without a known year are excluded.
    pub fn yearly_trend(records: &[VehicleRecord]) -> Vec<YearlyTrend> {
        let mut by_year: BTreeMap<u16, YearlyTrend> = BTreeMap::new();

        for record in records {
            if !record.has_known_year() {
                continue;
            }
            let entry = by_year
                .entry(record.model_year)
                .or_insert_with(|| YearlyTrend {
                    year: record.model_year,
                    total: 0,
                    bev: 0,
                    phev: 0,
                });
            entry.total += 1;
            if record.powertrain.is_bev() {
                entry.bev += 1;
            } else if record.powertrain.is_phev() {
                entry.phev += 1;
            }
        }

        by_year.into_values().collect()
    }

    /// Vehicles per manufacturer, largest first (ties by name), with each
    /// make's share of the full record set and its mean known range.
    pub fn manufacturer_distribution(records: &[VehicleRecord]) -> Vec<ManufacturerDistribution> {
        let mut by_make: HashMap<String, GroupAcc> = HashMap::new();
        for record in records {
            if record.make.is_empty() {
                continue;
            }
            by_make.entry(record.make.clone()).or_default().add(record);
        }

        let total = records.len();
        let mut entries: Vec<(String, GroupAcc)> = by_make.into_iter().collect();
        entries.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));

        entries
            .into_iter()
            .map(|(name, acc)| ManufacturerDistribution {
                name,
                count: acc.count,
                percentage: stats::percentage(acc.count, total),
                avg_range: acc.avg_range(),
            })
            .collect()
    }

    /// The `limit` most common (make, model) pairs, largest first (ties by
    /// make then model), with mean range and mean model year over each
    /// pair's known subsets.
    pub fn model_rankings(records: &[VehicleRecord], limit: usize) -> Vec<ModelRanking> {
        let mut by_model: HashMap<(String, String), GroupAcc> = HashMap::new();
        for record in records {
            if record.make.is_empty() || record.model.is_empty() {
                continue;
            }
            by_model
                .entry((record.make.clone(), record.model.clone()))
                .or_default()
                .add(record);
        }

        let mut entries: Vec<((String, String), GroupAcc)> = by_model.into_iter().collect();
        entries.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(limit);

        entries
            .into_iter()
            .map(|((make, model), acc)| ModelRanking {
                make,
                model,
                count: acc.count,
                avg_range: acc.avg_range(),
                avg_year: acc.avg_year(),
            })
            .collect()
    }

    /// Known-range vehicles grouped into the fixed mile intervals, ascending.
    ///
    /// The percentage denominator is the known-range subset, not the full
    /// record set; intervals with no vehicles are omitted.
    pub fn range_distribution(records: &[VehicleRecord]) -> Vec<RangeBucket> {
        let mut counts = [0usize; RANGE_BUCKET_LABELS.len()];
        let mut known = 0usize;

        for record in records {
            if !record.has_known_range() {
                continue;
            }
            known += 1;
            let idx =
                (((record.electric_range - 1) / 50) as usize).min(RANGE_BUCKET_LABELS.len() - 1);
            counts[idx] += 1;
        }

        RANGE_BUCKET_LABELS
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(label, count)| RangeBucket {
                label: label.to_string(),
                count,
                percentage: stats::percentage(count, known),
            })
            .collect()
    }

    /// The ten most common serving utilities, largest first (ties by name).
    ///
    /// A record served by several utilities counts once toward each; the
    /// percentage denominator stays the full record count, so the shares of
    /// a multi-utility fleet can legitimately sum past 100.
    pub fn utility_distribution(records: &[VehicleRecord]) -> Vec<UtilityDistribution> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in records {
            for utility in record.utilities() {
                *counts.entry(utility.to_string()).or_default() += 1;
            }
        }

        let total = records.len();
        let mut entries = Self::ranked_counts(counts);
        entries.truncate(TOP_UTILITIES);

        entries
            .into_iter()
            .map(|(name, count)| UtilityDistribution {
                name,
                count,
                percentage: stats::percentage(count, total),
            })
            .collect()
    }

    /// Headline figures across the whole record set.
    pub fn dashboard_summary(records: &[VehicleRecord]) -> DashboardSummary {
        let total = records.len();

        let mut bev = 0usize;
        let mut phev = 0usize;
        let mut range_sum = 0u64;
        let mut range_count = 0usize;
        let mut earliest_year = 0u16;
        let mut latest_year = 0u16;

        for record in records {
            if record.powertrain.is_bev() {
                bev += 1;
            } else if record.powertrain.is_phev() {
                phev += 1;
            }
            if record.has_known_range() {
                range_sum += u64::from(record.electric_range);
                range_count += 1;
            }
            if record.has_known_year() {
                if earliest_year == 0 || record.model_year < earliest_year {
                    earliest_year = record.model_year;
                }
                latest_year = latest_year.max(record.model_year);
            }
        }

        let top_county = Self::county_distribution(records)
            .into_iter()
            .next()
            .map(|c| c.name)
            .unwrap_or_default();
        let top_make = Self::manufacturer_distribution(records)
            .into_iter()
            .next()
            .map(|m| m.name)
            .unwrap_or_default();

        DashboardSummary {
            total_vehicles: total,
            avg_electric_range: stats::whole_mean(range_sum, range_count),
            bev_percentage: stats::whole_percentage(bev, total),
            phev_percentage: stats::whole_percentage(phev, total),
            top_county,
            top_make,
            earliest_year,
            latest_year,
        }
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Count records per key, skipping records whose key is `None`.
    fn count_by_key(
        records: &[VehicleRecord],
        key_fn: impl Fn(&VehicleRecord) -> Option<String>,
    ) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in records {
            if let Some(key) = key_fn(record) {
                *counts.entry(key).or_default() += 1;
            }
        }
        counts
    }

    /// Sort (key, count) pairs by count descending, then key ascending.
    fn ranked_counts(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// `Some(owned)` for a non-empty grouping key.
    fn non_empty(value: &str) -> Option<String> {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
