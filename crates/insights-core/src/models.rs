use serde::{Deserialize, Serialize};

use crate::fields::UtilityField;

/// Powertrain classification read from the electric-vehicle-type column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Powertrain {
    /// Pure battery electric vehicle.
    BatteryElectric,
    /// Plug-in hybrid with both a battery and a combustion engine.
    PlugInHybrid,
    /// Any label outside the closed BEV/PHEV set, preserved verbatim.
    Other(String),
}

impl Powertrain {
    /// Canonical dataset label for battery electric vehicles.
    pub const BEV_LABEL: &'static str = "Battery Electric Vehicle (BEV)";
    /// Canonical dataset label for plug-in hybrids.
    pub const PHEV_LABEL: &'static str = "Plug-in Hybrid Electric Vehicle (PHEV)";

    /// Classify a raw cell value.
    ///
    /// Only the two exact dataset labels (after trimming) map to the tagged
    /// variants. Every other value is carried through unchanged in `Other`,
    /// so an unrecognised type string is never silently counted as BEV or
    /// PHEV.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            Self::BEV_LABEL => Self::BatteryElectric,
            Self::PHEV_LABEL => Self::PlugInHybrid,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Whether this is a pure battery electric vehicle.
    pub fn is_bev(&self) -> bool {
        matches!(self, Self::BatteryElectric)
    }

    /// Whether this is a plug-in hybrid.
    pub fn is_phev(&self) -> bool {
        matches!(self, Self::PlugInHybrid)
    }

    /// The dataset label for this powertrain (the preserved raw string for
    /// `Other`).
    pub fn label(&self) -> &str {
        match self {
            Self::BatteryElectric => Self::BEV_LABEL,
            Self::PlugInHybrid => Self::PHEV_LABEL,
            Self::Other(raw) => raw,
        }
    }
}

impl Default for Powertrain {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

/// One vehicle registration row from the source dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Masked vehicle identification number (first 10 characters).
    #[serde(default)]
    pub vin: String,
    /// Registration county.
    #[serde(default)]
    pub county: String,
    /// Registration city.
    #[serde(default)]
    pub city: String,
    /// Registration state code.
    #[serde(default)]
    pub state: String,
    /// Registration postal code.
    #[serde(default)]
    pub postal_code: String,
    /// Vehicle model year; 0 when the source value was absent or unparseable.
    #[serde(default)]
    pub model_year: u16,
    /// Manufacturer name.
    #[serde(default)]
    pub make: String,
    /// Model name.
    #[serde(default)]
    pub model: String,
    /// Powertrain classification.
    #[serde(default)]
    pub powertrain: Powertrain,
    /// Clean-alternative-fuel eligibility text, kept opaque.
    #[serde(default)]
    pub cafv_eligibility: String,
    /// EPA electric range in miles; 0 means unknown.
    #[serde(default)]
    pub electric_range: u32,
    /// Base manufacturer suggested retail price in dollars; 0 means unknown.
    #[serde(default)]
    pub base_msrp: u32,
    /// State legislative district number; 0 when absent.
    #[serde(default)]
    pub legislative_district: u32,
    /// Department of Licensing vehicle identifier.
    #[serde(default)]
    pub dol_vehicle_id: String,
    /// Point geometry text for the registration location, kept opaque.
    #[serde(default)]
    pub vehicle_location: String,
    /// Serving electric utilities, `||`-separated when more than one.
    #[serde(default)]
    pub electric_utility: String,
    /// 2020 census tract identifier.
    #[serde(default)]
    pub census_tract: String,
}

impl VehicleRecord {
    /// Whether the electric range value is usable for range statistics.
    pub fn has_known_range(&self) -> bool {
        self.electric_range > 0
    }

    /// Whether the model year value is usable for year-keyed statistics.
    pub fn has_known_year(&self) -> bool {
        self.model_year > 0
    }

    /// Individual serving utilities split out of the multi-valued cell.
    pub fn utilities(&self) -> Vec<&str> {
        UtilityField::split(&self.electric_utility)
    }
}

/// Vehicle count for one county, as a share of all records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyDistribution {
    /// County name.
    pub name: String,
    /// Number of registered vehicles in the county.
    pub count: usize,
    /// Share of the full record set, in percent (2 decimals).
    pub percentage: f64,
}

/// Registration counts for one model year, split by powertrain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyTrend {
    /// Model year.
    pub year: u16,
    /// All vehicles of this model year.
    pub total: usize,
    /// Battery electric vehicles of this model year.
    pub bev: usize,
    /// Plug-in hybrids of this model year.
    pub phev: usize,
}

/// Vehicle count and average range for one manufacturer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerDistribution {
    /// Manufacturer name.
    pub name: String,
    /// Number of vehicles made by this manufacturer.
    pub count: usize,
    /// Share of the full record set, in percent (2 decimals).
    pub percentage: f64,
    /// Mean electric range in miles over this make's known-range vehicles
    /// (2 decimals), 0.0 when none have a known range.
    pub avg_range: f64,
}

/// Popularity entry for one (make, model) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRanking {
    /// Manufacturer name.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Number of vehicles of this make and model.
    pub count: usize,
    /// Mean electric range in miles over the known-range subset (2 decimals).
    pub avg_range: f64,
    /// Mean model year over the known-year subset (2 decimals).
    pub avg_year: f64,
}

/// Vehicle count for one fixed electric-range interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBucket {
    /// Interval label, e.g. `"151-200"` or `"301+"`.
    pub label: String,
    /// Known-range vehicles falling inside this interval.
    pub count: usize,
    /// Share of all known-range vehicles, in percent (2 decimals).
    pub percentage: f64,
}

/// Vehicle count for one serving electric utility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityDistribution {
    /// Utility name.
    pub name: String,
    /// Number of vehicles served by this utility.
    pub count: usize,
    /// Share of the full record set, in percent (2 decimals).
    pub percentage: f64,
}

/// Headline figures for the whole record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Total number of registration records.
    pub total_vehicles: usize,
    /// Mean electric range in whole miles over known-range vehicles.
    pub avg_electric_range: u32,
    /// Battery electric share of all vehicles, in whole percent.
    pub bev_percentage: u32,
    /// Plug-in hybrid share of all vehicles, in whole percent.
    pub phev_percentage: u32,
    /// County with the most registrations (empty when no records).
    pub top_county: String,
    /// Manufacturer with the most registrations (empty when no records).
    pub top_make: String,
    /// Smallest known model year, 0 when none are known.
    pub earliest_year: u16,
    /// Largest known model year, 0 when none are known.
    pub latest_year: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Powertrain ─────────────────────────────────────────────────────────

    #[test]
    fn test_powertrain_parse_bev() {
        assert_eq!(
            Powertrain::parse("Battery Electric Vehicle (BEV)"),
            Powertrain::BatteryElectric
        );
    }

    #[test]
    fn test_powertrain_parse_phev() {
        assert_eq!(
            Powertrain::parse("Plug-in Hybrid Electric Vehicle (PHEV)"),
            Powertrain::PlugInHybrid
        );
    }

    #[test]
    fn test_powertrain_parse_trims_whitespace() {
        assert_eq!(
            Powertrain::parse("  Battery Electric Vehicle (BEV)  "),
            Powertrain::BatteryElectric
        );
    }

    #[test]
    fn test_powertrain_parse_unknown_preserved() {
        let p = Powertrain::parse("Fuel Cell Electric Vehicle (FCEV)");
        assert_eq!(
            p,
            Powertrain::Other("Fuel Cell Electric Vehicle (FCEV)".to_string())
        );
        assert!(!p.is_bev());
        assert!(!p.is_phev());
    }

    #[test]
    fn test_powertrain_parse_empty() {
        assert_eq!(Powertrain::parse(""), Powertrain::Other(String::new()));
    }

    #[test]
    fn test_powertrain_predicates() {
        assert!(Powertrain::BatteryElectric.is_bev());
        assert!(!Powertrain::BatteryElectric.is_phev());
        assert!(Powertrain::PlugInHybrid.is_phev());
        assert!(!Powertrain::PlugInHybrid.is_bev());
    }

    #[test]
    fn test_powertrain_labels() {
        assert_eq!(Powertrain::BatteryElectric.label(), Powertrain::BEV_LABEL);
        assert_eq!(Powertrain::PlugInHybrid.label(), Powertrain::PHEV_LABEL);
        assert_eq!(Powertrain::Other("NONE".to_string()).label(), "NONE");
        // Parsing a canonical label and reading it back is lossless.
        assert_eq!(
            Powertrain::parse(Powertrain::PHEV_LABEL).label(),
            Powertrain::PHEV_LABEL
        );
    }

    // ── VehicleRecord ──────────────────────────────────────────────────────

    #[test]
    fn test_record_default_is_fully_unknown() {
        let rec = VehicleRecord::default();
        assert!(!rec.has_known_range());
        assert!(!rec.has_known_year());
        assert!(rec.utilities().is_empty());
        assert_eq!(rec.powertrain, Powertrain::Other(String::new()));
    }

    #[test]
    fn test_record_known_range_and_year() {
        let rec = VehicleRecord {
            model_year: 2021,
            electric_range: 200,
            ..Default::default()
        };
        assert!(rec.has_known_range());
        assert!(rec.has_known_year());
    }

    #[test]
    fn test_record_utilities_multi_valued() {
        let rec = VehicleRecord {
            electric_utility: "PUGET SOUND ENERGY INC||CITY OF TACOMA - (WA)".to_string(),
            ..Default::default()
        };
        assert_eq!(
            rec.utilities(),
            vec!["PUGET SOUND ENERGY INC", "CITY OF TACOMA - (WA)"]
        );
    }

    #[test]
    fn test_record_serde_round_trip() {
        let rec = VehicleRecord {
            vin: "5YJ3E1EB4L".to_string(),
            county: "King".to_string(),
            city: "Seattle".to_string(),
            state: "WA".to_string(),
            model_year: 2020,
            make: "TESLA".to_string(),
            model: "MODEL 3".to_string(),
            powertrain: Powertrain::BatteryElectric,
            electric_range: 322,
            ..Default::default()
        };
        let json = serde_json::to_string(&rec).unwrap();
        let back: VehicleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.vin, rec.vin);
        assert_eq!(back.model_year, 2020);
        assert_eq!(back.powertrain, Powertrain::BatteryElectric);
        assert_eq!(back.electric_range, 322);
    }
}
