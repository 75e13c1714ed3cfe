use tracing::debug;

// ── NumericField ──────────────────────────────────────────────────────────────

/// Best-effort numeric conversions for positional dataset cells.
pub struct NumericField;

impl NumericField {
    /// Parse a `u16` cell (model year). Empty or unparseable input → 0.
    pub fn parse_u16(raw: &str) -> u16 {
        Self::parse_or_zero(raw)
    }

    /// Parse a `u32` cell (range, MSRP, district). Empty or unparseable → 0.
    pub fn parse_u32(raw: &str) -> u32 {
        Self::parse_or_zero(raw)
    }

    fn parse_or_zero<T>(raw: &str) -> T
    where
        T: std::str::FromStr + Default,
    {
        let trimmed = raw.trim();
        match trimmed.parse() {
            Ok(value) => value,
            Err(_) => {
                if !trimmed.is_empty() {
                    debug!(
                        "NumericField: defaulting unparseable value \"{}\" to 0",
                        trimmed
                    );
                }
                T::default()
            }
        }
    }
}

// ── UtilityField ──────────────────────────────────────────────────────────────

/// Splits the multi-valued electric-utility cell.
pub struct UtilityField;

impl UtilityField {
    /// Separator between utility names within a single cell.
    pub const SEPARATOR: &'static str = "||";

    /// Split a raw cell into individual utility names.
    ///
    /// Each part is trimmed; empty parts (from leading, trailing or doubled
    /// separators) are dropped. A cell without the separator yields at most
    /// one name.
    pub fn split(raw: &str) -> Vec<&str> {
        raw.split(Self::SEPARATOR)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
