/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::format_count;
///
/// assert_eq!(format_count(42), "42");
/// assert_eq!(format_count(1_234), "1,234");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Format a percentage value with two decimal places and a percent sign.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::format_percent;
///
/// assert_eq!(format_percent(66.67), "66.67%");
/// assert_eq!(format_percent(0.0), "0.00%");
/// assert_eq!(format_percent(100.0), "100.00%");
/// ```
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Format an electric range as whole miles with a unit suffix.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::format_miles;
///
/// assert_eq!(format_miles(250), "250 mi");
/// assert_eq!(format_miles(0), "0 mi");
/// ```
pub fn format_miles(value: u32) -> String {
    format!("{} mi", value)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of a digit string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, ch) in digits.char_indices() {
        if i != 0 && i % 3 == offset {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
