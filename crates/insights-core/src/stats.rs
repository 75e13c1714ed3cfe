/// Round a value to two decimal places.
///
/// # Examples
///
/// ```
/// use insights_core::stats::round2;
///
/// assert_eq!(round2(66.666_666), 66.67);
/// assert_eq!(round2(0.0), 0.0);
/// ```
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of `part` in `whole` as a percentage, rounded to two decimals.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use insights_core::stats::percentage;
///
/// assert_eq!(percentage(2, 3), 66.67);
/// assert_eq!(percentage(0, 100), 0.0);
/// assert_eq!(percentage(5, 0), 0.0);
/// ```
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2((part as f64 / whole as f64) * 100.0)
}

/// Share of `part` in `whole` as a whole-number percentage.
///
/// Returns `0` if `whole` is zero.
///
/// # Examples
///
/// ```
/// use insights_core::stats::whole_percentage;
///
/// assert_eq!(whole_percentage(2, 3), 67);
/// assert_eq!(whole_percentage(1, 3), 33);
/// assert_eq!(whole_percentage(5, 0), 0);
/// ```
pub fn whole_percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Arithmetic mean of `sum` over `count` items, rounded to two decimals.
///
/// Returns `0.0` if `count` is zero.
///
/// # Examples
///
/// ```
/// use insights_core::stats::mean;
///
/// assert_eq!(mean(500, 2), 250.0);
/// assert_eq!(mean(811, 3), 270.33);
/// assert_eq!(mean(0, 0), 0.0);
/// ```
pub fn mean(sum: u64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round2(sum as f64 / count as f64)
}

/// Arithmetic mean rounded to the nearest whole number.
///
/// Returns `0` if `count` is zero.
///
/// # Examples
///
/// ```
/// use insights_core::stats::whole_mean;
///
/// assert_eq!(whole_mean(500, 2), 250);
/// assert_eq!(whole_mean(811, 3), 270);
/// assert_eq!(whole_mean(0, 0), 0);
/// ```
pub fn whole_mean(sum: u64, count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u32
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── round2 ───────────────────────────────────────────────────────────────

    #[test]
    fn test_round2_truncating_repeat() {
        assert_eq!(round2(2.0 / 3.0 * 100.0), 66.67);
        assert_eq!(round2(1.0 / 3.0 * 100.0), 33.33);
    }

    #[test]
    fn test_round2_already_exact() {
        assert_eq!(round2(50.0), 50.0);
        assert_eq!(round2(0.25), 0.25);
    }

    // ── percentage ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentage_two_thirds() {
        assert_eq!(percentage(2, 3), 66.67);
    }

    #[test]
    fn test_percentage_one_third() {
        assert_eq!(percentage(1, 3), 33.33);
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(10, 0), 0.0);
    }

    #[test]
    fn test_percentage_full_share() {
        assert_eq!(percentage(7, 7), 100.0);
    }

    // ── whole_percentage ─────────────────────────────────────────────────────

    #[test]
    fn test_whole_percentage_rounds_to_nearest() {
        assert_eq!(whole_percentage(2, 3), 67);
        assert_eq!(whole_percentage(1, 3), 33);
        assert_eq!(whole_percentage(1, 2), 50);
    }

    #[test]
    fn test_whole_percentage_zero_whole() {
        assert_eq!(whole_percentage(1, 0), 0);
    }

    // ── mean / whole_mean ────────────────────────────────────────────────────

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(500, 2), 250.0);
    }

    #[test]
    fn test_mean_rounds_to_two_decimals() {
        // 811 / 3 = 270.333...
        assert_eq!(mean(811, 3), 270.33);
    }

    #[test]
    fn test_mean_zero_count() {
        assert_eq!(mean(100, 0), 0.0);
    }

    #[test]
    fn test_whole_mean_basic() {
        assert_eq!(whole_mean(500, 2), 250);
    }

    #[test]
    fn test_whole_mean_rounds_half_up() {
        // 501 / 2 = 250.5 → 251
        assert_eq!(whole_mean(501, 2), 251);
    }

    #[test]
    fn test_whole_mean_zero_count() {
        assert_eq!(whole_mean(0, 0), 0);
    }
}
