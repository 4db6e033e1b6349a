//! Preferred-number series.

/// E24 mantissas for one decade.
pub const E24: [f64; 24] = [
    1.0, 1.1, 1.2, 1.3, 1.5, 1.6, 1.8, 2.0, 2.2, 2.4, 2.7, 3.0, 3.3, 3.6, 3.9, 4.3, 4.7, 5.1, 5.6,
    6.2, 6.8, 7.5, 8.2, 9.1,
];

/// Nearest E24 value, rounded to two decimals. Non-positive input gives 0.
///
/// The next decade's 1.0 is a candidate too, so 9.8 kΩ becomes 10 kΩ.
pub fn nearest_e24(value: f64) -> f64 {
    if !(value > 0.0) || !value.is_finite() {
        return 0.0;
    }
    let exponent = value.log10().floor();
    let decade = 10f64.powf(exponent);
    let mantissa = value / decade;

    let nearest = E24
        .iter()
        .copied()
        .chain(std::iter::once(10.0))
        .min_by(|a, b| (a - mantissa).abs().total_cmp(&(b - mantissa).abs()))
        .unwrap_or(1.0);

    (nearest * decade * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_values_unchanged() {
        assert_eq!(nearest_e24(470.0), 470.0);
        assert_eq!(nearest_e24(2200.0), 2200.0);
        assert_eq!(nearest_e24(1.0), 1.0);
    }

    #[test]
    fn test_rounds_to_nearest() {
        assert_eq!(nearest_e24(150.0), 150.0);
        assert_eq!(nearest_e24(165.0), 160.0);
        assert_eq!(nearest_e24(9800.0), 10000.0);
        assert_eq!(nearest_e24(0.0047), 0.0);
        assert_eq!(nearest_e24(0.47), 0.47);
    }

    #[test]
    fn test_non_positive_is_zero() {
        assert_eq!(nearest_e24(0.0), 0.0);
        assert_eq!(nearest_e24(-10.0), 0.0);
        assert_eq!(nearest_e24(f64::NAN), 0.0);
    }
}
