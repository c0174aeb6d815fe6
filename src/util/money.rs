/// Round to 2 decimal places, half away from zero.
///
/// Every monetary value is rounded at the point it is computed, not only the
/// final total, so stored component fees always sum to the stored total.
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_basic() {
        assert_eq!(round2(1.005_001), 1.01);
        assert_eq!(round2(2.004), 2.0);
        assert_eq!(round2(25.0), 25.0);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(2.675000000001), 2.68);
    }

    #[test]
    fn test_round2_fee_examples() {
        // 5% of 25.00 and 8% of 25.00
        assert_eq!(round2(25.0 * 0.05), 1.25);
        assert_eq!(round2(25.0 * 0.08), 2.0);
    }
}
