/// Decimal places kept on radii compared by point-in-ellipse tests.
pub const POINT_DECIMALS: i32 = 10;

/// Decimal places kept on zone sub-areas before their sign is checked.
pub const AREA_DECIMALS: i32 = 8;

pub fn round(f: &f64) -> i64 {
    if f >= &0. {
        (f + 0.5) as i64
    } else {
        (f - 0.5) as i64
    }
}

/// Round `value` to a fixed number of decimal places.
///
/// Values too large to be scaled without overflow (and non-finite values) are returned unchanged.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10_f64.powi(decimals);
    let scaled = value * scale;
    if !scaled.is_finite() || scaled.abs() >= 2_f64.powi(52) {
        return value;
    }
    scaled.round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_away_from_zero() {
        assert_eq!(round(&2.5), 3);
        assert_eq!(round(&-2.5), -3);
        assert_eq!(round(&0.49), 0);
    }

    #[test]
    fn round_to_decimals() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-1.235001, 2), -1.24);
        assert_eq!(round_to(1e-12, 8), 0.);
        // Tiny negative residue rounds to (negative) zero, which is not < 0
        assert!(!(round_to(-3e-10, 8) < 0.));
        assert!(round_to(f64::NAN, 3).is_nan());
        assert_eq!(round_to(1e300, 10), 1e300);
    }
}
