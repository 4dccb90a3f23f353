use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{complex::Complex, is_zero::IsZero};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Roots {
    /// Linear equation (leading coefficient zero).
    Single(f64),
    Double(f64),
    Reals([ f64; 2 ]),
    Complex(Complex<f64>),
    /// All coefficients of `x` vanish: no root, or every `x` is one.
    Degenerate,
}

use Roots::{Single, Double, Reals, Degenerate};

impl Roots {
    pub fn reals(&self) -> Vec<f64> {
        match self {
            Single(r) => vec![ *r ],
            Double(r) => vec![ *r ],
            Reals(rs) => rs.to_vec(),
            Roots::Complex(_) => vec![],
            Degenerate => vec![],
        }
    }
}

impl AbsDiffEq for Roots {
    type Epsilon = f64;
    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        match (self, other) {
            (Single(r0), Single(r1)) => r0.abs_diff_eq(r1, epsilon),
            (Double(r0), Double(r1)) => r0.abs_diff_eq(r1, epsilon),
            (Reals([ l0, l1 ]), Reals([ r0, r1 ])) => l0.abs_diff_eq(r0, epsilon) && l1.abs_diff_eq(r1, epsilon),
            (Roots::Complex(c0), Roots::Complex(c1)) => c0.re.abs_diff_eq(&c1.re, epsilon) && c0.im.abs().abs_diff_eq(&c1.im.abs(), epsilon),
            (Degenerate, Degenerate) => true,
            _ => false,
        }
    }
}

impl RelativeEq for Roots {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }
    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        match (self, other) {
            (Single(r0), Single(r1)) => r0.relative_eq(r1, epsilon, max_relative),
            (Double(r0), Double(r1)) => r0.relative_eq(r1, epsilon, max_relative),
            (Reals([ l0, l1 ]), Reals([ r0, r1 ])) => l0.relative_eq(r0, epsilon, max_relative) && l1.relative_eq(r1, epsilon, max_relative),
            (Roots::Complex(c0), Roots::Complex(c1)) => c0.re.relative_eq(&c1.re, epsilon, max_relative) && c0.im.abs().relative_eq(&c1.im.abs(), epsilon, max_relative),
            (Degenerate, Degenerate) => true,
            _ => false,
        }
    }
}

/// Solve `a2·x² + a1·x + a0 = 0`.
///
/// Uses the cancellation-free form `q = -(a1 + sign(a1)·√disc) / 2`, roots `q/a2` and `a0/q`. Real roots are returned in
/// ascending order.
pub fn quadratic(a2: f64, a1: f64, a0: f64) -> Roots {
    if a2.is_zero() {
        return if a1.is_zero() { Degenerate } else { Single(-a0 / a1) };
    }
    let disc = a1 * a1 - 4. * a2 * a0;
    let scale = (a1 * a1).max((4. * a2 * a0).abs());
    if disc.abs() <= 1e-14 * scale || disc.is_zero() {
        Double(-a1 / (2. * a2))
    } else if disc.lt_zero() {
        Roots::Complex(Complex { re: -a1 / (2. * a2), im: (-disc).sqrt() / (2. * a2.abs()) })
    } else {
        let sign = if a1 < 0. { -1. } else { 1. };
        let q = -(a1 + sign * disc.sqrt()) / 2.;
        let r0 = q / a2;
        let r1 = a0 / q;
        Reals(if r0 <= r1 { [ r0, r1 ] } else { [ r1, r0 ] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn distinct_reals() {
        assert_relative_eq!(quadratic(1., -3., 2.), Reals([ 1., 2. ]));
        assert_relative_eq!(quadratic(2., 0., -8.), Reals([ -2., 2. ]));
    }

    #[test]
    fn small_root_no_cancellation() {
        // x² - 1e8·x + 1: naive formula loses the 1e-8 root entirely
        let roots = quadratic(1., -1e8, 1.).reals();
        assert_relative_eq!(roots[0], 1e-8, max_relative = 1e-12);
        assert_relative_eq!(roots[1], 1e8, max_relative = 1e-12);
    }

    #[test]
    fn double_and_complex() {
        assert_relative_eq!(quadratic(1., -2., 1.), Double(1.));
        assert_relative_eq!(quadratic(1., 0., 1.), Roots::Complex(Complex { re: 0., im: 1. }));
        assert_eq!(quadratic(1., 0., 1.).reals(), Vec::<f64>::new());
    }

    #[test]
    fn linear_and_degenerate() {
        assert_eq!(quadratic(0., 2., -4.), Single(2.));
        assert_eq!(quadratic(0., 0., 3.), Degenerate);
        assert!(quadratic(0., 0., 0.).reals().is_empty());
    }
}
