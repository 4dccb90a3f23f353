use std::f64::consts::TAU;

use log::debug;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::{complex::Complex, is_zero::IsZero, quadratic};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Roots {
    /// Leading coefficient was zero.
    Quadratic(quadratic::Roots),
    /// Three real roots (with multiplicity), ascending.
    Reals([ f64; 3 ]),
    /// One real root and one member of a complex-conjugate pair.
    Mixed(f64, Complex<f64>),
}

use Roots::{Quadratic, Reals, Mixed};

impl Roots {
    pub fn reals(&self) -> Vec<f64> {
        match self {
            Quadratic(q) => q.reals(),
            Reals(rs) => rs.to_vec(),
            Mixed(re, _) => vec![ *re ],
        }
    }
}

const TAU3: f64 = TAU / 3.;
const NEWTON_STEPS: usize = 3;

/// Solve `a3·x³ + a2·x² + a1·x + a0 = 0`.
pub fn cubic(a3: f64, a2: f64, a1: f64, a0: f64) -> Roots {
    if a3.is_zero() {
        Quadratic(quadratic::quadratic(a2, a1, a0))
    } else {
        let (b2, b1, b0) = (a2 / a3, a1 / a3, a0 / a3);
        match cubic_scaled(b2, b1, b0) {
            Reals(rs) => {
                let mut rs = rs.map(|r| polish(b2, b1, b0, r));
                rs.sort_by_key(|r| OrderedFloat(*r));
                Reals(rs)
            }
            Mixed(re, im) => Mixed(polish(b2, b1, b0, re), im),
            q => q,
        }
    }
}

/// Monic cubic `x³ + a2·x² + a1·x + a0`, via the depressed cubic in `t = x - h`, `h = -a2/3`.
pub fn cubic_scaled(a2: f64, a1: f64, a0: f64) -> Roots {
    let h = a2 / -3.;
    let p = a1 - a2 * a2 / 3.;
    let q = -2. * h * h * h + h * a1 + a0;
    match cubic_depressed(p, q) {
        Reals(roots) => Reals(roots.map(|r| r + h)),
        Mixed(re, im) => Mixed(re + h, Complex { re: im.re + h, im: im.im }),
        q => q,
    }
}

/// Depressed cubic `t³ + p·t + q`.
///
/// Three real roots use the trigonometric form; otherwise Cardano's formula gives the real root and the conjugate pair.
pub fn cubic_depressed(p: f64, q: f64) -> Roots {
    if p.is_zero() {
        let re = -q.cbrt();
        return if re.is_zero() {
            Reals([ 0., 0., 0. ])
        } else {
            Mixed(re, Complex { re: -re / 2., im: re.abs() * 3_f64.sqrt() / 2. })
        };
    }
    let p3 = p / 3.;
    let q2 = q / 2.;
    let disc = q2 * q2 + p3 * p3 * p3;
    let scale = (q2 * q2).max((p3 * p3 * p3).abs());
    if disc.abs() <= 1e-14 * scale {
        // One simple and one double root
        let single = 3. * q / p;
        let double = -3. * q / (2. * p);
        let mut roots = [ single, double, double ];
        roots.sort_by_key(|r| OrderedFloat(*r));
        Reals(roots)
    } else if disc < 0. {
        let r = 2. * (-p3).sqrt();
        let u = (q2 / p3 / (-p3).sqrt()).clamp(-1., 1.);
        let theta = u.acos() / 3.;
        let mut roots = [
            r * theta.cos(),
            r * (theta - TAU3).cos(),
            r * (theta - 2. * TAU3).cos(),
        ];
        roots.sort_by_key(|r| OrderedFloat(*r));
        Reals(roots)
    } else {
        let sq = disc.sqrt();
        let u = (-q2 + sq).cbrt();
        let v = (-q2 - sq).cbrt();
        let re = u + v;
        let im = (u - v).abs() * 3_f64.sqrt() / 2.;
        Mixed(re, Complex { re: -re / 2., im })
    }
}

fn polish(a2: f64, a1: f64, a0: f64, mut x: f64) -> f64 {
    let f = |x: f64| ((x + a2) * x + a1) * x + a0;
    let df = |x: f64| (3. * x + 2. * a2) * x + a1;
    for _ in 0..NEWTON_STEPS {
        let fx = f(x);
        let d = df(x);
        if fx.is_zero() || d.is_zero() || !d.is_finite() {
            break;
        }
        let next = x - fx / d;
        if !next.is_finite() || f(next).abs() >= fx.abs() {
            break;
        }
        x = next;
    }
    if !x.is_finite() {
        debug!("cubic polish produced non-finite root for x³ + {}x² + {}x + {}", a2, a1, a0);
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;
    use roots::find_roots_cubic;

    fn check(r0: f64, r1: f64, r2: f64, scale: f64) {
        let a3 = scale;
        let a2 = -scale * (r0 + r1 + r2);
        let a1 = scale * (r0 * r1 + r0 * r2 + r1 * r2);
        let a0 = -scale * r0 * r1 * r2;
        let mut expected = vec![ r0, r1, r2 ];
        expected.sort_by_key(|r| OrderedFloat(*r));
        let actual = cubic(a3, a2, a1, a0).reals();
        assert_eq!(actual.len(), 3, "{:?}", actual);
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert_relative_eq!(a, e, epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    #[test]
    fn three_real_roots() {
        check(1., 2., 3., 1.);
        check(-5., 0.5, 4., 2.);
        check(-1., -1e-3, 7., -3.);
    }

    #[test]
    fn repeated_roots() {
        check(2., 2., -1., 1.);
        check(0., 0., 0., 1.);
    }

    #[test]
    fn one_real_root() {
        // (x - 2)(x² + 1)
        let roots = cubic(1., -2., 1., -2.);
        match roots {
            Mixed(re, im) => {
                assert_relative_eq!(re, 2., epsilon = 1e-12);
                assert_relative_eq!(im.re, 0., epsilon = 1e-12);
                assert_relative_eq!(im.im, 1., epsilon = 1e-12);
            }
            _ => panic!("expected mixed roots, got {:?}", roots),
        }
    }

    #[test]
    fn leading_zero_falls_back_to_quadratic() {
        assert_eq!(cubic(0., 1., -3., 2.).reals(), vec![ 1., 2. ]);
    }

    #[test]
    fn agrees_with_roots_crate() {
        let cases = [
            (1., -6., 11., -6.),
            (2., 3., -11., -6.),
            (1., 0., -15., -4.),
            (-0.5, 1.25, 3., -0.75),
            (1., 1., 1., 1.),
        ];
        for (a3, a2, a1, a0) in cases {
            let expected = find_roots_cubic(a3, a2, a1, a0);
            let mut expected = expected.as_ref().to_vec();
            expected.sort_by_key(|r| OrderedFloat(*r));
            let actual = cubic(a3, a2, a1, a0).reals();
            assert_eq!(actual.len(), expected.len(), "{}x³ + {}x² + {}x + {}: {:?} vs {:?}", a3, a2, a1, a0, actual, expected);
            for (a, e) in actual.iter().zip(expected.iter()) {
                assert_relative_eq!(a, e, epsilon = 1e-6);
            }
        }
    }
}
