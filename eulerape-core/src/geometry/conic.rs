use std::fmt::{Display, Formatter, self};

use log::debug;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::{line::Line, r2::R2};

/// Below this (relative to the largest entry) an adjugate is treated as zero, i.e. the conic has rank 1.
const RANK_ONE_EPS: f64 = 1e-9;
const PARALLEL_EPS: f64 = 1e-9;

/// `A·x² + B·x·y + C·y² + 2D·x + 2E·y + F = 0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

/// Center, semi-axes and rotation (radians) recovered from a conic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseParams {
    pub center: R2<f64>,
    pub a: f64,
    pub b: f64,
    pub theta: f64,
}

impl Display for Conic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}x² + {:.4}xy + {:.4}y² + 2·{:.4}x + 2·{:.4}y + {:.4}", self.a, self.b, self.c, self.d, self.e, self.f)
    }
}

impl Conic {
    /// Ellipse with semi-axes `a`, `b`, centered at `center`, `a`-axis at `theta` radians from the x-axis.
    pub fn from_ellipse(a: f64, b: f64, center: R2<f64>, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        let ia2 = 1. / (a * a);
        let ib2 = 1. / (b * b);
        let ca = cos * cos * ia2 + sin * sin * ib2;
        let cc = sin * sin * ia2 + cos * cos * ib2;
        let cb = 2. * sin * cos * (ia2 - ib2);
        let (xc, yc) = (center.x, center.y);
        Conic {
            a: ca,
            b: cb,
            c: cc,
            d: -(ca * xc + cb * yc / 2.),
            e: -(cc * yc + cb * xc / 2.),
            f: ca * xc * xc + cb * xc * yc + cc * yc * yc - 1.,
        }
    }

    pub fn from_matrix(m: &Matrix3<f64>) -> Self {
        Conic {
            a: m[(0, 0)],
            b: m[(0, 1)] + m[(1, 0)],
            c: m[(1, 1)],
            d: (m[(0, 2)] + m[(2, 0)]) / 2.,
            e: (m[(1, 2)] + m[(2, 1)]) / 2.,
            f: m[(2, 2)],
        }
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.a,      self.b / 2., self.d,
            self.b / 2., self.c,      self.e,
            self.d,      self.e,      self.f,
        )
    }

    pub fn eval(&self, p: &R2<f64>) -> f64 {
        let R2 { x, y } = *p;
        self.a * x * x + self.b * x * y + self.c * y * y + 2. * self.d * x + 2. * self.e * y + self.f
    }

    /// Conic satisfied by the images of this conic's points under the point map `m`.
    pub fn project(&self, m: &Matrix3<f64>) -> Option<Conic> {
        let inv = m.try_inverse()?;
        Some(Conic::from_matrix(&(inv.transpose() * self.matrix() * inv)))
    }

    /// Recover center, semi-axes and rotation. `None` unless this is a real, non-degenerate ellipse.
    pub fn to_ellipse(&self) -> Option<EllipseParams> {
        let sign = if self.a < 0. { -1. } else { 1. };
        let Conic { a, b, c, d, e, f } = *self;
        let (a, b, c, d, e, f) = (a * sign, b * sign, c * sign, d * sign, e * sign, f * sign);
        let det = a * c - b * b / 4.;
        if det <= 0. || !det.is_finite() {
            return None;
        }
        let xc = (b / 2. * e - c * d) / det;
        let yc = (b / 2. * d - a * e) / det;
        let fc = f + d * xc + e * yc;
        if fc >= 0. {
            return None;
        }
        let theta = b.atan2(a - c) / 2.;
        let (sin, cos) = theta.sin_cos();
        let l0 = a * cos * cos + b * sin * cos + c * sin * sin;
        let l1 = a * sin * sin - b * sin * cos + c * cos * cos;
        if l0 <= 0. || l1 <= 0. {
            return None;
        }
        Some(EllipseParams {
            center: R2 { x: xc, y: yc },
            a: (-fc / l0).sqrt(),
            b: (-fc / l1).sqrt(),
            theta,
        })
    }
}

pub fn adjugate(m: &Matrix3<f64>) -> Matrix3<f64> {
    let c = |r0: usize, r1: usize, c0: usize, c1: usize| m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)];
    Matrix3::new(
        c(1, 2, 1, 2), -c(0, 2, 1, 2),  c(0, 1, 1, 2),
        -c(1, 2, 0, 2),  c(0, 2, 0, 2), -c(0, 1, 0, 2),
        c(1, 2, 0, 1), -c(0, 2, 0, 1),  c(0, 1, 0, 1),
    )
}

/// Coefficients `[c3, c2, c1, c0]` of `det(m1 + λ·m2)`.
pub fn pencil_cubic(m1: &Matrix3<f64>, m2: &Matrix3<f64>) -> [ f64; 4 ] {
    let c0 = m1.determinant();
    let c1 = (adjugate(m1) * m2).trace();
    let c2 = (m1 * adjugate(m2)).trace();
    let c3 = m2.determinant();
    [ c3, c2, c1, c0 ]
}

/// Skew matrix `[p]ₓ` with `[p]ₓ·v = p × v`.
pub fn cross_matrix(p: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0., -p.z, p.y,
        p.z, 0., -p.x,
        -p.y, p.x, 0.,
    )
}

/// Decomposition of a degenerate (rank ≤ 2) conic into its lines.
#[derive(Debug, Clone, PartialEq)]
pub enum Degenerate {
    /// Complex-conjugate line pair meeting in one real point; contributes no real intersections.
    Point(R2<f64>),
    /// Double line (rank 1).
    Single(Line),
    Parallel(Line, Line),
    Crossing(Line, Line),
}

impl Degenerate {
    /// Real lines of the pair; the line at infinity is omitted.
    pub fn lines(&self) -> Vec<Line> {
        match self {
            Degenerate::Point(_) => vec![],
            Degenerate::Single(l) => vec![ *l ],
            Degenerate::Parallel(l, m) | Degenerate::Crossing(l, m) => vec![ *l, *m ],
        }
    }
}

fn argmax<I: Iterator<Item = f64>>(it: I) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for (idx, v) in it.enumerate() {
        if v > best.1 {
            best = (idx, v);
        }
    }
    best.0
}

/// Split a degenerate conic into lines: `adj(M) = -p·pᵀ` locates the lines' common point `p`, and `M + [p]ₓ` has
/// rank 1, its rows and columns spanning the two lines. `None` for a zero matrix, or for a rank-1 conic whose line is
/// at infinity.
pub fn split(m: &Matrix3<f64>) -> Option<Degenerate> {
    let scale = m.amax();
    if scale == 0. || !scale.is_finite() {
        return None;
    }
    let m = *m / scale;
    let adj = adjugate(&m);
    if adj.amax() < RANK_ONE_EPS {
        let i = argmax((0..3).map(|i| m[(i, i)].abs()));
        let mii = m[(i, i)].abs();
        if mii == 0. {
            return None;
        }
        let l: Vector3<f64> = m.column(i) / mii.sqrt();
        debug!("rank-1 conic, double line {:?}", l);
        return Line::from_vector(&l).map(Degenerate::Single);
    }
    let i = argmax((0..3).map(|i| adj[(i, i)].abs()));
    let bii = adj[(i, i)];
    if bii > 0. {
        let p: Vector3<f64> = adj.column(i) / bii;
        debug!("imaginary line pair through {:?}", p);
        return if p.z.abs() > PARALLEL_EPS {
            Some(Degenerate::Point(R2 { x: p.x / p.z, y: p.y / p.z }))
        } else {
            None
        };
    }
    let beta = (-bii).sqrt();
    let p: Vector3<f64> = adj.column(i) / beta;
    let c = m + cross_matrix(&p);
    let (mut ci, mut cj, mut best) = (0, 0, f64::NEG_INFINITY);
    for r in 0..3 {
        for k in 0..3 {
            if c[(r, k)].abs() > best {
                best = c[(r, k)].abs();
                ci = r;
                cj = k;
            }
        }
    }
    let l: Vector3<f64> = c.row(ci).transpose();
    let g: Vector3<f64> = c.column(cj).into_owned();
    let lines: Vec<Line> = [ Line::from_vector(&l), Line::from_vector(&g) ].into_iter().flatten().collect();
    let parallel = p.z.abs() <= PARALLEL_EPS * p.amax();
    match (lines.as_slice(), parallel) {
        ([], _) => None,
        ([ l ], _) => Some(Degenerate::Single(*l)),
        ([ l, g, .. ], true) => Some(Degenerate::Parallel(*l, *g)),
        ([ l, g, .. ], false) => Some(Degenerate::Crossing(*l, *g)),
    }
}
