use std::fmt::{Display, Formatter, self};

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::r2::R2;

const EPS: f64 = 1e-12;

/// Line `a·x + b·y + c = 0` in homogeneous coordinates; vertical lines have `b = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Display for Line {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}x + {:.4}y + {:.4} = 0", self.a, self.b, self.c)
    }
}

impl Line {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Line { a, b, c }
    }

    /// `None` when `a` and `b` both vanish (the line at infinity, or no line at all).
    pub fn from_vector(v: &Vector3<f64>) -> Option<Self> {
        let scale = v.amax();
        if scale == 0. || !scale.is_finite() {
            return None;
        }
        let v = *v / scale;
        if v.x.abs() < EPS && v.y.abs() < EPS {
            None
        } else {
            Some(Line { a: v.x, b: v.y, c: v.z })
        }
    }

    pub fn vector(&self) -> Vector3<f64> {
        Vector3::new(self.a, self.b, self.c)
    }

    /// Line through two points; `None` if they coincide.
    pub fn through(p: &R2<f64>, q: &R2<f64>) -> Option<Self> {
        if p.distance(q) < EPS {
            return None;
        }
        let l = Vector3::new(p.x, p.y, 1.).cross(&Vector3::new(q.x, q.y, 1.));
        Line::from_vector(&l)
    }

    /// Points equidistant from `p` and `q`.
    pub fn perpendicular_bisector(p: &R2<f64>, q: &R2<f64>) -> Option<Self> {
        let d = *q - *p;
        if d.norm() < EPS {
            return None;
        }
        let m = p.midpoint(q);
        Some(Line { a: d.x, b: d.y, c: -d.dot(&m) })
    }

    /// Slope `dy/dx`; `None` for vertical lines.
    pub fn gradient(&self) -> Option<f64> {
        if self.b.abs() < EPS * self.a.abs().max(1.) {
            None
        } else {
            Some(-self.a / self.b)
        }
    }

    pub fn eval(&self, p: &R2<f64>) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    /// Unit vector along the line.
    pub fn direction(&self) -> R2<f64> {
        let n = self.a.hypot(self.b);
        R2 { x: -self.b / n, y: self.a / n }
    }

    /// Point of the line closest to the origin.
    pub fn foot(&self) -> R2<f64> {
        let n2 = self.a * self.a + self.b * self.b;
        R2 { x: -self.c * self.a / n2, y: -self.c * self.b / n2 }
    }

    /// `None` for parallel (or identical) lines.
    pub fn intersect(&self, o: &Line) -> Option<R2<f64>> {
        let p = self.vector().cross(&o.vector());
        let scale = self.a.hypot(self.b) * o.a.hypot(o.b);
        if p.z.abs() <= EPS * scale {
            return None;
        }
        let r = R2 { x: p.x / p.z, y: p.y / p.z };
        if r.is_finite() { Some(r) } else { None }
    }

    /// Image of this line under the point map `m`: `l' = m⁻ᵀ·l`. `None` if `m` is singular.
    pub fn project(&self, m: &Matrix3<f64>) -> Option<Line> {
        let inv = m.try_inverse()?;
        Line::from_vector(&(inv.transpose() * self.vector()))
    }

    /// 0, 1 (tangent) or 2 points where the line meets `x² + y² = 1`.
    pub fn unit_circle_intersections(&self) -> Vec<R2<f64>> {
        let n = self.a.hypot(self.b);
        if n == 0. {
            return vec![];
        }
        let dist = self.c.abs() / n;
        let foot = self.foot();
        if (dist - 1.).abs() < EPS {
            vec![ foot ]
        } else if dist > 1. {
            vec![]
        } else {
            let t = (1. - dist * dist).sqrt();
            let dir = self.direction();
            vec![ foot - dir * t, foot + dir * t ]
        }
    }
}
