use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::{geometry::r2::R2, math::deg::normalize_rad};

use super::Ellipse;

/// Counter-clockwise boundary arc of an ellipse from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub start: R2<f64>,
    pub end: R2<f64>,
}

/// Which coordinate is integrated against: `Y` gives `∫x dy`, `X` gives `-∫y dx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// How a region bounded by elliptic arcs is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcMeasure {
    /// Chord-bounded segments, plus the polygon of chords.
    Segments,
    /// Line integrals around the boundary.
    Integration,
}

impl Ellipse {
    /// Eccentric anomaly `t` of a boundary point, in `[0, 2π)`: the point is `center + R(θ)·(a·cos t, b·sin t)`.
    pub fn parametric_angle(&self, p: &R2<f64>) -> f64 {
        let local = (*p - self.center()).rotate(-self.theta());
        normalize_rad((local.y / self.b()).atan2(local.x / self.a()))
    }

    /// Parametric angle swept going counter-clockwise along `arc`, in `[0, 2π)`.
    pub fn sweep(&self, arc: &Arc) -> f64 {
        normalize_rad(self.parametric_angle(&arc.end) - self.parametric_angle(&arc.start))
    }

    /// Area between `arc` and its chord. Arcs sweeping more than half the ellipse are the full area minus the
    /// complementary segment.
    pub fn elliptic_segment_area(&self, arc: &Arc) -> f64 {
        let sweep = self.sweep(arc);
        let ab = self.a() * self.b();
        if sweep <= PI {
            ab / 2. * (sweep - sweep.sin())
        } else {
            let rest = TAU - sweep;
            PI * ab - ab / 2. * (rest - rest.sin())
        }
    }

    /// Closed-form line integral along `arc`: `∫x dy` for [`Axis::Y`], `-∫y dx` for [`Axis::X`]. Summed over a closed,
    /// counter-clockwise boundary, either gives the enclosed area.
    pub fn arc_integral_area(&self, arc: &Arc, axis: Axis) -> f64 {
        let t0 = self.parametric_angle(&arc.start);
        let t1 = t0 + self.sweep(arc);
        let (a, b) = (self.a(), self.b());
        let (sin, cos) = self.theta().sin_cos();
        let cos2 = (2. * self.theta()).cos();
        let u = |t: f64| a * t.cos() * cos - b * t.sin() * sin;
        let v = |t: f64| a * t.cos() * sin + b * t.sin() * cos;
        let shared = |t: f64| -(a * a + b * b) * sin * cos * t.sin().powi(2) / 2.;
        match axis {
            Axis::Y => {
                let f = |t: f64| shared(t) + a * b * (t / 2. + cos2 * (2. * t).sin() / 4.);
                self.xc() * (v(t1) - v(t0)) + f(t1) - f(t0)
            },
            Axis::X => {
                let f = |t: f64| shared(t) - a * b * (t / 2. - cos2 * (2. * t).sin() / 4.);
                -(self.yc() * (u(t1) - u(t0)) + f(t1) - f(t0))
            },
        }
    }

    pub fn arc_area(&self, arc: &Arc, measure: ArcMeasure) -> f64 {
        match measure {
            ArcMeasure::Segments => self.elliptic_segment_area(arc),
            ArcMeasure::Integration => self.arc_integral_area(arc, Axis::Y),
        }
    }

    /// Boundary point at parametric angle `t`.
    pub fn point_at(&self, t: f64) -> R2<f64> {
        R2 { x: self.a() * t.cos(), y: self.b() * t.sin() }.rotate(self.theta()) + self.center()
    }
}
