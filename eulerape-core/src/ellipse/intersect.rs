use log::debug;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{conic::{pencil_cubic, split}, line::Line, r2::R2, transform::CanProject},
    math::cubic::cubic,
};

use super::Ellipse;

/// How closely a candidate point must satisfy the second ellipse's equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    Stable,
    /// Looser fallback for near-tangent or badly-scaled pairs.
    Coarse,
}

impl Precision {
    pub fn tolerance(&self) -> f64 {
        match self {
            Precision::Stable => 1e-6,
            Precision::Coarse => 1e-3,
        }
    }
}

/// Points closer than this (relative to the first ellipse's size) are merged.
const MERGE_DISTANCE: f64 = 1e-6;

impl Ellipse {
    /// 0-2 points where `line` crosses this ellipse.
    pub fn intersect_with_line(&self, line: &Line) -> Vec<R2<f64>> {
        let projection = self.projection();
        let Some(unit_line) = line.project(&projection.matrix()) else {
            return vec![];
        };
        let Some(back) = projection.inverse() else {
            return vec![];
        };
        unit_line
            .unit_circle_intersections()
            .into_iter()
            .map(|p| p.apply(&back))
            .collect()
    }

    /// Points shared by two ellipses (0-4), via the degenerate members of the pencil `C₁ + λ·C₂`.
    ///
    /// Works in the frame where `self` is the unit circle: each real root `λ` of `det(M₁ + λ·M₂) = 0` gives a line pair
    /// through the intersections, and each line's unit-circle crossings are kept if they also lie on `other`.
    pub fn intersect_with_ellipse(&self, other: &Ellipse, precision: Precision) -> Vec<R2<f64>> {
        let projection = self.projection();
        let Some(back) = projection.inverse() else {
            return vec![];
        };
        let Some(other_unit) = other.conic().project(&projection.matrix()) else {
            return vec![];
        };
        let m1 = Matrix3::from_diagonal(&nalgebra::Vector3::new(1., 1., -1.));
        let m2 = other_unit.matrix();
        let scale = m2.amax();
        if scale == 0. || !scale.is_finite() {
            return vec![];
        }
        let m2 = m2 / scale;
        let [ c3, c2, c1, c0 ] = pencil_cubic(&m1, &m2);
        let roots = cubic(c3, c2, c1, c0).reals();
        debug!("{} ∩ {}: pencil roots {:?}", self.label(), other.label(), roots);

        let other_projection = other.projection();
        let tolerance = precision.tolerance();
        let mut points: Vec<R2<f64>> = vec![];
        for lambda in roots {
            let Some(degenerate) = split(&(m1 + m2 * lambda)) else {
                debug!("  λ={}: no real line pair", lambda);
                continue;
            };
            debug!("  λ={}: {:?}", lambda, degenerate);
            for line in degenerate.lines() {
                for unit in line.unit_circle_intersections() {
                    let p = unit.apply(&back);
                    let r = p.apply(&other_projection).norm();
                    if (r - 1.).abs() < tolerance {
                        points.push(p);
                    } else {
                        debug!("  rejecting {}: radius {} in {}'s frame", p, r, other.label());
                    }
                }
            }
        }
        merge_points(points, MERGE_DISTANCE * self.a().max(self.b()))
    }
}

/// Average together points within `distance` of each other.
fn merge_points(points: Vec<R2<f64>>, distance: f64) -> Vec<R2<f64>> {
    let mut clusters: Vec<(R2<f64>, usize)> = vec![];
    for p in points {
        match clusters.iter_mut().find(|(sum, n)| (*sum / *n as f64).distance(&p) < distance) {
            Some((sum, n)) => {
                *sum = *sum + p;
                *n += 1;
            },
            None => clusters.push((p, 1)),
        }
    }
    clusters.into_iter().map(|(sum, n)| sum / n as f64).collect()
}
