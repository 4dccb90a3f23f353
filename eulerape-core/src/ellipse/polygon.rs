use geo::{LineString, Polygon};

use crate::geometry::r2::R2;

use super::Ellipse;

/// Fewest x-samples per half of the boundary, for ellipses narrower than the sampling interval.
pub const MIN_SAMPLES: usize = 16;

impl Ellipse {
    /// Boundary points sampled every `interval` along the `a`-axis: the upper half left to right, then the lower half
    /// right to left (clockwise in the ellipse's frame), rotated and translated into place.
    pub fn as_polygon(&self, interval: f64) -> Vec<R2<f64>> {
        let (a, b) = (self.a(), self.b());
        let width = 2. * a;
        let step = if interval > 0. && interval.is_finite() {
            interval.min(width / MIN_SAMPLES as f64)
        } else {
            width / MIN_SAMPLES as f64
        };
        let n = (width / step).ceil() as usize;
        let mut upper: Vec<R2<f64>> = Vec::with_capacity(n + 1);
        let mut prev_y = 0.;
        for i in 0..=n {
            let x = (-a + i as f64 * step).min(a);
            let radicand = 1. - (x * x) / (a * a);
            let y = if radicand < 0. { prev_y } else { b * radicand.sqrt() };
            prev_y = y;
            upper.push(R2 { x, y });
        }
        let lower = upper
            .iter()
            .rev()
            .skip(1)
            .take(upper.len().saturating_sub(2))
            .map(|p| R2 { x: p.x, y: -p.y });
        let theta = self.theta();
        let c = self.center();
        upper
            .iter()
            .cloned()
            .chain(lower)
            .map(|p| p.rotate(theta) + c)
            .collect()
    }

    pub fn to_geo_polygon(&self, interval: f64) -> Polygon<f64> {
        let coords: Vec<geo::Coord<f64>> = self.as_polygon(interval).into_iter().map(|p| p.into()).collect();
        Polygon::new(LineString::from(coords), vec![])
    }
}
