//! Starting layouts: one circle per set, sized to its total area and spaced so each pair's lens matches the pair's
//! required overlap.

use std::f64::consts::PI;

use log::debug;

use crate::{
    area_spec::RequiredAreaSpec,
    ellipse::Ellipse,
    error::ConfigError,
    geometry::circle::circle_overlap_area,
};

const BISECTION_STEPS: usize = 100;

/// Center distance at which circles of radius `r1`, `r2` overlap by `overlap`. Overlaps at or beyond the smaller
/// circle's area give the nested distance `|r1 - r2|`.
pub fn overlap_distance(r1: f64, r2: f64, overlap: f64) -> f64 {
    let (mut lo, mut hi) = ((r1 - r2).abs(), r1 + r2);
    if overlap <= 0. {
        return hi;
    }
    for _ in 0..BISECTION_STEPS {
        let mid = (lo + hi) / 2.;
        if circle_overlap_area(r1, r2, mid) > overlap {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.
}

/// Circles for `spec`'s sets, in label order: the first at the origin, the second along the x-axis, the third above
/// them.
pub fn circles_for(spec: &RequiredAreaSpec) -> Result<Vec<Ellipse>, ConfigError> {
    let labels = spec.labels();
    let n = labels.len();
    if !(2..=3).contains(&n) {
        return Err(ConfigError::UnsupportedEllipseCount(n));
    }
    let radii: Vec<f64> = labels.iter().map(|l| (spec.set_area(*l) / PI).sqrt()).collect();
    let distance = |i: usize, j: usize| {
        let zone: String = [ labels[i], labels[j] ].iter().collect();
        overlap_distance(radii[i], radii[j], spec.overlap(&zone))
    };
    let d01 = distance(0, 1);
    let mut centers = vec![ (0., 0.), (d01, 0.) ];
    if n == 3 {
        let d02 = distance(0, 2);
        let d12 = distance(1, 2).clamp((d01 - d02).abs(), d01 + d02);
        let x = if d01 > 0. { (d01 * d01 + d02 * d02 - d12 * d12) / (2. * d01) } else { 0. };
        let y = (d02 * d02 - x * x).max(0.).sqrt();
        centers.push((x, y));
    }
    debug!("initial circles: radii {:?}, centers {:?}", radii, centers);
    labels
        .iter()
        .zip(radii.iter().zip(centers))
        .map(|(label, (r, (x, y)))| Ellipse::circle(*label, x, y, *r))
        .collect()
}
