//! Closed-form zone areas for 2 and 3 ellipses: lenses from pairwise intersections, the central zone from the three
//! arcs joining its corners, and the rest by inclusion-exclusion.

use std::collections::BTreeMap;

use itertools::Itertools;
use log::debug;

use crate::{
    ellipse::{arc::{Arc, ArcMeasure}, Ellipse},
    error::DiagramError,
    geometry::{r2::R2, triangle_area},
    zone::canonicalize,
};

use super::{pair_key, IntersectionCache, ZoneAreas};

/// A corner of the zone inside all three ellipses: the intersection of ellipses `pair` lying inside the third.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub point: R2<f64>,
    pub pair: (usize, usize),
}

/// Counter-clockwise corners of the central zone, with the index of the ellipse carrying each edge: edge `i` runs from
/// corner `i` to corner `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralRegion {
    pub corners: [ Corner; 3 ],
    pub edges: [ usize; 3 ],
}

impl CentralRegion {
    pub fn arcs(&self) -> [ (usize, Arc); 3 ] {
        [ 0, 1, 2 ].map(|i| {
            let start = self.corners[i].point;
            let end = self.corners[(i + 1) % 3].point;
            (self.edges[i], Arc { start, end })
        })
    }

    /// Signed area of the triangle joining the corners (positive once oriented).
    pub fn triangle_area(&self) -> f64 {
        let [ p, q, r ] = self.corners.map(|c| c.point);
        triangle_area(&p, &q, &r)
    }
}

fn shared(p: (usize, usize), q: (usize, usize)) -> Option<usize> {
    [ p.0, p.1 ].into_iter().find(|i| *i == q.0 || *i == q.1)
}

/// Points of each pair, in pair order, each pair required to meet in exactly two points.
pub fn pair_points<'a>(ellipses: &[Ellipse], intersections: &'a IntersectionCache) -> Result<Vec<((usize, usize), &'a [ R2<f64> ])>, DiagramError> {
    (0..ellipses.len())
        .tuple_combinations()
        .map(|(i, j)| {
            let key = pair_key(&ellipses[i], &ellipses[j]);
            let points = intersections.get(&key).map(|v| v.as_slice()).unwrap_or(&[]);
            if points.len() != 2 {
                Err(DiagramError::IntersectionCount { pair: key, count: points.len() })
            } else {
                Ok(((i, j), points))
            }
        })
        .collect()
}

/// Locate the central zone's corners: for each pair, exactly one of its two points lies inside the third ellipse.
pub fn central_region(ellipses: &[Ellipse], pairs: &[ ((usize, usize), &[ R2<f64> ]) ]) -> Result<CentralRegion, DiagramError> {
    let mut corners = vec![];
    for ((i, j), points) in pairs {
        let k = (0..3).find(|k| k != i && k != j).unwrap_or(0);
        let inside: Vec<&R2<f64>> = points.iter().filter(|p| ellipses[k].point_in_ellipse(p, false, 0.)).collect();
        if inside.len() != 1 {
            return Err(DiagramError::CentralRegion { pair: pair_key(&ellipses[*i], &ellipses[*j]), inside: inside.len() });
        }
        corners.push(Corner { point: *inside[0], pair: (*i, *j) });
    }
    let mut corners: [ Corner; 3 ] = [ corners[0], corners[1], corners[2] ];
    if triangle_area(&corners[0].point, &corners[1].point, &corners[2].point) < 0. {
        corners.swap(1, 2);
    }
    let edges = [ 0, 1, 2 ].map(|i| shared(corners[i].pair, corners[(i + 1) % 3].pair).unwrap_or(0));
    debug!("central corners: {} {} {}", corners[0].point, corners[1].point, corners[2].point);
    Ok(CentralRegion { corners, edges })
}

fn zone(ellipses: &[Ellipse], idxs: &[usize]) -> String {
    let raw: String = idxs.iter().map(|i| ellipses[*i].label()).collect();
    canonicalize(&raw).unwrap_or(raw)
}

/// Zone areas from lens areas and (for three ellipses) the central area, by inclusion-exclusion.
pub fn inclusion_exclusion(ellipses: &[Ellipse], lenses: &BTreeMap<(usize, usize), f64>, central: Option<f64>) -> ZoneAreas {
    let n = ellipses.len();
    let lens = |i: usize, j: usize| lenses.get(&(i.min(j), i.max(j))).cloned().unwrap_or(0.);
    let mut areas = ZoneAreas::new();
    let center = central.unwrap_or(0.);
    for i in 0..n {
        let others: f64 = (0..n).filter(|j| *j != i).map(|j| lens(i, j)).sum();
        let correction = if n == 3 { center } else { 0. };
        areas.insert(zone(ellipses, &[ i ]), ellipses[i].area() - others + correction);
    }
    for (i, j) in (0..n).tuple_combinations() {
        let correction = if n == 3 { center } else { 0. };
        areas.insert(zone(ellipses, &[ i, j ]), lens(i, j) - correction);
    }
    if n == 3 {
        areas.insert(zone(ellipses, &[ 0, 1, 2 ]), center);
    }
    areas
}

/// Shared evaluation for the analytic methods; `central` measures the central zone.
pub fn zone_areas<F>(
    ellipses: &[Ellipse],
    intersections: &IntersectionCache,
    measure: ArcMeasure,
    central: F,
) -> Result<ZoneAreas, DiagramError>
where
    F: Fn(&[Ellipse], &CentralRegion) -> f64,
{
    let n = ellipses.len();
    if !(2..=3).contains(&n) {
        return Err(DiagramError::UnsupportedEllipseCount(n));
    }
    let pairs = pair_points(ellipses, intersections)?;
    let mut lenses = BTreeMap::new();
    for ((i, j), points) in &pairs {
        let (e0, e1) = (&ellipses[*i], &ellipses[*j]);
        let area = e0
            .shared_zone_area(e1, points, measure)
            .ok_or_else(|| DiagramError::UnresolvedLens(pair_key(e0, e1)))?;
        lenses.insert((*i, *j), area);
    }
    let center = if n == 3 {
        let region = central_region(ellipses, &pairs)?;
        Some(central(ellipses, &region))
    } else {
        None
    };
    Ok(inclusion_exclusion(ellipses, &lenses, center))
}
