use crate::{ellipse::{arc::ArcMeasure, Ellipse}, error::DiagramError};

use super::{analytic::{self, CentralRegion}, IntersectionCache, ZoneAreas};

/// Central zone as the triangle joining its corners plus the elliptic segment beyond each side.
pub fn central_area(ellipses: &[Ellipse], region: &CentralRegion) -> f64 {
    let segments: f64 = region
        .arcs()
        .iter()
        .map(|(idx, arc)| ellipses[*idx].elliptic_segment_area(arc))
        .sum();
    region.triangle_area().abs() + segments
}

pub fn zone_areas(ellipses: &[Ellipse], intersections: &IntersectionCache) -> Result<ZoneAreas, DiagramError> {
    analytic::zone_areas(ellipses, intersections, ArcMeasure::Segments, central_area)
}
