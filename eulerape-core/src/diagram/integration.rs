use crate::{ellipse::{arc::{ArcMeasure, Axis}, Ellipse}, error::DiagramError};

use super::{analytic::{self, CentralRegion}, IntersectionCache, ZoneAreas};

/// Central zone as the line integral `∫x dy` around its three counter-clockwise arcs.
pub fn central_area(ellipses: &[Ellipse], region: &CentralRegion) -> f64 {
    region
        .arcs()
        .iter()
        .map(|(idx, arc)| ellipses[*idx].arc_integral_area(arc, Axis::Y))
        .sum()
}

pub fn zone_areas(ellipses: &[Ellipse], intersections: &IntersectionCache) -> Result<ZoneAreas, DiagramError> {
    analytic::zone_areas(ellipses, intersections, ArcMeasure::Integration, central_area)
}
