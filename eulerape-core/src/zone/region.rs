use geo::{Area, BooleanOps, BoundingRect, MultiPolygon};

use crate::geometry::bbox::BBox;

/// Planar point-set operations needed to carve the plane into zones.
pub trait Region: Sized {
    fn intersect(&self, other: &Self) -> Self;
    fn subtract(&self, other: &Self) -> Self;
    fn is_empty(&self) -> bool;
    fn bounds(&self) -> Option<BBox>;
    fn area(&self) -> f64;
    /// Number of disjoint pieces.
    fn components(&self) -> usize;
}

impl Region for MultiPolygon<f64> {
    fn intersect(&self, other: &Self) -> Self {
        self.intersection(other)
    }
    fn subtract(&self, other: &Self) -> Self {
        self.difference(other)
    }
    fn is_empty(&self) -> bool {
        self.0.iter().all(|p| p.unsigned_area() == 0.)
    }
    fn bounds(&self) -> Option<BBox> {
        self.bounding_rect().map(BBox::from)
    }
    fn area(&self) -> f64 {
        self.unsigned_area()
    }
    fn components(&self) -> usize {
        self.0.iter().filter(|p| p.unsigned_area() > 0.).count()
    }
}
