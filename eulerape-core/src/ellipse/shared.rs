use log::debug;

use crate::geometry::{line::Line, r2::R2};

use super::{arc::{Arc, ArcMeasure}, Ellipse};

impl Ellipse {
    /// Arc of `self` lying inside `other`, between the chord endpoints `p` and `q`.
    ///
    /// The chord's perpendicular bisector crosses `self` once on each side; exactly one of those crossings must be
    /// inside `other`, and the arc through it is the one bounding the shared zone.
    pub fn inner_arc(&self, other: &Ellipse, p: &R2<f64>, q: &R2<f64>) -> Option<Arc> {
        let bisector = Line::perpendicular_bisector(p, q)?;
        let hits = self.intersect_with_line(&bisector);
        let inside: Vec<&R2<f64>> = hits.iter().filter(|h| other.point_in_ellipse(h, false, 0.)).collect();
        let [ h ] = inside.as_slice() else {
            debug!("{} vs {}: {} of {} bisector hits inside, can't pick an arc", self.label(), other.label(), inside.len(), hits.len());
            return None;
        };
        let forward = Arc { start: *p, end: *q };
        let to_hit = self.sweep(&Arc { start: *p, end: **h });
        if to_hit < self.sweep(&forward) {
            Some(forward)
        } else {
            Some(Arc { start: *q, end: *p })
        }
    }

    /// The two arcs (one on each ellipse) bounding the lens through exactly two intersection points.
    pub fn lens_arcs(&self, other: &Ellipse, points: &[R2<f64>]) -> Option<(Arc, Arc)> {
        let [ p, q ] = points else {
            return None;
        };
        Some((self.inner_arc(other, p, q)?, other.inner_arc(self, p, q)?))
    }

    /// Area of the zone shared by two ellipses meeting in exactly two `points`. `None` if the bounding arcs can't be
    /// resolved.
    pub fn shared_zone_area(&self, other: &Ellipse, points: &[R2<f64>], measure: ArcMeasure) -> Option<f64> {
        let (mine, theirs) = self.lens_arcs(other, points)?;
        Some(self.arc_area(&mine, measure) + other.arc_area(&theirs, measure))
    }
}

#[cfg(test)]
mod tests {
    use crate::{ellipse::intersect::Precision, geometry::circle_overlap_area};

    use super::*;
    use test_log::test;

    #[test]
    fn circle_lens() {
        let a = Ellipse::circle('a', 0., 0., 5.).unwrap();
        let b = Ellipse::circle('b', 7., 0., 5.).unwrap();
        let points = a.intersect_with_ellipse(&b, Precision::Stable);
        let expected = circle_overlap_area(5., 5., 7.);
        let segments = a.shared_zone_area(&b, &points, ArcMeasure::Segments).unwrap();
        let integration = a.shared_zone_area(&b, &points, ArcMeasure::Integration).unwrap();
        assert_relative_eq!(segments, expected, epsilon = 1e-9);
        assert_relative_eq!(integration, expected, epsilon = 1e-9);
        assert_relative_eq!(segments, integration, epsilon = 1e-6);
    }

    #[test]
    fn uneven_circles_use_major_arc() {
        // The small circle's center lies inside the big one, so its lens arc sweeps more than half way round
        let a = Ellipse::circle('a', 0., 0., 4.).unwrap();
        let b = Ellipse::circle('b', 3.5, 0., 2.).unwrap();
        let points = a.intersect_with_ellipse(&b, Precision::Stable);
        let (_, arc_b) = a.lens_arcs(&b, &points).unwrap();
        assert!(b.sweep(&arc_b) > std::f64::consts::PI);
        let expected = circle_overlap_area(4., 2., 3.5);
        for measure in [ ArcMeasure::Segments, ArcMeasure::Integration ] {
            assert_relative_eq!(a.shared_zone_area(&b, &points, measure).unwrap(), expected, epsilon = 1e-9);
            assert_relative_eq!(b.shared_zone_area(&a, &points, measure).unwrap(), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn ellipse_methods_agree() {
        let a = Ellipse::new('a', 3., 1.5, 0., 0., 20.).unwrap();
        let b = Ellipse::new('b', 2., 1., 3., 1., 110.).unwrap();
        let points = a.intersect_with_ellipse(&b, Precision::Stable);
        let segments = a.shared_zone_area(&b, &points, ArcMeasure::Segments).unwrap();
        let integration = a.shared_zone_area(&b, &points, ArcMeasure::Integration).unwrap();
        assert!(segments > 0.);
        assert_relative_eq!(segments, integration, epsilon = 1e-6);
    }

    #[test]
    fn unresolvable() {
        let a = Ellipse::circle('a', 0., 0., 1.).unwrap();
        let b = Ellipse::circle('b', 5., 0., 1.).unwrap();
        assert_eq!(a.shared_zone_area(&b, &[], ArcMeasure::Segments), None);
        // Two arbitrary points whose bisector hits on `a` are both outside `b`
        let p = R2 { x: 0., y: 1. };
        let q = R2 { x: 0., y: -1. };
        assert_eq!(a.shared_zone_area(&b, &[ p, q ], ArcMeasure::Integration), None);
    }
}
