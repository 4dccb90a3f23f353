use crate::{geometry::r2::R2, math::round::{round_to, POINT_DECIMALS}};

use super::Ellipse;

impl Ellipse {
    /// Radius of the boundary along the ray from the center at `phi` radians, measured in the ellipse's own frame.
    fn boundary_radius(a: f64, b: f64, phi: f64) -> f64 {
        let (sin, cos) = phi.sin_cos();
        a * b / ((b * cos).powi(2) + (a * sin).powi(2)).sqrt()
    }

    /// Compare the point's distance from the center with the boundary's distance along the same ray, both rounded to
    /// [`POINT_DECIMALS`]. With `include_edge`, `r_p ≤ r_e + tolerance`; otherwise `r_p < r_e - tolerance`.
    pub fn point_in_ellipse(&self, p: &R2<f64>, include_edge: bool, tolerance: f64) -> bool {
        let c = self.center();
        let (r_p, r_e) = if self.is_circle() {
            (p.polar_radius(&c), self.a())
        } else {
            let local = if self.is_axis_aligned() {
                let d = *p - c;
                // Quarter turns only swap or negate coordinates
                match (self.rot() / 90.).round() as i64 % 4 {
                    1 => R2 { x: d.y, y: -d.x },
                    2 => R2 { x: -d.x, y: -d.y },
                    3 => R2 { x: -d.y, y: d.x },
                    _ => d,
                }
            } else {
                (*p - c).rotate(-self.theta())
            };
            let r_p = local.norm();
            let r_e = Ellipse::boundary_radius(self.a(), self.b(), local.y.atan2(local.x));
            (r_p, r_e)
        };
        let r_p = round_to(r_p, POINT_DECIMALS);
        let r_e = round_to(r_e, POINT_DECIMALS);
        if include_edge {
            r_p <= r_e + tolerance
        } else {
            r_p < r_e - tolerance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn circle() {
        let e = Ellipse::circle('a', 1., 1., 2.).unwrap();
        assert!(e.point_in_ellipse(&R2 { x: 2., y: 2. }, false, 0.));
        assert!(!e.point_in_ellipse(&R2 { x: 3.5, y: 1. }, true, 0.));
        let edge = R2 { x: 3., y: 1. };
        assert!(e.point_in_ellipse(&edge, true, 0.));
        assert!(!e.point_in_ellipse(&edge, false, 0.));
        assert!(e.point_in_ellipse(&R2 { x: 3.05, y: 1. }, true, 0.1));
        assert!(!e.point_in_ellipse(&R2 { x: 2.95, y: 1. }, false, 0.1));
    }

    #[test]
    fn axis_aligned() {
        let e = Ellipse::new('a', 3., 1., 0., 0., 90.).unwrap();
        assert!(e.point_in_ellipse(&R2 { x: 0., y: 2.5 }, false, 0.));
        assert!(!e.point_in_ellipse(&R2 { x: 2.5, y: 0. }, false, 0.));
        assert!(e.point_in_ellipse(&R2 { x: 0., y: -3. }, true, 0.));
        let e = Ellipse::new('a', 3., 1., 1., 0., 180.).unwrap();
        assert!(e.point_in_ellipse(&R2 { x: -1.5, y: 0. }, false, 0.));
    }

    #[test]
    fn rotated() {
        let e = Ellipse::new('a', 3., 1., 0., 0., 45.).unwrap();
        assert!(e.point_in_ellipse(&R2 { x: 2., y: 2. }, false, 0.));
        assert!(!e.point_in_ellipse(&R2 { x: 2., y: -2. }, false, 0.));
        // Boundary point along the a-axis, with float noise from the rotation
        let edge = R2 { x: 3., y: 0. }.rotate(e.theta());
        assert!(e.point_in_ellipse(&edge, true, 0.));
        assert!(!e.point_in_ellipse(&edge, false, 0.));
        assert!(e.point_in_ellipse(&e.center(), false, 0.));
    }
}
