use std::{f64::consts::PI, fmt::{Display, Formatter, self}};

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    geometry::{bbox::BBox, conic::Conic, r2::R2, transform::{CanProject, CanTransform, Projection, Transform::{self, Rotate, Scale, ScaleXY, Translate}}},
    math::deg::{normalize_deg, Deg},
};

pub mod arc;
pub mod contains;
pub mod intersect;
pub mod polygon;
pub mod shared;

/// Labeled ellipse with semi-axes `a`, `b`, center `(xc, yc)` and the `a`-axis rotated `rot` degrees from the x-axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEllipse")]
pub struct Ellipse {
    label: char,
    a: f64,
    b: f64,
    xc: f64,
    yc: f64,
    rot: f64,
}

#[derive(Deserialize)]
struct RawEllipse {
    label: char,
    a: f64,
    b: f64,
    xc: f64,
    yc: f64,
    rot: f64,
}

impl TryFrom<RawEllipse> for Ellipse {
    type Error = ConfigError;
    fn try_from(raw: RawEllipse) -> Result<Self, Self::Error> {
        Ellipse::new(raw.label, raw.a, raw.b, raw.xc, raw.yc, raw.rot)
    }
}

fn check(label: char, a: f64, b: f64, xc: f64, yc: f64, rot: f64) -> Result<(), ConfigError> {
    if !label.is_alphanumeric() || label == '0' {
        return Err(ConfigError::InvalidLabel(label.to_string()));
    }
    let invalid = |reason: String| Err(ConfigError::InvalidEllipse { label, reason });
    if !(a > 0. && a.is_finite()) {
        return invalid(format!("semi-axis a must be positive, found {}", a));
    }
    if !(b > 0. && b.is_finite()) {
        return invalid(format!("semi-axis b must be positive, found {}", b));
    }
    if !xc.is_finite() || !yc.is_finite() || !rot.is_finite() {
        return invalid(format!("non-finite center or rotation ({}, {}, {})", xc, yc, rot));
    }
    Ok(())
}

impl Ellipse {
    pub fn new(label: char, a: f64, b: f64, xc: f64, yc: f64, rot: f64) -> Result<Self, ConfigError> {
        check(label, a, b, xc, yc, rot)?;
        Ok(Ellipse { label, a, b, xc, yc, rot: normalize_deg(rot) })
    }

    pub fn circle(label: char, xc: f64, yc: f64, r: f64) -> Result<Self, ConfigError> {
        Ellipse::new(label, r, r, xc, yc, 0.)
    }

    /// `[a, b, xc, yc, rot]`, the order used by [`Ellipse::to_reals`].
    pub fn from_reals(label: char, reals: [ f64; 5 ]) -> Result<Self, ConfigError> {
        let [ a, b, xc, yc, rot ] = reals;
        Ellipse::new(label, a, b, xc, yc, rot)
    }

    pub fn to_reals(&self) -> [ f64; 5 ] {
        [ self.a, self.b, self.xc, self.yc, self.rot ]
    }

    pub fn label(&self) -> char { self.label }
    pub fn a(&self) -> f64 { self.a }
    pub fn b(&self) -> f64 { self.b }
    pub fn xc(&self) -> f64 { self.xc }
    pub fn yc(&self) -> f64 { self.yc }
    /// Rotation in degrees, in `[0, 360)`.
    pub fn rot(&self) -> f64 { self.rot }
    /// Rotation in radians.
    pub fn theta(&self) -> f64 { self.rot.rad() }

    pub fn center(&self) -> R2<f64> {
        R2 { x: self.xc, y: self.yc }
    }

    pub fn is_circle(&self) -> bool {
        (self.a - self.b).abs() <= 1e-12 * self.a.max(self.b)
    }

    /// Semi-axes parallel to the coordinate axes.
    pub fn is_axis_aligned(&self) -> bool {
        let r = self.rot.rem_euclid(90.);
        r < 1e-12 || 90. - r < 1e-12
    }

    pub fn area(&self) -> f64 {
        PI * self.a * self.b
    }

    pub fn conic(&self) -> Conic {
        Conic::from_ellipse(self.a, self.b, self.center(), self.theta())
    }

    /// Maps this ellipse onto the unit circle.
    pub fn projection(&self) -> Projection {
        Projection(vec![
            Translate(-self.center()),
            Rotate(-self.theta()),
            ScaleXY(R2 { x: 1. / self.a, y: 1. / self.b }),
        ])
    }

    /// Maps the unit circle onto this ellipse.
    pub fn unprojection(&self) -> Projection {
        -self.projection()
    }

    pub fn bounding_box(&self) -> BBox {
        let (sin, cos) = self.theta().sin_cos();
        let (a, b) = (self.a, self.b);
        let hx = (a * a * cos * cos + b * b * sin * sin).sqrt();
        let hy = (a * a * sin * sin + b * b * cos * cos).sqrt();
        let c = self.center();
        BBox::new(R2 { x: c.x - hx, y: c.y - hy }, R2 { x: c.x + hx, y: c.y + hy })
    }

    /// Move the center by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.xc += dx;
        self.yc += dy;
    }

    /// Scale the semi-axes independently; non-positive or non-finite results are rejected.
    pub fn scale_axes(&mut self, fa: f64, fb: f64) -> bool {
        let (a, b) = (self.a * fa, self.b * fb);
        if a > 0. && b > 0. && a.is_finite() && b.is_finite() {
            self.a = a;
            self.b = b;
            true
        } else {
            false
        }
    }

    /// Rotate about the center by `deg` degrees.
    pub fn rotate_by(&mut self, deg: f64) {
        self.rot = normalize_deg(self.rot + deg);
    }

    fn with_params(&self, a: f64, b: f64, c: R2<f64>, rot: f64) -> Option<Ellipse> {
        check(self.label, a, b, c.x, c.y, rot).ok()?;
        Some(Ellipse { label: self.label, a, b, xc: c.x, yc: c.y, rot: normalize_deg(rot) })
    }
}

impl Display for Ellipse {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: c({:.3}, {:.3}) r({:.3}, {:.3}) {:.1}°", self.label, self.xc, self.yc, self.a, self.b, self.rot)
    }
}

impl CanTransform for Ellipse {
    /// `None` when the image is degenerate (zero scale) or the scaled conic isn't an ellipse.
    type Output = Option<Ellipse>;
    fn transform(&self, t: &Transform) -> Option<Ellipse> {
        match t {
            Translate(v) => self.with_params(self.a, self.b, self.center() + *v, self.rot),
            // Ellipses are symmetric under a half-turn, so a negative factor only moves the center
            Scale(k) => self.with_params(self.a * k.abs(), self.b * k.abs(), self.center() * *k, self.rot),
            Rotate(theta) => self.with_params(self.a, self.b, self.center().rotate(*theta), self.rot + theta.deg()),
            ScaleXY(_) => {
                let params = self.conic().project(&t.matrix())?.to_ellipse()?;
                self.with_params(params.a, params.b, params.center, params.theta.deg())
            },
        }
    }
}

impl CanProject for Ellipse {
    type Output = Option<Ellipse>;
    fn apply(&self, projection: &Projection) -> Option<Ellipse> {
        projection.0.iter().try_fold(self.clone(), |e, t| e.transform(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn construction() {
        let e = Ellipse::new('a', 2., 1., 3., 4., 390.).unwrap();
        assert_relative_eq!(e.rot(), 30., epsilon = 1e-12);
        assert_eq!(e.to_reals()[0..4], [ 2., 1., 3., 4. ]);
        assert_relative_eq!(e.area(), 2. * PI);
        assert!(matches!(Ellipse::new('a', 0., 1., 0., 0., 0.), Err(ConfigError::InvalidEllipse { label: 'a', .. })));
        assert!(matches!(Ellipse::new('a', 1., -1., 0., 0., 0.), Err(ConfigError::InvalidEllipse { .. })));
        assert_eq!(Ellipse::circle('0', 0., 0., 1.), Err(ConfigError::InvalidLabel("0".to_string())));
        assert_eq!(Ellipse::circle(' ', 0., 0., 1.), Err(ConfigError::InvalidLabel(" ".to_string())));
        let round_trip = Ellipse::from_reals('b', e.to_reals()).unwrap();
        assert_relative_eq!(round_trip.rot(), e.rot());
        assert_eq!(round_trip.label(), 'b');
    }

    #[test]
    fn projection_maps_to_unit_circle() {
        let e = Ellipse::new('a', 3., 1.5, 1., -2., 40.).unwrap();
        let proj = e.projection();
        for deg in [ 0_f64, 45., 90., 200., 333. ] {
            let t = deg.rad();
            let local = R2 { x: 3. * t.cos(), y: 1.5 * t.sin() };
            let p = local.rotate(e.theta()) + e.center();
            assert_relative_eq!(p.apply(&proj).norm(), 1., epsilon = 1e-12);
            assert_relative_eq!(local.rotate(e.theta()).apply(&Projection(vec![ Translate(e.center()) ])), p, epsilon = 1e-12);
        }
        let unit = R2 { x: 0.6, y: 0.8 };
        assert_relative_eq!(unit.apply(&e.unprojection()).apply(&proj), unit, epsilon = 1e-12);
        assert_eq!(e.apply(&proj).map(|u| u.is_circle()), Some(true));
    }

    #[test]
    fn bounding_box() {
        let e = Ellipse::new('a', 2., 1., 0., 0., 90.).unwrap();
        let bbox = e.bounding_box();
        assert_relative_eq!(bbox.min, R2 { x: -1., y: -2. }, epsilon = 1e-12);
        assert_relative_eq!(bbox.max, R2 { x: 1., y: 2. }, epsilon = 1e-12);
        let c = Ellipse::circle('c', 1., 1., 3.).unwrap().bounding_box();
        assert_relative_eq!(c.width(), 6.);
        assert_relative_eq!(c.center(), R2 { x: 1., y: 1. });
    }

    #[test]
    fn transforms() {
        let e = Ellipse::new('a', 2., 1., 1., 0., 0.).unwrap();
        let moved = e.transform(&Translate(R2 { x: 1., y: 2. })).unwrap();
        assert_eq!(moved.center(), R2 { x: 2., y: 2. });
        let scaled = e.transform(&Scale(2.)).unwrap();
        assert_eq!(scaled.to_reals(), [ 4., 2., 2., 0., 0. ]);
        assert_eq!(e.transform(&Scale(0.)), None);
        let rotated = e.transform(&Rotate(PI / 2.)).unwrap();
        assert_relative_eq!(rotated.center(), R2 { x: 0., y: 1. }, epsilon = 1e-12);
        assert_relative_eq!(rotated.rot(), 90., epsilon = 1e-12);
        // Stretching x turns the axis-aligned ellipse into a wider one
        let stretched = e.transform(&ScaleXY(R2 { x: 2., y: 1. })).unwrap();
        assert_relative_eq!(stretched.area(), 2. * e.area(), epsilon = 1e-9);
        assert_relative_eq!(stretched.center(), R2 { x: 2., y: 0. }, epsilon = 1e-12);
        assert_relative_eq!(stretched.bounding_box().width(), 8., epsilon = 1e-9);
    }

    #[test]
    fn mutation() {
        let mut e = Ellipse::new('a', 2., 1., 0., 0., 350.).unwrap();
        e.translate(1., -1.);
        e.rotate_by(20.);
        assert!(e.scale_axes(1.5, 2.));
        assert!(!e.scale_axes(0., 1.));
        assert_relative_eq!(e.rot(), 10., epsilon = 1e-12);
        assert_eq!((e.a(), e.b()), (3., 2.));
        assert_eq!(e.center(), R2 { x: 1., y: -1. });
    }

    #[test]
    fn deserialize_validates() {
        let e: Ellipse = serde_json::from_str(r#"{"label":"b","a":2,"b":1,"xc":0,"yc":1,"rot":-90}"#).unwrap();
        assert_eq!(e.rot(), 270.);
        assert_eq!(serde_json::from_str::<Ellipse>(&serde_json::to_string(&e).unwrap()).unwrap(), e);

        let flat = serde_json::from_str::<Ellipse>(r#"{"label":"a","a":0,"b":1,"xc":0,"yc":0,"rot":0}"#);
        assert!(flat.unwrap_err().to_string().contains("Invalid ellipse 'a'"));
        let outside = serde_json::from_str::<Ellipse>(r#"{"label":"0","a":1,"b":1,"xc":0,"yc":0,"rot":0}"#);
        assert!(outside.unwrap_err().to_string().contains("Invalid zone or ellipse label"));
    }
}
