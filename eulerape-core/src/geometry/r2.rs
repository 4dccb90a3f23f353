use std::{ops::{Sub, Mul, Add, Div, Neg}, fmt::{Display, Formatter, self}};

use approx::{AbsDiffEq, RelativeEq};
use num_traits::Float;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct R2<D> {
    pub x: D,
    pub y: D,
}

impl<D: Display> Display for R2<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

impl<D: Float> R2<D> {
    pub fn new(x: D, y: D) -> Self {
        R2 { x, y }
    }
    pub fn norm2(&self) -> D {
        self.x * self.x + self.y * self.y
    }
    pub fn norm(&self) -> D {
        self.x.hypot(self.y)
    }
    pub fn dot(&self, o: &Self) -> D {
        self.x * o.x + self.y * o.y
    }
    /// z-component of the 3D cross product; positive when `o` is counter-clockwise of `self`.
    pub fn cross(&self, o: &Self) -> D {
        self.x * o.y - self.y * o.x
    }
    pub fn distance(&self, o: &Self) -> D {
        (*self - *o).norm()
    }
    pub fn midpoint(&self, o: &Self) -> Self {
        let two = D::one() + D::one();
        R2 { x: (self.x + o.x) / two, y: (self.y + o.y) / two }
    }
    /// Angle of `self` as seen from `origin`, in `(-π, π]`.
    pub fn polar_angle(&self, origin: &Self) -> D {
        (self.y - origin.y).atan2(self.x - origin.x)
    }
    pub fn polar_radius(&self, origin: &Self) -> D {
        self.distance(origin)
    }
    /// Rotate counter-clockwise about the origin by `theta` radians.
    pub fn rotate(&self, theta: D) -> Self {
        let (sin, cos) = theta.sin_cos();
        R2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<D: AbsDiffEq<Epsilon = f64>> AbsDiffEq for R2<D> {
    type Epsilon = f64;
    fn default_epsilon() -> Self::Epsilon {
        D::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl<D: RelativeEq<Epsilon = f64>> RelativeEq for R2<D> {
    fn default_max_relative() -> Self::Epsilon {
        D::default_max_relative()
    }
    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative) && self.y.relative_eq(&other.y, epsilon, max_relative)
    }
}

impl<D: Add<Output = D>> Add for R2<D> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        R2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<D: Sub<Output = D>> Sub for R2<D> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        R2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<D: Neg<Output = D>> Neg for R2<D> {
    type Output = Self;
    fn neg(self) -> Self::Output {
        R2 { x: -self.x, y: -self.y }
    }
}

impl<D: Mul<Output = D>> Mul for R2<D> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        R2 {
            x: self.x * rhs.x,
            y: self.y * rhs.y,
        }
    }
}

impl Mul<f64> for R2<f64> {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        R2 {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl<D: Div<Output = D>> Div for R2<D> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self::Output {
        R2 {
            x: self.x / rhs.x,
            y: self.y / rhs.y,
        }
    }
}

impl Div<f64> for R2<f64> {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        R2 {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}

impl From<R2<f64>> for geo::Coord<f64> {
    fn from(p: R2<f64>) -> Self {
        geo::Coord { x: p.x, y: p.y }
    }
}
