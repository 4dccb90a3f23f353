use std::ops::Neg;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::math::is_zero::IsZero;

use super::r2::R2;

/// Affine map of the plane. `Rotate` is counter-clockwise, in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transform {
    Translate(R2<f64>),
    Scale(f64),
    ScaleXY(R2<f64>),
    Rotate(f64),
}

use Transform::{Translate, Scale, ScaleXY, Rotate};

impl Transform {
    /// `None` for a zero scale factor.
    pub fn inverse(&self) -> Option<Transform> {
        match self {
            Translate(v) => Some(Translate(-*v)),
            Scale(k) => if k.is_zero() { None } else { Some(Scale(1. / k)) },
            ScaleXY(v) => if v.x.is_zero() || v.y.is_zero() { None } else { Some(ScaleXY(R2 { x: 1. / v.x, y: 1. / v.y })) },
            Rotate(a) => Some(Rotate(-a)),
        }
    }

    /// Homogeneous 3×3 matrix acting on column vectors `(x, y, 1)`.
    pub fn matrix(&self) -> Matrix3<f64> {
        match self {
            Translate(v) => Matrix3::new(
                1., 0., v.x,
                0., 1., v.y,
                0., 0., 1.,
            ),
            Scale(k) => Matrix3::new(
                *k, 0., 0.,
                0., *k, 0.,
                0., 0., 1.,
            ),
            ScaleXY(v) => Matrix3::new(
                v.x, 0., 0.,
                0., v.y, 0.,
                0., 0., 1.,
            ),
            Rotate(a) => {
                let (sin, cos) = a.sin_cos();
                Matrix3::new(
                    cos, -sin, 0.,
                    sin,  cos, 0.,
                    0.,   0.,  1.,
                )
            },
        }
    }
}

impl Neg for Transform {
    type Output = Transform;
    fn neg(self) -> Self {
        match self {
            Translate(v) => Translate(-v),
            Scale(k) => Scale(1. / k),
            ScaleXY(v) => ScaleXY(R2 { x: 1. / v.x, y: 1. / v.y }),
            Rotate(a) => Rotate(-a),
        }
    }
}

/// Transforms applied in order, first to last.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Projection(pub Vec<Transform>);

impl Projection {
    pub fn then(mut self, t: Transform) -> Self {
        self.0.push(t);
        self
    }

    /// `self` followed by `next`.
    pub fn compose(&self, next: &Projection) -> Projection {
        Projection(self.0.iter().chain(next.0.iter()).cloned().collect())
    }

    /// Each step inverted, in reverse order. `None` if any step is singular.
    pub fn inverse(&self) -> Option<Projection> {
        self.0.iter().rev().map(|t| t.inverse()).collect::<Option<Vec<_>>>().map(Projection)
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        self.0.iter().fold(Matrix3::identity(), |m, t| t.matrix() * m)
    }
}

impl Neg for Projection {
    type Output = Projection;
    fn neg(self) -> Self {
        Projection(self.0.into_iter().rev().map(|t| -t).collect())
    }
}

pub trait CanTransform {
    type Output;
    fn transform(&self, t: &Transform) -> Self::Output;
}

pub trait CanProject {
    type Output;
    fn apply(&self, projection: &Projection) -> Self::Output;
}

impl CanTransform for R2<f64> {
    type Output = R2<f64>;
    fn transform(&self, t: &Transform) -> R2<f64> {
        match t {
            Translate(v) => *self + *v,
            Scale(k) => *self * *k,
            ScaleXY(v) => *self * *v,
            Rotate(a) => self.rotate(*a),
        }
    }
}

impl CanProject for R2<f64> {
    type Output = R2<f64>;
    fn apply(&self, projection: &Projection) -> R2<f64> {
        projection.0.iter().fold(*self, |p, t| p.transform(t))
    }
}
