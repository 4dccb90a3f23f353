use serde::{Deserialize, Serialize};

use super::r2::R2;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: R2<f64>,
    pub max: R2<f64>,
}

impl BBox {
    pub fn new(min: R2<f64>, max: R2<f64>) -> Self {
        BBox { min, max }
    }
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
    pub fn center(&self) -> R2<f64> {
        self.min.midpoint(&self.max)
    }
    pub fn union(&self, o: &BBox) -> BBox {
        BBox {
            min: R2 { x: self.min.x.min(o.min.x), y: self.min.y.min(o.min.y) },
            max: R2 { x: self.max.x.max(o.max.x), y: self.max.y.max(o.max.y) },
        }
    }
    /// Grown by `margin` on every side.
    pub fn expand(&self, margin: f64) -> BBox {
        BBox {
            min: R2 { x: self.min.x - margin, y: self.min.y - margin },
            max: R2 { x: self.max.x + margin, y: self.max.y + margin },
        }
    }
    pub fn contains(&self, p: &R2<f64>) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }
    pub fn rect(&self) -> geo::Rect<f64> {
        geo::Rect::new(self.min, self.max)
    }
}

impl From<geo::Rect<f64>> for BBox {
    fn from(r: geo::Rect<f64>) -> Self {
        BBox {
            min: R2 { x: r.min().x, y: r.min().y },
            max: R2 { x: r.max().x, y: r.max().y },
        }
    }
}
