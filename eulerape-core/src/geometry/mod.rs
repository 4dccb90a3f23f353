pub mod bbox;
pub mod circle;
pub mod conic;
pub mod line;
pub mod r2;
pub mod transform;

pub use circle::circle_overlap_area;

use r2::R2;

/// Signed area of triangle `pqr`; positive when the vertices run counter-clockwise.
pub fn triangle_area(p: &R2<f64>, q: &R2<f64>, r: &R2<f64>) -> f64 {
    (*q - *p).cross(&(*r - *p)) / 2.
}
