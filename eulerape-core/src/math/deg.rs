use std::f64::consts::PI;

use super::round::round;

pub trait Deg {
    fn deg(&self) -> Self;
    fn rad(&self) -> Self;
    fn deg_str(&self) -> String;
}

impl Deg for f64 {
    fn deg(&self) -> f64 {
        self * 180.0 / PI
    }
    fn rad(&self) -> f64 {
        self * PI / 180.0
    }
    fn deg_str(&self) -> String {
        let deg = round(&self.deg());
        format!("{:4}", deg)
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_deg(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.);
    if wrapped >= 360. { 0. } else { wrapped }
}

/// Wrap an angle in radians into `[0, 2π)`.
pub fn normalize_rad(rad: f64) -> f64 {
    let tau = 2. * PI;
    let wrapped = rad.rem_euclid(tau);
    if wrapped >= tau { 0. } else { wrapped }
}
