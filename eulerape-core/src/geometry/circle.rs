use std::f64::consts::PI;

/// Area of the lens shared by circles of radii `r1`, `r2` whose centers are `d` apart.
pub fn circle_overlap_area(r1: f64, r2: f64, d: f64) -> f64 {
    if d >= r1 + r2 {
        return 0.;
    }
    if d <= (r1 - r2).abs() {
        let r = r1.min(r2);
        return PI * r * r;
    }
    let cos1 = ((d * d + r1 * r1 - r2 * r2) / (2. * d * r1)).clamp(-1., 1.);
    let cos2 = ((d * d + r2 * r2 - r1 * r1) / (2. * d * r2)).clamp(-1., 1.);
    let kite = (-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2);
    r1 * r1 * cos1.acos() + r2 * r2 * cos2.acos() - kite.max(0.).sqrt() / 2.
}
