use std::collections::BTreeMap;

use geo::MultiPolygon;
use log::debug;

use crate::{ellipse::Ellipse, error::ConfigError, geometry::bbox::BBox};

use super::{canonicalize, region::Region, zone_labels};

/// Pieces smaller than this fraction of the enclosing rectangle are discarded as slivers.
pub const EMPTY_FRACTION: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct Zone<R> {
    pub region: R,
    pub area: f64,
    pub components: usize,
}

/// Zones found by polygon decomposition, keyed by canonical label; `""` is the outside.
#[derive(Debug, Clone)]
pub struct ZoneSet<R> {
    pub labels: Vec<char>,
    pub zones: BTreeMap<String, Zone<R>>,
}

impl<R: Region> ZoneSet<R> {
    /// Area of every non-empty label combination, including those not realized (0).
    pub fn areas(&self) -> BTreeMap<String, f64> {
        zone_labels(&self.labels)
            .into_iter()
            .map(|label| {
                let area = self.zones.get(&label).map(|z| z.area).unwrap_or(0.);
                (label, area)
            })
            .collect()
    }

    /// Labels of realized zones (outside excluded).
    pub fn nonempty(&self) -> Vec<&str> {
        self.zones.keys().filter(|l| !l.is_empty()).map(|l| l.as_str()).collect()
    }

    /// Zones split into more than one piece.
    pub fn disconnected(&self) -> Vec<&str> {
        self.zones
            .iter()
            .filter(|(label, zone)| !label.is_empty() && zone.components > 1)
            .map(|(label, _)| label.as_str())
            .collect()
    }
}

/// Carve the plane into zones: starting from a rectangle around every ellipse (labeled `""`), split each zone into its
/// parts inside and outside each ellipse's polygon.
pub fn decompose(ellipses: &[Ellipse], interval: f64) -> Result<ZoneSet<MultiPolygon<f64>>, ConfigError> {
    let Some(first) = ellipses.first() else {
        return Err(ConfigError::EllipseCount(0));
    };
    let bounds = ellipses
        .iter()
        .skip(1)
        .fold(first.bounding_box(), |bbox, e| bbox.union(&e.bounding_box()));
    let bounds: BBox = bounds.expand(bounds.width().max(bounds.height()) * 0.1);
    let threshold = EMPTY_FRACTION * bounds.width() * bounds.height();
    let mut zones: Vec<(String, MultiPolygon<f64>)> = vec![ (String::new(), MultiPolygon::new(vec![ bounds.rect().to_polygon() ])) ];
    for ellipse in ellipses {
        let shape = MultiPolygon::new(vec![ ellipse.to_geo_polygon(interval) ]);
        let mut next = Vec::with_capacity(zones.len() * 2);
        for (label, region) in zones {
            let inside = region.intersect(&shape);
            if !inside.is_empty() && inside.area() > threshold {
                let extended = format!("{}{}", label, ellipse.label());
                let Some(extended) = canonicalize(&extended) else {
                    return Err(ConfigError::DuplicateEllipseLabel(ellipse.label()));
                };
                next.push((extended, inside));
            }
            let outside = region.subtract(&shape);
            if !outside.is_empty() && outside.area() > threshold {
                next.push((label, outside));
            }
        }
        zones = next;
    }
    let labels = ellipses.iter().map(|e| e.label()).collect();
    let zones = zones
        .into_iter()
        .map(|(label, region)| {
            let area = region.area();
            let components = region.components();
            debug!("zone {:?}: area {:.4}, {} component(s)", label, area, components);
            (label, Zone { region, area, components })
        })
        .collect();
    Ok(ZoneSet { labels, zones })
}
