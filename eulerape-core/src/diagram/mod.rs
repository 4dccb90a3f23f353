use std::{collections::BTreeMap, str::FromStr};

use derive_more::Display;
use geo::MultiPolygon;
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    area_spec::RequiredAreaSpec,
    ellipse::{intersect::Precision, Ellipse},
    error::{ConfigError, DiagramError},
    geometry::{bbox::BBox, r2::R2},
    math::round::{round_to, AREA_DECIMALS},
    zone::{decompose::{decompose, ZoneSet}, zone_labels},
};

use fitness::{ErrorSummary, FitnessMeasure, Normalization};

pub mod analytic;
pub mod fitness;
pub mod integration;
pub mod normalize;
pub mod segments;

/// Area of every non-empty zone, keyed by canonical label.
pub type ZoneAreas = BTreeMap<String, f64>;

/// Intersection points of each ellipse pair, keyed by the pair's canonical label (e.g. `"ab"`).
pub type IntersectionCache = BTreeMap<String, Vec<R2<f64>>>;

/// Polygon sampling interval as a fraction of the diagram's larger bounding-box side.
pub const POLYGON_RESOLUTION: f64 = 1e-3;

#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validity {
    #[default]
    Unknown,
    Valid,
    Invalid,
}

#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaMethod {
    /// Arc line integrals (2-3 ellipses).
    #[default]
    Integration,
    /// Elliptic segments and chord polygons (2-3 ellipses).
    Segments,
    /// Boolean operations on sampled polygons (2-4 ellipses, approximate).
    Polygons,
}

impl FromStr for AreaMethod {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "integration" => Ok(AreaMethod::Integration),
            "segments" => Ok(AreaMethod::Segments),
            "polygons" => Ok(AreaMethod::Polygons),
            _ => Err(ConfigError::InvalidParameter { name: "method".to_string(), reason: format!("unrecognized area method {:?}", s) }),
        }
    }
}

pub fn pair_key(e0: &Ellipse, e1: &Ellipse) -> String {
    let (l0, l1) = (e0.label(), e1.label());
    if l0 <= l1 { format!("{}{}", l0, l1) } else { format!("{}{}", l1, l0) }
}

/// Ellipses plus the zone areas and intersections derived from them. Mutations go through [`EllipseDiagram::update`],
/// which drops every cached value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EllipseDiagram {
    ellipses: Vec<Ellipse>,
    method: AreaMethod,
    validity: Validity,
    zone_areas: ZoneAreas,
    intersections: Option<IntersectionCache>,
    failure: Option<DiagramError>,
}

impl EllipseDiagram {
    pub fn new(ellipses: Vec<Ellipse>) -> Result<Self, ConfigError> {
        if !(2..=4).contains(&ellipses.len()) {
            return Err(ConfigError::EllipseCount(ellipses.len()));
        }
        if let Some((dup, _)) = ellipses.iter().map(|e| e.label()).sorted().tuple_windows().find(|(a, b)| a == b) {
            return Err(ConfigError::DuplicateEllipseLabel(dup));
        }
        Ok(EllipseDiagram {
            ellipses,
            method: AreaMethod::default(),
            validity: Validity::Unknown,
            zone_areas: ZoneAreas::new(),
            intersections: None,
            failure: None,
        })
    }

    pub fn with_method(mut self, method: AreaMethod) -> Self {
        self.set_method(method);
        self
    }

    pub fn set_method(&mut self, method: AreaMethod) {
        if method != self.method {
            self.method = method;
            self.invalidate();
        }
    }

    pub fn method(&self) -> AreaMethod {
        self.method
    }

    pub fn ellipses(&self) -> &[Ellipse] {
        &self.ellipses
    }

    pub fn ellipse(&self, label: char) -> Option<&Ellipse> {
        self.ellipses.iter().find(|e| e.label() == label)
    }

    pub fn labels(&self) -> Vec<char> {
        self.ellipses.iter().map(|e| e.label()).collect()
    }

    pub fn len(&self) -> usize {
        self.ellipses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ellipses.is_empty()
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Why the last zone-area computation failed, if it did.
    pub fn failure(&self) -> Option<&DiagramError> {
        self.failure.as_ref()
    }

    /// Zone areas from the last computation; empty until computed, or if the computation failed.
    pub fn zone_areas(&self) -> &ZoneAreas {
        &self.zone_areas
    }

    /// Drop cached areas and intersections.
    pub fn invalidate(&mut self) {
        self.validity = Validity::Unknown;
        self.zone_areas.clear();
        self.intersections = None;
        self.failure = None;
    }

    /// Mutate ellipse `idx` and reset caches. `None` if there's no such ellipse.
    pub fn update<R>(&mut self, idx: usize, f: impl FnOnce(&mut Ellipse) -> R) -> Option<R> {
        let ellipse = self.ellipses.get_mut(idx)?;
        let r = f(ellipse);
        self.invalidate();
        Some(r)
    }

    /// Replace every ellipse with `f`'s image of it, resetting caches; unchanged (and `false`) if any image is `None`.
    pub fn map_ellipses(&mut self, f: impl Fn(&Ellipse) -> Option<Ellipse>) -> bool {
        let Some(mapped) = self.ellipses.iter().map(f).collect::<Option<Vec<_>>>() else {
            return false;
        };
        self.ellipses = mapped;
        self.invalidate();
        true
    }

    /// Intersections of every pair, computed on first use. Pairs yielding a count other than 0, 2 or 4 are retried at
    /// [`Precision::Coarse`].
    pub fn intersections(&mut self) -> &IntersectionCache {
        let ellipses = &self.ellipses;
        self.intersections.get_or_insert_with(|| {
            let mut cache = IntersectionCache::new();
            for (e0, e1) in ellipses.iter().tuple_combinations() {
                let mut points = e0.intersect_with_ellipse(e1, Precision::Stable);
                if ![ 0, 2, 4 ].contains(&points.len()) {
                    warn!("{} ∩ {}: {} points at stable precision, retrying coarse", e0.label(), e1.label(), points.len());
                    points = e0.intersect_with_ellipse(e1, Precision::Coarse);
                }
                cache.insert(pair_key(e0, e1), points);
            }
            cache
        })
    }

    /// Polygon sampling interval matched to the diagram's size.
    pub fn polygon_interval(&self) -> f64 {
        let bbox = self.bounding_box();
        bbox.width().max(bbox.height()) * POLYGON_RESOLUTION
    }

    pub fn zone_set(&self, interval: f64) -> Result<ZoneSet<MultiPolygon<f64>>, ConfigError> {
        decompose(&self.ellipses, interval)
    }

    fn compute(&mut self, method: AreaMethod) -> Result<ZoneAreas, DiagramError> {
        let n = self.ellipses.len();
        let areas = match method {
            AreaMethod::Integration | AreaMethod::Segments if n > 3 => Err(DiagramError::UnsupportedEllipseCount(n)),
            AreaMethod::Integration | AreaMethod::Segments => {
                self.intersections();
                let empty = IntersectionCache::new();
                let cache = self.intersections.as_ref().unwrap_or(&empty);
                if method == AreaMethod::Integration {
                    integration::zone_areas(&self.ellipses, cache)
                } else {
                    segments::zone_areas(&self.ellipses, cache)
                }
            },
            AreaMethod::Polygons => {
                self.zone_set(self.polygon_interval())
                    .map(|zones| zones.areas())
                    .map_err(|e| DiagramError::Decomposition(e.to_string()))
            },
        }?;
        let mut rounded = ZoneAreas::new();
        for (zone, area) in areas {
            let area = round_to(area, AREA_DECIMALS);
            if area < 0. {
                return Err(DiagramError::NegativeArea { zone, area });
            }
            rounded.insert(zone, area);
        }
        Ok(rounded)
    }

    /// Compute zone areas with `method` and update validity: valid iff the computation succeeds and all `2ⁿ - 1` zones
    /// are non-empty.
    pub fn recompute_zone_areas(&mut self, method: AreaMethod) -> Result<&ZoneAreas, DiagramError> {
        self.method = method;
        match self.compute(method) {
            Ok(areas) => {
                let expected = (1 << self.ellipses.len()) - 1;
                let nonempty = areas.values().filter(|a| **a > 0.).count();
                self.validity = if nonempty == expected { Validity::Valid } else { Validity::Invalid };
                if self.validity == Validity::Invalid {
                    debug!("{} of {} zones non-empty: {:?}", nonempty, expected, areas);
                }
                self.zone_areas = areas;
                self.failure = None;
                Ok(&self.zone_areas)
            },
            Err(err) => {
                debug!("zone areas failed: {}", err);
                self.validity = Validity::Invalid;
                self.zone_areas.clear();
                self.failure = Some(err.clone());
                Err(err)
            },
        }
    }

    /// Compute zone areas with the diagram's method, unless already computed.
    pub fn evaluate(&mut self) -> Validity {
        if self.validity == Validity::Unknown {
            let _ = self.recompute_zone_areas(self.method);
        }
        self.validity
    }

    pub fn is_valid(&mut self) -> bool {
        self.evaluate() == Validity::Valid
    }

    /// Zones with zero area.
    pub fn empty_zones(&mut self) -> Result<Vec<String>, DiagramError> {
        self.evaluate();
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.zone_areas.iter().filter(|(_, a)| **a <= 0.).map(|(z, _)| z.clone()).collect())
    }

    /// Whether any zone's polygon splits into several pieces.
    pub fn has_disconnected_zones(&self, interval: f64) -> Result<bool, ConfigError> {
        Ok(!self.zone_set(interval)?.disconnected().is_empty())
    }

    pub fn bounding_box(&self) -> BBox {
        let first = self.ellipses[0].bounding_box();
        self.ellipses.iter().skip(1).fold(first, |b, e| b.union(&e.bounding_box()))
    }

    /// Required and actual areas, in canonical zone order.
    fn paired_areas(&mut self, spec: &RequiredAreaSpec) -> Result<(Vec<String>, Vec<f64>, Vec<f64>), DiagramError> {
        self.evaluate();
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let zones = spec.zones();
        let required = spec.to_reals();
        let actual = zones.iter().map(|z| self.zone_areas.get(z).cloned().unwrap_or(0.)).collect();
        Ok((zones, required, actual))
    }

    /// Score against `spec`; lower is better.
    pub fn fitness(&mut self, spec: &RequiredAreaSpec, measure: &FitnessMeasure) -> Result<f64, DiagramError> {
        let (_, required, actual) = self.paired_areas(spec)?;
        Ok(fitness::evaluate(measure, &required, &actual))
    }

    /// Each zone's error under `normalization`.
    pub fn fitness_of_all_regions(&mut self, spec: &RequiredAreaSpec, normalization: Normalization) -> Result<BTreeMap<String, f64>, DiagramError> {
        let (zones, required, actual) = self.paired_areas(spec)?;
        Ok(fitness::labeled_errors(normalization, &zones, &required, &actual))
    }

    /// Largest difference between a zone's actual and required share of the total area.
    pub fn diagram_error(&mut self, spec: &RequiredAreaSpec) -> Result<f64, DiagramError> {
        Ok(self.error_summary(spec)?.proportion_difference)
    }

    pub fn error_summary(&mut self, spec: &RequiredAreaSpec) -> Result<ErrorSummary, DiagramError> {
        let (_, required, actual) = self.paired_areas(spec)?;
        Ok(ErrorSummary::new(&required, &actual))
    }

    /// All zone labels for this diagram's ellipses, in canonical order.
    pub fn zone_labels(&self) -> Vec<String> {
        zone_labels(&self.labels())
    }
}
