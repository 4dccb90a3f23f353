use std::{collections::BTreeMap, str::FromStr};

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How per-zone errors combine into one score.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    Max,
    Mean,
    Sum,
}

/// Per-zone error, comparing actual area `a` with required area `r`. Actual areas are first scaled by `s = R / A`
/// (required over actual totals) so that only proportions matter, except for `Raw`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// `|a - r|`, unscaled.
    Raw,
    /// `|s·a - r| / r`
    ScaledActualToRequired,
    /// `|ln(s·a / r)|`
    LogRatio,
    /// `max(s·a, r) / min(s·a, r) - 1`
    AspectRatio,
    /// `(a - β·r)² / Σa²` with the least-squares `β = Σa·r / Σr²`; summed, this is the stress of the layout.
    Stress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessMeasure {
    pub aggregation: Aggregation,
    pub normalization: Normalization,
}

impl Default for FitnessMeasure {
    fn default() -> Self {
        FitnessMeasure { aggregation: Aggregation::Sum, normalization: Normalization::Stress }
    }
}

fn parse_variant<T: Copy>(s: &str, name: &str, variants: &[ (&str, T) ]) -> Result<T, ConfigError> {
    let key = s.to_lowercase().replace(['-', '_'], "");
    variants
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .ok_or_else(|| ConfigError::InvalidParameter { name: name.to_string(), reason: format!("unrecognized value {:?}", s) })
}

impl FromStr for Aggregation {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s, "aggregation", &[
            ("max", Aggregation::Max),
            ("mean", Aggregation::Mean),
            ("sum", Aggregation::Sum),
        ])
    }
}

impl FromStr for Normalization {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(s, "normalization", &[
            ("raw", Normalization::Raw),
            ("scaledactualtorequired", Normalization::ScaledActualToRequired),
            ("scaled", Normalization::ScaledActualToRequired),
            ("logratio", Normalization::LogRatio),
            ("log", Normalization::LogRatio),
            ("aspectratio", Normalization::AspectRatio),
            ("stress", Normalization::Stress),
        ])
    }
}

/// `"<aggregation>:<normalization>"`, e.g. `"sum:stress"` or `"max:log-ratio"`.
impl FromStr for FitnessMeasure {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((aggregation, normalization)) = s.split_once(':') else {
            return Err(ConfigError::InvalidParameter { name: "measure".to_string(), reason: format!("expected <aggregation>:<normalization>, found {:?}", s) });
        };
        Ok(FitnessMeasure { aggregation: aggregation.parse()?, normalization: normalization.parse()? })
    }
}

/// Per-zone errors under `normalization`, for parallel slices of required and actual areas.
pub fn zone_errors(normalization: Normalization, required: &[f64], actual: &[f64]) -> Vec<f64> {
    let total_required: f64 = required.iter().sum();
    let total_actual: f64 = actual.iter().sum();
    let s = if total_actual > 0. { total_required / total_actual } else { f64::INFINITY };
    let pairs = required.iter().zip(actual.iter());
    match normalization {
        Normalization::Raw => pairs.map(|(r, a)| (a - r).abs()).collect(),
        Normalization::ScaledActualToRequired => pairs.map(|(r, a)| (s * a - r).abs() / r).collect(),
        Normalization::LogRatio => pairs.map(|(r, a)| (s * a / r).ln().abs()).collect(),
        Normalization::AspectRatio => pairs.map(|(r, a)| {
            let a = s * a;
            a.max(*r) / a.min(*r) - 1.
        }).collect(),
        Normalization::Stress => {
            let ar: f64 = required.iter().zip(actual.iter()).map(|(r, a)| a * r).sum();
            let rr: f64 = required.iter().map(|r| r * r).sum();
            let aa: f64 = actual.iter().map(|a| a * a).sum();
            let beta = ar / rr;
            pairs.map(|(r, a)| (a - beta * r).powi(2) / aa).collect()
        },
    }
}

pub fn aggregate(aggregation: Aggregation, errors: &[f64]) -> f64 {
    match aggregation {
        Aggregation::Max => errors.iter().cloned().fold(0., f64::max),
        Aggregation::Sum => errors.iter().sum(),
        Aggregation::Mean => if errors.is_empty() { 0. } else { errors.iter().sum::<f64>() / errors.len() as f64 },
    }
}

/// Score actual areas against required ones; 0 is a perfect match.
pub fn evaluate(measure: &FitnessMeasure, required: &[f64], actual: &[f64]) -> f64 {
    let errors = zone_errors(measure.normalization, required, actual);
    let score = aggregate(measure.aggregation, &errors);
    if score.is_nan() { f64::INFINITY } else { score }
}

/// Summary statistics compared against convergence thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    /// Largest `|s·a - r|`.
    pub absolute: f64,
    /// Largest `|s·a - r| / r`.
    pub relative: f64,
    /// Largest `|a/A - r/R|`.
    pub proportion_difference: f64,
    /// `Σ|s·a - r| / R`.
    pub error_over_total: f64,
}

impl ErrorSummary {
    pub fn new(required: &[f64], actual: &[f64]) -> Self {
        let total_required: f64 = required.iter().sum();
        let total_actual: f64 = actual.iter().sum();
        if !(total_actual > 0.) {
            return ErrorSummary { absolute: f64::INFINITY, relative: f64::INFINITY, proportion_difference: 1., error_over_total: f64::INFINITY };
        }
        let s = total_required / total_actual;
        let mut summary = ErrorSummary { absolute: 0., relative: 0., proportion_difference: 0., error_over_total: 0. };
        for (r, a) in required.iter().zip(actual.iter()) {
            let diff = (s * a - r).abs();
            summary.absolute = summary.absolute.max(diff);
            summary.relative = summary.relative.max(diff / r);
            summary.proportion_difference = summary.proportion_difference.max((a / total_actual - r / total_required).abs());
            summary.error_over_total += diff;
        }
        summary.error_over_total /= total_required;
        summary
    }
}

/// Per-zone errors keyed by zone label.
pub fn labeled_errors(normalization: Normalization, zones: &[String], required: &[f64], actual: &[f64]) -> BTreeMap<String, f64> {
    zones.iter().cloned().zip(zone_errors(normalization, required, actual)).collect()
}
