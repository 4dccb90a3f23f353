use std::time::Duration;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
    diagram::{fitness::{ErrorSummary, FitnessMeasure}, AreaMethod},
    error::ConfigError,
};

/// Perturbation sizes: center offset `d`, axis scale `s` (percent) and rotation `r` (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSizes {
    pub d: f64,
    pub s: f64,
    pub r: f64,
}

impl Default for StepSizes {
    fn default() -> Self {
        StepSizes { d: 10., s: 5., r: 60. }
    }
}

impl StepSizes {
    pub fn scaled(&self, factor: f64) -> StepSizes {
        StepSizes { d: self.d * factor, s: self.s * factor, r: self.r * factor }
    }
}

/// Stopping points short of an exact fit. Each optional bound is checked against the diagram's [`ErrorSummary`]; any
/// one being met ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Fitness at or below which the fit counts as exact.
    pub exact: f64,
    pub absolute_error: Option<f64>,
    pub relative_error: Option<f64>,
    pub proportion_difference: Option<f64>,
    pub error_over_total: Option<f64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            exact: 1e-12,
            absolute_error: None,
            relative_error: None,
            proportion_difference: None,
            error_over_total: None,
        }
    }
}

impl Thresholds {
    fn bounds(&self) -> [ (&'static str, Option<f64>); 4 ] {
        [
            ("absolute_error", self.absolute_error),
            ("relative_error", self.relative_error),
            ("proportion_difference", self.proportion_difference),
            ("error_over_total", self.error_over_total),
        ]
    }

    pub fn met(&self, summary: &ErrorSummary) -> bool {
        let actual = [ summary.absolute, summary.relative, summary.proportion_difference, summary.error_over_total ];
        self.bounds()
            .iter()
            .zip(actual)
            .any(|((_, bound), value)| bound.map_or(false, |b| value <= b))
    }
}

#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryMode {
    #[default]
    None,
    /// Rerun from the best diagram so far with larger steps.
    IncParamsOnly,
    /// Rerun from the starting diagram with larger steps.
    InitAndIncParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    pub mode: RetryMode,
    /// Retry `k` multiplies every step size by `(1 + increment)^k`.
    pub increment: f64,
    pub max_retries: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig { mode: RetryMode::None, increment: 0.5, max_retries: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbConfig {
    pub steps: StepSizes,
    /// Decay all step sizes together (when a sweep changes nothing), rather than per family.
    pub lock_params: bool,
    pub measure: FitnessMeasure,
    /// Keep circles circular: no independent axis scaling, no rotation.
    pub circles_only: bool,
    /// Accept moves that tie the current fitness.
    pub accept_equal: bool,
    pub max_iterations: Option<usize>,
    pub time_budget: Option<Duration>,
    /// Step sizes below this are spent.
    pub min_step: f64,
    pub method: AreaMethod,
    pub thresholds: Thresholds,
    pub retry: RetryConfig,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        ClimbConfig {
            steps: StepSizes::default(),
            lock_params: true,
            measure: FitnessMeasure::default(),
            circles_only: false,
            accept_equal: false,
            max_iterations: Some(10_000),
            time_budget: None,
            min_step: 1e-6,
            method: AreaMethod::default(),
            thresholds: Thresholds::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl ClimbConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |name: &str, reason: String| Err(ConfigError::InvalidParameter { name: name.to_string(), reason });
        let positive = [
            ("steps.d", self.steps.d),
            ("steps.s", self.steps.s),
            ("steps.r", self.steps.r),
            ("min_step", self.min_step),
        ];
        for (name, value) in positive {
            if !(value > 0. && value.is_finite()) {
                return invalid(name, format!("must be positive, found {}", value));
            }
        }
        if !(self.thresholds.exact >= 0.) {
            return invalid("thresholds.exact", format!("must be non-negative, found {}", self.thresholds.exact));
        }
        for (name, bound) in self.thresholds.bounds() {
            if let Some(b) = bound {
                if !(b >= 0.) {
                    return invalid(name, format!("must be non-negative, found {}", b));
                }
            }
        }
        if !(self.retry.increment >= 0. && self.retry.increment.is_finite()) {
            return invalid("retry.increment", format!("must be non-negative, found {}", self.retry.increment));
        }
        if self.max_iterations == Some(0) {
            return invalid("max_iterations", "must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn defaults() {
        let config = ClimbConfig::default();
        assert_eq!(config.steps, StepSizes { d: 10., s: 5., r: 60. });
        assert!(config.lock_params);
        assert_eq!(config.max_iterations, Some(10_000));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects() {
        let mut config = ClimbConfig::default();
        config.steps.s = 0.;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidParameter { name, .. }) if name == "steps.s"));
        let mut config = ClimbConfig::default();
        config.thresholds.relative_error = Some(-0.1);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidParameter { name, .. }) if name == "relative_error"));
        let mut config = ClimbConfig::default();
        config.min_step = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn thresholds() {
        let summary = ErrorSummary { absolute: 2., relative: 0.1, proportion_difference: 0.01, error_over_total: 0.05 };
        assert!(!Thresholds::default().met(&summary));
        assert!(Thresholds { proportion_difference: Some(0.01), ..Thresholds::default() }.met(&summary));
        assert!(!Thresholds { relative_error: Some(0.05), absolute_error: Some(1.), ..Thresholds::default() }.met(&summary));
    }

    #[test]
    fn partial_json() {
        let config: ClimbConfig = serde_json::from_str(r#"{ "circles_only": true, "steps": { "d": 1, "s": 2, "r": 3 } }"#).unwrap();
        assert!(config.circles_only);
        assert_eq!(config.steps.r, 3.);
        assert_eq!(config.min_step, 1e-6);
    }
}
