#![allow(mixed_script_confusables)]

#[cfg_attr(not(test), allow(unused_imports))]
#[macro_use]
extern crate approx;

pub mod area_spec;
pub mod diagram;
pub mod ellipse;
pub mod error;
pub mod geometry;
pub mod initial;
pub mod math;
pub mod optimization;
pub mod zone;

pub use area_spec::RequiredAreaSpec;
pub use diagram::{AreaMethod, EllipseDiagram, Validity, ZoneAreas};
pub use diagram::fitness::{Aggregation, FitnessMeasure, Normalization};
pub use ellipse::Ellipse;
pub use error::{ConfigError, DiagramError};
pub use geometry::r2::R2;
pub use optimization::{ClimbConfig, FitOutcome, HillClimber, Termination};

/// Parse a log level string into LevelFilter.
pub fn parse_log_level(level: Option<&str>) -> Result<log::LevelFilter, ConfigError> {
    match level {
        Some("off") => Ok(log::LevelFilter::Off),
        Some("error") => Ok(log::LevelFilter::Error),
        Some("warn") => Ok(log::LevelFilter::Warn),
        Some("info") | Some("") | None => Ok(log::LevelFilter::Info),
        Some("debug") => Ok(log::LevelFilter::Debug),
        Some("trace") => Ok(log::LevelFilter::Trace),
        Some(level) => Err(ConfigError::InvalidParameter {
            name: "log_level".to_string(),
            reason: format!("invalid log level: {}", level),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn log_levels() {
        assert_eq!(parse_log_level(None), Ok(log::LevelFilter::Info));
        assert_eq!(parse_log_level(Some("debug")), Ok(log::LevelFilter::Debug));
        assert!(parse_log_level(Some("loud")).is_err());
    }
}
