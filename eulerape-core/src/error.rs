use serde::{Deserialize, Serialize};

/// Rejected input: malformed ellipses, area specs, or optimizer parameters.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Expected 2-4 ellipses, found {0}")]
    EllipseCount(usize),

    #[error("Duplicate ellipse label {0:?}")]
    DuplicateEllipseLabel(char),

    #[error("Invalid zone or ellipse label {0:?}")]
    InvalidLabel(String),

    #[error("Zone {0:?} specified more than once")]
    DuplicateZone(String),

    #[error("Missing area for zone {0:?}")]
    MissingZone(String),

    #[error("Zone {0:?} is not a combination of the labels {1:?}")]
    UnexpectedZone(String, String),

    #[error("Zone {zone:?} must have a positive area, found {area}")]
    NonPositiveArea {
        zone: String,
        area: f64,
    },

    #[error("Expected {expected} zone areas, found {found}")]
    ValueCount {
        expected: usize,
        found: usize,
    },

    #[error("Area spec labels {spec:?} don't match diagram labels {diagram:?}")]
    LabelMismatch {
        spec: String,
        diagram: String,
    },

    #[error("{0} ellipses are not supported here")]
    UnsupportedEllipseCount(usize),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    #[error("Invalid ellipse {label:?}: {reason}")]
    InvalidEllipse {
        label: char,
        reason: String,
    },
}

/// Why a diagram's zone areas could not be computed; the diagram is marked invalid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum DiagramError {
    #[error("Ellipses {pair:?} intersect in {count} points, expected 2")]
    IntersectionCount {
        pair: String,
        count: usize,
    },

    #[error("Couldn't resolve which arcs of {0:?} bound their shared zone")]
    UnresolvedLens(String),

    #[error("Expected 1 intersection of {pair:?} inside the third ellipse, found {inside}")]
    CentralRegion {
        pair: String,
        inside: usize,
    },

    #[error("Zone {zone:?} has negative area {area}")]
    NegativeArea {
        zone: String,
        area: f64,
    },

    #[error("Analytic zone areas support 2 or 3 ellipses, found {0}")]
    UnsupportedEllipseCount(usize),

    #[error("Polygon decomposition failed: {0}")]
    Decomposition(String),
}
