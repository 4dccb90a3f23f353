use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, zone::{canonicalize, zone_labels}};

/// Target area for every zone of an `n`-set diagram, validated on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAreaSpec")]
pub struct RequiredAreaSpec {
    labels: Vec<char>,
    areas: BTreeMap<String, f64>,
}

/// Unvalidated wire form; deserialization goes through [`RequiredAreaSpec::new`].
#[derive(Deserialize)]
struct RawAreaSpec {
    labels: Vec<char>,
    areas: BTreeMap<String, f64>,
}

impl TryFrom<RawAreaSpec> for RequiredAreaSpec {
    type Error = ConfigError;
    fn try_from(raw: RawAreaSpec) -> Result<Self, Self::Error> {
        RequiredAreaSpec::new(&raw.labels, raw.areas)
    }
}

fn check_alphabet(labels: &[char]) -> Result<Vec<char>, ConfigError> {
    if !(2..=4).contains(&labels.len()) {
        return Err(ConfigError::EllipseCount(labels.len()));
    }
    let sorted: Vec<char> = labels.iter().cloned().sorted().collect();
    if let Some((dup, _)) = sorted.iter().tuple_windows().find(|(a, b)| a == b) {
        return Err(ConfigError::DuplicateEllipseLabel(*dup));
    }
    if let Some(bad) = sorted.iter().find(|c| !c.is_alphanumeric() || **c == '0') {
        return Err(ConfigError::InvalidLabel(bad.to_string()));
    }
    Ok(sorted)
}

impl RequiredAreaSpec {
    /// Every non-empty combination of `labels` must be given exactly once, with a positive, finite area. Zone labels
    /// may list their ellipses in any order.
    pub fn new<S: AsRef<str>>(labels: &[char], areas: impl IntoIterator<Item = (S, f64)>) -> Result<Self, ConfigError> {
        let labels = check_alphabet(labels)?;
        let alphabet: String = labels.iter().collect();
        let mut canonical: BTreeMap<String, f64> = BTreeMap::new();
        for (raw, area) in areas {
            let raw = raw.as_ref();
            let zone = canonicalize(raw).ok_or_else(|| ConfigError::InvalidLabel(raw.to_string()))?;
            if zone.is_empty() || zone.chars().any(|c| !labels.contains(&c)) {
                return Err(ConfigError::UnexpectedZone(raw.to_string(), alphabet));
            }
            if !(area > 0. && area.is_finite()) {
                return Err(ConfigError::NonPositiveArea { zone, area });
            }
            if canonical.insert(zone.clone(), area).is_some() {
                return Err(ConfigError::DuplicateZone(zone));
            }
        }
        if let Some(missing) = zone_labels(&labels).into_iter().find(|z| !canonical.contains_key(z)) {
            return Err(ConfigError::MissingZone(missing));
        }
        Ok(RequiredAreaSpec { labels, areas: canonical })
    }

    /// Areas listed in canonical zone order (3, 7 or 15 values).
    pub fn from_reals(labels: &[char], reals: &[f64]) -> Result<Self, ConfigError> {
        let sorted = check_alphabet(labels)?;
        let zones = zone_labels(&sorted);
        if zones.len() != reals.len() {
            return Err(ConfigError::ValueCount { expected: zones.len(), found: reals.len() });
        }
        RequiredAreaSpec::new(&sorted, zones.into_iter().zip(reals.iter().cloned()))
    }

    pub fn to_reals(&self) -> Vec<f64> {
        self.zones().iter().map(|z| self.areas.get(z).cloned().unwrap_or(0.)).collect()
    }

    /// Ellipse labels, sorted.
    pub fn labels(&self) -> &[char] {
        &self.labels
    }

    /// Zone labels in canonical order.
    pub fn zones(&self) -> Vec<String> {
        zone_labels(&self.labels)
    }

    pub fn areas(&self) -> &BTreeMap<String, f64> {
        &self.areas
    }

    pub fn get(&self, zone: &str) -> Option<f64> {
        canonicalize(zone).and_then(|z| self.areas.get(&z).cloned())
    }

    pub fn total(&self) -> f64 {
        self.areas.values().sum()
    }

    /// Total area inside the ellipse labeled `label`.
    pub fn set_area(&self, label: char) -> f64 {
        self.areas.iter().filter(|(z, _)| z.contains(label)).map(|(_, a)| a).sum()
    }

    /// Total area inside every ellipse named in `zone` (e.g. `"ab"` includes `"abc"`).
    pub fn overlap(&self, zone: &str) -> f64 {
        self.areas
            .iter()
            .filter(|(z, _)| zone.chars().all(|c| z.contains(c)))
            .map(|(_, a)| a)
            .sum()
    }

    /// Error unless `labels` is the same alphabet this spec was built for.
    pub fn check_labels(&self, labels: &[char]) -> Result<(), ConfigError> {
        let sorted: Vec<char> = labels.iter().cloned().sorted().collect();
        if sorted == self.labels {
            Ok(())
        } else {
            Err(ConfigError::LabelMismatch {
                spec: self.labels.iter().collect(),
                diagram: labels.iter().collect(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn venn3() -> RequiredAreaSpec {
        RequiredAreaSpec::from_reals(&[ 'a', 'b', 'c' ], &[ 100., 100., 100., 20., 20., 20., 5. ]).unwrap()
    }

    #[test]
    fn construction() {
        let spec = RequiredAreaSpec::new(&[ 'b', 'a' ], [ ("a", 3.), ("b", 4.), ("ba", 1.) ]).unwrap();
        assert_eq!(spec.labels(), &[ 'a', 'b' ]);
        assert_eq!(spec.to_reals(), vec![ 3., 4., 1. ]);
        assert_eq!(spec.get("ba"), Some(1.));
        assert_eq!(spec.total(), 8.);
    }

    #[test]
    fn aggregates() {
        let spec = venn3();
        assert_eq!(spec.set_area('a'), 145.);
        assert_eq!(spec.overlap("ab"), 25.);
        assert_eq!(spec.overlap("cab"), 5.);
        assert_eq!(spec.total(), 365.);
        assert_eq!(spec.zones(), vec![ "a", "b", "c", "ab", "ac", "bc", "abc" ]);
    }

    #[test]
    fn rejects_bad_specs() {
        let labels = [ 'a', 'b' ];
        assert_eq!(
            RequiredAreaSpec::from_reals(&labels, &[ 1., 0., 1. ]),
            Err(ConfigError::NonPositiveArea { zone: "b".to_string(), area: 0. }),
        );
        assert_eq!(
            RequiredAreaSpec::new(&labels, [ ("a", 1.), ("b", 1.) ]),
            Err(ConfigError::MissingZone("ab".to_string())),
        );
        assert_eq!(
            RequiredAreaSpec::new(&labels, [ ("a", 1.), ("b", 1.), ("ab", 1.), ("ba", 2.) ]),
            Err(ConfigError::DuplicateZone("ab".to_string())),
        );
        assert_eq!(
            RequiredAreaSpec::new(&labels, [ ("a", 1.), ("c", 1.) ]),
            Err(ConfigError::UnexpectedZone("c".to_string(), "ab".to_string())),
        );
        assert_eq!(
            RequiredAreaSpec::new(&labels, [ ("aa", 1.) ]),
            Err(ConfigError::InvalidLabel("aa".to_string())),
        );
        assert_eq!(RequiredAreaSpec::from_reals(&[ 'a' ], &[ 1. ]), Err(ConfigError::EllipseCount(1)));
        assert_eq!(RequiredAreaSpec::from_reals(&[ 'a', 'a' ], &[ 1., 1., 1. ]), Err(ConfigError::DuplicateEllipseLabel('a')));
        assert_eq!(RequiredAreaSpec::from_reals(&labels, &[ 1., 1. ]), Err(ConfigError::ValueCount { expected: 3, found: 2 }));
        assert_eq!(RequiredAreaSpec::new(&labels, [ ("0", 1.) ]), Err(ConfigError::UnexpectedZone("0".to_string(), "ab".to_string())));
    }

    #[test]
    fn label_check() {
        let spec = venn3();
        assert_eq!(spec.check_labels(&[ 'c', 'b', 'a' ]), Ok(()));
        assert!(matches!(spec.check_labels(&[ 'a', 'b', 'd' ]), Err(ConfigError::LabelMismatch { .. })));
    }

    #[test]
    fn serde_round_trip() {
        let spec = venn3();
        let json = serde_json::to_string(&spec).unwrap();
        let parsed: RequiredAreaSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn deserialize_validates() {
        let zero = serde_json::from_str::<RequiredAreaSpec>(r#"{"labels":["a","b"],"areas":{"a":1.0,"b":0.0,"ab":1.0}}"#);
        let err = zero.unwrap_err().to_string();
        assert!(err.contains(&ConfigError::NonPositiveArea { zone: "b".to_string(), area: 0. }.to_string()), "{}", err);

        let missing = serde_json::from_str::<RequiredAreaSpec>(r#"{"labels":["a","b"],"areas":{"a":1.0,"b":1.0}}"#);
        let err = missing.unwrap_err().to_string();
        assert!(err.contains(&ConfigError::MissingZone("ab".to_string()).to_string()), "{}", err);

        let unsorted: RequiredAreaSpec = serde_json::from_str(r#"{"labels":["b","a"],"areas":{"a":1.0,"b":2.0,"ba":3.0}}"#).unwrap();
        assert_eq!(unsorted.to_reals(), vec![ 1., 2., 3. ]);
    }
}
