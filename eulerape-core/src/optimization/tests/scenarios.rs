use test_log::test;

use super::*;
use crate::{
    error::ConfigError,
    initial::circles_for,
    optimization::{ClimbConfig, HillClimber, StepSizes, Termination, Thresholds},
};

#[test]
fn symmetric_circles() {
    let spec = symmetric_spec();
    let diagram = EllipseDiagram::new(circles_for(&spec).unwrap()).unwrap();
    let config = ClimbConfig { circles_only: true, max_iterations: Some(300), ..ClimbConfig::default() };
    let climber = HillClimber::new(&spec, config).unwrap();
    let initial = climber.score(diagram.clone()).unwrap().fitness;
    let mut outcome = climber.run(diagram).unwrap();
    assert_ne!(outcome.termination, Termination::Error);
    assert!(outcome.diagram.is_valid());
    assert_eq!(outcome.history[0], initial);
    assert_non_increasing(&outcome.history);
    assert!(outcome.fitness <= initial);
    assert_eq!(outcome.history.last().cloned(), Some(outcome.fitness));
    assert!(outcome.diagram.ellipses().iter().all(|e| e.is_circle()));
    // Every zone is reported, even when a fit is poor
    assert_eq!(outcome.diagram.zone_areas().len(), 7);
    // Circles can't realize these overlaps to within 1e-3
    assert!(outcome.diagram_error > 1e-3, "{}", outcome.diagram_error);
}

#[test]
fn symmetric_ellipses_converge() {
    let spec = symmetric_spec();
    let diagram = EllipseDiagram::new(circles_for(&spec).unwrap()).unwrap();
    let config = ClimbConfig {
        max_iterations: Some(2_000),
        thresholds: Thresholds { proportion_difference: Some(1e-3), ..Thresholds::default() },
        ..ClimbConfig::default()
    };
    let climber = HillClimber::new(&spec, config).unwrap();
    let mut outcome = climber.run(diagram).unwrap();
    assert!(outcome.termination.converged(), "{:?}", outcome.termination);
    assert!(outcome.diagram_error <= 1e-3, "{}", outcome.diagram_error);
    assert!(outcome.diagram.is_valid());
    assert!(outcome.diagram.ellipses().iter().any(|e| !e.is_circle()));
    assert_non_increasing(&outcome.history);
}

#[test]
fn recovers_known_circles() {
    let mut target = circles(&[ ('a', 0., 0., 5.), ('b', 6., 0., 4.5), ('c', 2.5, 5., 4.8) ]);
    target.evaluate();
    let reals: Vec<f64> = target.zone_labels().iter().map(|z| target.zone_areas()[z]).collect();
    let spec = RequiredAreaSpec::from_reals(&target.labels(), &reals).unwrap();

    let start = circles(&[ ('a', 0., 0., 5.), ('b', 6.4, 0.3, 4.3), ('c', 2.2, 5.3, 5.1) ]);
    let config = ClimbConfig {
        steps: StepSizes { d: 1., s: 5., r: 60. },
        circles_only: true,
        max_iterations: Some(2_000),
        thresholds: Thresholds { proportion_difference: Some(1e-3), ..Thresholds::default() },
        ..ClimbConfig::default()
    };
    let climber = HillClimber::new(&spec, config).unwrap();
    let outcome = climber.run(start).unwrap();
    assert!(outcome.termination.converged(), "{:?}", outcome.termination);
    assert!(outcome.diagram_error <= 1e-3, "{}", outcome.diagram_error);
    assert_non_increasing(&outcome.history);
}

#[test]
fn zero_target_rejected() {
    let err = RequiredAreaSpec::new(&[ 'a', 'b' ], [ ("a", 1.), ("b", 1.), ("ab", 0.) ]).unwrap_err();
    assert_eq!(err, ConfigError::NonPositiveArea { zone: "ab".to_string(), area: 0. });
}

#[test]
fn invalid_start() {
    let spec = RequiredAreaSpec::new(&[ 'a', 'b' ], [ ("a", 1.), ("b", 1.), ("ab", 1.) ]).unwrap();
    let disjoint = circles(&[ ('a', 0., 0., 1.), ('b', 5., 0., 1.) ]);
    let outcome = HillClimber::new(&spec, ClimbConfig::default()).unwrap().run(disjoint).unwrap();
    assert_eq!(outcome.termination, Termination::Error);
    assert_eq!(outcome.iterations, 0);
    assert!(outcome.history.is_empty());
    assert!(outcome.diagram.failure().is_some());
}

#[test]
fn label_mismatch() {
    let spec = RequiredAreaSpec::new(&[ 'a', 'c' ], [ ("a", 1.), ("c", 1.), ("ac", 1.) ]).unwrap();
    let diagram = circles(&[ ('a', 0., 0., 1.), ('b', 1., 0., 1.) ]);
    let climber = HillClimber::new(&spec, ClimbConfig::default()).unwrap();
    assert!(matches!(climber.run(diagram), Err(ConfigError::LabelMismatch { .. })));
}

#[test]
fn invalid_config() {
    let spec = symmetric_spec();
    let config = ClimbConfig { min_step: 0., ..ClimbConfig::default() };
    assert!(HillClimber::new(&spec, config).is_err());
}

#[test]
fn ellipses_rotate() {
    let spec = RequiredAreaSpec::new(&[ 'a', 'b' ], [ ("a", 4.), ("b", 1.), ("ab", 2.) ]).unwrap();
    let start = EllipseDiagram::new(vec![
        Ellipse::new('a', 2., 1., 0., 0., 0.).unwrap(),
        Ellipse::new('b', 1.5, 0.8, 1.5, 0.5, 30.).unwrap(),
    ]).unwrap();
    let config = ClimbConfig { steps: StepSizes { d: 0.5, s: 10., r: 30. }, max_iterations: Some(500), ..ClimbConfig::default() };
    let climber = HillClimber::new(&spec, config).unwrap();
    let initial = climber.score(start.clone()).unwrap().fitness;
    let mut outcome = climber.run(start).unwrap();
    assert!(outcome.diagram.is_valid());
    assert!(outcome.fitness < initial);
    assert_non_increasing(&outcome.history);
}
