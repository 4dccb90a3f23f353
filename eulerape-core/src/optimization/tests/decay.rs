use test_log::test;

use super::*;
use crate::optimization::{ClimbConfig, HillClimber, StepSizes, Termination};

// One sweep from here improves a center but no circle's size
fn start() -> EllipseDiagram {
    circles(&[ ('a', 0., 0., 5.), ('b', 8., 0., 5.), ('c', 4., 5., 5.) ])
}

fn one_sweep(lock_params: bool) -> ClimbConfig {
    ClimbConfig {
        steps: StepSizes { d: 2., s: 10., r: 60. },
        lock_params,
        circles_only: true,
        max_iterations: Some(1),
        ..ClimbConfig::default()
    }
}

#[test]
fn unlocked_halves_stalled_families() {
    let spec = symmetric_spec();
    let outcome = HillClimber::new(&spec, one_sweep(false)).unwrap().run(start()).unwrap();
    assert_eq!(outcome.termination, Termination::MaxIterations);
    assert_eq!(outcome.history.len(), 2);
    assert_eq!(outcome.steps, StepSizes { d: 2., s: 5., r: 30. });
}

#[test]
fn locked_keeps_steps_after_improvement() {
    let spec = symmetric_spec();
    let outcome = HillClimber::new(&spec, one_sweep(true)).unwrap().run(start()).unwrap();
    assert_eq!(outcome.termination, Termination::MaxIterations);
    assert_eq!(outcome.history.len(), 2);
    assert_eq!(outcome.steps, StepSizes { d: 2., s: 10., r: 60. });
}

#[test]
fn accept_equal() {
    let spec = symmetric_spec();
    let strict = HillClimber::new(&spec, one_sweep(true)).unwrap();
    assert!(strict.improves(0.5, 1.));
    assert!(!strict.improves(1., 1.));
    assert!(!strict.improves(1.5, 1.));

    let config = ClimbConfig { accept_equal: true, max_iterations: Some(20), ..one_sweep(true) };
    let lenient = HillClimber::new(&spec, config).unwrap();
    assert!(lenient.improves(1., 1.));
    assert!(!lenient.improves(1.5, 1.));

    let outcome = lenient.run(start()).unwrap();
    assert_ne!(outcome.termination, Termination::Error);
    assert!(outcome.fitness < outcome.history[0]);
    assert_non_increasing(&outcome.history);
}
