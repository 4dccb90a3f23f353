use test_log::test;

use super::*;
use crate::optimization::{ClimbConfig, HillClimber, RetryConfig, RetryMode, StepSizes, Termination};

fn coarse(mode: RetryMode) -> ClimbConfig {
    ClimbConfig {
        steps: StepSizes { d: 2., s: 10., r: 60. },
        circles_only: true,
        min_step: 0.5,
        retry: RetryConfig { mode, increment: 0.5, max_retries: 2 },
        ..ClimbConfig::default()
    }
}

fn start() -> EllipseDiagram {
    circles(&[ ('a', 0., 0., 5.), ('b', 8., 0., 5.), ('c', 4., 5., 5.) ])
}

#[test]
fn no_retry() {
    let spec = symmetric_spec();
    let outcome = HillClimber::new(&spec, coarse(RetryMode::None)).unwrap().run(start()).unwrap();
    assert_eq!(outcome.termination, Termination::ExhaustedNeighborhood);
    assert_eq!(outcome.retries, 0);
    assert!(outcome.steps.d < 0.5 && outcome.steps.s < 0.5);
}

#[test]
fn retries_continue_from_best() {
    let spec = symmetric_spec();
    let single = HillClimber::new(&spec, coarse(RetryMode::None)).unwrap().run(start()).unwrap();
    let retried = HillClimber::new(&spec, coarse(RetryMode::IncParamsOnly)).unwrap().run(start()).unwrap();
    assert_eq!(retried.retries, 2);
    assert!(retried.iterations > single.iterations);
    assert!(retried.fitness <= single.fitness);
    assert_non_increasing(&retried.history);
}

#[test]
fn retries_restart_from_initial() {
    let spec = symmetric_spec();
    let climber = HillClimber::new(&spec, coarse(RetryMode::InitAndIncParams)).unwrap();
    let initial = climber.score(start()).unwrap().fitness;
    let outcome = climber.run(start()).unwrap();
    assert_eq!(outcome.retries, 2);
    assert!(outcome.fitness <= initial);
    assert_eq!(outcome.history[0], initial);
}
