pub mod config;
pub mod hill_climber;

pub use config::{ClimbConfig, RetryConfig, RetryMode, StepSizes, Thresholds};
pub use hill_climber::{FitOutcome, HillClimber, History, ScoredDiagram, Termination};

#[cfg(test)]
mod tests;
