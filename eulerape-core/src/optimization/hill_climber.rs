use std::{f64::consts::PI, time::Instant};

use derive_more::{Deref, Display, From};
use log::{debug, info};
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::{
    area_spec::RequiredAreaSpec,
    diagram::EllipseDiagram,
    error::ConfigError,
};

use super::config::{ClimbConfig, RetryMode, StepSizes};

/// Why a run stopped.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    ConvergedExact,
    ConvergedWithinThreshold,
    ExhaustedNeighborhood,
    MaxIterations,
    TimeBudget,
    Error,
}

impl Termination {
    pub fn converged(&self) -> bool {
        matches!(self, Termination::ConvergedExact | Termination::ConvergedWithinThreshold)
    }
}

/// A valid diagram and its fitness.
#[derive(Debug, Clone)]
pub struct ScoredDiagram {
    pub diagram: EllipseDiagram,
    pub fitness: f64,
}

/// Fitness after each accepted move, starting with the initial diagram's.
#[derive(Debug, Clone, Default, PartialEq, Deref, From, Serialize)]
pub struct History(pub Vec<f64>);

/// Parameter groups perturbed (and decayed) together.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Center,
    Axes,
    Rotation,
}

const FAMILIES: [ Family; 3 ] = [ Family::Center, Family::Axes, Family::Rotation ];

impl Family {
    fn idx(&self) -> usize {
        match self {
            Family::Center => 0,
            Family::Axes => 1,
            Family::Rotation => 2,
        }
    }
}

/// A single-ellipse perturbation.
#[derive(Debug, Display, Clone, Copy, PartialEq)]
pub enum Move {
    #[display(fmt = "translate({:.4}, {:.4})", _0, _1)]
    Translate(f64, f64),
    #[display(fmt = "scale({:.4}, {:.4})", _0, _1)]
    Scale(f64, f64),
    #[display(fmt = "rotate({:.4}°)", _0)]
    Rotate(f64),
}

impl Move {
    pub fn apply(&self, diagram: &mut EllipseDiagram, idx: usize) -> bool {
        diagram.update(idx, |e| match *self {
            Move::Translate(dx, dy) => { e.translate(dx, dy); true },
            Move::Scale(fa, fb) => e.scale_axes(fa, fb),
            Move::Rotate(deg) => { e.rotate_by(deg); true },
        }).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FitOutcome {
    pub diagram: EllipseDiagram,
    pub fitness: f64,
    /// Largest difference between actual and required area proportions.
    pub diagram_error: f64,
    pub termination: Termination,
    /// Sweeps across every run.
    pub iterations: usize,
    pub retries: usize,
    /// Accepted-fitness history of the run that produced `diagram`.
    pub history: History,
    pub steps: StepSizes,
}

struct Run {
    best: ScoredDiagram,
    termination: Termination,
    iterations: usize,
    history: History,
    steps: StepSizes,
}

/// Local search over ellipse parameters, fitting a diagram's zone areas to a [`RequiredAreaSpec`].
pub struct HillClimber<'a> {
    pub spec: &'a RequiredAreaSpec,
    pub config: ClimbConfig,
}

impl<'a> HillClimber<'a> {
    pub fn new(spec: &'a RequiredAreaSpec, config: ClimbConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(HillClimber { spec, config })
    }

    /// Score `diagram` with the configured method; `None` if it's invalid.
    pub fn score(&self, mut diagram: EllipseDiagram) -> Option<ScoredDiagram> {
        diagram.set_method(self.config.method);
        if !diagram.is_valid() {
            return None;
        }
        let fitness = diagram.fitness(self.spec, &self.config.measure).ok()?;
        Some(ScoredDiagram { diagram, fitness })
    }

    /// Apply `f` to a copy of `current`, keeping the copy only if `f` succeeds and the result is valid.
    pub fn try_mutation(&self, current: &ScoredDiagram, f: impl FnOnce(&mut EllipseDiagram) -> bool) -> Option<ScoredDiagram> {
        let mut candidate = current.diagram.clone();
        if !f(&mut candidate) {
            return None;
        }
        self.score(candidate)
    }

    pub(crate) fn improves(&self, candidate: f64, current: f64) -> bool {
        candidate < current || (self.config.accept_equal && candidate == current)
    }

    fn moves(&self, family: Family, steps: &StepSizes, circular: bool) -> Vec<Move> {
        match family {
            Family::Center => (0..8)
                .map(|k| {
                    let theta = k as f64 * PI / 4.;
                    Move::Translate(steps.d * theta.cos(), steps.d * theta.sin())
                })
                .collect(),
            Family::Axes => {
                let (up, down) = (1. + steps.s / 100., 1. - steps.s / 100.);
                if circular {
                    vec![ Move::Scale(up, up), Move::Scale(down, down) ]
                } else {
                    vec![
                        Move::Scale(up, 1.), Move::Scale(down, 1.),
                        Move::Scale(1., up), Move::Scale(1., down),
                        Move::Scale(up, up), Move::Scale(down, down),
                    ]
                }
            },
            Family::Rotation => if circular { vec![] } else { vec![ Move::Rotate(steps.r), Move::Rotate(-steps.r) ] },
        }
    }

    /// One pass over every ellipse and family, applying the best improving move of each. Returns which families
    /// improved.
    fn sweep(&self, current: &mut ScoredDiagram, steps: &StepSizes, history: &mut History) -> [ bool; 3 ] {
        let mut improved = [ false; 3 ];
        let circular = self.config.circles_only;
        for idx in 0..current.diagram.len() {
            for family in FAMILIES {
                let best = self
                    .moves(family, steps, circular)
                    .into_iter()
                    .filter_map(|m| self.try_mutation(current, |d| m.apply(d, idx)).map(|scored| (m, scored)))
                    .min_by_key(|(_, scored)| OrderedFloat(scored.fitness));
                match best {
                    Some((m, scored)) if self.improves(scored.fitness, current.fitness) => {
                        debug!("{} {}: {:.6e} → {:.6e}", current.diagram.ellipses()[idx].label(), m, current.fitness, scored.fitness);
                        history.0.push(scored.fitness);
                        *current = scored;
                        improved[family.idx()] = true;
                    },
                    _ => {},
                }
            }
        }
        improved
    }

    fn decay(&self, steps: &mut StepSizes, improved: [ bool; 3 ]) {
        let halve = |family: Family, steps: &mut StepSizes| match family {
            Family::Center => steps.d /= 2.,
            Family::Axes => steps.s /= 2.,
            Family::Rotation => steps.r /= 2.,
        };
        if self.config.lock_params {
            if !improved.iter().any(|i| *i) {
                FAMILIES.iter().for_each(|f| halve(*f, steps));
                debug!("no improvement, halving steps: {:?}", steps);
            }
        } else {
            for family in FAMILIES {
                if !improved[family.idx()] {
                    halve(family, steps);
                }
            }
        }
    }

    /// Families with at least one candidate move. Circles may still stretch and rotate unless `circles_only` is set.
    fn active(&self) -> [ bool; 3 ] {
        [ true, true, !self.config.circles_only ]
    }

    fn exhausted(&self, steps: &StepSizes, active: [ bool; 3 ]) -> bool {
        [ steps.d, steps.s, steps.r ]
            .iter()
            .zip(active)
            .filter(|(_, a)| *a)
            .all(|(step, _)| *step < self.config.min_step)
    }

    fn check(&self, current: &mut ScoredDiagram) -> Option<Termination> {
        if current.fitness <= self.config.thresholds.exact {
            return Some(Termination::ConvergedExact);
        }
        match current.diagram.error_summary(self.spec) {
            Ok(summary) if self.config.thresholds.met(&summary) => Some(Termination::ConvergedWithinThreshold),
            _ => None,
        }
    }

    fn run_once(&self, start: ScoredDiagram, mut steps: StepSizes, started: Instant, iterations_left: Option<usize>) -> Run {
        let active = self.active();
        let mut current = start;
        let mut history = History(vec![ current.fitness ]);
        let mut iterations = 0;
        let termination = loop {
            if let Some(termination) = self.check(&mut current) {
                break termination;
            }
            if self.exhausted(&steps, active) {
                break Termination::ExhaustedNeighborhood;
            }
            if iterations_left.map_or(false, |max| iterations >= max) {
                break Termination::MaxIterations;
            }
            if self.config.time_budget.map_or(false, |budget| started.elapsed() >= budget) {
                break Termination::TimeBudget;
            }
            let improved = self.sweep(&mut current, &steps, &mut history);
            self.decay(&mut steps, improved);
            iterations += 1;
        };
        info!("run ended after {} sweeps: {} (fitness {:.6e})", iterations, termination, current.fitness);
        Run { best: current, termination, iterations, history, steps }
    }

    fn outcome(&self, run: Run, iterations: usize, retries: usize) -> FitOutcome {
        let mut diagram = run.best.diagram;
        let diagram_error = diagram.diagram_error(self.spec).unwrap_or(f64::INFINITY);
        FitOutcome {
            diagram,
            fitness: run.best.fitness,
            diagram_error,
            termination: run.termination,
            iterations,
            retries,
            history: run.history,
            steps: run.steps,
        }
    }

    /// Fit `diagram`, retrying with larger steps as configured while runs end unconverged. The best result across all
    /// runs is returned; an invalid starting diagram ends immediately with [`Termination::Error`].
    pub fn run(&self, diagram: EllipseDiagram) -> Result<FitOutcome, ConfigError> {
        self.spec.check_labels(&diagram.labels())?;
        let started = Instant::now();
        let Some(initial) = self.score(diagram.clone()) else {
            let mut diagram = diagram.with_method(self.config.method);
            diagram.evaluate();
            info!("starting diagram is invalid: {:?}", diagram.failure());
            return Ok(FitOutcome {
                diagram,
                fitness: f64::INFINITY,
                diagram_error: f64::INFINITY,
                termination: Termination::Error,
                iterations: 0,
                retries: 0,
                history: History::default(),
                steps: self.config.steps,
            });
        };
        info!("fitting {} ellipses, initial fitness {:.6e}", initial.diagram.len(), initial.fitness);
        let remaining = |used: usize| self.config.max_iterations.map(|max| max.saturating_sub(used));

        let mut best = self.run_once(initial.clone(), self.config.steps, started, remaining(0));
        let mut iterations = best.iterations;
        let mut retries = 0;
        let retry = self.config.retry;
        if retry.mode != RetryMode::None {
            for k in 1..=retry.max_retries {
                if best.termination.converged() || best.termination == Termination::TimeBudget {
                    break;
                }
                if remaining(iterations) == Some(0) {
                    break;
                }
                let steps = self.config.steps.scaled((1. + retry.increment).powi(k as i32));
                let start = match retry.mode {
                    RetryMode::InitAndIncParams => initial.clone(),
                    _ => best.best.clone(),
                };
                info!("retry {} ({}): steps {:?}", k, retry.mode, steps);
                let run = self.run_once(start, steps, started, remaining(iterations));
                iterations += run.iterations;
                retries = k;
                if run.best.fitness < best.best.fitness || run.termination.converged() {
                    best = run;
                }
            }
        }
        info!("fit done: {} after {} sweeps, {} retries, fitness {:.6e}", best.termination, iterations, retries, best.best.fitness);
        Ok(self.outcome(best, iterations, retries))
    }
}
