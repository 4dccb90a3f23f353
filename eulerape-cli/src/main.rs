//! CLI for area-proportional Euler diagrams drawn with ellipses.
//!
//! Provides:
//! - Zone areas, validity and intersections for a given set of ellipses
//! - Fitting ellipses to required zone areas, optionally across parallel jittered variants

use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use eulerape_core::{
    initial::circles_for,
    parse_log_level,
    AreaMethod, ClimbConfig, Ellipse, EllipseDiagram, FitOutcome, FitnessMeasure, HillClimber, RequiredAreaSpec,
};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "eulerape")]
#[command(about = "Area-proportional Euler diagrams drawn with ellipses", long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute zone areas for a set of ellipses
    Zones {
        /// Ellipses (JSON array of {label, a, b, xc, yc, rot})
        #[arg(short, long)]
        ellipses: String,

        /// Area method: integration, segments or polygons
        #[arg(short, long, default_value = "integration")]
        method: String,
    },

    /// Fit ellipses to required zone areas
    Fit {
        /// Required areas (JSON object, zone label → area)
        #[arg(short, long)]
        areas: String,

        /// Starting ellipses (JSON); defaults to circles sized and spaced from the areas
        #[arg(short, long)]
        ellipses: Option<String>,

        /// Climb configuration (JSON); omitted fields take their defaults
        #[arg(long)]
        config: Option<String>,

        /// Keep every ellipse a circle
        #[arg(long)]
        circles: bool,

        /// Maximum sweeps across all runs
        #[arg(short = 'n', long)]
        max_iterations: Option<usize>,

        /// Area method: integration, segments or polygons
        #[arg(short, long)]
        method: Option<String>,

        /// Fitness measure, "<aggregation>:<normalization>"
        #[arg(long)]
        measure: Option<String>,

        /// Number of jittered variants to fit in parallel
        #[arg(short, long, default_value = "1")]
        parallel: usize,

        /// Seed for variant jitter
        #[arg(short, long, default_value = "0")]
        seed: u64,
    },
}

#[derive(Serialize)]
struct ZonesReport<'a> {
    validity: String,
    zone_areas: &'a BTreeMap<String, f64>,
    intersections: BTreeMap<String, Vec<eulerape_core::R2<f64>>>,
    failure: Option<String>,
}

fn parse_ellipses(json: &str) -> Result<Vec<Ellipse>> {
    serde_json::from_str(json).context("parsing ellipses")
}

fn parse_areas(json: &str) -> Result<RequiredAreaSpec> {
    let areas: BTreeMap<String, f64> = serde_json::from_str(json).context("parsing areas")?;
    let mut labels: Vec<char> = areas.keys().flat_map(|k| k.chars()).collect();
    labels.sort();
    labels.dedup();
    Ok(RequiredAreaSpec::new(&labels, areas)?)
}

/// Shift each center by up to `scale` times its ellipse's mean semi-axis.
fn jitter(ellipses: &[Ellipse], rng: &mut StdRng, scale: f64) -> Vec<Ellipse> {
    ellipses
        .iter()
        .map(|e| {
            let size = (e.a() + e.b()) / 2.;
            let mut e = e.clone();
            e.translate(rng.gen_range(-scale..=scale) * size, rng.gen_range(-scale..=scale) * size);
            e
        })
        .collect()
}

fn zones(ellipses: &str, method: &str) -> Result<()> {
    let method: AreaMethod = method.parse()?;
    let mut diagram = EllipseDiagram::new(parse_ellipses(ellipses)?)?.with_method(method);
    let validity = diagram.evaluate();
    let intersections = diagram.intersections().clone();
    let report = ZonesReport {
        validity: validity.to_string(),
        zone_areas: diagram.zone_areas(),
        intersections,
        failure: diagram.failure().map(|f| f.to_string()),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn fit(
    areas: &str,
    ellipses: Option<String>,
    config: Option<String>,
    circles: bool,
    max_iterations: Option<usize>,
    method: Option<String>,
    measure: Option<String>,
    parallel: usize,
    seed: u64,
) -> Result<()> {
    let spec = parse_areas(areas)?;
    let mut config: ClimbConfig = match config {
        Some(json) => serde_json::from_str(&json).context("parsing config")?,
        None => ClimbConfig::default(),
    };
    config.circles_only |= circles;
    if max_iterations.is_some() {
        config.max_iterations = max_iterations;
    }
    if let Some(method) = method {
        config.method = method.parse()?;
    }
    if let Some(measure) = measure {
        config.measure = measure.parse::<FitnessMeasure>()?;
    }
    let start = match ellipses {
        Some(json) => parse_ellipses(&json)?,
        None => circles_for(&spec)?,
    };
    let climber = HillClimber::new(&spec, config)?;

    let variants = parallel.max(1);
    info!("fitting {} variant(s), seed {}", variants, seed);
    let outcomes: Vec<FitOutcome> = (0..variants)
        .into_par_iter()
        .map(|idx| -> Result<FitOutcome> {
            let ellipses = if idx == 0 {
                start.clone()
            } else {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(idx as u64));
                jitter(&start, &mut rng, 0.1)
            };
            let diagram = EllipseDiagram::new(ellipses)?;
            Ok(climber.run(diagram)?)
        })
        .collect::<Result<_>>()?;
    for (idx, outcome) in outcomes.iter().enumerate() {
        info!("variant {}: {} fitness {:.6e}", idx, outcome.termination, outcome.fitness);
    }
    let best = outcomes
        .into_iter()
        .min_by(|l, r| l.fitness.total_cmp(&r.fitness))
        .ok_or_else(|| anyhow!("no variants ran"))?;
    println!("{}", serde_json::to_string_pretty(&best)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = parse_log_level(cli.log_level.as_deref())?;
    env_logger::Builder::from_default_env().filter_level(level).init();

    match cli.command {
        Commands::Zones { ellipses, method } => zones(&ellipses, &method),
        Commands::Fit { areas, ellipses, config, circles, max_iterations, method, measure, parallel, seed } => {
            fit(&areas, ellipses, config, circles, max_iterations, method, measure, parallel, seed)
        },
    }
}
