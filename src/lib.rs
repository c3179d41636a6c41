pub mod aggregate;
pub mod battle;
pub mod battle_log;
pub mod combatant;
pub mod formulas;
pub mod model;
pub mod policy;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod settings;

use crate::aggregate::{simulate_many, simulate_many_par, simulate_repeated, simulate_zone};
use crate::battle::resolve_battle;
use crate::report::{write_log_json, Report};
use crate::scenario::Scenario;
use anyhow::Context;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Battle,
    Many,
    Repeated,
    Zone,
}

impl Mode {
    pub fn parse(value: &str) -> anyhow::Result<Mode> {
        match value.to_ascii_lowercase().as_str() {
            "battle" => Ok(Mode::Battle),
            "many" => Ok(Mode::Many),
            "repeated" | "life" => Ok(Mode::Repeated),
            "zone" => Ok(Mode::Zone),
            other => anyhow::bail!("Unknown mode {other} (use battle, many, repeated or zone)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub scenario_path: PathBuf,
    pub mode: Mode,
    pub iterations: usize,
    pub seed: u64,
    pub parallel: bool,
    pub json: bool,
    pub log_json: Option<PathBuf>,
}

pub fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file at {}", path.display()))?;
    let parsed: Scenario = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    parsed
        .validate()
        .with_context(|| format!("Invalid scenario in {}", path.display()))?;
    Ok(parsed)
}

pub fn simulate(scenario: &Scenario, opts: &CliOptions) -> anyhow::Result<Report> {
    let mut rng = SmallRng::seed_from_u64(opts.seed);
    let settings = &scenario.settings;
    let hero = &scenario.hero;
    let report = match opts.mode {
        Mode::Battle => {
            let monster = scenario.monster()?;
            Report::Battle(resolve_battle(hero, monster, settings, &mut rng))
        }
        Mode::Many => {
            let monster = scenario.monster()?;
            if opts.parallel {
                Report::Many(simulate_many_par(hero, monster, settings, opts.iterations, opts.seed))
            } else {
                Report::Many(simulate_many(hero, monster, settings, opts.iterations, &mut rng))
            }
        }
        Mode::Repeated => {
            let monster = scenario.monster()?;
            Report::Repeated(simulate_repeated(hero, monster, settings, opts.iterations, &mut rng))
        }
        Mode::Zone => {
            let roster = scenario.roster()?;
            Report::Zone(simulate_zone(
                hero,
                roster,
                scenario.encounter_budget,
                settings,
                opts.iterations,
                &mut rng,
            ))
        }
    };
    Ok(report)
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    if opts.iterations == 0 && opts.mode != Mode::Battle {
        anyhow::bail!("--iterations must be > 0");
    }
    let scenario = load_scenario(&opts.scenario_path)?;
    info!(mode = ?opts.mode, iterations = opts.iterations, seed = opts.seed, "simulating");
    let report = simulate(&scenario, &opts)?;

    if opts.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }
    if let Some(path) = &opts.log_json {
        let label = format!("{:?}", opts.mode).to_ascii_lowercase();
        write_log_json(path, &label, report.log())?;
        info!(path = %path.display(), lines = report.log().len(), "wrote log");
    }
    Ok(())
}
