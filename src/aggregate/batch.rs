use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::battle::{resolve_battle, BattleResult, Winner};
use crate::model::{Hero, Monster};
use crate::rng::RandomSource;
use crate::settings::{per_minute, Settings, FRAMES_PER_SECOND};

/// Fresh copy of `template` with its hp redrawn in `[ceil(0.75 * max), max]`,
/// where max is the template's max hp (its hp when unset).
pub fn roll_encounter(template: &Monster, rng: &mut impl RandomSource) -> Monster {
    let hp_max = template.max_hp();
    let hp_min = (hp_max as f64 * 0.75).ceil() as i32;
    let mut monster = template.clone();
    monster.hp = rng.range_inclusive(hp_min, hp_max);
    monster.max_hp = Some(hp_max);
    monster
}

pub fn trial_seed(seed: u64, trial: usize) -> u64 {
    seed ^ (trial as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub iterations: usize,
    pub win_rate: f64,
    pub monster_win_rate: f64,
    pub monster_flee_rate: f64,
    pub hero_flee_rate: f64,
    pub xp_per_minute: f64,
    pub average_mp_spent: f64,
    pub average_herbs_used: f64,
    pub average_fairy_waters_used: f64,
    pub average_time_seconds: f64,
    pub average_rounds: f64,
}

#[derive(Clone, Copy, Debug, Default)]
struct BatchTally {
    trials: usize,
    hero_wins: u64,
    monster_wins: u64,
    monster_flees: u64,
    hero_flees: u64,
    xp: u64,
    frames: u64,
    mp: u64,
    herbs: u64,
    fairy_waters: u64,
    rounds: u64,
}

impl BatchTally {
    fn record(&mut self, result: &BattleResult) {
        self.trials += 1;
        match result.winner {
            Winner::Hero => self.hero_wins += 1,
            Winner::Monster => self.monster_wins += 1,
            Winner::Fled => self.monster_flees += 1,
            Winner::HeroFled => self.hero_flees += 1,
        }
        self.xp += result.xp_gained as u64;
        self.frames += result.time_frames as u64;
        self.mp += result.mp_spent as u64;
        self.herbs += result.herbs_used as u64;
        self.fairy_waters += result.fairy_waters_used as u64;
        self.rounds += result.rounds as u64;
    }

    fn merge(mut self, other: BatchTally) -> BatchTally {
        self.trials += other.trials;
        self.hero_wins += other.hero_wins;
        self.monster_wins += other.monster_wins;
        self.monster_flees += other.monster_flees;
        self.hero_flees += other.hero_flees;
        self.xp += other.xp;
        self.frames += other.frames;
        self.mp += other.mp;
        self.herbs += other.herbs;
        self.fairy_waters += other.fairy_waters;
        self.rounds += other.rounds;
        self
    }

    fn summary(&self) -> BatchSummary {
        if self.trials == 0 {
            return BatchSummary::default();
        }
        let n = self.trials as f64;
        BatchSummary {
            iterations: self.trials,
            win_rate: self.hero_wins as f64 / n,
            monster_win_rate: self.monster_wins as f64 / n,
            monster_flee_rate: self.monster_flees as f64 / n,
            hero_flee_rate: self.hero_flees as f64 / n,
            xp_per_minute: per_minute(self.xp as f64, self.frames as f64),
            average_mp_spent: self.mp as f64 / n,
            average_herbs_used: self.herbs as f64 / n,
            average_fairy_waters_used: self.fairy_waters as f64 / n,
            average_time_seconds: self.frames as f64 / n / FRAMES_PER_SECOND,
            average_rounds: self.rounds as f64 / n,
        }
    }
}

fn run_trial(
    hero: &Hero,
    template: &Monster,
    settings: &Settings,
    rng: &mut impl RandomSource,
) -> BattleResult {
    let monster = roll_encounter(template, rng);
    resolve_battle(hero, &monster, settings, rng)
}

pub fn simulate_many(
    hero: &Hero,
    monster: &Monster,
    settings: &Settings,
    iterations: usize,
    rng: &mut impl RandomSource,
) -> BatchSummary {
    let mut tally = BatchTally::default();
    for trial in 0..iterations {
        let result = run_trial(hero, monster, settings, rng);
        debug!(trial, winner = ?result.winner, frames = result.time_frames, "battle finished");
        tally.record(&result);
    }
    let summary = tally.summary();
    info!(
        monster = %monster.name,
        iterations,
        win_rate = summary.win_rate,
        xp_per_minute = summary.xp_per_minute,
        "batch finished"
    );
    summary
}

pub fn simulate_many_par(
    hero: &Hero,
    monster: &Monster,
    settings: &Settings,
    iterations: usize,
    seed: u64,
) -> BatchSummary {
    let tally = (0..iterations)
        .into_par_iter()
        .map(|trial| {
            let mut rng = SmallRng::seed_from_u64(trial_seed(seed, trial));
            let result = run_trial(hero, monster, settings, &mut rng);
            let mut tally = BatchTally::default();
            tally.record(&result);
            tally
        })
        .reduce(BatchTally::default, BatchTally::merge);
    let summary = tally.summary();
    info!(
        monster = %monster.name,
        iterations,
        win_rate = summary.win_rate,
        xp_per_minute = summary.xp_per_minute,
        "parallel batch finished"
    );
    summary
}
