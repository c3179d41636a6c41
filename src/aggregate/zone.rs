use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::batch::roll_encounter;
use crate::aggregate::life::{announce, carry_over, pinned};
use crate::aggregate::recovery::recover_between_fights;
use crate::battle::{resolve_battle, Winner};
use crate::battle_log::BattleLogger;
use crate::formulas::max_monster_damage;
use crate::model::{Hero, Monster, Spell};
use crate::rng::RandomSource;
use crate::settings::{per_minute, Settings, FRAMES_PER_SECOND};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneEnd {
    Died,
    Abandoned,
    BudgetSpent,
    TimeLimit,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub iterations: usize,
    pub xp_per_minute: f64,
    pub mp_per_minute: f64,
    pub average_encounters: f64,
    pub average_kills: f64,
    pub average_repels: f64,
    pub average_time_seconds: f64,
    pub death_rate: f64,
    pub abandon_rate: f64,
    pub log: Vec<String>,
}

#[derive(Clone, Copy, Debug)]
struct ZoneRun {
    xp: u64,
    kills: u64,
    encounters: u64,
    repels: u64,
    frames: u64,
    mp_spent: u64,
    end: ZoneEnd,
}

fn should_repel(hero: &Hero, monster: &Monster, settings: &Settings) -> bool {
    hero.knows(Spell::Repel)
        && hero.mp >= Spell::Repel.mp_cost()
        && monster.xp < settings.repel_xp_threshold
}

fn run_zone(
    hero: &Hero,
    roster: &[Monster],
    encounter_budget: u32,
    settings: &Settings,
    rng: &mut impl RandomSource,
    mut narration: Option<&mut BattleLogger>,
) -> ZoneRun {
    let mut hero = pinned(hero);
    let danger = roster
        .iter()
        .map(|monster| max_monster_damage(&hero, monster))
        .max()
        .unwrap_or(0);
    let time_limit = settings.zone_time_limit_frames();
    let mut run = ZoneRun {
        xp: 0,
        kills: 0,
        encounters: 0,
        repels: 0,
        frames: 0,
        mp_spent: 0,
        end: ZoneEnd::BudgetSpent,
    };
    let mut fights = 0u64;

    for template in roster.iter().cycle() {
        if run.encounters >= encounter_budget as u64 {
            run.end = ZoneEnd::BudgetSpent;
            break;
        }
        if run.frames >= time_limit {
            run.end = ZoneEnd::TimeLimit;
            break;
        }
        run.encounters += 1;

        if should_repel(&hero, template, settings) {
            let cost = Spell::Repel.mp_cost();
            hero.mp -= cost;
            run.mp_spent += cost as u64;
            run.repels += 1;
            run.frames += (settings.repel_time + settings.frames_between_fights) as u64;
            if let Some(log) = narration.as_deref_mut() {
                log.push(format!("Hero casts REPEL and avoids {}.", template.name));
            }
            continue;
        }

        let monster = roll_encounter(template, rng);
        if let Some(log) = narration.as_deref_mut() {
            announce(log, fights == 0, &monster, hero.hp);
        }
        let result = resolve_battle(&hero, &monster, settings, rng);
        fights += 1;
        run.frames += result.time_frames as u64;
        run.mp_spent += result.mp_spent as u64;
        if result.winner == Winner::Hero {
            run.xp += result.xp_gained as u64;
            run.kills += 1;
        }
        carry_over(&mut hero, &result);
        if let Some(log) = narration.as_deref_mut() {
            log.extend(result.log);
        }
        if hero.hp <= 0 {
            run.end = ZoneEnd::Died;
            break;
        }

        let mut scratch;
        let log = match narration.as_deref_mut() {
            Some(log) => log,
            None => {
                scratch = BattleLogger::new(template.name.clone());
                &mut scratch
            }
        };
        let recovery = recover_between_fights(&mut hero, danger, settings, rng, log);
        run.frames += recovery.frames;
        run.mp_spent += recovery.mp_spent as u64;
        if recovery.abandoned {
            run.end = ZoneEnd::Abandoned;
            break;
        }
    }
    run
}

pub fn simulate_zone(
    hero: &Hero,
    roster: &[Monster],
    encounter_budget: u32,
    settings: &Settings,
    iterations: usize,
    rng: &mut impl RandomSource,
) -> ZoneSummary {
    if iterations == 0 || roster.is_empty() {
        return ZoneSummary::default();
    }
    let mut summary = ZoneSummary {
        iterations,
        ..ZoneSummary::default()
    };
    let (mut xp, mut kills, mut encounters, mut repels, mut frames, mut mp) =
        (0u64, 0u64, 0u64, 0u64, 0u64, 0u64);
    let (mut deaths, mut abandons) = (0usize, 0usize);

    for index in 0..iterations {
        let mut narration = BattleLogger::new(roster[0].name.clone());
        let narrated = index == 0;
        let run = run_zone(
            hero,
            roster,
            encounter_budget,
            settings,
            rng,
            narrated.then_some(&mut narration),
        );
        debug!(
            run = index,
            encounters = run.encounters,
            end = ?run.end,
            frames = run.frames,
            "zone run finished"
        );

        xp += run.xp;
        kills += run.kills;
        encounters += run.encounters;
        repels += run.repels;
        frames += run.frames;
        mp += run.mp_spent;
        match run.end {
            ZoneEnd::Died => deaths += 1,
            ZoneEnd::Abandoned => abandons += 1,
            ZoneEnd::BudgetSpent | ZoneEnd::TimeLimit => {}
        }
        if narrated {
            summary.log = narration.into_lines();
        }
    }

    let n = iterations as f64;
    summary.xp_per_minute = per_minute(xp as f64, frames as f64);
    summary.mp_per_minute = per_minute(mp as f64, frames as f64);
    summary.average_encounters = encounters as f64 / n;
    summary.average_kills = kills as f64 / n;
    summary.average_repels = repels as f64 / n;
    summary.average_time_seconds = frames as f64 / n / FRAMES_PER_SECOND;
    summary.death_rate = deaths as f64 / n;
    summary.abandon_rate = abandons as f64 / n;

    info!(
        roster = roster.len(),
        iterations,
        xp_per_minute = summary.xp_per_minute,
        death_rate = summary.death_rate,
        "zone grind finished"
    );
    summary
}
