use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::batch::roll_encounter;
use crate::aggregate::recovery::recover_between_fights;
use crate::battle::{resolve_battle, BattleResult, Winner};
use crate::battle_log::BattleLogger;
use crate::formulas::max_monster_damage;
use crate::model::{Hero, Monster};
use crate::rng::RandomSource;
use crate::settings::{per_minute, Settings, FRAMES_PER_SECOND};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeEnd {
    Died,
    Abandoned,
    BattleCap,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LifeSummary {
    pub iterations: usize,
    pub average_xp_per_life: f64,
    pub average_kills: f64,
    pub average_time_seconds: f64,
    pub xp_per_minute: f64,
    pub xp_per_minute_with_refill: f64,
    pub average_mp_per_fight: f64,
    pub death_rate: f64,
    pub abandon_rate: f64,
    /// Resource totals and narration of the first life.
    pub mp_spent: u64,
    pub herbs_used: u64,
    pub fairy_waters_used: u64,
    pub time_frames: u64,
    pub log: Vec<String>,
}

pub(crate) fn carry_over(hero: &mut Hero, result: &BattleResult) {
    hero.hp = result.hero_hp;
    hero.mp = hero.mp.saturating_sub(result.mp_spent);
    hero.herbs = hero.herbs.saturating_sub(result.herbs_used);
    hero.fairy_water = hero.fairy_water.saturating_sub(result.fairy_waters_used);
}

/// Copy of the hero whose max hp no longer follows the carried hp.
pub(crate) fn pinned(hero: &Hero) -> Hero {
    let mut hero = hero.clone();
    hero.max_hp = Some(hero.max_hp());
    hero
}

pub(crate) fn announce(log: &mut BattleLogger, first: bool, monster: &Monster, hero_hp: i32) {
    let line = if first {
        format!("Starting fight against {} ({hero_hp} HP).", monster.name)
    } else {
        format!("Starting next fight against {} ({hero_hp} HP).", monster.name)
    };
    log.push(line);
}

#[derive(Clone, Debug)]
struct Life {
    xp: u64,
    kills: u64,
    fights: u64,
    frames: u64,
    mp_spent: u64,
    herbs_used: u64,
    fairy_waters_used: u64,
    end: LifeEnd,
}

fn run_life(
    hero: &Hero,
    template: &Monster,
    settings: &Settings,
    rng: &mut impl RandomSource,
    mut narration: Option<&mut BattleLogger>,
) -> Life {
    let mut hero = pinned(hero);
    let danger = max_monster_damage(&hero, template);
    let mut life = Life {
        xp: 0,
        kills: 0,
        fights: 0,
        frames: 0,
        mp_spent: 0,
        herbs_used: 0,
        fairy_waters_used: 0,
        end: LifeEnd::BattleCap,
    };
    while life.fights < settings.max_battles_per_life as u64 {
        let monster = roll_encounter(template, rng);
        if let Some(log) = narration.as_deref_mut() {
            announce(log, life.fights == 0, &monster, hero.hp);
        }
        let result = resolve_battle(&hero, &monster, settings, rng);
        life.fights += 1;
        life.frames += result.time_frames as u64;
        life.mp_spent += result.mp_spent as u64;
        life.herbs_used += result.herbs_used as u64;
        life.fairy_waters_used += result.fairy_waters_used as u64;
        if result.winner == Winner::Hero {
            life.xp += result.xp_gained as u64;
            life.kills += 1;
        }
        carry_over(&mut hero, &result);
        if let Some(log) = narration.as_deref_mut() {
            log.extend(result.log);
        }
        if hero.hp <= 0 {
            life.end = LifeEnd::Died;
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
        life.frames += recovery.frames;
        life.mp_spent += recovery.mp_spent as u64;
        life.herbs_used += recovery.herbs_used as u64;
        if recovery.abandoned {
            life.end = LifeEnd::Abandoned;
            break;
        }
    }
    life
}

pub fn simulate_repeated(
    hero: &Hero,
    monster: &Monster,
    settings: &Settings,
    iterations: usize,
    rng: &mut impl RandomSource,
) -> LifeSummary {
    if iterations == 0 {
        return LifeSummary::default();
    }
    let mut summary = LifeSummary {
        iterations,
        ..LifeSummary::default()
    };
    let (mut xp, mut kills, mut fights, mut frames, mut mp) = (0u64, 0u64, 0u64, 0u64, 0u64);
    let (mut deaths, mut abandons) = (0usize, 0usize);

    for index in 0..iterations {
        let mut narration = BattleLogger::new(monster.name.clone());
        let narrated = index == 0;
        let life = run_life(
            hero,
            monster,
            settings,
            rng,
            narrated.then_some(&mut narration),
        );
        debug!(
            life = index,
            kills = life.kills,
            end = ?life.end,
            frames = life.frames,
            "life finished"
        );

        xp += life.xp;
        kills += life.kills;
        fights += life.fights;
        frames += life.frames;
        mp += life.mp_spent;
        match life.end {
            LifeEnd::Died => deaths += 1,
            LifeEnd::Abandoned => abandons += 1,
            LifeEnd::BattleCap => {}
        }
        if narrated {
            summary.mp_spent = life.mp_spent;
            summary.herbs_used = life.herbs_used;
            summary.fairy_waters_used = life.fairy_waters_used;
            summary.time_frames = life.frames;
            summary.log = narration.into_lines();
        }
    }

    let n = iterations as f64;
    let refill_frames = settings.refill_frames() * n;
    summary.average_xp_per_life = xp as f64 / n;
    summary.average_kills = kills as f64 / n;
    summary.average_time_seconds = frames as f64 / n / FRAMES_PER_SECOND;
    summary.xp_per_minute = per_minute(xp as f64, frames as f64);
    summary.xp_per_minute_with_refill = per_minute(xp as f64, frames as f64 + refill_frames);
    summary.average_mp_per_fight = if fights == 0 {
        0.0
    } else {
        mp as f64 / fights as f64
    };
    summary.death_rate = deaths as f64 / n;
    summary.abandon_rate = abandons as f64 / n;

    info!(
        monster = %monster.name,
        iterations,
        xp_per_minute = summary.xp_per_minute,
        death_rate = summary.death_rate,
        "life chain finished"
    );
    summary
}
