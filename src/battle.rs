use serde::Serialize;

use crate::battle_log::BattleLogger;
use crate::combatant::{HeroState, MonsterState};
use crate::formulas::{max_monster_damage, monster_physical_ceiling};
use crate::model::{Hero, Monster};
use crate::policy::{hero as hero_policy, monster as monster_policy};
use crate::rng::RandomSource;
use crate::settings::{per_minute, Settings, FRAMES_PER_SECOND};

pub const AGILITY_FACTOR: f64 = 0.25;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Hero,
    Monster,
    Fled,
    HeroFled,
}

#[derive(Clone, Debug, Serialize)]
pub struct BattleResult {
    pub winner: Winner,
    pub rounds: u32,
    pub time_frames: u32,
    pub time_seconds: f64,
    pub xp_gained: u32,
    pub xp_per_minute: f64,
    pub mp_spent: u32,
    pub herbs_used: u32,
    pub fairy_waters_used: u32,
    pub hero_hp: i32,
    pub log: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct BattleState {
    pub hero: HeroState,
    pub monster: MonsterState,
    /// Hero's upper bound on the monster's remaining hp.
    pub monster_hp_known_max: i32,
    pub monster_max_damage: i32,
    pub time_frames: u32,
    pub rounds: u32,
    pub mp_spent: u32,
    pub herbs_used: u32,
    pub fairy_waters_used: u32,
    pub hero_fled: bool,
    pub log: BattleLogger,
}

impl BattleState {
    pub fn new(hero: &Hero, monster: &Monster, settings: &Settings) -> Self {
        let monster_max_damage = max_monster_damage(hero, monster);
        let hero = HeroState::from_record(hero);
        let monster = MonsterState::from_record(monster);
        BattleState {
            monster_hp_known_max: monster.max_hp,
            monster_max_damage,
            time_frames: settings.pre_battle_time,
            rounds: 0,
            mp_spent: 0,
            herbs_used: 0,
            fairy_waters_used: 0,
            hero_fled: false,
            log: BattleLogger::new(monster.name.clone()),
            hero,
            monster,
        }
    }

    pub fn add_frames(&mut self, frames: u32) {
        self.time_frames = self.time_frames.saturating_add(frames);
    }

    pub fn damage_monster(&mut self, damage: i32) {
        self.monster.hp -= damage;
        self.monster_hp_known_max = (self.monster_hp_known_max - damage).max(0);
    }

    /// Monster's damage ceiling as the hero sees it this turn. A stopspelled
    /// caster of HURT/HURTMORE only has its bare attack left.
    pub fn current_max_damage(&self) -> i32 {
        if self.monster.stopspelled && self.monster.attack_ability.is_hurt_spell() {
            monster_physical_ceiling(self.monster.attack, self.hero.defense)
        } else {
            self.monster_max_damage
        }
    }

    pub fn is_over(&self) -> bool {
        self.hero.hp <= 0 || self.monster.hp <= 0 || self.monster.fled || self.hero_fled
    }

    fn fled(&self) -> bool {
        self.monster.fled || self.hero_fled
    }

    pub fn ambush_check(&mut self, settings: &Settings, rng: &mut impl RandomSource) -> bool {
        let hero_roll = self.hero.agility as f64 * rng.byte() as f64;
        let monster_roll = self.monster.agility as f64 * AGILITY_FACTOR * rng.byte() as f64;
        if hero_roll < monster_roll {
            self.log.log_ambush();
            self.add_frames(settings.ambush_time);
            monster_policy::run_monster_turn(self, settings, rng);
            return true;
        }
        false
    }

    pub fn run_rounds(&mut self, settings: &Settings, rng: &mut impl RandomSource) {
        while !self.is_over() {
            self.rounds += 1;
            hero_policy::run_hero_turn(self, settings, rng);
            if self.monster.hp <= 0 {
                self.log.log_defeat(false);
                break;
            }
            if self.hero.hp <= 0 || self.fled() {
                break;
            }
            monster_policy::run_monster_turn(self, settings, rng);
            if self.hero.hp <= 0 {
                self.log.log_defeat(true);
                break;
            }
        }
    }

    pub fn into_result(mut self, settings: &Settings) -> BattleResult {
        let outro = if self.fled() {
            settings.monster_flee_time
        } else {
            settings.post_battle_time
        };
        self.add_frames(outro);
        let winner = if self.monster.fled {
            Winner::Fled
        } else if self.hero_fled {
            Winner::HeroFled
        } else if self.hero.hp > 0 {
            Winner::Hero
        } else {
            Winner::Monster
        };
        let xp_gained = if winner == Winner::Hero {
            self.monster.xp
        } else {
            0
        };
        BattleResult {
            winner,
            rounds: self.rounds,
            time_frames: self.time_frames,
            time_seconds: self.time_frames as f64 / FRAMES_PER_SECOND,
            xp_gained,
            xp_per_minute: per_minute(xp_gained as f64, self.time_frames as f64),
            mp_spent: self.mp_spent,
            herbs_used: self.herbs_used,
            fairy_waters_used: self.fairy_waters_used,
            hero_hp: self.hero.hp.max(0),
            log: self.log.into_lines(),
        }
    }
}

pub fn resolve_battle(
    hero: &Hero,
    monster: &Monster,
    settings: &Settings,
    rng: &mut impl RandomSource,
) -> BattleResult {
    let mut state = BattleState::new(hero, monster, settings);
    state.ambush_check(settings, rng);
    if !state.is_over() {
        state.run_rounds(settings, rng);
    }
    state.into_result(settings)
}
