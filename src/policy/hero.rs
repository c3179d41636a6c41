use crate::battle::{BattleState, AGILITY_FACTOR};
use crate::formulas::{
    critical_damage, expected_physical_damage, fairy_water_damage, heal_amount, herb_amount,
    hurt_spell_damage, min_physical_damage, physical_damage, Caster, HealSpell, HurtSpell,
    CRITICAL_CHANCE, FAIRY_WATER_AVERAGE, FAIRY_WATER_MIN, IMMUNE_FAIRY_WATER_AVERAGE,
};
use crate::model::Spell;
use crate::rng::RandomSource;
use crate::settings::Settings;
use tracing::trace;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HeroAction {
    Attack,
    Hurt(HurtSpell),
    Heal(HealSpell),
    Sleep,
    Stopspell,
    Herb,
    FairyWater,
    FairyFlute,
    Run,
}

pub type Rule = fn(&BattleState, &Settings) -> Option<HeroAction>;

pub const RULES: [(&str, Rule); 6] = [
    ("fairy_flute", fairy_flute),
    ("guaranteed_kill", guaranteed_kill),
    ("emergency_heal", emergency_heal),
    ("retreat", retreat),
    ("crowd_control", crowd_control),
    ("best_damage", best_damage),
];

pub fn choose_rule(
    state: &BattleState,
    settings: &Settings,
) -> Option<(&'static str, HeroAction)> {
    RULES
        .iter()
        .find_map(|(name, rule)| rule(state, settings).map(|action| (*name, action)))
}

pub fn choose_action(state: &BattleState, settings: &Settings) -> HeroAction {
    match choose_rule(state, settings) {
        Some((rule, action)) => {
            trace!(rule, ?action, "hero rule fired");
            action
        }
        None => HeroAction::Attack,
    }
}

fn hero_min_physical(state: &BattleState) -> i32 {
    min_physical_damage(state.hero.attack as f64, state.monster.defense as f64)
}

pub fn fairy_flute(state: &BattleState, _settings: &Settings) -> Option<HeroAction> {
    (state.hero.fairy_flute && state.monster.flute_sleeps && !state.monster.sleep.asleep)
        .then_some(HeroAction::FairyFlute)
}

#[derive(Clone, Copy, Debug)]
struct KillOption {
    action: HeroAction,
    min_damage: i32,
    fail_chance: f64,
}

fn kill_options(state: &BattleState) -> Vec<KillOption> {
    let hero = &state.hero;
    let monster = &state.monster;
    let mut options = vec![KillOption {
        action: HeroAction::Attack,
        min_damage: hero_min_physical(state),
        fail_chance: monster.dodge_chance(),
    }];
    for spell in [HurtSpell::Hurtmore, HurtSpell::Hurt] {
        if hero.can_cast(spell.spell()) {
            options.push(KillOption {
                action: HeroAction::Hurt(spell),
                min_damage: spell.hero_min(),
                fail_chance: monster.hurt_resist,
            });
        }
    }
    if hero.fairy_water > 0 {
        let (min_damage, fail_chance) = if monster.fairy_water_immune {
            (0, 0.5)
        } else {
            (FAIRY_WATER_MIN, 0.0)
        };
        options.push(KillOption {
            action: HeroAction::FairyWater,
            min_damage,
            fail_chance,
        });
    }
    options
}

/// Picks the first option whose worst roll still finishes the monster as far
/// as the hero knows. A zero risk factor accepts any failure chance.
pub fn guaranteed_kill(state: &BattleState, settings: &Settings) -> Option<HeroAction> {
    let risk = settings.dodge_rate_risk_factor;
    kill_options(state)
        .into_iter()
        .find(|option| {
            option.min_damage >= state.monster_hp_known_max
                && (risk == 0.0 || option.fail_chance <= risk)
        })
        .map(|option| option.action)
}

fn in_danger(state: &BattleState) -> bool {
    state.hero.hp <= state.current_max_damage()
}

pub fn emergency_heal(state: &BattleState, _settings: &Settings) -> Option<HeroAction> {
    if !in_danger(state) {
        return None;
    }
    [HealSpell::Healmore, HealSpell::Heal]
        .into_iter()
        .find(|spell| state.hero.can_cast(spell.spell()))
        .map(HeroAction::Heal)
        .or_else(|| (state.hero.herbs > 0).then_some(HeroAction::Herb))
}

pub fn retreat(state: &BattleState, settings: &Settings) -> Option<HeroAction> {
    (settings.hero_may_flee && in_danger(state)).then_some(HeroAction::Run)
}

pub fn crowd_control(state: &BattleState, _settings: &Settings) -> Option<HeroAction> {
    let hero = &state.hero;
    let monster = &state.monster;
    if hero.can_cast(Spell::Sleep) && !monster.sleep.asleep {
        return Some(HeroAction::Sleep);
    }
    if hero.can_cast(Spell::Stopspell) && !monster.stopspelled && monster.has_blockable_spell() {
        return Some(HeroAction::Stopspell);
    }
    None
}

pub fn best_damage(state: &BattleState, _settings: &Settings) -> Option<HeroAction> {
    let hero = &state.hero;
    let monster = &state.monster;
    let mut best = HeroAction::Attack;
    let mut best_expected =
        expected_physical_damage(hero.attack as f64, monster.defense as f64, true);

    for spell in [HurtSpell::Hurtmore, HurtSpell::Hurt] {
        if hero.can_cast(spell.spell()) {
            let average = spell.hero_average() * (1.0 - monster.hurt_resist);
            if average > best_expected {
                best_expected = average;
                best = HeroAction::Hurt(spell);
            }
        }
    }

    if hero.fairy_water > 0 {
        let average = if monster.fairy_water_immune {
            IMMUNE_FAIRY_WATER_AVERAGE
        } else {
            FAIRY_WATER_AVERAGE
        };
        if average > best_expected {
            best = HeroAction::FairyWater;
        }
    }

    // No mp on a spell when the sword alone is a sure kill.
    if matches!(best, HeroAction::Hurt(_)) && hero_min_physical(state) >= state.monster_hp_known_max
    {
        best = HeroAction::Attack;
    }
    Some(best)
}

pub fn run_hero_turn(state: &mut BattleState, settings: &Settings, rng: &mut impl RandomSource) {
    if state.hero.sleep.asleep {
        if state.hero.sleep.turns >= 1 && rng.chance(0.5) {
            state.hero.sleep.wake();
            state.log.push("Hero wakes up.");
        } else {
            state.add_frames(settings.hero_sleep_time);
            state.hero.sleep.turns += 1;
            state.log.push("Hero is asleep.");
            return;
        }
    }

    match choose_action(state, settings) {
        HeroAction::FairyFlute => {
            state.monster.sleep.fall_asleep();
            state.add_frames(settings.fairy_flute_time);
            state.log.push("Hero plays the Fairy Flute!");
        }
        HeroAction::Sleep => cast_sleep(state, settings, rng),
        HeroAction::Stopspell => cast_stopspell(state, settings, rng),
        HeroAction::Hurt(spell) => cast_hurt(state, settings, spell, rng),
        HeroAction::Heal(spell) => {
            let healed = state.hero.heal(heal_amount(spell, rng));
            state.mp_spent += state.hero.spend_mp(spell.spell());
            state.add_frames(settings.hero_spell_time);
            state
                .log
                .log_hero_heal(&format!("casts {}", spell.name()), healed);
        }
        HeroAction::Herb => {
            let healed = state.hero.heal(herb_amount(rng));
            state.hero.herbs -= 1;
            state.herbs_used += 1;
            state.add_frames(settings.herb_time);
            state.log.log_hero_heal("uses an herb", healed);
        }
        HeroAction::FairyWater => {
            let damage = fairy_water_damage(state.monster.fairy_water_immune, rng);
            state.damage_monster(damage);
            state.hero.fairy_water -= 1;
            state.fairy_waters_used += 1;
            state.add_frames(settings.fairy_water_time);
            state.log.log_hero_damage("uses Fairy Water", damage);
        }
        HeroAction::Run => try_run(state, settings, rng),
        HeroAction::Attack => attack(state, settings, rng),
    }
}

fn cast_sleep(state: &mut BattleState, settings: &Settings, rng: &mut impl RandomSource) {
    let landed = !rng.chance(state.monster.sleep_resist);
    state.mp_spent += state.hero.spend_mp(Spell::Sleep);
    state.add_frames(settings.hero_status_spell_time);
    if landed {
        state.monster.sleep.fall_asleep();
        let line = format!("Hero casts SLEEP. {} falls asleep.", state.monster.name);
        state.log.push(line);
    } else {
        state.log.push("Hero casts SLEEP, but it fails.");
    }
}

fn cast_stopspell(state: &mut BattleState, settings: &Settings, rng: &mut impl RandomSource) {
    let landed = !rng.chance(state.monster.stopspell_resist);
    state.mp_spent += state.hero.spend_mp(Spell::Stopspell);
    state.add_frames(settings.hero_status_spell_time);
    if landed {
        state.monster.stopspelled = true;
        let line = format!("Hero casts STOPSPELL. {} is affected.", state.monster.name);
        state.log.push(line);
    } else {
        state.log.push("Hero casts STOPSPELL, but it fails.");
    }
}

fn cast_hurt(
    state: &mut BattleState,
    settings: &Settings,
    spell: HurtSpell,
    rng: &mut impl RandomSource,
) {
    let damage = hurt_spell_damage(spell, state.monster.hurt_resist, Caster::Hero, rng);
    state.damage_monster(damage);
    state.mp_spent += state.hero.spend_mp(spell.spell());
    state.add_frames(settings.hero_spell_time);
    if damage > 0 {
        state
            .log
            .log_hero_damage(&format!("casts {}", spell.name()), damage);
    } else {
        state
            .log
            .log_monster_line(&format!("resists {}.", spell.name()));
    }
}

fn try_run(state: &mut BattleState, settings: &Settings, rng: &mut impl RandomSource) {
    state.add_frames(settings.hero_run_time);
    let escaped = state.monster.sleep.asleep || {
        let hero_roll = state.hero.agility as f64 * rng.byte() as f64;
        let monster_roll = state.monster.agility as f64 * AGILITY_FACTOR * rng.byte() as f64;
        hero_roll >= monster_roll
    };
    if escaped {
        state.hero_fled = true;
        state.log.push("Hero runs away!");
    } else {
        let line = format!("Hero tries to run, but {} blocks the way!", state.monster.name);
        state.log.push(line);
    }
}

fn attack(state: &mut BattleState, settings: &Settings, rng: &mut impl RandomSource) {
    if rng.chance(state.monster.dodge_chance()) {
        state.add_frames(settings.enemy_dodge_time);
        let line = format!("Hero attacks, but {} dodges!", state.monster.name);
        state.log.push(line);
        return;
    }
    if rng.chance(CRITICAL_CHANCE) {
        let damage = critical_damage(state.hero.attack, rng);
        state.damage_monster(damage);
        state.add_frames(settings.hero_attack_time + settings.hero_critical_time);
        state.log.log_hero_damage("performs a critical hit", damage);
        return;
    }
    let damage = physical_damage(
        state.hero.attack as f64,
        state.monster.defense as f64,
        rng,
        true,
    );
    state.damage_monster(damage);
    state.add_frames(settings.hero_attack_time);
    state.log.log_hero_damage("attacks", damage);
}
