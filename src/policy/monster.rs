use crate::battle::BattleState;
use crate::formulas::{
    breath_damage, heal_amount, hurt_spell_damage, mitigate_damage, physical_damage, Breath,
    Caster, HealSpell, HurtSpell,
};
use crate::model::{AbilityFamily, AttackAbility, SupportAbility};
use crate::rng::RandomSource;
use crate::settings::Settings;

pub const WAKE_CHANCE: f64 = 1.0 / 3.0;
pub const FLEE_CHANCE: f64 = 0.25;
pub const STOPSPELL_LAND_CHANCE: f64 = 0.5;

pub fn cast_time(family: AbilityFamily, settings: &Settings) -> u32 {
    match family {
        AbilityFamily::HurtSpell => settings.enemy_hurt_spell_time,
        AbilityFamily::HealSpell => settings.enemy_heal_spell_time,
        AbilityFamily::StatusSpell => settings.enemy_spell_time,
        AbilityFamily::Breath => settings.enemy_breath_time,
    }
}

/// A cast swallowed by stopspell still takes most of the animation.
pub fn blocked_cast_time(family: AbilityFamily, settings: &Settings) -> u32 {
    cast_time(family, settings).saturating_sub(settings.stopspelled_spell_reduction)
}

fn would_flee(state: &BattleState) -> bool {
    state
        .hero
        .strength
        .is_some_and(|strength| strength >= 2 * state.monster.attack)
}

pub fn run_monster_turn(state: &mut BattleState, settings: &Settings, rng: &mut impl RandomSource) {
    if state.monster.sleep.asleep {
        if state.monster.sleep.turns >= 1 && rng.chance(WAKE_CHANCE) {
            state.monster.sleep.wake();
            state.log.log_monster_line("wakes up.");
        } else {
            state.monster.sleep.turns += 1;
            state.add_frames(settings.enemy_sleep_time);
            state.log.log_monster_line("is asleep.");
            return;
        }
    }

    if would_flee(state) && rng.chance(FLEE_CHANCE) {
        state.monster.fled = true;
        state.log.log_monster_line("runs away!");
        return;
    }

    if try_support(state, settings, rng) {
        return;
    }
    if try_attack_ability(state, settings, rng) {
        return;
    }

    let damage = physical_damage(
        state.monster.attack as f64,
        state.hero.defense as f64 / 2.0,
        rng,
        false,
    );
    state.hero.hp -= damage;
    state.add_frames(settings.enemy_attack_time);
    state.log.log_monster_damage("attacks", damage);
}

fn support_suppressed(state: &BattleState, ability: SupportAbility) -> bool {
    match ability {
        SupportAbility::None => true,
        SupportAbility::Sleep => state.hero.sleep.asleep,
        SupportAbility::Stopspell => state.hero.stopspelled,
        SupportAbility::Heal | SupportAbility::Healmore => {
            state.monster.hp as f64 >= state.monster.max_hp as f64 / 4.0
        }
    }
}

fn try_support(state: &mut BattleState, settings: &Settings, rng: &mut impl RandomSource) -> bool {
    let ability = state.monster.support_ability;
    let Some(family) = ability.family() else {
        return false;
    };
    // The roll is taken even when the ability ends up suppressed.
    let rolled = rng.chance(state.monster.support_chance);
    if !rolled || support_suppressed(state, ability) {
        return false;
    }

    if state.monster.stopspelled {
        state.add_frames(blocked_cast_time(family, settings));
        state.log.log_monster_line(&format!(
            "tries to cast {}, but is stopspelled.",
            ability.spell_name()
        ));
        return true;
    }

    state.add_frames(cast_time(family, settings));
    match ability {
        SupportAbility::Sleep => {
            state.hero.sleep.fall_asleep();
            state.log.log_monster_line("casts SLEEP.");
        }
        SupportAbility::Stopspell => {
            state.log.log_monster_line("casts STOPSPELL.");
            if !state.hero.stopspell_immune() && rng.chance(STOPSPELL_LAND_CHANCE) {
                state.hero.stopspelled = true;
                state.log.push("Hero is affected by STOPSPELL.");
            } else {
                state.log.push("But nothing happens.");
            }
        }
        SupportAbility::Heal | SupportAbility::Healmore => {
            let spell = if ability == SupportAbility::Heal {
                HealSpell::Heal
            } else {
                HealSpell::Healmore
            };
            let healed = state.monster.heal(heal_amount(spell, rng));
            state.monster_hp_known_max =
                (state.monster_hp_known_max + spell.max_amount()).min(state.monster.max_hp);
            state.log.log_monster_line(&format!(
                "casts {} and heals {healed} HP.",
                spell.name()
            ));
        }
        SupportAbility::None => {}
    }
    true
}

fn try_attack_ability(
    state: &mut BattleState,
    settings: &Settings,
    rng: &mut impl RandomSource,
) -> bool {
    let ability = state.monster.attack_ability;
    let Some(family) = ability.family() else {
        return false;
    };
    if !rng.chance(state.monster.attack_chance) {
        return false;
    }

    match ability {
        AttackAbility::Hurt | AttackAbility::Hurtmore => {
            let spell = if ability == AttackAbility::Hurt {
                HurtSpell::Hurt
            } else {
                HurtSpell::Hurtmore
            };
            if state.monster.stopspelled {
                state.add_frames(blocked_cast_time(family, settings));
                state.log.log_monster_line(&format!(
                    "tries to cast {}, but is stopspelled.",
                    spell.name()
                ));
                return true;
            }
            let mut damage = hurt_spell_damage(spell, 0.0, Caster::Monster, rng);
            if state.hero.hurt_mitigation() {
                damage = mitigate_damage(damage);
            }
            state.hero.hp -= damage;
            state.add_frames(cast_time(family, settings));
            state
                .log
                .log_monster_damage(&format!("casts {}", spell.name()), damage);
        }
        AttackAbility::SmallBreath | AttackAbility::BigBreath => {
            let kind = if ability == AttackAbility::SmallBreath {
                Breath::Small
            } else {
                Breath::Big
            };
            let mut damage = breath_damage(kind, rng);
            if state.hero.breath_mitigation() {
                damage = mitigate_damage(damage);
            }
            state.hero.hp -= damage;
            state.add_frames(cast_time(family, settings));
            state
                .log
                .log_monster_damage(&format!("uses {}", ability.display_name()), damage);
        }
        AttackAbility::None => return false,
    }
    true
}
