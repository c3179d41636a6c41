use crate::model::{Armor, AttackAbility, Hero, Monster, Spell};
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Caster {
    Hero,
    Monster,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HurtSpell {
    Hurt,
    Hurtmore,
}

impl HurtSpell {
    pub fn name(self) -> &'static str {
        match self {
            HurtSpell::Hurt => "HURT",
            HurtSpell::Hurtmore => "HURTMORE",
        }
    }

    pub fn spell(self) -> Spell {
        match self {
            HurtSpell::Hurt => Spell::Hurt,
            HurtSpell::Hurtmore => Spell::Hurtmore,
        }
    }

    pub fn hero_min(self) -> i32 {
        match self {
            HurtSpell::Hurt => 9,
            HurtSpell::Hurtmore => 58,
        }
    }

    pub fn hero_average(self) -> f64 {
        match self {
            HurtSpell::Hurt => 12.5,
            HurtSpell::Hurtmore => 61.5,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HealSpell {
    Heal,
    Healmore,
}

impl HealSpell {
    pub fn name(self) -> &'static str {
        match self {
            HealSpell::Heal => "HEAL",
            HealSpell::Healmore => "HEALMORE",
        }
    }

    pub fn spell(self) -> Spell {
        match self {
            HealSpell::Heal => Spell::Heal,
            HealSpell::Healmore => Spell::Healmore,
        }
    }

    pub fn max_amount(self) -> i32 {
        match self {
            HealSpell::Heal => 25,
            HealSpell::Healmore => 100,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Breath {
    Small,
    Big,
}

pub const FAIRY_WATER_MIN: i32 = 9;
pub const FAIRY_WATER_AVERAGE: f64 = 12.5;
pub const IMMUNE_FAIRY_WATER_AVERAGE: f64 = 0.5;
pub const CRITICAL_CHANCE: f64 = 1.0 / 32.0;

pub fn base_max_damage(attack: f64, defense: f64) -> f64 {
    ((attack - defense) / 2.0).max(0.0)
}

/// The physical roll lives on a quarter-unit grid: `[floor(max/2*4), floor(max*4)]`.
fn quarter_bounds(attack: f64, defense: f64) -> (i64, i64) {
    let max_damage = base_max_damage(attack, defense);
    let min_q = (max_damage / 2.0 * 4.0).floor() as i64;
    let max_q = (max_damage * 4.0).floor() as i64;
    (min_q, max_q)
}

fn is_weak_hero_attack(attack: f64, defense: f64, hero_attacker: bool) -> bool {
    hero_attacker && attack < defense + 2.0
}

pub fn physical_damage(
    attack: f64,
    defense: f64,
    rng: &mut impl RandomSource,
    hero_attacker: bool,
) -> i32 {
    if is_weak_hero_attack(attack, defense, hero_attacker) {
        return if rng.chance(0.5) { 0 } else { 1 };
    }
    let (min_q, max_q) = quarter_bounds(attack, defense);
    let span = (max_q - min_q + 1) as f64;
    let roll = min_q + (rng.next_unit() * span).floor() as i64;
    (roll / 4).max(0) as i32
}

pub fn expected_physical_damage(attack: f64, defense: f64, hero_attacker: bool) -> f64 {
    if is_weak_hero_attack(attack, defense, hero_attacker) {
        return 0.5;
    }
    let (min_q, max_q) = quarter_bounds(attack, defense);
    let count = max_q - min_q + 1;
    if count <= 0 {
        return 0.0;
    }
    let total: i64 = (min_q..=max_q).map(|q| q / 4).sum();
    total as f64 / count as f64
}

pub fn min_physical_damage(attack: f64, defense: f64) -> i32 {
    if attack < defense + 2.0 {
        0
    } else {
        (base_max_damage(attack, defense) / 2.0).floor() as i32
    }
}

/// Hero casts roll the target's resistance first; monster casts never miss
/// and use their own, weaker bands.
pub fn hurt_spell_damage(
    spell: HurtSpell,
    resist: f64,
    caster: Caster,
    rng: &mut impl RandomSource,
) -> i32 {
    match caster {
        Caster::Hero => {
            if rng.chance(resist) {
                return 0;
            }
            match spell {
                HurtSpell::Hurt => rng.range_inclusive(9, 16),
                HurtSpell::Hurtmore => rng.range_inclusive(58, 65),
            }
        }
        Caster::Monster => match spell {
            HurtSpell::Hurt => rng.range_inclusive(3, 10),
            HurtSpell::Hurtmore => rng.range_inclusive(30, 45),
        },
    }
}

pub fn heal_amount(spell: HealSpell, rng: &mut impl RandomSource) -> i32 {
    match spell {
        HealSpell::Heal => rng.range_inclusive(18, 25),
        HealSpell::Healmore => rng.range_inclusive(85, 100),
    }
}

pub fn herb_amount(rng: &mut impl RandomSource) -> i32 {
    rng.range_inclusive(23, 30)
}

pub fn fairy_water_damage(immune: bool, rng: &mut impl RandomSource) -> i32 {
    if immune {
        if rng.chance(0.5) {
            0
        } else {
            1
        }
    } else {
        rng.range_inclusive(FAIRY_WATER_MIN, 16)
    }
}

pub fn critical_damage(attack: u32, rng: &mut impl RandomSource) -> i32 {
    let max = attack as i32;
    rng.range_inclusive(max / 2, max)
}

pub fn breath_damage(kind: Breath, rng: &mut impl RandomSource) -> i32 {
    match kind {
        Breath::Small => rng.range_inclusive(22, 30),
        Breath::Big => rng.range_inclusive(65, 72),
    }
}

/// Armor keeps two thirds, counted in whole units of three.
pub fn mitigate_damage(damage: i32) -> i32 {
    damage.div_euclid(3) * 2
}

pub fn monster_physical_ceiling(monster_attack: u32, hero_defense: u32) -> i32 {
    base_max_damage(monster_attack as f64, hero_defense as f64 / 2.0).floor() as i32
}

pub fn attack_ability_ceiling(ability: AttackAbility, armor: Armor) -> i32 {
    let (raw, mitigated) = match ability {
        AttackAbility::None => return 0,
        AttackAbility::Hurt => (10, armor.hurt_mitigation()),
        AttackAbility::Hurtmore => (45, armor.hurt_mitigation()),
        AttackAbility::SmallBreath => (30, armor.breath_mitigation()),
        AttackAbility::BigBreath => (72, armor.breath_mitigation()),
    };
    if mitigated {
        mitigate_damage(raw)
    } else {
        raw
    }
}

pub fn max_monster_damage(hero: &Hero, monster: &Monster) -> i32 {
    monster_physical_ceiling(monster.attack, hero.defense)
        .max(attack_ability_ceiling(monster.attack_ability, hero.armor))
}
