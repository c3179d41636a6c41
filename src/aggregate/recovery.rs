use crate::battle_log::BattleLogger;
use crate::formulas::{heal_amount, herb_amount, HealSpell};
use crate::model::{Hero, Spell};
use crate::rng::RandomSource;
use crate::settings::Settings;

pub const HEAL_DEFICIT_LIMIT: i32 = 50;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Recovery {
    pub frames: u64,
    pub mp_spent: u32,
    pub herbs_used: u32,
    pub abandoned: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Remedy {
    Spell(HealSpell),
    Herb,
}

fn castable(hero: &Hero, spell: Spell) -> bool {
    hero.knows(spell) && hero.mp >= spell.mp_cost()
}

fn pick_remedy(hero: &Hero, deficit: i32) -> Option<Remedy> {
    let heal = castable(hero, Spell::Heal);
    if heal && deficit <= HEAL_DEFICIT_LIMIT {
        return Some(Remedy::Spell(HealSpell::Heal));
    }
    if !heal && hero.herbs > 0 {
        return Some(Remedy::Herb);
    }
    if castable(hero, Spell::Healmore) {
        return Some(Remedy::Spell(HealSpell::Healmore));
    }
    heal.then_some(Remedy::Spell(HealSpell::Heal))
}

/// Heals while the hero is hurt and within two hits of `danger`. `hero.max_hp`
/// must already be pinned, since `hp` moves.
pub fn recover_between_fights(
    hero: &mut Hero,
    danger: i32,
    settings: &Settings,
    rng: &mut impl RandomSource,
    log: &mut BattleLogger,
) -> Recovery {
    let max_hp = hero.max_hp();
    let mut recovery = Recovery {
        frames: settings.frames_between_fights as u64,
        ..Recovery::default()
    };

    while hero.hp < max_hp && hero.hp <= 2 * danger {
        let deficit = max_hp - hero.hp;
        match pick_remedy(hero, deficit) {
            Some(Remedy::Spell(spell)) => {
                let healed = heal_amount(spell, rng).min(deficit).max(0);
                hero.hp += healed;
                let cost = spell.spell().mp_cost();
                hero.mp -= cost;
                recovery.mp_spent += cost;
                recovery.frames += settings.heal_spell_time as u64;
                log.log_hero_heal(&format!("casts {}", spell.name()), healed);
            }
            Some(Remedy::Herb) => {
                let healed = herb_amount(rng).min(deficit).max(0);
                hero.hp += healed;
                hero.herbs -= 1;
                recovery.herbs_used += 1;
                recovery.frames += settings.herb_between_fights_time as u64;
                log.log_hero_heal("uses an herb", healed);
            }
            None => {
                recovery.abandoned = true;
                log.push("Hero has no healing left and abandons the hunt.");
                break;
            }
        }
    }
    recovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Armor;
    use crate::rng::ScriptedRng;

    fn hero(hp: i32, mp: u32, spells: Vec<Spell>, herbs: u32) -> Hero {
        Hero {
            hp,
            max_hp: Some(120),
            attack: 80,
            strength: None,
            defense: 60,
            agility: 50,
            mp,
            spells,
            armor: Armor::Magic,
            fairy_flute: false,
            herbs,
            fairy_water: 0,
        }
    }

    fn recover(hero: &mut Hero, danger: i32, draws: Vec<f64>) -> (Recovery, Vec<String>) {
        let mut log = BattleLogger::new("Knight");
        let mut rng = ScriptedRng::new(draws);
        let settings = Settings::default();
        let recovery = recover_between_fights(hero, danger, &settings, &mut rng, &mut log);
        (recovery, log.into_lines())
    }

    #[test]
    fn safe_hero_does_nothing_but_walk() {
        let mut h = hero(100, 10, vec![Spell::Heal], 0);
        let (recovery, lines) = recover(&mut h, 20, Vec::new());
        assert_eq!(recovery.frames, Settings::default().frames_between_fights as u64);
        assert!(!recovery.abandoned);
        assert!(lines.is_empty());
    }

    #[test]
    fn small_deficit_uses_heal_and_caps() {
        let mut h = hero(100, 10, vec![Spell::Heal, Spell::Healmore], 0);
        let (recovery, lines) = recover(&mut h, 60, vec![0.99]);
        assert_eq!(h.hp, 120);
        assert_eq!(h.mp, 7);
        assert_eq!(recovery.mp_spent, 3);
        assert_eq!(lines, vec!["Hero casts HEAL and heals 20 HP.".to_string()]);
    }

    #[test]
    fn big_deficit_prefers_healmore() {
        let mut h = hero(30, 10, vec![Spell::Heal, Spell::Healmore], 3);
        let (recovery, _) = recover(&mut h, 40, vec![0.0]);
        assert_eq!(h.hp, 115);
        assert_eq!(recovery.mp_spent, 8);
        assert_eq!(recovery.herbs_used, 0);
    }

    #[test]
    fn herbs_fill_in_without_heal() {
        let mut h = hero(30, 0, vec![Spell::Heal], 2);
        let (recovery, _) = recover(&mut h, 35, vec![0.0, 0.0]);
        // 30 + 23 + 23, now above 2 * 35
        assert_eq!(h.hp, 76);
        assert_eq!(h.herbs, 0);
        assert_eq!(recovery.herbs_used, 2);
        assert!(!recovery.abandoned);
    }

    #[test]
    fn castable_heal_keeps_herbs_in_the_bag() {
        let h = hero(10, 3, vec![Spell::Heal], 2);
        assert_eq!(pick_remedy(&h, 110), Some(Remedy::Spell(HealSpell::Heal)));
        let h = hero(10, 2, vec![Spell::Heal], 2);
        assert_eq!(pick_remedy(&h, 110), Some(Remedy::Herb));
        let h = hero(10, 2, vec![Spell::Heal], 0);
        assert_eq!(pick_remedy(&h, 110), None);
    }

    #[test]
    fn empty_bag_in_danger_abandons() {
        let mut h = hero(30, 0, Vec::new(), 1);
        let (recovery, lines) = recover(&mut h, 40, vec![0.0]);
        assert!(recovery.abandoned);
        assert_eq!(h.hp, 53);
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Hero has no healing left and abandons the hunt.")
        );
    }
}
