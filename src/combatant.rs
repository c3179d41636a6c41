use crate::model::{Armor, AttackAbility, Hero, Monster, Spell, SupportAbility};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SleepStatus {
    pub asleep: bool,
    pub turns: u32,
}

impl SleepStatus {
    pub fn fall_asleep(&mut self) {
        self.asleep = true;
        self.turns = 0;
    }

    pub fn wake(&mut self) {
        self.asleep = false;
        self.turns = 0;
    }
}

#[derive(Clone, Debug)]
pub struct HeroState {
    pub hp: i32,
    pub max_hp: i32,
    pub attack: u32,
    pub strength: Option<u32>,
    pub defense: u32,
    pub agility: u32,
    pub mp: u32,
    pub spells: Vec<Spell>,
    pub armor: Armor,
    pub fairy_flute: bool,
    pub herbs: u32,
    pub fairy_water: u32,
    pub stopspelled: bool,
    pub sleep: SleepStatus,
}

impl HeroState {
    pub fn from_record(hero: &Hero) -> Self {
        HeroState {
            hp: hero.hp,
            max_hp: hero.max_hp(),
            attack: hero.attack,
            strength: hero.strength,
            defense: hero.defense,
            agility: hero.agility,
            mp: hero.mp,
            spells: hero.spells.clone(),
            armor: hero.armor,
            fairy_flute: hero.fairy_flute,
            herbs: hero.herbs,
            fairy_water: hero.fairy_water,
            stopspelled: false,
            sleep: SleepStatus::default(),
        }
    }

    pub fn hurt_mitigation(&self) -> bool {
        self.armor.hurt_mitigation()
    }

    pub fn breath_mitigation(&self) -> bool {
        self.armor.breath_mitigation()
    }

    pub fn stopspell_immune(&self) -> bool {
        self.armor.stopspell_immune()
    }

    pub fn can_cast(&self, spell: Spell) -> bool {
        !self.stopspelled && self.spells.contains(&spell) && self.mp >= spell.mp_cost()
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let applied = amount.min(self.max_hp - self.hp).max(0);
        self.hp += applied;
        applied
    }

    pub fn spend_mp(&mut self, spell: Spell) -> u32 {
        let cost = spell.mp_cost();
        self.mp -= cost;
        cost
    }
}

#[derive(Clone, Debug)]
pub struct MonsterState {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: u32,
    pub defense: u32,
    pub agility: u32,
    pub xp: u32,
    pub hurt_resist: f64,
    pub sleep_resist: f64,
    pub stopspell_resist: f64,
    pub dodge: u32,
    pub support_ability: SupportAbility,
    pub support_chance: f64,
    pub attack_ability: AttackAbility,
    pub attack_chance: f64,
    pub flute_sleeps: bool,
    pub fairy_water_immune: bool,
    pub stopspelled: bool,
    pub fled: bool,
    pub sleep: SleepStatus,
}

impl MonsterState {
    pub fn from_record(monster: &Monster) -> Self {
        MonsterState {
            name: monster.name.clone(),
            hp: monster.hp,
            max_hp: monster.max_hp(),
            attack: monster.attack,
            defense: monster.defense,
            agility: monster.agility,
            xp: monster.xp,
            hurt_resist: monster.hurt_resist,
            sleep_resist: monster.sleep_resist,
            stopspell_resist: monster.stopspell_resist,
            dodge: monster.dodge,
            support_ability: monster.support_ability,
            support_chance: monster.support_chance,
            attack_ability: monster.attack_ability,
            attack_chance: monster.attack_chance,
            flute_sleeps: monster.flute_sleeps(),
            fairy_water_immune: monster.fairy_water_immune(),
            stopspelled: false,
            fled: false,
            sleep: SleepStatus::default(),
        }
    }

    pub fn dodge_chance(&self) -> f64 {
        self.dodge as f64 / 64.0
    }

    pub fn has_blockable_spell(&self) -> bool {
        self.support_ability != SupportAbility::None || self.attack_ability.is_hurt_spell()
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let applied = amount.min(self.max_hp - self.hp).max(0);
        self.hp += applied;
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> Hero {
        Hero {
            hp: 40,
            max_hp: Some(60),
            attack: 30,
            strength: Some(20),
            defense: 20,
            agility: 15,
            mp: 4,
            spells: vec![Spell::Heal, Spell::Hurtmore],
            armor: Armor::Magic,
            fairy_flute: false,
            herbs: 2,
            fairy_water: 0,
        }
    }

    #[test]
    fn normalization_starts_clean() {
        let state = HeroState::from_record(&hero());
        assert_eq!(state.max_hp, 60);
        assert!(!state.stopspelled);
        assert!(!state.sleep.asleep);
        assert!(state.hurt_mitigation());
        assert!(!state.stopspell_immune());
    }

    #[test]
    fn casting_requires_mp_and_voice() {
        let mut state = HeroState::from_record(&hero());
        assert!(state.can_cast(Spell::Heal));
        assert!(!state.can_cast(Spell::Hurtmore));
        assert!(!state.can_cast(Spell::Sleep));
        state.stopspelled = true;
        assert!(!state.can_cast(Spell::Heal));
    }

    #[test]
    fn healing_is_capped_at_max_hp() {
        let mut state = HeroState::from_record(&hero());
        assert_eq!(state.heal(100), 20);
        assert_eq!(state.hp, 60);
        assert_eq!(state.heal(5), 0);

        let mut slime = MonsterState::from_record(&Monster::basic("Slime", 2, 5, 3, 15, 1));
        slime.max_hp = 3;
        assert_eq!(slime.heal(18), 1);
        assert_eq!(slime.hp, 3);
    }

    #[test]
    fn stopspell_targets() {
        let mut monster = Monster::basic("Ghost", 7, 11, 8, 15, 3);
        assert!(!MonsterState::from_record(&monster).has_blockable_spell());
        monster.attack_ability = AttackAbility::SmallBreath;
        assert!(!MonsterState::from_record(&monster).has_blockable_spell());
        monster.attack_ability = AttackAbility::Hurt;
        assert!(MonsterState::from_record(&monster).has_blockable_spell());
    }
}
