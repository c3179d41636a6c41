use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Hero, Monster};
use crate::settings::Settings;

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("Unknown spell {0:?}")]
    UnknownSpell(String),
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{name}: dodge must be at most 64 (got {dodge})")]
    DodgeTooHigh { name: String, dodge: u32 },
    #[error("{name}: max hp must be positive (got {max_hp})")]
    NonPositiveMaxHp { name: String, max_hp: i32 },
    #[error("{name}: hp {hp} exceeds max hp {max_hp}")]
    HpAboveMax { name: String, hp: i32, max_hp: i32 },
    #[error("Scenario has no monster")]
    MissingMonster,
    #[error("Scenario has an empty roster")]
    EmptyRoster,
}

fn default_encounter_budget() -> u32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub hero: Hero,
    #[serde(default)]
    pub monster: Option<Monster>,
    #[serde(default)]
    pub roster: Vec<Monster>,
    #[serde(default = "default_encounter_budget")]
    pub encounter_budget: u32,
    #[serde(default)]
    pub settings: Settings,
}

fn check_probability(owner: &str, field: &str, value: f64) -> Result<(), ScenarioError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ScenarioError::RangeViolation {
            field: format!("{owner}.{field}"),
            min: 0.0,
            max: 1.0,
            value,
        })
    }
}

fn check_hp(name: &str, hp: i32, max_hp: i32) -> Result<(), ScenarioError> {
    if max_hp <= 0 {
        return Err(ScenarioError::NonPositiveMaxHp {
            name: name.to_string(),
            max_hp,
        });
    }
    if hp > max_hp {
        return Err(ScenarioError::HpAboveMax {
            name: name.to_string(),
            hp,
            max_hp,
        });
    }
    Ok(())
}

pub fn validate_hero(hero: &Hero) -> Result<(), ScenarioError> {
    check_hp("Hero", hero.hp, hero.max_hp())
}

pub fn validate_monster(monster: &Monster) -> Result<(), ScenarioError> {
    let name = monster.name.as_str();
    check_hp(name, monster.hp, monster.max_hp())?;
    if monster.dodge > 64 {
        return Err(ScenarioError::DodgeTooHigh {
            name: name.to_string(),
            dodge: monster.dodge,
        });
    }
    check_probability(name, "hurtResist", monster.hurt_resist)?;
    check_probability(name, "sleepResist", monster.sleep_resist)?;
    check_probability(name, "stopspellResist", monster.stopspell_resist)?;
    check_probability(name, "supportChance", monster.support_chance)?;
    check_probability(name, "attackChance", monster.attack_chance)?;
    Ok(())
}

impl Scenario {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        validate_hero(&self.hero)?;
        if let Some(monster) = &self.monster {
            validate_monster(monster)?;
        }
        for monster in &self.roster {
            validate_monster(monster)?;
        }
        check_probability(
            "settings",
            "dodgeRateRiskFactor",
            self.settings.dodge_rate_risk_factor,
        )
    }

    pub fn monster(&self) -> Result<&Monster, ScenarioError> {
        self.monster.as_ref().ok_or(ScenarioError::MissingMonster)
    }

    pub fn roster(&self) -> Result<&[Monster], ScenarioError> {
        if self.roster.is_empty() {
            Err(ScenarioError::EmptyRoster)
        } else {
            Ok(&self.roster)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Armor, Spell};

    const SAMPLE: &str = r#"{
        "hero": {
            "hp": 90, "maxHp": 100, "attack": 70, "strength": 45, "defense": 50,
            "agility": 40, "mp": 60, "spells": ["HEAL", "hurt", "Sleep"],
            "armor": "magic", "herbs": 3
        },
        "monster": {
            "name": "Wolflord", "hp": 38, "attack": 50, "defense": 36, "agility": 60,
            "xp": 40, "sleepResist": 0.125, "supportAbility": "stopspell",
            "supportChance": 0.5
        },
        "settings": { "heroSpellTime": 150, "dodgeRateRiskFactor": 0.1 }
    }"#;

    #[test]
    fn parses_camel_case_scenario() {
        let scenario: Scenario = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(scenario.hero.max_hp(), 100);
        assert_eq!(scenario.hero.spells, vec![Spell::Heal, Spell::Hurt, Spell::Sleep]);
        assert_eq!(scenario.hero.armor, Armor::Magic);
        assert_eq!(scenario.settings.hero_spell_time, 150);
        assert_eq!(scenario.settings.post_battle_time, Settings::default().post_battle_time);
        assert_eq!(scenario.encounter_budget, 100);
        assert_eq!(scenario.monster().unwrap().dodge, 2);
        assert!(matches!(scenario.roster(), Err(ScenarioError::EmptyRoster)));
        scenario.validate().unwrap();
    }

    #[test]
    fn unknown_spell_is_rejected() {
        let raw = SAMPLE.replace("\"hurt\"", "\"FIREBALL\"");
        let err = serde_json::from_str::<Scenario>(&raw).unwrap_err();
        assert!(err.to_string().contains("FIREBALL"), "{err}");
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let mut scenario: Scenario = serde_json::from_str(SAMPLE).unwrap();
        let monster = scenario.monster.as_mut().unwrap();
        monster.sleep_resist = 1.5;
        let err = scenario.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Wolflord.sleepResist must be between 0.00 and 1.00 (got 1.50)"
        );

        let monster = scenario.monster.as_mut().unwrap();
        monster.sleep_resist = 0.0;
        monster.dodge = 65;
        assert!(matches!(scenario.validate(), Err(ScenarioError::DodgeTooHigh { dodge: 65, .. })));
    }

    #[test]
    fn hero_cannot_start_above_max_hp() {
        let mut scenario: Scenario = serde_json::from_str(SAMPLE).unwrap();
        scenario.hero.hp = 120;
        assert!(matches!(scenario.validate(), Err(ScenarioError::HpAboveMax { .. })));
    }
}
