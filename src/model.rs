use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::scenario::ScenarioError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Spell {
    Heal,
    Hurt,
    Sleep,
    Stopspell,
    Healmore,
    Hurtmore,
    Repel,
}

static SPELL_NAMES: phf::Map<&'static str, Spell> = phf_map! {
    "HEAL" => Spell::Heal,
    "HURT" => Spell::Hurt,
    "SLEEP" => Spell::Sleep,
    "STOPSPELL" => Spell::Stopspell,
    "HEALMORE" => Spell::Healmore,
    "HURTMORE" => Spell::Hurtmore,
    "REPEL" => Spell::Repel,
};

impl Spell {
    pub fn from_name(name: &str) -> Option<Spell> {
        SPELL_NAMES
            .get(name.trim().to_ascii_uppercase().as_str())
            .copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Spell::Heal => "HEAL",
            Spell::Hurt => "HURT",
            Spell::Sleep => "SLEEP",
            Spell::Stopspell => "STOPSPELL",
            Spell::Healmore => "HEALMORE",
            Spell::Hurtmore => "HURTMORE",
            Spell::Repel => "REPEL",
        }
    }

    pub fn mp_cost(self) -> u32 {
        match self {
            Spell::Heal => 3,
            Spell::Hurt => 2,
            Spell::Sleep => 2,
            Spell::Stopspell => 2,
            Spell::Healmore => 8,
            Spell::Hurtmore => 5,
            Spell::Repel => 2,
        }
    }
}

impl TryFrom<String> for Spell {
    type Error = ScenarioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Spell::from_name(&value).ok_or(ScenarioError::UnknownSpell(value))
    }
}

impl From<Spell> for String {
    fn from(spell: Spell) -> Self {
        spell.name().to_string()
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Armor {
    #[default]
    None,
    Magic,
    Erdrick,
}

impl Armor {
    pub fn hurt_mitigation(self) -> bool {
        matches!(self, Armor::Magic | Armor::Erdrick)
    }

    pub fn breath_mitigation(self) -> bool {
        matches!(self, Armor::Erdrick)
    }

    pub fn stopspell_immune(self) -> bool {
        matches!(self, Armor::Erdrick)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AbilityFamily {
    HurtSpell,
    HealSpell,
    StatusSpell,
    Breath,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportAbility {
    #[default]
    None,
    Sleep,
    Stopspell,
    Heal,
    Healmore,
}

impl SupportAbility {
    pub fn family(self) -> Option<AbilityFamily> {
        match self {
            SupportAbility::None => None,
            SupportAbility::Sleep | SupportAbility::Stopspell => Some(AbilityFamily::StatusSpell),
            SupportAbility::Heal | SupportAbility::Healmore => Some(AbilityFamily::HealSpell),
        }
    }

    pub fn spell_name(self) -> &'static str {
        match self {
            SupportAbility::None => "NOTHING",
            SupportAbility::Sleep => "SLEEP",
            SupportAbility::Stopspell => "STOPSPELL",
            SupportAbility::Heal => "HEAL",
            SupportAbility::Healmore => "HEALMORE",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackAbility {
    #[default]
    None,
    Hurt,
    Hurtmore,
    #[serde(rename = "smallbreath")]
    SmallBreath,
    #[serde(rename = "bigbreath")]
    BigBreath,
}

impl AttackAbility {
    pub fn family(self) -> Option<AbilityFamily> {
        match self {
            AttackAbility::None => None,
            AttackAbility::Hurt | AttackAbility::Hurtmore => Some(AbilityFamily::HurtSpell),
            AttackAbility::SmallBreath | AttackAbility::BigBreath => Some(AbilityFamily::Breath),
        }
    }

    pub fn is_hurt_spell(self) -> bool {
        self.family() == Some(AbilityFamily::HurtSpell)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AttackAbility::None => "NOTHING",
            AttackAbility::Hurt => "HURT",
            AttackAbility::Hurtmore => "HURTMORE",
            AttackAbility::SmallBreath => "SMALL BREATH",
            AttackAbility::BigBreath => "BIG BREATH",
        }
    }
}

/// Hero build as supplied by the caller. `attack` already includes weapon
/// and bonuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub hp: i32,
    #[serde(default)]
    pub max_hp: Option<i32>,
    pub attack: u32,
    #[serde(default)]
    pub strength: Option<u32>,
    pub defense: u32,
    pub agility: u32,
    #[serde(default)]
    pub mp: u32,
    #[serde(default)]
    pub spells: Vec<Spell>,
    #[serde(default)]
    pub armor: Armor,
    #[serde(default)]
    pub fairy_flute: bool,
    #[serde(default)]
    pub herbs: u32,
    #[serde(default)]
    pub fairy_water: u32,
}

impl Hero {
    pub fn max_hp(&self) -> i32 {
        self.max_hp.unwrap_or(self.hp)
    }

    pub fn knows(&self, spell: Spell) -> bool {
        self.spells.contains(&spell)
    }
}

fn default_dodge() -> u32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monster {
    pub name: String,
    pub hp: i32,
    #[serde(default)]
    pub max_hp: Option<i32>,
    pub attack: u32,
    pub defense: u32,
    pub agility: u32,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub hurt_resist: f64,
    #[serde(default)]
    pub sleep_resist: f64,
    #[serde(default)]
    pub stopspell_resist: f64,
    #[serde(default = "default_dodge")]
    pub dodge: u32,
    #[serde(default)]
    pub support_ability: SupportAbility,
    #[serde(default)]
    pub support_chance: f64,
    #[serde(default)]
    pub attack_ability: AttackAbility,
    #[serde(default)]
    pub attack_chance: f64,
    /// Whether the Fairy Flute puts this monster to sleep. Defaults to the Golem.
    #[serde(default)]
    pub flute_sleeps: Option<bool>,
    /// Fairy Water only scratches this monster. Defaults to the Metal Slime.
    #[serde(default)]
    pub fairy_water_immune: Option<bool>,
}

impl Monster {
    pub fn basic(name: &str, hp: i32, attack: u32, defense: u32, agility: u32, xp: u32) -> Self {
        Monster {
            name: name.to_string(),
            hp,
            max_hp: None,
            attack,
            defense,
            agility,
            xp,
            hurt_resist: 0.0,
            sleep_resist: 0.0,
            stopspell_resist: 0.0,
            dodge: default_dodge(),
            support_ability: SupportAbility::None,
            support_chance: 0.0,
            attack_ability: AttackAbility::None,
            attack_chance: 0.0,
            flute_sleeps: None,
            fairy_water_immune: None,
        }
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp.unwrap_or(self.hp)
    }

    pub fn flute_sleeps(&self) -> bool {
        self.flute_sleeps.unwrap_or(self.name == "Golem")
    }

    pub fn fairy_water_immune(&self) -> bool {
        self.fairy_water_immune.unwrap_or(self.name == "Metal Slime")
    }
}
