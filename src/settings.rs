use serde::{Deserialize, Serialize};

pub const FRAMES_PER_SECOND: f64 = 60.0;
pub const FRAMES_PER_MINUTE: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub pre_battle_time: u32,
    pub post_battle_time: u32,
    pub ambush_time: u32,
    /// Outro cost of any battle that ends by flight, monster or hero.
    pub monster_flee_time: u32,

    pub hero_attack_time: u32,
    pub hero_critical_time: u32,
    pub hero_spell_time: u32,
    pub hero_status_spell_time: u32,
    pub hero_sleep_time: u32,
    pub hero_run_time: u32,
    pub herb_time: u32,
    pub fairy_water_time: u32,
    pub fairy_flute_time: u32,

    pub enemy_attack_time: u32,
    pub enemy_hurt_spell_time: u32,
    pub enemy_heal_spell_time: u32,
    pub enemy_spell_time: u32,
    pub enemy_breath_time: u32,
    pub enemy_dodge_time: u32,
    pub enemy_sleep_time: u32,
    pub stopspelled_spell_reduction: u32,

    pub frames_between_fights: u32,
    pub heal_spell_time: u32,
    pub herb_between_fights_time: u32,
    pub repel_time: u32,
    pub refill_time_seconds: f64,

    /// Highest failure chance a guaranteed-kill candidate may carry. Zero
    /// turns the filter off.
    pub dodge_rate_risk_factor: f64,
    pub hero_may_flee: bool,
    pub max_battles_per_life: u32,
    pub zone_time_limit_seconds: f64,
    pub repel_xp_threshold: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            pre_battle_time: 140,
            post_battle_time: 200,
            ambush_time: 50,
            monster_flee_time: 45,
            hero_attack_time: 120,
            hero_critical_time: 30,
            hero_spell_time: 180,
            hero_status_spell_time: 180,
            hero_sleep_time: 60,
            hero_run_time: 120,
            herb_time: 150,
            fairy_water_time: 220,
            fairy_flute_time: 480,
            enemy_attack_time: 130,
            enemy_hurt_spell_time: 190,
            enemy_heal_spell_time: 165,
            enemy_spell_time: 170,
            enemy_breath_time: 135,
            enemy_dodge_time: 60,
            enemy_sleep_time: 60,
            stopspelled_spell_reduction: 60,
            frames_between_fights: 0,
            heal_spell_time: 230,
            herb_between_fights_time: 150,
            repel_time: 180,
            refill_time_seconds: 60.0,
            dodge_rate_risk_factor: 0.0,
            hero_may_flee: false,
            max_battles_per_life: 10_000,
            zone_time_limit_seconds: 3600.0,
            repel_xp_threshold: 0,
        }
    }
}

impl Settings {
    /// Every per-action cost set to `frames`, with no intro/outro or
    /// between-fight overhead. Handy for hand-checked timelines.
    pub fn uniform(frames: u32) -> Self {
        Settings {
            pre_battle_time: 0,
            post_battle_time: 0,
            ambush_time: 0,
            monster_flee_time: 0,
            hero_attack_time: frames,
            hero_critical_time: 0,
            hero_spell_time: frames,
            hero_status_spell_time: frames,
            hero_sleep_time: frames,
            hero_run_time: frames,
            herb_time: frames,
            fairy_water_time: frames,
            fairy_flute_time: frames,
            enemy_attack_time: frames,
            enemy_hurt_spell_time: frames,
            enemy_heal_spell_time: frames,
            enemy_spell_time: frames,
            enemy_breath_time: frames,
            enemy_dodge_time: frames,
            enemy_sleep_time: frames,
            heal_spell_time: frames,
            herb_between_fights_time: frames,
            repel_time: frames,
            ..Settings::default()
        }
    }

    pub fn refill_frames(&self) -> f64 {
        self.refill_time_seconds.max(0.0) * FRAMES_PER_SECOND
    }

    pub fn zone_time_limit_frames(&self) -> u64 {
        (self.zone_time_limit_seconds.max(0.0) * FRAMES_PER_SECOND) as u64
    }
}

pub fn per_minute(amount: f64, frames: f64) -> f64 {
    if frames <= 0.0 {
        0.0
    } else {
        amount * FRAMES_PER_MINUTE / frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"heroAttackTime": 90, "dodgeRateRiskFactor": 0.05}"#)
                .expect("settings parse");
        assert_eq!(settings.hero_attack_time, 90);
        assert_eq!(settings.post_battle_time, 200);
        assert_eq!(settings.enemy_hurt_spell_time, 190);
        assert!((settings.dodge_rate_risk_factor - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn per_minute_guards_zero_time() {
        assert_eq!(per_minute(100.0, 0.0), 0.0);
        assert!((per_minute(10.0, 3600.0) - 10.0).abs() < 1e-9);
    }
}
