use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::json;

use crate::aggregate::{BatchSummary, LifeSummary, ZoneSummary};
use crate::battle::{BattleResult, Winner};
use crate::settings::FRAMES_PER_SECOND;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Report {
    Battle(BattleResult),
    Many(BatchSummary),
    Repeated(LifeSummary),
    Zone(ZoneSummary),
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn winner_label(winner: Winner) -> &'static str {
    match winner {
        Winner::Hero => "hero",
        Winner::Monster => "monster",
        Winner::Fled => "monster fled",
        Winner::HeroFled => "hero fled",
    }
}

impl Report {
    /// Narrative lines, empty for the batch mode.
    pub fn log(&self) -> &[String] {
        match self {
            Report::Battle(result) => result.log.as_slice(),
            Report::Many(_) => &[],
            Report::Repeated(summary) => summary.log.as_slice(),
            Report::Zone(summary) => summary.log.as_slice(),
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        match self {
            Report::Battle(result) => {
                for line in &result.log {
                    let _ = writeln!(out, "{line}");
                }
                let _ = writeln!(out);
                let _ = writeln!(out, "Winner: {}", winner_label(result.winner));
                let _ = writeln!(
                    out,
                    "Rounds: {}  Time: {:.1}s  XP: {}  XP/min: {:.2}",
                    result.rounds, result.time_seconds, result.xp_gained, result.xp_per_minute
                );
                let _ = writeln!(
                    out,
                    "MP spent: {}  Herbs: {}  Fairy Water: {}  Hero HP left: {}",
                    result.mp_spent, result.herbs_used, result.fairy_waters_used, result.hero_hp
                );
            }
            Report::Many(summary) => {
                let _ = writeln!(out, "Battles: {}", summary.iterations);
                let _ = writeln!(
                    out,
                    "Hero wins: {}  Monster wins: {}  Monster fled: {}  Hero fled: {}",
                    percent(summary.win_rate),
                    percent(summary.monster_win_rate),
                    percent(summary.monster_flee_rate),
                    percent(summary.hero_flee_rate)
                );
                let _ = writeln!(out, "XP/min: {:.2}", summary.xp_per_minute);
                let _ = writeln!(
                    out,
                    "Avg time: {:.1}s  Avg rounds: {:.2}  Avg MP: {:.2}  \
Avg herbs: {:.2}  Avg Fairy Water: {:.2}",
                    summary.average_time_seconds,
                    summary.average_rounds,
                    summary.average_mp_spent,
                    summary.average_herbs_used,
                    summary.average_fairy_waters_used
                );
            }
            Report::Repeated(summary) => {
                let _ = writeln!(out, "Lives: {}", summary.iterations);
                let _ = writeln!(
                    out,
                    "Avg XP/life: {:.1}  Avg kills: {:.2}  Avg time: {:.1}s",
                    summary.average_xp_per_life, summary.average_kills, summary.average_time_seconds
                );
                let _ = writeln!(
                    out,
                    "XP/min: {:.2}  with refill: {:.2}  MP/fight: {:.2}",
                    summary.xp_per_minute,
                    summary.xp_per_minute_with_refill,
                    summary.average_mp_per_fight
                );
                let _ = writeln!(
                    out,
                    "Deaths: {}  Abandoned: {}",
                    percent(summary.death_rate),
                    percent(summary.abandon_rate)
                );
                let _ = writeln!(
                    out,
                    "First life: {} MP, {} herbs, {} Fairy Water, {:.1}s",
                    summary.mp_spent,
                    summary.herbs_used,
                    summary.fairy_waters_used,
                    summary.time_frames as f64 / FRAMES_PER_SECOND
                );
            }
            Report::Zone(summary) => {
                let _ = writeln!(out, "Runs: {}", summary.iterations);
                let _ = writeln!(
                    out,
                    "XP/min: {:.2}  MP/min: {:.2}",
                    summary.xp_per_minute, summary.mp_per_minute
                );
                let _ = writeln!(
                    out,
                    "Avg encounters: {:.1}  Avg kills: {:.1}  Avg repels: {:.1}  Avg time: {:.1}s",
                    summary.average_encounters,
                    summary.average_kills,
                    summary.average_repels,
                    summary.average_time_seconds
                );
                let _ = writeln!(
                    out,
                    "Deaths: {}  Abandoned: {}",
                    percent(summary.death_rate),
                    percent(summary.abandon_rate)
                );
            }
        }
        out
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}

pub fn write_log_json(path: &Path, label: &str, lines: &[String]) -> anyhow::Result<()> {
    let value = json!({
        "label": label,
        "log": lines,
    });
    let out = serde_json::to_string_pretty(&value)?;
    std::fs::write(path, out)
        .with_context(|| format!("Failed to write log to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_report_is_tagged_by_mode() {
        let report = Report::Many(BatchSummary {
            iterations: 4,
            win_rate: 0.75,
            ..BatchSummary::default()
        });
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["mode"], "many");
        assert_eq!(value["iterations"], 4);
        assert!(report.log().is_empty());
        assert!(report.to_text().contains("Hero wins: 75.0%"));
    }
}
