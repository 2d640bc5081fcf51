//! Encounter history tracking and naming
//!
//! Every closed encounter leaves a lightweight summary behind, even after the
//! full encounter has been evicted from the retained window.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::CombatEncounter;
use super::metrics::{PlayerMetrics, per_second};
use crate::state::info::ZoneInfo;

/// Summary of a completed encounter with computed metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterSummary {
    pub encounter_id: u64,
    pub display_name: String,
    pub zone_name: Option<String>,
    pub map_name: Option<String>,
    pub begin_line: u64,
    pub end_line: u64,
    pub duration_ms: u64,
    pub total_damage: i64,
    pub total_healing: i64,
    pub boss_name: Option<String>,
    pub player_metrics: Vec<PlayerMetrics>,
    /// True if this encounter is the first since a zone change
    pub is_phase_start: bool,
    /// Hostile unit names, with a count suffix when more than one
    pub enemy_names: Vec<String>,
    pub attribution_misses: u64,
}

/// Tracks encounter history for the current log
#[derive(Debug, Clone, Default)]
pub struct EncounterHistory {
    summaries: Vec<EncounterSummary>,
    boss_pull_counts: HashMap<String, u32>,
    trash_pull_count: u32,
    current_generation: Option<u64>,
}

impl EncounterHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, summary: EncounterSummary) {
        self.summaries.push(summary);
    }

    pub fn summaries(&self) -> &[EncounterSummary] {
        &self.summaries
    }

    pub fn summary_for(&self, encounter_id: u64) -> Option<&EncounterSummary> {
        self.summaries.iter().find(|s| s.encounter_id == encounter_id)
    }

    /// Returns true on the first encounter after a ZONE_CHANGED.
    /// Pull counters restart with each zone.
    pub fn check_zone_change(&mut self, generation: u64) -> bool {
        let changed = self.current_generation != Some(generation);
        if changed {
            self.current_generation = Some(generation);
            self.trash_pull_count = 0;
            self.boss_pull_counts.clear();
        }
        changed
    }

    /// "Boss - 3" for boss pulls, "Zone 4" for everything else.
    pub fn generate_name(&mut self, zone_name: Option<&str>, boss_name: Option<&str>) -> String {
        match (boss_name, zone_name) {
            (Some(boss), _) => {
                let count = self.boss_pull_counts.entry(boss.to_string()).or_insert(0);
                *count += 1;
                format!("{} - {}", boss, count)
            }
            (None, Some(zone)) => {
                self.trash_pull_count += 1;
                format!("{} {}", zone, self.trash_pull_count)
            }
            (None, None) => {
                self.trash_pull_count += 1;
                format!("Encounter {}", self.trash_pull_count)
            }
        }
    }

    pub fn peek_pull_count(&self, boss_name: &str) -> u32 {
        self.boss_pull_counts.get(boss_name).copied().unwrap_or(0) + 1
    }
}

/// First boss seen, alphabetically when several are present.
fn primary_boss(encounter: &CombatEncounter) -> Option<String> {
    encounter
        .enemies
        .values()
        .filter(|u| u.is_boss)
        .map(|u| u.name())
        .filter(|name| !name.is_empty())
        .min()
        .map(str::to_string)
}

pub fn player_metrics(encounter: &CombatEncounter) -> Vec<PlayerMetrics> {
    let duration = encounter.duration_ms();
    let mut metrics: Vec<PlayerMetrics> = encounter
        .participants()
        .map(|p| {
            let damage = encounter.player_damage.get(&p.unit_id).copied().unwrap_or(0);
            let healing = encounter.player_healing.get(&p.unit_id).copied().unwrap_or(0);
            let acc = encounter.accumulated_data.get(&p.unit_id);
            PlayerMetrics {
                unit_id: p.unit_id.clone(),
                name: p.name().to_string(),
                damage,
                healing,
                dps: per_second(damage, duration),
                hps: per_second(healing, duration),
                damage_crit_pct: acc.map(|a| a.damage_crit_pct()).unwrap_or(0.0),
                heal_crit_pct: acc.map(|a| a.heal_crit_pct()).unwrap_or(0.0),
                casts: acc.map(|a| a.casts).unwrap_or(0),
            }
        })
        .collect();
    metrics.sort_by(|a, b| b.damage.cmp(&a.damage).then_with(|| a.unit_id.cmp(&b.unit_id)));
    metrics
}

/// Create an EncounterSummary from a closed CombatEncounter
pub fn create_summary(
    encounter: &CombatEncounter,
    zone: &ZoneInfo,
    history: &mut EncounterHistory,
) -> EncounterSummary {
    let is_phase_start = history.check_zone_change(zone.generation);
    let boss_name = primary_boss(encounter);
    let display_name = history.generate_name(encounter.zone_name.as_deref(), boss_name.as_deref());

    let mut enemy_counts: HashMap<&str, u32> = HashMap::new();
    for unit in encounter.enemies.values().filter(|u| u.is_hostile()) {
        *enemy_counts.entry(unit.name()).or_insert(0) += 1;
    }
    let mut enemy_names: Vec<String> = enemy_counts
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, count)| {
            if count > 1 {
                format!("{} ({})", name, count)
            } else {
                name.to_string()
            }
        })
        .collect();
    enemy_names.sort();

    tracing::debug!(
        encounter_id = encounter.id,
        name = %display_name,
        total_damage = encounter.total_damage,
        "Summarized encounter"
    );

    EncounterSummary {
        encounter_id: encounter.id,
        display_name,
        zone_name: encounter.zone_name.clone(),
        map_name: encounter.map_name.clone(),
        begin_line: encounter.begin_line,
        end_line: encounter.end_line.unwrap_or(encounter.begin_line),
        duration_ms: encounter.duration_ms(),
        total_damage: encounter.total_damage,
        total_healing: encounter.total_healing,
        boss_name,
        player_metrics: player_metrics(encounter),
        is_phase_start,
        enemy_names,
        attribution_misses: encounter.attribution_misses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::intern;
    use crate::encounter::entity_info::{PlayerInfo, UnitInfo};

    fn boss(unit_id: &str, name: &str) -> UnitInfo {
        UnitInfo {
            unit_id: unit_id.to_string(),
            name: intern(name),
            is_boss: true,
            reaction: "HOSTILE".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn boss_pulls_are_counted_per_zone() {
        let mut history = EncounterHistory::new();
        let zone = ZoneInfo {
            zone_name: "Cloudrest".to_string(),
            generation: 1,
            ..Default::default()
        };

        for expected in ["Z'Maja - 1", "Z'Maja - 2"] {
            let mut encounter = CombatEncounter::new(0, 0);
            encounter.add_enemy(boss("90", "Z'Maja"));
            encounter.close(1000);
            let summary = create_summary(&encounter, &zone, &mut history);
            assert_eq!(summary.display_name, expected);
        }

        let zone = ZoneInfo { generation: 2, ..zone };
        let mut encounter = CombatEncounter::new(1, 0);
        encounter.add_enemy(boss("90", "Z'Maja"));
        encounter.close(10);
        let summary = create_summary(&encounter, &zone, &mut history);
        assert_eq!(summary.display_name, "Z'Maja - 1");
        assert!(summary.is_phase_start);
    }

    #[test]
    fn trash_named_after_zone() {
        let mut history = EncounterHistory::new();
        let mut encounter = CombatEncounter::new(0, 0);
        encounter.zone_name = Some("Vivec City".to_string());
        encounter.close(0);
        let summary = create_summary(&encounter, &ZoneInfo::default(), &mut history);
        assert_eq!(summary.display_name, "Vivec City 1");
        assert_eq!(summary.duration_ms, 0);
    }

    #[test]
    fn metrics_sorted_by_damage() {
        let mut encounter = CombatEncounter::new(0, 1000);
        encounter.add_player(PlayerInfo::new("1"));
        encounter.add_player(PlayerInfo::new("2"));
        encounter.add_player(PlayerInfo::new("3"));
        encounter.record_damage("1", 10, 1000, false);
        encounter.record_damage("2", 10, 3000, true);
        encounter.close(3000);

        let metrics = player_metrics(&encounter);
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].unit_id, "2");
        assert_eq!(metrics[0].dps, 1500.0);
        assert_eq!(metrics[0].damage_crit_pct, 100.0);
    }
}
