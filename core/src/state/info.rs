use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// Header written by BEGIN_LOG.
#[derive(Debug, Clone, Default)]
pub struct LogInfo {
    pub log_version: u32,
    pub server: String,
    pub language: String,
    pub game_version: String,
    /// Wall clock time of the first line (BEGIN_LOG carries epoch ms)
    pub started_at: Option<DateTime<Utc>>,
    /// Line number of BEGIN_LOG; later lines are relative to it
    pub begin_line: u64,
}

impl LogInfo {
    /// Wall clock time for a line number, if the log header was seen.
    pub fn timestamp_for(&self, line_number: u64) -> Option<DateTime<Utc>> {
        let offset = line_number.checked_sub(self.begin_line)?;
        let started = self.started_at?;
        Some(started + chrono::Duration::milliseconds(offset as i64))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZoneInfo {
    pub zone_id: i64,
    pub zone_name: String,
    pub difficulty: String,
    pub map_id: i64,
    pub map_name: String,
    /// Incremented on every ZONE_CHANGED, even re-entering the same zone.
    pub generation: u64,
}

impl ZoneInfo {
    pub fn has_zone(&self) -> bool {
        !self.zone_name.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Content progress (trials, endless dungeon)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrialProgress {
    pub trial_id: i64,
    pub in_progress: bool,
    pub completed: bool,
    pub start_time_ms: i64,
    pub duration_ms: i64,
    pub success: bool,
    pub final_score: i64,
    pub vitality_bonus: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EndlessDungeonProgress {
    pub dungeon_id: i64,
    pub start_time_ms: i64,
    pub stages_completed: u32,
    pub last_stage_begin_ms: i64,
    /// Ordered so serialized progress is stable
    pub active_buffs: BTreeSet<i64>,
    pub duration_ms: Option<i64>,
    pub success: Option<bool>,
}

impl EndlessDungeonProgress {
    pub fn is_finished(&self) -> bool {
        self.duration_ms.is_some()
    }
}

/// Diagnostic surface for instanced content. Never feeds the damage model.
#[derive(Debug, Clone, Default)]
pub struct ContentProgress {
    pub trial: Option<TrialProgress>,
    pub endless_dungeon: Option<EndlessDungeonProgress>,
}

impl ContentProgress {
    pub fn trial_mut(&mut self, trial_id: i64) -> &mut TrialProgress {
        let stale = self.trial.as_ref().is_some_and(|t| t.trial_id != trial_id);
        if stale {
            self.trial = None;
        }
        self.trial.get_or_insert_with(|| TrialProgress {
            trial_id,
            ..Default::default()
        })
    }

    pub fn endless_dungeon_mut(&mut self, dungeon_id: i64) -> &mut EndlessDungeonProgress {
        let stale = self
            .endless_dungeon
            .as_ref()
            .is_some_and(|d| d.dungeon_id != dungeon_id);
        if stale {
            self.endless_dungeon = None;
        }
        self.endless_dungeon
            .get_or_insert_with(|| EndlessDungeonProgress {
                dungeon_id,
                ..Default::default()
            })
    }
}
