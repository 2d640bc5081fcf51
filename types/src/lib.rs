//! Shared configuration and report types for ESOPARSE
//!
//! This crate contains serializable types that are shared between the analysis
//! core (esoparse-core) and the command line front end (esoparse-cli).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Report Types (produced by core, rendered by the CLI)
// ─────────────────────────────────────────────────────────────────────────────

/// Highest observed resource pools for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceMaxima {
    pub health: i64,
    pub magicka: i64,
    pub stamina: i64,
}

/// Damage dealt by one ability inside an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityTotal {
    pub ability_id: i64,
    pub ability_name: String,
    pub total: i64,
    pub hits: u32,
    pub crits: u32,
}

/// Gear set worn by a player together with the number of equipped pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearSetUsage {
    pub name: String,
    pub pieces: u32,
}

/// Per-player section of an encounter report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub unit_id: String,
    pub name: String,
    pub handle: String,
    pub class_id: i64,
    pub class_name: Option<String>,
    pub damage: i64,
    pub healing: i64,
    pub dps: f64,
    pub hps: f64,
    /// Share of the encounter's total damage, 0-100.
    pub damage_percent: f64,
    pub maxima: ResourceMaxima,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gear_sets: Vec<GearSetUsage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skill_lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_abilities: Vec<AbilityTotal>,
}

/// Rendered view of one closed encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterReport {
    pub encounter_id: u64,
    pub display_name: String,
    pub zone_name: Option<String>,
    pub begin_line: u64,
    pub end_line: Option<u64>,
    pub duration_ms: u64,
    pub total_damage: i64,
    pub total_healing: i64,
    pub players: Vec<PlayerReport>,
    /// Only populated when hostile listing is enabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hostiles: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Config
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration.
///
/// Note: Persistence methods (load/save) are provided by esoparse-core via the
/// `AppConfigExt` trait, as they require platform-specific dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log_directory: String,

    /// Emit a trace line for every dropped or attributed event.
    #[serde(default)]
    pub diagnostic_logging: bool,

    /// Include hostile unit names in encounter reports.
    #[serde(default)]
    pub list_hostiles: bool,

    /// Closed encounters kept in memory with full detail.
    /// Summaries are kept for every encounter regardless.
    #[serde(default = "default_retained_encounters")]
    pub retained_encounters: usize,

    /// Optional path to a generated gear-set table (TOML).
    /// When set, the file must exist.
    #[serde(default)]
    pub gear_set_table: Option<String>,
}

fn default_retained_encounters() -> usize {
    16
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_log_directory(String::new())
    }
}

impl AppConfig {
    /// Create a new AppConfig with the specified log directory.
    /// Other fields use their default values.
    pub fn with_log_directory(log_directory: String) -> Self {
        Self {
            log_directory,
            diagnostic_logging: false,
            list_hostiles: false,
            retained_encounters: default_retained_encounters(),
            gear_set_table: None,
        }
    }
}
