use super::ResourceSnapshot;

/// A unit id together with the resource state reported for it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitState {
    pub unit_id: String,
    pub resources: ResourceSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UnitType {
    Player,
    Monster,
    Object,
    SiegeWeapon,
    #[default]
    Empty,
    Other(String),
}

impl UnitType {
    pub fn from_token(token: &str) -> Self {
        match token {
            "PLAYER" => Self::Player,
            "MONSTER" => Self::Monster,
            "OBJECT" => Self::Object,
            "SIEGEWEAPON" => Self::SiegeWeapon,
            "" => Self::Empty,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Damage,
    CriticalDamage,
    DotTick,
    DotTickCritical,
    BlockedDamage,
    DamageShielded,
    Heal,
    CriticalHeal,
    HotTick,
    HotTickCritical,
    PowerEnergize,
    PowerDrain,
    Died,
    DiedXp,
    KillingBlow,
    Other(String),
}

impl ActionResult {
    pub fn from_token(token: &str) -> Self {
        match token {
            "DAMAGE" => Self::Damage,
            "CRITICAL_DAMAGE" => Self::CriticalDamage,
            "DOT_TICK" => Self::DotTick,
            "DOT_TICK_CRITICAL" => Self::DotTickCritical,
            "BLOCKED_DAMAGE" => Self::BlockedDamage,
            "DAMAGE_SHIELDED" => Self::DamageShielded,
            "HEAL" => Self::Heal,
            "CRITICAL_HEAL" => Self::CriticalHeal,
            "HOT_TICK" => Self::HotTick,
            "HOT_TICK_CRITICAL" => Self::HotTickCritical,
            "POWER_ENERGIZE" => Self::PowerEnergize,
            "POWER_DRAIN" => Self::PowerDrain,
            "DIED" => Self::Died,
            "DIED_XP" => Self::DiedXp,
            "KILLING_BLOW" => Self::KillingBlow,
            other => Self::Other(other.to_string()),
        }
    }

    /// Results whose hit value is damage dealt by the source.
    pub fn is_damage(&self) -> bool {
        matches!(
            self,
            Self::Damage
                | Self::CriticalDamage
                | Self::DotTick
                | Self::DotTickCritical
                | Self::BlockedDamage
        )
    }

    pub fn is_heal(&self) -> bool {
        matches!(
            self,
            Self::Heal | Self::CriticalHeal | Self::HotTick | Self::HotTickCritical
        )
    }

    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::CriticalDamage | Self::DotTickCritical | Self::CriticalHeal | Self::HotTickCritical
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectChangeType {
    Gained,
    Faded,
    Updated,
    Other(String),
}

impl EffectChangeType {
    pub fn from_token(token: &str) -> Self {
        match token {
            "GAINED" => Self::Gained,
            "FADED" => Self::Faded,
            "UPDATED" => Self::Updated,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastResult {
    Completed,
    PlayerCancelled,
    Interrupted,
    Other(String),
}

impl CastResult {
    pub fn from_token(token: &str) -> Self {
        match token {
            "COMPLETED" => Self::Completed,
            "PLAYER_CANCELLED" | "CANCELLED" => Self::PlayerCancelled,
            "INTERRUPTED" => Self::Interrupted,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One equipped item from a PLAYER_INFO gear list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GearPiece {
    pub slot: String,
    pub item_id: i64,
    pub is_champion: bool,
    pub level: u32,
    pub trait_name: String,
    pub quality: String,
    pub set_id: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Event payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Payload-free events (BEGIN_COMBAT, END_COMBAT, END_LOG).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerEntry {
    pub line_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeginLogEntry {
    pub line_number: u64,
    pub time_ms: i64,
    pub log_version: u32,
    pub server: String,
    pub language: String,
    pub game_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneChangedEntry {
    pub line_number: u64,
    pub zone_id: i64,
    pub name: String,
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapChangedEntry {
    pub line_number: u64,
    pub map_id: i64,
    pub name: String,
    pub texture: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitAddedEntry {
    pub line_number: u64,
    pub unit_id: String,
    pub unit_type: UnitType,
    pub is_local_player: bool,
    pub player_per_session_id: i64,
    pub monster_id: i64,
    pub is_boss: bool,
    pub class_id: i64,
    pub race_id: i64,
    pub name: String,
    pub handle: String,
    pub long_id: String,
    pub level: u32,
    pub champion_points: u32,
    /// "0" when the unit has no owner
    pub owner_unit_id: String,
    pub reaction: String,
    pub is_grouped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitChangedEntry {
    pub line_number: u64,
    pub unit_id: String,
    pub class_id: i64,
    pub race_id: i64,
    pub name: String,
    pub handle: String,
    pub long_id: String,
    pub level: u32,
    pub champion_points: u32,
    pub owner_unit_id: String,
    pub reaction: String,
    pub is_grouped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRemovedEntry {
    pub line_number: u64,
    pub unit_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfoEntry {
    pub line_number: u64,
    pub unit_id: String,
    pub effect_ids: Vec<i64>,
    pub effect_stacks: Vec<u32>,
    pub gear: Vec<GearPiece>,
    pub front_bar: Vec<i64>,
    pub back_bar: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityInfoEntry {
    pub line_number: u64,
    pub ability_id: i64,
    pub name: String,
    pub icon_path: String,
    pub is_player_ability: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectInfoEntry {
    pub line_number: u64,
    pub ability_id: i64,
    pub effect_type: String,
    pub status_effect_type: String,
    pub bar_display: String,
    pub synergy_ability_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeginCastEntry {
    pub line_number: u64,
    pub duration_ms: i64,
    pub channeled: bool,
    pub cast_track_id: i64,
    pub ability_id: i64,
    pub source: UnitState,
    /// `None` when the log writes `*` (no separate target)
    pub target: Option<UnitState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndCastEntry {
    pub line_number: u64,
    pub result: CastResult,
    pub cast_track_id: i64,
    pub ability_id: i64,
    pub interrupting_ability_id: Option<i64>,
    pub interrupting_unit_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombatEventEntry {
    pub line_number: u64,
    pub action_result: ActionResult,
    pub damage_type: String,
    pub power_type: i64,
    pub hit_value: i64,
    pub overflow: i64,
    pub cast_track_id: i64,
    pub ability_id: i64,
    pub source: UnitState,
    pub target: Option<UnitState>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectChangedEntry {
    pub line_number: u64,
    pub change_type: EffectChangeType,
    pub stack_count: u32,
    pub cast_track_id: i64,
    pub ability_id: i64,
    pub source: UnitState,
    pub target: Option<UnitState>,
    pub player_initiated_remove_cast_track_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthRegenEntry {
    pub line_number: u64,
    pub effective_regen: i64,
    pub unit_id: String,
    pub resources: ResourceSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialInitEntry {
    pub line_number: u64,
    pub trial_id: i64,
    pub in_progress: bool,
    pub completed: bool,
    pub start_time_ms: i64,
    pub duration_ms: i64,
    pub success: bool,
    pub final_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeginTrialEntry {
    pub line_number: u64,
    pub trial_id: i64,
    pub start_time_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTrialEntry {
    pub line_number: u64,
    pub trial_id: i64,
    pub duration_ms: i64,
    pub success: bool,
    pub final_score: i64,
    pub vitality_bonus: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndlessDungeonBeginEntry {
    pub line_number: u64,
    pub dungeon_id: i64,
    pub start_time_ms: i64,
    pub flag: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndlessDungeonStageEndEntry {
    pub line_number: u64,
    pub dungeon_id: i64,
    pub begin_time_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndlessDungeonBuffEntry {
    pub line_number: u64,
    pub dungeon_id: i64,
    pub ability_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndlessDungeonEndEntry {
    pub line_number: u64,
    pub dungeon_id: i64,
    pub duration_ms: i64,
    pub success: Option<bool>,
}

/// Closed set of decoded events, one variant per recognised event type.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    BeginLog(BeginLogEntry),
    EndLog(MarkerEntry),
    BeginCombat(MarkerEntry),
    EndCombat(MarkerEntry),
    ZoneChanged(ZoneChangedEntry),
    MapChanged(MapChangedEntry),
    UnitAdded(UnitAddedEntry),
    UnitChanged(UnitChangedEntry),
    UnitRemoved(UnitRemovedEntry),
    PlayerInfo(PlayerInfoEntry),
    AbilityInfo(AbilityInfoEntry),
    EffectInfo(EffectInfoEntry),
    BeginCast(BeginCastEntry),
    EndCast(EndCastEntry),
    CombatEvent(CombatEventEntry),
    EffectChanged(EffectChangedEntry),
    HealthRegen(HealthRegenEntry),
    TrialInit(TrialInitEntry),
    BeginTrial(BeginTrialEntry),
    EndTrial(EndTrialEntry),
    EndlessDungeonBegin(EndlessDungeonBeginEntry),
    EndlessDungeonStageEnd(EndlessDungeonStageEndEntry),
    EndlessDungeonBuffAdded(EndlessDungeonBuffEntry),
    EndlessDungeonBuffRemoved(EndlessDungeonBuffEntry),
    EndlessDungeonEnd(EndlessDungeonEndEntry),
}

impl LogEvent {
    pub fn line_number(&self) -> u64 {
        match self {
            Self::BeginLog(e) => e.line_number,
            Self::EndLog(e) | Self::BeginCombat(e) | Self::EndCombat(e) => e.line_number,
            Self::ZoneChanged(e) => e.line_number,
            Self::MapChanged(e) => e.line_number,
            Self::UnitAdded(e) => e.line_number,
            Self::UnitChanged(e) => e.line_number,
            Self::UnitRemoved(e) => e.line_number,
            Self::PlayerInfo(e) => e.line_number,
            Self::AbilityInfo(e) => e.line_number,
            Self::EffectInfo(e) => e.line_number,
            Self::BeginCast(e) => e.line_number,
            Self::EndCast(e) => e.line_number,
            Self::CombatEvent(e) => e.line_number,
            Self::EffectChanged(e) => e.line_number,
            Self::HealthRegen(e) => e.line_number,
            Self::TrialInit(e) => e.line_number,
            Self::BeginTrial(e) => e.line_number,
            Self::EndTrial(e) => e.line_number,
            Self::EndlessDungeonBegin(e) => e.line_number,
            Self::EndlessDungeonStageEnd(e) => e.line_number,
            Self::EndlessDungeonBuffAdded(e) | Self::EndlessDungeonBuffRemoved(e) => e.line_number,
            Self::EndlessDungeonEnd(e) => e.line_number,
        }
    }

    /// The log token this event was decoded from.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BeginLog(_) => "BEGIN_LOG",
            Self::EndLog(_) => "END_LOG",
            Self::BeginCombat(_) => "BEGIN_COMBAT",
            Self::EndCombat(_) => "END_COMBAT",
            Self::ZoneChanged(_) => "ZONE_CHANGED",
            Self::MapChanged(_) => "MAP_CHANGED",
            Self::UnitAdded(_) => "UNIT_ADDED",
            Self::UnitChanged(_) => "UNIT_CHANGED",
            Self::UnitRemoved(_) => "UNIT_REMOVED",
            Self::PlayerInfo(_) => "PLAYER_INFO",
            Self::AbilityInfo(_) => "ABILITY_INFO",
            Self::EffectInfo(_) => "EFFECT_INFO",
            Self::BeginCast(_) => "BEGIN_CAST",
            Self::EndCast(_) => "END_CAST",
            Self::CombatEvent(_) => "COMBAT_EVENT",
            Self::EffectChanged(_) => "EFFECT_CHANGED",
            Self::HealthRegen(_) => "HEALTH_REGEN",
            Self::TrialInit(_) => "TRIAL_INIT",
            Self::BeginTrial(_) => "BEGIN_TRIAL",
            Self::EndTrial(_) => "END_TRIAL",
            Self::EndlessDungeonBegin(_) => "ENDLESS_DUNGEON_BEGIN",
            Self::EndlessDungeonStageEnd(_) => "ENDLESS_DUNGEON_STAGE_END",
            Self::EndlessDungeonBuffAdded(_) => "ENDLESS_DUNGEON_BUFF_ADDED",
            Self::EndlessDungeonBuffRemoved(_) => "ENDLESS_DUNGEON_BUFF_REMOVED",
            Self::EndlessDungeonEnd(_) => "ENDLESS_DUNGEON_END",
        }
    }
}
