use chrono::DateTime;

use crate::combat_log::{
    AbilityInfoEntry, BeginCastEntry, BeginLogEntry, CombatEventEntry, EffectChangedEntry,
    EndlessDungeonBeginEntry, EndlessDungeonBuffEntry, EndlessDungeonEndEntry,
    EndlessDungeonStageEndEntry, HealthRegenEntry, LogEvent, MapChangedEntry, PlayerInfoEntry,
    TrialInitEntry, UnitAddedEntry, UnitChangedEntry, UnitState, UnitType, ZoneChangedEntry,
};
use crate::context::intern;
use crate::encounter::entity_info::{PlayerInfo, UnitInfo};
use crate::state::SessionCache;

use super::combat_state::{self, CombatTransition};

/// Owner id written for units that have no owner.
const NO_OWNER: &str = "0";

/// What a single event did to the data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// State changed (registry, caches, encounter or lifecycle)
    Applied,
    /// A damage/heal amount could not be tied to a player
    AttributionMiss,
    /// Accepted, nothing to update
    Ignored,
}

/// Routes typed events to the session cache and the active encounter.
/// The two flags only gate trace output.
#[derive(Debug, Clone, Default)]
pub struct EventProcessor {
    diagnostic_logging: bool,
    list_hostiles: bool,
}

impl EventProcessor {
    pub fn new(diagnostic_logging: bool, list_hostiles: bool) -> Self {
        Self {
            diagnostic_logging,
            list_hostiles,
        }
    }

    /// Process one event in log order. Never fails.
    pub fn process_event(&mut self, event: LogEvent, cache: &mut SessionCache) -> Dispatch {
        // Lifecycle first so BEGIN_LOG / END_LOG close before the header changes
        let transition = combat_state::advance_combat_state(&event, cache);
        if self.diagnostic_logging
            && let Some(CombatTransition::Opened { encounter_id, .. }) = transition
        {
            tracing::debug!(
                encounter_id,
                players = cache.players.player_count(),
                "Seeded encounter roster"
            );
        }

        match &event {
            LogEvent::BeginCombat(_) | LogEvent::EndCombat(_) | LogEvent::EndLog(_) => {
                if transition.is_some() {
                    Dispatch::Applied
                } else {
                    Dispatch::Ignored
                }
            }
            LogEvent::BeginLog(e) => self.handle_begin_log(e, cache),
            LogEvent::ZoneChanged(e) => self.handle_zone_changed(e, cache),
            LogEvent::MapChanged(e) => self.handle_map_changed(e, cache),
            LogEvent::UnitAdded(e) => self.handle_unit_added(e, cache),
            LogEvent::UnitChanged(e) => self.handle_unit_changed(e, cache),
            LogEvent::UnitRemoved(e) => {
                let removed = cache.players.remove_unit(&e.unit_id);
                let retired = cache.players.retire_player(&e.unit_id);
                if let Some(enc) = cache.current_encounter_mut() {
                    enc.remove_unit(&e.unit_id);
                    enc.retire_player(&e.unit_id);
                }
                if retired && self.diagnostic_logging {
                    tracing::debug!(line = e.line_number, unit_id = %e.unit_id, "Player left");
                }
                if removed || retired { Dispatch::Applied } else { Dispatch::Ignored }
            }
            LogEvent::PlayerInfo(e) => self.handle_player_info(e, cache),
            LogEvent::AbilityInfo(e) => self.handle_ability_info(e, cache),
            LogEvent::EffectInfo(e) => {
                cache.effects.insert(e);
                Dispatch::Applied
            }
            LogEvent::BeginCast(e) => self.handle_begin_cast(e, cache),
            LogEvent::EndCast(_) => Dispatch::Ignored,
            LogEvent::CombatEvent(e) => self.handle_combat_event(e, cache),
            LogEvent::EffectChanged(e) => self.handle_effect_changed(e, cache),
            LogEvent::HealthRegen(e) => self.handle_health_regen(e, cache),
            LogEvent::TrialInit(e) => self.handle_trial_init(e, cache),
            LogEvent::BeginTrial(e) => {
                let trial = cache.content.trial_mut(e.trial_id);
                trial.in_progress = true;
                trial.completed = false;
                trial.start_time_ms = e.start_time_ms;
                Dispatch::Applied
            }
            LogEvent::EndTrial(e) => {
                let trial = cache.content.trial_mut(e.trial_id);
                trial.in_progress = false;
                trial.completed = true;
                trial.duration_ms = e.duration_ms;
                trial.success = e.success;
                trial.final_score = e.final_score;
                trial.vitality_bonus = e.vitality_bonus;
                if self.diagnostic_logging {
                    tracing::debug!(trial_id = e.trial_id, score = e.final_score, success = e.success, "Trial finished");
                }
                Dispatch::Applied
            }
            LogEvent::EndlessDungeonBegin(e) => self.handle_endless_begin(e, cache),
            LogEvent::EndlessDungeonStageEnd(e) => self.handle_endless_stage_end(e, cache),
            LogEvent::EndlessDungeonBuffAdded(e) => self.handle_endless_buff(e, cache, true),
            LogEvent::EndlessDungeonBuffRemoved(e) => self.handle_endless_buff(e, cache, false),
            LogEvent::EndlessDungeonEnd(e) => self.handle_endless_end(e, cache),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Log, zone and map
    // ═══════════════════════════════════════════════════════════════════════════

    fn handle_begin_log(&self, e: &BeginLogEntry, cache: &mut SessionCache) -> Dispatch {
        let info = &mut cache.log_info;
        info.log_version = e.log_version;
        info.server = e.server.clone();
        info.language = e.language.clone();
        info.game_version = e.game_version.clone();
        info.started_at = DateTime::from_timestamp_millis(e.time_ms);
        info.begin_line = e.line_number;
        tracing::info!(
            server = %e.server,
            game_version = %e.game_version,
            log_version = e.log_version,
            "Log session started"
        );
        Dispatch::Applied
    }

    fn handle_zone_changed(&self, e: &ZoneChangedEntry, cache: &mut SessionCache) -> Dispatch {
        let zone = &mut cache.zone;
        zone.zone_id = e.zone_id;
        zone.zone_name = e.name.clone();
        zone.difficulty = e.difficulty.clone();
        zone.generation += 1;
        tracing::info!(zone_id = e.zone_id, zone = %e.name, difficulty = %e.difficulty, "Zone changed");
        Dispatch::Applied
    }

    fn handle_map_changed(&self, e: &MapChangedEntry, cache: &mut SessionCache) -> Dispatch {
        cache.zone.map_id = e.map_id;
        cache.zone.map_name = e.name.clone();
        Dispatch::Applied
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Units and identity
    // ═══════════════════════════════════════════════════════════════════════════

    fn handle_unit_added(&self, e: &UnitAddedEntry, cache: &mut SessionCache) -> Dispatch {
        if e.unit_type == UnitType::Player {
            let mut player = PlayerInfo::new(e.unit_id.as_str());
            player.name = intern(&e.name);
            player.handle = intern(&e.handle);
            player.class_id = e.class_id;
            player.level = e.level;
            player.champion_points = e.champion_points;
            player.long_id = Some(e.long_id.clone()).filter(|l| !l.is_empty() && l != "0");

            let created = cache.players.register_player(player);
            if created && self.diagnostic_logging {
                tracing::debug!(line = e.line_number, unit_id = %e.unit_id, handle = %e.handle, "Registered player");
            }
            if let Some(record) = cache.players.find_player_by_unit_id(&e.unit_id).cloned()
                && let Some(enc) = cache.current_encounter_mut()
            {
                // Aliases of a previous holder of this short id must not carry over
                if created {
                    enc.retire_player(&e.unit_id);
                }
                enc.add_player(record);
            }
        } else {
            let unit = UnitInfo {
                unit_id: e.unit_id.clone(),
                name: intern(&e.name),
                unit_type: e.unit_type.clone(),
                monster_id: e.monster_id,
                is_boss: e.is_boss,
                reaction: e.reaction.clone(),
                owner_unit_id: Some(e.owner_unit_id.clone()).filter(|o| o != NO_OWNER),
                health_max: 0,
            };
            if self.list_hostiles && unit.is_hostile() {
                tracing::info!(
                    line = e.line_number,
                    unit_id = %e.unit_id,
                    name = %e.name,
                    monster_id = e.monster_id,
                    is_boss = e.is_boss,
                    "Hostile unit"
                );
            }
            // A short id now naming a non-player no longer credits its old holder
            if cache.players.retire_player(&e.unit_id) && self.diagnostic_logging {
                tracing::debug!(line = e.line_number, unit_id = %e.unit_id, "Player id reused by another unit");
            }
            cache.players.register_unit(unit.clone());
            if let Some(enc) = cache.current_encounter_mut() {
                enc.retire_player(&e.unit_id);
                enc.add_enemy(unit);
            }
        }

        self.track_owner(&e.unit_id, &e.owner_unit_id, cache);
        Dispatch::Applied
    }

    fn handle_unit_changed(&self, e: &UnitChangedEntry, cache: &mut SessionCache) -> Dispatch {
        if let Some(player) = cache.players.find_player_mut(&e.unit_id) {
            player.name = intern(&e.name);
            player.handle = intern(&e.handle);
            player.class_id = e.class_id;
            player.level = e.level;
            player.champion_points = e.champion_points;
            // Short and long id on the same record
            if let Some(canonical) = cache.players.associate_long_id(&e.unit_id, &e.long_id)
                && let Some(enc) = cache.current_encounter_mut()
            {
                enc.associate_alias(&canonical, &e.long_id);
            }
        } else if let Some(unit) = cache.players.unit_mut(&e.unit_id) {
            unit.name = intern(&e.name);
            unit.reaction = e.reaction.clone();
        }

        self.track_owner(&e.unit_id, &e.owner_unit_id, cache);
        Dispatch::Applied
    }

    fn track_owner(&self, unit_id: &str, owner_unit_id: &str, cache: &mut SessionCache) {
        if owner_unit_id == NO_OWNER || owner_unit_id.is_empty() || owner_unit_id == unit_id {
            return;
        }
        cache.players.track_pet_ownership(unit_id, owner_unit_id);
        if let Some(enc) = cache.current_encounter_mut() {
            enc.track_pet_ownership(unit_id, owner_unit_id);
        }
    }

    fn handle_player_info(&self, e: &PlayerInfoEntry, cache: &mut SessionCache) -> Dispatch {
        let Some(player) = cache.players.find_player_mut(&e.unit_id) else {
            if self.diagnostic_logging {
                tracing::debug!(line = e.line_number, unit_id = %e.unit_id, "PLAYER_INFO for unknown player");
            }
            return Dispatch::Ignored;
        };
        player.gear = e.gear.clone();
        player.front_bar = e.front_bar.clone();
        player.back_bar = e.back_bar.clone();
        let canonical = player.unit_id.clone();

        if let Some(enc) = cache.current_encounter_mut()
            && enc.is_active()
            && let Some(record) = enc.players.get_mut(&canonical)
        {
            record.gear = e.gear.clone();
            record.front_bar = e.front_bar.clone();
            record.back_bar = e.back_bar.clone();
        }
        Dispatch::Applied
    }

    fn handle_ability_info(&self, e: &AbilityInfoEntry, cache: &mut SessionCache) -> Dispatch {
        cache.abilities.insert(e);
        Dispatch::Applied
    }

    /// Identity and resource bookkeeping for a unit block on any record.
    fn observe_unit(&self, unit: &UnitState, line_number: u64, cache: &mut SessionCache) {
        if let Some((canonical, long_id)) = cache.players.confirm_long_id(&unit.unit_id) {
            if self.diagnostic_logging {
                tracing::debug!(line = line_number, canonical = %canonical, long_id = %long_id, "Linked long unit id");
            }
            if let Some(enc) = cache.current_encounter_mut() {
                enc.associate_alias(&canonical, &long_id);
            }
        }

        if unit.resources.is_empty() {
            return;
        }
        cache.players.update_resources(&unit.unit_id, &unit.resources);
        if let Some(info) = cache.players.unit_mut(&unit.unit_id) {
            info.health_max = info.health_max.max(unit.resources.health_max);
        }
        if let Some(enc) = cache.current_encounter_mut() {
            enc.record_resources(&unit.unit_id, line_number, &unit.resources);
            if let Some(enemy) = enc.enemies.get_mut(&unit.unit_id) {
                enemy.health_max = enemy.health_max.max(unit.resources.health_max);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Casts, combat, effects, regen
    // ═══════════════════════════════════════════════════════════════════════════

    fn handle_begin_cast(&self, e: &BeginCastEntry, cache: &mut SessionCache) -> Dispatch {
        self.observe_unit(&e.source, e.line_number, cache);
        if let Some(target) = &e.target {
            self.observe_unit(target, e.line_number, cache);
        }
        if let Some(enc) = cache.current_encounter_mut() {
            enc.record_cast(&e.source.unit_id, e.ability_id);
        }
        Dispatch::Applied
    }

    fn handle_combat_event(&self, e: &CombatEventEntry, cache: &mut SessionCache) -> Dispatch {
        self.observe_unit(&e.source, e.line_number, cache);
        if let Some(target) = &e.target {
            self.observe_unit(target, e.line_number, cache);
        }

        let is_damage = e.action_result.is_damage();
        let is_heal = e.action_result.is_heal();
        if !is_damage && !is_heal {
            return Dispatch::Applied;
        }

        // Outside an encounter the event is only observed
        let Some(enc) = cache.current_encounter_mut().filter(|enc| enc.is_active()) else {
            return Dispatch::Applied;
        };

        let critical = e.action_result.is_critical();
        let misses_before = enc.attribution_misses;
        if is_damage {
            enc.record_damage(&e.source.unit_id, e.ability_id, e.hit_value, critical);
            // A target block of "*" means the source hit itself
            let target_id = e.target.as_ref().map_or(&e.source.unit_id, |t| &t.unit_id);
            enc.record_damage_taken(target_id, e.hit_value);
        } else {
            enc.record_heal(&e.source.unit_id, e.ability_id, e.hit_value, critical);
        }

        if enc.attribution_misses > misses_before {
            if self.diagnostic_logging {
                tracing::debug!(
                    line = e.line_number,
                    unit_id = %e.source.unit_id,
                    ability_id = e.ability_id,
                    amount = e.hit_value,
                    "Unattributed combat event"
                );
            }
            return Dispatch::AttributionMiss;
        }
        Dispatch::Applied
    }

    fn handle_effect_changed(&self, e: &EffectChangedEntry, cache: &mut SessionCache) -> Dispatch {
        self.observe_unit(&e.source, e.line_number, cache);
        if let Some(target) = &e.target {
            self.observe_unit(target, e.line_number, cache);
        }
        Dispatch::Applied
    }

    fn handle_health_regen(&self, e: &HealthRegenEntry, cache: &mut SessionCache) -> Dispatch {
        let unit = UnitState {
            unit_id: e.unit_id.clone(),
            resources: e.resources,
        };
        self.observe_unit(&unit, e.line_number, cache);
        Dispatch::Applied
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Content progress (diagnostic only)
    // ═══════════════════════════════════════════════════════════════════════════

    fn handle_trial_init(&self, e: &TrialInitEntry, cache: &mut SessionCache) -> Dispatch {
        let trial = cache.content.trial_mut(e.trial_id);
        trial.in_progress = e.in_progress;
        trial.completed = e.completed;
        trial.start_time_ms = e.start_time_ms;
        trial.duration_ms = e.duration_ms;
        trial.success = e.success;
        trial.final_score = e.final_score;
        Dispatch::Applied
    }

    fn handle_endless_begin(&self, e: &EndlessDungeonBeginEntry, cache: &mut SessionCache) -> Dispatch {
        let dungeon = cache.content.endless_dungeon_mut(e.dungeon_id);
        dungeon.start_time_ms = e.start_time_ms;
        dungeon.duration_ms = None;
        dungeon.success = None;
        if self.diagnostic_logging {
            tracing::debug!(dungeon_id = e.dungeon_id, resumed = e.flag, "Endless dungeon started");
        }
        Dispatch::Applied
    }

    fn handle_endless_stage_end(&self, e: &EndlessDungeonStageEndEntry, cache: &mut SessionCache) -> Dispatch {
        let dungeon = cache.content.endless_dungeon_mut(e.dungeon_id);
        dungeon.stages_completed += 1;
        dungeon.last_stage_begin_ms = e.begin_time_ms;
        Dispatch::Applied
    }

    fn handle_endless_buff(&self, e: &EndlessDungeonBuffEntry, cache: &mut SessionCache, added: bool) -> Dispatch {
        let dungeon = cache.content.endless_dungeon_mut(e.dungeon_id);
        if added {
            dungeon.active_buffs.insert(e.ability_id);
        } else {
            dungeon.active_buffs.remove(&e.ability_id);
        }
        Dispatch::Applied
    }

    fn handle_endless_end(&self, e: &EndlessDungeonEndEntry, cache: &mut SessionCache) -> Dispatch {
        let dungeon = cache.content.endless_dungeon_mut(e.dungeon_id);
        dungeon.duration_ms = Some(e.duration_ms);
        dungeon.success = e.success;
        if self.diagnostic_logging {
            tracing::debug!(
                dungeon_id = e.dungeon_id,
                stages = dungeon.stages_completed,
                duration_ms = e.duration_ms,
                "Endless dungeon finished"
            );
        }
        Dispatch::Applied
    }
}
