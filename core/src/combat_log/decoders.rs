//! Typed decoders, one per registered event type.
//!
//! Each decoder walks the payload with a [`FieldCursor`] and either returns a
//! fully populated [`LogEvent`] or fails the whole record.

use std::borrow::Cow;
use std::str::FromStr;

use super::lexer::split_list;
use super::log_event::*;
use super::snapshot::decode_snapshot;
use super::DecodeError;

/// Sequential reader over the payload fields of one record.
pub struct FieldCursor<'r, 'a> {
    fields: &'r [Cow<'a, str>],
    pos: usize,
    line_number: u64,
    event_type: &'static str,
}

impl<'r, 'a> FieldCursor<'r, 'a> {
    pub fn new(line_number: u64, event_type: &'static str, fields: &'r [Cow<'a, str>]) -> Self {
        Self {
            fields,
            pos: 0,
            line_number,
            event_type,
        }
    }

    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn remaining(&self) -> usize {
        self.fields.len().saturating_sub(self.pos)
    }

    fn invalid(&self, index: usize, name: &'static str, value: &str) -> DecodeError {
        DecodeError::InvalidField {
            line_number: self.line_number,
            event_type: self.event_type,
            index,
            name,
            value: value.to_string(),
        }
    }

    fn peek(&self) -> Option<&'r str> {
        self.fields.get(self.pos).map(|f| f.as_ref())
    }

    fn next_raw(&mut self) -> Result<&'r str, DecodeError> {
        let value = self.peek().ok_or(DecodeError::TooFewFields {
            line_number: self.line_number,
            event_type: self.event_type,
            expected: self.pos + 1,
            found: self.fields.len(),
        })?;
        self.pos += 1;
        Ok(value)
    }

    pub fn string(&mut self) -> Result<String, DecodeError> {
        self.next_raw().map(str::to_string)
    }

    pub fn parse<T: FromStr>(&mut self, name: &'static str) -> Result<T, DecodeError> {
        let index = self.pos;
        let raw = self.next_raw()?;
        raw.parse::<T>().map_err(|_| self.invalid(index, name, raw))
    }

    /// A numeric id kept in its textual form, e.g. a long unit id.
    pub fn numeric_id(&mut self, name: &'static str) -> Result<String, DecodeError> {
        let index = self.pos;
        let raw = self.next_raw()?;
        if raw.parse::<u64>().is_err() {
            return Err(self.invalid(index, name, raw));
        }
        Ok(raw.to_string())
    }

    /// Strict `T`/`F` boolean.
    pub fn flag(&mut self, name: &'static str) -> Result<bool, DecodeError> {
        let index = self.pos;
        match self.next_raw()? {
            "T" => Ok(true),
            "F" => Ok(false),
            other => Err(self.invalid(index, name, other)),
        }
    }

    /// Trailing optional field. Absent, empty and `*` all read as `None`.
    pub fn optional<T: FromStr>(&mut self, name: &'static str) -> Result<Option<T>, DecodeError> {
        match self.peek() {
            None => Ok(None),
            Some("") | Some("*") => {
                self.pos += 1;
                Ok(None)
            }
            Some(_) => self.parse(name).map(Some),
        }
    }

    pub fn optional_flag(&mut self, name: &'static str) -> Result<Option<bool>, DecodeError> {
        match self.peek() {
            None => Ok(None),
            Some("") | Some("*") => {
                self.pos += 1;
                Ok(None)
            }
            Some(_) => self.flag(name).map(Some),
        }
    }

    /// A bracket group of scalar items.
    pub fn list<T: FromStr>(&mut self, name: &'static str) -> Result<Vec<T>, DecodeError> {
        let index = self.pos;
        let raw = self.next_raw()?;
        let items = split_list(raw).ok_or_else(|| self.invalid(index, name, raw))?;
        items
            .into_iter()
            .map(|item| item.parse::<T>().map_err(|_| self.invalid(index, name, raw)))
            .collect()
    }

    /// `unit_id` followed by its resource snapshot.
    pub fn unit_state(&mut self, name: &'static str) -> Result<UnitState, DecodeError> {
        let index = self.pos;
        let unit_id = self.next_raw()?;
        if unit_id.is_empty() {
            return Err(self.invalid(index, name, unit_id));
        }
        let rest = &self.fields[self.pos..];
        let (resources, consumed) = decode_snapshot(rest).map_err(|(offset, field)| {
            let at = self.pos + offset;
            self.invalid(at, field, self.fields[at].as_ref())
        })?;
        self.pos += consumed;
        Ok(UnitState {
            unit_id: unit_id.to_string(),
            resources,
        })
    }

    /// Target block: `*` (or nothing left) means no separate target.
    pub fn target_state(&mut self) -> Result<Option<UnitState>, DecodeError> {
        match self.peek() {
            None => Ok(None),
            Some("*") => {
                self.pos += 1;
                Ok(None)
            }
            Some(_) => self.unit_state("target_unit_id").map(Some),
        }
    }
}

type DecodeResult = Result<LogEvent, DecodeError>;

fn marker(c: &FieldCursor<'_, '_>) -> MarkerEntry {
    MarkerEntry {
        line_number: c.line_number(),
    }
}

pub fn begin_log(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::BeginLog(BeginLogEntry {
        line_number: c.line_number(),
        time_ms: c.parse("time_ms")?,
        log_version: c.parse("log_version")?,
        server: c.string()?,
        language: c.string()?,
        game_version: c.string()?,
    }))
}

pub fn end_log(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::EndLog(marker(c)))
}

pub fn begin_combat(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::BeginCombat(marker(c)))
}

pub fn end_combat(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::EndCombat(marker(c)))
}

pub fn zone_changed(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::ZoneChanged(ZoneChangedEntry {
        line_number: c.line_number(),
        zone_id: c.parse("zone_id")?,
        name: c.string()?,
        difficulty: c.string()?,
    }))
}

pub fn map_changed(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::MapChanged(MapChangedEntry {
        line_number: c.line_number(),
        map_id: c.parse("map_id")?,
        name: c.string()?,
        texture: c.string()?,
    }))
}

pub fn unit_added(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::UnitAdded(UnitAddedEntry {
        line_number: c.line_number(),
        unit_id: c.string()?,
        unit_type: UnitType::from_token(&c.string()?),
        is_local_player: c.flag("is_local_player")?,
        player_per_session_id: c.parse("player_per_session_id")?,
        monster_id: c.parse("monster_id")?,
        is_boss: c.flag("is_boss")?,
        class_id: c.parse("class_id")?,
        race_id: c.parse("race_id")?,
        name: c.string()?,
        handle: c.string()?,
        long_id: c.numeric_id("long_id")?,
        level: c.parse("level")?,
        champion_points: c.parse("champion_points")?,
        owner_unit_id: c.numeric_id("owner_unit_id")?,
        reaction: c.string()?,
        is_grouped: c.flag("is_grouped")?,
    }))
}

pub fn unit_changed(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::UnitChanged(UnitChangedEntry {
        line_number: c.line_number(),
        unit_id: c.string()?,
        class_id: c.parse("class_id")?,
        race_id: c.parse("race_id")?,
        name: c.string()?,
        handle: c.string()?,
        long_id: c.numeric_id("long_id")?,
        level: c.parse("level")?,
        champion_points: c.parse("champion_points")?,
        owner_unit_id: c.numeric_id("owner_unit_id")?,
        reaction: c.string()?,
        is_grouped: c.flag("is_grouped")?,
    }))
}

pub fn unit_removed(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::UnitRemoved(UnitRemovedEntry {
        line_number: c.line_number(),
        unit_id: c.string()?,
    }))
}

pub fn player_info(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    let line_number = c.line_number();
    let unit_id = c.string()?;
    let effect_ids = c.list("effect_ids")?;
    let effect_stacks = c.list("effect_stacks")?;
    let gear = gear_list(c)?;
    let front_bar = c.list("front_bar")?;
    let back_bar = c.list("back_bar")?;
    Ok(LogEvent::PlayerInfo(PlayerInfoEntry {
        line_number,
        unit_id,
        effect_ids,
        effect_stacks,
        gear,
        front_bar,
        back_bar,
    }))
}

const GEAR_PIECE_MIN_FIELDS: usize = 7;

/// `[[slot,item_id,is_cp,level,trait,quality,set_id,...],...]`
fn gear_list(c: &mut FieldCursor<'_, '_>) -> Result<Vec<GearPiece>, DecodeError> {
    let index = c.pos;
    let raw = c.next_raw()?;
    let c = &*c;
    let bad = || c.invalid(index, "gear", raw);

    let pieces = split_list(raw).ok_or_else(|| bad())?;
    let mut gear = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let parts = split_list(piece).ok_or_else(|| bad())?;
        if parts.len() < GEAR_PIECE_MIN_FIELDS {
            return Err(bad());
        }
        let is_champion = match parts[2] {
            "T" => true,
            "F" => false,
            _ => return Err(bad()),
        };
        gear.push(GearPiece {
            slot: parts[0].to_string(),
            item_id: parts[1].parse().map_err(|_| bad())?,
            is_champion,
            level: parts[3].parse().map_err(|_| bad())?,
            trait_name: parts[4].to_string(),
            quality: parts[5].to_string(),
            set_id: parts[6].parse().map_err(|_| bad())?,
        });
    }
    Ok(gear)
}

pub fn ability_info(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::AbilityInfo(AbilityInfoEntry {
        line_number: c.line_number(),
        ability_id: c.parse("ability_id")?,
        name: c.string()?,
        icon_path: c.string()?,
        is_player_ability: c.flag("is_player_ability")?,
        is_active: c.flag("is_active")?,
    }))
}

pub fn effect_info(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::EffectInfo(EffectInfoEntry {
        line_number: c.line_number(),
        ability_id: c.parse("ability_id")?,
        effect_type: c.string()?,
        status_effect_type: c.string()?,
        bar_display: c.string()?,
        synergy_ability_id: c.optional("synergy_ability_id")?,
    }))
}

pub fn begin_cast(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::BeginCast(BeginCastEntry {
        line_number: c.line_number(),
        duration_ms: c.parse("duration_ms")?,
        channeled: c.flag("channeled")?,
        cast_track_id: c.parse("cast_track_id")?,
        ability_id: c.parse("ability_id")?,
        source: c.unit_state("source_unit_id")?,
        target: c.target_state()?,
    }))
}

pub fn end_cast(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::EndCast(EndCastEntry {
        line_number: c.line_number(),
        result: CastResult::from_token(&c.string()?),
        cast_track_id: c.parse("cast_track_id")?,
        ability_id: c.parse("ability_id")?,
        interrupting_ability_id: c.optional("interrupting_ability_id")?,
        interrupting_unit_id: c.optional("interrupting_unit_id")?,
    }))
}

pub fn combat_event(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::CombatEvent(CombatEventEntry {
        line_number: c.line_number(),
        action_result: ActionResult::from_token(&c.string()?),
        damage_type: c.string()?,
        power_type: c.parse("power_type")?,
        hit_value: c.parse("hit_value")?,
        overflow: c.parse("overflow")?,
        cast_track_id: c.parse("cast_track_id")?,
        ability_id: c.parse("ability_id")?,
        source: c.unit_state("source_unit_id")?,
        target: c.target_state()?,
    }))
}

pub fn effect_changed(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::EffectChanged(EffectChangedEntry {
        line_number: c.line_number(),
        change_type: EffectChangeType::from_token(&c.string()?),
        stack_count: c.parse("stack_count")?,
        cast_track_id: c.parse("cast_track_id")?,
        ability_id: c.parse("ability_id")?,
        source: c.unit_state("source_unit_id")?,
        target: c.target_state()?,
        player_initiated_remove_cast_track_id: c
            .optional("player_initiated_remove_cast_track_id")?,
    }))
}

pub fn health_regen(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    let line_number = c.line_number();
    let effective_regen = c.parse("effective_regen")?;
    let UnitState { unit_id, resources } = c.unit_state("unit_id")?;
    Ok(LogEvent::HealthRegen(HealthRegenEntry {
        line_number,
        effective_regen,
        unit_id,
        resources,
    }))
}

pub fn trial_init(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::TrialInit(TrialInitEntry {
        line_number: c.line_number(),
        trial_id: c.parse("trial_id")?,
        in_progress: c.flag("in_progress")?,
        completed: c.flag("completed")?,
        start_time_ms: c.parse("start_time_ms")?,
        duration_ms: c.parse("duration_ms")?,
        success: c.flag("success")?,
        final_score: c.parse("final_score")?,
    }))
}

pub fn begin_trial(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::BeginTrial(BeginTrialEntry {
        line_number: c.line_number(),
        trial_id: c.parse("trial_id")?,
        start_time_ms: c.parse("start_time_ms")?,
    }))
}

pub fn end_trial(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::EndTrial(EndTrialEntry {
        line_number: c.line_number(),
        trial_id: c.parse("trial_id")?,
        duration_ms: c.parse("duration_ms")?,
        success: c.flag("success")?,
        final_score: c.parse("final_score")?,
        vitality_bonus: c.parse("vitality_bonus")?,
    }))
}

pub fn endless_dungeon_begin(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::EndlessDungeonBegin(EndlessDungeonBeginEntry {
        line_number: c.line_number(),
        dungeon_id: c.parse("dungeon_id")?,
        start_time_ms: c.parse("start_time_ms")?,
        flag: c.flag("flag")?,
    }))
}

pub fn endless_dungeon_stage_end(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::EndlessDungeonStageEnd(EndlessDungeonStageEndEntry {
        line_number: c.line_number(),
        dungeon_id: c.parse("dungeon_id")?,
        begin_time_ms: c.parse("begin_time_ms")?,
    }))
}

fn endless_dungeon_buff(c: &mut FieldCursor<'_, '_>) -> Result<EndlessDungeonBuffEntry, DecodeError> {
    Ok(EndlessDungeonBuffEntry {
        line_number: c.line_number(),
        dungeon_id: c.parse("dungeon_id")?,
        ability_id: c.parse("ability_id")?,
    })
}

pub fn endless_dungeon_buff_added(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    endless_dungeon_buff(c).map(LogEvent::EndlessDungeonBuffAdded)
}

pub fn endless_dungeon_buff_removed(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    endless_dungeon_buff(c).map(LogEvent::EndlessDungeonBuffRemoved)
}

pub fn endless_dungeon_end(c: &mut FieldCursor<'_, '_>) -> DecodeResult {
    Ok(LogEvent::EndlessDungeonEnd(EndlessDungeonEndEntry {
        line_number: c.line_number(),
        dungeon_id: c.parse("dungeon_id")?,
        duration_ms: c.parse("duration_ms")?,
        success: c.optional_flag("success")?,
    }))
}
