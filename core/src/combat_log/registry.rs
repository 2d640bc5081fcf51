//! Event-type token → decoder table.

use phf::phf_map;

use super::decoders::{self, FieldCursor};
use super::lexer::RawLine;
use super::{DecodeError, LineError, LogEvent};

type DecodeFn = fn(&mut FieldCursor<'_, '_>) -> Result<LogEvent, DecodeError>;

/// A registered decoder for one event type.
pub struct Decoder {
    pub event_type: &'static str,
    /// Minimum payload fields (after `seq_no, type`).
    pub min_fields: usize,
    decode_fn: DecodeFn,
}

impl Decoder {
    pub fn decode(&self, raw: &RawLine<'_>) -> Result<LogEvent, DecodeError> {
        if raw.fields.len() < self.min_fields {
            return Err(DecodeError::TooFewFields {
                line_number: raw.line_number,
                event_type: self.event_type,
                expected: self.min_fields,
                found: raw.fields.len(),
            });
        }
        let mut cursor = FieldCursor::new(raw.line_number, self.event_type, &raw.fields);
        (self.decode_fn)(&mut cursor)
    }
}

macro_rules! decoder {
    ($token:literal, $min:expr, $f:path) => {
        Decoder {
            event_type: $token,
            min_fields: $min,
            decode_fn: $f,
        }
    };
}

static DECODERS: phf::Map<&'static str, Decoder> = phf_map! {
    "BEGIN_LOG" => decoder!("BEGIN_LOG", 5, decoders::begin_log),
    "END_LOG" => decoder!("END_LOG", 0, decoders::end_log),
    "BEGIN_COMBAT" => decoder!("BEGIN_COMBAT", 0, decoders::begin_combat),
    "END_COMBAT" => decoder!("END_COMBAT", 0, decoders::end_combat),
    "ZONE_CHANGED" => decoder!("ZONE_CHANGED", 3, decoders::zone_changed),
    "MAP_CHANGED" => decoder!("MAP_CHANGED", 3, decoders::map_changed),
    "UNIT_ADDED" => decoder!("UNIT_ADDED", 16, decoders::unit_added),
    "UNIT_CHANGED" => decoder!("UNIT_CHANGED", 11, decoders::unit_changed),
    "UNIT_REMOVED" => decoder!("UNIT_REMOVED", 1, decoders::unit_removed),
    "PLAYER_INFO" => decoder!("PLAYER_INFO", 6, decoders::player_info),
    "ABILITY_INFO" => decoder!("ABILITY_INFO", 5, decoders::ability_info),
    "EFFECT_INFO" => decoder!("EFFECT_INFO", 4, decoders::effect_info),
    "BEGIN_CAST" => decoder!("BEGIN_CAST", 5, decoders::begin_cast),
    "END_CAST" => decoder!("END_CAST", 3, decoders::end_cast),
    "COMBAT_EVENT" => decoder!("COMBAT_EVENT", 8, decoders::combat_event),
    "EFFECT_CHANGED" => decoder!("EFFECT_CHANGED", 5, decoders::effect_changed),
    "HEALTH_REGEN" => decoder!("HEALTH_REGEN", 11, decoders::health_regen),
    "TRIAL_INIT" => decoder!("TRIAL_INIT", 7, decoders::trial_init),
    "BEGIN_TRIAL" => decoder!("BEGIN_TRIAL", 2, decoders::begin_trial),
    "END_TRIAL" => decoder!("END_TRIAL", 5, decoders::end_trial),
    "ENDLESS_DUNGEON_BEGIN" => decoder!("ENDLESS_DUNGEON_BEGIN", 3, decoders::endless_dungeon_begin),
    "ENDLESS_DUNGEON_STAGE_END" => decoder!("ENDLESS_DUNGEON_STAGE_END", 2, decoders::endless_dungeon_stage_end),
    "ENDLESS_DUNGEON_BUFF_ADDED" => decoder!("ENDLESS_DUNGEON_BUFF_ADDED", 2, decoders::endless_dungeon_buff_added),
    "ENDLESS_DUNGEON_BUFF_REMOVED" => decoder!("ENDLESS_DUNGEON_BUFF_REMOVED", 2, decoders::endless_dungeon_buff_removed),
    "ENDLESS_DUNGEON_END" => decoder!("ENDLESS_DUNGEON_END", 2, decoders::endless_dungeon_end),
};

/// Look up the decoder registered for an event-type token.
pub fn lookup_decoder(event_type: &str) -> Option<&'static Decoder> {
    DECODERS.get(event_type)
}

pub fn is_registered(event_type: &str) -> bool {
    DECODERS.contains_key(event_type)
}

pub fn registered_event_types() -> impl Iterator<Item = &'static str> {
    DECODERS.keys().copied()
}

/// Decode an already-lexed line through its registered decoder.
pub fn decode_line(raw: &RawLine<'_>) -> Result<LogEvent, LineError> {
    let decoder = lookup_decoder(raw.event_type).ok_or_else(|| LineError::UnknownEventType {
        line_number: raw.line_number,
        token: raw.event_type.to_string(),
    })?;
    Ok(decoder.decode(raw)?)
}
