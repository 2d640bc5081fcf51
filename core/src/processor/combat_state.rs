//! Encounter lifecycle.
//!
//! - Idle: no current encounter; registry updates still flow
//! - Active: the current encounter accepts attribution
//!
//! BEGIN_COMBAT opens (force-closing any open encounter), END_COMBAT closes.
//! BEGIN_LOG / END_LOG also close, since a log session never spans them.

use crate::combat_log::LogEvent;
use crate::state::SessionCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatTransition {
    Opened {
        encounter_id: u64,
        /// Encounter closed because combat began again without END_COMBAT
        force_closed: Option<u64>,
    },
    Closed {
        encounter_id: u64,
    },
}

/// Advance the state machine for lifecycle events. Other events return None.
pub fn advance_combat_state(event: &LogEvent, cache: &mut SessionCache) -> Option<CombatTransition> {
    let line = event.line_number();
    match event {
        LogEvent::BeginCombat(_) => {
            let force_closed = cache.close_current_encounter(line);
            if let Some(previous) = force_closed {
                tracing::warn!(line, encounter_id = previous, "BEGIN_COMBAT while in combat, closing previous encounter");
            }
            let encounter_id = cache.open_encounter(line);
            tracing::info!(line, encounter_id, "Combat started");
            Some(CombatTransition::Opened {
                encounter_id,
                force_closed,
            })
        }
        LogEvent::EndCombat(_) | LogEvent::BeginLog(_) | LogEvent::EndLog(_) => {
            // Closing while idle is a no-op
            let encounter_id = cache.close_current_encounter(line)?;
            tracing::info!(line, encounter_id, event_type = event.event_type(), "Combat ended");
            Some(CombatTransition::Closed { encounter_id })
        }
        _ => None,
    }
}
