use std::collections::VecDeque;

use crate::encounter::summary::{EncounterHistory, create_summary};
use crate::encounter::{CombatEncounter, EncounterState};
use crate::state::info::{ContentProgress, LogInfo, ZoneInfo};
use crate::state::registry::{AbilityCache, EffectCache, PlayerRegistry};

pub const DEFAULT_RETAINED_ENCOUNTERS: usize = 16;

/// Pure storage for session state.
/// Routing logic lives in EventProcessor.
#[derive(Debug, Clone)]
pub struct SessionCache {
    pub log_info: LogInfo,
    pub zone: ZoneInfo,

    // Session-wide registries
    pub players: PlayerRegistry,
    pub abilities: AbilityCache,
    pub effects: EffectCache,
    pub content: ContentProgress,

    // Encounter tracking
    current: Option<CombatEncounter>,
    /// Closed encounters, oldest first, capped at `retained`
    closed: VecDeque<CombatEncounter>,
    retained: usize,
    next_encounter_id: u64,

    // Summaries of every closed encounter in this log
    pub encounter_history: EncounterHistory,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(DEFAULT_RETAINED_ENCOUNTERS)
    }
}

impl SessionCache {
    pub fn new(retained: usize) -> Self {
        let retained = retained.max(1);
        Self {
            log_info: LogInfo::default(),
            zone: ZoneInfo::default(),
            players: PlayerRegistry::new(),
            abilities: AbilityCache::default(),
            effects: EffectCache::default(),
            content: ContentProgress::default(),
            current: None,
            closed: VecDeque::with_capacity(retained),
            retained,
            next_encounter_id: 0,
            encounter_history: EncounterHistory::new(),
        }
    }

    // --- Encounter Management ---

    /// Open a new encounter, force-closing any active one first.
    /// The roster is seeded from the session registry so units, aliases and
    /// pet edges announced before the fight resolve inside it.
    pub fn open_encounter(&mut self, line_number: u64) -> u64 {
        self.close_current_encounter(line_number);

        let id = self.next_encounter_id;
        self.next_encounter_id += 1;

        let mut encounter = CombatEncounter::new(id, line_number);
        if self.zone.has_zone() {
            encounter.zone_name = Some(self.zone.zone_name.clone());
        }
        if !self.zone.map_name.is_empty() {
            encounter.map_name = Some(self.zone.map_name.clone());
        }
        for player in self.players.players() {
            encounter.add_player(player.clone());
        }
        for unit in self.players.units() {
            encounter.add_enemy(unit.clone());
        }
        for (pet, owner) in self.players.pet_edges() {
            encounter.track_pet_ownership(pet, owner);
        }

        self.current = Some(encounter);
        id
    }

    /// Close the active encounter, summarize it and move it to the closed window.
    /// Returns the id of the encounter closed, or None when idle.
    pub fn close_current_encounter(&mut self, line_number: u64) -> Option<u64> {
        let mut encounter = self.current.take()?;
        encounter.close(line_number);

        let summary = create_summary(&encounter, &self.zone, &mut self.encounter_history);
        self.encounter_history.add(summary);

        let id = encounter.id;
        self.closed.push_back(encounter);
        self.trim_old_encounters();
        Some(id)
    }

    fn trim_old_encounters(&mut self) {
        while self.closed.len() > self.retained {
            self.closed.pop_front();
        }
    }

    // --- Accessors ---

    pub fn is_in_combat(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|e| e.state == EncounterState::Active)
    }

    pub fn current_encounter(&self) -> Option<&CombatEncounter> {
        self.current.as_ref()
    }

    pub fn current_encounter_mut(&mut self) -> Option<&mut CombatEncounter> {
        self.current.as_mut()
    }

    /// Retained closed encounters, oldest first.
    pub fn encounters(&self) -> impl Iterator<Item = &CombatEncounter> {
        self.closed.iter()
    }

    pub fn encounter_by_id(&self, id: u64) -> Option<&CombatEncounter> {
        self.closed
            .iter()
            .find(|e| e.id == id)
            .or_else(|| self.current.as_ref().filter(|e| e.id == id))
    }

    pub fn last_closed_encounter(&self) -> Option<&CombatEncounter> {
        self.closed.back()
    }

    pub fn encounter_count(&self) -> usize {
        self.closed.len()
    }

    pub fn retained(&self) -> usize {
        self.retained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::entity_info::PlayerInfo;

    #[test]
    fn begin_while_active_force_closes() {
        let mut cache = SessionCache::default();
        let first = cache.open_encounter(100);
        let second = cache.open_encounter(200);

        assert_ne!(first, second);
        assert_eq!(cache.encounter_count(), 1);
        let closed = cache.last_closed_encounter().unwrap();
        assert_eq!(closed.id, first);
        assert_eq!(closed.end_line, Some(200));
        assert!(cache.current_encounter().unwrap().is_active());
    }

    #[test]
    fn close_while_idle_is_noop() {
        let mut cache = SessionCache::default();
        assert_eq!(cache.close_current_encounter(10), None);
        assert_eq!(cache.encounter_history.summaries().len(), 0);
    }

    #[test]
    fn closed_window_is_capped() {
        let mut cache = SessionCache::new(2);
        for line in 0..5 {
            cache.open_encounter(line * 10);
            cache.close_current_encounter(line * 10 + 5);
        }
        assert_eq!(cache.encounter_count(), 2);
        assert_eq!(cache.encounters().next().unwrap().id, 3);
        assert_eq!(cache.encounter_history.summaries().len(), 5);
    }

    #[test]
    fn new_encounter_is_seeded_from_registry() {
        let mut cache = SessionCache::default();
        cache.players.register_player(PlayerInfo::new("1"));
        cache.players.associate_long_id("1", "4021667");
        cache.players.track_pet_ownership("pet_123", "4021667");

        cache.open_encounter(0);
        let encounter = cache.current_encounter_mut().unwrap();
        assert!(encounter.add_damage_to_player("pet_123", 500));
        assert_eq!(encounter.player_damage.get("1"), Some(&500));
    }
}
