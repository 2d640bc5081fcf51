pub mod entity_info;
pub mod identity;
pub mod metrics;
pub mod report;
pub mod summary;

use crate::combat_log::ResourceSnapshot;
use entity_info::{PlayerInfo, UnitInfo};
use hashbrown::{HashMap, HashSet};
use identity::{IdentityResolver, Resolution};
use metrics::MetricAccumulator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncounterState {
    #[default]
    Active,
    /// Frozen at END_COMBAT (or a forced close); rejects mutation.
    Closed,
}

/// One resource reading for progression charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSample {
    pub line_number: u64,
    pub health: i64,
    pub magicka: i64,
    pub stamina: i64,
}

/// One BEGIN_COMBAT .. END_COMBAT window.
///
/// Keys of `player_damage` / `player_healing` are always canonical ids of
/// entries in `players`; amounts from ids that resolve to nobody are dropped.
#[derive(Debug, Clone)]
pub struct CombatEncounter {
    pub id: u64,
    pub state: EncounterState,
    pub begin_line: u64,
    pub end_line: Option<u64>,
    pub zone_name: Option<String>,
    pub map_name: Option<String>,

    pub players: HashMap<String, PlayerInfo>,
    pub enemies: HashMap<String, UnitInfo>,
    identities: IdentityResolver,

    pub player_damage: HashMap<String, i64>,
    pub player_healing: HashMap<String, i64>,
    pub total_damage: i64,
    pub total_healing: i64,

    pub accumulated_data: HashMap<String, MetricAccumulator>,
    pub abilities_cast: HashMap<String, HashSet<i64>>,
    pub resource_samples: HashMap<String, Vec<ResourceSample>>,
    pub attribution_misses: u64,
}

impl CombatEncounter {
    pub fn new(id: u64, begin_line: u64) -> Self {
        Self {
            id,
            state: EncounterState::Active,
            begin_line,
            end_line: None,
            zone_name: None,
            map_name: None,
            players: HashMap::new(),
            enemies: HashMap::new(),
            identities: IdentityResolver::new(),
            player_damage: HashMap::new(),
            player_healing: HashMap::new(),
            total_damage: 0,
            total_healing: 0,
            accumulated_data: HashMap::new(),
            abilities_cast: HashMap::new(),
            resource_samples: HashMap::new(),
            attribution_misses: 0,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == EncounterState::Active
    }

    // --- Roster ---

    /// Add (or refresh) a player together with all of its known aliases.
    pub fn add_player(&mut self, player: PlayerInfo) -> bool {
        if !self.is_active() {
            return false;
        }
        self.identities.register(&player.unit_id);
        for alias in player.aliases() {
            self.identities.associate(&player.unit_id, alias);
        }
        self.players.insert(player.unit_id.clone(), player);
        true
    }

    pub fn add_enemy(&mut self, unit: UnitInfo) -> bool {
        if !self.is_active() {
            return false;
        }
        self.enemies.insert(unit.unit_id.clone(), unit);
        true
    }

    /// Mirror a long/short id association learned by the session registry.
    pub fn associate_alias(&mut self, canonical: &str, alias: &str) -> bool {
        if !self.is_active() || !self.identities.associate(canonical, alias) {
            return false;
        }
        if let Some(player) = self.players.get_mut(canonical) {
            player.add_alias(alias);
        }
        true
    }

    pub fn track_pet_ownership(&mut self, pet: &str, owner: &str) -> bool {
        if !self.is_active() {
            return false;
        }
        self.identities.track_pet_ownership(pet, owner);
        true
    }

    pub fn pet_owner(&self) -> &HashMap<String, String> {
        self.identities.pet_owner()
    }

    /// Canonical id of the player to credit for `unit_id`, if any.
    pub fn resolve(&self, unit_id: &str) -> Option<&str> {
        self.identities.resolve(unit_id).player()
    }

    pub fn resolution(&self, unit_id: &str) -> Resolution<'_> {
        self.identities.resolve(unit_id)
    }

    /// UNIT_REMOVED: forget the hostile unit and any pet edge it keyed.
    pub fn remove_unit(&mut self, unit_id: &str) -> bool {
        if !self.is_active() {
            return false;
        }
        let enemy = self.enemies.remove(unit_id).is_some();
        let pet = self.identities.remove_pet(unit_id).is_some();
        enemy || pet
    }

    /// A player's short id left the zone or now names another unit.
    /// Damage already credited stays; later records using the id no longer
    /// resolve to that player.
    pub fn retire_player(&mut self, unit_id: &str) -> bool {
        if !self.is_active() {
            return false;
        }
        self.identities.retire(unit_id) > 0
    }

    // --- Attribution ---

    fn credit(&mut self, unit_id: &str) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        match self.resolve(unit_id) {
            Some(player) => Some(player.to_string()),
            None => {
                if !self.enemies.contains_key(unit_id) {
                    self.attribution_misses += 1;
                }
                None
            }
        }
    }

    /// Credit `amount` of damage to whichever player `unit_id` resolves to.
    /// Returns false (and changes nothing) if it resolves to no player.
    pub fn add_damage_to_player(&mut self, unit_id: &str, amount: i64) -> bool {
        let Some(player) = self.credit(unit_id) else {
            return false;
        };
        let total = self.player_damage.entry(player).or_insert(0);
        *total = total.saturating_add(amount);
        self.total_damage = self.total_damage.saturating_add(amount);
        true
    }

    pub fn add_healing_to_player(&mut self, unit_id: &str, amount: i64) -> bool {
        let Some(player) = self.credit(unit_id) else {
            return false;
        };
        let total = self.player_healing.entry(player).or_insert(0);
        *total = total.saturating_add(amount);
        self.total_healing = self.total_healing.saturating_add(amount);
        true
    }

    /// Damage plus per-ability breakdown for one hit.
    pub fn record_damage(&mut self, unit_id: &str, ability_id: i64, amount: i64, critical: bool) -> bool {
        if !self.add_damage_to_player(unit_id, amount) {
            return false;
        }
        if let Some(player) = self.resolve(unit_id).map(str::to_string) {
            self.accumulated_data
                .entry(player)
                .or_default()
                .record_damage(ability_id, amount, critical);
        }
        true
    }

    pub fn record_heal(&mut self, unit_id: &str, ability_id: i64, amount: i64, critical: bool) -> bool {
        if !self.add_healing_to_player(unit_id, amount) {
            return false;
        }
        if let Some(player) = self.resolve(unit_id).map(str::to_string) {
            self.accumulated_data
                .entry(player)
                .or_default()
                .record_heal(ability_id, amount, critical);
        }
        true
    }

    /// Damage landing on a player (any source).
    pub fn record_damage_taken(&mut self, unit_id: &str, amount: i64) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(player) = self.identities.canonical(unit_id).map(str::to_string) else {
            return false;
        };
        let metrics = self.accumulated_data.entry(player).or_default();
        metrics.damage_received = metrics.damage_received.saturating_add(amount);
        true
    }

    /// A cast by a player (pets cast their own abilities and are not counted).
    pub fn record_cast(&mut self, unit_id: &str, ability_id: i64) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(player) = self.identities.canonical(unit_id).map(str::to_string) else {
            return false;
        };
        self.accumulated_data.entry(player.clone()).or_default().casts += 1;
        self.abilities_cast.entry(player).or_default().insert(ability_id);
        true
    }

    pub fn record_resources(&mut self, unit_id: &str, line_number: u64, snapshot: &ResourceSnapshot) -> bool {
        if !self.is_active() || snapshot.is_empty() {
            return false;
        }
        let Some(player) = self.identities.canonical(unit_id).map(str::to_string) else {
            return false;
        };
        if let Some(info) = self.players.get_mut(&player) {
            info.update_resources(snapshot);
        }
        self.resource_samples
            .entry(player)
            .or_default()
            .push(ResourceSample {
                line_number,
                health: snapshot.health_current,
                magicka: snapshot.magicka_current,
                stamina: snapshot.stamina_current,
            });
        true
    }

    // --- Lifecycle ---

    pub fn close(&mut self, end_line: u64) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = EncounterState::Closed;
        self.end_line = Some(end_line.max(self.begin_line));
        true
    }

    /// Milliseconds between BEGIN_COMBAT and END_COMBAT (zero while open).
    pub fn duration_ms(&self) -> u64 {
        self.end_line
            .map(|end| end.saturating_sub(self.begin_line))
            .unwrap_or(0)
    }

    pub fn damage_for(&self, unit_id: &str) -> i64 {
        self.resolve(unit_id)
            .and_then(|player| self.player_damage.get(player))
            .copied()
            .unwrap_or(0)
    }

    pub fn healing_for(&self, unit_id: &str) -> i64 {
        self.resolve(unit_id)
            .and_then(|player| self.player_healing.get(player))
            .copied()
            .unwrap_or(0)
    }

    /// Players that dealt damage, healed or cast something.
    pub fn participants(&self) -> impl Iterator<Item = &PlayerInfo> {
        self.players.values().filter(move |p| {
            self.player_damage.contains_key(&p.unit_id)
                || self.player_healing.contains_key(&p.unit_id)
                || self.abilities_cast.contains_key(&p.unit_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encounter_with_player(unit_id: &str) -> CombatEncounter {
        let mut enc = CombatEncounter::new(1, 1000);
        enc.add_player(PlayerInfo::new(unit_id));
        enc
    }

    #[test]
    fn damage_from_pet_is_credited_to_owner() {
        let mut enc = encounter_with_player("1");
        assert!(enc.track_pet_ownership("pet_123", "1"));
        assert!(enc.add_damage_to_player("pet_123", 500));
        assert_eq!(enc.player_damage.get("1"), Some(&500));
        assert!(!enc.player_damage.contains_key("pet_123"));
        assert_eq!(enc.total_damage, 500);
    }

    #[test]
    fn retired_player_keeps_credit_but_stops_resolving() {
        let mut enc = encounter_with_player("5");
        assert!(enc.add_damage_to_player("5", 300));
        assert!(enc.retire_player("5"));
        assert!(!enc.add_damage_to_player("5", 1000));
        assert_eq!(enc.player_damage.get("5"), Some(&300));
        assert_eq!(enc.total_damage, 300);
        assert!(enc.players.contains_key("5"));
        assert!(!enc.retire_player("5"));
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        let mut enc = encounter_with_player("1");
        assert!(enc.record_damage("1", 23234, i64::MAX, false));
        assert!(enc.record_damage("1", 23234, 5, true));
        assert!(enc.record_heal("1", 40, i64::MAX, false));
        assert!(enc.record_heal("1", 40, 5, false));
        assert!(enc.record_damage_taken("1", i64::MAX));
        assert!(enc.record_damage_taken("1", 5));

        assert_eq!(enc.total_damage, i64::MAX);
        assert_eq!(enc.player_damage.get("1"), Some(&i64::MAX));
        assert_eq!(enc.total_healing, i64::MAX);
        let metrics = &enc.accumulated_data["1"];
        assert_eq!(metrics.damage_dealt, i64::MAX);
        assert_eq!(metrics.healing_done, i64::MAX);
        assert_eq!(metrics.damage_received, i64::MAX);
        assert_eq!(metrics.damage_by_ability[&23234].total, i64::MAX);
        assert_eq!(metrics.damage_by_ability[&23234].hits, 2);
    }

    #[test]
    fn damage_from_unknown_unit_is_dropped() {
        let mut enc = encounter_with_player("1");
        assert!(!enc.add_damage_to_player("999", 500));
        assert!(enc.player_damage.is_empty());
        assert_eq!(enc.total_damage, 0);
        assert_eq!(enc.attribution_misses, 1);
    }

    #[test]
    fn hostile_sources_are_not_attribution_misses() {
        let mut enc = encounter_with_player("1");
        enc.add_enemy(UnitInfo {
            unit_id: "50".to_string(),
            ..Default::default()
        });
        assert!(!enc.add_damage_to_player("50", 500));
        assert_eq!(enc.attribution_misses, 0);
    }

    #[test]
    fn long_id_alias_credits_canonical_player() {
        let mut enc = encounter_with_player("1");
        assert!(enc.associate_alias("1", "4021667"));
        enc.add_damage_to_player("4021667", 100);
        enc.add_damage_to_player("1", 50);
        assert_eq!(enc.player_damage.len(), 1);
        assert_eq!(enc.damage_for("4021667"), 150);
        assert!(enc.players["1"].has_unit_id("4021667"));
    }

    #[test]
    fn closed_encounter_rejects_mutation() {
        let mut enc = encounter_with_player("1");
        enc.add_damage_to_player("1", 100);
        assert!(enc.close(4000));
        assert!(!enc.close(5000));
        assert!(!enc.add_damage_to_player("1", 100));
        assert!(!enc.add_healing_to_player("1", 100));
        assert!(!enc.add_player(PlayerInfo::new("2")));
        assert!(!enc.track_pet_ownership("p", "1"));
        assert_eq!(enc.total_damage, 100);
        assert_eq!(enc.duration_ms(), 3000);
        assert_eq!(enc.attribution_misses, 0);
    }

    #[test]
    fn remove_unit_drops_pet_edge() {
        let mut enc = encounter_with_player("1");
        enc.track_pet_ownership("pet", "1");
        assert!(enc.remove_unit("pet"));
        assert!(!enc.add_damage_to_player("pet", 10));
        assert!(enc.players.contains_key("1"));
    }

    #[test]
    fn healing_and_casts_are_tracked_per_player() {
        let mut enc = encounter_with_player("1");
        assert!(enc.record_heal("1", 40, 800, true));
        assert!(enc.record_cast("1", 40));
        assert!(enc.record_cast("1", 40));
        assert_eq!(enc.healing_for("1"), 800);
        assert_eq!(enc.abilities_cast["1"].len(), 1);
        assert_eq!(enc.accumulated_data["1"].casts, 2);
        assert_eq!(enc.participants().count(), 1);
    }

    #[test]
    fn resource_samples_update_encounter_maxima() {
        let mut enc = encounter_with_player("1");
        let snapshot = ResourceSnapshot {
            health_current: 100,
            health_max: 200,
            ..Default::default()
        };
        assert!(enc.record_resources("1", 1200, &snapshot));
        assert!(!enc.record_resources("1", 1300, &ResourceSnapshot::default()));
        assert_eq!(enc.resource_samples["1"].len(), 1);
        assert_eq!(enc.players["1"].maxima.health, 200);
    }
}
