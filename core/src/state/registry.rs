//! Session-wide registries: players, non-player units, abilities, effects.
//!
//! These outlive encounters. A player's resource maxima and aliases carry
//! over from one fight to the next.

use hashbrown::HashMap;

use crate::combat_log::{AbilityInfoEntry, EffectInfoEntry, ResourceSnapshot};
use crate::context::{IStr, empty_istr, intern, resolve};
use crate::encounter::entity_info::{PlayerInfo, UnitInfo};
use crate::encounter::identity::IdentityResolver;

/// Long ids the log writes when it has nothing to say.
fn is_placeholder_id(id: &str) -> bool {
    id.is_empty() || id == "0" || id == "*"
}

#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: HashMap<String, PlayerInfo>,
    units: HashMap<String, UnitInfo>,
    identities: IdentityResolver,
    /// long id → canonical short id, announced but not yet confirmed
    pending_long_ids: HashMap<String, String>,
    /// Players whose short id was removed or handed to another unit
    retired: Vec<PlayerInfo>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Players ---

    /// Register a player announced by UNIT_ADDED.
    ///
    /// A repeat announcement for the same character refreshes the descriptive
    /// fields and keeps aliases and maxima. A different character reusing the
    /// short id retires the old record. A character seen before under a
    /// retired id gets its maxima and gear back. Returns true if a record was
    /// created or replaced.
    pub fn register_player(&mut self, mut player: PlayerInfo) -> bool {
        let unit_id = player.unit_id.clone();

        if let Some(existing) = self.players.get_mut(&unit_id)
            && existing.handle == player.handle
        {
            existing.name = player.name;
            existing.class_id = player.class_id;
            existing.level = player.level;
            existing.champion_points = player.champion_points;
            if player.long_id.is_some() {
                existing.long_id = player.long_id.clone();
            }
            self.remember_long_id(&player);
            return false;
        }

        self.retire_player(&unit_id);
        if player.handle != empty_istr()
            && let Some(pos) = self.retired.iter().rposition(|p| p.handle == player.handle)
        {
            let previous = self.retired.remove(pos);
            player.maxima.health = player.maxima.health.max(previous.maxima.health);
            player.maxima.magicka = player.maxima.magicka.max(previous.maxima.magicka);
            player.maxima.stamina = player.maxima.stamina.max(previous.maxima.stamina);
            if player.gear.is_empty() {
                player.gear = previous.gear;
                player.front_bar = previous.front_bar;
                player.back_bar = previous.back_bar;
            }
        }
        self.remember_long_id(&player);
        self.identities.register(&unit_id);
        self.players.insert(unit_id, player);
        true
    }

    fn remember_long_id(&mut self, player: &PlayerInfo) {
        if let Some(long_id) = player.long_id.as_ref().filter(|l| !is_placeholder_id(l)) {
            self.pending_long_ids
                .insert(long_id.clone(), player.unit_id.clone());
        }
    }

    /// Stop resolving a player's short id and its aliases. The record moves
    /// to the retired list. Returns false if `unit_id` names no active player.
    pub fn retire_player(&mut self, unit_id: &str) -> bool {
        let Some(old) = self.players.remove(unit_id) else {
            return false;
        };
        self.identities.retire(unit_id);
        self.pending_long_ids.retain(|_, canonical| canonical != unit_id);
        self.retired.push(old);
        true
    }

    /// Records retired by UNIT_REMOVED or short id reuse, oldest first.
    pub fn retired_players(&self) -> &[PlayerInfo] {
        &self.retired
    }

    /// Any alias (short, long) to the player it belongs to. No pet hop.
    pub fn find_player_by_unit_id(&self, unit_id: &str) -> Option<&PlayerInfo> {
        self.identities
            .canonical(unit_id)
            .and_then(|canonical| self.players.get(canonical))
    }

    pub fn find_player_mut(&mut self, unit_id: &str) -> Option<&mut PlayerInfo> {
        let canonical = self.identities.canonical(unit_id)?;
        self.players.get_mut(canonical)
    }

    /// Link a short and a long id seen together. Either argument order works.
    /// Returns the canonical id on success.
    pub fn associate_long_id(&mut self, first: &str, second: &str) -> Option<String> {
        let (canonical, alias) = if self.identities.is_registered(first) {
            (first, second)
        } else if self.identities.is_registered(second) {
            (second, first)
        } else {
            return None;
        };
        if is_placeholder_id(alias) || !self.identities.associate(canonical, alias) {
            return None;
        }
        let canonical = canonical.to_string();
        if let Some(player) = self.players.get_mut(&canonical) {
            player.add_alias(alias);
        }
        self.pending_long_ids.remove(alias);
        Some(canonical)
    }

    /// Confirm an announced long id once a record uses it.
    /// Returns (canonical, long id) when a new alias was learned.
    pub fn confirm_long_id(&mut self, unit_id: &str) -> Option<(String, String)> {
        if self.identities.canonical(unit_id).is_some() {
            return None;
        }
        let canonical = self.pending_long_ids.get(unit_id)?.clone();
        self.associate_long_id(&canonical, unit_id)
            .map(|canonical| (canonical, unit_id.to_string()))
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerInfo> {
        self.players.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_player(&self, unit_id: &str) -> bool {
        self.identities.canonical(unit_id).is_some()
    }

    /// Fold a snapshot into the maxima of the player `unit_id` names directly.
    /// Returns the canonical id updated.
    pub fn update_resources(&mut self, unit_id: &str, snapshot: &ResourceSnapshot) -> Option<&str> {
        if snapshot.is_empty() {
            return None;
        }
        let player = self.find_player_mut(unit_id)?;
        player.update_resources(snapshot);
        Some(player.unit_id.as_str())
    }

    // --- Pets and resolution ---

    pub fn track_pet_ownership(&mut self, pet: &str, owner: &str) {
        if is_placeholder_id(owner) {
            return;
        }
        self.identities.track_pet_ownership(pet, owner);
    }

    pub fn owner_of(&self, pet: &str) -> Option<&str> {
        self.identities.owner_of(pet)
    }

    pub fn pet_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.identities
            .pet_owner()
            .iter()
            .map(|(pet, owner)| (pet.as_str(), owner.as_str()))
    }

    /// Canonical player to credit for `unit_id`, following at most one pet hop.
    pub fn resolve(&self, unit_id: &str) -> Option<&str> {
        self.identities.resolve(unit_id).player()
    }

    // --- Other units ---

    pub fn register_unit(&mut self, unit: UnitInfo) {
        self.units.insert(unit.unit_id.clone(), unit);
    }

    pub fn unit(&self, unit_id: &str) -> Option<&UnitInfo> {
        self.units.get(unit_id)
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitInfo> {
        self.units.values()
    }

    pub fn unit_mut(&mut self, unit_id: &str) -> Option<&mut UnitInfo> {
        self.units.get_mut(unit_id)
    }

    /// UNIT_REMOVED: drop the unit record and its pet edge. Players are
    /// retired separately by [`Self::retire_player`].
    pub fn remove_unit(&mut self, unit_id: &str) -> bool {
        let unit = self.units.remove(unit_id).is_some();
        let pet = self.identities.remove_pet(unit_id).is_some();
        unit || pet
    }

    pub fn alias_count(&self) -> usize {
        self.identities.alias_count()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ability and effect caches
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct AbilityInfo {
    pub name: IStr,
    pub icon_path: IStr,
    pub is_player_ability: bool,
}

/// ability id → name, populated by ABILITY_INFO. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct AbilityCache {
    abilities: HashMap<i64, AbilityInfo>,
}

impl AbilityCache {
    pub fn insert(&mut self, entry: &AbilityInfoEntry) {
        self.abilities.insert(
            entry.ability_id,
            AbilityInfo {
                name: intern(&entry.name),
                icon_path: intern(&entry.icon_path),
                is_player_ability: entry.is_player_ability,
            },
        );
    }

    pub fn get(&self, ability_id: i64) -> Option<&AbilityInfo> {
        self.abilities.get(&ability_id)
    }

    pub fn name(&self, ability_id: i64) -> Option<&'static str> {
        self.abilities.get(&ability_id).map(|a| resolve(a.name))
    }

    /// Name for display, falling back to the numeric id.
    pub fn display_name(&self, ability_id: i64) -> String {
        self.name(ability_id)
            .map(str::to_string)
            .unwrap_or_else(|| ability_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectInfo {
    pub effect_type: String,
    pub status_effect_type: String,
    pub bar_display: String,
    pub synergy_ability_id: Option<i64>,
}

/// Effect metadata from EFFECT_INFO.
#[derive(Debug, Clone, Default)]
pub struct EffectCache {
    effects: HashMap<i64, EffectInfo>,
}

impl EffectCache {
    pub fn insert(&mut self, entry: &EffectInfoEntry) {
        self.effects.insert(
            entry.ability_id,
            EffectInfo {
                effect_type: entry.effect_type.clone(),
                status_effect_type: entry.status_effect_type.clone(),
                bar_display: entry.bar_display.clone(),
                synergy_ability_id: entry.synergy_ability_id,
            },
        );
    }

    pub fn get(&self, ability_id: i64) -> Option<&EffectInfo> {
        self.effects.get(&ability_id)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(unit_id: &str, handle: &str, long_id: Option<&str>) -> PlayerInfo {
        let mut p = PlayerInfo::new(unit_id);
        p.handle = intern(handle);
        p.long_id = long_id.map(str::to_string);
        p
    }

    #[test]
    fn long_id_lookup_is_commutative() {
        let mut registry = PlayerRegistry::new();
        registry.register_player(player("1", "@one", None));

        assert_eq!(registry.associate_long_id("4021667", "1").as_deref(), Some("1"));
        let by_short = registry.find_player_by_unit_id("1").unwrap();
        let by_long = registry.find_player_by_unit_id("4021667").unwrap();
        assert_eq!(by_short.unit_id, by_long.unit_id);
        assert!(by_short.has_unit_id("4021667"));
    }

    #[test]
    fn announced_long_id_is_confirmed_on_use() {
        let mut registry = PlayerRegistry::new();
        registry.register_player(player("1", "@one", Some("4021667")));
        assert!(registry.find_player_by_unit_id("4021667").is_none());

        assert_eq!(
            registry.confirm_long_id("4021667"),
            Some(("1".to_string(), "4021667".to_string()))
        );
        assert_eq!(registry.confirm_long_id("4021667"), None);
        assert_eq!(registry.find_player_by_unit_id("4021667").unwrap().unit_id, "1");
    }

    #[test]
    fn associate_requires_known_player() {
        let mut registry = PlayerRegistry::new();
        assert_eq!(registry.associate_long_id("1", "2"), None);
        registry.register_player(player("1", "@one", None));
        assert_eq!(registry.associate_long_id("1", "0"), None);
    }

    #[test]
    fn repeat_announcement_keeps_maxima_and_aliases() {
        let mut registry = PlayerRegistry::new();
        registry.register_player(player("1", "@one", None));
        registry.associate_long_id("1", "99");
        registry.update_resources(
            "99",
            &ResourceSnapshot {
                health_max: 25000,
                ..Default::default()
            },
        );

        assert!(!registry.register_player(player("1", "@one", None)));
        let p = registry.find_player_by_unit_id("1").unwrap();
        assert_eq!(p.maxima.health, 25000);
        assert!(p.has_unit_id("99"));
    }

    #[test]
    fn reused_short_id_replaces_player() {
        let mut registry = PlayerRegistry::new();
        registry.register_player(player("1", "@one", None));
        registry.associate_long_id("1", "99");

        registry.update_resources(
            "1",
            &ResourceSnapshot {
                health_max: 25000,
                ..Default::default()
            },
        );

        assert!(registry.register_player(player("1", "@two", None)));
        assert!(registry.find_player_by_unit_id("99").is_none());
        assert_eq!(registry.find_player_by_unit_id("1").unwrap().handle(), "@two");
        assert_eq!(registry.find_player_by_unit_id("1").unwrap().maxima.health, 0);

        let retired = registry.retired_players();
        assert_eq!(retired.len(), 1);
        assert_eq!(retired[0].handle(), "@one");
        assert_eq!(retired[0].maxima.health, 25000);
    }

    #[test]
    fn retired_player_stops_resolving_and_returns_with_maxima() {
        let mut registry = PlayerRegistry::new();
        registry.register_player(player("5", "@five", Some("777")));
        registry.confirm_long_id("777");
        registry.update_resources(
            "5",
            &ResourceSnapshot {
                health_max: 30000,
                ..Default::default()
            },
        );

        assert!(registry.retire_player("5"));
        assert!(!registry.retire_player("5"));
        assert!(registry.find_player_by_unit_id("5").is_none());
        assert!(registry.find_player_by_unit_id("777").is_none());
        assert_eq!(registry.resolve("5"), None);
        assert_eq!(registry.retired_players().len(), 1);

        // Same character back under a new short id
        assert!(registry.register_player(player("8", "@five", None)));
        let back = registry.find_player_by_unit_id("8").unwrap();
        assert_eq!(back.maxima.health, 30000);
        assert!(registry.retired_players().is_empty());
    }

    #[test]
    fn removing_pet_keeps_owner() {
        let mut registry = PlayerRegistry::new();
        registry.register_player(player("1", "@one", None));
        registry.track_pet_ownership("50", "1");
        registry.track_pet_ownership("51", "0");
        assert_eq!(registry.resolve("50"), Some("1"));
        assert_eq!(registry.owner_of("51"), None);

        assert!(registry.remove_unit("50"));
        assert_eq!(registry.resolve("50"), None);
        assert!(registry.find_player_by_unit_id("1").is_some());
    }

    #[test]
    fn ability_cache_names() {
        let mut cache = AbilityCache::default();
        cache.insert(&AbilityInfoEntry {
            line_number: 1,
            ability_id: 20657,
            name: "Searing Strike".to_string(),
            icon_path: "/esoui/art/icons/ability.dds".to_string(),
            is_player_ability: true,
            is_active: true,
        });
        assert_eq!(cache.name(20657), Some("Searing Strike"));
        assert_eq!(cache.display_name(1), "1");
        assert_eq!(cache.len(), 1);
    }
}
