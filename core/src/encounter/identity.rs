//! Unit id reconciliation.
//!
//! The log names the same unit with a short per-zone id and a long account
//! id, and pets with their own ids. The resolver maps any of them to the
//! canonical id of the player that should be credited.

use hashbrown::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The id is one of the player's aliases.
    Direct(&'a str),
    /// The id belongs to a pet whose owner is a known player.
    ViaPet { pet_owner: &'a str, player: &'a str },
    Unresolved,
}

impl<'a> Resolution<'a> {
    pub fn player(self) -> Option<&'a str> {
        match self {
            Resolution::Direct(player) | Resolution::ViaPet { player, .. } => Some(player),
            Resolution::Unresolved => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    /// alias → canonical id; every canonical id maps to itself
    aliases: HashMap<String, String>,
    /// pet id → owner id as written in the log
    pet_owner: HashMap<String, String>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `canonical` resolvable to itself.
    pub fn register(&mut self, canonical: &str) {
        self.aliases
            .insert(canonical.to_string(), canonical.to_string());
    }

    pub fn is_registered(&self, canonical: &str) -> bool {
        self.aliases.get(canonical).is_some_and(|c| c == canonical)
    }

    /// Link `alias` to an already registered canonical id.
    /// Returns false if the canonical id is unknown.
    pub fn associate(&mut self, canonical: &str, alias: &str) -> bool {
        // An alias may never shadow another player's canonical id
        if !self.is_registered(canonical) || (alias != canonical && self.is_registered(alias)) {
            return false;
        }
        self.aliases
            .insert(alias.to_string(), canonical.to_string());
        true
    }

    /// Direct alias lookup, no pet hop.
    pub fn canonical(&self, unit_id: &str) -> Option<&str> {
        self.aliases.get(unit_id).map(String::as_str)
    }

    pub fn track_pet_ownership(&mut self, pet: &str, owner: &str) {
        if pet == owner {
            return;
        }
        self.pet_owner.insert(pet.to_string(), owner.to_string());
    }

    pub fn owner_of(&self, pet: &str) -> Option<&str> {
        self.pet_owner.get(pet).map(String::as_str)
    }

    pub fn pet_owner(&self) -> &HashMap<String, String> {
        &self.pet_owner
    }

    /// Alias match, else exactly one hop through the pet table.
    pub fn resolve(&self, unit_id: &str) -> Resolution<'_> {
        if let Some(player) = self.canonical(unit_id) {
            return Resolution::Direct(player);
        }
        if let Some(owner) = self.owner_of(unit_id)
            && let Some(player) = self.canonical(owner)
        {
            return Resolution::ViaPet {
                pet_owner: owner,
                player,
            };
        }
        Resolution::Unresolved
    }

    /// Drop the pet edge keyed by `unit_id`. Player aliases are kept.
    pub fn remove_pet(&mut self, unit_id: &str) -> Option<String> {
        self.pet_owner.remove(unit_id)
    }

    /// Drop a non-canonical alias, e.g. when a short id is reused.
    pub fn forget_alias(&mut self, alias: &str) -> bool {
        match self.aliases.get(alias) {
            Some(canonical) if canonical != alias => {
                self.aliases.remove(alias);
                true
            }
            _ => false,
        }
    }

    /// Stop resolving `canonical` and every alias that points at it.
    /// Returns the number of ids dropped.
    pub fn retire(&mut self, canonical: &str) -> usize {
        if !self.is_registered(canonical) {
            return 0;
        }
        let before = self.aliases.len();
        self.aliases.retain(|_, target| target != canonical);
        before - self.aliases.len()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_alias_and_canonical_to_same_player() {
        let mut ids = IdentityResolver::new();
        ids.register("1");
        assert!(ids.associate("1", "4021667"));
        assert_eq!(ids.resolve("1"), Resolution::Direct("1"));
        assert_eq!(ids.resolve("4021667"), Resolution::Direct("1"));
    }

    #[test]
    fn retire_drops_canonical_and_its_aliases() {
        let mut ids = IdentityResolver::new();
        ids.register("1");
        ids.register("2");
        assert!(ids.associate("1", "4021667"));
        ids.track_pet_ownership("pet_9", "1");

        assert_eq!(ids.retire("1"), 2);
        assert_eq!(ids.resolve("1"), Resolution::Unresolved);
        assert_eq!(ids.resolve("4021667"), Resolution::Unresolved);
        assert_eq!(ids.resolve("pet_9"), Resolution::Unresolved);
        assert_eq!(ids.resolve("2"), Resolution::Direct("2"));
        // Only canonical ids can be retired
        assert_eq!(ids.retire("2_alias"), 0);
    }

    #[test]
    fn associate_requires_registered_canonical() {
        let mut ids = IdentityResolver::new();
        assert!(!ids.associate("1", "4021667"));
        assert_eq!(ids.resolve("4021667"), Resolution::Unresolved);
    }

    #[test]
    fn pet_resolves_through_owner_alias() {
        let mut ids = IdentityResolver::new();
        ids.register("1");
        ids.associate("1", "4021667");
        ids.track_pet_ownership("pet_123", "4021667");
        assert_eq!(
            ids.resolve("pet_123"),
            Resolution::ViaPet {
                pet_owner: "4021667",
                player: "1"
            }
        );
    }

    #[test]
    fn only_one_pet_hop_is_followed() {
        let mut ids = IdentityResolver::new();
        ids.register("1");
        ids.track_pet_ownership("pet", "1");
        ids.track_pet_ownership("pets_pet", "pet");
        assert_eq!(ids.resolve("pet").player(), Some("1"));
        assert_eq!(ids.resolve("pets_pet"), Resolution::Unresolved);
    }

    #[test]
    fn cycles_do_not_loop() {
        let mut ids = IdentityResolver::new();
        ids.track_pet_ownership("a", "b");
        ids.track_pet_ownership("b", "a");
        ids.track_pet_ownership("c", "c");
        assert_eq!(ids.resolve("a"), Resolution::Unresolved);
        assert_eq!(ids.owner_of("c"), None);
    }

    #[test]
    fn forget_alias_keeps_canonical() {
        let mut ids = IdentityResolver::new();
        ids.register("1");
        ids.associate("1", "99");
        assert!(!ids.forget_alias("1"));
        assert!(ids.forget_alias("99"));
        assert_eq!(ids.resolve("99"), Resolution::Unresolved);
        assert_eq!(ids.resolve("1").player(), Some("1"));
    }
}
