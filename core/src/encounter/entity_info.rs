use crate::combat_log::{GearPiece, ResourceSnapshot, UnitType};
use crate::context::{IStr, empty_istr, resolve};
use esoparse_types::ResourceMaxima;
use hashbrown::HashSet;

#[derive(Debug, Clone)]
pub struct PlayerInfo {
    /// Canonical (short) unit id
    pub unit_id: String,
    pub name: IStr,
    pub handle: IStr,
    pub class_id: i64,
    pub level: u32,
    pub champion_points: u32,
    /// Long id announced by UNIT_ADDED, not yet an alias until confirmed
    pub long_id: Option<String>,
    aliases: HashSet<String>,
    pub maxima: ResourceMaxima,
    pub gear: Vec<GearPiece>,
    pub front_bar: Vec<i64>,
    pub back_bar: Vec<i64>,
}

impl PlayerInfo {
    pub fn new(unit_id: impl Into<String>) -> Self {
        let unit_id = unit_id.into();
        let mut aliases = HashSet::new();
        aliases.insert(unit_id.clone());
        Self {
            unit_id,
            name: empty_istr(),
            handle: empty_istr(),
            class_id: 0,
            level: 0,
            champion_points: 0,
            long_id: None,
            aliases,
            maxima: ResourceMaxima::default(),
            gear: Vec::new(),
            front_bar: Vec::new(),
            back_bar: Vec::new(),
        }
    }

    #[inline]
    pub fn has_unit_id(&self, unit_id: &str) -> bool {
        self.aliases.contains(unit_id)
    }

    /// Returns true if the alias was new.
    pub fn add_alias(&mut self, unit_id: impl Into<String>) -> bool {
        self.aliases.insert(unit_id.into())
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Fold observed pool sizes into the running maxima. Never decreases.
    pub fn update_resources(&mut self, snapshot: &ResourceSnapshot) {
        self.maxima.health = self.maxima.health.max(snapshot.health_max);
        self.maxima.magicka = self.maxima.magicka.max(snapshot.magicka_max);
        self.maxima.stamina = self.maxima.stamina.max(snapshot.stamina_max);
    }

    pub fn name(&self) -> &'static str {
        resolve(self.name)
    }

    pub fn handle(&self) -> &'static str {
        resolve(self.handle)
    }
}

/// Any non-player unit: monsters, objects, pets, siege.
#[derive(Debug, Clone)]
pub struct UnitInfo {
    pub unit_id: String,
    pub name: IStr,
    pub unit_type: UnitType,
    pub monster_id: i64,
    pub is_boss: bool,
    pub reaction: String,
    pub owner_unit_id: Option<String>,
    pub health_max: i64,
}

impl Default for UnitInfo {
    fn default() -> Self {
        UnitInfo {
            unit_id: String::new(),
            name: empty_istr(),
            unit_type: UnitType::default(),
            monster_id: 0,
            is_boss: false,
            reaction: String::new(),
            owner_unit_id: None,
            health_max: 0,
        }
    }
}

impl UnitInfo {
    pub fn is_hostile(&self) -> bool {
        self.reaction == "HOSTILE"
    }

    pub fn name(&self) -> &'static str {
        resolve(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_aliases_only_itself() {
        let player = PlayerInfo::new("1");
        assert!(player.has_unit_id("1"));
        assert!(!player.has_unit_id("2"));
        assert_eq!(player.alias_count(), 1);
    }

    #[test]
    fn resource_maxima_never_decrease() {
        let mut player = PlayerInfo::new("1");
        player.update_resources(&ResourceSnapshot {
            health_max: 25000,
            magicka_max: 30000,
            ..Default::default()
        });
        player.update_resources(&ResourceSnapshot {
            health_max: 24000,
            stamina_max: 12000,
            ..Default::default()
        });
        assert_eq!(player.maxima.health, 25000);
        assert_eq!(player.maxima.magicka, 30000);
        assert_eq!(player.maxima.stamina, 12000);
    }
}
