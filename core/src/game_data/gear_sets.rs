//! Gear set lookups.
//!
//! The builtin table is a small seed compiled in with `phf`. A complete table
//! is generated offline and loaded at startup with [`GearSetTable::from_toml_file`]:
//!
//! ```toml
//! [[sets]]
//! id = 19
//! name = "Mother's Sorrow"
//! items = [87874, 87875]
//! abilities = [61834]
//! ```

use std::path::Path;

use hashbrown::HashMap;
use phf::phf_map;
use serde::Deserialize;

use crate::context::ConfigError;

// ─────────────────────────────────────────────────────────────────────────────
// Builtin seed
// ─────────────────────────────────────────────────────────────────────────────

static BUILTIN_SETS: phf::Map<i64, &'static str> = phf_map! {
    19i64 => "Mother's Sorrow",
    83i64 => "Hunding's Rage",
    121i64 => "Kinras's Wrath",
    232i64 => "Spell Power Cure",
    280i64 => "Relequen",
    385i64 => "Pillar of Nirn",
    436i64 => "Coral Riptide",
    501i64 => "Bahsei's Mania",
    539i64 => "Pearlescent Ward",
};

static BUILTIN_ITEMS: phf::Map<i64, i64> = phf_map! {
    // Mother's Sorrow
    43802i64 => 19,
    43803i64 => 19,
    43804i64 => 19,
    // Hunding's Rage
    45157i64 => 83,
    45158i64 => 83,
    // Kinras's Wrath
    156525i64 => 121,
    156526i64 => 121,
    // Spell Power Cure
    121551i64 => 232,
    121552i64 => 232,
    // Relequen
    136876i64 => 280,
    136877i64 => 280,
    // Pillar of Nirn
    147343i64 => 385,
    147344i64 => 385,
    // Coral Riptide
    171933i64 => 436,
    171934i64 => 436,
    // Bahsei's Mania
    175591i64 => 501,
    175592i64 => 501,
    // Pearlescent Ward
    178874i64 => 539,
    178875i64 => 539,
};

static BUILTIN_ABILITIES: phf::Map<i64, i64> = phf_map! {
    // Spell Power Cure buff
    86303i64 => 232,
    // Relequen stacks
    107203i64 => 280,
    // Pillar of Nirn proc
    97716i64 => 385,
    // Kinras's Wrath proc
    126941i64 => 121,
    // Pearlescent Ward buff
    172621i64 => 539,
};

// ─────────────────────────────────────────────────────────────────────────────
// Table
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GearSetFile {
    #[serde(default)]
    sets: Vec<GearSetRow>,
}

#[derive(Debug, Deserialize)]
struct GearSetRow {
    id: i64,
    name: String,
    #[serde(default)]
    items: Vec<i64>,
    #[serde(default)]
    abilities: Vec<i64>,
}

/// Read-only item/ability → set name lookup, built once and passed by reference.
#[derive(Debug, Clone, Default)]
pub struct GearSetTable {
    sets: HashMap<i64, String>,
    items: HashMap<i64, i64>,
    abilities: HashMap<i64, i64>,
}

impl GearSetTable {
    pub fn builtin() -> Self {
        Self {
            sets: BUILTIN_SETS
                .entries()
                .map(|(&id, &name)| (id, name.to_string()))
                .collect(),
            items: BUILTIN_ITEMS.entries().map(|(&k, &v)| (k, v)).collect(),
            abilities: BUILTIN_ABILITIES.entries().map(|(&k, &v)| (k, v)).collect(),
        }
    }

    /// Load a generated table. Rows extend and override the builtin seed.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingGearTable {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadGearTable {
            path: path.to_path_buf(),
            source,
        })?;
        let file: GearSetFile =
            toml::from_str(&text).map_err(|source| ConfigError::ParseGearTable {
                path: path.to_path_buf(),
                source,
            })?;

        let mut table = Self::builtin();
        for row in file.sets {
            for item in row.items {
                table.items.insert(item, row.id);
            }
            for ability in row.abilities {
                table.abilities.insert(ability, row.id);
            }
            table.sets.insert(row.id, row.name);
        }
        tracing::info!(
            path = %path.display(),
            sets = table.sets.len(),
            items = table.items.len(),
            "Loaded gear set table"
        );
        Ok(table)
    }

    pub fn lookup_set_by_id(&self, set_id: i64) -> Option<&str> {
        self.sets.get(&set_id).map(String::as_str)
    }

    pub fn lookup_set_by_item(&self, item_id: i64) -> Option<&str> {
        self.items
            .get(&item_id)
            .and_then(|&set_id| self.lookup_set_by_id(set_id))
    }

    pub fn lookup_set_by_ability(&self, ability_id: i64) -> Option<&str> {
        self.abilities
            .get(&ability_id)
            .and_then(|&set_id| self.lookup_set_by_id(set_id))
    }

    pub fn set_count(&self) -> usize {
        self.sets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_lookups() {
        let table = GearSetTable::builtin();
        assert_eq!(table.lookup_set_by_item(136876), Some("Relequen"));
        assert_eq!(table.lookup_set_by_ability(86303), Some("Spell Power Cure"));
        assert_eq!(table.lookup_set_by_item(1), None);
        assert_eq!(table.lookup_set_by_ability(1), None);
    }

    #[test]
    fn toml_rows_extend_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[sets]]
id = 999
name = "Test Set"
items = [1, 2]
abilities = [3]

[[sets]]
id = 280
name = "Perfected Relequen"
"#
        )
        .unwrap();

        let table = GearSetTable::from_toml_file(file.path()).unwrap();
        assert_eq!(table.lookup_set_by_item(2), Some("Test Set"));
        assert_eq!(table.lookup_set_by_ability(3), Some("Test Set"));
        assert_eq!(table.lookup_set_by_item(136876), Some("Perfected Relequen"));
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GearSetTable::from_toml_file(&dir.path().join("sets.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingGearTable { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[sets]]\nid = \"nope\"").unwrap();
        let err = GearSetTable::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseGearTable { .. }));
    }
}
