//! ESO class ids as written in UNIT_ADDED / UNIT_CHANGED.

use phf::phf_map;

static CLASS_NAMES: phf::Map<i64, &'static str> = phf_map! {
    1i64 => "Dragonknight",
    2i64 => "Sorcerer",
    3i64 => "Nightblade",
    4i64 => "Warden",
    5i64 => "Necromancer",
    6i64 => "Templar",
    117i64 => "Arcanist",
};

/// Display name for a class id, `None` for 0 (non-player) or unknown ids.
pub fn class_name(class_id: i64) -> Option<&'static str> {
    CLASS_NAMES.get(&class_id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_classes() {
        assert_eq!(class_name(117), Some("Arcanist"));
        assert_eq!(class_name(1), Some("Dragonknight"));
        assert_eq!(class_name(0), None);
    }
}
