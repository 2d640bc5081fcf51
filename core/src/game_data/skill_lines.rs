//! Class skill lines and the ability names that identify them.
//!
//! Names cover base skills and both morphs; ultimates included.

use hashbrown::{HashMap, HashSet};
use phf::phf_map;
use serde::{Deserialize, Serialize};

/// A skill line needs this many distinct signature abilities to be reported.
pub const MIN_SKILL_LINE_MATCHES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillLine {
    // Dragonknight
    ArdentFlame,
    DraconicPower,
    EarthenHeart,
    // Sorcerer
    DarkMagic,
    DaedricSummoning,
    StormCalling,
    // Nightblade
    Assassination,
    Shadow,
    Siphoning,
    // Templar
    AedricSpear,
    DawnsWrath,
    RestoringLight,
}

impl SkillLine {
    pub const fn name(&self) -> &'static str {
        match self {
            SkillLine::ArdentFlame => "Ardent Flame",
            SkillLine::DraconicPower => "Draconic Power",
            SkillLine::EarthenHeart => "Earthen Heart",
            SkillLine::DarkMagic => "Dark Magic",
            SkillLine::DaedricSummoning => "Daedric Summoning",
            SkillLine::StormCalling => "Storm Calling",
            SkillLine::Assassination => "Assassination",
            SkillLine::Shadow => "Shadow",
            SkillLine::Siphoning => "Siphoning",
            SkillLine::AedricSpear => "Aedric Spear",
            SkillLine::DawnsWrath => "Dawn's Wrath",
            SkillLine::RestoringLight => "Restoring Light",
        }
    }

    pub const fn class_name(&self) -> &'static str {
        match self {
            SkillLine::ArdentFlame | SkillLine::DraconicPower | SkillLine::EarthenHeart => {
                "Dragonknight"
            }
            SkillLine::DarkMagic | SkillLine::DaedricSummoning | SkillLine::StormCalling => {
                "Sorcerer"
            }
            SkillLine::Assassination | SkillLine::Shadow | SkillLine::Siphoning => "Nightblade",
            SkillLine::AedricSpear | SkillLine::DawnsWrath | SkillLine::RestoringLight => {
                "Templar"
            }
        }
    }
}

static SKILL_LINE_ABILITIES: phf::Map<&'static str, SkillLine> = phf_map! {
    // ═══════════════════════════════════════════════════════════════════════
    // Dragonknight
    // ═══════════════════════════════════════════════════════════════════════
    "Lava Whip" => SkillLine::ArdentFlame,
    "Molten Whip" => SkillLine::ArdentFlame,
    "Flame Lash" => SkillLine::ArdentFlame,
    "Searing Strike" => SkillLine::ArdentFlame,
    "Venomous Claw" => SkillLine::ArdentFlame,
    "Burning Embers" => SkillLine::ArdentFlame,
    "Fiery Breath" => SkillLine::ArdentFlame,
    "Noxious Breath" => SkillLine::ArdentFlame,
    "Engulfing Flames" => SkillLine::ArdentFlame,
    "Fiery Grip" => SkillLine::ArdentFlame,
    "Chains of Devastation" => SkillLine::ArdentFlame,
    "Unrelenting Grip" => SkillLine::ArdentFlame,
    "Inferno" => SkillLine::ArdentFlame,
    "Flames of Oblivion" => SkillLine::ArdentFlame,
    "Cauterize" => SkillLine::ArdentFlame,
    "Dragonknight Standard" => SkillLine::ArdentFlame,
    "Shifting Standard" => SkillLine::ArdentFlame,
    "Standard of Might" => SkillLine::ArdentFlame,

    "Spiked Armor" => SkillLine::DraconicPower,
    "Hardened Armor" => SkillLine::DraconicPower,
    "Volatile Armor" => SkillLine::DraconicPower,
    "Dark Talons" => SkillLine::DraconicPower,
    "Burning Talons" => SkillLine::DraconicPower,
    "Choking Talons" => SkillLine::DraconicPower,
    "Dragon Blood" => SkillLine::DraconicPower,
    "Green Dragon Blood" => SkillLine::DraconicPower,
    "Coagulating Blood" => SkillLine::DraconicPower,
    "Reflective Scale" => SkillLine::DraconicPower,
    "Dragon Fire Scale" => SkillLine::DraconicPower,
    "Inhale" => SkillLine::DraconicPower,
    "Deep Breath" => SkillLine::DraconicPower,
    "Draw Essence" => SkillLine::DraconicPower,
    "Dragon Leap" => SkillLine::DraconicPower,
    "Take Flight" => SkillLine::DraconicPower,
    "Ferocious Leap" => SkillLine::DraconicPower,

    "Stonefist" => SkillLine::EarthenHeart,
    "Obsidian Shard" => SkillLine::EarthenHeart,
    "Stone Giant" => SkillLine::EarthenHeart,
    "Molten Weapons" => SkillLine::EarthenHeart,
    "Igneous Weapons" => SkillLine::EarthenHeart,
    "Molten Armaments" => SkillLine::EarthenHeart,
    "Obsidian Shield" => SkillLine::EarthenHeart,
    "Igneous Shield" => SkillLine::EarthenHeart,
    "Fragmented Shield" => SkillLine::EarthenHeart,
    "Petrify" => SkillLine::EarthenHeart,
    "Fossilize" => SkillLine::EarthenHeart,
    "Shattering Rocks" => SkillLine::EarthenHeart,
    "Ash Cloud" => SkillLine::EarthenHeart,
    "Cinder Storm" => SkillLine::EarthenHeart,
    "Eruption" => SkillLine::EarthenHeart,
    "Magma Armor" => SkillLine::EarthenHeart,
    "Magma Shell" => SkillLine::EarthenHeart,
    "Corrosive Armor" => SkillLine::EarthenHeart,

    // ═══════════════════════════════════════════════════════════════════════
    // Sorcerer
    // ═══════════════════════════════════════════════════════════════════════
    "Crystal Shard" => SkillLine::DarkMagic,
    "Crystal Fragments" => SkillLine::DarkMagic,
    "Crystal Weapon" => SkillLine::DarkMagic,
    "Encase" => SkillLine::DarkMagic,
    "Shattering Spines" => SkillLine::DarkMagic,
    "Vibrant Shroud" => SkillLine::DarkMagic,
    "Rune Prison" => SkillLine::DarkMagic,
    "Rune Cage" => SkillLine::DarkMagic,
    "Defensive Rune" => SkillLine::DarkMagic,
    "Dark Exchange" => SkillLine::DarkMagic,
    "Dark Deal" => SkillLine::DarkMagic,
    "Dark Conversion" => SkillLine::DarkMagic,
    "Daedric Mines" => SkillLine::DarkMagic,
    "Daedric Tomb" => SkillLine::DarkMagic,
    "Daedric Minefield" => SkillLine::DarkMagic,
    "Negate Magic" => SkillLine::DarkMagic,
    "Suppression Field" => SkillLine::DarkMagic,
    "Absorption Field" => SkillLine::DarkMagic,

    "Summon Unstable Familiar" => SkillLine::DaedricSummoning,
    "Summon Volatile Familiar" => SkillLine::DaedricSummoning,
    "Summon Unstable Clannfear" => SkillLine::DaedricSummoning,
    "Daedric Curse" => SkillLine::DaedricSummoning,
    "Daedric Prey" => SkillLine::DaedricSummoning,
    "Haunting Curse" => SkillLine::DaedricSummoning,
    "Summon Winged Twilight" => SkillLine::DaedricSummoning,
    "Summon Twilight Matriarch" => SkillLine::DaedricSummoning,
    "Summon Twilight Tormentor" => SkillLine::DaedricSummoning,
    "Conjured Ward" => SkillLine::DaedricSummoning,
    "Hardened Ward" => SkillLine::DaedricSummoning,
    "Regenerative Ward" => SkillLine::DaedricSummoning,
    "Bound Armor" => SkillLine::DaedricSummoning,
    "Bound Armaments" => SkillLine::DaedricSummoning,
    "Bound Aegis" => SkillLine::DaedricSummoning,
    "Summon Storm Atronach" => SkillLine::DaedricSummoning,
    "Greater Storm Atronach" => SkillLine::DaedricSummoning,
    "Summon Charged Atronach" => SkillLine::DaedricSummoning,

    "Mages' Fury" => SkillLine::StormCalling,
    "Mages' Wrath" => SkillLine::StormCalling,
    "Endless Fury" => SkillLine::StormCalling,
    "Lightning Form" => SkillLine::StormCalling,
    "Boundless Storm" => SkillLine::StormCalling,
    "Hurricane" => SkillLine::StormCalling,
    "Lightning Splash" => SkillLine::StormCalling,
    "Liquid Lightning" => SkillLine::StormCalling,
    "Lightning Flood" => SkillLine::StormCalling,
    "Surge" => SkillLine::StormCalling,
    "Power Surge" => SkillLine::StormCalling,
    "Critical Surge" => SkillLine::StormCalling,
    "Bolt Escape" => SkillLine::StormCalling,
    "Streak" => SkillLine::StormCalling,
    "Ball of Lightning" => SkillLine::StormCalling,
    "Overload" => SkillLine::StormCalling,
    "Power Overload" => SkillLine::StormCalling,
    "Energy Overload" => SkillLine::StormCalling,

    // ═══════════════════════════════════════════════════════════════════════
    // Nightblade
    // ═══════════════════════════════════════════════════════════════════════
    "Assassin's Blade" => SkillLine::Assassination,
    "Killer's Blade" => SkillLine::Assassination,
    "Impale" => SkillLine::Assassination,
    "Teleport Strike" => SkillLine::Assassination,
    "Ambush" => SkillLine::Assassination,
    "Lotus Fan" => SkillLine::Assassination,
    "Veiled Strike" => SkillLine::Assassination,
    "Surprise Attack" => SkillLine::Assassination,
    "Concealed Weapon" => SkillLine::Assassination,
    "Mark Target" => SkillLine::Assassination,
    "Piercing Mark" => SkillLine::Assassination,
    "Reaper's Mark" => SkillLine::Assassination,
    "Haste" => SkillLine::Assassination,
    "Grim Focus" => SkillLine::Assassination,
    "Merciless Resolve" => SkillLine::Assassination,
    "Relentless Focus" => SkillLine::Assassination,
    "Death Stroke" => SkillLine::Assassination,
    "Incapacitating Strike" => SkillLine::Assassination,
    "Soul Harvest" => SkillLine::Assassination,

    "Shadow Cloak" => SkillLine::Shadow,
    "Shadowy Disguise" => SkillLine::Shadow,
    "Dark Cloak" => SkillLine::Shadow,
    "Blur" => SkillLine::Shadow,
    "Mirage" => SkillLine::Shadow,
    "Phantasmal Escape" => SkillLine::Shadow,
    "Path of Darkness" => SkillLine::Shadow,
    "Twisting Path" => SkillLine::Shadow,
    "Refreshing Path" => SkillLine::Shadow,
    "Aspect of Terror" => SkillLine::Shadow,
    "Mass Hysteria" => SkillLine::Shadow,
    "Manifestation of Terror" => SkillLine::Shadow,
    "Summon Shade" => SkillLine::Shadow,
    "Dark Shade" => SkillLine::Shadow,
    "Shadow Image" => SkillLine::Shadow,
    "Consuming Darkness" => SkillLine::Shadow,
    "Bolstering Darkness" => SkillLine::Shadow,
    "Veil of Blades" => SkillLine::Shadow,

    "Strife" => SkillLine::Siphoning,
    "Funnel Health" => SkillLine::Siphoning,
    "Swallow Soul" => SkillLine::Siphoning,
    "Malevolent Offering" => SkillLine::Siphoning,
    "Shrewd Offering" => SkillLine::Siphoning,
    "Healthy Offering" => SkillLine::Siphoning,
    "Cripple" => SkillLine::Siphoning,
    "Crippling Grasp" => SkillLine::Siphoning,
    "Debilitate" => SkillLine::Siphoning,
    "Siphoning Strikes" => SkillLine::Siphoning,
    "Leeching Strikes" => SkillLine::Siphoning,
    "Siphoning Attacks" => SkillLine::Siphoning,
    "Drain Power" => SkillLine::Siphoning,
    "Power Extraction" => SkillLine::Siphoning,
    "Sap Essence" => SkillLine::Siphoning,
    "Soul Shred" => SkillLine::Siphoning,
    "Soul Siphon" => SkillLine::Siphoning,
    "Soul Tether" => SkillLine::Siphoning,

    // ═══════════════════════════════════════════════════════════════════════
    // Templar
    // ═══════════════════════════════════════════════════════════════════════
    "Puncturing Strikes" => SkillLine::AedricSpear,
    "Biting Jabs" => SkillLine::AedricSpear,
    "Puncturing Sweep" => SkillLine::AedricSpear,
    "Piercing Javelin" => SkillLine::AedricSpear,
    "Aurora Javelin" => SkillLine::AedricSpear,
    "Binding Javelin" => SkillLine::AedricSpear,
    "Focused Charge" => SkillLine::AedricSpear,
    "Explosive Charge" => SkillLine::AedricSpear,
    "Toppling Charge" => SkillLine::AedricSpear,
    "Spear Shards" => SkillLine::AedricSpear,
    "Luminous Shards" => SkillLine::AedricSpear,
    "Blazing Spear" => SkillLine::AedricSpear,
    "Sun Shield" => SkillLine::AedricSpear,
    "Radiant Ward" => SkillLine::AedricSpear,
    "Blazing Shield" => SkillLine::AedricSpear,
    "Radial Sweep" => SkillLine::AedricSpear,
    "Crescent Sweep" => SkillLine::AedricSpear,
    "Everlasting Sweep" => SkillLine::AedricSpear,

    "Sun Fire" => SkillLine::DawnsWrath,
    "Vampire's Bane" => SkillLine::DawnsWrath,
    "Reflective Light" => SkillLine::DawnsWrath,
    "Solar Flare" => SkillLine::DawnsWrath,
    "Dark Flare" => SkillLine::DawnsWrath,
    "Solar Barrage" => SkillLine::DawnsWrath,
    "Backlash" => SkillLine::DawnsWrath,
    "Purifying Light" => SkillLine::DawnsWrath,
    "Power of the Light" => SkillLine::DawnsWrath,
    "Eclipse" => SkillLine::DawnsWrath,
    "Total Dark" => SkillLine::DawnsWrath,
    "Unstable Core" => SkillLine::DawnsWrath,
    "Radiant Destruction" => SkillLine::DawnsWrath,
    "Radiant Glory" => SkillLine::DawnsWrath,
    "Radiant Oppression" => SkillLine::DawnsWrath,
    "Nova" => SkillLine::DawnsWrath,
    "Solar Prison" => SkillLine::DawnsWrath,
    "Solar Disturbance" => SkillLine::DawnsWrath,

    "Rushed Ceremony" => SkillLine::RestoringLight,
    "Breath of Life" => SkillLine::RestoringLight,
    "Honor the Dead" => SkillLine::RestoringLight,
    "Healing Ritual" => SkillLine::RestoringLight,
    "Hasty Prayer" => SkillLine::RestoringLight,
    "Ritual of Rebirth" => SkillLine::RestoringLight,
    "Restoring Aura" => SkillLine::RestoringLight,
    "Radiant Aura" => SkillLine::RestoringLight,
    "Repentance" => SkillLine::RestoringLight,
    "Cleansing Ritual" => SkillLine::RestoringLight,
    "Ritual of Retribution" => SkillLine::RestoringLight,
    "Extended Ritual" => SkillLine::RestoringLight,
    "Rite of Passage" => SkillLine::RestoringLight,
    "Remembrance" => SkillLine::RestoringLight,
    "Practiced Incantation" => SkillLine::RestoringLight,
    "Rune Focus" => SkillLine::RestoringLight,
    "Channeled Focus" => SkillLine::RestoringLight,
    "Restoring Focus" => SkillLine::RestoringLight,
};

pub fn skill_line_for_ability(ability_name: &str) -> Option<SkillLine> {
    SKILL_LINE_ABILITIES.get(ability_name).copied()
}

/// Infer the class skill lines behind a set of cast ability names.
///
/// Pure: a line is reported once at least [`MIN_SKILL_LINE_MATCHES`] of its
/// abilities appear. Sorted by match count (highest first), then name.
pub fn infer_skill_lines(ability_names: &HashSet<&str>) -> Vec<SkillLine> {
    let mut counts: HashMap<SkillLine, usize> = HashMap::new();
    for name in ability_names {
        if let Some(line) = skill_line_for_ability(name) {
            *counts.entry(line).or_insert(0) += 1;
        }
    }

    let mut lines: Vec<(SkillLine, usize)> = counts
        .into_iter()
        .filter(|&(_, count)| count >= MIN_SKILL_LINE_MATCHES)
        .collect();
    lines.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.name().cmp(b.0.name())));
    lines.into_iter().map(|(line, _)| line).collect()
}
