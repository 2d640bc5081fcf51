//! Post-hoc report for one closed encounter.
//!
//! Reporting is the only place the gear set table and the skill line matcher
//! are consulted. Stream processing never touches them.

use hashbrown::{HashMap, HashSet};

use esoparse_types::{AbilityTotal, EncounterReport, GearSetUsage, PlayerReport};

use super::CombatEncounter;
use super::entity_info::PlayerInfo;
use super::metrics::per_second;
use crate::combat_log::GearPiece;
use crate::game_data::{GearSetTable, class_name, infer_skill_lines};
use crate::state::registry::{AbilityCache, PlayerRegistry};

pub const TOP_ABILITY_COUNT: usize = 5;

/// Inputs that outlive the encounter itself.
pub struct ReportContext<'a> {
    pub abilities: &'a AbilityCache,
    pub players: &'a PlayerRegistry,
    pub gear_sets: &'a GearSetTable,
    pub list_hostiles: bool,
}

fn gear_set_usage(gear: &[GearPiece], table: &GearSetTable) -> Vec<GearSetUsage> {
    let mut pieces: HashMap<&str, u32> = HashMap::new();
    for piece in gear {
        let set = table.lookup_set_by_item(piece.item_id).or_else(|| {
            (piece.set_id != 0)
                .then(|| table.lookup_set_by_id(piece.set_id))
                .flatten()
        });
        if let Some(name) = set {
            *pieces.entry(name).or_insert(0) += 1;
        }
    }
    let mut sets: Vec<GearSetUsage> = pieces
        .into_iter()
        .map(|(name, pieces)| GearSetUsage {
            name: name.to_string(),
            pieces,
        })
        .collect();
    sets.sort_by(|a, b| b.pieces.cmp(&a.pieces).then_with(|| a.name.cmp(&b.name)));
    sets
}

fn ability_label(ability_id: i64, ctx: &ReportContext<'_>) -> String {
    if let Some(name) = ctx.abilities.name(ability_id) {
        return name.to_string();
    }
    match ctx.gear_sets.lookup_set_by_ability(ability_id) {
        Some(set) => format!("{} ({})", set, ability_id),
        None => ability_id.to_string(),
    }
}

fn skill_lines(encounter: &CombatEncounter, player: &PlayerInfo, ctx: &ReportContext<'_>) -> Vec<String> {
    let cast = encounter.abilities_cast.get(&player.unit_id);
    let names: HashSet<&str> = cast
        .into_iter()
        .flatten()
        .chain(player.front_bar.iter())
        .chain(player.back_bar.iter())
        .filter_map(|&id| ctx.abilities.name(id))
        .collect();
    infer_skill_lines(&names)
        .into_iter()
        .map(|line| line.name().to_string())
        .collect()
}

fn player_report(encounter: &CombatEncounter, player: &PlayerInfo, ctx: &ReportContext<'_>) -> PlayerReport {
    let duration = encounter.duration_ms();
    let damage = encounter.player_damage.get(&player.unit_id).copied().unwrap_or(0);
    let healing = encounter.player_healing.get(&player.unit_id).copied().unwrap_or(0);

    // The session record may have seen PLAYER_INFO after the encounter was
    // seeded. The short id may since belong to someone else.
    let session = ctx
        .players
        .find_player_by_unit_id(&player.unit_id)
        .filter(|p| p.handle == player.handle);
    let gear = if player.gear.is_empty() {
        session.map(|p| p.gear.as_slice()).unwrap_or_default()
    } else {
        player.gear.as_slice()
    };
    let maxima = session.map(|p| p.maxima).unwrap_or(player.maxima);

    let top_abilities = encounter
        .accumulated_data
        .get(&player.unit_id)
        .map(|acc| acc.top_damage_abilities(TOP_ABILITY_COUNT))
        .unwrap_or_default()
        .into_iter()
        .map(|(ability_id, tally)| AbilityTotal {
            ability_id,
            ability_name: ability_label(ability_id, ctx),
            total: tally.total,
            hits: tally.hits,
            crits: tally.crits,
        })
        .collect();

    PlayerReport {
        unit_id: player.unit_id.clone(),
        name: player.name().to_string(),
        handle: player.handle().to_string(),
        class_id: player.class_id,
        class_name: class_name(player.class_id).map(str::to_string),
        damage,
        healing,
        dps: per_second(damage, duration),
        hps: per_second(healing, duration),
        damage_percent: if encounter.total_damage > 0 {
            damage as f64 / encounter.total_damage as f64 * 100.0
        } else {
            0.0
        },
        maxima,
        gear_sets: gear_set_usage(gear, ctx.gear_sets),
        skill_lines: skill_lines(encounter, player, ctx),
        top_abilities,
    }
}

pub fn build_report(
    encounter: &CombatEncounter,
    display_name: String,
    ctx: &ReportContext<'_>,
) -> EncounterReport {
    let mut players: Vec<PlayerReport> = encounter
        .participants()
        .map(|p| player_report(encounter, p, ctx))
        .collect();
    players.sort_by(|a, b| b.damage.cmp(&a.damage).then_with(|| a.unit_id.cmp(&b.unit_id)));

    let hostiles = if ctx.list_hostiles {
        let mut names: Vec<String> = encounter
            .enemies
            .values()
            .filter(|u| u.is_hostile())
            .map(|u| u.name().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        names.sort();
        names.dedup();
        names
    } else {
        Vec::new()
    };

    EncounterReport {
        encounter_id: encounter.id,
        display_name,
        zone_name: encounter.zone_name.clone(),
        begin_line: encounter.begin_line,
        end_line: encounter.end_line,
        duration_ms: encounter.duration_ms(),
        total_damage: encounter.total_damage,
        total_healing: encounter.total_healing,
        players,
        hostiles,
    }
}
