//! Text and JSON rendering of encounter reports.

use chrono::{DateTime, Local, Utc};
use esoparse_core::{EncounterSummary, ProcessStats};
use esoparse_types::{EncounterReport, PlayerReport};
use std::fmt::Write;

pub fn format_duration(duration_ms: u64) -> String {
    let secs = duration_ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Thousands-separated integer, e.g. 1,234,567
pub fn format_number(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn player_label(player: &PlayerReport) -> String {
    match (&player.class_name, player.handle.is_empty()) {
        (Some(class), false) => format!("{} {} ({})", player.name, player.handle, class),
        (Some(class), true) => format!("{} ({})", player.name, class),
        (None, false) => format!("{} {}", player.name, player.handle),
        (None, true) => player.name.clone(),
    }
}

pub fn render_report(report: &EncounterReport, started: Option<DateTime<Utc>>) -> String {
    let mut out = String::new();
    let _ = write!(out, "== {} ", report.display_name);
    if let Some(zone) = &report.zone_name {
        let _ = write!(out, "[{}] ", zone);
    }
    let _ = write!(out, "{}", format_duration(report.duration_ms));
    if let Some(started) = started {
        let _ = write!(
            out,
            " @ {}",
            started.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        );
    }
    out.push('\n');
    let _ = writeln!(
        out,
        "   damage {}  healing {}",
        format_number(report.total_damage),
        format_number(report.total_healing)
    );

    for player in &report.players {
        let _ = writeln!(
            out,
            "   {:<40} {:>12} dmg {:>9.0} dps {:>5.1}%  {:>10} heal {:>8.0} hps",
            player_label(player),
            format_number(player.damage),
            player.dps,
            player.damage_percent,
            format_number(player.healing),
            player.hps,
        );
        let m = player.maxima;
        if m.health + m.magicka + m.stamina > 0 {
            let _ = writeln!(
                out,
                "      max health {}  magicka {}  stamina {}",
                format_number(m.health),
                format_number(m.magicka),
                format_number(m.stamina)
            );
        }
        if !player.skill_lines.is_empty() {
            let _ = writeln!(out, "      skill lines: {}", player.skill_lines.join(", "));
        }
        if !player.gear_sets.is_empty() {
            let sets: Vec<String> = player
                .gear_sets
                .iter()
                .map(|s| format!("{} ({})", s.name, s.pieces))
                .collect();
            let _ = writeln!(out, "      gear: {}", sets.join(", "));
        }
        for ability in &player.top_abilities {
            let _ = writeln!(
                out,
                "      {:<34} {:>12}  {} hits, {} crits",
                ability.ability_name,
                format_number(ability.total),
                ability.hits,
                ability.crits
            );
        }
    }

    if !report.hostiles.is_empty() {
        let _ = writeln!(out, "   hostiles: {}", report.hostiles.join(", "));
    }
    out
}

/// One line per closed encounter, used while tailing.
pub fn render_summary(summary: &EncounterSummary) -> String {
    let top = summary
        .player_metrics
        .first()
        .map(|m| format!("  top {} {:.0} dps", m.name, m.dps))
        .unwrap_or_default();
    format!(
        "{} {}  damage {}  healing {}{}",
        summary.display_name,
        format_duration(summary.duration_ms),
        format_number(summary.total_damage),
        format_number(summary.total_healing),
        top
    )
}

pub fn render_stats(stats: &ProcessStats) -> String {
    format!(
        "{} lines, {} events, {} skipped ({} lex, {} decode, {} unknown type), {} unattributed",
        stats.lines,
        stats.events,
        stats.skipped_lines(),
        stats.lex_errors,
        stats.decode_errors,
        stats.unknown_event_types,
        stats.attribution_misses
    )
}

pub fn render_json(reports: &[EncounterReport]) -> Result<String, String> {
    serde_json::to_string_pretty(reports).map_err(|e| e.to_string())
}
