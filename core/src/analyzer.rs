//! Top-level façade over one ordered log stream.
//!
//! Lines go in strictly in file order; nothing here may reorder them. Per-line
//! failures are counted in [`ProcessStats`] and never returned as errors.

use esoparse_types::{AppConfig, EncounterReport};
use serde::Serialize;

use crate::combat_log::{LineError, LogEvent, LogParser};
use crate::encounter::CombatEncounter;
use crate::encounter::report::{ReportContext, build_report};
use crate::encounter::summary::EncounterHistory;
use crate::game_data::GearSetTable;
use crate::processor::{Dispatch, EventProcessor};
use crate::state::{
    AbilityCache, DEFAULT_RETAINED_ENCOUNTERS, EffectCache, EndlessDungeonProgress, LogInfo,
    PlayerRegistry, SessionCache, TrialProgress, ZoneInfo,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Trace dropped lines and attribution misses
    pub diagnostic_logging: bool,
    /// Trace every hostile unit as it is announced
    pub list_hostiles: bool,
    pub retained_encounters: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            diagnostic_logging: false,
            list_hostiles: false,
            retained_encounters: DEFAULT_RETAINED_ENCOUNTERS,
        }
    }
}

impl AnalyzerOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            diagnostic_logging: config.diagnostic_logging,
            list_hostiles: config.list_hostiles,
            retained_encounters: config.retained_encounters,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessStats {
    pub lines: u64,
    pub events: u64,
    pub lex_errors: u64,
    pub decode_errors: u64,
    pub unknown_event_types: u64,
    pub attribution_misses: u64,
    pub last_line_number: Option<u64>,
}

impl ProcessStats {
    /// Lines dropped before reaching the dispatcher.
    pub fn skipped_lines(&self) -> u64 {
        self.lex_errors + self.decode_errors + self.unknown_event_types
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Dispatched(Dispatch),
    Skipped(LineError),
}

impl LineOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, LineOutcome::Skipped(_))
    }
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    parser: LogParser,
    processor: EventProcessor,
    cache: SessionCache,
    stats: ProcessStats,
    options: AnalyzerOptions,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerOptions::default())
    }
}

impl Analyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            parser: LogParser::new(),
            processor: EventProcessor::new(options.diagnostic_logging, options.list_hostiles),
            cache: SessionCache::new(options.retained_encounters),
            stats: ProcessStats::default(),
            options,
        }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    // --- Processing ---

    /// Route one decoded event. Never fails.
    pub fn process(&mut self, event: LogEvent) -> Dispatch {
        self.stats.events += 1;
        self.stats.last_line_number = Some(event.line_number());
        let dispatch = self.processor.process_event(event, &mut self.cache);
        if dispatch == Dispatch::AttributionMiss {
            self.stats.attribution_misses += 1;
        }
        dispatch
    }

    /// Feed a line that was already lexed and decoded elsewhere (e.g. in parallel).
    pub fn process_result(&mut self, result: Result<LogEvent, LineError>) -> LineOutcome {
        self.stats.lines += 1;
        match result {
            Ok(event) => LineOutcome::Dispatched(self.process(event)),
            Err(err) => {
                self.record_skip(&err);
                LineOutcome::Skipped(err)
            }
        }
    }

    pub fn process_line(&mut self, line: &str) -> LineOutcome {
        let result = self.parser.parse_line(line);
        self.process_result(result)
    }

    pub fn process_lines<I, S>(&mut self, lines: I) -> ProcessStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.process_line(line.as_ref());
        }
        self.stats
    }

    /// Close an encounter left open at the end of a bulk parse.
    pub fn finish(&mut self) -> Option<u64> {
        let line = self.stats.last_line_number.unwrap_or(0);
        let closed = self.cache.close_current_encounter(line);
        if let Some(encounter_id) = closed {
            tracing::info!(line, encounter_id, "Closed encounter left open at end of log");
        }
        closed
    }

    fn record_skip(&mut self, err: &LineError) {
        match err {
            LineError::Lex(_) => self.stats.lex_errors += 1,
            LineError::Decode(_) => self.stats.decode_errors += 1,
            LineError::UnknownEventType { .. } => self.stats.unknown_event_types += 1,
        }
        if self.options.diagnostic_logging {
            tracing::debug!(line = self.stats.lines, error = %err, "Skipped line");
        }
    }

    // --- Reporting ---

    /// Full report for a retained (or the current) encounter.
    pub fn report(&self, encounter_id: u64, gear_sets: &GearSetTable) -> Option<EncounterReport> {
        let encounter = self.cache.encounter_by_id(encounter_id)?;
        let display_name = self
            .cache
            .encounter_history
            .summary_for(encounter_id)
            .map(|s| s.display_name.clone())
            .unwrap_or_else(|| format!("Encounter {}", encounter_id));
        let ctx = ReportContext {
            abilities: &self.cache.abilities,
            players: &self.cache.players,
            gear_sets,
            list_hostiles: self.options.list_hostiles,
        };
        Some(build_report(encounter, display_name, &ctx))
    }

    /// Reports for every retained closed encounter, oldest first.
    pub fn reports(&self, gear_sets: &GearSetTable) -> Vec<EncounterReport> {
        self.cache
            .encounters()
            .filter_map(|e| self.report(e.id, gear_sets))
            .collect()
    }

    // --- Accessors ---

    pub fn current_encounter(&self) -> Option<&CombatEncounter> {
        self.cache.current_encounter()
    }

    pub fn encounters(&self) -> impl Iterator<Item = &CombatEncounter> {
        self.cache.encounters()
    }

    pub fn history(&self) -> &EncounterHistory {
        &self.cache.encounter_history
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.cache.players
    }

    pub fn abilities(&self) -> &AbilityCache {
        &self.cache.abilities
    }

    pub fn effects(&self) -> &EffectCache {
        &self.cache.effects
    }

    pub fn stats(&self) -> ProcessStats {
        self.stats
    }

    pub fn zone(&self) -> &ZoneInfo {
        &self.cache.zone
    }

    pub fn log_info(&self) -> &LogInfo {
        &self.cache.log_info
    }

    pub fn trial(&self) -> Option<&TrialProgress> {
        self.cache.content.trial.as_ref()
    }

    pub fn endless_dungeon(&self) -> Option<&EndlessDungeonProgress> {
        self.cache.content.endless_dungeon.as_ref()
    }

    pub fn session(&self) -> &SessionCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "20000/20000,15000/15000,30000/30000,500/500,1000/1000,0,0.5,0.5,1.0";

    fn player_line(line: u64, unit_id: &str, handle: &str) -> String {
        format!(r#"{line},UNIT_ADDED,{unit_id},PLAYER,F,{unit_id},0,F,1,3,"Name {unit_id}","{handle}",0,50,1800,0,PLAYER_ALLY,T"#)
    }

    fn damage_line(line: u64, source: &str, amount: i64) -> String {
        format!("{line},COMBAT_EVENT,DAMAGE,FIRE,1,{amount},0,100,23234,{source},{BLOCK},90,{BLOCK}")
    }

    #[test]
    fn malformed_lines_never_lose_state() {
        let mut analyzer = Analyzer::default();
        analyzer.process_line(&player_line(1, "1", "@one"));
        analyzer.process_line("10,BEGIN_COMBAT");
        analyzer.process_line(&damage_line(20, "1", 500));

        for bad in [
            "invalid,line,with,wrong,format",
            "",
            "30,SOMETHING_NEW,1,2,3",
            "31,COMBAT_EVENT,DAMAGE",
            "32,UNIT_ADDED,\"unterminated",
        ] {
            assert!(analyzer.process_line(bad).is_skipped());
        }

        analyzer.process_line(&damage_line(40, "1", 250));
        let encounter = analyzer.current_encounter().unwrap();
        assert_eq!(encounter.player_damage.get("1"), Some(&750));
        assert_eq!(encounter.total_damage, 750);

        let stats = analyzer.stats();
        assert_eq!(stats.lines, 9);
        assert_eq!(stats.skipped_lines(), 5);
        assert_eq!(stats.unknown_event_types, 1);
        assert_eq!(stats.decode_errors, 1);
        assert_eq!(stats.lex_errors, 3);
    }

    #[test]
    fn finish_closes_open_encounter_and_reports() {
        let mut analyzer = Analyzer::default();
        analyzer.process_lines([
            player_line(1, "1", "@one"),
            r#"2,ABILITY_INFO,23234,"Flames of Oblivion","icon.dds",T,T"#.to_string(),
            "1000,BEGIN_COMBAT".to_string(),
            damage_line(1500, "1", 4000),
            damage_line(3000, "1", 2000),
        ]);
        assert_eq!(analyzer.finish(), Some(0));
        assert_eq!(analyzer.finish(), None);

        let report = analyzer.report(0, &GearSetTable::builtin()).unwrap();
        assert_eq!(report.duration_ms, 2000);
        assert_eq!(report.players[0].dps, 3000.0);
        assert_eq!(report.players[0].top_abilities[0].ability_name, "Flames of Oblivion");
        assert_eq!(analyzer.reports(&GearSetTable::builtin()).len(), 1);
        assert_eq!(analyzer.history().summaries().len(), 1);
    }

    #[test]
    fn unresolved_source_is_counted() {
        let mut analyzer = Analyzer::default();
        analyzer.process_line("10,BEGIN_COMBAT");
        let outcome = analyzer.process_line(&damage_line(20, "77", 500));
        assert_eq!(outcome, LineOutcome::Dispatched(Dispatch::AttributionMiss));
        assert_eq!(analyzer.stats().attribution_misses, 1);
        assert_eq!(analyzer.current_encounter().unwrap().total_damage, 0);
    }

    #[test]
    fn options_follow_config() {
        let config = AppConfig {
            list_hostiles: true,
            retained_encounters: 3,
            ..Default::default()
        };
        let options = AnalyzerOptions::from_config(&config);
        assert!(options.list_hostiles);
        assert!(!options.diagnostic_logging);
        assert_eq!(options.retained_encounters, 3);
    }
}
