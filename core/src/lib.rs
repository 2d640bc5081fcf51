pub mod analyzer;
pub mod combat_log;
pub mod context;
pub mod encounter;
pub mod game_data;
pub mod processor;
pub mod state;

// Re-exports for convenience
pub use analyzer::{Analyzer, AnalyzerOptions, LineOutcome, ProcessStats};
pub use combat_log::*;
pub use context::watcher as directory_watcher;
pub use encounter::metrics::PlayerMetrics;
pub use encounter::summary::{EncounterHistory, EncounterSummary};
pub use encounter::{CombatEncounter, EncounterState};
pub use game_data::*;
pub use processor::{CombatTransition, Dispatch, EventProcessor};
pub use state::SessionCache;
