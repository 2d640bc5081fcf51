mod config;
mod error;
mod interner;
mod parser;
pub mod watcher;

pub use config::{AppConfig, AppConfigExt, default_log_directory};
pub use error::{ConfigError, WatcherError};
pub use interner::{IStr, empty_istr, intern, interner, resolve};
pub use parser::{ParseResult, ParsingSession, parse_file, resolve_log_path};
pub use watcher::{ENCOUNTER_LOG_NAME, is_encounter_log, wait_for_log_file};
