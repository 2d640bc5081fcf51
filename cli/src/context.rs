use esoparse_core::context::{AppConfig, AppConfigExt, ParsingSession};
use esoparse_core::{AnalyzerOptions, GearSetTable};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to a parsing session, passed to the reader and tailer.
pub type SessionHandle = Arc<RwLock<ParsingSession>>;

/// Configuration and lookup tables loaded once at startup.
pub struct CliContext {
    pub config: AppConfig,
    pub gear_sets: GearSetTable,
}

impl CliContext {
    /// Fails only on configuration problems; nothing is parsed yet.
    pub fn load() -> Result<Self, String> {
        let config = AppConfig::load().map_err(error_chain)?;
        let gear_sets = config.load_gear_sets().map_err(error_chain)?;
        tracing::debug!(sets = gear_sets.set_count(), "Gear set table loaded");
        Ok(Self { config, gear_sets })
    }

    pub fn options(&self) -> AnalyzerOptions {
        AnalyzerOptions::from_config(&self.config)
    }

    pub fn start_session(&self, path: PathBuf) -> SessionHandle {
        Arc::new(RwLock::new(ParsingSession::new(path, self.options())))
    }
}

/// Render an error with its sources, e.g. "failed to load configuration: ...".
pub fn error_chain(err: impl std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
