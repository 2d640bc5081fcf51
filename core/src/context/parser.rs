use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::analyzer::{Analyzer, AnalyzerOptions, ProcessStats};
use crate::combat_log::{Reader, ReaderError};
use crate::context::AppConfig;

/// One log stream: the file being read, how far it has been read, and the
/// analyzer fed from it. Each stream gets its own session.
#[derive(Debug, Default)]
pub struct ParsingSession {
    pub current_byte: Option<u64>,
    pub active_file: Option<PathBuf>,
    pub analyzer: Analyzer,
}

impl ParsingSession {
    pub fn new(path: PathBuf, options: AnalyzerOptions) -> Self {
        Self {
            current_byte: None,
            active_file: Some(path),
            analyzer: Analyzer::new(options),
        }
    }
}

/// Resolve a log file path, joining with log_directory if relative.
pub fn resolve_log_path(config: &AppConfig, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(&config.log_directory).join(path)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Parsing Helper
// ─────────────────────────────────────────────────────────────────────────────

/// Result of parsing a log file
pub struct ParseResult {
    pub lines: usize,
    pub stats: ProcessStats,
    pub elapsed_ms: u128,
    pub reader: Reader,
    pub end_pos: u64,
}

/// Parse the whole file behind the session and feed it to the analyzer in order.
///
/// The returned reader can continue with [`Reader::tail_log_file`] from `end_pos`.
/// An encounter still open at the end of the file stays open for the tailer.
pub async fn parse_file(state: Arc<RwLock<ParsingSession>>) -> Result<ParseResult, ReaderError> {
    let timer = std::time::Instant::now();

    let active_path = {
        let s = state.read().await;
        s.active_file.clone().unwrap_or_default()
    };

    let reader = Reader::from(active_path, Arc::clone(&state));
    let parsed = reader.read_log_file()?;
    let lines = parsed.results.len();

    let stats = {
        let mut s = state.write().await;
        for result in parsed.results {
            s.analyzer.process_result(result);
        }
        s.current_byte = Some(parsed.end_pos);
        s.analyzer.stats()
    };

    let elapsed_ms = timer.elapsed().as_millis();
    tracing::info!(
        path = %reader.path().display(),
        lines,
        skipped = stats.skipped_lines(),
        elapsed_ms = elapsed_ms as u64,
        "Parsed log file"
    );

    Ok(ParseResult {
        lines,
        stats,
        elapsed_ms,
        reader,
        end_pos: parsed.end_pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn relative_paths_join_log_directory() {
        let config = AppConfig::with_log_directory("/logs".to_string());
        assert_eq!(
            resolve_log_path(&config, Path::new("Encounter.log")),
            PathBuf::from("/logs/Encounter.log")
        );
        assert_eq!(
            resolve_log_path(&config, Path::new("/tmp/other.log")),
            PathBuf::from("/tmp/other.log")
        );
    }

    #[tokio::test]
    async fn parse_file_feeds_analyzer_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let block = "1000/1000,1/1,1/1,0/0,0/0,0,0.5,0.5,1.0";
        writeln!(file, r#"1,UNIT_ADDED,1,PLAYER,T,1,0,F,1,3,"Aela","@aela",0,50,10,0,PLAYER_ALLY,F"#).unwrap();
        writeln!(file, "10,BEGIN_COMBAT").unwrap();
        writeln!(file, "11,COMBAT_EVENT,DAMAGE,FIRE,1,300,0,1,2,1,{block},90,{block}").unwrap();
        writeln!(file, "12,not a line").unwrap();
        writeln!(file, "20,END_COMBAT").unwrap();

        let state = Arc::new(RwLock::new(ParsingSession::new(
            file.path().to_path_buf(),
            AnalyzerOptions::default(),
        )));
        let result = parse_file(Arc::clone(&state)).await.unwrap();

        assert_eq!(result.lines, 5);
        assert_eq!(result.stats.skipped_lines(), 1);
        let session = state.read().await;
        assert_eq!(session.current_byte, Some(result.end_pos));
        let encounter = session.analyzer.encounters().next().unwrap();
        assert_eq!(encounter.total_damage, 300);
    }
}
