use esoparse_core::context::{
    AppConfig, AppConfigExt, parse_file, resolve_log_path, wait_for_log_file,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::render::{render_json, render_report, render_stats, render_summary};
use crate::{CliContext, SessionHandle, error_chain};

const SUMMARY_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Parse a whole file, close anything left open and print every retained
/// encounter.
pub async fn parse(ctx: &CliContext, path: &Path, json: bool) -> Result<(), String> {
    let path = resolve_log_path(&ctx.config, path);
    let session = ctx.start_session(path);
    let result = parse_file(Arc::clone(&session)).await.map_err(error_chain)?;

    let mut s = session.write().await;
    s.analyzer.finish();
    let reports = s.analyzer.reports(&ctx.gear_sets);
    let stats = s.analyzer.stats();

    let mut stdout = std::io::stdout().lock();
    if json {
        writeln!(stdout, "{}", render_json(&reports)?).map_err(|e| e.to_string())?;
    } else {
        let log_info = s.analyzer.log_info();
        for report in &reports {
            let started = log_info.timestamp_for(report.begin_line);
            writeln!(stdout, "{}", render_report(report, started)).map_err(|e| e.to_string())?;
        }
        let evicted = s.analyzer.history().summaries().len().saturating_sub(reports.len());
        if evicted > 0 {
            writeln!(
                stdout,
                "{} older encounters evicted (retained_encounters = {})",
                evicted, ctx.config.retained_encounters
            )
            .map_err(|e| e.to_string())?;
        }
        writeln!(stdout, "{} in {}ms", render_stats(&stats), result.elapsed_ms)
            .map_err(|e| e.to_string())?;
    }
    tracing::info!(
        encounters = reports.len(),
        skipped = stats.skipped_lines(),
        "Parse complete"
    );
    Ok(())
}

/// Parse what is already in the file, then follow it and print a line for
/// each encounter as it closes. Runs until Ctrl-C.
pub async fn tail(ctx: &CliContext, path: Option<&Path>) -> Result<(), String> {
    let path = match path {
        Some(path) => resolve_log_path(&ctx.config, path),
        None => wait_for_log_file(Path::new(&ctx.config.log_directory))
            .await
            .map_err(error_chain)?,
    };

    let session = ctx.start_session(path.clone());
    let result = parse_file(Arc::clone(&session)).await.map_err(error_chain)?;
    let mut printed = print_new_summaries(&session, 0).await;
    println!("Following {} ({} encounters so far)", path.display(), printed);

    let mut tail_task = tokio::spawn(result.reader.tail_log_file());
    let mut interval = tokio::time::interval(SUMMARY_POLL_INTERVAL);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tail_task.abort();
                break;
            }
            joined = &mut tail_task => {
                return match joined {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(error_chain(e)),
                    Err(e) => Err(e.to_string()),
                };
            }
            _ = interval.tick() => {
                printed = print_new_summaries(&session, printed).await;
            }
        }
    }

    let s = session.read().await;
    println!("{}", render_stats(&s.analyzer.stats()));
    Ok(())
}

async fn print_new_summaries(session: &SessionHandle, already_printed: usize) -> usize {
    let s = session.read().await;
    let summaries = s.analyzer.history().summaries();
    for summary in summaries.iter().skip(already_printed) {
        println!("{}", render_summary(summary));
    }
    summaries.len()
}

pub fn show_config(config: &AppConfig) -> Result<(), String> {
    let json = serde_json::to_string_pretty(config).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub log_directory: Option<PathBuf>,
    pub diagnostic_logging: Option<bool>,
    pub list_hostiles: Option<bool>,
    pub retained_encounters: Option<usize>,
    pub gear_set_table: Option<PathBuf>,
    pub clear_gear_set_table: bool,
}

pub fn apply_config_update(config: &mut AppConfig, update: ConfigUpdate) {
    if let Some(dir) = update.log_directory {
        config.log_directory = dir.to_string_lossy().into_owned();
    }
    if let Some(value) = update.diagnostic_logging {
        config.diagnostic_logging = value;
    }
    if let Some(value) = update.list_hostiles {
        config.list_hostiles = value;
    }
    if let Some(value) = update.retained_encounters {
        config.retained_encounters = value;
    }
    if update.clear_gear_set_table {
        config.gear_set_table = None;
    } else if let Some(path) = update.gear_set_table {
        config.gear_set_table = Some(path.to_string_lossy().into_owned());
    }
}

/// Validate before saving so a bad value never reaches disk.
pub fn set_config(mut config: AppConfig, update: ConfigUpdate) -> Result<(), String> {
    apply_config_update(&mut config, update);
    config.validate().map_err(error_chain)?;
    config.load_gear_sets().map_err(error_chain)?;
    config.save().map_err(error_chain)?;
    tracing::info!(log_directory = %config.log_directory, "Configuration saved");
    show_config(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_touches_only_given_fields() {
        let mut config = AppConfig::with_log_directory("/logs".to_string());
        config.gear_set_table = Some("/sets.toml".to_string());
        apply_config_update(
            &mut config,
            ConfigUpdate {
                list_hostiles: Some(true),
                retained_encounters: Some(4),
                ..Default::default()
            },
        );
        assert_eq!(config.log_directory, "/logs");
        assert!(config.list_hostiles);
        assert!(!config.diagnostic_logging);
        assert_eq!(config.retained_encounters, 4);
        assert_eq!(config.gear_set_table.as_deref(), Some("/sets.toml"));

        apply_config_update(
            &mut config,
            ConfigUpdate {
                clear_gear_set_table: true,
                gear_set_table: Some(PathBuf::from("/other.toml")),
                ..Default::default()
            },
        );
        assert!(config.gear_set_table.is_none());
    }

    #[test]
    fn invalid_retention_is_not_saved() {
        let result = set_config(
            AppConfig::default(),
            ConfigUpdate {
                retained_encounters: Some(0),
                ..Default::default()
            },
        );
        assert!(result.unwrap_err().contains("retained_encounters"));
    }
}
