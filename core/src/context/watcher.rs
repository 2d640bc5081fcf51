use crate::context::WatcherError;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc::{self, Receiver};
use tokio::time::{Instant, sleep};

/// File name the game writes while encounter logging is on.
pub const ENCOUNTER_LOG_NAME: &str = "Encounter.log";

const NEW_FILE_TIMEOUT: Duration = Duration::from_secs(5);
const NEW_FILE_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub enum DirectoryEvent {
    /// The encounter log was created and has content
    LogCreated(PathBuf),
    LogRemoved(PathBuf),
    Error(String),
}

pub struct DirectoryWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
}

impl DirectoryWatcher {
    pub fn new(path: &Path) -> Result<Self, WatcherError> {
        if !path.is_dir() {
            return Err(WatcherError::MissingDirectory {
                path: path.to_path_buf(),
            });
        }
        let (tx, rx) = mpsc::channel(100);

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.blocking_send(res);
            },
            Config::default(),
        )
        .map_err(WatcherError::InitWatcher)?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|source| WatcherError::WatchPath {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    pub async fn next_event(&mut self) -> Option<DirectoryEvent> {
        while let Some(event_result) = self.rx.recv().await {
            match event_result {
                Ok(event) => {
                    if let Some(watcher_event) = self.process_event(event).await {
                        return Some(watcher_event);
                    }
                }
                Err(e) => {
                    return Some(DirectoryEvent::Error(format!(
                        "Directory watcher error: {}",
                        e
                    )));
                }
            }
        }
        None
    }

    async fn process_event(&mut self, event: Event) -> Option<DirectoryEvent> {
        match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) => {
                for path in event.paths {
                    if is_encounter_log(&path) && wait_for_content(&path).await {
                        return Some(DirectoryEvent::LogCreated(path));
                    }
                }
            }
            EventKind::Remove(_) => {
                for path in event.paths {
                    if is_encounter_log(&path) {
                        tracing::info!(path = %path.display(), "Encounter log removed");
                        return Some(DirectoryEvent::LogRemoved(path));
                    }
                }
            }
            _ => {}
        }
        None
    }
}

/// The game may create the file before writing its first line.
async fn wait_for_content(path: &Path) -> bool {
    let start = Instant::now();
    while start.elapsed() < NEW_FILE_TIMEOUT {
        if path.metadata().map(|m| m.len()).unwrap_or(0) > 0 {
            return true;
        }
        sleep(NEW_FILE_POLL_INTERVAL).await;
    }
    tracing::warn!(path = %path.display(), "Timed out waiting for content");
    false
}

pub fn is_encounter_log(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.eq_ignore_ascii_case(ENCOUNTER_LOG_NAME))
        .unwrap_or(false)
}

/// Return the encounter log in `dir`, waiting for the game to create it.
pub async fn wait_for_log_file(dir: &Path) -> Result<PathBuf, WatcherError> {
    let existing = dir.join(ENCOUNTER_LOG_NAME);
    // Watch before checking so a file created in between is not missed
    let mut watcher = DirectoryWatcher::new(dir)?;
    if existing.is_file() {
        return Ok(existing);
    }

    tracing::info!(dir = %dir.display(), "Waiting for encounter log");
    while let Some(event) = watcher.next_event().await {
        match event {
            DirectoryEvent::LogCreated(path) => {
                tracing::info!(path = %path.display(), "Encounter log created");
                return Ok(path);
            }
            DirectoryEvent::LogRemoved(_) => {}
            DirectoryEvent::Error(message) => tracing::warn!(%message, "Watcher error"),
        }
    }
    Err(WatcherError::Closed { path: existing })
}
