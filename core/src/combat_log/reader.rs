use crate::combat_log::{LineError, LogEvent, LogParser, ReaderError};
use crate::context::ParsingSession;
use encoding_rs::UTF_8;
use memchr::memchr_iter;
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs;
use std::io::SeekFrom;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::sync::RwLock;
use tokio::time::{Duration, sleep};

const TAIL_SLEEP_DURATION: Duration = Duration::from_millis(100);

/// Per-line parse results for a whole file, in file order.
pub struct ParsedFile {
    pub results: Vec<Result<LogEvent, LineError>>,
    /// Byte offset just past the last line read
    pub end_pos: u64,
}

pub struct Reader {
    path: PathBuf,
    state: Arc<RwLock<ParsingSession>>,
}

impl Reader {
    pub fn from(file_path: PathBuf, state: Arc<RwLock<ParsingSession>>) -> Self {
        Reader {
            path: file_path,
            state,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Lex and decode the whole file in parallel.
    ///
    /// Lines are independent at this stage; results keep file order so the
    /// caller can feed them to the analyzer sequentially.
    pub fn read_log_file(&self) -> Result<ParsedFile, ReaderError> {
        let file = fs::File::open(&self.path).map_err(|source| ReaderError::OpenFile {
            path: self.path.clone(),
            source,
        })?;
        // SAFETY: the game only appends to its log; the map is read-only and
        // dropped before this function returns.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| ReaderError::MemoryMap {
            path: self.path.clone(),
            source,
        })?;
        let bytes = mmap.as_ref();

        let mut line_ranges: Vec<(usize, usize)> = Vec::new();
        let mut start = 0;
        for end in memchr_iter(b'\n', bytes) {
            if end > start {
                line_ranges.push((start, end));
            }
            start = end + 1;
        }
        // A trailing line without newline may still be in flight; leave it
        // for the tailer.
        let end_pos = start as u64;

        let parser = LogParser::new();
        let results = line_ranges
            .par_iter()
            .map(|&(start, end)| {
                // Lossy decode strips a leading BOM
                let (line, _, _) = UTF_8.decode(&bytes[start..end]);
                parser.parse_line(&line)
            })
            .collect();

        Ok(ParsedFile { results, end_pos })
    }

    /// Follow the file from the session's current byte offset, feeding each
    /// complete line to the session's analyzer. Runs until the file errors.
    pub async fn tail_log_file(self) -> Result<(), ReaderError> {
        let file = File::open(&self.path)
            .await
            .map_err(|source| ReaderError::OpenFile {
                path: self.path.clone(),
                source,
            })?;
        let mut reader = BufReader::new(file);
        let pos = self.state.read().await.current_byte.unwrap_or(0);

        reader
            .seek(SeekFrom::Start(pos))
            .await
            .map_err(|source| ReaderError::Seek {
                path: self.path.clone(),
                source,
            })?;

        let parser = LogParser::new();
        let mut buf = Vec::new();
        let mut offset = pos;

        loop {
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    sleep(TAIL_SLEEP_DURATION).await;
                    continue;
                }
                Ok(_) => {
                    // Only process complete lines; partial data stays in buf
                    if buf.ends_with(b"\n") {
                        let (line, _, _) = UTF_8.decode(&buf);
                        let result = (!line.trim().is_empty()).then(|| parser.parse_line(&line));
                        offset += buf.len() as u64;
                        let mut state = self.state.write().await;
                        if let Some(result) = result {
                            state.analyzer.process_result(result);
                        }
                        state.current_byte = Some(offset);
                        buf.clear();
                    }
                }
                Err(source) => {
                    tracing::error!(path = %self.path.display(), error = %source, "Tail read failed");
                    return Err(ReaderError::ReadFile {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }
    }
}
