//! Error types for encounter log parsing

use std::path::PathBuf;
use thiserror::Error;

/// Envelope-level failures: the line could not be split into
/// `seq_no, event_type, fields...`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("empty line")]
    Empty,

    #[error("invalid sequence number: {segment}")]
    InvalidSequence { segment: String },

    #[error("missing event type after sequence number {line_number}")]
    MissingEventType { line_number: u64 },

    #[error("invalid event type token at line {line_number}: {token}")]
    InvalidEventType { line_number: u64, token: String },

    #[error("unterminated {delimiter} at line {line_number}")]
    Unterminated { line_number: u64, delimiter: char },
}

/// Record-level failures: the event type is known but its fields don't
/// match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{event_type} at line {line_number}: expected at least {expected} fields, found {found}")]
    TooFewFields {
        line_number: u64,
        event_type: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{event_type} at line {line_number}: field {index} ({name}) has invalid value {value:?}")]
    InvalidField {
        line_number: u64,
        event_type: &'static str,
        index: usize,
        name: &'static str,
        value: String,
    },
}

/// Failure to turn one raw line into a typed event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Not a failure of the log: the token is simply not one we decode.
    #[error("unknown event type {token} at line {line_number}")]
    UnknownEventType { line_number: u64, token: String },
}

/// Errors during log file reading operations
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("failed to open log file {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to memory map file {path}")]
    MemoryMap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to seek in file {path}")]
    Seek {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
