mod decoders;
mod error;
mod lexer;
mod log_event;
mod parser;
mod reader;
mod registry;
mod snapshot;

pub use decoders::FieldCursor;
pub use error::{DecodeError, LexError, LineError, ReaderError};
pub use lexer::{RawLine, lex_line, split_list};
pub use log_event::*;
pub use parser::LogParser;
pub use reader::{ParsedFile, Reader};
pub use registry::{Decoder, decode_line, is_registered, lookup_decoder, registered_event_types};
pub use snapshot::{
    ResourceSnapshot, SNAPSHOT_MAX_FIELDS, SNAPSHOT_MIN_FIELDS, decode_snapshot, parse_pair,
};
