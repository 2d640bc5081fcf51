use super::*;

#[cfg(test)]
mod tests;

/// Lex + decode for one raw log line.
///
/// Stateless; every line is parsed independently of the ones before it.
/// Cross-record state (identities, encounters) lives in the analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogParser;

impl LogParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_line(&self, line: &str) -> Result<LogEvent, LineError> {
        let raw = lex_line(line)?;
        decode_line(&raw)
    }

    /// Same as [`parse_line`](Self::parse_line) but drops the failure reason.
    pub fn parse_line_opt(&self, line: &str) -> Option<LogEvent> {
        self.parse_line(line).ok()
    }
}
