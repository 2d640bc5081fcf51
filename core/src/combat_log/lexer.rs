//! Envelope splitting for encounter log lines.
//!
//! `seq_no,EVENT_TYPE,field,"quoted, field",[bracket,group],...`

use std::borrow::Cow;

use memchr::{memchr, memchr2};

use super::LexError;

/// One line split into its envelope and raw payload fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLine<'a> {
    pub line_number: u64,
    pub event_type: &'a str,
    pub fields: Vec<Cow<'a, str>>,
}

/// Split a raw line into sequence number, event type token and fields.
pub fn lex_line(line: &str) -> Result<RawLine<'_>, LexError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(LexError::Empty);
    }

    let bytes = line.as_bytes();
    let Some(seq_end) = memchr(b',', bytes) else {
        // A bare number is a truncated line, anything else is garbage
        return match line.parse::<u64>() {
            Ok(line_number) => Err(LexError::MissingEventType { line_number }),
            Err(_) => Err(LexError::InvalidSequence {
                segment: line.to_string(),
            }),
        };
    };

    let seq_segment = &line[..seq_end];
    let line_number = seq_segment
        .parse::<u64>()
        .map_err(|_| LexError::InvalidSequence {
            segment: seq_segment.to_string(),
        })?;

    let rest = &line[seq_end + 1..];
    let (event_type, payload) = match memchr(b',', rest.as_bytes()) {
        Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
        None => (rest, None),
    };

    if event_type.is_empty() {
        return Err(LexError::MissingEventType { line_number });
    }
    if !is_event_token(event_type) {
        return Err(LexError::InvalidEventType {
            line_number,
            token: event_type.to_string(),
        });
    }

    let fields = match payload {
        Some(payload) => split_fields(line_number, payload)?,
        None => Vec::new(),
    };

    Ok(RawLine {
        line_number,
        event_type,
        fields,
    })
}

fn is_event_token(token: &str) -> bool {
    token
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// Split a payload on top-level commas. Quoted fields are unquoted,
/// bracket groups are kept verbatim.
fn split_fields(line_number: u64, input: &str) -> Result<Vec<Cow<'_, str>>, LexError> {
    let bytes = input.as_bytes();
    let mut fields = Vec::with_capacity(24);
    let mut pos = 0;

    loop {
        let (field, next) = match bytes.get(pos) {
            Some(b'"') => read_quoted(line_number, input, pos)?,
            Some(b'[') => {
                let end = find_group_end(bytes, pos).ok_or(LexError::Unterminated {
                    line_number,
                    delimiter: ']',
                })?;
                (Cow::Borrowed(&input[pos..=end]), end + 1)
            }
            _ => {
                let end = memchr(b',', &bytes[pos..]).map_or(bytes.len(), |e| pos + e);
                (Cow::Borrowed(&input[pos..end]), end)
            }
        };
        fields.push(field);

        // Skip anything trailing a closed quote/group up to the separator
        match memchr(b',', &bytes[next.min(bytes.len())..]) {
            Some(offset) => pos = next + offset + 1,
            None => break,
        }
    }

    Ok(fields)
}

/// Read a quoted field starting at `start` (the opening quote).
/// Returns the unescaped value and the position just past the closing quote.
fn read_quoted(line_number: u64, input: &str, start: usize) -> Result<(Cow<'_, str>, usize), LexError> {
    let bytes = input.as_bytes();
    let mut owned: Option<String> = None;
    let mut chunk_start = start + 1;
    let mut pos = start + 1;

    while let Some(offset) = memchr2(b'"', b'\\', &bytes[pos..]) {
        let at = pos + offset;
        let escaped_quote = match bytes[at] {
            b'\\' => at + 1 < bytes.len(),
            _ => bytes.get(at + 1) == Some(&b'"'),
        };

        if !escaped_quote {
            if bytes[at] == b'\\' {
                // lone trailing backslash
                break;
            }
            let value = match owned {
                Some(mut s) => {
                    s.push_str(&input[chunk_start..at]);
                    Cow::Owned(s)
                }
                None => Cow::Borrowed(&input[chunk_start..at]),
            };
            return Ok((value, at + 1));
        }

        let s = owned.get_or_insert_with(String::new);
        s.push_str(&input[chunk_start..at]);
        // `\x` keeps x, `""` keeps one quote
        let escaped = &input[at + 1..];
        let ch_len = escaped.chars().next().map_or(1, char::len_utf8);
        s.push_str(&escaped[..ch_len]);
        chunk_start = at + 1 + ch_len;
        pos = chunk_start;
    }

    Err(LexError::Unterminated {
        line_number,
        delimiter: '"',
    })
}

/// Find the index of the `]` closing the group opened at `start`.
fn find_group_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_quotes => i += 1,
            b'"' => in_quotes = !in_quotes,
            b'[' if !in_quotes => depth += 1,
            b']' if !in_quotes => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split the inside of a bracket group (`[a,b,[c,d]]`) into its top-level
/// items. Nested groups are returned verbatim. Returns `None` when the input
/// is not a well-formed group.
pub fn split_list(group: &str) -> Option<Vec<&str>> {
    let bytes = group.as_bytes();
    if bytes.first() != Some(&b'[') || find_group_end(bytes, 0)? != bytes.len() - 1 {
        return None;
    }

    let inner = &group[1..group.len() - 1];
    if inner.is_empty() {
        return Some(Vec::new());
    }

    let inner_bytes = inner.as_bytes();
    let mut items = Vec::new();
    let mut pos = 0;
    loop {
        let end = if inner_bytes.get(pos) == Some(&b'[') {
            find_group_end(inner_bytes, pos)? + 1
        } else {
            memchr(b',', &inner_bytes[pos..]).map_or(inner_bytes.len(), |e| pos + e)
        };
        items.push(inner[pos..end].trim_matches('"'));
        match memchr(b',', &inner_bytes[end..]) {
            Some(offset) => pos = end + offset + 1,
            None => break,
        }
    }
    Some(items)
}
