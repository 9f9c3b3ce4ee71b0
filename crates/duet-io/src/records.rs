//! Parsing of raw input lines into character records.
//!
//! Each line is whitespace-split into `charid`, `label`, and a sequence of
//! words. `charid` is expected to carry its book name as the substring
//! before the first `|`; everything after that point (including further
//! `|` characters) is left alone as part of the character id.

use crate::error::{IoError, IoResult};

/// One character's raw record: its book, its own id, and its word tokens
/// as they appeared in the source line (not yet mapped through a vocabulary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub bookname: String,
    pub charid: String,
    pub label: String,
    pub words: Vec<String>,
}

/// Split a trimmed, non-empty line into `(charid, label, words)`, or an
/// `InputMalformed` error if it has fewer than three whitespace-separated
/// fields or its `charid` carries no `|`.
pub fn split_fields(line: &str, line_no: usize) -> IoResult<(String, String, Vec<String>)> {
    let mut fields = line.split_whitespace();
    let charid = fields
        .next()
        .ok_or_else(|| IoError::malformed(line_no, "missing charid field"))?;
    let label = fields
        .next()
        .ok_or_else(|| IoError::malformed(line_no, "missing label field"))?;
    let words: Vec<String> = fields.map(str::to_string).collect();

    if words.is_empty() {
        return Err(IoError::malformed(line_no, "fewer than three fields"));
    }

    if !charid.contains('|') {
        return Err(IoError::malformed(
            line_no,
            format!("charid {charid:?} has no book separator"),
        ));
    }

    Ok((charid.to_string(), label.to_string(), words))
}

/// Parse a full `Record` from a trimmed, non-empty line.
pub fn parse_line(line: &str, line_no: usize) -> IoResult<Record> {
    let (charid, label, words) = split_fields(line, line_no)?;
    let bookname = charid
        .split('|')
        .next()
        .expect("split always yields at least one piece")
        .to_string();
    Ok(Record {
        bookname,
        charid,
        label,
        words,
    })
}
