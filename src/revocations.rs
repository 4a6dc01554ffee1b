//! Parser for the legacy `revocations.txt` blocklist format.
//!
//! The file is line oriented: a non-indented line introduces a base64
//! issuer name, each following line indented with a single space holds a
//! base64 serial number revoked under that issuer, and `#` lines are
//! comments. Lines indented with a tab carry subject / public-key-hash
//! entries, which this tool does not support and refuses to skip silently.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::OneCrlError;
use crate::RevocationRecord;

/// Line scanner state: the issuer in effect for subsequent serial lines.
///
/// A serial line pairs with the most recent issuer line, so one issuer can
/// yield any number of records. A serial line with no issuer in effect is
/// a fatal format violation.
#[derive(Debug, Default)]
pub struct RevocationsParser {
    issuer: String,
    line: usize,
}

impl RevocationsParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line to the scanner, yielding a record when the line is a
    /// serial entry under the current issuer.
    pub fn parse_line(&mut self, line: &str) -> Result<Option<RevocationRecord>, OneCrlError> {
        self.line += 1;
        if line.starts_with('#') {
            return Ok(None);
        }
        if line.starts_with(' ') {
            if self.issuer.is_empty() {
                return Err(OneCrlError::MalformedRecord {
                    line: self.line,
                    reason: "a serial number with no issuer is not valid".to_string(),
                });
            }
            return Ok(Some(RevocationRecord {
                issuer_name: self.issuer.clone(),
                serial_number: line.trim_matches(' ').to_string(),
            }));
        }
        if line.starts_with('\t') {
            return Err(OneCrlError::UnsupportedFormat { line: self.line });
        }
        // anything else, including an empty line, replaces the issuer
        self.issuer = line.to_string();
        Ok(None)
    }
}

/// Scans a whole revocations stream into records.
///
/// A trailing issuer with no serial lines is silently dropped.
pub fn read_revocations<R: BufRead>(reader: R) -> Result<Vec<RevocationRecord>, OneCrlError> {
    let mut parser = RevocationsParser::new();
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| OneCrlError::FileIo {
            context: "revocations stream".to_string(),
            source: e,
        })?;
        if let Some(record) = parser.parse_line(&line)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Loads records from a revocations.txt file on disk.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<RevocationRecord>, OneCrlError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| OneCrlError::FileIo {
        context: path.display().to_string(),
        source: e,
    })?;
    read_revocations(BufReader::new(file))
}
