//! onecrl2csv turns Mozilla's OneCRL certificate blocklist into flat CSV of
//! `("issuer DN","serial hex")` rows, reading either the remote JSON
//! collection or a legacy revocations.txt file.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::warn;

pub mod config;
pub mod decode;
pub mod error;
pub mod remote;
pub mod revocations;

pub use decode::{decode_name, decode_serial};
pub use error::OneCrlError;

/// A single blocklist entry: issuer name and serial number as base64
/// payloads, exactly as read from either source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationRecord {
    pub issuer_name: String,
    pub serial_number: String,
}

/// Hex rendering options for serial numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Separate serial bytes with colons
    pub separate: bool,
    /// Render hex digits in upper case
    pub upper: bool,
}

/// Decodes each record and writes one CSV row per record.
///
/// Output format is `"<issuer>","<serial>"` per line. Per-record decode
/// failures are logged and the row is still written with whatever partial
/// value was produced; only write failures abort.
pub fn write_csv<W: Write>(
    records: &[RevocationRecord],
    options: &OutputOptions,
    out: &mut W,
) -> Result<(), OneCrlError> {
    for record in records {
        write_record(record, options, out)?;
    }
    Ok(())
}

/// Streams a revocations file straight to CSV, one row per serial line.
///
/// Rows are written as the scanner reaches them, so a fatal format error
/// midway through the file still leaves the earlier rows on the output.
pub fn stream_csv<R: BufRead, W: Write>(
    reader: R,
    options: &OutputOptions,
    out: &mut W,
) -> Result<(), OneCrlError> {
    let mut parser = revocations::RevocationsParser::new();
    for line in reader.lines() {
        let line = line.map_err(|e| OneCrlError::FileIo {
            context: "revocations stream".to_string(),
            source: e,
        })?;
        if let Some(record) = parser.parse_line(&line)? {
            write_record(&record, options, out)?;
        }
    }
    Ok(())
}

/// Opens a revocations.txt file and streams it to CSV via [`stream_csv`].
pub fn stream_file<P: AsRef<Path>, W: Write>(
    path: P,
    options: &OutputOptions,
    out: &mut W,
) -> Result<(), OneCrlError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| OneCrlError::FileIo {
        context: path.display().to_string(),
        source: e,
    })?;
    stream_csv(BufReader::new(file), options, out)
}

fn write_record<W: Write>(
    record: &RevocationRecord,
    options: &OutputOptions,
    out: &mut W,
) -> Result<(), OneCrlError> {
    let (issuer, name_err) = decode::decode_name(&record.issuer_name);
    if let Some(err) = name_err {
        warn!("problem decoding issuer {}: {}", record.issuer_name, err);
    }
    let (serial, serial_err) =
        decode::decode_serial(&record.serial_number, options.separate, options.upper);
    if let Some(err) = serial_err {
        warn!("problem decoding serial {}: {}", record.serial_number, err);
    }
    writeln!(out, "\"{}\",\"{}\"", issuer, serial).map_err(|e| OneCrlError::FileIo {
        context: "CSV output".to_string(),
        source: e,
    })
}
