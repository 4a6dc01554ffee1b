//! End-to-end tests: revocations.txt file through to CSV output.

use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tempfile::NamedTempFile;

use onecrl2csv::{
    revocations, stream_file, write_csv, OneCrlError, OutputOptions, RevocationRecord,
};

// SEQUENCE { SET { SEQUENCE { OID 2.5.4.3, PrintableString "Test" } } }
const CN_TEST: &[u8] = &[
    0x30, 0x0F, 0x31, 0x0D, 0x30, 0x0B, 0x06, 0x03, 0x55, 0x04, 0x03, 0x13, 0x04, b'T', b'e',
    b's', b't',
];

fn revocations_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_to_csv_shares_issuer_across_serials() {
    let issuer = BASE64.encode(CN_TEST);
    let content = format!(
        "# OneCRL revocations\n{}\n {}\n {}\n",
        issuer,
        BASE64.encode([0x01, 0x02]),
        BASE64.encode([0x03, 0x04]),
    );
    let file = revocations_file(&content);

    let records = revocations::load_file(file.path()).unwrap();
    let mut out = Vec::new();
    write_csv(&records, &OutputOptions::default(), &mut out).unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(output, "\"CN=Test\",\"0102\"\n\"CN=Test\",\"0304\"\n");
}

#[test]
fn test_file_to_csv_with_separate_and_upper() {
    let issuer = BASE64.encode(CN_TEST);
    let content = format!("{}\n {}\n", issuer, BASE64.encode([0xAB, 0xCD]));
    let file = revocations_file(&content);

    let records = revocations::load_file(file.path()).unwrap();
    let options = OutputOptions {
        separate: true,
        upper: true,
    };
    let mut out = Vec::new();
    write_csv(&records, &options, &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "\"CN=Test\",\"AB:CD\"\n");
}

#[test]
fn test_serial_without_issuer_aborts_the_load() {
    let file = revocations_file(" QUJD\n");
    let err = revocations::load_file(file.path()).unwrap_err();
    assert!(matches!(err, OneCrlError::MalformedRecord { .. }));
}

#[test]
fn test_key_hash_line_aborts_the_load() {
    let issuer = BASE64.encode(CN_TEST);
    let content = format!("{}\n QUJD\n\tc3ViamVjdA==\n", issuer);
    let file = revocations_file(&content);
    let err = revocations::load_file(file.path()).unwrap_err();
    assert!(matches!(err, OneCrlError::UnsupportedFormat { .. }));
}

#[test]
fn test_streamed_file_keeps_rows_written_before_a_fatal_line() {
    let issuer = BASE64.encode(CN_TEST);
    let content = format!(
        "{}\n {}\n\tc3ViamVjdA==\n",
        issuer,
        BASE64.encode([0x01, 0x02]),
    );
    let file = revocations_file(&content);

    let mut out = Vec::new();
    let err = stream_file(file.path(), &OutputOptions::default(), &mut out).unwrap_err();
    assert!(matches!(err, OneCrlError::UnsupportedFormat { .. }));
    assert_eq!(String::from_utf8(out).unwrap(), "\"CN=Test\",\"0102\"\n");
}

#[test]
fn test_comment_only_file_emits_nothing() {
    let file = revocations_file("# a\n# b\n# c\n");
    let records = revocations::load_file(file.path()).unwrap();
    assert!(records.is_empty());

    let mut out = Vec::new();
    write_csv(&records, &OutputOptions::default(), &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_undecodable_record_still_emits_a_row() {
    let records = vec![RevocationRecord {
        issuer_name: "not-base64!".to_string(),
        serial_number: "!!! not base64".to_string(),
    }];
    let mut out = Vec::new();
    write_csv(&records, &OutputOptions::default(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "\"\",\"\"\n");
}
