//! Decoding of OneCRL issuer names and serial numbers.
//!
//! Issuer names arrive as base64-wrapped DER `RDNSequence` structures and
//! are rendered as an RFC 4514-ish string (comma-joined `TYPE=value`
//! segments, least-significant component first). Serial numbers arrive as
//! base64-wrapped byte strings and are rendered as hex.
//!
//! Decode failures here are per-record: the caller logs them and keeps
//! going with whatever partial value was produced.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::{DecodeError, Engine};
use const_oid::ObjectIdentifier;
use der::asn1::{Ia5StringRef, PrintableStringRef, TeletexStringRef, Utf8StringRef};
use der::{Decode, Tag, Tagged};
use lazy_static::lazy_static;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::Name;

use crate::error::OneCrlError;

const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
const COUNTRY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
const LOCALITY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
const STATE_OR_PROVINCE_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
const STREET_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.9");
const ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const ORGANIZATIONAL_UNIT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

lazy_static! {
    static ref ATTRIBUTE_LABELS: HashMap<ObjectIdentifier, &'static str> = {
        let mut labels = HashMap::new();
        labels.insert(COMMON_NAME, "CN");
        labels.insert(COUNTRY_NAME, "C");
        labels.insert(LOCALITY_NAME, "L");
        labels.insert(STATE_OR_PROVINCE_NAME, "ST");
        labels.insert(STREET_ADDRESS, "STREET");
        labels.insert(ORGANIZATION_NAME, "O");
        labels.insert(ORGANIZATIONAL_UNIT_NAME, "OU");
        labels
    };
}

/// Decodes a base64 issuer name into an RFC 4514-ish string.
///
/// On failure the name comes back empty alongside the error; the batch is
/// never aborted over a single undecodable issuer. When the base64 layer
/// fails, DER parsing is skipped entirely.
pub fn decode_name(encoded: &str) -> (String, Option<OneCrlError>) {
    let raw = match BASE64.decode(encoded) {
        Ok(raw) => raw,
        Err(err) => return (String::new(), Some(err.into())),
    };
    match Name::from_der(&raw) {
        Ok(name) => (rfc4514ish(&name), None),
        Err(err) => (String::new(), Some(err.into())),
    }
}

/// Decodes a base64 serial number into a hex string.
///
/// A bad base64 payload is reported but the longest cleanly decodable
/// prefix is still rendered, possibly as an empty string.
pub fn decode_serial(
    encoded: &str,
    separate: bool,
    upper: bool,
) -> (String, Option<OneCrlError>) {
    let (raw, err) = decode_base64_prefix(encoded);
    (hexify(&raw, separate, upper), err.map(Into::into))
}

/// Renders bytes as two hex digits per byte, optionally colon-separated
/// between bytes (never trailing), lowercased unless `upper`.
pub fn hexify(bytes: &[u8], separate: bool, upper: bool) -> String {
    let encoded = if separate {
        bytes
            .iter()
            .map(|byte| hex::encode_upper([*byte]))
            .collect::<Vec<_>>()
            .join(":")
    } else {
        hex::encode_upper(bytes)
    };
    if upper {
        encoded
    } else {
        encoded.to_lowercase()
    }
}

// Decode base64, salvaging the longest valid prefix on failure. Offsets
// reported by the base64 crate are byte positions, floored here to a
// 4-character quantum boundary.
fn decode_base64_prefix(encoded: &str) -> (Vec<u8>, Option<DecodeError>) {
    match BASE64.decode(encoded) {
        Ok(raw) => (raw, None),
        Err(err) => {
            let input = encoded.as_bytes();
            let valid = match err {
                DecodeError::InvalidByte(offset, _)
                | DecodeError::InvalidLastSymbol(offset, _) => offset - offset % 4,
                _ => input.len() - input.len() % 4,
            };
            let raw = BASE64.decode(&input[..valid]).unwrap_or_default();
            (raw, Some(err))
        }
    }
}

// Render an RDN sequence the way OneCRL consumers expect: document order
// is most-significant-first, RFC 4514 wants least-significant-first, so
// each segment is prepended to the accumulator.
fn rfc4514ish(name: &Name) -> String {
    let mut rendered = String::new();
    for rdn in name.0.iter() {
        let atv = match rdn.0.iter().next() {
            Some(atv) => atv,
            None => continue,
        };
        let value = match string_value(atv) {
            Some(value) => value,
            None => continue,
        };
        let label = ATTRIBUTE_LABELS.get(&atv.oid).copied().unwrap_or("");
        if rendered.is_empty() {
            rendered = format!("{}={}", label, value);
        } else {
            rendered = format!("{}={},{}", label, value, rendered);
        }
    }
    rendered
}

// Only the string-typed attribute values are rendered; an RDN whose first
// attribute holds anything else is skipped.
fn string_value(atv: &AttributeTypeAndValue) -> Option<String> {
    match atv.value.tag() {
        Tag::PrintableString => PrintableStringRef::try_from(&atv.value)
            .ok()
            .map(|s| s.as_str().to_string()),
        Tag::Utf8String => Utf8StringRef::try_from(&atv.value)
            .ok()
            .map(|s| s.as_str().to_string()),
        Tag::Ia5String => Ia5StringRef::try_from(&atv.value)
            .ok()
            .map(|s| s.as_str().to_string()),
        Tag::TeletexString => TeletexStringRef::try_from(&atv.value)
            .ok()
            .map(|s| s.as_str().to_string()),
        _ => None,
    }
}
