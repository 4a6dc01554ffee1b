//! Error types for OneCRL blocklist processing.
//!
//! This module defines the error types that can occur while loading and
//! decoding revocation records, split between per-record decode failures
//! (non-fatal, logged) and structural failures (fatal to the whole run).

use std::fmt;
use std::io;

/// Error type for OneCRL loading and decoding failures.
///
/// Per-record failures (`Base64Decode`, `DerParse`) are logged and the
/// record is still emitted with whatever partial value could be produced.
/// Structural failures (`FileIo`, `MalformedRecord`, `UnsupportedFormat`)
/// abort the run.
#[derive(Debug)]
pub enum OneCrlError {
    /// A base64 payload could not be fully decoded
    Base64Decode {
        /// The underlying base64 error
        source: base64::DecodeError,
    },

    /// Issuer bytes did not parse as a DER RDN sequence
    DerParse {
        /// Details about the structural failure
        details: String,
    },

    /// The remote blocklist endpoint could not be reached
    Network {
        /// The URL that was being fetched
        url: String,
        /// Details about the transport failure
        details: String,
    },

    /// The remote blocklist document was not valid JSON of the expected shape
    JsonDecode {
        /// Details about the decode failure
        details: String,
    },

    /// Reading the revocations file (or writing output) failed
    FileIo {
        /// The path or stream that failed
        context: String,
        /// The underlying I/O error
        source: io::Error,
    },

    /// The revocations file violated the line format state machine
    MalformedRecord {
        /// 1-based line number of the offending line
        line: usize,
        /// Why the line was invalid
        reason: String,
    },

    /// The revocations file contained a subject / public-key-hash line
    UnsupportedFormat {
        /// 1-based line number of the offending line
        line: usize,
    },
}

impl fmt::Display for OneCrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64Decode { source } => {
                write!(f, "base64 decode failed: {}", source)
            }
            Self::DerParse { details } => {
                write!(f, "DER name parse failed: {}", details)
            }
            Self::Network { url, details } => {
                write!(
                    f,
                    "Failed to fetch blocklist from {}: {}. Verify the URL is correct and the endpoint is reachable.",
                    url, details
                )
            }
            Self::JsonDecode { details } => {
                write!(f, "Blocklist JSON decode failed: {}", details)
            }
            Self::FileIo { context, source } => {
                write!(f, "I/O error on {}: {}", context, source)
            }
            Self::MalformedRecord { line, reason } => {
                write!(f, "Malformed revocations file at line {}: {}", line, reason)
            }
            Self::UnsupportedFormat { line } => {
                write!(
                    f,
                    "Unsupported revocations format at line {}: subject / public key hash entries are not supported",
                    line
                )
            }
        }
    }
}

impl std::error::Error for OneCrlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Base64Decode { source } => Some(source),
            Self::FileIo { source, .. } => Some(source),
            _ => None,
        }
    }
}

// Conversion implementations for the decode and fetch paths

impl From<base64::DecodeError> for OneCrlError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Base64Decode { source: e }
    }
}

impl From<der::Error> for OneCrlError {
    fn from(e: der::Error) -> Self {
        Self::DerParse {
            details: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for OneCrlError {
    fn from(e: serde_json::Error) -> Self {
        Self::JsonDecode {
            details: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for OneCrlError {
    fn from(e: reqwest::Error) -> Self {
        let url = e
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        if e.is_decode() {
            Self::JsonDecode {
                details: e.to_string(),
            }
        } else {
            Self::Network {
                url,
                details: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_display() {
        let err = OneCrlError::MalformedRecord {
            line: 3,
            reason: "a serial number with no issuer is not valid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed revocations file at line 3: a serial number with no issuer is not valid"
        );
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = OneCrlError::UnsupportedFormat { line: 7 };
        let display = err.to_string();
        assert!(display.contains("line 7"));
        assert!(display.contains("not supported"));
    }

    #[test]
    fn test_file_io_source() {
        use std::error::Error;

        let err = OneCrlError::FileIo {
            context: "revocations.txt".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("revocations.txt"));
    }

    #[test]
    fn test_json_decode_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: OneCrlError = parse_err.into();
        assert!(matches!(err, OneCrlError::JsonDecode { .. }));
    }
}
