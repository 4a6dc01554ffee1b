//! Remote JSON source loader for the OneCRL collection endpoint.

use std::time::Duration;

use log::error;
use serde::Deserialize;
use url::Url;

use crate::error::OneCrlError;
use crate::RevocationRecord;

/// Default URL of the blocklist record data.
pub const DEFAULT_URL: &str =
    "https://firefox.settings.services.mozilla.com/v1/buckets/blocklists/collections/certificates/records";

static TIMEOUT: u64 = 30;

#[derive(Deserialize)]
struct Results {
    data: Vec<Entry>,
}

// Entries of other record types (e.g. subject / public key hash) simply
// come through with empty fields, matching how the collection is consumed.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    #[serde(default)]
    issuer_name: String,
    #[serde(default)]
    serial_number: String,
}

/// Fetches and decodes the blocklist records from the given URL.
pub fn fetch_records(url: &str) -> Result<Vec<RevocationRecord>, OneCrlError> {
    let url = Url::parse(url).map_err(|err| OneCrlError::Network {
        url: url.to_string(),
        details: err.to_string(),
    })?;
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(TIMEOUT))
        .build()?;
    let body = client.get(url).send()?.error_for_status()?.text()?;
    let results: Results = serde_json::from_str(&body)?;
    Ok(results
        .data
        .into_iter()
        .map(|entry| RevocationRecord {
            issuer_name: entry.issuer_name,
            serial_number: entry.serial_number,
        })
        .collect())
}

/// Applies the strict-mode policy to a fetch result.
///
/// Under `strict` the error propagates and the run fails. Otherwise the
/// error is logged and an empty record list is returned, so the run emits
/// zero rows rather than aborting.
pub fn records_or_empty(
    result: Result<Vec<RevocationRecord>, OneCrlError>,
    strict: bool,
) -> Result<Vec<RevocationRecord>, OneCrlError> {
    match result {
        Ok(records) => Ok(records),
        Err(err) if strict => Err(err),
        Err(err) => {
            error!("{} (continuing with zero records)", err);
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_a_network_error() {
        let err = fetch_records("not a url").unwrap_err();
        assert!(matches!(err, OneCrlError::Network { .. }));
    }

    #[test]
    fn test_results_shape_ignores_extra_fields() {
        let body = r#"{
            "data": [
                {
                    "issuerName": "aXNzdWVy",
                    "serialNumber": "c2VyaWFs",
                    "details": {"why": "revoked"},
                    "enabled": true
                },
                {"subject": "c3Vi", "pubKeyHash": "aGFzaA=="}
            ]
        }"#;
        let results: Results = serde_json::from_str(body).unwrap();
        assert_eq!(results.data.len(), 2);
        assert_eq!(results.data[0].issuer_name, "aXNzdWVy");
        assert_eq!(results.data[0].serial_number, "c2VyaWFs");
        // key hash records decode to empty pairs rather than failing
        assert_eq!(results.data[1].issuer_name, "");
        assert_eq!(results.data[1].serial_number, "");
    }

    fn fetch_failure() -> Result<Vec<RevocationRecord>, OneCrlError> {
        Err(OneCrlError::Network {
            url: DEFAULT_URL.to_string(),
            details: "connection refused".to_string(),
        })
    }

    #[test]
    fn test_fetch_failure_yields_zero_records_by_default() {
        let records = records_or_empty(fetch_failure(), false).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_fetch_failure_is_fatal_under_strict() {
        let err = records_or_empty(fetch_failure(), true).unwrap_err();
        assert!(matches!(err, OneCrlError::Network { .. }));
    }

    #[test]
    fn test_successful_fetch_passes_through_unchanged() {
        let records = vec![RevocationRecord {
            issuer_name: "aXNzdWVy".to_string(),
            serial_number: "c2VyaWFs".to_string(),
        }];
        let passed = records_or_empty(Ok(records.clone()), true).unwrap();
        assert_eq!(passed, records);
    }
}
