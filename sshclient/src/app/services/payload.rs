// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use base64::prelude::*;

use crate::app::errors::{AppError, AppResult};

/// Picks the raw or the base64-encoded variant of a payload.
///
/// `Ok(None)` when neither is set; supplying both is a validation error.
pub fn resolve_one_of(
    raw: Option<&str>,
    encoded: Option<&str>,
    raw_key: &str,
    encoded_key: &str,
) -> AppResult<Option<Vec<u8>>> {
    match (raw, encoded) {
        (Some(_), Some(_)) => Err(AppError::validation(format!(
            "up to one of {raw_key} and {encoded_key} should be specified"
        ))),
        (Some(raw), None) => Ok(Some(raw.as_bytes().to_vec())),
        (None, Some(encoded)) => decode_base64(encoded, encoded_key).map(Some),
        (None, None) => Ok(None),
    }
}

pub fn decode_base64(encoded: &str, key: &str) -> AppResult<Vec<u8>> {
    BASE64_STANDARD
        .decode(encoded)
        .map_err(|err| AppError::validation(format!("failed to decode {key}: {err}")))
}

pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_value_is_used_verbatim() {
        let out = resolve_one_of(Some("echo hi"), None, "command", "command_base64").unwrap();
        assert_eq!(out.as_deref(), Some(b"echo hi".as_slice()));
    }

    #[test]
    fn encoded_value_is_decoded() {
        let out = resolve_one_of(None, Some("ZWNobyAtbiBoaQo="), "command", "command_base64")
            .unwrap();
        assert_eq!(out.as_deref(), Some(b"echo -n hi\n".as_slice()));
    }

    #[test]
    fn neither_value_means_nothing_to_do() {
        let out = resolve_one_of(None, None, "command", "command_base64").unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn both_values_are_rejected() {
        let err = resolve_one_of(Some("a"), Some("YQ=="), "command", "command_base64")
            .unwrap_err();
        assert_eq!(
            err.message(),
            "up to one of command and command_base64 should be specified"
        );
    }

    #[test]
    fn invalid_base64_is_a_validation_error() {
        let err = resolve_one_of(None, Some("***"), "data", "data_base64").unwrap_err();
        assert!(err.message().starts_with("failed to decode data_base64"));
    }

    #[test]
    fn surrounding_whitespace_is_not_stripped() {
        let err = resolve_one_of(None, Some("aGk=\n"), "data", "data_base64").unwrap_err();
        assert!(err.message().starts_with("failed to decode data_base64"));
    }
}
