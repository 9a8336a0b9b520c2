// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use crate::app::errors::{AppError, AppErrorKind, AppResult, codes};
use crate::app::ports::ResourceData;
use crate::app::services::payload::resolve_one_of;
use crate::app::services::permissions::{DEFAULT_PERMISSIONS, Permissions};

/// Attribute names for one command slot of the run resource.
#[derive(Debug, Clone, Copy)]
pub struct CommandFields {
    /// Used in messages: "command" or "destroy command".
    pub label: &'static str,
    pub text: &'static str,
    pub text_base64: &'static str,
    pub expect: &'static str,
}

/// A command to run and the stdout it is expected to produce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub text: Option<String>,
    pub text_base64: Option<String>,
    pub expected_output: Option<String>,
}

impl CommandSpec {
    pub fn from_data(data: &dyn ResourceData, fields: &CommandFields) -> Self {
        Self {
            text: data.get_str(fields.text).map(str::to_string),
            text_base64: data.get_str(fields.text_base64).map(str::to_string),
            expected_output: data.get_str(fields.expect).map(str::to_string),
        }
    }

    /// Command bytes as sent on the exec request; `Ok(None)` means there is
    /// nothing to run. Decoded base64 is not required to be UTF-8.
    pub fn resolve(&self, fields: &CommandFields) -> AppResult<Option<Vec<u8>>> {
        resolve_one_of(
            self.text.as_deref(),
            self.text_base64.as_deref(),
            fields.text,
            fields.text_base64,
        )
    }

    /// Compares the expectation with `stdout`, both trimmed of surrounding whitespace.
    pub fn check_expectation(&self, fields: &CommandFields, stdout: &[u8]) -> AppResult<()> {
        let Some(expected) = self.expected_output.as_deref() else {
            return Ok(());
        };
        let expected = expected.trim();
        let actual = String::from_utf8_lossy(stdout);
        let actual = actual.trim();
        if expected != actual {
            return Err(AppError::with_message(
                AppErrorKind::ExpectationMismatch,
                codes::OUTPUT_MISMATCH,
                format!(
                    "the output for {} is not the same as expected\n\tExpected: {expected}\n\tActual  : {actual}",
                    fields.label
                ),
            ));
        }
        Ok(())
    }
}

/// Content and placement of one delivered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverySpec {
    pub content: Option<String>,
    pub content_base64: Option<String>,
    pub remote_path: String,
    pub permissions: String,
}

impl DeliverySpec {
    pub fn from_data(data: &dyn ResourceData) -> Self {
        Self {
            content: data.get_str("data").map(str::to_string),
            content_base64: data.get_str("data_base64").map(str::to_string),
            remote_path: data.get_str("remote_path").unwrap_or_default().to_string(),
            permissions: data
                .get_str("permissions")
                .unwrap_or(DEFAULT_PERMISSIONS)
                .to_string(),
        }
    }

    /// Unset content delivers an empty file.
    pub fn resolve_content(&self) -> AppResult<Vec<u8>> {
        Ok(resolve_one_of(
            self.content.as_deref(),
            self.content_base64.as_deref(),
            "data",
            "data_base64",
        )?
        .unwrap_or_default())
    }

    pub fn resolve_permissions(&self) -> AppResult<Permissions> {
        Permissions::parse(&self.permissions)
    }

    pub fn validate_remote_path(&self) -> AppResult<()> {
        if self.remote_path.is_empty() {
            return Err(AppError::validation("remote_path is not provided"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: CommandFields = CommandFields {
        label: "command",
        text: "command",
        text_base64: "command_base64",
        expect: "expect",
    };

    fn expecting(expected: &str) -> CommandSpec {
        CommandSpec {
            text: Some("true".to_string()),
            expected_output: Some(expected.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn expectation_ignores_surrounding_whitespace() {
        assert!(expecting("hi").check_expectation(&FIELDS, b"hi\n").is_ok());
        assert!(expecting("  hi\n").check_expectation(&FIELDS, b"\thi  ").is_ok());
    }

    #[test]
    fn expectation_mismatch_shows_both_values() {
        let err = expecting("hi").check_expectation(&FIELDS, b"bye\n").unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::ExpectationMismatch);
        assert!(err.message().contains("Expected: hi"));
        assert!(err.message().contains("Actual  : bye"));
    }

    #[test]
    fn no_expectation_accepts_anything() {
        let spec = CommandSpec {
            text: Some("true".to_string()),
            ..Default::default()
        };
        assert!(spec.check_expectation(&FIELDS, b"whatever").is_ok());
    }

    #[test]
    fn base64_command_keeps_non_utf8_bytes() {
        let spec = CommandSpec {
            text_base64: Some("//79".to_string()),
            ..Default::default()
        };
        let command = spec.resolve(&FIELDS).unwrap();
        assert_eq!(command.as_deref(), Some([0xff, 0xfe, 0xfd].as_slice()));
    }

    #[test]
    fn delivery_defaults_to_empty_content() {
        let spec = DeliverySpec {
            content: None,
            content_base64: None,
            remote_path: "/tmp/x".to_string(),
            permissions: DEFAULT_PERMISSIONS.to_string(),
        };
        assert!(spec.resolve_content().unwrap().is_empty());
        assert_eq!(spec.resolve_permissions().unwrap().as_str(), "0644");
    }
}
