// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fmt;
use std::time::Duration;

pub mod codes {
    pub const PARSE_ERROR: &str = "parse_error";
    pub const INVALID_ARGUMENT: &str = "invalid_argument";
    pub const AUTH_RESOLUTION_FAILURE: &str = "auth_resolution_failure";
    pub const TRUST_RESOLUTION_FAILURE: &str = "trust_resolution_failure";
    pub const AUTHENTICATION_FAILURE: &str = "authentication_failure";
    pub const HOST_KEY_REJECTED: &str = "host_key_rejected";
    pub const CONNECTION_FAILURE: &str = "connection_failure";
    pub const REMOTE_ERROR: &str = "remote_error";
    pub const TIMEOUT: &str = "timeout";
    pub const OUTPUT_MISMATCH: &str = "output_mismatch";
    pub const TRANSFER_FAILURE: &str = "transfer_failure";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppErrorKind {
    /// Serialized host descriptor could not be decoded.
    Parse,
    /// Malformed or contradictory host, command or file fields.
    Validation,
    /// Client private key could not be parsed.
    AuthResolution,
    /// Pinned host public key could not be parsed.
    TrustResolution,
    /// Transport, session or remote command failure.
    Execution,
    /// Deadline exceeded.
    Timeout,
    /// Remote stdout differs from the expected value.
    ExpectationMismatch,
    /// File transfer failure.
    Delivery,
}

#[derive(Debug, Clone)]
pub struct AppError {
    kind: AppErrorKind,
    code: &'static str,
    message: String,
    context: Option<String>,
}

impl AppError {
    pub fn with_message(
        kind: AppErrorKind,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            context: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(AppErrorKind::Validation, codes::INVALID_ARGUMENT, message)
    }

    pub fn timeout(limit: Duration) -> Self {
        Self::with_message(
            AppErrorKind::Timeout,
            codes::TIMEOUT,
            format!("timeout limit exceeded: timeout is {limit:?}"),
        )
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn kind(&self) -> AppErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ctx) = &self.context {
            write!(f, "{}: {}", ctx, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_context() {
        let err = AppError::validation("hostname is not provided")
            .with_context("root@example.org:22 (Auth with password)");
        assert_eq!(
            err.to_string(),
            "root@example.org:22 (Auth with password): hostname is not provided"
        );
        assert_eq!(err.kind(), AppErrorKind::Validation);
        assert_eq!(err.code(), codes::INVALID_ARGUMENT);
    }

    #[test]
    fn timeout_message_names_the_limit() {
        let err = AppError::timeout(Duration::from_secs(10));
        assert_eq!(err.kind(), AppErrorKind::Timeout);
        assert_eq!(err.message(), "timeout limit exceeded: timeout is 10s");
    }
}
