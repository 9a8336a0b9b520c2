// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::app::errors::{AppError, AppResult};

/// user, group, others; one octal rwx digit each. Compatible with `stat -c %a`.
pub const PERMISSIONS_PATTERN: &str = "^[0-7][0-7][0-7]$";
pub const DEFAULT_PERMISSIONS: &str = "644";

static PERMISSIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(PERMISSIONS_PATTERN).expect("permissions pattern is a valid regex")
});

/// Permission bits in canonical `0ddd` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permissions {
    canonical: String,
    mode: u32,
}

impl Permissions {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let canonical = parse_permissions(raw)?;
        let mode = u32::from_str_radix(&canonical, 8).map_err(|err| {
            AppError::validation(format!("invalid permissions {raw}: {err}"))
        })?;
        Ok(Self { canonical, mode })
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            canonical: format!("0{DEFAULT_PERMISSIONS}"),
            mode: 0o644,
        }
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// `"644"` -> `"0644"`.
pub fn parse_permissions(raw: &str) -> AppResult<String> {
    if !PERMISSIONS_RE.is_match(raw) {
        return Err(AppError::validation(format!(
            "permissions string must be in form of {PERMISSIONS_PATTERN}"
        )));
    }
    Ok(format!("0{raw}"))
}
