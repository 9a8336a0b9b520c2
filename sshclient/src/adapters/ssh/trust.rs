// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use russh::keys::ssh_key::PublicKey;
use russh::keys::ssh_key::authorized_keys::Entry;

use crate::app::errors::{AppError, AppErrorKind, AppResult, codes};
use crate::app::host::HostDescriptor;

/// How the server's host key is judged during key exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustPolicy {
    /// Accept whatever the server presents.
    InsecureAcceptAny,
    /// Accept only this key; options and comment are ignored.
    FixedKey(PublicKey),
}

impl TrustPolicy {
    pub fn accepts(&self, presented: &PublicKey) -> bool {
        match self {
            TrustPolicy::InsecureAcceptAny => true,
            TrustPolicy::FixedKey(pinned) => pinned.key_data() == presented.key_data(),
        }
    }
}

pub fn resolve_trust_policy(host: &HostDescriptor) -> AppResult<TrustPolicy> {
    if host.insecure_ignore_host_key {
        return Ok(TrustPolicy::InsecureAcceptAny);
    }
    let text = host.host_publickey_authorized_key().unwrap_or_default();
    parse_authorized_key(text).map(TrustPolicy::FixedKey)
}

/// First key line of authorized_keys(5) text. Blank lines and `#` comments
/// are skipped; a leading options field is allowed.
pub fn parse_authorized_key(text: &str) -> AppResult<PublicKey> {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .ok_or_else(|| trust_error("no key found in host_publickey_authorized_key"))?;

    let entry: Entry = line.parse().map_err(|err| {
        trust_error(format!(
            "failed to parse host_publickey_authorized_key: {err}"
        ))
    })?;
    Ok(entry.public_key().clone())
}

fn trust_error(message: impl Into<String>) -> AppError {
    AppError::with_message(
        AppErrorKind::TrustResolution,
        codes::TRUST_RESOLUTION_FAILURE,
        message,
    )
}
