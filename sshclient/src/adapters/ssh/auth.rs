// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use russh::client::{AuthResult, Handle, Handler};
use russh::keys::PrivateKeyWithHashAlg;
use russh::keys::ssh_key::PrivateKey;

use crate::app::errors::{AppError, AppErrorKind, AppResult, codes};
use crate::app::host::HostDescriptor;

use super::error::AuthenticationFailure;

#[derive(Clone)]
pub enum AuthMethod {
    Password(String),
    PublicKey(Arc<PrivateKey>),
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Password(_) => f.write_str("Password(..)"),
            AuthMethod::PublicKey(key) => write!(f, "PublicKey({})", key.algorithm()),
        }
    }
}

/// Credentials to offer, in order. A descriptor that passed validation
/// yields exactly one method.
pub fn resolve_auth_methods(host: &HostDescriptor) -> AppResult<Vec<AuthMethod>> {
    let mut methods = Vec::new();
    if let Some(password) = host.password() {
        methods.push(AuthMethod::Password(password.to_string()));
    } else if let Some(pem) = host.client_private_key_pem() {
        let key = russh::keys::decode_secret_key(pem, None).map_err(|err| {
            AppError::with_message(
                AppErrorKind::AuthResolution,
                codes::AUTH_RESOLUTION_FAILURE,
                format!("failed to parse client_private_key_pem: {err}"),
            )
        })?;
        methods.push(AuthMethod::PublicKey(Arc::new(key)));
    }
    Ok(methods)
}

fn is_success(result: AuthResult) -> bool {
    match result {
        AuthResult::Success => true,
        AuthResult::Failure {
            remaining_methods,
            partial_success,
        } => {
            log::debug!(
                "authentication failed (partial_success={}, remaining={:?})",
                partial_success,
                remaining_methods
            );
            false
        }
    }
}

/// Tries each method until one succeeds.
pub async fn authenticate<H>(
    handle: &mut Handle<H>,
    username: &str,
    methods: &[AuthMethod],
) -> Result<()>
where
    H: Handler,
{
    for method in methods {
        let result = match method {
            AuthMethod::Password(password) => handle
                .authenticate_password(username, password)
                .await
                .context("password authentication")?,
            AuthMethod::PublicKey(key) => {
                // Prefer SHA-256 for RSA if applicable (ignored for non-RSA keys)
                let hash = handle.best_supported_rsa_hash().await?.flatten();
                let pk = PrivateKeyWithHashAlg::new(key.clone(), hash);
                handle
                    .authenticate_publickey(username, pk)
                    .await
                    .context("public key authentication")?
            }
        };
        if is_success(result) {
            return Ok(());
        }
    }
    Err(AuthenticationFailure.into())
}
