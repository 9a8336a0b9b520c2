// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use russh::client::{Config, Handle};
use russh::keys::ssh_key::PublicKey;

use crate::app::errors::AppResult;
use crate::app::host::HostDescriptor;

use super::auth::{AuthMethod, authenticate, resolve_auth_methods};
use super::error::HostKeyRejected;
use super::trust::{TrustPolicy, resolve_trust_policy};

/// russh client handler that applies the resolved host-key policy.
#[derive(Clone, Debug)]
pub(crate) struct ClientHandler {
    address: String,
    trust: TrustPolicy,
}

impl ClientHandler {
    fn new(address: String, trust: TrustPolicy) -> Self {
        Self { address, trust }
    }
}

impl russh::client::Handler for ClientHandler {
    type Error = anyhow::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        if self.trust.accepts(server_public_key) {
            return Ok(true);
        }
        let presented = server_public_key
            .to_openssh()
            .unwrap_or_else(|_| server_public_key.algorithm().to_string());
        log::warn!("rejecting host key of {}: {presented}", self.address);
        Err(HostKeyRejected { presented }.into())
    }
}

/// Everything needed to dial one host, resolved up front so credential and
/// trust problems surface before any network activity.
#[derive(Debug, Clone)]
pub(crate) struct SshTarget {
    pub address: String,
    pub username: String,
    pub auth: Vec<AuthMethod>,
    pub trust: TrustPolicy,
}

impl SshTarget {
    pub fn resolve(host: &HostDescriptor) -> AppResult<Self> {
        let auth = resolve_auth_methods(host)?;
        let trust = resolve_trust_policy(host)?;
        Ok(Self {
            address: host.address(),
            username: host.username.clone(),
            auth,
            trust,
        })
    }
}

pub(crate) fn client_config() -> Arc<Config> {
    Arc::new(Config {
        inactivity_timeout: Some(Duration::from_secs(30)),
        ..Default::default()
    })
}

/// Dials and authenticates. The transport is dropped on any failure.
pub(crate) async fn connect(target: &SshTarget) -> Result<Handle<ClientHandler>> {
    log::debug!("connecting to {}@{}", target.username, target.address);
    let handler = ClientHandler::new(target.address.clone(), target.trust.clone());
    let mut handle = russh::client::connect(client_config(), target.address.as_str(), handler)
        .await
        .context("SSH connect failed")?;
    log::debug!(
        "established connection with {}@{}, proceeding with auth",
        target.username,
        target.address
    );
    authenticate(&mut handle, &target.username, &target.auth).await?;
    Ok(handle)
}

pub(crate) async fn disconnect(handle: Handle<ClientHandler>) {
    if let Err(err) = handle
        .disconnect(russh::Disconnect::ByApplication, "", "")
        .await
    {
        log::debug!("error while disconnecting: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ssh::auth::tests::ED25519_PEM;
    use crate::app::errors::AppErrorKind;
    use russh::client::Handler;

    fn server_key() -> PublicKey {
        russh::keys::decode_secret_key(ED25519_PEM, None)
            .unwrap()
            .public_key()
            .clone()
    }

    #[tokio::test]
    async fn handler_rejects_unpinned_key_with_marker_error() {
        let other = russh::keys::ssh_key::PublicKey::from_openssh(
            "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIPezbe5Iz9Hq9vpCFFViNAHKGSFWK9jvI0o8AwVvyqT0",
        )
        .unwrap();
        let mut handler =
            ClientHandler::new("example.org:22".to_string(), TrustPolicy::FixedKey(other));

        let err = handler.check_server_key(&server_key()).await.unwrap_err();
        assert!(err.is::<HostKeyRejected>());
    }

    #[tokio::test]
    async fn handler_accepts_pinned_key() {
        let mut handler = ClientHandler::new(
            "example.org:22".to_string(),
            TrustPolicy::FixedKey(server_key()),
        );
        assert!(handler.check_server_key(&server_key()).await.unwrap());
    }

    #[test]
    fn target_resolution_fails_before_dialing() {
        let host = HostDescriptor {
            hostname: "203.0.113.7".to_string(),
            username: "foobar".to_string(),
            password: "secret".to_string(),
            host_publickey_authorized_key: "not a key".to_string(),
            ..Default::default()
        };
        let err = SshTarget::resolve(&host).unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::TrustResolution);
    }

    #[test]
    fn target_carries_address_and_user() {
        let host = HostDescriptor {
            hostname: "203.0.113.7".to_string(),
            port: 2222,
            username: "foobar".to_string(),
            client_private_key_pem: ED25519_PEM.to_string(),
            insecure_ignore_host_key: true,
            ..Default::default()
        };
        let target = SshTarget::resolve(&host).unwrap();
        assert_eq!(target.address, "203.0.113.7:2222");
        assert_eq!(target.username, "foobar");
        assert_eq!(target.auth.len(), 1);
        assert_eq!(target.trust, TrustPolicy::InsecureAcceptAny);
    }
}
