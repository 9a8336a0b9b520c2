// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::time::Duration;

use anyhow::{Context, anyhow};
use russh::keys::ssh_key::PublicKey;
use tokio::sync::oneshot;

use crate::app::errors::{AppError, AppResult};
use crate::app::host::HostDescriptor;

use super::session::client_config;

/// Records the first key offered during key exchange and accepts it.
struct ProbeHandler {
    slot: Option<oneshot::Sender<PublicKey>>,
}

impl ProbeHandler {
    fn new(slot: oneshot::Sender<PublicKey>) -> Self {
        Self { slot: Some(slot) }
    }
}

impl russh::client::Handler for ProbeHandler {
    type Error = anyhow::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        if let Some(slot) = self.slot.take() {
            let _ = slot.send(server_public_key.clone());
        }
        Ok(true)
    }
}

/// One-line authorized-key form, newline-terminated.
fn authorized_key_line(key: &PublicKey) -> anyhow::Result<String> {
    let mut key = key.clone();
    key.set_comment("");
    let encoded = key.to_openssh().context("encode host key")?;
    Ok(format!("{encoded}\n"))
}

/// Connects, lets key exchange deliver the host key, then attempts `none`
/// authentication whose outcome is irrelevant.
///
/// The deadline only turns into an error when key exchange never delivered a
/// key; a key captured before a stalled authentication phase is returned.
pub(crate) async fn scan_host_key(host: &HostDescriptor, timeout: Duration) -> AppResult<String> {
    let address = host.address();
    let (tx, mut rx) = oneshot::channel();
    let handler = ProbeHandler::new(tx);

    let probe = async {
        let mut handle = russh::client::connect(client_config(), address.as_str(), handler)
            .await
            .context("SSH connect failed")?;
        match handle.authenticate_none(host.username.as_str()).await {
            Ok(result) => log::debug!(
                "none authentication on {address} finished (success={})",
                matches!(result, russh::client::AuthResult::Success)
            ),
            Err(err) => log::debug!("none authentication on {address} failed: {err}"),
        }
        let _ = handle
            .disconnect(russh::Disconnect::ByApplication, "", "")
            .await;
        anyhow::Ok(())
    };

    let outcome = tokio::time::timeout(timeout, probe).await;

    let key = match (rx.try_recv(), outcome) {
        (Ok(key), Err(_)) => {
            log::debug!("authentication phase on {address} stalled; keeping the offered host key");
            key
        }
        (Ok(key), Ok(_)) => key,
        (Err(_), Err(_)) => {
            log::warn!("host key scan of {address} timed out after {timeout:?}");
            return Err(AppError::timeout(timeout));
        }
        (Err(_), Ok(Err(err))) => return Err(super::map_connect_error(err)),
        (Err(_), Ok(Ok(()))) => {
            return Err(super::map_connect_error(anyhow!(
                "server at {address} closed the connection before offering a host key"
            )));
        }
    };
    authorized_key_line(&key).map_err(super::map_exec_error)
}
