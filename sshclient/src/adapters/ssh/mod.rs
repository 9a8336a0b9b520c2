// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::time::Duration;

use async_trait::async_trait;

use crate::app::errors::{AppError, AppErrorKind, AppResult, codes};
use crate::app::host::HostDescriptor;
use crate::app::ports::{
    ExecutionResult, FileTransferPort, FileUpload, HostKeyProbePort, RemoteExecPort,
};

pub mod auth;
mod error;
mod exec;
mod keyscan;
mod session;
mod sftp;
pub mod trust;

pub use auth::{AuthMethod, resolve_auth_methods};
pub use error::{AuthenticationFailure, HostKeyRejected};
pub use trust::{TrustPolicy, resolve_trust_policy};

use session::SshTarget;

/// russh-backed implementation of every network port. Each call opens its
/// own transport and closes it before returning.
#[derive(Clone, Debug, Default)]
pub struct SshAdapter;

impl SshAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn ssh_error_code(err: &anyhow::Error) -> &'static str {
    if err.chain().any(|cause| cause.is::<AuthenticationFailure>()) {
        codes::AUTHENTICATION_FAILURE
    } else if err.chain().any(|cause| cause.is::<HostKeyRejected>()) {
        codes::HOST_KEY_REJECTED
    } else {
        codes::CONNECTION_FAILURE
    }
}

fn map_connect_error(err: anyhow::Error) -> AppError {
    AppError::with_message(
        AppErrorKind::Execution,
        ssh_error_code(&err),
        format!("ssh connect failed: {err:#}"),
    )
}

fn map_exec_error(err: anyhow::Error) -> AppError {
    AppError::with_message(
        AppErrorKind::Execution,
        codes::REMOTE_ERROR,
        format!("ssh exec failed: {err:#}"),
    )
}

fn map_transfer_error(err: anyhow::Error) -> AppError {
    let code = match ssh_error_code(&err) {
        codes::CONNECTION_FAILURE => codes::TRANSFER_FAILURE,
        code => code,
    };
    AppError::with_message(
        AppErrorKind::Delivery,
        code,
        format!("file transfer failed: {err:#}"),
    )
}

async fn transfer(target: &SshTarget, upload: &FileUpload) -> anyhow::Result<()> {
    let handle = session::connect(target).await?;
    let written = sftp::put_file(&handle, upload).await;
    session::disconnect(handle).await;
    written
}

#[async_trait]
impl RemoteExecPort for SshAdapter {
    #[tracing::instrument(
        name = "ssh",
        level = "debug",
        skip(self, host, command),
        fields(op = "exec_capture", host = %host.hostname, user = %host.username, port = host.port)
    )]
    async fn exec_capture(&self, host: &HostDescriptor, command: &[u8]) -> ExecutionResult {
        let target = match SshTarget::resolve(host) {
            Ok(target) => target,
            Err(err) => return ExecutionResult::failed(err),
        };
        let handle = match session::connect(&target).await {
            Ok(handle) => handle,
            Err(err) => return ExecutionResult::failed(map_connect_error(err)),
        };

        let captured = exec::exec_capture(&handle, command).await;
        session::disconnect(handle).await;

        match captured {
            Ok(capture) => {
                let error = capture.exit_error().map(|message| {
                    AppError::with_message(AppErrorKind::Execution, codes::REMOTE_ERROR, message)
                });
                ExecutionResult {
                    stdout: capture.stdout,
                    stderr: capture.stderr,
                    error,
                }
            }
            Err(err) => ExecutionResult::failed(map_exec_error(err)),
        }
    }
}

#[async_trait]
impl FileTransferPort for SshAdapter {
    #[tracing::instrument(
        name = "ssh",
        level = "debug",
        skip(self, host, upload),
        fields(op = "put_file", host = %host.hostname, user = %host.username, port = host.port, path = %upload.remote_path)
    )]
    async fn put_file(
        &self,
        host: &HostDescriptor,
        upload: &FileUpload,
        timeout: Duration,
    ) -> AppResult<()> {
        let target = SshTarget::resolve(host)?;
        match tokio::time::timeout(timeout, transfer(&target, upload)).await {
            Ok(result) => result.map_err(map_transfer_error),
            Err(_) => {
                log::warn!("transfer to {} timed out after {timeout:?}", target.address);
                Err(AppError::timeout(timeout))
            }
        }
    }
}

#[async_trait]
impl HostKeyProbePort for SshAdapter {
    #[tracing::instrument(
        name = "ssh",
        level = "debug",
        skip(self, host),
        fields(op = "probe_host_key", host = %host.hostname, user = %host.username, port = host.port)
    )]
    async fn probe_host_key(&self, host: &HostDescriptor, timeout: Duration) -> AppResult<String> {
        keyscan::scan_host_key(host, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    #[test]
    fn marker_errors_select_codes_through_context() {
        let err = anyhow::Error::from(AuthenticationFailure).context("SSH connect failed");
        assert_eq!(map_connect_error(err).code(), codes::AUTHENTICATION_FAILURE);

        let err = Err::<(), _>(anyhow::Error::from(HostKeyRejected {
            presented: "ssh-ed25519 AAAA".to_string(),
        }))
        .context("SSH connect failed")
        .unwrap_err();
        let mapped = map_connect_error(err);
        assert_eq!(mapped.code(), codes::HOST_KEY_REJECTED);
        assert!(mapped.message().contains("host key mismatch"));

        let err = anyhow!("connection refused");
        assert_eq!(map_connect_error(err).code(), codes::CONNECTION_FAILURE);
    }

    #[test]
    fn transfer_errors_are_delivery_errors() {
        let mapped =
            map_transfer_error(anyhow!("permission denied").context("open remote file /root/x"));
        assert_eq!(mapped.kind(), AppErrorKind::Delivery);
        assert_eq!(mapped.code(), codes::TRANSFER_FAILURE);
        assert_eq!(
            mapped.message(),
            "file transfer failed: open remote file /root/x: permission denied"
        );

        let mapped = map_transfer_error(AuthenticationFailure.into());
        assert_eq!(mapped.code(), codes::AUTHENTICATION_FAILURE);
    }

    #[tokio::test]
    async fn resolution_errors_skip_the_network() {
        let host = HostDescriptor {
            // TEST-NET-3; never dialled because resolution fails first.
            hostname: "203.0.113.7".to_string(),
            username: "foobar".to_string(),
            client_private_key_pem: "not a key".to_string(),
            insecure_ignore_host_key: true,
            ..Default::default()
        };
        let result = SshAdapter::new().exec_capture(&host, b"true").await;
        let err = result.error.unwrap();
        assert_eq!(err.kind(), AppErrorKind::AuthResolution);
        assert!(result.stdout.is_empty());

        let upload = FileUpload {
            content: Vec::new(),
            remote_path: "/tmp/x".to_string(),
            permissions: Default::default(),
        };
        let err = SshAdapter::new()
            .put_file(&host, &upload, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::AuthResolution);
    }
}
