// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::app::diagnostics::{Diagnostic, Diagnostics};
use crate::app::errors::{AppError, AppErrorKind, AppResult};
use crate::app::host::HostDescriptor;
use crate::app::ports::{AttrValue, Operation, RemoteExecPort, ResourceData};
use crate::app::services::deadline::run_with_deadline;
use crate::app::services::payload::encode_base64;
use crate::app::types::{CommandFields, CommandSpec};

use super::{Resource, host_from_data, new_resource_id, validate_only};

pub const CREATE_COMMAND: CommandFields = CommandFields {
    label: "command",
    text: "command",
    text_base64: "command_base64",
    expect: "expect",
};

pub const DESTROY_COMMAND: CommandFields = CommandFields {
    label: "destroy command",
    text: "destroy_command",
    text_base64: "destroy_command_base64",
    expect: "destroy_expect",
};

const REVERT_SUMMARY: &str = "error while reverting deletion";

/// Where captured output is stored. Only the create command records it.
#[derive(Debug, Clone, Copy)]
struct OutputKeys {
    stdout: &'static str,
    stdout_base64: &'static str,
    stderr: &'static str,
    stderr_base64: &'static str,
}

const OUTPUTS: OutputKeys = OutputKeys {
    stdout: "stdout",
    stdout_base64: "stdout_base64",
    stderr: "stderr",
    stderr_base64: "stderr_base64",
};

/// `sshclient_run`: runs a command on create/update, a destroy command on
/// delete, and re-runs the create command when the destroy command fails.
#[derive(Clone)]
pub struct RunResource {
    exec: Arc<dyn RemoteExecPort>,
}

impl RunResource {
    pub fn new(exec: Arc<dyn RemoteExecPort>) -> Self {
        Self { exec }
    }

    /// validate -> resolve -> run -> check expectation -> store outputs.
    async fn run_command(
        &self,
        data: &mut dyn ResourceData,
        host: &HostDescriptor,
        fields: &CommandFields,
        outputs: Option<OutputKeys>,
        timeout: Duration,
    ) -> AppResult<()> {
        host.validate_host_info()?;
        host.validate_auth_info()?;

        let spec = CommandSpec::from_data(data, fields);
        let Some(command) = spec.resolve(fields)? else {
            log::debug!("no {} configured for {host}; nothing to run", fields.label);
            return Ok(());
        };

        let result = run_with_deadline(self.exec.clone(), host.clone(), command, timeout).await?;
        if let Some(err) = result.error {
            return Err(with_output(err, &result.stdout, &result.stderr));
        }

        spec.check_expectation(fields, &result.stdout)?;

        if let Some(keys) = outputs {
            data.set(keys.stdout, lossy(&result.stdout));
            data.set(keys.stdout_base64, encode_base64(&result.stdout).into());
            data.set(keys.stderr, lossy(&result.stderr));
            data.set(keys.stderr_base64, encode_base64(&result.stderr).into());
        }
        Ok(())
    }

    async fn apply(&self, data: &mut dyn ResourceData, op: Operation) -> AppResult<()> {
        let host = host_from_data(data)?;
        let timeout = data.timeout(op);
        self.run_command(data, &host, &CREATE_COMMAND, Some(OUTPUTS), timeout)
            .await
            .map_err(|err| err.with_context(host.describe()))
    }
}

#[async_trait]
impl Resource for RunResource {
    #[tracing::instrument(name = "run", level = "debug", skip_all, fields(op = "create"))]
    async fn create(&self, data: &mut dyn ResourceData) -> Diagnostics {
        if let Err(err) = self.apply(data, Operation::Create).await {
            return err.into();
        }
        data.set_id(new_resource_id());
        Diagnostics::new()
    }

    #[tracing::instrument(name = "run", level = "debug", skip_all, fields(op = "read"))]
    async fn read(&self, data: &mut dyn ResourceData) -> Diagnostics {
        validate_only(data)
    }

    #[tracing::instrument(name = "run", level = "debug", skip_all, fields(op = "update"))]
    async fn update(&self, data: &mut dyn ResourceData) -> Diagnostics {
        self.apply(data, Operation::Update).await.into()
    }

    /// A failed destroy command is always reported as an error. The create
    /// command is then re-run once as a best-effort revert; if that fails too
    /// a warning is appended. A successful revert does not clear the error.
    #[tracing::instrument(name = "run", level = "debug", skip_all, fields(op = "delete"))]
    async fn delete(&self, data: &mut dyn ResourceData) -> Diagnostics {
        let host = match host_from_data(data) {
            Ok(host) => host,
            Err(err) => return err.into(),
        };

        let destroy_timeout = data.timeout(Operation::Delete);
        let destroyed = self
            .run_command(data, &host, &DESTROY_COMMAND, None, destroy_timeout)
            .await;
        let Err(err) = destroyed else {
            return Diagnostics::new();
        };

        log::warn!("destroy command failed on {host}; reverting with the create command");
        let mut diags = Diagnostics::from(err.with_context(host.describe()));

        let revert_timeout = data.timeout(Operation::Create);
        if let Err(revert_err) = self
            .run_command(data, &host, &CREATE_COMMAND, Some(OUTPUTS), revert_timeout)
            .await
        {
            log::warn!("revert on {host} failed: {revert_err}");
            diags.push(Diagnostic::warning(
                REVERT_SUMMARY,
                format!("{REVERT_SUMMARY}: {revert_err}"),
            ));
        }
        diags
    }
}

fn with_output(err: AppError, stdout: &[u8], stderr: &[u8]) -> AppError {
    // Resolution failures happen before anything ran.
    if matches!(
        err.kind(),
        AppErrorKind::AuthResolution | AppErrorKind::TrustResolution
    ) {
        return err;
    }
    AppError::with_message(
        err.kind(),
        err.code(),
        format!(
            "error occurred while running: {err}\n\nstdout:\n{}\n\nstderr:\n{}",
            String::from_utf8_lossy(stdout),
            String::from_utf8_lossy(stderr),
        ),
    )
}

fn lossy(bytes: &[u8]) -> AttrValue {
    AttrValue::String(String::from_utf8_lossy(bytes).into_owned())
}
