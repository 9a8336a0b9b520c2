// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::sync::Arc;
use std::time::Duration;

use crate::app::errors::{AppError, AppErrorKind, AppResult, codes};
use crate::app::host::HostDescriptor;
use crate::app::ports::{ExecutionResult, RemoteExecPort};

/// Runs `command` on a background task and waits for it or the deadline,
/// whichever comes first.
///
/// When the deadline wins the task is detached, not aborted: the connection
/// and the remote process may keep running after the caller has been told
/// about the timeout. There is no cancellation signal to the remote side.
pub async fn run_with_deadline(
    exec: Arc<dyn RemoteExecPort>,
    host: HostDescriptor,
    command: Vec<u8>,
    timeout: Duration,
) -> AppResult<ExecutionResult> {
    let target = host.address();
    let task = tokio::spawn(async move { exec.exec_capture(&host, &command).await });

    tokio::select! {
        joined = task => joined.map_err(|err| {
            AppError::with_message(
                AppErrorKind::Execution,
                codes::INTERNAL_ERROR,
                format!("command task failed: {err}"),
            )
        }),
        _ = tokio::time::sleep(timeout) => {
            log::warn!("command on {target} abandoned after {timeout:?}; the remote process is not cancelled");
            Err(AppError::timeout(timeout))
        }
    }
}
