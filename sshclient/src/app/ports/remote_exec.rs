// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;

use crate::app::errors::AppError;
use crate::app::host::HostDescriptor;

/// Output of one remote command. Bytes captured before a failure are kept.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub error: Option<AppError>,
}

impl ExecutionResult {
    pub fn failed(error: AppError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }
}

#[async_trait]
/// Runs a single command on a fresh connection and tears it down afterwards.
pub trait RemoteExecPort: Send + Sync {
    async fn exec_capture(&self, host: &HostDescriptor, command: &[u8]) -> ExecutionResult;
}
