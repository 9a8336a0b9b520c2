// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::diagnostics::Diagnostics;
use crate::app::errors::{AppError, AppResult};
use crate::app::ports::{HostKeyProbePort, Operation, ResourceData};

use super::{DataSource, host_from_data, new_resource_id};

const INSECURE_REQUIRED: &str =
    "To scan host key, insecure_ignore_host_key should be explicitly set.";

/// `sshclient_keyscan`: learns the server's host key so it can be pinned
/// in `host_publickey_authorized_key` afterwards.
#[derive(Clone)]
pub struct KeyscanDataSource {
    probe: Arc<dyn HostKeyProbePort>,
}

impl KeyscanDataSource {
    pub fn new(probe: Arc<dyn HostKeyProbePort>) -> Self {
        Self { probe }
    }

    async fn scan(&self, data: &mut dyn ResourceData) -> AppResult<()> {
        let host = host_from_data(data)?;
        host.validate_host_info()?;
        if !host.insecure_ignore_host_key {
            return Err(AppError::validation(INSECURE_REQUIRED));
        }

        let timeout = data.timeout(Operation::Read);
        let key = self.probe.probe_host_key(&host, timeout).await?;
        log::info!("scanned host key of {}", host.address());

        data.set("authorized_key", key.into());
        data.set_id(new_resource_id());
        Ok(())
    }
}

#[async_trait]
impl DataSource for KeyscanDataSource {
    #[tracing::instrument(name = "keyscan", level = "debug", skip_all)]
    async fn read(&self, data: &mut dyn ResourceData) -> Diagnostics {
        self.scan(data).await.into()
    }
}
