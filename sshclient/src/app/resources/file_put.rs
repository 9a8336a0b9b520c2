// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::diagnostics::Diagnostics;
use crate::app::errors::AppResult;
use crate::app::ports::{FileTransferPort, FileUpload, Operation, ResourceData};
use crate::app::types::DeliverySpec;

use super::{Resource, host_from_data, new_resource_id, validate_only};

/// `sshclient_file_put`: writes a payload to a remote path. Deleting the
/// resource leaves the remote file in place.
#[derive(Clone)]
pub struct FilePutResource {
    transfer: Arc<dyn FileTransferPort>,
}

impl FilePutResource {
    pub fn new(transfer: Arc<dyn FileTransferPort>) -> Self {
        Self { transfer }
    }

    async fn deliver(&self, data: &dyn ResourceData, op: Operation) -> AppResult<()> {
        let spec = DeliverySpec::from_data(data);
        let content = spec.resolve_content()?;
        let host = host_from_data(data)?;

        let checked = host
            .validate_host_info()
            .and_then(|_| host.validate_auth_info())
            .and_then(|_| spec.validate_remote_path())
            .and_then(|_| spec.resolve_permissions());
        let permissions = checked.map_err(|err| err.with_context(host.describe()))?;

        let upload = FileUpload {
            content,
            remote_path: spec.remote_path,
            permissions,
        };
        let timeout = data.timeout(op);
        self.transfer
            .put_file(&host, &upload, timeout)
            .await
            .map_err(|err| err.with_context(host.describe()))
    }
}

#[async_trait]
impl Resource for FilePutResource {
    #[tracing::instrument(name = "file_put", level = "debug", skip_all, fields(op = "create"))]
    async fn create(&self, data: &mut dyn ResourceData) -> Diagnostics {
        if let Err(err) = self.deliver(data, Operation::Create).await {
            return err.into();
        }
        data.set_id(new_resource_id());
        Diagnostics::new()
    }

    #[tracing::instrument(name = "file_put", level = "debug", skip_all, fields(op = "read"))]
    async fn read(&self, data: &mut dyn ResourceData) -> Diagnostics {
        validate_only(data)
    }

    #[tracing::instrument(name = "file_put", level = "debug", skip_all, fields(op = "update"))]
    async fn update(&self, data: &mut dyn ResourceData) -> Diagnostics {
        self.deliver(data, Operation::Update).await.into()
    }

    /// The remote file is left in place.
    #[tracing::instrument(name = "file_put", level = "debug", skip_all, fields(op = "delete"))]
    async fn delete(&self, data: &mut dyn ResourceData) -> Diagnostics {
        validate_only(data)
    }
}
