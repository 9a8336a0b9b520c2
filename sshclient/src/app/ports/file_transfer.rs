// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::time::Duration;

use async_trait::async_trait;

use crate::app::errors::AppResult;
use crate::app::host::HostDescriptor;
use crate::app::services::permissions::Permissions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub content: Vec<u8>,
    pub remote_path: String,
    pub permissions: Permissions,
}

#[async_trait]
/// Full-overwrite delivery of a byte payload to a remote path.
pub trait FileTransferPort: Send + Sync {
    async fn put_file(
        &self,
        host: &HostDescriptor,
        upload: &FileUpload,
        timeout: Duration,
    ) -> AppResult<()>;
}
