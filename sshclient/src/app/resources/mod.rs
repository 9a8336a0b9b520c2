// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;

use crate::app::diagnostics::Diagnostics;
use crate::app::errors::{AppError, AppResult};
use crate::app::host::HostDescriptor;
use crate::app::ports::ResourceData;

pub mod file_put;
pub mod host_data;
pub mod keyscan_data;
pub mod run;

pub use file_put::FilePutResource;
pub use host_data::HostDataSource;
pub use keyscan_data::KeyscanDataSource;
pub use run::RunResource;

#[async_trait]
/// Create/Read/Update/Delete entry points driven by the declarative framework.
pub trait Resource: Send + Sync {
    async fn create(&self, data: &mut dyn ResourceData) -> Diagnostics;
    async fn read(&self, data: &mut dyn ResourceData) -> Diagnostics;
    async fn update(&self, data: &mut dyn ResourceData) -> Diagnostics;
    async fn delete(&self, data: &mut dyn ResourceData) -> Diagnostics;
}

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn read(&self, data: &mut dyn ResourceData) -> Diagnostics;
}

/// Decodes the `host_json` attribute.
pub(crate) fn host_from_data(data: &dyn ResourceData) -> AppResult<HostDescriptor> {
    let Some(json) = data.get_str("host_json") else {
        return Err(AppError::validation("host_json is not provided"));
    };
    HostDescriptor::parse(json)
}

/// Read for resources whose state lives only in the caller: parse and
/// validate, never touch the network.
pub(crate) fn validate_only(data: &dyn ResourceData) -> Diagnostics {
    let result = host_from_data(data).and_then(|host| host.validate());
    Diagnostics::from(result)
}

pub(crate) fn new_resource_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
