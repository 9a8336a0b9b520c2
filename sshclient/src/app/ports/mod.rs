// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod file_transfer;
pub mod host_key_probe;
pub mod remote_exec;
pub mod resource_data;

pub use file_transfer::{FileTransferPort, FileUpload};
pub use host_key_probe::HostKeyProbePort;
pub use remote_exec::{ExecutionResult, RemoteExecPort};
pub use resource_data::{AttrValue, Operation, ResourceData};
