// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

//! Remote command execution and file delivery over SSH, exposed as
//! declarative resources and data sources.

pub mod adapters;
pub mod app;
pub mod provider;
pub mod state;

pub use app::diagnostics::{Diagnostic, Diagnostics, Severity};
pub use app::errors::{AppError, AppErrorKind, AppResult};
pub use app::host::{HostDescriptor, HostOverrides};
pub use app::ports::{AttrValue, Operation, ResourceData};
pub use provider::Provider;
pub use state::ResourceState;
