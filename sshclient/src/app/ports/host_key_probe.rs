// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::time::Duration;

use async_trait::async_trait;

use crate::app::errors::AppResult;
use crate::app::host::HostDescriptor;

#[async_trait]
/// Discovers the public key a server presents during key exchange.
///
/// Only the key-exchange phase matters. The authentication phase runs with
/// no credentials and its failure is the expected outcome, not an error.
/// Returns the key in one-line authorized-key form.
pub trait HostKeyProbePort: Send + Sync {
    async fn probe_host_key(&self, host: &HostDescriptor, timeout: Duration) -> AppResult<String>;
}
