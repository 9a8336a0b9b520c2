// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use async_trait::async_trait;

use crate::app::diagnostics::Diagnostics;
use crate::app::errors::AppResult;
use crate::app::host::{HostDescriptor, HostOverrides};
use crate::app::ports::ResourceData;

use super::{DataSource, new_resource_id};

/// `sshclient_host`: builds a descriptor from an optional base
/// (`extends_host_json`) plus the fields set on this block, and publishes
/// it as `json` for other blocks to consume.
///
/// No validation happens here; a partial descriptor is a legitimate base
/// for another `sshclient_host`.
#[derive(Debug, Clone, Default)]
pub struct HostDataSource;

impl HostDataSource {
    pub fn new() -> Self {
        Self
    }

    fn build(data: &mut dyn ResourceData) -> AppResult<()> {
        let base = match data.get_str("extends_host_json") {
            Some(json) => HostDescriptor::parse(json)?,
            None => HostDescriptor::default(),
        };
        let overrides = HostOverrides::from_data(data);
        let host = base.with_overrides(&overrides);

        data.set("hostname", host.hostname.clone().into());
        data.set("port", host.port.into());
        data.set("username", host.username.clone().into());
        data.set("password", host.password.clone().into());
        data.set(
            "client_private_key_pem",
            host.client_private_key_pem.clone().into(),
        );
        data.set(
            "host_publickey_authorized_key",
            host.host_publickey_authorized_key.clone().into(),
        );
        data.set(
            "insecure_ignore_host_key",
            host.insecure_ignore_host_key.into(),
        );
        data.set("json", host.serialize()?.into());
        data.set_id(new_resource_id());
        Ok(())
    }
}

#[async_trait]
impl DataSource for HostDataSource {
    async fn read(&self, data: &mut dyn ResourceData) -> Diagnostics {
        Self::build(data).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::AttrValue;
    use crate::state::ResourceState;

    async fn read(state: ResourceState) -> (ResourceState, Diagnostics) {
        let mut state = state;
        let diags = HostDataSource::new().read(&mut state).await;
        (state, diags)
    }

    fn json_of(state: &ResourceState) -> HostDescriptor {
        HostDescriptor::parse(state.get_str("json").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn empty_block_yields_defaults() {
        let (state, diags) = read(ResourceState::new()).await;
        assert!(diags.is_empty());
        assert_eq!(json_of(&state), HostDescriptor::default());
        assert_eq!(state.get_int("port"), Some(22));
        assert!(state.id().is_some());
    }

    #[tokio::test]
    async fn chained_blocks_accumulate_fields() {
        let (base, _) = read(
            ResourceState::new()
                .with_attr("hostname", "11.22.33.44")
                .with_attr("port", 2222)
                .with_attr("insecure_ignore_host_key", true),
        )
        .await;

        let (base_foobar, _) = read(
            ResourceState::new()
                .with_attr("extends_host_json", base.get_str("json").unwrap())
                .with_attr("username", "foobar"),
        )
        .await;
        assert_eq!(base_foobar.get_str("hostname"), Some("11.22.33.44"));
        assert_eq!(base_foobar.get_int("port"), Some(2222));

        let (base_foobar_pw, diags) = read(
            ResourceState::new()
                .with_attr("extends_host_json", base_foobar.get_str("json").unwrap())
                .with_attr("password", "supersecret_for_foobar"),
        )
        .await;
        assert!(diags.is_empty());

        let host = json_of(&base_foobar_pw);
        assert_eq!(
            host,
            HostDescriptor {
                hostname: "11.22.33.44".to_string(),
                port: 2222,
                username: "foobar".to_string(),
                password: "supersecret_for_foobar".to_string(),
                insecure_ignore_host_key: true,
                ..Default::default()
            }
        );
        assert!(host.validate().is_ok());
        assert_eq!(
            base_foobar_pw.get("insecure_ignore_host_key"),
            Some(&AttrValue::Bool(true))
        );
    }

    #[tokio::test]
    async fn local_fields_override_the_base() {
        let (base, _) = read(
            ResourceState::new()
                .with_attr("hostname", "old.example.org")
                .with_attr("username", "root"),
        )
        .await;
        let (child, _) = read(
            ResourceState::new()
                .with_attr("extends_host_json", base.get_str("json").unwrap())
                .with_attr("hostname", "new.example.org"),
        )
        .await;
        let host = json_of(&child);
        assert_eq!(host.hostname, "new.example.org");
        assert_eq!(host.username, "root");
    }

    #[tokio::test]
    async fn broken_base_is_a_parse_error() {
        let (state, diags) = read(
            ResourceState::new().with_attr("extends_host_json", "{\"port\": \"twenty\"}"),
        )
        .await;
        assert!(diags.has_error());
        assert!(state.get("json").is_none());
        assert!(state.id().is_none());
    }
}
