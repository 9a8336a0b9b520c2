// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::adapters::SshAdapter;
use crate::app::ports::{FileTransferPort, HostKeyProbePort, RemoteExecPort};
use crate::app::resources::{
    DataSource, FilePutResource, HostDataSource, KeyscanDataSource, Resource, RunResource,
};

pub const HOST_DATA_SOURCE: &str = "sshclient_host";
pub const KEYSCAN_DATA_SOURCE: &str = "sshclient_keyscan";
pub const RUN_RESOURCE: &str = "sshclient_run";
pub const FILE_PUT_RESOURCE: &str = "sshclient_file_put";

/// Registry of every resource and data source, keyed by type name.
/// Built once; lookups hand out shared handles.
#[derive(Clone)]
pub struct Provider {
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Arc<dyn DataSource>>,
}

impl Provider {
    pub fn new(
        exec: Arc<dyn RemoteExecPort>,
        transfer: Arc<dyn FileTransferPort>,
        probe: Arc<dyn HostKeyProbePort>,
    ) -> Self {
        let mut resources: BTreeMap<&'static str, Arc<dyn Resource>> = BTreeMap::new();
        resources.insert(RUN_RESOURCE, Arc::new(RunResource::new(exec)));
        resources.insert(FILE_PUT_RESOURCE, Arc::new(FilePutResource::new(transfer)));

        let mut data_sources: BTreeMap<&'static str, Arc<dyn DataSource>> = BTreeMap::new();
        data_sources.insert(HOST_DATA_SOURCE, Arc::new(HostDataSource::new()));
        data_sources.insert(KEYSCAN_DATA_SOURCE, Arc::new(KeyscanDataSource::new(probe)));

        Self {
            resources,
            data_sources,
        }
    }

    pub fn with_defaults() -> Self {
        let ssh = Arc::new(SshAdapter::new());
        Self::new(ssh.clone(), ssh.clone(), ssh)
    }

    pub fn resource(&self, name: &str) -> Option<Arc<dyn Resource>> {
        self.resources.get(name).cloned()
    }

    pub fn data_source(&self, name: &str) -> Option<Arc<dyn DataSource>> {
        self.data_sources.get(name).cloned()
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::ResourceData;
    use crate::state::ResourceState;

    #[test]
    fn registers_every_type() {
        let provider = Provider::with_defaults();
        assert_eq!(
            provider.resource_types().collect::<Vec<_>>(),
            vec![FILE_PUT_RESOURCE, RUN_RESOURCE]
        );
        assert_eq!(
            provider.data_source_types().collect::<Vec<_>>(),
            vec![HOST_DATA_SOURCE, KEYSCAN_DATA_SOURCE]
        );
        assert!(provider.resource("sshclient_scp_put").is_none());
        assert!(provider.data_source(RUN_RESOURCE).is_none());
    }

    #[tokio::test]
    async fn host_data_source_is_reachable_by_name() {
        let provider = Provider::with_defaults();
        let source = provider.data_source(HOST_DATA_SOURCE).unwrap();
        let mut state = ResourceState::new().with_attr("hostname", "example.org");

        let diags = source.read(&mut state).await;

        assert!(diags.is_empty());
        let json = state.get_str("json").unwrap();
        assert!(json.contains("\"hostname\":\"example.org\""));
    }
}
