// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use sshclient::app::resources::{DataSource, Resource};
use sshclient::state::Timeouts;
use sshclient::{AttrValue, Diagnostics, Operation, Provider, ResourceState};

/// One resource or data-source instance as written by the user.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
    #[serde(default)]
    pub timeouts: Timeouts,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse manifest {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Builds the state handed to the resource. A zero timeout is rejected.
    pub fn into_state(self, default_timeout: Duration) -> Result<(String, ResourceState)> {
        let Timeouts {
            create,
            read,
            update,
            delete,
        } = &self.timeouts;
        for (op, secs) in [
            (Operation::Create, create),
            (Operation::Read, read),
            (Operation::Update, update),
            (Operation::Delete, delete),
        ] {
            if *secs == Some(0) {
                bail!("timeouts.{op} must be greater than zero");
            }
        }

        let mut state = ResourceState::new().with_default_timeout(default_timeout);
        state.id = self.id;
        state.attributes = self.attributes;
        state.timeouts = self.timeouts;
        Ok((self.kind, state))
    }
}

/// What the CLI prints on stdout after an operation.
#[derive(Debug, Serialize)]
pub struct Outcome<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub operation: &'static str,
    pub state: &'a ResourceState,
    pub diagnostics: &'a Diagnostics,
}

/// Runs `op` against the type named `kind`. Data sources only answer `read`.
pub async fn apply(
    provider: &Provider,
    kind: &str,
    op: Operation,
    state: &mut ResourceState,
) -> Result<Diagnostics> {
    if let Some(resource) = provider.resource(kind) {
        let diags = match op {
            Operation::Create => resource.create(state).await,
            Operation::Read => resource.read(state).await,
            Operation::Update => resource.update(state).await,
            Operation::Delete => resource.delete(state).await,
        };
        return Ok(diags);
    }
    match provider.data_source(kind) {
        Some(source) if op == Operation::Read => Ok(source.read(state).await),
        Some(_) => bail!("{kind} is a data source; only read is supported"),
        None => bail!("unknown type {kind}"),
    }
}
