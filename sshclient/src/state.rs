// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::{AttrValue, Operation, ResourceData};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-operation timeouts in seconds; unset entries fall back to the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<u64>,
}

impl Timeouts {
    fn get(&self, op: Operation) -> Option<u64> {
        match op {
            Operation::Create => self.create,
            Operation::Read => self.read,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }
}

/// In-memory attribute store implementing [`ResourceData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
    #[serde(default)]
    pub timeouts: Timeouts,
    #[serde(skip, default = "default_timeout")]
    default_timeout: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for ResourceState {
    fn default() -> Self {
        Self {
            id: None,
            attributes: BTreeMap::new(),
            timeouts: Timeouts::default(),
            default_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ResourceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}

impl ResourceData for ResourceState {
    fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    fn set(&mut self, key: &str, value: AttrValue) {
        self.attributes.insert(key.to_string(), value);
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn timeout(&self, op: Operation) -> Duration {
        self.timeouts
            .get(op)
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
    }
}
