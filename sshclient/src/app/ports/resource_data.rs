// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single attribute value as stored by the declarative framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What resources need from the declarative framework: presence-aware
/// attribute reads, a sink for computed attributes, the instance id and the
/// per-operation timeout.
pub trait ResourceData: Send + Sync {
    fn get(&self, key: &str) -> Option<&AttrValue>;

    fn set(&mut self, key: &str, value: AttrValue);

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    fn timeout(&self, op: Operation) -> Duration;

    /// Present, non-empty string. Empty strings count as unset.
    fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(AttrValue::String(value)) if !value.is_empty() => Some(value.as_str()),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(AttrValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(AttrValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }
}
