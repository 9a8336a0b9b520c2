// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod diagnostics;
pub mod errors;
pub mod host;
pub mod ports;
pub mod resources;
pub mod services;
pub mod types;
