// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod deadline;
pub mod payload;
pub mod permissions;
