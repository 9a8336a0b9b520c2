// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

mod args;
mod config;
mod logging;
mod manifest;

use std::fs;
use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use sshclient::Provider;

use crate::args::Cmd;
use crate::manifest::{Manifest, Outcome};

fn log_config_report(report: &config::ConfigReport) {
    match (&report.config_path, report.config_path_source) {
        (Some(path), Some(source)) => {
            log::info!(
                "config path: {} (source={}, present={})",
                path.display(),
                source.as_str(),
                report.config_file_present
            );
        }
        (Some(path), None) => {
            log::info!(
                "config path: {} (present={})",
                path.display(),
                report.config_file_present
            );
        }
        (None, _) => {
            log::info!("config path: (none)");
        }
    }
    log::info!(
        "config default_timeout_secs: {} (source={})",
        report.default_timeout_secs.value,
        report.default_timeout_secs.source.as_str()
    );
    log::info!(
        "config verbose: {} (source={})",
        report.verbose.value,
        report.verbose.source.as_str()
    );
}

fn print_types(provider: &Provider) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    for name in provider.resource_types() {
        writeln!(out, "resource\t{name}")?;
    }
    for name in provider.data_source_types() {
        writeln!(out, "data\t{name}")?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args::ParsedCli {
        cli,
        verbose_override,
    } = args::parse();
    let config::LoadResult { config, report } = config::load_with_report(
        cli.config,
        config::Overrides {
            default_timeout_secs: cli.timeout_secs,
            verbose: verbose_override,
        },
    )?;
    logging::init(config.verbose);
    log_config_report(&report);

    let provider = Provider::with_defaults();
    let Some((op, target)) = cli.cmd.operation() else {
        debug_assert!(matches!(cli.cmd, Cmd::Types));
        print_types(&provider)?;
        return Ok(ExitCode::SUCCESS);
    };

    let (kind, mut state) = Manifest::load(&target.manifest)?
        .into_state(config.default_timeout())
        .with_context(|| format!("invalid manifest {}", target.manifest.display()))?;
    log::info!("{op} {kind} from {}", target.manifest.display());
    let diagnostics = manifest::apply(&provider, &kind, op, &mut state).await?;
    for diag in diagnostics.warnings() {
        log::warn!("{kind}: {}: {}", diag.summary, diag.detail);
    }

    let outcome = Outcome {
        kind: &kind,
        operation: op.as_str(),
        state: &state,
        diagnostics: &diagnostics,
    };
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let Some(path) = &target.state_out {
        let json = serde_json::to_string_pretty(&state)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write state to {}", path.display()))?;
    }

    if diagnostics.has_error() {
        for diag in diagnostics.errors() {
            log::error!("{kind}: {}", diag.summary);
        }
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
