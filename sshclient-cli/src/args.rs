// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::path::PathBuf;

use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};

use sshclient::Operation;

#[derive(Parser, Debug)]
#[command(
    name = "sshclient",
    version,
    about,
    long_about = None,
    after_help = "Configuration precedence: defaults < config file < command-line flags.\n\
Config path precedence: defaults < SSHCLIENT_CONFIG_PATH < command-line flags.\n\
If --config is omitted, sshclient tries SSHCLIENT_CONFIG_PATH, then the default config file location; missing default config is OK.\n\
Logs are written to stderr; stdout carries only the JSON result."
)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        value_name = "PATH",
        help = "Path to a TOML config file. When omitted, sshclient uses SSHCLIENT_CONFIG_PATH if set, otherwise the default config file location if available."
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        help = "Timeout for operations the manifest does not configure. Overrides `default_timeout_secs` from the config file."
    )]
    pub timeout_secs: Option<u64>,
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::SetTrue,
        help = "Enable debug logging. Overrides `verbose` from the config file."
    )]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// List registered resource and data-source types.
    Types,
    /// Read a resource or data source.
    Read(ManifestArgs),
    /// Create a resource.
    Create(ManifestArgs),
    /// Update a resource.
    Update(ManifestArgs),
    /// Delete a resource.
    Delete(ManifestArgs),
}

impl Cmd {
    /// The lifecycle operation and manifest for every command but `types`.
    pub fn operation(&self) -> Option<(Operation, &ManifestArgs)> {
        match self {
            Cmd::Types => None,
            Cmd::Read(args) => Some((Operation::Read, args)),
            Cmd::Create(args) => Some((Operation::Create, args)),
            Cmd::Update(args) => Some((Operation::Update, args)),
            Cmd::Delete(args) => Some((Operation::Delete, args)),
        }
    }
}

#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// TOML manifest describing the resource.
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,
    /// Also write the resulting state as JSON to this path.
    #[arg(long, value_name = "PATH")]
    pub state_out: Option<PathBuf>,
}

pub struct ParsedCli {
    pub cli: Cli,
    pub verbose_override: Option<bool>,
}

pub fn parse() -> ParsedCli {
    let matches = Cli::command().get_matches();
    let verbose_override = if matches.get_flag("verbose") {
        Some(true)
    } else {
        None
    };
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    ParsedCli {
        cli,
        verbose_override,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "sshclient",
            "create",
            "run.toml",
            "--state-out",
            "state.json",
            "--timeout-secs",
            "3",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.timeout_secs, Some(3));
        assert!(cli.verbose);
        let (op, args) = cli.cmd.operation().unwrap();
        assert_eq!(op, Operation::Create);
        assert_eq!(args.manifest, PathBuf::from("run.toml"));
        assert_eq!(args.state_out, Some(PathBuf::from("state.json")));
    }

    #[test]
    fn types_takes_no_manifest() {
        let cli = Cli::try_parse_from(["sshclient", "types"]).unwrap();
        assert!(cli.cmd.operation().is_none());
        assert!(Cli::try_parse_from(["sshclient", "delete"]).is_err());
    }
}
