// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::env;
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{EnvFilter, Registry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "SSHCLIENT_LOG";
const LOG_FORMAT_ENV: &str = "SSHCLIENT_LOG_FORMAT";
const LOG_SPAN_EVENTS_ENV: &str = "SSHCLIENT_LOG_SPAN_EVENTS";
const LOG_FILE_ENV: &str = "SSHCLIENT_LOG_FILE";

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LogFormat {
    Json,
    Pretty,
    Compact,
}

/// Installs the global subscriber. Console output goes to stderr; `log`
/// records from the library are bridged in by `init()`.
pub fn init(verbose: bool) {
    let filter = build_filter(env::var(LOG_ENV).ok(), verbose);
    let span_events = parse_span_events(env_value(LOG_SPAN_EVENTS_ENV).as_deref());
    let format = parse_format(env_value(LOG_FORMAT_ENV).as_deref());
    let file = build_file_writer();
    let registry = Registry::default()
        .with(filter)
        .with(tracing_error::ErrorLayer::default());

    let guard = match format {
        LogFormat::Json => {
            let (writer, guard) = file.unzip();
            let console = tracing_subscriber::fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .with_span_events(span_events.clone())
                .with_writer(std::io::stderr);
            let file_layer = writer.map(|writer| {
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_span_events(span_events)
                    .with_writer(writer)
            });
            registry.with(console).with(file_layer).init();
            guard
        }
        LogFormat::Pretty => {
            let (writer, guard) = file.unzip();
            let console = tracing_subscriber::fmt::layer()
                .pretty()
                .with_timer(UtcTime::rfc_3339())
                .with_span_events(span_events.clone())
                .with_writer(std::io::stderr);
            let file_layer = writer.map(|writer| {
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_span_events(span_events)
                    .with_writer(writer)
            });
            registry.with(console).with(file_layer).init();
            guard
        }
        LogFormat::Compact => {
            let (writer, guard) = file.unzip();
            let console = tracing_subscriber::fmt::layer()
                .compact()
                .with_timer(UtcTime::rfc_3339())
                .with_span_events(span_events.clone())
                .with_writer(std::io::stderr);
            let file_layer = writer.map(|writer| {
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_span_events(span_events)
                    .with_writer(writer)
            });
            registry.with(console).with(file_layer).init();
            guard
        }
    };
    if let Some(guard) = guard {
        let _ = FILE_GUARD.set(guard);
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn build_filter(directive: Option<String>, verbose: bool) -> EnvFilter {
    match directive {
        Some(value) => EnvFilter::new(value),
        None if verbose => EnvFilter::new("debug"),
        None => EnvFilter::new("info"),
    }
}

fn parse_format(raw: Option<&str>) -> LogFormat {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("json") => LogFormat::Json,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::Compact,
    }
}

fn parse_span_events(raw: Option<&str>) -> FmtSpan {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("new") => FmtSpan::NEW,
        Some("enter") => FmtSpan::ENTER,
        Some("exit") => FmtSpan::EXIT,
        Some("close") => FmtSpan::CLOSE,
        _ => FmtSpan::NONE,
    }
}

fn build_file_writer() -> Option<(NonBlocking, WorkerGuard)> {
    let file_path = env_value(LOG_FILE_ENV)?;
    let path = Path::new(&file_path);
    let file_name = path.file_name()?.to_string_lossy().to_string();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let appender = tracing_appender::rolling::never(dir, file_name);
    Some(tracing_appender::non_blocking(appender))
}
