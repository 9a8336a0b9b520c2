// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use anyhow::{Context, Result};
use russh::ChannelMsg;
use russh::client::Handle;

use super::session::ClientHandler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExitOutcome {
    Status(u32),
    Signal(String),
}

/// Everything a remote command produced before its channel closed.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Capture {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit: Option<ExitOutcome>,
}

impl Capture {
    /// `None` for a clean exit, otherwise the failure message.
    pub fn exit_error(&self) -> Option<String> {
        match &self.exit {
            Some(ExitOutcome::Status(0)) => None,
            Some(ExitOutcome::Status(status)) => {
                Some(format!("Process exited with status {status}"))
            }
            Some(ExitOutcome::Signal(signal)) => {
                Some(format!("Process exited with signal {signal}"))
            }
            None => Some("Process exited without exit status".to_string()),
        }
    }
}

/// Folds one channel message into `capture`; true once the channel closed.
fn handle_capture_message(msg: &ChannelMsg, capture: &mut Capture) -> bool {
    match msg {
        ChannelMsg::Data { data } => {
            capture.stdout.extend_from_slice(data);
            false
        }
        ChannelMsg::ExtendedData { data, ext: 1 } => {
            capture.stderr.extend_from_slice(data);
            false
        }
        ChannelMsg::ExitStatus { exit_status } => {
            capture.exit = Some(ExitOutcome::Status(*exit_status));
            false
        }
        ChannelMsg::ExitSignal { signal_name, .. } => {
            capture.exit = Some(ExitOutcome::Signal(format!("{signal_name:?}")));
            false
        }
        ChannelMsg::Close => true,
        _ => false,
    }
}

/// Runs `command` on a fresh session channel, collecting stdout and stderr
/// until the server closes the channel.
pub(crate) async fn exec_capture(
    handle: &Handle<ClientHandler>,
    command: &[u8],
) -> Result<Capture> {
    let mut chan = handle
        .channel_open_session()
        .await
        .context("open session")?;
    chan.exec(true, command).await.context("exec request")?;

    let mut capture = Capture::default();
    while let Some(msg) = chan.wait().await {
        if handle_capture_message(&msg, &mut capture) {
            break;
        }
    }

    let _ = chan.close().await;
    Ok(capture)
}
