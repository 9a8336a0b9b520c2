// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use anyhow::{Context, Result};
use russh::client::Handle;
use russh_sftp::client::SftpSession;
use russh_sftp::protocol::{FileAttributes, OpenFlags};
use tokio::io::AsyncWriteExt;

use crate::app::ports::FileUpload;

use super::session::ClientHandler;

async fn sftp(handle: &Handle<ClientHandler>) -> Result<SftpSession> {
    let channel = handle.channel_open_session().await?;
    channel.request_subsystem(true, "sftp").await?;
    let sftp = SftpSession::new(channel.into_stream()).await?;
    Ok(sftp)
}

fn mode_attributes(mode: u32) -> FileAttributes {
    FileAttributes {
        permissions: Some(mode),
        ..Default::default()
    }
}

/// Writes the whole payload to `upload.remote_path`, replacing any previous
/// content, then sets the permission bits explicitly so the server umask
/// does not leak into the result.
pub(crate) async fn put_file(handle: &Handle<ClientHandler>, upload: &FileUpload) -> Result<()> {
    let sftp = sftp(handle).await.context("open sftp session")?;
    let path = upload.remote_path.as_str();
    let mode = upload.permissions.mode();

    let flags = OpenFlags::WRITE
        .union(OpenFlags::CREATE)
        .union(OpenFlags::TRUNCATE);
    let mut f = sftp
        .open_with_flags_and_attributes(path, flags, mode_attributes(mode))
        .await
        .with_context(|| format!("open remote file {path}"))?;
    f.write_all(&upload.content)
        .await
        .with_context(|| format!("write remote file {path}"))?;
    f.flush().await?;
    f.shutdown().await?;

    sftp.set_metadata(path, mode_attributes(mode))
        .await
        .with_context(|| format!("set permissions {} on {path}", upload.permissions))?;
    log::debug!(
        "wrote {} bytes to {path} with mode {}",
        upload.content.len(),
        upload.permissions
    );

    if let Err(err) = sftp.close().await {
        log::debug!("error while closing sftp session: {err}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_attributes_only_carry_permissions() {
        let attrs = mode_attributes(0o770);
        assert_eq!(attrs.permissions, Some(0o770));
        assert_eq!(attrs.size, None);
        assert_eq!(attrs.uid, None);
    }
}
