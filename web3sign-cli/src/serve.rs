//! Newline-delimited JSON serve loop
//!
//! Reads one command per line, runs each as its own task so slow flows do
//! not block later commands, and writes responses and snapshots as they
//! arrive. On end of input the loop waits for in-flight commands and flushes
//! what they produced.

use anyhow::Result;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use web3sign_core::{Command, Port, Response};

async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

/// Serve commands from `reader`, writing responses to `writer`
pub async fn serve<R, W>(port: Port, reader: R, mut writer: W, sync_on_start: bool) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (port, mut responses) = port.open_session();
    let mut snapshots = port.snapshots();
    let mut lines = reader.lines();
    let mut tasks = JoinSet::new();

    if let Err(e) = port.announce_session().await {
        warn!(error = %e, "Could not restore wallet session");
    }
    if sync_on_start {
        let port = port.clone();
        tasks.spawn(async move {
            let _ = port.handle(Command::Sync).await;
        });
    }

    info!("Serving commands on stdin");

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => {
                    let port = port.clone();
                    tasks.spawn(async move {
                        // Failures are already reported as ERROR responses
                        let _ = port.handle_json(&line).await;
                    });
                }
                None => break,
            },
            Some(response) = responses.recv() => {
                write_message(&mut writer, &response).await?;
            },
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                write_message(&mut writer, &Response::from(snapshot)).await?;
            },
            Some(joined) = tasks.join_next() => {
                if let Err(e) = joined {
                    warn!(error = %e, "Command task panicked");
                }
            },
        }
    }

    debug!(pending = tasks.len(), "Input closed, draining commands");
    while tasks.join_next().await.is_some() {}

    // Every finished task has already queued its responses
    while let Ok(response) = responses.try_recv() {
        write_message(&mut writer, &response).await?;
    }
    if snapshots.has_changed().unwrap_or(false) {
        let snapshot = snapshots.borrow_and_update().clone();
        write_message(&mut writer, &Response::from(snapshot)).await?;
    }

    info!("Serve loop finished");
    Ok(())
}
