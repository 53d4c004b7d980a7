//! Network listener accepting load-test results.
//!
//! Producers connect over TCP and send one JSON-encoded record per line;
//! decoded records are published on the dispatcher's channel. Lines that
//! fail to decode are logged and skipped, never fatal to the connection.

use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::error::{Result, SinkError};
use crate::record::Record;

/// Bind the result listener to an address
pub async fn bind(addr: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    Ok(listener)
}

/// Accept connections until the listener socket fails, forwarding every
/// decoded record into `tx`. Each connection is handled on its own task;
/// a stream whose send fails (dispatcher gone) is logged and dropped.
pub async fn serve(listener: TcpListener, tx: mpsc::Sender<Record>) -> Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        debug!("accepted result stream from {peer}");

        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_stream(socket, tx).await {
                warn!("result stream from {peer} ended: {err}");
            }
        });
    }
}

async fn handle_stream(socket: TcpStream, tx: mpsc::Sender<Record>) -> Result<()> {
    let mut lines = BufReader::new(socket).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let record: Record = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(err) => {
                warn!("discarding undecodable record: {err}");
                continue;
            }
        };

        tx.send(record)
            .await
            .map_err(|err| SinkError::Channel(err.to_string()))?;
    }

    Ok(())
}
