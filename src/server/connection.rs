//! Per-connection task
//!
//! Reads frames from the socket and hands them to the relay, while a writer
//! drains the connection's outbound queue back onto the socket. Whichever side
//! stops first ends the connection, and the relay is told exactly once.

use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use super::config::ServerConfig;
use super::frame::EventFrame;
use crate::error::{Error, Result};
use crate::registry::ConnectionId;
use crate::relay::{BroadcastEvent, Relay};

/// One accepted connection
pub struct Connection<S> {
    id: ConnectionId,
    stream: S,
    config: ServerConfig,
    relay: Arc<Relay>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(id: ConnectionId, stream: S, config: ServerConfig, relay: Arc<Relay>) -> Self {
        Self {
            id,
            stream,
            config,
            relay,
        }
    }

    /// Drive the connection until the peer goes away or an error occurs.
    ///
    /// Fails with [`Error::Registry`] without touching the socket when the id
    /// is already registered; the existing registration is left alone.
    pub async fn run(self) -> Result<()> {
        let Self {
            id,
            stream,
            config,
            relay,
        } = self;

        let (outbound_tx, outbound_rx) = mpsc::channel(config.outbound_queue_capacity);
        if let Err(e) = relay.on_connect(id, outbound_tx).await {
            tracing::warn!(connection_id = %id, error = %e, "Connection not registered");
            return Err(e.into());
        }

        let (reader, writer) = tokio::io::split(stream);

        let result = tokio::select! {
            result = read_loop(id, reader, &relay, &config) => result,
            result = write_loop(writer, outbound_rx) => result,
        };

        relay.on_disconnect(id).await;
        result
    }
}

async fn read_loop<R>(id: ConnectionId, mut reader: R, relay: &Relay, config: &ServerConfig) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(config.read_buffer_size);

    loop {
        while let Some(frame) = EventFrame::decode(&mut buf, config.max_frame_size)? {
            relay
                .on_event(BroadcastEvent::new(id, frame.name, frame.payload))
                .await;
        }

        if reader.read_buf(&mut buf).await? == 0 {
            if buf.is_empty() {
                return Ok(());
            }
            tracing::debug!(
                connection_id = %id,
                buffered = buf.len(),
                "Peer closed mid-frame"
            );
            return Err(Error::ConnectionClosed);
        }
    }
}

async fn write_loop<W>(mut writer: W, mut outbound: mpsc::Receiver<BroadcastEvent>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = BytesMut::new();

    while let Some(event) = outbound.recv().await {
        EventFrame::new(event.name, event.payload).encode(&mut buf)?;

        // Batch whatever else is already queued into the same write
        while let Ok(event) = outbound.try_recv() {
            EventFrame::new(event.name, event.payload).encode(&mut buf)?;
        }

        writer.write_all(&buf).await?;
        writer.flush().await?;
        buf.clear();
    }

    Ok(())
}
