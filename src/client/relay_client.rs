//! Relay client connection

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::config::ClientConfig;
use crate::codec::Record;
use crate::error::{Error, Result};
use crate::server::frame::EventFrame;

/// Connection to a relay server
///
/// # Example
/// ```no_run
/// use relay_rs::client::{ClientConfig, RelayClient};
/// use relay_rs::msgs::Num;
///
/// # async fn example() -> relay_rs::error::Result<()> {
/// let config = ClientConfig::new("127.0.0.1:3000".parse().unwrap());
/// let mut client = RelayClient::connect(config).await?;
///
/// let record = Num { first_name: "Ada".into(), age: 36, ..Default::default() };
/// client.publish("server_logger", &record).await?;
///
/// while let Some(received) = client.recv_record::<Num>().await? {
///     println!("{:?}", received);
/// }
/// # Ok(())
/// # }
/// ```
pub struct RelayClient {
    writer: OwnedWriteHalf,
    inbound: mpsc::Receiver<EventFrame>,
    reader_task: JoinHandle<()>,
    buf: BytesMut,
}

impl RelayClient {
    /// Connect to the server
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let stream = TcpStream::connect(config.addr).await?;
        if config.tcp_nodelay {
            stream.set_nodelay(true)?;
        }

        tracing::debug!(addr = %config.addr, "Connected to relay");

        let (reader, writer) = stream.into_split();
        let (tx, inbound) = mpsc::channel(config.inbound_queue_capacity);
        let max_frame_size = config.max_frame_size;

        let reader_task = tokio::spawn(async move {
            if let Err(e) = read_frames(reader, tx, max_frame_size).await {
                tracing::debug!(error = %e, "Relay client reader stopped");
            }
        });

        Ok(Self {
            writer,
            inbound,
            reader_task,
            buf: BytesMut::new(),
        })
    }

    /// Send a raw event
    pub async fn emit(&mut self, name: &str, payload: impl Into<Bytes>) -> Result<()> {
        EventFrame::new(name, payload).encode(&mut self.buf)?;
        let frame = self.buf.split();
        self.writer.write_all(&frame).await?;
        Ok(())
    }

    /// Encode `record` and send it as event `name`
    pub async fn publish<R: Record>(&mut self, name: &str, record: &R) -> Result<()> {
        self.emit(name, record.serialize()).await
    }

    /// Next event from the server, or `None` once the connection is gone
    pub async fn recv(&mut self) -> Option<EventFrame> {
        self.inbound.recv().await
    }

    /// Next event decoded as `R`, ignoring the event name
    pub async fn recv_record<R: Record>(&mut self) -> Result<Option<R>> {
        match self.recv().await {
            Some(frame) => {
                let (record, _) = R::deserialize(&frame.payload, 0)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Shut down the write side and stop reading
    pub async fn close(mut self) -> Result<()> {
        self.writer.shutdown().await?;
        self.reader_task.abort();
        Ok(())
    }
}

impl Drop for RelayClient {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

async fn read_frames(
    mut reader: OwnedReadHalf,
    tx: mpsc::Sender<EventFrame>,
    max_frame_size: usize,
) -> Result<()> {
    let mut buf = BytesMut::with_capacity(8 * 1024);

    loop {
        while let Some(frame) = EventFrame::decode(&mut buf, max_frame_size)? {
            if tx.send(frame).await.is_err() {
                return Ok(());
            }
        }

        if reader.read_buf(&mut buf).await? == 0 {
            return if buf.is_empty() {
                Ok(())
            } else {
                Err(Error::ConnectionClosed)
            };
        }
    }
}
