//! End-to-end relay tests over real TCP sockets

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::timeout;

use relay_rs::codec::{Record, Text};
use relay_rs::msgs::Num;
use relay_rs::{ClientConfig, RelayClient, RelayConfig, RelayServer, ServerConfig};

const WAIT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(200);

struct TestServer {
    server: Arc<RelayServer>,
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start(relay_config: RelayConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = Arc::new(RelayServer::with_relay_config(
            ServerConfig::with_addr(addr),
            relay_config,
        ));

        let (shutdown, signal) = oneshot::channel::<()>();
        let running = Arc::clone(&server);
        tokio::spawn(async move {
            let _ = running
                .serve_until(listener, async {
                    let _ = signal.await;
                })
                .await;
        });

        Self {
            server,
            addr,
            shutdown: Some(shutdown),
        }
    }

    async fn client(&self) -> RelayClient {
        let before = self.server.relay().registry().len().await;
        let client = RelayClient::connect(ClientConfig::new(self.addr)).await.unwrap();
        self.wait_for_connections(before + 1).await;
        client
    }

    async fn wait_for_connections(&self, count: usize) {
        timeout(WAIT, async {
            while self.server.relay().registry().len().await != count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("connection count not reached");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

fn ada() -> Num {
    Num {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        age: 36,
        score: 100,
    }
}

#[tokio::test]
async fn test_event_reaches_everyone_but_sender() {
    let server = TestServer::start(RelayConfig::default()).await;
    let mut a = server.client().await;
    let mut b = server.client().await;
    let mut c = server.client().await;

    a.publish("server_logger", &ada()).await.unwrap();

    let at_b = timeout(WAIT, b.recv()).await.unwrap().unwrap();
    let at_c = timeout(WAIT, c.recv()).await.unwrap().unwrap();
    assert_eq!(&*at_b.name, "server_logger");
    assert_eq!(at_b, at_c);
    assert_eq!(Num::deserialize(&at_b.payload, 0).unwrap().0, ada());

    assert!(timeout(QUIET, a.recv()).await.is_err(), "sender got its own event");
}

#[tokio::test]
async fn test_typed_records_round_trip_through_relay() {
    let server = TestServer::start(RelayConfig::default()).await;
    let mut producer = server.client().await;
    let mut consumer = server.client().await;

    let records = [
        ada(),
        Num::default(),
        Num {
            first_name: Text::from(vec![0xFF]),
            ..ada()
        },
    ];
    for record in &records {
        producer.publish("server_logger", record).await.unwrap();
    }
    for record in &records {
        let received = timeout(WAIT, consumer.recv_record::<Num>())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(&received, record);
    }
}

#[tokio::test]
async fn test_disconnected_subscriber_does_not_block_others() {
    let server = TestServer::start(RelayConfig::default()).await;
    let mut a = server.client().await;
    let b = server.client().await;
    let mut c = server.client().await;

    drop(b);
    a.emit("server_logger", Bytes::from_static(b"after b left"))
        .await
        .unwrap();

    let at_c = timeout(WAIT, c.recv()).await.unwrap().unwrap();
    assert_eq!(at_c.payload, Bytes::from_static(b"after b left"));

    server.wait_for_connections(2).await;

    // The producer's connection is still usable
    a.emit("server_logger", Bytes::from_static(b"again")).await.unwrap();
    let again = timeout(WAIT, c.recv()).await.unwrap().unwrap();
    assert_eq!(again.payload, Bytes::from_static(b"again"));
}

#[tokio::test]
async fn test_only_allowlisted_events_are_relayed() {
    let server = TestServer::start(RelayConfig::default().relay_event("server_logger")).await;
    let mut a = server.client().await;
    let mut b = server.client().await;

    a.emit("chatter", Bytes::from_static(b"dropped")).await.unwrap();
    a.emit("server_logger", Bytes::from_static(b"kept")).await.unwrap();

    let received = timeout(WAIT, b.recv()).await.unwrap().unwrap();
    assert_eq!(received.payload, Bytes::from_static(b"kept"));

    let stats = server.server.relay().stats();
    assert_eq!(stats.events_received, 2);
    assert_eq!(stats.events_filtered, 1);
}

#[tokio::test]
async fn test_client_close_unregisters() {
    let server = TestServer::start(RelayConfig::default()).await;
    let a = server.client().await;
    let _b = server.client().await;

    a.close().await.unwrap();
    server.wait_for_connections(1).await;

    let stats = server.server.relay().stats();
    assert_eq!(stats.connections_opened, 2);
    assert_eq!(stats.connections_closed, 1);
}
