//! Broadcast relay server
//!
//! Run with: cargo run --example relay_server [--all]
//!
//! Listens on 0.0.0.0:$PORT (default 3000) and forwards `server_logger`
//! events from each client to every other client. Pass `--all` to relay
//! events of any name.
//!
//! Try it with two publishers:
//!   cargo run --example num_publisher -- 127.0.0.1:3000 Ada
//!   cargo run --example num_publisher -- 127.0.0.1:3000 Grace

use std::net::SocketAddr;
use std::time::Duration;

use relay_rs::server::config::DEFAULT_PORT;
use relay_rs::{RelayConfig, RelayServer, ServerConfig};

fn port_from_env() -> Result<u16, String> {
    match std::env::var("PORT") {
        Ok(value) => value
            .parse()
            .map_err(|_| format!("PORT must be a port number, got '{}'", value)),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("relay_rs=debug".parse()?)
                .add_directive("relay_server=debug".parse()?),
        )
        .init();

    let relay_all = std::env::args().any(|a| a == "--all");
    let port = port_from_env()?;

    let config = ServerConfig::with_addr(SocketAddr::from(([0, 0, 0, 0], port)));
    let relay_config = if relay_all {
        RelayConfig::default()
    } else {
        RelayConfig::default().relay_event("server_logger")
    };

    println!("Relay server running on {}", config.bind_addr);

    let server = RelayServer::with_relay_config(config, relay_config);
    let relay = server.relay().clone();

    // Periodic stats
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(30));
        loop {
            ticker.tick().await;
            let stats = relay.stats();
            tracing::info!(
                open = stats.connections_open(),
                received = stats.events_received,
                deliveries = stats.deliveries,
                failures = stats.forward_failures,
                "Relay stats"
            );
        }
    });

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
            println!("\nShutting down...");
        })
        .await?;

    Ok(())
}
