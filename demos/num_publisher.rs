//! Publishes `Num` records and prints the ones other clients publish
//!
//! Run with: cargo run --example num_publisher -- [SERVER_ADDR] [NAME]

use std::net::SocketAddr;
use std::time::Duration;

use relay_rs::codec::Record;
use relay_rs::msgs::Num;
use relay_rs::{ClientConfig, RelayClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("relay_rs=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let addr: SocketAddr = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("127.0.0.1:3000")
        .parse()?;
    let name = args.get(2).cloned().unwrap_or_else(|| "Ada".to_string());

    println!("Connecting to {} as {}", addr, name);
    println!("Schema {} ({})", Num::DATATYPE, Num::fingerprint());

    let mut client = RelayClient::connect(ClientConfig::new(addr)).await?;
    let mut ticker = tokio::time::interval(Duration::from_secs(2));
    let mut score = 0u32;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                score += 1;
                let record = Num {
                    first_name: name.as_str().into(),
                    last_name: "Publisher".into(),
                    age: 36,
                    score,
                };
                client.publish("server_logger", &record).await?;
            }
            received = client.recv_record::<Num>() => {
                match received? {
                    Some(num) => println!(
                        "{} {} age={} score={}",
                        num.first_name, num.last_name, num.age, num.score
                    ),
                    None => {
                        println!("Relay closed the connection");
                        return Ok(());
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                client.close().await?;
                return Ok(());
            }
        }
    }
}
