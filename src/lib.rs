//! relay-rs: a fixed-schema binary record codec and a broadcast relay
//!
//! Producers encode typed records with the [`codec`], send them as named
//! events over a persistent connection, and the [`relay`] forwards each event
//! to every other connected endpoint. The relay treats payloads as opaque
//! bytes, so it never needs to know which record types its clients exchange.
//!
//! # Example
//!
//! ```no_run
//! use relay_rs::{RelayServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> relay_rs::error::Result<()> {
//!     let server = RelayServer::new(ServerConfig::default());
//!     server.run().await
//! }
//! ```
//!
//! Encoding a record:
//!
//! ```
//! use relay_rs::codec::Record;
//! use relay_rs::msgs::Num;
//!
//! let ada = Num { first_name: "Ada".into(), last_name: "Lovelace".into(), age: 36, score: 100 };
//! let bytes = ada.serialize();
//! assert_eq!(bytes.len(), 24);
//! assert_eq!(Num::deserialize(&bytes, 0).unwrap(), (ada, 24));
//! ```

pub mod client;
pub mod codec;
pub mod error;
pub mod msgs;
pub mod registry;
pub mod relay;
pub mod server;
pub mod stats;

pub use client::{ClientConfig, RelayClient};
pub use error::{Error, Result};
pub use registry::{ConnectionId, ConnectionRegistry};
pub use relay::{BroadcastEvent, Relay, RelayConfig};
pub use server::{RelayServer, ServerConfig};
