//! Relay client
//!
//! Connects to a relay server, emits named events and receives the events
//! other connections emit.

pub mod config;
pub mod relay_client;

pub use config::ClientConfig;
pub use relay_client::RelayClient;
