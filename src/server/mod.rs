//! TCP transport for the relay
//!
//! Accepts connections, frames named events on each socket and drives the
//! relay's connect / event / disconnect hooks.

pub mod config;
pub mod connection;
pub mod frame;
pub mod listener;

pub use config::ServerConfig;
pub use connection::Connection;
pub use frame::EventFrame;
pub use listener::RelayServer;
