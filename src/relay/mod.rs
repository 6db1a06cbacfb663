//! Broadcast relay
//!
//! The relay forwards every event it receives from one connection to all the
//! other registered connections. Payloads are opaque [`bytes::Bytes`]: the
//! relay never decodes them and does not depend on any record schema, so any
//! producer/consumer pair can agree on their own record types.
//!
//! The transport drives the relay through three hooks:
//!
//! ```text
//! accept ──► on_connect(id, outbound_tx)
//! frame  ──► on_event(event) ──► registry.targets(origin) ──► try_send each
//! EOF    ──► on_disconnect(id)
//! ```

pub mod broadcast;
pub mod config;
pub mod error;
pub mod event;

pub use broadcast::{FanoutReport, Relay};
pub use config::RelayConfig;
pub use error::ForwardFailure;
pub use event::BroadcastEvent;
