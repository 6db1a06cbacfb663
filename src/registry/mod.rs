//! Connection registry
//!
//! Tracks which connections are currently attached to the relay, in the order
//! they registered. Each entry owns the sending half of that connection's
//! outbound queue, so fan-out can snapshot targets under the read lock and
//! deliver after releasing it.
//!
//! ```text
//!                    Arc<ConnectionRegistry>
//!               ┌──────────────────────────────┐
//!               │ connections: Vec<Entry {     │
//!               │   id,                        │
//!               │   outbound: mpsc::Sender,    │
//!               │ }>                           │
//!               └──────────────┬───────────────┘
//!                              │ targets(excluding)
//!         ┌────────────────────┼────────────────────┐
//!         ▼                    ▼                    ▼
//!    [conn 1]             [conn 2]             [conn 3]
//!    outbound_rx          outbound_rx          outbound_rx ──► TCP
//! ```

pub mod entry;
pub mod error;
pub mod store;

pub use entry::{ConnectionEntry, ConnectionId, ConnectionState, FanoutTarget};
pub use error::RegistryError;
pub use store::ConnectionRegistry;
