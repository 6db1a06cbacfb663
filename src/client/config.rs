//! Client configuration

use std::net::SocketAddr;

use crate::server::frame::DEFAULT_MAX_FRAME_SIZE;

/// Client configuration options
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Relay server address
    pub addr: SocketAddr,

    /// Largest frame accepted from the server
    pub max_frame_size: usize,

    /// Received events buffered before the reader stops pulling from the socket
    pub inbound_queue_capacity: usize,

    /// Enable TCP_NODELAY
    pub tcp_nodelay: bool,
}

impl ClientConfig {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            inbound_queue_capacity: 256,
            tcp_nodelay: true,
        }
    }

    /// Set maximum frame size
    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = size;
        self
    }

    /// Set the inbound queue capacity (at least 1)
    pub fn inbound_queue_capacity(mut self, capacity: usize) -> Self {
        self.inbound_queue_capacity = capacity.max(1);
        self
    }
}
