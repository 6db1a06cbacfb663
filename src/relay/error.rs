//! Per-target delivery failures

use std::fmt;

/// Why an event could not be handed to one fan-out target
///
/// Failures are contained to that target; the rest of the fan-out proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardFailure {
    /// Target's outbound queue is closed (it disconnected)
    Disconnected,
    /// Target's outbound queue is full; the event is dropped for that target
    QueueFull,
}

impl fmt::Display for ForwardFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardFailure::Disconnected => write!(f, "target disconnected"),
            ForwardFailure::QueueFull => write!(f, "target outbound queue full"),
        }
    }
}

impl std::error::Error for ForwardFailure {}
