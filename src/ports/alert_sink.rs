//! Outbound alert port trait.

use crate::domain::signal::Signal;

/// Receives finished signals. Delivery is fire-and-forget: sinks log their
/// own failures and never report back to the state machine.
pub trait AlertSink {
    fn send(&mut self, symbol: &str, signal: &Signal);
}
