//! Pass listener interface
//!
//! Defines the listener trait for pass events

use super::event::PassEvent;

/// Listener trait for pass events
///
/// Implement this trait to observe the decisions the depth-pass engine takes.
/// Listeners are advisory; they cannot change the generated output.
pub trait PassListener: Send + Sync {
    /// Called for every published event
    fn on_event(&self, _event: &PassEvent) {}
}

/// Forwards every event to `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl PassListener for TracingListener {
    fn on_event(&self, event: &PassEvent) {
        match event {
            PassEvent::PassStarted { .. } | PassEvent::FinishPassStarted { .. } => {
                tracing::debug!("======================== {} ========================", event);
            }
            _ => tracing::debug!("{}", event),
        }
    }
}
