//! Event system for pass generation
//!
//! Provides:
//! - Event types describing the decisions taken while generating passes
//! - Event dispatcher for publishing events to registered listeners

use std::fmt;
use std::sync::Arc;

use super::listener::PassListener;

/// Pass generation event types
#[derive(Debug, Clone, PartialEq)]
pub enum PassEvent {
    /// An incremental (clamped) pass started
    PassStarted {
        /// 1-based pass number.
        pass: u32,
        /// Total number of passes, including the finishing pass.
        passes: u32,
    },
    /// The finishing pass started; the body is emitted unchanged
    FinishPassStarted {
        /// 1-based pass number, equal to the total.
        pass: u32,
    },
    /// A body line had its Z limited to the depth allowed for this pass
    LineClamped {
        /// Index of the line within the body.
        index: usize,
        /// The clamped Z value.
        z: f64,
        /// Deepest pass at which this point is already fully cut.
        last_pass: u32,
    },
    /// A body line was elided because it adds no Y or useful Z motion
    LineSkipped {
        /// Index of the line within the body.
        index: usize,
        /// LastPass of the skipped point.
        last_pass: u32,
    },
    /// A rapid move up to skip height was inserted
    RapidToSkipHeight {
        /// Index of the body line that triggered the move.
        index: usize,
        /// The skip height.
        height: f64,
    },
    /// A controlled move back down to a pending point's depth was inserted
    PlungeToDepth {
        /// Index of the body line being processed when the move was emitted.
        index: usize,
        /// The depth plunged to.
        depth: f64,
    },
    /// A pass finished
    PassCompleted {
        /// 1-based pass number.
        pass: u32,
        /// Number of lines emitted for the pass, excluding its header.
        lines: usize,
    },
}

impl fmt::Display for PassEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassEvent::PassStarted { pass, passes } => write!(f, "Pass {} of {}", pass, passes),
            PassEvent::FinishPassStarted { pass } => write!(f, "Finish pass {}", pass),
            PassEvent::LineClamped {
                index,
                z,
                last_pass,
            } => write!(
                f,
                "Line {}: Z clamped to {:.3} (last pass {})",
                index, z, last_pass
            ),
            PassEvent::LineSkipped { index, last_pass } => {
                write!(f, "Line {}: skipped (last pass {})", index, last_pass)
            }
            PassEvent::RapidToSkipHeight { index, height } => {
                write!(f, "Line {}: rapid to skip height {:.3}", index, height)
            }
            PassEvent::PlungeToDepth { index, depth } => {
                write!(f, "Line {}: plunge to depth {:.3}", index, depth)
            }
            PassEvent::PassCompleted { pass, lines } => {
                write!(f, "Pass {} complete, {} lines", pass, lines)
            }
        }
    }
}

/// Event dispatcher for publishing events to listeners
///
/// Dispatch is synchronous; listeners run on the caller's thread in
/// registration order.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    listeners: Vec<Arc<dyn PassListener>>,
}

impl EventDispatcher {
    /// Create a dispatcher with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn subscribe(&mut self, listener: Arc<dyn PassListener>) {
        self.listeners.push(listener);
    }

    /// Publish an event to all listeners
    pub fn publish(&self, event: PassEvent) {
        for listener in &self.listeners {
            listener.on_event(&event);
        }
    }

    /// Get number of registered listeners
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
