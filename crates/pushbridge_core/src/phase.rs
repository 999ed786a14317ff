//! Engine phase tracking.
//!
//! Both engines walk the same shape: Idle → Validating → {ChannelOp} →
//! {BackendOp} → Terminal, where the remote-operation phases are optional. A
//! run reaches its terminal state through exactly one path; the tracker
//! asserts that in debug builds and traces every transition.

use tracing::trace;

/// How an attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Success,
    Failure,
}

/// Where an attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Validating,
    ChannelOp,
    BackendOp,
    Terminal(TerminalState),
}

impl EnginePhase {
    /// Legal transitions. ChannelOp → ChannelOp covers the
    /// unregister-then-reregister sequence, which is two channel operations
    /// in one phase family.
    pub fn can_advance_to(self, next: EnginePhase) -> bool {
        use EnginePhase::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, ChannelOp)
                | (Validating, BackendOp)
                | (Validating, Terminal(_))
                | (ChannelOp, ChannelOp)
                | (ChannelOp, BackendOp)
                | (ChannelOp, Terminal(_))
                | (BackendOp, Terminal(_))
        )
    }
}

/// Tracks the phase of one engine attempt.
#[derive(Debug)]
pub struct PhaseTracker {
    current: EnginePhase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            current: EnginePhase::Idle,
        }
    }

    pub fn current(&self) -> EnginePhase {
        self.current
    }

    pub fn advance(&mut self, next: EnginePhase) {
        debug_assert!(
            self.current.can_advance_to(next),
            "illegal engine phase transition {:?} -> {:?}",
            self.current,
            next
        );
        trace!(from = ?self.current, to = ?next, "engine phase transition");
        self.current = next;
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
