//! Request lifecycle phases.
//!
//! A request moves through the four phases strictly forward, each entered
//! exactly once. Entering a phase out of order or twice indicates a bug in
//! the controller or in an embedder driving phases by hand, and is rejected.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ReadData,
    ProcessAction,
    Render,
    Response,
}

impl Phase {
    fn follows(self) -> Option<Phase> {
        match self {
            Phase::ReadData => None,
            Phase::ProcessAction => Some(Phase::ReadData),
            Phase::Render => Some(Phase::ProcessAction),
            Phase::Response => Some(Phase::Render),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("phase {attempted:?} entered out of order (current: {current:?})")]
    OutOfOrder {
        current: Option<Phase>,
        attempted: Phase,
    },

    #[error("phase {0:?} re-entered")]
    Reentered(Phase),
}

/// Enforces forward-only, enter-once phase progression for one request.
#[derive(Debug, Default)]
pub struct PhaseTracker {
    current: Option<Phase>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Phase> {
        self.current
    }

    /// Enter the given phase. Fails unless it is the immediate successor of
    /// the current one.
    pub fn enter(&mut self, phase: Phase) -> Result<(), LifecycleError> {
        if self.current == Some(phase) {
            return Err(LifecycleError::Reentered(phase));
        }
        if self.current != phase.follows() {
            return Err(LifecycleError::OutOfOrder {
                current: self.current,
                attempted: phase,
            });
        }
        self.current = Some(phase);
        Ok(())
    }
}
