//! Sync session and its state machine
//!
//! One session per invocation. The orchestrator drives the session through
//! the legal transitions; `can_transition_to` is the single source of truth
//! for which transitions exist.

/// States a sync session moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Start,
    Resolving,
    Detecting,
    /// Awaiting confirmation before a full deploy
    Gating,
    Deploying,
    /// Dispatching per-resource code updates
    Queuing,
    Persisting,
    Done,
    Failed,
}

impl SessionState {
    /// Legal transitions of the sync state machine
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Start, Resolving)
                | (Resolving, Detecting)
                | (Resolving, Failed)
                | (Detecting, Gating)
                | (Detecting, Queuing)
                | (Detecting, Done)
                | (Detecting, Failed)
                | (Gating, Deploying)
                | (Gating, Done)
                | (Deploying, Persisting)
                | (Deploying, Failed)
                | (Queuing, Persisting)
                | (Queuing, Failed)
                | (Persisting, Done)
                | (Persisting, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Done | SessionState::Failed)
    }
}

/// Top-level context for one sync invocation
#[derive(Debug)]
pub struct SyncSession {
    identity: String,
    state: SessionState,
}

impl SyncSession {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            state: SessionState::Start,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Move to the next state, which must be a legal transition
    pub fn advance(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal session transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    /// Absorb into the failed state from wherever the session is
    pub fn fail(&mut self) {
        self.state = SessionState::Failed;
    }
}
