//! Sync event port
//!
//! Observable interface for sync sessions. All user-visible progress flows
//! through a sink implementation (console, test recorder, or nothing).

use std::path::PathBuf;

use crate::domain::ports::provider::DeployOutcome;
use crate::domain::value_objects::DeployReason;

/// Event emitted during a sync session
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// Session accepted its options and started resolving
    Started {
        identity: String,
        template: PathBuf,
    },

    /// Template tree fully resolved
    TemplateResolved { stacks: usize, resources: usize },

    /// Structure unchanged since the last sync; infra deploy skipped
    InfraUnchanged,

    /// Code updates queued for drifted resources
    CodeSyncQueued { count: usize },

    /// A full deploy is required
    FullDeployRequired { reason: DeployReason },

    /// Provider deploy call started
    DeployStarted { identity: String },

    /// Provider deploy call succeeded
    DeployCompleted { outcome: DeployOutcome },

    /// One resource's code update finished
    ResourceSynced { resource: String },

    /// One resource's code update failed; siblings keep running
    ResourceSyncFailed { resource: String, message: String },

    /// A resource update was never dispatched (session cancelled)
    ResourceSyncSkipped { resource: String },

    /// Fingerprint written for this identity
    FingerprintSaved { identity: String },

    /// Terminal summary for the session
    Completed { summary: String },
}

/// Receives sync events
///
/// `Send + Sync` because resource-sync workers emit from pool threads.
pub trait SyncEventSink: Send + Sync {
    fn emit(&self, event: SyncEvent);
}

/// Sink that discards everything
pub struct NoopEventSink;

impl SyncEventSink for NoopEventSink {
    fn emit(&self, _event: SyncEvent) {}
}
