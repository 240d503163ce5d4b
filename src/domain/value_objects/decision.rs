//! Sync decision value object
//!
//! Single-use output of change detection. Carries no behavior; only the
//! orchestrator interprets it. Never persisted.

use crate::domain::entities::ResourceDescriptor;
use crate::domain::value_objects::ContentHash;

/// Why a full deploy is required
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployReason {
    /// No fingerprint recorded for this stack identity
    FirstSync,
    /// Structural hash drifted from the last successful sync
    StructuralChange,
}

impl std::fmt::Display for DeployReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeployReason::FirstSync => write!(f, "no previous sync recorded"),
            DeployReason::StructuralChange => write!(f, "template structure changed"),
        }
    }
}

/// A resource whose code content drifted since the last sync
#[derive(Debug, Clone)]
pub struct ChangedResource {
    /// Path-qualified logical id (e.g. `ChildStack/HelloWorldFunction`)
    pub qualified_id: String,
    /// The declared resource, as resolved from the template tree
    pub descriptor: ResourceDescriptor,
    /// Code hash computed during detection; becomes the fingerprint entry
    /// once the resource syncs successfully
    pub new_hash: ContentHash,
}

/// Outcome of comparing a resolved template tree against the stored fingerprint
#[derive(Debug, Clone)]
pub enum SyncDecision {
    /// Structure changed (or nothing recorded yet): hand the whole tree to
    /// the provider
    FullDeploy(DeployReason),
    /// Structure unchanged: push code for the drifted resources only.
    /// An empty set means there is nothing to do at all.
    SkipInfra { changed: Vec<ChangedResource> },
}

impl SyncDecision {
    /// Whether this decision requires no work at all
    pub fn is_no_op(&self) -> bool {
        matches!(self, SyncDecision::SkipInfra { changed } if changed.is_empty())
    }
}
