//! StackSync - incremental infrastructure and code synchronization
//!
//! StackSync keeps a deployed cloud stack aligned with a local template
//! tree. Each run resolves the template (nested stacks included), compares
//! a structural hash and per-resource code hashes against the fingerprint
//! recorded by the last successful sync, and then either hands the whole
//! tree to the deploy provider or pushes code updates for just the
//! resources that drifted.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{SyncOptions, SyncOutcome, SyncStatus, SyncUseCase};
pub use domain::entities::{Fingerprint, ResolvedTemplate, ResourceDescriptor, StackNode};
pub use domain::services::{ChangeDetector, DetectionReport, TemplateResolver};
pub use domain::value_objects::{
    ChangedResource, ContentHash, DeployReason, PackagingMode, ResourceKind, StackPath,
    SyncDecision,
};
pub use error::{SyncError, SyncResult};
