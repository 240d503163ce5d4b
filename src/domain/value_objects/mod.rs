//! Value objects - immutable, validated domain values

mod decision;
mod hash;
mod resource;
mod stack_path;

pub use decision::{ChangedResource, DeployReason, SyncDecision};
pub use hash::ContentHash;
pub use resource::{PackagingMode, ResourceKind};
pub use stack_path::StackPath;
