//! Sync module
//!
//! The one use case of this crate: decide whether a declared stack actually
//! changed and either full-deploy it, push code deltas, or do nothing.
//!
//! ## Structure
//!
//! - `options` - Session configuration (`SyncOptions`)
//! - `result` - Terminal statuses and summaries (`SyncOutcome`)
//! - `gate` - Confirmation wrapper around the full-deploy path
//! - `queue` - Bounded worker pool for per-resource code updates
//! - `use_case` - The orchestrator (`SyncUseCase`)

mod gate;
mod options;
mod queue;
mod result;
mod use_case;

pub use gate::DeploymentGate;
pub use options::{SyncOptions, DEFAULT_CONCURRENCY};
pub use queue::{QueueReport, ResourceSyncQueue};
pub use result::{SyncOutcome, SyncStatus};
pub use use_case::SyncUseCase;
