//! Application layer: use cases composing the domain

pub mod sync;

pub use sync::{SyncOptions, SyncOutcome, SyncStatus, SyncUseCase};
