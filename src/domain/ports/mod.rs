//! Ports - trait seams between the engine and its external collaborators

mod code_hasher;
mod confirmation;
mod fingerprint_repository;
mod provider;
mod sync_events;
mod template_source;

pub use code_hasher::{CodeHashError, CodeHasher};
pub use confirmation::{AutoApprove, Confirmation, DeclineAll};
pub use fingerprint_repository::{FingerprintRepository, FingerprintStoreError, SessionLock};
pub use provider::{DeployOutcome, DeployParameters, ProviderError, StackProvider};
pub use sync_events::{NoopEventSink, SyncEvent, SyncEventSink};
pub use template_source::{TemplateDocument, TemplateSource, TemplateSourceError};
