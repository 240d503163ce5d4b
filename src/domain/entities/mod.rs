//! Domain entities

mod fingerprint;
mod session;
mod template;

pub use fingerprint::Fingerprint;
pub use session::{SessionState, SyncSession};
pub use template::{ResolvedTemplate, ResourceDescriptor, StackNode};
