//! Fingerprint repository port
//!
//! Load/save pair passed through the session rather than ambient global
//! state, so sessions for different stack identities never interfere and
//! tests can inject an in-memory store.

use thiserror::Error;

use crate::domain::entities::Fingerprint;

/// Fingerprint store errors
#[derive(Error, Debug)]
pub enum FingerprintStoreError {
    #[error("fingerprint store I/O error: {0}")]
    Io(String),

    #[error("another sync session holds the lock for '{identity}'")]
    SessionBusy { identity: String },
}

/// Held for the duration of a session; dropping it releases the per-stack
/// lock
pub trait SessionLock: Send {}

/// Persistent store of per-stack fingerprints
pub trait FingerprintRepository {
    /// Load the fingerprint for a stack identity. `None` signals a first
    /// sync; a corrupt or unreadable record is also treated as absent so a
    /// full deploy re-establishes it.
    fn load(&self, identity: &str) -> Result<Option<Fingerprint>, FingerprintStoreError>;

    /// Atomically replace the fingerprint for a stack identity. Must never
    /// leave a half-written record visible to concurrent readers.
    fn save(&self, identity: &str, fingerprint: &Fingerprint) -> Result<(), FingerprintStoreError>;

    /// Take the per-identity session lock, failing fast when another
    /// session is already in flight for the same stack.
    fn acquire_session_lock(
        &self,
        identity: &str,
    ) -> Result<Box<dyn SessionLock>, FingerprintStoreError>;
}
