//! Fingerprint entity - what the last successful sync looked like
//!
//! Pure data structure; persistence lives in the fingerprint repository.
//! One fingerprint exists per stack identity, replaced atomically after
//! every successful sync.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::value_objects::ContentHash;

/// Persisted record of the last successful sync for one stack identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// Digest over the tree's shape and non-code configuration
    structural_hash: ContentHash,
    /// Path-qualified resource id -> code-content hash
    resources: BTreeMap<String, ContentHash>,
    /// When the sync that produced this fingerprint completed
    synced_at: DateTime<Utc>,
}

impl Fingerprint {
    pub fn new(structural_hash: ContentHash) -> Self {
        Self {
            structural_hash,
            resources: BTreeMap::new(),
            synced_at: Utc::now(),
        }
    }

    /// Rebuild from persisted parts
    pub fn from_parts(
        structural_hash: ContentHash,
        resources: BTreeMap<String, ContentHash>,
        synced_at: DateTime<Utc>,
    ) -> Self {
        Self {
            structural_hash,
            resources,
            synced_at,
        }
    }

    pub fn structural_hash(&self) -> &ContentHash {
        &self.structural_hash
    }

    pub fn synced_at(&self) -> DateTime<Utc> {
        self.synced_at
    }

    pub fn set_resource_hash(&mut self, qualified_id: impl Into<String>, hash: ContentHash) {
        self.resources.insert(qualified_id.into(), hash);
    }

    pub fn resource_hash(&self, qualified_id: &str) -> Option<&ContentHash> {
        self.resources.get(qualified_id)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&String, &ContentHash)> {
        self.resources.iter()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}
