//! Code hasher port
//!
//! Computes content-addressed digests over a resource's deployable code
//! payload. Structural configuration never flows through here.

use thiserror::Error;

use crate::domain::entities::ResourceDescriptor;
use crate::domain::value_objects::ContentHash;

/// Errors from hashing a resource's code content
#[derive(Error, Debug)]
#[error("{message}")]
pub struct CodeHashError {
    pub message: String,
}

impl CodeHashError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Computes the code-content hash of a resource
pub trait CodeHasher {
    fn hash(&self, descriptor: &ResourceDescriptor) -> Result<ContentHash, CodeHashError>;
}
