//! Stack provider port
//!
//! The external capability that actually creates/updates infrastructure and
//! pushes code to live resources. The engine never retries provider errors;
//! their messages pass through verbatim so operators can act on them.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::entities::ResolvedTemplate;
use crate::domain::value_objects::ChangedResource;

/// Error returned by the provider, surfaced unmodified
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
    /// Provider-specific error code, when one exists
    pub code: Option<String>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Whether a full deploy created the stack or updated an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployOutcome {
    Created,
    Updated,
}

/// User-supplied parameters handed to the full-deploy capability
#[derive(Debug, Clone, Default)]
pub struct DeployParameters {
    pub stack_identity: String,
    pub parameter_overrides: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
    pub capabilities: Vec<String>,
    /// Artifact storage location and key prefix
    pub artifact_bucket: Option<String>,
    pub artifact_prefix: Option<String>,
    pub kms_key_id: Option<String>,
    /// Default artifact repository for container-image functions
    pub image_repository: Option<String>,
    /// Per-function artifact-repository overrides (logical id -> repository)
    pub image_repositories: BTreeMap<String, String>,
}

/// External deploy/update capability
///
/// `Sync` is required because code updates for independent resources are
/// dispatched from a bounded worker pool sharing one provider reference.
pub trait StackProvider: Sync {
    /// Deploy the full resolved tree. The provider owns dependency
    /// ordering and rollback; a rejection here is terminal for the session.
    fn deploy(
        &self,
        template: &ResolvedTemplate,
        parameters: &DeployParameters,
    ) -> Result<DeployOutcome, ProviderError>;

    /// Push new code to a single live resource
    fn update_resource_code(&self, resource: &ChangedResource) -> Result<(), ProviderError>;
}
