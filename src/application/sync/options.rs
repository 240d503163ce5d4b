//! Sync options
//!
//! Configuration for one sync session, validated before any work starts.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::ports::DeployParameters;
use crate::domain::value_objects::PackagingMode;
use crate::error::{SyncError, SyncResult};

/// Default worker count for the resource-sync queue
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Options for the sync use case
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Target stack identity on the provider
    pub stack_identity: String,
    /// Root template path
    pub template: PathBuf,
    /// Split function dependencies into a shared layer
    pub dependency_layer: bool,
    /// Template parameter overrides
    pub parameter_overrides: BTreeMap<String, String>,
    /// Stack tags
    pub tags: BTreeMap<String, String>,
    /// Capability flags acknowledged for the deploy
    pub capabilities: Vec<String>,
    /// Artifact storage bucket / key prefix
    pub artifact_bucket: Option<String>,
    pub artifact_prefix: Option<String>,
    /// Encryption key for uploaded artifacts
    pub kms_key_id: Option<String>,
    /// Default artifact repository for image functions
    pub image_repository: Option<String>,
    /// Per-function artifact-repository overrides
    pub image_repositories: BTreeMap<String, String>,
    /// Skip the interactive confirmation before a full deploy
    pub auto_approve: bool,
    /// Worker count for the resource-sync queue
    pub concurrency: usize,
}

impl SyncOptions {
    pub fn new(stack_identity: impl Into<String>, template: impl Into<PathBuf>) -> Self {
        Self {
            stack_identity: stack_identity.into(),
            template: template.into(),
            dependency_layer: false,
            parameter_overrides: BTreeMap::new(),
            tags: BTreeMap::new(),
            capabilities: Vec::new(),
            artifact_bucket: None,
            artifact_prefix: None,
            kms_key_id: None,
            image_repository: None,
            image_repositories: BTreeMap::new(),
            auto_approve: false,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_dependency_layer(mut self, enabled: bool) -> Self {
        self.dependency_layer = enabled;
        self
    }

    pub fn with_parameter_overrides(mut self, overrides: BTreeMap<String, String>) -> Self {
        self.parameter_overrides = overrides;
        self
    }

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Vec<String>) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_artifact_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.artifact_bucket = Some(bucket.into());
        self
    }

    pub fn with_artifact_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.artifact_prefix = Some(prefix.into());
        self
    }

    pub fn with_kms_key_id(mut self, key: impl Into<String>) -> Self {
        self.kms_key_id = Some(key.into());
        self
    }

    pub fn with_image_repository(mut self, repository: impl Into<String>) -> Self {
        self.image_repository = Some(repository.into());
        self
    }

    pub fn with_image_repositories(mut self, repositories: BTreeMap<String, String>) -> Self {
        self.image_repositories = repositories;
        self
    }

    pub fn with_auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Packaging mode implied by the dependency-layer flag
    pub fn packaging_mode(&self) -> PackagingMode {
        if self.dependency_layer {
            PackagingMode::SharedLayer
        } else {
            PackagingMode::Inline
        }
    }

    /// Validate before any resolution begins; failures here have no side
    /// effects.
    pub fn validate(&self) -> SyncResult<()> {
        if self.stack_identity.trim().is_empty() {
            return Err(SyncError::Validation(
                "stack name must not be empty".to_string(),
            ));
        }
        if self.template.as_os_str().is_empty() {
            return Err(SyncError::Validation(
                "template path must not be empty".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(SyncError::Validation(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parameters handed to the provider's deploy capability
    pub fn deploy_parameters(&self) -> DeployParameters {
        DeployParameters {
            stack_identity: self.stack_identity.clone(),
            parameter_overrides: self.parameter_overrides.clone(),
            tags: self.tags.clone(),
            capabilities: self.capabilities.clone(),
            artifact_bucket: self.artifact_bucket.clone(),
            artifact_prefix: self.artifact_prefix.clone(),
            kms_key_id: self.kms_key_id.clone(),
            image_repository: self.image_repository.clone(),
            image_repositories: self.image_repositories.clone(),
        }
    }
}
