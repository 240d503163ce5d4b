//! Template source port
//!
//! Abstraction over where templates come from: files on disk, synthesized
//! template bodies (e.g. CDK output), or in-memory fixtures in tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::ResourceDescriptor;

/// Errors surfaced by a template source
#[derive(Error, Debug)]
pub enum TemplateSourceError {
    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("malformed template {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// A loaded and parsed stack template, before tree resolution
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    /// Raw template body as loaded
    pub raw: String,
    /// Declared resources keyed by logical id
    pub resources: BTreeMap<String, ResourceDescriptor>,
}

/// Loads templates and resolves references to child-stack templates
pub trait TemplateSource {
    /// Load and parse the template at `path`
    fn load(&self, path: &Path) -> Result<TemplateDocument, TemplateSourceError>;

    /// If `descriptor` declares a child stack backed by a locally
    /// resolvable template, return its path
    fn child_reference(&self, descriptor: &ResourceDescriptor) -> Option<PathBuf>;
}
