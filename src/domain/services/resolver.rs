//! Template tree resolution
//!
//! Loads the root template and recursively materializes every referenced
//! child-stack template into one flat, path-qualified tree. Pure transform:
//! nothing is written, and no partial tree escapes on error.

use std::path::{Path, PathBuf};

use crate::domain::entities::{ResolvedTemplate, StackNode};
use crate::domain::ports::{TemplateSource, TemplateSourceError};
use crate::domain::value_objects::{PackagingMode, ResourceKind, StackPath};
use crate::error::{SyncError, SyncResult};

/// Resolves a root template into a [`ResolvedTemplate`] tree
pub struct TemplateResolver<'a, S: TemplateSource> {
    source: &'a S,
    packaging_mode: PackagingMode,
}

impl<'a, S: TemplateSource> TemplateResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            packaging_mode: PackagingMode::default(),
        }
    }

    /// Session-wide packaging mode stamped onto every function resource,
    /// so a mode flip shows up as a structural change
    pub fn with_packaging_mode(mut self, mode: PackagingMode) -> Self {
        self.packaging_mode = mode;
        self
    }

    /// Resolve the tree rooted at `root`, following child references to
    /// arbitrary depth. Fails on cycles and unreadable/malformed templates.
    pub fn resolve(&self, root: &Path) -> SyncResult<ResolvedTemplate> {
        let mut template = ResolvedTemplate::new();
        let mut chain: Vec<PathBuf> = Vec::new();
        self.resolve_stack(root, StackPath::root(), &mut template, &mut chain)?;
        Ok(template)
    }

    fn resolve_stack(
        &self,
        path: &Path,
        stack_path: StackPath,
        out: &mut ResolvedTemplate,
        chain: &mut Vec<PathBuf>,
    ) -> SyncResult<()> {
        let normalized = normalize(path);
        if chain.contains(&normalized) {
            let mut names: Vec<String> = chain
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            names.push(normalized.display().to_string());
            return Err(SyncError::CyclicReference {
                chain: names.join(" -> "),
            });
        }
        chain.push(normalized);

        let document = self.source.load(path).map_err(into_load_error)?;

        let mut node = StackNode::new(stack_path.clone(), document.raw);
        for (logical_id, descriptor) in document.resources {
            let descriptor = if descriptor.kind() == ResourceKind::Function {
                descriptor.with_packaging_mode(self.packaging_mode)
            } else {
                descriptor
            };

            if descriptor.kind() == ResourceKind::ChildStack {
                if let Some(child_path) = self.source.child_reference(&descriptor) {
                    self.resolve_stack(
                        &child_path,
                        stack_path.child(&logical_id),
                        out,
                        chain,
                    )?;
                }
            }

            node.add_resource(descriptor);
        }
        out.add_stack(node);

        chain.pop();
        Ok(())
    }
}

/// Canonical form of a template path for cycle detection. Falls back to the
/// lexical path when the source is not backed by real files.
fn normalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn into_load_error(err: TemplateSourceError) -> SyncError {
    match err {
        TemplateSourceError::Read { path, message }
        | TemplateSourceError::Parse { path, message } => {
            SyncError::TemplateLoad { path, message }
        }
    }
}
