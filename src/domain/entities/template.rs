//! Resolved template tree
//!
//! The tree is stored as a flat `BTreeMap` keyed by path-qualified stack
//! identifiers rather than a live graph of node references. This avoids
//! reference-cycle bookkeeping and makes hashing order-independent by
//! construction. Owned by the resolver during resolution, immutable after.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::{PackagingMode, ResourceKind, StackPath};

/// A single declared resource inside a stack template
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    logical_id: String,
    kind: ResourceKind,
    /// Where the resource's deployable code lives (path relative to the
    /// invocation, resolved by the template source). `None` for resources
    /// without a local code payload.
    code_location: Option<PathBuf>,
    /// Everything that is not code: memory size, roles, inline definitions.
    /// Canonical by construction (`serde_json` maps are sorted).
    config: serde_json::Value,
    /// Structural packaging choice, set for functions only
    packaging_mode: Option<PackagingMode>,
}

impl ResourceDescriptor {
    pub fn new(logical_id: impl Into<String>, kind: ResourceKind, config: serde_json::Value) -> Self {
        Self {
            logical_id: logical_id.into(),
            kind,
            code_location: None,
            config,
            packaging_mode: None,
        }
    }

    pub fn with_code_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.code_location = Some(path.into());
        self
    }

    pub fn with_packaging_mode(mut self, mode: PackagingMode) -> Self {
        self.packaging_mode = Some(mode);
        self
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn code_location(&self) -> Option<&Path> {
        self.code_location.as_deref()
    }

    pub fn config(&self) -> &serde_json::Value {
        &self.config
    }

    pub fn packaging_mode(&self) -> Option<PackagingMode> {
        self.packaging_mode
    }

    /// Whether change detection should track this resource's code content
    pub fn has_code(&self) -> bool {
        self.kind.is_code_syncable() && self.code_location.is_some()
    }
}

/// One stack in the resolved tree
#[derive(Debug, Clone)]
pub struct StackNode {
    path: StackPath,
    /// Raw template body as loaded, kept for the deploy call
    raw: String,
    resources: BTreeMap<String, ResourceDescriptor>,
}

impl StackNode {
    pub fn new(path: StackPath, raw: impl Into<String>) -> Self {
        Self {
            path,
            raw: raw.into(),
            resources: BTreeMap::new(),
        }
    }

    pub fn add_resource(&mut self, descriptor: ResourceDescriptor) {
        self.resources
            .insert(descriptor.logical_id().to_string(), descriptor);
    }

    pub fn path(&self) -> &StackPath {
        &self.path
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn resources(&self) -> impl Iterator<Item = (&String, &ResourceDescriptor)> {
        self.resources.iter()
    }

    pub fn resource(&self, logical_id: &str) -> Option<&ResourceDescriptor> {
        self.resources.get(logical_id)
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

/// The fully resolved template tree for one sync session
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    stacks: BTreeMap<StackPath, StackNode>,
}

impl ResolvedTemplate {
    pub fn new() -> Self {
        Self {
            stacks: BTreeMap::new(),
        }
    }

    pub fn add_stack(&mut self, node: StackNode) {
        self.stacks.insert(node.path().clone(), node);
    }

    pub fn root(&self) -> Option<&StackNode> {
        self.stacks.get(&StackPath::root())
    }

    pub fn stack(&self, path: &StackPath) -> Option<&StackNode> {
        self.stacks.get(path)
    }

    /// All stacks, root first, in stable path order
    pub fn stacks(&self) -> impl Iterator<Item = (&StackPath, &StackNode)> {
        self.stacks.iter()
    }

    pub fn stack_count(&self) -> usize {
        self.stacks.len()
    }

    /// All resources across the tree with their path-qualified ids,
    /// in stable order
    pub fn resources(&self) -> impl Iterator<Item = (String, &ResourceDescriptor)> {
        self.stacks.iter().flat_map(|(path, node)| {
            node.resources
                .values()
                .map(move |descriptor| (path.qualify(descriptor.logical_id()), descriptor))
        })
    }

    pub fn resource_count(&self) -> usize {
        self.stacks.values().map(StackNode::resource_count).sum()
    }
}

impl Default for ResolvedTemplate {
    fn default() -> Self {
        Self::new()
    }
}
