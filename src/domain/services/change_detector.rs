//! Change detection
//!
//! Compares a resolved template tree against the fingerprint from the last
//! successful sync and classifies the delta: full deploy, code-only sync,
//! or nothing to do.
//!
//! The structural hash covers every stack's qualified path and every
//! resource's non-code configuration. Code locations are deliberately
//! excluded; a code-only edit must never change it.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::domain::entities::{Fingerprint, ResolvedTemplate, ResourceDescriptor};
use crate::domain::ports::CodeHasher;
use crate::domain::value_objects::{ChangedResource, ContentHash, DeployReason, SyncDecision};
use crate::error::{SyncError, SyncResult};

/// Everything the orchestrator needs from one detection pass
#[derive(Debug, Clone)]
pub struct DetectionReport {
    /// Structural hash of the current tree; becomes the fingerprint's
    /// structural hash after a successful sync
    pub structural_hash: ContentHash,
    pub decision: SyncDecision,
}

/// Pure detection logic; no I/O beyond the injected code hasher
pub struct ChangeDetector;

impl ChangeDetector {
    /// Deterministic, order-independent digest of the tree's shape and
    /// configuration. Iteration order is fixed because the tree stores
    /// stacks and resources in `BTreeMap`s.
    pub fn structural_hash(template: &ResolvedTemplate) -> ContentHash {
        let mut hasher = Sha256::new();
        for (path, node) in template.stacks() {
            hasher.update(b"stack\0");
            hasher.update(path.qualify("").as_bytes());
            hasher.update([0u8]);
            for (logical_id, resource) in node.resources() {
                hasher.update(b"resource\0");
                hasher.update(logical_id.as_bytes());
                hasher.update([0u8]);
                hasher.update(resource.kind().as_str().as_bytes());
                hasher.update([0u8]);
                if let Some(mode) = resource.packaging_mode() {
                    hasher.update(mode.as_str().as_bytes());
                }
                hasher.update([0u8]);
                // serde_json maps are sorted, so this serialization is
                // canonical for equal values.
                hasher.update(serde_json::to_vec(resource.config()).unwrap_or_default());
                hasher.update([0u8]);
            }
        }
        ContentHash::new(&format!("{:x}", hasher.finalize()))
    }

    /// Code-content hashes for every code-carrying resource in the tree,
    /// keyed by qualified id
    pub fn code_hashes(
        template: &ResolvedTemplate,
        hasher: &dyn CodeHasher,
    ) -> SyncResult<BTreeMap<String, ContentHash>> {
        let mut hashes = BTreeMap::new();
        for (qualified_id, resource) in template.resources() {
            if !resource.has_code() {
                continue;
            }
            let hash = Self::hash_resource(&qualified_id, resource, hasher)?;
            hashes.insert(qualified_id, hash);
        }
        Ok(hashes)
    }

    /// Classify the delta between the current tree and the previous
    /// fingerprint.
    ///
    /// No fingerprint, or a structural-hash mismatch, means full deploy.
    /// Otherwise every code-carrying resource is compared hash-for-hash;
    /// a resource missing from the previous fingerprint counts as changed.
    pub fn detect(
        template: &ResolvedTemplate,
        previous: Option<&Fingerprint>,
        hasher: &dyn CodeHasher,
    ) -> SyncResult<DetectionReport> {
        let structural_hash = Self::structural_hash(template);

        let previous = match previous {
            None => {
                return Ok(DetectionReport {
                    structural_hash,
                    decision: SyncDecision::FullDeploy(DeployReason::FirstSync),
                })
            }
            Some(prev) => prev,
        };

        if !previous.structural_hash().matches(&structural_hash) {
            return Ok(DetectionReport {
                structural_hash,
                decision: SyncDecision::FullDeploy(DeployReason::StructuralChange),
            });
        }

        let mut changed = Vec::new();
        for (qualified_id, resource) in template.resources() {
            if !resource.has_code() {
                continue;
            }
            let new_hash = Self::hash_resource(&qualified_id, resource, hasher)?;
            let drifted = match previous.resource_hash(&qualified_id) {
                Some(old) => !old.matches(&new_hash),
                None => true,
            };
            if drifted {
                changed.push(ChangedResource {
                    qualified_id,
                    descriptor: resource.clone(),
                    new_hash,
                });
            }
        }

        Ok(DetectionReport {
            structural_hash,
            decision: SyncDecision::SkipInfra { changed },
        })
    }

    fn hash_resource(
        qualified_id: &str,
        resource: &ResourceDescriptor,
        hasher: &dyn CodeHasher,
    ) -> SyncResult<ContentHash> {
        hasher.hash(resource).map_err(|err| SyncError::CodeHash {
            resource: qualified_id.to_string(),
            message: err.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::StackNode;
    use crate::domain::ports::CodeHashError;
    use crate::domain::value_objects::{PackagingMode, ResourceKind, StackPath};
    use serde_json::json;

    /// Hashes the code-location string itself; edits are simulated by
    /// pointing a resource at a different location.
    struct PathHasher;

    impl CodeHasher for PathHasher {
        fn hash(&self, descriptor: &ResourceDescriptor) -> Result<ContentHash, CodeHashError> {
            let path = descriptor
                .code_location()
                .ok_or_else(|| CodeHashError::new("no code location"))?;
            Ok(ContentHash::from_bytes(
                path.to_string_lossy().as_bytes(),
            ))
        }
    }

    fn function(id: &str, memory: u64, code: &str) -> ResourceDescriptor {
        ResourceDescriptor::new(id, ResourceKind::Function, json!({"MemorySize": memory}))
            .with_code_location(code)
            .with_packaging_mode(PackagingMode::Inline)
    }

    fn single_stack(resources: Vec<ResourceDescriptor>) -> ResolvedTemplate {
        let mut node = StackNode::new(StackPath::root(), "raw");
        for r in resources {
            node.add_resource(r);
        }
        let mut template = ResolvedTemplate::new();
        template.add_stack(node);
        template
    }

    fn fingerprint_of(template: &ResolvedTemplate) -> Fingerprint {
        let mut fp = Fingerprint::new(ChangeDetector::structural_hash(template));
        for (id, hash) in ChangeDetector::code_hashes(template, &PathHasher).unwrap() {
            fp.set_resource_hash(id, hash);
        }
        fp
    }

    #[test]
    fn code_location_does_not_affect_structural_hash() {
        let a = single_stack(vec![function("F", 128, "src/v1")]);
        let b = single_stack(vec![function("F", 128, "src/v2")]);
        assert!(ChangeDetector::structural_hash(&a)
            .matches(&ChangeDetector::structural_hash(&b)));
    }

    #[test]
    fn config_edit_changes_structural_hash() {
        let a = single_stack(vec![function("F", 128, "src")]);
        let b = single_stack(vec![function("F", 256, "src")]);
        assert!(!ChangeDetector::structural_hash(&a)
            .matches(&ChangeDetector::structural_hash(&b)));
    }

    #[test]
    fn packaging_mode_flip_changes_structural_hash() {
        let a = single_stack(vec![function("F", 128, "src")]);
        let b = single_stack(vec![
            function("F", 128, "src").with_packaging_mode(PackagingMode::SharedLayer)
        ]);
        assert!(!ChangeDetector::structural_hash(&a)
            .matches(&ChangeDetector::structural_hash(&b)));
    }

    #[test]
    fn resource_addition_changes_structural_hash() {
        let a = single_stack(vec![function("F", 128, "src")]);
        let b = single_stack(vec![function("F", 128, "src"), function("G", 128, "src2")]);
        assert!(!ChangeDetector::structural_hash(&a)
            .matches(&ChangeDetector::structural_hash(&b)));
    }

    #[test]
    fn no_previous_fingerprint_means_full_deploy() {
        let template = single_stack(vec![function("F", 128, "src")]);
        let report = ChangeDetector::detect(&template, None, &PathHasher).unwrap();
        assert!(matches!(
            report.decision,
            SyncDecision::FullDeploy(DeployReason::FirstSync)
        ));
    }

    #[test]
    fn structural_drift_means_full_deploy() {
        let before = single_stack(vec![function("F", 128, "src")]);
        let after = single_stack(vec![function("F", 512, "src")]);
        let previous = fingerprint_of(&before);

        let report = ChangeDetector::detect(&after, Some(&previous), &PathHasher).unwrap();
        assert!(matches!(
            report.decision,
            SyncDecision::FullDeploy(DeployReason::StructuralChange)
        ));
    }

    #[test]
    fn unchanged_tree_is_a_no_op() {
        let template = single_stack(vec![function("F", 128, "src")]);
        let previous = fingerprint_of(&template);

        let report = ChangeDetector::detect(&template, Some(&previous), &PathHasher).unwrap();
        assert!(report.decision.is_no_op());
    }

    #[test]
    fn code_only_drift_selects_exactly_the_changed_resources() {
        let before = single_stack(vec![function("F", 128, "src/f1"), function("G", 128, "src/g")]);
        let previous = fingerprint_of(&before);

        // F's code moved; G untouched; structure identical.
        let after = single_stack(vec![function("F", 128, "src/f2"), function("G", 128, "src/g")]);
        let report = ChangeDetector::detect(&after, Some(&previous), &PathHasher).unwrap();

        match report.decision {
            SyncDecision::SkipInfra { changed } => {
                let ids: Vec<&str> = changed.iter().map(|c| c.qualified_id.as_str()).collect();
                assert_eq!(ids, vec!["F"]);
            }
            other => panic!("expected SkipInfra, got {other:?}"),
        }
    }

    #[test]
    fn resource_missing_from_previous_counts_as_changed() {
        let template = single_stack(vec![function("F", 128, "src")]);
        // Same structure, but an empty resource map (e.g. written by an
        // older sync that tracked nothing).
        let previous = Fingerprint::new(ChangeDetector::structural_hash(&template));

        let report = ChangeDetector::detect(&template, Some(&previous), &PathHasher).unwrap();
        match report.decision {
            SyncDecision::SkipInfra { changed } => assert_eq!(changed.len(), 1),
            other => panic!("expected SkipInfra, got {other:?}"),
        }
    }

    #[test]
    fn stale_fingerprint_keys_never_reach_the_decision() {
        let template = single_stack(vec![function("F", 128, "src")]);
        let mut previous = fingerprint_of(&template);
        previous.set_resource_hash("RemovedResource", ContentHash::from_bytes(b"old"));

        let report = ChangeDetector::detect(&template, Some(&previous), &PathHasher).unwrap();
        match report.decision {
            SyncDecision::SkipInfra { changed } => assert!(changed.is_empty()),
            other => panic!("expected SkipInfra, got {other:?}"),
        }
    }

    #[test]
    fn nested_resource_config_edit_is_visible_at_root() {
        let mut root = StackNode::new(StackPath::root(), "raw");
        root.add_resource(ResourceDescriptor::new("Child", ResourceKind::ChildStack, json!({})));
        let mut child_before = StackNode::new(StackPath::root().child("Child"), "raw");
        child_before.add_resource(function("F", 128, "src"));
        let mut before = ResolvedTemplate::new();
        before.add_stack(root.clone());
        before.add_stack(child_before);

        let mut child_after = StackNode::new(StackPath::root().child("Child"), "raw");
        child_after.add_resource(function("F", 1024, "src"));
        let mut after = ResolvedTemplate::new();
        after.add_stack(root);
        after.add_stack(child_after);

        assert!(!ChangeDetector::structural_hash(&before)
            .matches(&ChangeDetector::structural_hash(&after)));
    }
}
