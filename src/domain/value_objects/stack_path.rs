//! Stack path value object
//!
//! Path-qualified identifier for a stack inside a resolved template tree.
//! The root stack is the empty path; nested stacks are identified by the
//! chain of nested-stack logical ids that reaches them, joined with `/`
//! (e.g. `Level1Stack/Level2Stack`).

use std::fmt;

/// Qualified location of a stack within a template tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StackPath(Vec<String>);

impl StackPath {
    /// The root stack path
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of a nested stack declared by `logical_id` inside this stack
    pub fn child(&self, logical_id: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(logical_id.to_string());
        Self(segments)
    }

    /// Qualify a resource logical id with this path.
    ///
    /// Root resources keep their bare logical id; nested resources get the
    /// `Parent/Child/LogicalId` form.
    pub fn qualify(&self, logical_id: &str) -> String {
        if self.0.is_empty() {
            logical_id.to_string()
        } else {
            format!("{}/{}", self.0.join("/"), logical_id)
        }
    }
}

impl fmt::Display for StackPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.0.join("/"))
        }
    }
}
