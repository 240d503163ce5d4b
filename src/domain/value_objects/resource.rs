//! Resource kind and packaging mode value objects

use std::fmt;

/// Kind of a declared resource
///
/// The engine only distinguishes the kinds it knows how to code-sync,
/// plus nested stacks (which become child nodes of the template tree).
/// Everything else is `Other` and participates in structural hashing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Function,
    Layer,
    RestApi,
    StateMachine,
    ChildStack,
    Other,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Function => "function",
            ResourceKind::Layer => "layer",
            ResourceKind::RestApi => "rest-api",
            ResourceKind::StateMachine => "state-machine",
            ResourceKind::ChildStack => "child-stack",
            ResourceKind::Other => "other",
        }
    }

    /// Whether resources of this kind carry a code payload that can be
    /// pushed without a full deploy
    pub fn is_code_syncable(&self) -> bool {
        matches!(
            self,
            ResourceKind::Function
                | ResourceKind::Layer
                | ResourceKind::RestApi
                | ResourceKind::StateMachine
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a function's dependencies are attached to its deployable unit.
///
/// This is a structural property: flipping it changes how code is packaged
/// and must force a full deploy, never a code-only sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PackagingMode {
    /// Dependencies bundled into the function artifact
    #[default]
    Inline,
    /// Dependencies split into a shared layer
    SharedLayer,
}

impl PackagingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackagingMode::Inline => "inline",
            PackagingMode::SharedLayer => "shared-layer",
        }
    }
}
