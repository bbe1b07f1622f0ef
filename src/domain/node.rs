//! Navigation nodes: one table-of-contents entry each.

use std::fmt;
use std::sync::OnceLock;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::locator::{FragmentId, Locator};

/// One entry of the navigation tree.
///
/// Fields are private so every node is built through [`NavigationNode::new`],
/// which enforces the non-empty label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationNode {
    label: String,
    target: Locator,
    children: Children,
}

/// Children of a node: either materialized in place or stored in a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    /// Ordered children; empty for a leaf.
    Inline(Vec<NavigationNode>),
    /// Children live in an external fragment script.
    Deferred(DeferredChildren),
}

/// Slot for children that are loaded on demand.
///
/// The slot is write-once: after a successful load the children stay
/// materialized for the lifetime of the tree.
#[derive(Debug, Clone)]
pub struct DeferredChildren {
    fragment: FragmentId,
    loaded: OnceLock<Vec<NavigationNode>>,
}

impl DeferredChildren {
    pub fn new(fragment: FragmentId) -> Self {
        Self {
            fragment,
            loaded: OnceLock::new(),
        }
    }

    pub fn fragment(&self) -> &FragmentId {
        &self.fragment
    }

    /// Children, if the fragment has been loaded.
    pub fn loaded(&self) -> Option<&[NavigationNode]> {
        self.loaded.get().map(Vec::as_slice)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Store loaded children. When two loads race, the first stored value is
    /// kept and returned to both callers.
    pub(crate) fn materialize(&self, children: Vec<NavigationNode>) -> &[NavigationNode] {
        self.loaded.get_or_init(|| children)
    }
}

// Equality is about the definition; whether the fragment was loaded yet does not matter.
impl PartialEq for DeferredChildren {
    fn eq(&self, other: &Self) -> bool {
        self.fragment == other.fragment
    }
}

impl Eq for DeferredChildren {}

impl NavigationNode {
    pub fn new(label: impl Into<String>, target: Locator, children: Children) -> DomainResult<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(DomainError::malformed(
                target.as_str(),
                "navigation label is empty",
            ));
        }
        Ok(Self {
            label,
            target,
            children,
        })
    }

    /// Node without children.
    pub fn leaf(label: impl Into<String>, target: Locator) -> DomainResult<Self> {
        Self::new(label, target, Children::Inline(Vec::new()))
    }

    /// Node whose children live in `fragment`.
    pub fn deferred(
        label: impl Into<String>,
        target: Locator,
        fragment: FragmentId,
    ) -> DomainResult<Self> {
        Self::new(label, target, Children::Deferred(DeferredChildren::new(fragment)))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> &Locator {
        &self.target
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    /// Children available without I/O: inline children or a loaded fragment.
    pub fn materialized_children(&self) -> Option<&[NavigationNode]> {
        match &self.children {
            Children::Inline(children) => Some(children),
            Children::Deferred(deferred) => deferred.loaded(),
        }
    }

    /// Fragment id, if the children are deferred.
    pub fn fragment(&self) -> Option<&FragmentId> {
        match &self.children {
            Children::Inline(_) => None,
            Children::Deferred(deferred) => Some(deferred.fragment()),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(&self.children, Children::Inline(children) if children.is_empty())
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.children, Children::Deferred(_))
    }
}

impl fmt::Display for NavigationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.target)
    }
}
