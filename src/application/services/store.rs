//! Navigation tree store
//!
//! Holds the validated tree and answers structural queries. Deferred subtrees
//! are fetched from the documentation backend on demand and memoized in the
//! tree, so a failed fetch only affects the subtree that asked for it.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationResult, FragmentResultExt};
use crate::domain::decode::decode_children;
use crate::domain::traversal::{find_by_page, path_to};
use crate::domain::{
    Children, DepthFirst, FindByTarget, FragmentId, IndexChunk, NavTreeDocument, NavigationIndex,
    NavigationNode, Script, SyncMessages,
};
use crate::infrastructure::traits::FragmentSource;

/// A deferred subtree that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFailure {
    pub fragment: FragmentId,
    /// Label of the node whose children failed to load
    pub label: String,
    pub message: String,
}

/// Outcome of [`NavigationTreeStore::expand_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandReport {
    /// Fragments loaded during this run
    pub loaded: usize,
    /// One entry per node left unexpanded by a fetch or parse error,
    /// including further references to a fragment that failed
    pub failures: Vec<FragmentFailure>,
    /// Fragments referenced again after a copy of them loaded; left deferred
    pub repeated: Vec<FragmentId>,
}

/// Validated navigation tree plus the backend for its deferred fragments.
pub struct NavigationTreeStore {
    document: NavTreeDocument,
    backend: Arc<dyn FragmentSource>,
    pub(super) chunks: Vec<OnceLock<IndexChunk>>,
}

impl std::fmt::Debug for NavigationTreeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationTreeStore")
            .field("document", &self.document)
            .field("chunks", &self.chunks)
            .finish_non_exhaustive()
    }
}

impl NavigationTreeStore {
    /// Parse and validate a navigation data script.
    #[instrument(level = "debug", skip_all, fields(bytes = definition.len()))]
    pub fn load(definition: &str, backend: Arc<dyn FragmentSource>) -> ApplicationResult<Self> {
        let document = NavTreeDocument::parse(definition)?;
        info!(
            "loaded navigation tree '{}' with {} index entries",
            document.root.label(),
            document.index.len()
        );
        Ok(Self::from_document(document, backend))
    }

    pub fn from_document(document: NavTreeDocument, backend: Arc<dyn FragmentSource>) -> Self {
        let chunks = (0..document.index.len()).map(|_| OnceLock::new()).collect();
        Self {
            document,
            backend,
            chunks,
        }
    }

    pub fn root(&self) -> &NavigationNode {
        &self.document.root
    }

    pub fn index(&self) -> &NavigationIndex {
        &self.document.index
    }

    pub fn sync_messages(&self) -> &SyncMessages {
        &self.document.sync_messages
    }

    pub fn backend_description(&self) -> String {
        self.backend.describe()
    }

    /// Children of `node`, loading its fragment first if needed.
    ///
    /// Inline children are returned without I/O. A deferred node is loaded
    /// once; later calls return the memoized children. On failure the node
    /// stays deferred and may be retried.
    #[instrument(level = "debug", skip_all, fields(label = %node.label()))]
    pub fn resolve_children<'n>(
        &self,
        node: &'n NavigationNode,
    ) -> ApplicationResult<&'n [NavigationNode]> {
        match node.children() {
            Children::Inline(children) => Ok(children),
            Children::Deferred(slot) => {
                if let Some(children) = slot.loaded() {
                    return Ok(children);
                }
                let children = self.load_fragment(slot.fragment())?;
                Ok(slot.materialize(children))
            }
        }
    }

    fn load_fragment(&self, fragment: &FragmentId) -> ApplicationResult<Vec<NavigationNode>> {
        let script = self.fetch_script(fragment)?;
        let binding = fragment.binding_name();
        let value = script.require(&binding).for_fragment(fragment)?;
        let children = decode_children(value, &binding).for_fragment(fragment)?;
        debug!("fragment {} has {} entries", fragment, children.len());
        Ok(children)
    }

    pub(super) fn fetch_script(&self, fragment: &FragmentId) -> ApplicationResult<Script> {
        let source = self.backend.fetch(fragment).for_fragment(fragment)?;
        Script::parse(&source).for_fragment(fragment)
    }

    /// Nodes whose target equals `locator`, depth-first, without I/O.
    ///
    /// Each call starts again at the root. Loaded fragments are searched too.
    pub fn find_by_target(&self, locator: &str) -> FindByTarget<'_> {
        FindByTarget::new(self.root(), locator)
    }

    /// Nodes whose target page equals `page`, depth-first, without I/O.
    pub fn find_by_page<'s>(&'s self, page: &'s str) -> impl Iterator<Item = &'s NavigationNode> + 's {
        find_by_page(self.root(), page)
    }

    /// Path from the root to `node` (both included), if `node` is part of this tree.
    pub fn breadcrumb(&self, node: &NavigationNode) -> Option<Vec<&NavigationNode>> {
        path_to(self.root(), |candidate| std::ptr::eq(candidate, node))
    }

    /// Distinct pages in depth-first order over the materialized tree.
    pub fn pages(&self) -> Vec<&str> {
        DepthFirst::new(self.root())
            .map(|node| node.target().page())
            .unique()
            .collect()
    }

    /// Number of materialized nodes.
    pub fn node_count(&self) -> usize {
        DepthFirst::new(self.root()).count()
    }

    /// Load every reachable deferred subtree.
    ///
    /// Works level by level; the fragments of one level are fetched in
    /// parallel. A failing fragment is reported and its siblings still load.
    #[instrument(level = "debug", skip(self))]
    pub fn expand_all(&self) -> ExpandReport {
        let mut report = ExpandReport::default();
        let mut seen: HashSet<FragmentId> = DepthFirst::new(self.root())
            .filter(|node| node.materialized_children().is_some())
            .filter_map(|node| node.fragment().cloned())
            .collect();
        let mut repeats = Vec::new();
        let mut frontier = self.pending_below(self.root(), &mut seen, &mut repeats);

        while !frontier.is_empty() {
            debug!("expanding {} fragments", frontier.len());
            let results: Vec<_> = frontier
                .par_iter()
                .map(|&node| (node, self.resolve_children(node)))
                .collect();

            let mut next = Vec::new();
            for (node, result) in results {
                match result {
                    Ok(children) => {
                        report.loaded += 1;
                        for child in children {
                            next.extend(self.pending_below(child, &mut seen, &mut repeats));
                        }
                    }
                    Err(e) => {
                        warn!("cannot expand '{}': {}", node.label(), e);
                        if let Some(fragment) = node.fragment() {
                            report.failures.push(FragmentFailure {
                                fragment: fragment.clone(),
                                label: node.label().to_string(),
                                message: e.to_string(),
                            });
                        }
                    }
                }
            }
            frontier = next;
        }

        // A second reference only counts as repeated when its fragment loaded.
        let failed: HashMap<FragmentId, String> = report
            .failures
            .iter()
            .map(|f| (f.fragment.clone(), f.message.clone()))
            .collect();
        for node in repeats {
            let Some(fragment) = node.fragment() else {
                continue;
            };
            match failed.get(fragment) {
                Some(message) => report.failures.push(FragmentFailure {
                    fragment: fragment.clone(),
                    label: node.label().to_string(),
                    message: message.clone(),
                }),
                None => report.repeated.push(fragment.clone()),
            }
        }

        info!(
            "expanded {} fragments, {} failed",
            report.loaded,
            report.failures.len()
        );
        report
    }

    /// Unloaded deferred nodes at or below `start`, skipping fragments already taken.
    /// Nodes whose fragment was taken elsewhere go to `repeats`.
    fn pending_below<'s>(
        &self,
        start: &'s NavigationNode,
        seen: &mut HashSet<FragmentId>,
        repeats: &mut Vec<&'s NavigationNode>,
    ) -> Vec<&'s NavigationNode> {
        let mut pending = Vec::new();
        for node in DepthFirst::new(start) {
            let Some(fragment) = node.fragment() else {
                continue;
            };
            if node.materialized_children().is_some() {
                continue;
            }
            if seen.insert(fragment.clone()) {
                pending.push(node);
            } else {
                debug!("fragment {} referenced again, leaving it deferred", fragment);
                repeats.push(node);
            }
        }
        pending
    }
}
