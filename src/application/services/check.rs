//! Consistency check for a documentation directory's navigation data.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::domain::{FragmentId, Locator};

use super::store::{FragmentFailure, NavigationTreeStore};

/// Result of a full consistency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Materialized nodes after expansion
    pub node_count: usize,
    pub fragments_loaded: usize,
    pub failures: Vec<FragmentFailure>,
    pub repeated_fragments: Vec<FragmentId>,
    /// `chunk_for` needs the index in ascending order
    pub index_sorted: bool,
    /// Index entries whose page does not appear in the expanded tree
    pub unknown_index_entries: Vec<Locator>,
}

impl CheckReport {
    /// No fragment failed and the index is usable for lookups.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty() && self.index_sorted
    }
}

/// Expands the whole tree and cross-checks it against the index.
pub struct CheckService {
    store: Arc<NavigationTreeStore>,
}

impl CheckService {
    pub fn new(store: Arc<NavigationTreeStore>) -> Self {
        Self { store }
    }

    pub fn run(&self) -> CheckReport {
        let expansion = self.store.expand_all();

        let pages: HashSet<&str> = self.store.pages().into_iter().collect();
        let unknown_index_entries: Vec<Locator> = self
            .store
            .index()
            .iter()
            .filter(|entry| !pages.contains(entry.page()))
            .cloned()
            .collect();
        debug!(
            "check: {} pages, {} index entries not in tree",
            pages.len(),
            unknown_index_entries.len()
        );

        CheckReport {
            node_count: self.store.node_count(),
            fragments_loaded: expansion.loaded,
            failures: expansion.failures,
            repeated_fragments: expansion.repeated,
            index_sorted: self.store.index().is_sorted(),
            unknown_index_entries,
        }
    }
}
