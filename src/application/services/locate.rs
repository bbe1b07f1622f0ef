//! Locator lookup through the paginated index.
//!
//! The index lists the first locator of every `navtreeindex<N>` chunk. The
//! chunk maps locators to the positions to follow from the root, which may
//! lead through deferred fragments.

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, FragmentResultExt};
use crate::domain::decode::decode_index_chunk;
use crate::domain::{DomainError, FragmentId, IndexChunk, NavigationNode};

use super::store::NavigationTreeStore;

impl NavigationTreeStore {
    /// Breadcrumb (root first) of the node shown for `locator`.
    ///
    /// Returns `None` when the index is empty or the chunk has no entry for
    /// the locator or its page.
    #[instrument(level = "debug", skip(self))]
    pub fn locate(&self, locator: &str) -> ApplicationResult<Option<Vec<&NavigationNode>>> {
        if self.index().is_empty() {
            debug!("locate: no index");
            return Ok(None);
        }

        let chunk_no = self.index().chunk_for(locator);
        let chunk = self.index_chunk(chunk_no)?;
        let Some(path) = chunk.path_of(locator) else {
            debug!("locate: {} not in chunk {}", locator, chunk_no);
            return Ok(None);
        };

        let mut current = self.root();
        let mut trail = vec![current];
        for (depth, &position) in path.iter().enumerate() {
            let parent = current;
            let children = self.resolve_children(parent)?;
            current = children.get(position).ok_or_else(|| {
                DomainError::malformed(
                    format!("{}[{:?}]", chunk_binding(chunk_no), locator),
                    format!(
                        "position {} at depth {} but '{}' has {} children",
                        position,
                        depth,
                        parent.label(),
                        children.len()
                    ),
                )
            })?;
            trail.push(current);
        }
        Ok(Some(trail))
    }

    /// Index chunk `chunk`, fetched once and cached.
    pub fn index_chunk(&self, chunk: usize) -> ApplicationResult<&IndexChunk> {
        let slot = self.chunks.get(chunk).ok_or(DomainError::IndexOutOfRange {
            position: chunk,
            length: self.chunks.len(),
        })?;
        if let Some(loaded) = slot.get() {
            return Ok(loaded);
        }

        let fragment = FragmentId::index_chunk(chunk);
        let binding = chunk_binding(chunk);
        let script = self.fetch_script(&fragment)?;
        let value = script.require(&binding).for_fragment(&fragment)?;
        let decoded = decode_index_chunk(value, &binding).for_fragment(&fragment)?;
        debug!("index chunk {} has {} entries", chunk, decoded.len());
        Ok(slot.get_or_init(|| decoded))
    }
}

fn chunk_binding(chunk: usize) -> String {
    format!("NAVTREEINDEX{chunk}")
}
