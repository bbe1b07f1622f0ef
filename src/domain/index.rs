//! Flattened pagination index and its chunks.

use std::collections::HashMap;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::locator::Locator;

/// Ordered, duplicate-free list of locators.
///
/// Entry `i` is the first locator of index chunk `navtreeindex<i>`, so the
/// list is expected to be sorted for [`NavigationIndex::chunk_for`] to work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationIndex {
    entries: Vec<Locator>,
}

impl NavigationIndex {
    pub fn new(entries: Vec<Locator>) -> DomainResult<Self> {
        let mut seen = std::collections::HashSet::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if !seen.insert(entry.as_str()) {
                return Err(DomainError::malformed(
                    format!("NAVTREEINDEX[{position}]"),
                    format!("duplicate index entry {entry}"),
                ));
            }
        }
        Ok(Self { entries })
    }

    /// Entry at a zero-based position.
    pub fn at(&self, position: usize) -> DomainResult<&Locator> {
        self.entries
            .get(position)
            .ok_or(DomainError::IndexOutOfRange {
                position,
                length: self.entries.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locator> {
        self.entries.iter()
    }

    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|w| w[0] <= w[1])
    }

    /// Chunk that may contain `locator`: the last position whose entry is
    /// `<=` the locator, or 0 when there is none.
    pub fn chunk_for(&self, locator: &str) -> usize {
        self.entries
            .partition_point(|entry| entry.as_str() <= locator)
            .saturating_sub(1)
    }
}

/// Contents of one `navtreeindex<N>` script: locator → path of child positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexChunk {
    paths: HashMap<String, Vec<usize>>,
}

impl IndexChunk {
    pub fn new(paths: HashMap<String, Vec<usize>>) -> Self {
        Self { paths }
    }

    /// Path for `locator`, falling back to the path of its page.
    pub fn path_of(&self, locator: &str) -> Option<&[usize]> {
        self.paths
            .get(locator)
            .or_else(|| {
                let page = locator.split_once('#').map(|(page, _)| page)?;
                self.paths.get(page)
            })
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn index(entries: &[&str]) -> NavigationIndex {
        NavigationIndex::new(entries.iter().map(|e| Locator::parse(e).unwrap()).collect()).unwrap()
    }

    #[test]
    fn given_two_entry_index_when_accessing_then_bounds_are_checked() {
        let idx = index(&["a00041.html", "a00130.html#ad2fb6353a9e8c8705649b1aa70182641"]);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.at(0).unwrap(), &"a00041.html");
        assert_eq!(
            idx.at(2),
            Err(DomainError::IndexOutOfRange {
                position: 2,
                length: 2
            })
        );
    }

    #[test]
    fn given_duplicate_entries_when_building_index_then_rejects() {
        let entries = vec![
            Locator::parse("a.html").unwrap(),
            Locator::parse("a.html").unwrap(),
        ];
        assert!(NavigationIndex::new(entries).is_err());
    }

    #[rstest]
    #[case("a00000.html", 0)]
    #[case("a00041.html", 0)]
    #[case("a00100.html", 0)]
    #[case("a00130.html#ad2fb6353a9e8c8705649b1aa70182641", 1)]
    #[case("index.html", 1)]
    fn given_locator_when_finding_chunk_then_uses_last_entry_not_greater(
        #[case] locator: &str,
        #[case] chunk: usize,
    ) {
        let idx = index(&["a00041.html", "a00130.html#ad2fb6353a9e8c8705649b1aa70182641"]);
        assert_eq!(idx.chunk_for(locator), chunk);
    }

    #[test]
    fn given_empty_index_when_finding_chunk_then_returns_zero() {
        assert_eq!(NavigationIndex::default().chunk_for("index.html"), 0);
    }

    #[test]
    fn given_anchor_without_entry_when_looking_up_path_then_falls_back_to_page() {
        let chunk = IndexChunk::new(HashMap::from([("a00272.html".to_string(), vec![2])]));
        assert_eq!(chunk.path_of("a00272.html#connect"), Some(&[2][..]));
        assert_eq!(chunk.path_of("a00273.html"), None);
    }
}
