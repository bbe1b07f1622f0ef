//! Fragment scripts read from a generated documentation directory.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::domain::FragmentId;
use crate::infrastructure::traits::{FileSystem, FragmentSource};

/// Reads `<root>/<fragment>.<extension>`.
pub struct DocsDirSource {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    extension: String,
}

impl DocsDirSource {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            fs,
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the script holding `fragment`. Segments are `[A-Za-z0-9_-]`,
    /// so the id always ends in a file name.
    pub fn script_path(&self, fragment: &FragmentId) -> PathBuf {
        self.root.join(format!("{fragment}.{}", self.extension))
    }
}

impl FragmentSource for DocsDirSource {
    fn fetch(&self, fragment: &FragmentId) -> io::Result<String> {
        let path = self.script_path(fragment);
        debug!("fetch: fragment={} path={}", fragment, path.display());
        if !self.fs.exists(&path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("fragment script not found: {}", path.display()),
            ));
        }
        self.fs.read_to_string(&path)
    }

    fn describe(&self) -> String {
        self.root().display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;

    #[test]
    fn given_nested_fragment_when_building_path_then_appends_extension() {
        let source = DocsDirSource::new(Arc::new(RealFileSystem), "/docs/html", "js");
        let id = FragmentId::parse("group/sub-section").unwrap();
        assert_eq!(
            source.script_path(&id),
            PathBuf::from("/docs/html/group/sub-section.js")
        );
    }

    #[test]
    fn given_flat_fragment_with_custom_extension_when_building_path_then_joins_root() {
        let source = DocsDirSource::new(Arc::new(RealFileSystem), "/docs/html", "json");
        let id = FragmentId::parse("navtreeindex0").unwrap();
        assert_eq!(
            source.script_path(&id),
            PathBuf::from("/docs/html/navtreeindex0.json")
        );
    }

    #[test]
    fn given_missing_script_when_fetching_then_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = DocsDirSource::new(Arc::new(RealFileSystem), dir.path(), "js");
        let err = source
            .fetch(&FragmentId::parse("modules").unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
