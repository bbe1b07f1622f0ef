//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::{Path, PathBuf};

use crate::domain::FragmentId;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Canonicalize path (resolve symlinks, make absolute).
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Documentation backend: delivers the source of fragment scripts.
///
/// Implementations may block on I/O. They are shared across threads when
/// deferred subtrees are loaded in parallel.
pub trait FragmentSource: Send + Sync {
    /// Fetch the script text of a fragment.
    fn fetch(&self, fragment: &FragmentId) -> io::Result<String>;

    /// Human-readable description of where fragments come from.
    fn describe(&self) -> String;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

/// Backend used when no documentation directory is configured.
#[derive(Debug, Default)]
pub struct OfflineSource;

impl FragmentSource for OfflineSource {
    fn fetch(&self, fragment: &FragmentId) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::NotConnected,
            format!("no documentation directory configured to load {fragment}"),
        ))
    }

    fn describe(&self) -> String {
        "offline (no documentation directory)".to_string()
    }
}
