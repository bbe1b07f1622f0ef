//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::application::services::{CheckService, NavigationTreeStore};
use crate::config::Settings;
use crate::domain::builtin::{BUILTIN_NAVTREE, BUILTIN_SOURCE};
use crate::infrastructure::docs_source::DocsDirSource;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{FileSystem, FragmentSource, OfflineSource, RealFileSystem};

/// Container holding all application services.
///
/// The navigation store is created lazily and cached: the first call to
/// [`ServiceContainer::store`] parses and validates, later calls return the
/// same instance.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    store: OnceLock<Arc<NavigationTreeStore>>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            store: OnceLock::new(),
        }
    }

    /// Backend for deferred fragments: the docs directory, or offline.
    pub fn fragment_source(&self) -> Arc<dyn FragmentSource> {
        match &self.settings.docs_dir {
            Some(dir) => {
                let root = self.fs.canonicalize(dir).unwrap_or_else(|_| dir.clone());
                debug!("fragment source: {}", root.display());
                Arc::new(DocsDirSource::new(
                    Arc::clone(&self.fs),
                    root,
                    self.settings.fragment_extension.clone(),
                ))
            }
            None => Arc::new(OfflineSource),
        }
    }

    /// Where the navigation data script is read from.
    pub fn data_source(&self) -> String {
        self.settings
            .navtree_path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| BUILTIN_SOURCE.to_string())
    }

    /// The navigation store, loaded on first use.
    pub fn store(&self) -> InfraResult<Arc<NavigationTreeStore>> {
        if let Some(store) = self.store.get() {
            return Ok(Arc::clone(store));
        }

        if let Some(dir) = &self.settings.docs_dir {
            if !self.fs.is_dir(dir) {
                return Err(InfraError::DocsDirNotFound(dir.clone()));
            }
        }

        let definition = match self.settings.navtree_path() {
            Some(path) => {
                if !self.fs.exists(&path) {
                    return Err(InfraError::NavigationDataNotFound(path));
                }
                let content = self.fs.read_to_string(&path).map_err(|e| {
                    InfraError::io(format!("read navigation data {}", path.display()), e)
                })?;
                Cow::Owned(content)
            }
            None => Cow::Borrowed(BUILTIN_NAVTREE),
        };

        info!("loading navigation data from {}", self.data_source());
        let built = Arc::new(NavigationTreeStore::load(
            &definition,
            self.fragment_source(),
        )?);
        Ok(Arc::clone(self.store.get_or_init(|| built)))
    }

    /// Consistency check over the loaded store.
    pub fn check_service(&self) -> InfraResult<CheckService> {
        Ok(CheckService::new(self.store()?))
    }
}
