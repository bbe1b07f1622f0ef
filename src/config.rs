//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/navtree/navtree.toml`
//! 3. Local config: `<docs_dir>/.navtree.toml` (next to the generated docs)
//! 4. Environment variables: `NAVTREE_*` prefix
//! 5. `--docs-dir` on the command line

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};

/// Unified configuration for navtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory of the generated HTML documentation (default: built-in data)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_dir: Option<PathBuf>,
    /// Navigation data script inside `docs_dir`
    pub navtree_file: String,
    /// Extension of fragment scripts
    pub fragment_extension: String,
    /// Depth limit for `tree` output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            docs_dir: None,
            navtree_file: "navtreedata.js".into(),
            fragment_extension: "js".into(),
            max_depth: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RawSettings {
    pub docs_dir: Option<PathBuf>,
    pub navtree_file: Option<String>,
    pub fragment_extension: Option<String>,
    pub max_depth: Option<usize>,
}

/// Get the XDG config directory for navtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "navtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("navtree.toml"))
}

/// Get the path to the local config file in a documentation directory.
pub fn local_config_path(docs_dir: &Path) -> PathBuf {
    docs_dir.join(".navtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Path of the navigation data script, if a docs directory is configured.
    pub fn navtree_path(&self) -> Option<PathBuf> {
        self.docs_dir.as_ref().map(|dir| dir.join(&self.navtree_file))
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.docs_dir {
            self.docs_dir = Some(expand_path(dir));
        }
    }

    /// Merge overlay config onto self (base): overlay wins where it is specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            docs_dir: overlay.docs_dir.clone().or_else(|| self.docs_dir.clone()),
            navtree_file: overlay
                .navtree_file
                .clone()
                .unwrap_or_else(|| self.navtree_file.clone()),
            fragment_extension: overlay
                .fragment_extension
                .clone()
                .unwrap_or_else(|| self.fragment_extension.clone()),
            max_depth: overlay.max_depth.or(self.max_depth),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `docs_dir` - Documentation directory given on the command line
    pub fn load(docs_dir: Option<&Path>) -> ApplicationResult<Self> {
        let env = Self::env_overrides()?;
        Self::load_layers(global_config_path().as_deref(), docs_dir, &env)
    }

    /// Load settings from explicit layers.
    ///
    /// The docs directory that locates the local config is taken from the
    /// command line, then the environment, then the global config. A
    /// `docs_dir` key inside the local config itself is ignored.
    pub fn load_layers(
        global: Option<&Path>,
        cli_docs_dir: Option<&Path>,
        env: &RawSettings,
    ) -> ApplicationResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        let docs_dir = cli_docs_dir
            .map(Path::to_path_buf)
            .or_else(|| env.docs_dir.clone())
            .or_else(|| current.docs_dir.clone())
            .map(|dir| expand_path(&dir));

        // 3. Local config next to the docs
        if let Some(dir) = &docs_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                let mut raw = load_raw_settings(&local_path)?;
                if raw.docs_dir.take().is_some() {
                    debug!("ignoring docs_dir in {}", local_path.display());
                }
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables, 5. command line
        current = current.merge_with(env);
        current.docs_dir = docs_dir;

        current.expand_paths();
        Ok(current)
    }

    /// Read NAVTREE_* environment variables.
    fn env_overrides() -> ApplicationResult<RawSettings> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("NAVTREE").prefix_separator("_"))
            .build()
            .map_err(config_err)?;

        Ok(RawSettings {
            docs_dir: config.get_string("docs_dir").ok().map(PathBuf::from),
            navtree_file: config.get_string("navtree_file").ok(),
            fragment_extension: config.get_string("fragment_extension").ok(),
            max_depth: config.get::<usize>("max_depth").ok(),
        })
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# navtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/navtree/navtree.toml  (defines your baseline)
#   Local:  <docs_dir>/.navtree.toml        (per documentation set)
#   Env:    NAVTREE_* environment variables (explicit overrides)
#   CLI:    --docs-dir

# Directory of the generated HTML documentation.
# Without it the built-in navigation data is used and fragments cannot load.
# docs_dir = "~/src/project/doc/html"

# Navigation data script inside docs_dir
# navtree_file = "navtreedata.js"

# Extension of fragment scripts (modules.js, navtreeindex0.js, ...)
# fragment_extension = "js"

# Depth limit for `navtree tree`
# max_depth = 3
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
