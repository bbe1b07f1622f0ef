//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Load, validate and query generated documentation navigation trees
#[derive(Parser, Debug)]
#[command(name = "navtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Generated documentation directory (default: built-in navigation data)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub docs_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the navigation tree
    Tree {
        /// Load all deferred fragments first
        #[arg(short, long)]
        expand: bool,
        /// Limit output depth (overrides max_depth from config)
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Find entries by target locator
    Find {
        /// Locator, e.g. a00272.html#connect
        locator: String,
        /// Match the page part only, ignoring anchors
        #[arg(short, long)]
        page: bool,
    },

    /// List the children of an entry, loading its fragment if needed
    Children {
        /// Locator of the entry (first match)
        locator: String,
    },

    /// Show the pagination index or one entry of it
    Index {
        /// Zero-based position
        position: Option<usize>,
    },

    /// Resolve a locator through the paginated index
    Locate {
        /// Locator, e.g. a00041.html
        locator: String,
    },

    /// List distinct pages in navigation order
    Pages,

    /// Load all fragments and cross-check the index
    Check,

    /// Show a summary of the navigation data
    Info,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config instead of one in the docs directory
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
