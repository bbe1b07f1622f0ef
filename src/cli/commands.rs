//! CLI command implementations

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Locator, NavigationNode, TreeNodeConvert};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Execute the CLI command and return the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    // Commands that do not need settings
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(exitcode::OK);
    }

    let settings = Settings::load(cli.docs_dir.as_deref())?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        None => cmd_info(&container),
        Some(cmd) => match cmd {
            Commands::Tree { expand, depth } => cmd_tree(&container, *expand, *depth),
            Commands::Find { locator, page } => cmd_find(&container, locator, *page),
            Commands::Children { locator } => cmd_children(&container, locator),
            Commands::Index { position } => cmd_index(&container, *position),
            Commands::Locate { locator } => cmd_locate(&container, locator),
            Commands::Pages => cmd_pages(&container),
            Commands::Check => cmd_check(&container),
            Commands::Info => cmd_info(&container),
            Commands::Config { command } => cmd_config(&container, command),
            Commands::Completion { .. } => Ok(exitcode::OK),
        },
    }
}

fn labels<'a>(trail: &[&'a NavigationNode]) -> Vec<&'a str> {
    trail.iter().map(|node| node.label()).collect()
}

// ============================================================
// Tree queries
// ============================================================

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, expand: bool, depth: Option<usize>) -> CliResult<i32> {
    let store = container.store()?;
    let mut code = exitcode::OK;

    if expand {
        let report = store.expand_all();
        for failure in &report.failures {
            output::warning(&format!(
                "'{}' [{}]: {}",
                failure.label, failure.fragment, failure.message
            ));
        }
        if !report.failures.is_empty() {
            code = exitcode::UNAVAILABLE;
        }
    }

    let max_depth = depth.or(container.settings.max_depth);
    output::data(&store.root().to_tree_string(max_depth));
    Ok(code)
}

#[instrument(skip(container))]
fn cmd_find(container: &ServiceContainer, locator: &str, page: bool) -> CliResult<i32> {
    let store = container.store()?;

    let matches: Vec<&NavigationNode> = if page {
        store.find_by_page(locator).collect()
    } else {
        store.find_by_target(locator).collect()
    };

    if matches.is_empty() {
        return Err(CliError::NotFound(format!("no entry targets {locator}")));
    }
    for node in matches {
        match store.breadcrumb(node) {
            Some(trail) => output::data(&format!("{}\t{}", node.target(), labels(&trail).join(" > "))),
            None => output::data(node),
        }
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_children(container: &ServiceContainer, locator: &str) -> CliResult<i32> {
    let store = container.store()?;
    let node = store
        .find_by_target(locator)
        .next()
        .ok_or_else(|| CliError::NotFound(format!("no entry targets {locator}")))?;

    let children = store.resolve_children(node)?;
    if children.is_empty() {
        output::note(&format!("'{}' has no children", node.label()));
    }
    for child in children {
        let pending = child
            .fragment()
            .filter(|_| child.materialized_children().is_none())
            .map(|fragment| fragment.as_str());
        output::entry(child.target().as_str(), child.label(), pending);
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_index(container: &ServiceContainer, position: Option<usize>) -> CliResult<i32> {
    let store = container.store()?;
    let index = store.index();

    match position {
        Some(position) => output::data(index.at(position)?),
        None => {
            output::note(&format!("{} index entries", index.len()));
            for (position, entry) in index.iter().enumerate() {
                output::data(&format!("{position}\t{entry}"));
            }
        }
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_locate(container: &ServiceContainer, locator: &str) -> CliResult<i32> {
    let locator = Locator::parse(locator)?;
    let store = container.store()?;

    match store.locate(locator.as_str())? {
        Some(trail) => {
            output::breadcrumb(&labels(&trail));
            Ok(exitcode::OK)
        }
        None => Err(CliError::NotFound(format!("{locator} is not in the index"))),
    }
}

#[instrument(skip(container))]
fn cmd_pages(container: &ServiceContainer) -> CliResult<i32> {
    let store = container.store()?;
    for page in store.pages() {
        output::data(page);
    }
    Ok(exitcode::OK)
}

// ============================================================
// Check and info
// ============================================================

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer) -> CliResult<i32> {
    let report = container.check_service()?.run();

    output::title(&format!("Checking {}", container.data_source()));
    output::field("nodes", &report.node_count);
    output::field("fragments loaded", &report.fragments_loaded);

    for failure in &report.failures {
        output::failed(&format!(
            "'{}' [{}]: {}",
            failure.label, failure.fragment, failure.message
        ));
    }
    for fragment in &report.repeated_fragments {
        output::warning(&format!("fragment {fragment} is referenced more than once"));
    }
    if !report.index_sorted {
        output::failed("index entries are not in ascending order");
    }
    for entry in &report.unknown_index_entries {
        output::warning(&format!("index entry {entry} is not in the tree"));
    }

    if report.is_ok() {
        output::passed("navigation data is consistent");
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::CHECK_FAILED)
    }
}

#[instrument(skip(container))]
fn cmd_info(container: &ServiceContainer) -> CliResult<i32> {
    let store = container.store()?;
    let root = store.root();
    let top_level = root.materialized_children().map_or(0, <[_]>::len);

    output::title(root.label());
    output::field("source", &container.data_source());
    output::field("fragments", &store.backend_description());
    output::field("top-level entries", &top_level);
    output::field("loaded nodes", &store.node_count());
    output::field("index chunks", &store.index().len());
    output::field("sync on", &store.sync_messages().on);
    output::field("sync off", &store.sync_messages().off);
    Ok(exitcode::OK)
}

// ============================================================
// Config
// ============================================================

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            output::data(&container.settings.to_toml()?);
            Ok(exitcode::OK)
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::field("global", &path.display()),
                None => output::field("global", "(no home directory)"),
            }
            match &container.settings.docs_dir {
                Some(dir) => output::field("local", &local_config_path(dir).display()),
                None => output::field("local", "(no docs directory)"),
            }
            Ok(exitcode::OK)
        }
        ConfigCommands::Init { global } => {
            let path = config_init_path(container, *global)?;
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                container
                    .fs
                    .create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::created(&path);
            Ok(exitcode::OK)
        }
    }
}

fn config_init_path(container: &ServiceContainer, global: bool) -> CliResult<PathBuf> {
    if global {
        return global_config_path()
            .ok_or_else(|| CliError::Usage("cannot determine the config directory".into()));
    }
    container
        .settings
        .docs_dir
        .as_deref()
        .map(local_config_path)
        .ok_or_else(|| {
            CliError::InvalidArgs("local config needs --docs-dir (or use --global)".into())
        })
}
