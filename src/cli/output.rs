//! Terminal output
//!
//! `colored` honours NO_COLOR, CLICOLOR and CLICOLOR_FORCE.

use std::fmt::Display;
use std::path::Path;

use colored::Colorize;

/// Width of the key column in [`field`] lines
const KEY_WIDTH: usize = 18;

/// Red bold "error:" prefix, to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Yellow "warning:" prefix, to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow().bold(), msg);
}

pub fn title(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Indented `key: value` line
pub fn field(key: &str, value: &(impl Display + ?Sized)) {
    let key = format!("{:<width$}", format!("{key}:"), width = KEY_WIDTH);
    println!("  {}{}", key.dimmed(), value);
}

/// Check result that passed
pub fn passed(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Check result that failed, indented under the title
pub fn failed(msg: &(impl Display + ?Sized)) {
    println!("  {} {}", "✗".red(), msg);
}

/// Secondary remark (dimmed)
pub fn note(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().dimmed());
}

/// Tab separated `target  label`, marking children that are not loaded yet
pub fn entry(target: &str, label: &str, pending_fragment: Option<&str>) {
    match pending_fragment {
        Some(fragment) => println!("{target}\t{label} {}", format!("[{fragment}]").dimmed()),
        None => println!("{target}\t{label}"),
    }
}

/// Labels from the root down, separated by `>`
pub fn breadcrumb(labels: &[&str]) {
    let separator = format!(" {} ", ">".dimmed());
    println!("{}", labels.join(&separator));
}

pub fn created(path: &Path) {
    println!("{}: {}", "Created".green(), path.display());
}

/// Plain data line (no color), for output meant to be piped
pub fn data(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
