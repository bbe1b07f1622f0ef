//! Load, validate and query generated documentation navigation trees.
//!
//! Layers, innermost first: [`domain`] (data model, parsing, traversal),
//! [`application`] (the navigation store and services), [`infrastructure`]
//! (filesystem-backed fragment source and wiring) and [`cli`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
