//! Navigation data compiled into the binary.
//!
//! Used when no documentation directory is configured.

/// The CAEN FE Library documentation navigation script.
pub const BUILTIN_NAVTREE: &str = include_str!("../../resources/navtreedata.js");

/// Label shown as the data source for the built-in script.
pub const BUILTIN_SOURCE: &str = "<built-in navtreedata.js>";
