//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FragmentSource, FileSystem)
//! but are themselves concrete structs, not traits.

mod check;
mod locate;
mod store;

pub use check::{CheckReport, CheckService};
pub use store::{ExpandReport, FragmentFailure, NavigationTreeStore};
