//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod docs_source;
pub mod error;
pub mod traits;

pub use docs_source::DocsDirSource;
pub use error::{InfraError, InfraResult};
