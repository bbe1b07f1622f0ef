//! Domain layer: navigation data model, parsing and traversal
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builtin;
pub mod decode;
pub mod display;
pub mod document;
pub mod error;
pub mod index;
pub mod locator;
pub mod node;
pub mod script;
pub mod traversal;

pub use display::TreeNodeConvert;
pub use document::{NavTreeDocument, SyncMessages};
pub use error::{DomainError, DomainResult};
pub use index::{IndexChunk, NavigationIndex};
pub use locator::{FragmentId, Locator};
pub use node::{Children, DeferredChildren, NavigationNode};
pub use script::{Script, Value};
pub use traversal::{DepthFirst, FindByTarget};
