//! Attach the failing fragment to errors raised while loading it

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::FragmentId;

/// Turns any error met while fetching, parsing or decoding a fragment into
/// [`ApplicationError::FragmentLoad`] for that fragment.
///
/// ```ignore
/// let source = backend.fetch(&fragment).for_fragment(&fragment)?;
/// ```
pub trait FragmentResultExt<T> {
    fn for_fragment(self, fragment: &FragmentId) -> ApplicationResult<T>;
}

impl<T, E> FragmentResultExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn for_fragment(self, fragment: &FragmentId) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::FragmentLoad {
            fragment: fragment.to_string(),
            source: e.into(),
        })
    }
}
