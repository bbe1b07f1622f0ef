//! Resource locators and fragment identifiers

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::{DomainError, DomainResult};

static FRAGMENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+(/[A-Za-z0-9_-]+)*$").expect("valid regex"));

/// Relative reference to a documentation page, optionally with an in-page anchor.
///
/// `a00272.html#connect` has page `a00272.html` and anchor `connect`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locator(String);

impl Locator {
    /// Validate and wrap a locator string.
    ///
    /// Rejects empty strings, whitespace, absolute paths, URL schemes,
    /// an empty page part and more than one `#`.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let invalid = |reason: &str| DomainError::InvalidLocator {
            locator: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("locator is empty"));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(invalid("locator contains whitespace"));
        }
        if raw.starts_with('/') || raw.contains("://") {
            return Err(invalid("locator must be relative"));
        }
        if raw.matches('#').count() > 1 {
            return Err(invalid("locator has more than one fragment separator"));
        }
        if raw.starts_with('#') {
            return Err(invalid("locator has no page part"));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Page part (everything before `#`).
    pub fn page(&self) -> &str {
        match self.0.split_once('#') {
            Some((page, _)) => page,
            None => &self.0,
        }
    }

    /// Anchor part (after `#`), if any.
    pub fn anchor(&self) -> Option<&str> {
        self.0.split_once('#').map(|(_, anchor)| anchor)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Locator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq<str> for Locator {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Locator {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Identifier of an external fragment script holding a deferred subtree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(String);

impl FragmentId {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if raw.is_empty() {
            return Err(DomainError::InvalidFragmentId {
                id: raw.to_string(),
                reason: "fragment id is empty".to_string(),
            });
        }
        if !FRAGMENT_ID.is_match(raw) {
            return Err(DomainError::InvalidFragmentId {
                id: raw.to_string(),
                reason: "expected '/'-separated segments of [A-Za-z0-9_-]".to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }

    /// Id of the `navtreeindex<N>` chunk script.
    pub fn index_chunk(chunk: usize) -> Self {
        Self(format!("navtreeindex{chunk}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the variable the fragment script binds its payload to.
    pub fn binding_name(&self) -> String {
        let last = self.0.rsplit('/').next().unwrap_or(&self.0);
        last.replace('-', "_")
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FragmentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
