//! A parsed navigation data script.

use tracing::debug;

use crate::domain::decode::{decode_index, decode_tree};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::index::NavigationIndex;
use crate::domain::node::NavigationNode;
use crate::domain::script::{Script, Value};

pub const TREE_BINDING: &str = "NAVTREE";
pub const INDEX_BINDING: &str = "NAVTREEINDEX";
pub const SYNC_ON_BINDING: &str = "SYNCONMSG";
pub const SYNC_OFF_BINDING: &str = "SYNCOFFMSG";

/// Tooltips for the panel synchronisation toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncMessages {
    pub on: String,
    pub off: String,
}

impl Default for SyncMessages {
    fn default() -> Self {
        Self {
            on: "click to disable panel synchronisation".to_string(),
            off: "click to enable panel synchronisation".to_string(),
        }
    }
}

/// Root tree, pagination index and sync messages of one navigation script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTreeDocument {
    pub root: NavigationNode,
    pub index: NavigationIndex,
    pub sync_messages: SyncMessages,
}

impl NavTreeDocument {
    /// Parse and validate a navigation data script.
    ///
    /// `NAVTREE` is required; `NAVTREEINDEX` and the sync messages are optional.
    pub fn parse(source: &str) -> DomainResult<Self> {
        let script = Script::parse(source)?;
        debug!("navigation script has {} bindings", script.bindings().len());

        let root = decode_tree(script.require(TREE_BINDING)?, TREE_BINDING)?;
        let index = match script.get(INDEX_BINDING) {
            Some(value) => decode_index(value, INDEX_BINDING)?,
            None => NavigationIndex::default(),
        };

        let defaults = SyncMessages::default();
        let sync_messages = SyncMessages {
            on: optional_string(&script, SYNC_ON_BINDING)?.unwrap_or(defaults.on),
            off: optional_string(&script, SYNC_OFF_BINDING)?.unwrap_or(defaults.off),
        };

        Ok(Self {
            root,
            index,
            sync_messages,
        })
    }
}

fn optional_string(script: &Script, name: &str) -> DomainResult<Option<String>> {
    match script.get(name) {
        None => Ok(None),
        Some(Value::Str(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DomainError::malformed(
            name,
            format!("expected string, found {}", other.kind()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_script_without_index_when_parsing_then_index_is_empty() {
        let doc = NavTreeDocument::parse(r#"var NAVTREE = [ [ "Root", "index.html", null ] ];"#)
            .unwrap();
        assert!(doc.index.is_empty());
        assert_eq!(doc.sync_messages, SyncMessages::default());
    }

    #[test]
    fn given_script_without_tree_when_parsing_then_fails() {
        let err = NavTreeDocument::parse(r#"var NAVTREEINDEX = [ "a.html" ];"#).unwrap_err();
        assert_eq!(err, DomainError::MissingBinding("NAVTREE".into()));
    }

    #[test]
    fn given_custom_sync_messages_when_parsing_then_uses_them() {
        let doc = NavTreeDocument::parse(
            r#"var NAVTREE = [ [ "Root", "index.html", null ] ];
               var SYNCONMSG = 'on';
               var SYNCOFFMSG = 'off';"#,
        )
        .unwrap();
        assert_eq!(doc.sync_messages.on, "on");
        assert_eq!(doc.sync_messages.off, "off");
    }
}
