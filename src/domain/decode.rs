//! Turn parsed script values into validated navigation structures.
//!
//! Entry shape: `[label, target, children]` where `children` is `null`
//! (leaf), an array of entries, or a fragment id string.

use std::collections::HashMap;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::index::{IndexChunk, NavigationIndex};
use crate::domain::locator::{FragmentId, Locator};
use crate::domain::node::{Children, NavigationNode};
use crate::domain::script::Value;

/// Decode the `NAVTREE` value: an array holding exactly one root entry.
pub fn decode_tree(value: &Value, binding: &str) -> DomainResult<NavigationNode> {
    let entries = value.as_array().ok_or_else(|| {
        DomainError::malformed(binding, format!("expected array, found {}", value.kind()))
    })?;
    match entries {
        [root] => decode_entry(root, &format!("{binding}[0]")),
        _ => Err(DomainError::malformed(
            binding,
            format!("expected exactly one root entry, found {}", entries.len()),
        )),
    }
}

/// Decode a list of entries, e.g. the payload of a fragment script.
pub fn decode_children(value: &Value, at: &str) -> DomainResult<Vec<NavigationNode>> {
    let entries = value.as_array().ok_or_else(|| {
        DomainError::malformed(at, format!("expected array of entries, found {}", value.kind()))
    })?;
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| decode_entry(entry, &format!("{at}[{i}]")))
        .collect()
}

fn decode_entry(value: &Value, at: &str) -> DomainResult<NavigationNode> {
    let fields = value.as_array().ok_or_else(|| {
        DomainError::malformed(at, format!("expected entry array, found {}", value.kind()))
    })?;

    let (label, target, children) = match fields {
        [label, target, children] => (label, target, children),
        [_, _, Value::Array(_), Value::Str(_)] => {
            return Err(DomainError::malformed(
                at,
                "both inline children and a deferred fragment are present",
            ))
        }
        _ => {
            return Err(DomainError::malformed(
                at,
                format!("expected [label, target, children], found {} fields", fields.len()),
            ))
        }
    };

    let label = label
        .as_str()
        .ok_or_else(|| DomainError::malformed(at, format!("label is {}", label.kind())))?;
    if label.trim().is_empty() {
        return Err(DomainError::malformed(at, "label is empty"));
    }

    let target = target
        .as_str()
        .ok_or_else(|| DomainError::malformed(at, format!("target is {}", target.kind())))?;
    let target = Locator::parse(target).map_err(|e| DomainError::malformed(at, e.to_string()))?;

    let children = match children {
        Value::Null => Children::Inline(Vec::new()),
        Value::Array(_) => Children::Inline(decode_children(children, &format!("{at}[2]"))?),
        Value::Str(fragment) => {
            let fragment =
                FragmentId::parse(fragment).map_err(|e| DomainError::malformed(at, e.to_string()))?;
            return NavigationNode::deferred(label, target, fragment);
        }
        other => {
            return Err(DomainError::malformed(
                at,
                format!("children must be null, array or fragment id, found {}", other.kind()),
            ))
        }
    };

    NavigationNode::new(label, target, children)
}

/// Decode `NAVTREEINDEX`: an array of unique locator strings.
pub fn decode_index(value: &Value, binding: &str) -> DomainResult<NavigationIndex> {
    let items = value.as_array().ok_or_else(|| {
        DomainError::malformed(binding, format!("expected array, found {}", value.kind()))
    })?;
    let entries = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let at = format!("{binding}[{i}]");
            let raw = item
                .as_str()
                .ok_or_else(|| DomainError::malformed(&at, format!("entry is {}", item.kind())))?;
            Locator::parse(raw).map_err(|e| DomainError::malformed(&at, e.to_string()))
        })
        .collect::<DomainResult<Vec<_>>>()?;
    NavigationIndex::new(entries)
}

/// Decode a `NAVTREEINDEX<N>` object mapping locators to child-position paths.
pub fn decode_index_chunk(value: &Value, binding: &str) -> DomainResult<IndexChunk> {
    let Value::Object(entries) = value else {
        return Err(DomainError::malformed(
            binding,
            format!("expected object, found {}", value.kind()),
        ));
    };

    let mut paths = HashMap::with_capacity(entries.len());
    for (key, path) in entries {
        let at = format!("{binding}[{key:?}]");
        let steps = path
            .as_array()
            .ok_or_else(|| DomainError::malformed(&at, format!("path is {}", path.kind())))?;
        let steps = steps
            .iter()
            .map(|step| match step {
                Value::Int(n) => usize::try_from(*n)
                    .map_err(|_| DomainError::malformed(&at, format!("negative position {n}"))),
                other => Err(DomainError::malformed(
                    &at,
                    format!("position is {}", other.kind()),
                )),
            })
            .collect::<DomainResult<Vec<_>>>()?;
        paths.insert(key.clone(), steps);
    }
    Ok(IndexChunk::new(paths))
}
