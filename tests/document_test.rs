//! Integration tests for parsing the built-in navigation data.

use std::sync::Arc;

use rstest::rstest;

use navtree::application::services::NavigationTreeStore;
use navtree::domain::builtin::BUILTIN_NAVTREE;
use navtree::domain::{Children, DepthFirst, DomainError, NavTreeDocument, SyncMessages};
use navtree::infrastructure::traits::OfflineSource;

fn builtin_store() -> NavigationTreeStore {
    NavigationTreeStore::load(BUILTIN_NAVTREE, Arc::new(OfflineSource)).unwrap()
}

// ============================================================
// Root and top level
// ============================================================

#[test]
fn given_builtin_data_when_loading_then_root_is_library_index() {
    let store = builtin_store();

    let root = store.root();
    assert_eq!(root.label(), "CAEN FE Library");
    assert_eq!(root.target().as_str(), "index.html");

    let labels: Vec<_> = root
        .materialized_children()
        .unwrap()
        .iter()
        .map(|n| n.label())
        .collect();
    assert_eq!(
        labels,
        [
            "Introduction",
            "Changelog",
            "Software development",
            "Installation",
            "LabVIEW",
            "Python",
            "Modules",
            "Namespaces",
            "Data Structures",
            "Files"
        ]
    );
}

#[test]
fn given_builtin_data_when_loading_then_generated_sections_are_deferred() {
    let store = builtin_store();

    let modules = store.find_by_target("modules.html").next().unwrap();
    assert!(modules.is_deferred());
    assert_eq!(modules.fragment().unwrap().as_str(), "modules");

    let fragments: Vec<_> = store
        .find_by_page("files.html")
        .filter_map(|n| n.fragment())
        .map(|f| f.as_str())
        .collect();
    assert_eq!(fragments, ["files_dup"]);
}

#[test]
fn given_builtin_data_when_walking_every_node_then_labels_and_targets_are_set() {
    let store = builtin_store();

    for node in DepthFirst::new(store.root()) {
        assert!(!node.label().trim().is_empty());
        assert!(!node.target().as_str().is_empty());
        match node.children() {
            Children::Inline(_) => assert!(node.fragment().is_none()),
            Children::Deferred(slot) => {
                assert!(!slot.is_loaded());
                assert_eq!(node.fragment(), Some(slot.fragment()));
            }
        }
    }
}

#[test]
fn given_builtin_data_when_counting_then_only_inline_nodes_are_materialized() {
    assert_eq!(builtin_store().node_count(), 74);
}

// ============================================================
// Target lookup
// ============================================================

#[rstest]
#[case("a00271.html", &["Changelog"])]
#[case("a00272.html#connect", &["Connect to device"])]
#[case("index.html", &["CAEN FE Library", "Introduction"])]
#[case("globals.html", &["Globals", "All"])]
#[case("nonexistent.html", &[])]
fn given_locator_when_finding_by_target_then_yields_matches_depth_first(
    #[case] locator: &str,
    #[case] expected: &[&str],
) {
    let store = builtin_store();

    let labels: Vec<_> = store.find_by_target(locator).map(|n| n.label()).collect();

    assert_eq!(labels, expected);
}

#[test]
fn given_find_iterator_when_taking_one_then_later_matches_are_still_available() {
    let store = builtin_store();
    let mut found = store.find_by_target("index.html");

    let first = found.next().unwrap();
    let rest = found.clone().count();

    assert_eq!(first.label(), "CAEN FE Library");
    assert_eq!(rest, 1);
    assert_eq!(found.next().unwrap().label(), "Introduction");
    assert!(found.next().is_none());
}

#[test]
fn given_anchor_locator_when_finding_by_page_then_matches_whole_page() {
    let store = builtin_store();

    let count = store.find_by_page("a00273.html").count();

    assert_eq!(count, 3);
}

// ============================================================
// Index and sync messages
// ============================================================

#[test]
fn given_builtin_index_when_reading_positions_then_returns_chunk_starts() {
    let store = builtin_store();
    let index = store.index();

    assert_eq!(index.len(), 2);
    assert_eq!(index.at(0).unwrap().as_str(), "a00041.html");
    assert_eq!(
        index.at(1).unwrap().as_str(),
        "a00130.html#ad2fb6353a9e8c8705649b1aa70182641"
    );
    assert!(index.is_sorted());
}

#[rstest]
#[case(2)]
#[case(usize::MAX)]
fn given_position_past_end_when_reading_index_then_out_of_range(#[case] position: usize) {
    let store = builtin_store();

    let err = store.index().at(position).unwrap_err();

    assert_eq!(err, DomainError::IndexOutOfRange { position, length: 2 });
}

#[test]
fn given_builtin_data_when_loading_then_sync_messages_are_read() {
    let store = builtin_store();
    assert_eq!(store.sync_messages(), &SyncMessages::default());
    assert_eq!(
        store.sync_messages().on,
        "click to disable panel synchronisation"
    );
}

// ============================================================
// Whole-document behaviour
// ============================================================

#[test]
fn given_same_source_when_parsing_twice_then_documents_are_equal() {
    let first = NavTreeDocument::parse(BUILTIN_NAVTREE).unwrap();
    let second = NavTreeDocument::parse(BUILTIN_NAVTREE).unwrap();
    assert_eq!(first, second);
}

#[test]
fn given_tree_without_index_when_parsing_then_index_is_empty() {
    let doc = NavTreeDocument::parse(r#"var NAVTREE = [ [ "Docs", "index.html", null ] ];"#).unwrap();

    assert!(doc.index.is_empty());
    assert!(doc.root.is_leaf());
    assert_eq!(doc.sync_messages, SyncMessages::default());
}

#[rstest]
#[case::no_tree("var NAVTREEINDEX = [];")]
#[case::two_roots(r#"var NAVTREE = [ [ "A", "a.html", null ], [ "B", "b.html", null ] ];"#)]
#[case::empty_label(r#"var NAVTREE = [ [ " ", "a.html", null ] ];"#)]
#[case::numeric_children(r#"var NAVTREE = [ [ "A", "a.html", 3 ] ];"#)]
#[case::absolute_target(r#"var NAVTREE = [ [ "A", "/a.html", null ] ];"#)]
#[case::inline_and_fragment(r#"var NAVTREE = [ [ "A", "a.html", [], "frag" ] ];"#)]
#[case::duplicate_index(r#"var NAVTREE = [ [ "A", "a.html", null ] ]; var NAVTREEINDEX = [ "a.html", "a.html" ];"#)]
fn given_malformed_data_when_parsing_then_rejects_whole_document(#[case] source: &str) {
    let result = NavTreeDocument::parse(source);
    assert!(result.is_err(), "accepted: {source}");
}

#[test]
fn given_malformed_nested_entry_when_parsing_then_error_names_its_position() {
    let source = r#"var NAVTREE = [ [ "Docs", "index.html", [
        [ "Guide", "guide.html", null ],
        [ "Broken", 42, null ]
    ] ] ];"#;

    let err = NavTreeDocument::parse(source).unwrap_err();

    match err {
        DomainError::MalformedTree { at, reason } => {
            assert_eq!(at, "NAVTREE[0][2][1]");
            assert!(reason.contains("target"), "reason: {reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
