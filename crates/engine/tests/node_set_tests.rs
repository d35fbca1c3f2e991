//! Node set behavior over a real store
//!
//! Handles are collected the way a path step would produce them: in
//! arbitrary order, with repeats, some carrying full-text matches.

use arbor_core::{DocumentHandle, DocumentId, MatchAnnotation, NodeHandle, NodeId, StoreKind};
use arbor_engine::{EngineConfig, NodeSet};
use arbor_storage::{DocumentBuilder, MemoryStore};
use proptest::prelude::*;

fn catalog(titles: &[&str]) -> DocumentBuilder {
    let mut b = DocumentBuilder::new();
    b.start_element("catalog");
    for title in titles {
        b.start_element("book")
            .attribute("lang", "en")
            .start_element("title")
            .text(*title)
            .end_element()
            .end_element();
    }
    b.end_element();
    b
}

fn key(h: &NodeHandle) -> (u64, u64) {
    (h.document_id().unwrap().as_u64(), h.identifier().as_u64())
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_handles_from_two_documents_sort_by_document_then_node() {
    let store = MemoryStore::new();
    let first = store.store_document("a.xml", catalog(&["Ada", "Basil"])).unwrap();
    let second = store.store_document("b.xml", catalog(&["Cyril"])).unwrap();

    let mut handles = store.find_elements(second, "title").unwrap();
    handles.extend(store.find_elements(first, "book").unwrap());
    handles.extend(store.find_elements(first, "title").unwrap());
    handles.reverse();

    let set = NodeSet::from_handles(handles).unwrap();
    let keys: Vec<_> = set.iter().map(key).collect();
    let mut expected = keys.clone();
    expected.sort();
    assert_eq!(keys, expected);
    assert_eq!(set.documents(), vec![first, second]);
    assert_eq!(set.len(), 5);
}

#[test]
fn test_repeated_hits_collapse_into_one_node() {
    let store = MemoryStore::new();
    let doc = store.store_document("a.xml", catalog(&["Love and Death"])).unwrap();
    let title = store.find_elements(doc, "title").unwrap().remove(0);

    let mut love = title.clone();
    love.add_match(MatchAnnotation::new("love", title.identifier()));
    let mut death = title.clone();
    death.add_match(MatchAnnotation::new("death", title.identifier()));

    let set = NodeSet::from_handles(vec![love, death]).unwrap();
    assert_eq!(set.len(), 1);
    let merged = &set.as_slice()[0];
    assert_eq!(merged.matches_summary(), format!("{}: love death ", title.identifier()));
    // Resolution is carried over from the retained handle
    assert_eq!(merged.storage_address(), title.storage_address());
}

#[test]
fn test_union_and_intersection_of_steps() {
    let store = MemoryStore::new();
    let doc = store.store_document("a.xml", catalog(&["Ada", "Basil", "Cyril"])).unwrap();
    let books = NodeSet::from_handles(store.find_elements(doc, "book").unwrap()).unwrap();
    let titles = NodeSet::from_handles(store.find_elements(doc, "title").unwrap()).unwrap();

    let both = books.union(&titles).unwrap();
    assert_eq!(both.len(), 6);
    // Each book directly precedes its title
    for pair in both.as_slice().chunks(2) {
        assert!(pair[0] < pair[1]);
        assert_eq!(
            store.parent(doc, pair[1].identifier()).unwrap(),
            Some(pair[0].identifier())
        );
    }

    assert!(books.intersection(&titles).unwrap().is_empty());
    assert_eq!(both.intersection(&titles).unwrap(), titles);
    assert_eq!(both.difference(&titles).unwrap(), books);
}

#[test]
fn test_mixed_store_kinds_are_rejected() {
    let store = MemoryStore::new();
    let doc = store.store_document("a.xml", catalog(&["Ada"])).unwrap();
    let mut handles = store.find_elements(doc, "book").unwrap();
    handles.push(NodeHandle::new(
        DocumentHandle::new(DocumentId::new(1), StoreKind::Native),
        NodeId::new(2),
    ));
    let err = NodeSet::from_handles(handles).unwrap_err();
    assert!(err.is_contract_violation());
}

// ============================================================================
// Properties
// ============================================================================

fn arb_handle() -> impl Strategy<Value = NodeHandle> {
    (1u64..4, 1u64..40).prop_map(|(d, n)| {
        NodeHandle::new(
            DocumentHandle::new(DocumentId::new(d), StoreKind::Memory),
            NodeId::new(n),
        )
    })
}

proptest! {
    #[test]
    fn prop_from_handles_is_strictly_increasing(handles in prop::collection::vec(arb_handle(), 0..200)) {
        let set = NodeSet::from_handles(handles.clone()).unwrap();
        for w in set.as_slice().windows(2) {
            prop_assert!(w[0] < w[1]);
        }
        for h in &handles {
            prop_assert!(set.contains(h).unwrap());
        }
    }

    #[test]
    fn prop_parallel_and_sequential_agree(handles in prop::collection::vec(arb_handle(), 0..200)) {
        let config = EngineConfig { parallel_sort_threshold: 1, ..EngineConfig::default() };
        let parallel = NodeSet::from_handles_with(handles.clone(), &config).unwrap();
        let sequential = NodeSet::from_handles(handles).unwrap();
        prop_assert_eq!(parallel, sequential);
    }

    #[test]
    fn prop_union_matches_normalized_concatenation(
        a in prop::collection::vec(arb_handle(), 0..60),
        b in prop::collection::vec(arb_handle(), 0..60),
    ) {
        let left = NodeSet::from_handles(a.clone()).unwrap();
        let right = NodeSet::from_handles(b.clone()).unwrap();
        let mut all = a;
        all.extend(b);
        prop_assert_eq!(left.union(&right).unwrap(), NodeSet::from_handles(all).unwrap());
    }

    #[test]
    fn prop_intersection_is_common_members(
        a in prop::collection::vec(arb_handle(), 0..60),
        b in prop::collection::vec(arb_handle(), 0..60),
    ) {
        let left = NodeSet::from_handles(a).unwrap();
        let right = NodeSet::from_handles(b).unwrap();
        let common = left.intersection(&right).unwrap();
        for h in &common {
            prop_assert!(left.contains(h).unwrap() && right.contains(h).unwrap());
        }
        let missing = left.iter().filter(|h| right.contains(h).unwrap()).count();
        prop_assert_eq!(common.len(), missing);
    }
}
