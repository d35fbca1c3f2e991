//! Document order across handles built in different ways

use crate::common::{first, play_store};
use arbordb::{
    compare, sort_document_order, DocumentHandle, DocumentId, DocumentOrder, Error, NodeHandle,
    NodeId, NodeSet, StoreKind, TotalOrder,
};
use std::cmp::Ordering;

#[test]
fn handles_sort_into_pre_order() {
    let (store, doc) = play_store();
    let n1 = first(&store, doc, "TITLE");
    let n2 = first(&store, doc, "ACT");
    let n3 = first(&store, doc, "LINE");

    let mut handles = vec![n3.clone(), n1.clone(), n2.clone()];
    sort_document_order(&mut handles).unwrap();
    assert_eq!(handles, vec![n1.clone(), n2.clone(), n3.clone()]);

    assert_eq!(compare(&n1, &n2).unwrap(), Ordering::Less);
    assert_eq!(compare(&n3, &n2).unwrap(), Ordering::Greater);
    assert_eq!(DocumentOrder.compare(&n2, &n2.clone()).unwrap(), Ordering::Equal);
}

#[test]
fn unresolved_and_resolved_handles_agree() {
    let (store, doc) = play_store();
    let resolved = first(&store, doc, "SCENE");
    let bare = NodeHandle::new(doc, resolved.identifier());

    assert_eq!(bare.storage_address(), None);
    assert_eq!(bare, resolved);
    assert_eq!(compare(&bare, &resolved).unwrap(), Ordering::Equal);
}

#[test]
fn ancestors_precede_descendants() {
    let (store, doc) = play_store();
    for id in store.node_ids(doc).unwrap() {
        let mut cursor = store.parent(doc, id).unwrap();
        while let Some(ancestor) = cursor {
            let a = NodeHandle::new(doc, ancestor);
            let d = NodeHandle::new(doc, id);
            assert!(a < d, "{} should precede {}", ancestor, id);
            cursor = store.parent(doc, ancestor).unwrap();
        }
    }
}

#[test]
fn documents_order_by_id() {
    let (store, first_doc) = play_store();
    let second_doc = store.store_document("macbeth.xml", crate::common::play()).unwrap();

    // Deep node of the first document still precedes the root of the second
    let deep = first(&store, first_doc, "LINE");
    let root = NodeHandle::new(second_doc, NodeId::FIRST);
    assert!(deep < root);

    let set = NodeSet::from_handles(vec![root.clone(), deep.clone()]).unwrap();
    assert_eq!(set.documents(), vec![first_doc, second_doc]);
}

#[test]
fn foreign_and_unresolved_operands_are_rejected() {
    let (store, doc) = play_store();
    let title = first(&store, doc, "TITLE");
    let foreign = NodeHandle::new(
        DocumentHandle::new(DocumentId::new(99), StoreKind::Native),
        NodeId::new(2),
    );

    let err = compare(&title, &foreign).unwrap_err();
    assert!(matches!(err, Error::InvalidComparison(_)));
    assert!(title.try_eq(&foreign).is_err());
    assert!(compare(&title, &NodeHandle::default()).is_err());
    assert!(NodeHandle::default().try_eq(&title).is_err());

    let mut mixed = vec![title, foreign];
    assert!(sort_document_order(&mut mixed).is_err());
}
