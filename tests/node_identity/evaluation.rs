//! Store access through handles and the evaluation context

use crate::common::{first, play_store};
use arbordb::{read_binary, EngineConfig, Error, EvalContext, NodeType, Subject};
use tempfile::TempDir;

#[test]
fn node_values_and_display() {
    let (store, doc) = play_store();
    let speech = first(&store, doc, "SPEECH");
    assert_eq!(
        speech.node_value(store.as_ref()).unwrap(),
        "BERNARDOWho's there?"
    );
    assert_eq!(speech.node_type(), Some(NodeType::Element));
    assert!(!speech.display(store.as_ref()).to_string().is_empty());
}

#[test]
fn stale_address_until_refresh() {
    let (store, doc) = play_store();
    let mut line = first(&store, doc, "LINE");
    let before = line.storage_address().unwrap();

    store.compact_document(doc.id()).unwrap();
    assert_eq!(line.storage_address(), Some(before));
    // Cached resolution is reused as-is
    assert_eq!(line.resolve(store.as_ref()).unwrap().0, before);

    let (after, _) = line.refresh(store.as_ref()).unwrap();
    assert_ne!(after, before);
    assert_eq!(line.storage_address(), Some(after));
    assert_eq!(line.node_value(store.as_ref()).unwrap(), "Who's there?");
}

#[test]
fn replaced_document_retires_old_handles() {
    let (store, doc) = play_store();
    let title = first(&store, doc, "TITLE");
    let replacement = store
        .store_document("hamlet.xml", crate::common::play())
        .unwrap();

    assert_ne!(replacement.id(), doc.id());
    let err = title.node_value(store.as_ref()).unwrap_err();
    assert!(matches!(err, Error::DocumentNotFound(_)));
    assert_eq!(store.document_by_name("hamlet.xml"), Some(replacement));
}

#[test]
fn read_binary_needs_dba() {
    let (store, _) = play_store();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cover.bin");
    std::fs::write(&path, b"\x00\x01\x02").unwrap();
    let path = path.to_str().unwrap();

    let guest = EvalContext::new(Subject::new("guest"), store, EngineConfig::default());
    let err = read_binary(&guest, path).unwrap_err();
    assert!(err.to_string().contains("calling user 'guest' must be a DBA"));

    let admin = guest.as_subject(Subject::dba("admin"));
    assert_eq!(read_binary(&admin, path).unwrap().to_base64(), "AAEC");
}
