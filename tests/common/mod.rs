//! Shared fixtures for the root integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use arbordb::{DocumentBuilder, DocumentHandle, MemoryStore, NodeHandle};
use std::sync::{Arc, Once};

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output to the test harness (shown only on failure).
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// A short play: PLAY > (TITLE, ACT > SCENE > (SPEECH > SPEAKER, LINE)+)
pub fn play() -> DocumentBuilder {
    let mut b = DocumentBuilder::new();
    b.start_element("PLAY")
        .start_element("TITLE")
        .text("The Tragedy of Hamlet")
        .end_element()
        .start_element("ACT")
        .attribute("n", "1")
        .start_element("SCENE")
        .start_element("SPEECH")
        .start_element("SPEAKER")
        .text("BERNARDO")
        .end_element()
        .start_element("LINE")
        .text("Who's there?")
        .end_element()
        .end_element()
        .start_element("SPEECH")
        .start_element("SPEAKER")
        .text("FRANCISCO")
        .end_element()
        .start_element("LINE")
        .text("Nay, answer me: stand, and unfold yourself.")
        .end_element()
        .end_element()
        .end_element()
        .end_element()
        .end_element();
    b
}

/// Store holding `hamlet.xml`
pub fn play_store() -> (Arc<MemoryStore>, DocumentHandle) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let doc = store.store_document("hamlet.xml", play()).unwrap();
    (store, doc)
}

/// First element named `name`
pub fn first(store: &MemoryStore, doc: DocumentHandle, name: &str) -> NodeHandle {
    store.find_elements(doc, name).unwrap().remove(0)
}
