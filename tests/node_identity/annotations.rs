//! Full-text match annotations riding on handles

use crate::common::{first, play_store};
use arbordb::{MatchAnnotation, NodeSet, TermOffset};

#[test]
fn matches_accumulate_in_insertion_order() {
    let (store, doc) = play_store();
    let mut line = first(&store, doc, "LINE");
    let id = line.identifier();

    line.add_match(MatchAnnotation::with_offsets(
        "who",
        id,
        vec![TermOffset::new(0, 5)],
        1.0,
    ));
    line.add_matches(&[
        MatchAnnotation::new("there", id),
        MatchAnnotation::new("who", id),
    ]);

    let terms: Vec<_> = line.matches().iter().map(|m| m.term()).collect();
    assert_eq!(terms, vec!["who", "there", "who"]);
    assert_eq!(line.matches_summary(), format!("{}: who there who ", id));
    assert_eq!(line.matches()[0].offsets(), &[TermOffset::new(0, 5)]);
}

#[test]
fn copies_share_annotations_without_aliasing_lists() {
    let (store, doc) = play_store();
    let mut original = first(&store, doc, "SPEAKER");
    original.add_match(MatchAnnotation::new("bernardo", original.identifier()));

    let mut copy = original.clone();
    copy.add_match(MatchAnnotation::new("extra", original.identifier()));

    assert_eq!(original.matches().len(), 1);
    assert_eq!(copy.matches().len(), 2);
    assert!(copy.matches()[0].ptr_eq(&original.matches()[0]));
}

#[test]
fn node_set_union_keeps_matches_of_both_steps() {
    let (store, doc) = play_store();
    let lines = store.find_elements(doc, "LINE").unwrap();

    let mut hits_a = lines[0].clone();
    hits_a.add_match(MatchAnnotation::new("who", hits_a.identifier()));
    let mut hits_b = lines[0].clone();
    hits_b.add_match(MatchAnnotation::new("there", hits_b.identifier()));
    let mut other = lines[1].clone();
    other.add_match(MatchAnnotation::new("stand", other.identifier()));

    let left = NodeSet::from_handles(vec![hits_a]).unwrap();
    let right = NodeSet::from_handles(vec![other, hits_b]).unwrap();
    let union = left.union(&right).unwrap();

    assert_eq!(union.len(), 2);
    assert_eq!(
        union.as_slice()[0].matches_summary(),
        format!("{}: who there ", lines[0].identifier())
    );
    assert_eq!(union.as_slice()[1].matches().len(), 1);
}

#[test]
fn reset_clears_matches_and_identity() {
    let (store, doc) = play_store();
    let mut title = first(&store, doc, "TITLE");
    title.add_match(MatchAnnotation::new("hamlet", title.identifier()));
    title.reset();
    assert!(!title.is_defined());
    assert!(!title.has_matches());
    assert_eq!(title.document(), None);
}
