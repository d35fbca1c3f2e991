//! Pooled handles through a full evaluation cycle

use crate::common::play_store;
use arbordb::{EngineConfig, EvalContext, NodeSet, Subject};

#[test]
fn pooled_handles_are_reused_across_queries() {
    let (store, doc) = play_store();
    let config = EngineConfig {
        pool_capacity: 32,
        pool_warmup: 32,
        ..EngineConfig::default()
    };
    let ctx = EvalContext::new(Subject::new("reader"), store.clone(), config);
    let ids = store.node_ids(doc).unwrap();

    for _ in 0..10 {
        let handles = ids
            .iter()
            .rev()
            .map(|id| ctx.handle(doc, *id))
            .collect::<arbordb::Result<Vec<_>>>()
            .unwrap();
        let set = ctx.node_set(handles).unwrap();
        assert_eq!(set.len(), ids.len());
        assert_eq!(set.as_slice()[0].identifier(), ids[0]);
        set.recycle(ctx.pool());
    }

    let stats = ctx.pool().stats();
    assert_eq!(stats.acquired, 10 * ids.len() as u64);
    assert_eq!(stats.reused, stats.acquired);
    assert_eq!(ctx.pool().len(), 32);
}

#[test]
fn recycled_handle_does_not_leak_previous_node() {
    let (store, doc) = play_store();
    let ctx = EvalContext::new(Subject::new("reader"), store, EngineConfig::default());

    let title = ctx.handle(doc, arbordb::NodeId::new(3)).unwrap();
    assert!(title.storage_address().is_some());
    NodeSet::from_handles(vec![title]).unwrap().recycle(ctx.pool());

    let fresh = ctx.pool().acquire();
    assert!(!fresh.is_defined());
    assert_eq!(fresh.storage_address(), None);
    assert_eq!(fresh.node_type(), None);
}
