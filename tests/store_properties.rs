//! Property tests for the adjacency invariants of both store flavors.

use std::sync::Arc;

use proptest::prelude::*;

use relstore::{
    AssociativeStore, BipartiteStore, DenseStore, Entry, LoadConfig, Loader, RangeIndex, Triple,
};

const N_LEFT: u32 = 12;
const N_RIGHT: u32 = 9;

fn triples() -> impl Strategy<Value = Vec<Triple<u32, u32>>> {
    prop::collection::vec(
        (0..N_LEFT, 0..N_RIGHT, -5.0f64..5.0).prop_map(|(l, r, v)| Triple::new(l, r, v)),
        0..200,
    )
}

fn dense(ts: Vec<Triple<u32, u32>>) -> DenseStore<RangeIndex, RangeIndex> {
    DenseStore::load(
        ts,
        Arc::new(RangeIndex::new(N_LEFT as usize)),
        Arc::new(RangeIndex::new(N_RIGHT as usize)),
    )
    .unwrap()
}

/// Check that every triple appears on both sides and the counts add up.
fn check_invariants<S>(store: &S, ts: &[Triple<u32, u32>]) -> Result<(), TestCaseError>
where
    S: BipartiteStore<Left = u32, Right = u32>,
{
    prop_assert_eq!(store.num_entries(), ts.len());

    for t in ts {
        let fwd: Vec<_> = store.right_entries(&t.left).unwrap().copied().collect();
        prop_assert!(fwd.contains(&Entry::new(t.right, t.value)));
        let bwd: Vec<_> = store.left_entries(&t.right).unwrap().copied().collect();
        prop_assert!(bwd.contains(&Entry::new(t.left, t.value)));
    }

    let by_left: usize = store
        .left_keys()
        .map(|l| store.num_right_entries(&l).unwrap())
        .sum();
    let by_right: usize = store
        .right_keys()
        .map(|r| store.num_left_entries(&r).unwrap())
        .sum();
    prop_assert_eq!(by_left, ts.len());
    prop_assert_eq!(by_right, ts.len());
    Ok(())
}

proptest! {
    #[test]
    fn dense_invariants(ts in triples()) {
        let store = dense(ts.clone());
        check_invariants(&store, &ts)?;
    }

    #[test]
    fn associative_invariants(ts in triples()) {
        let store = AssociativeStore::load(ts.clone());
        check_invariants(&store, &ts)?;
    }

    #[test]
    fn entries_keep_input_order(ts in triples()) {
        let store = dense(ts.clone());
        for l in 0..N_LEFT {
            let expected: Vec<_> = ts
                .iter()
                .filter(|t| t.left == l)
                .map(|t| Entry::new(t.right, t.value))
                .collect();
            let actual: Vec<_> = store.right_entries(l).unwrap().copied().collect();
            prop_assert_eq!(actual, expected);
        }
        for r in 0..N_RIGHT {
            let expected: Vec<_> = ts
                .iter()
                .filter(|t| t.right == r)
                .map(|t| Entry::new(t.left, t.value))
                .collect();
            let actual: Vec<_> = store.left_entries(r).unwrap().copied().collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn absent_keys_are_empty(ts in triples()) {
        let store = dense(ts.clone());
        for l in 0..N_LEFT {
            let seen = ts.iter().any(|t| t.left == l);
            prop_assert_eq!(store.contains_left(l), seen);
            if !seen {
                prop_assert_eq!(store.num_right_entries(l).unwrap(), 0);
                prop_assert_eq!(store.right_entries(l).unwrap().count(), 0);
            }
        }
        prop_assert!(store.right_entries(N_LEFT).is_err());
    }

    #[test]
    fn parallel_build_identical(ts in triples()) {
        let seq = dense(ts.clone());
        let par = Loader::new(LoadConfig::parallel(None))
            .load_dense_parallel(
                &ts,
                Arc::new(RangeIndex::new(N_LEFT as usize)),
                Arc::new(RangeIndex::new(N_RIGHT as usize)),
            )
            .unwrap();
        prop_assert_eq!(seq.num_entries(), par.num_entries());
        for l in 0..N_LEFT {
            let s: Vec<_> = seq.right_entries(l).unwrap().copied().collect();
            let p: Vec<_> = par.right_entries(l).unwrap().copied().collect();
            prop_assert_eq!(s, p);
        }
    }
}
