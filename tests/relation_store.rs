//! End-to-end tests of loading and querying relation stores.

use std::sync::Arc;
use std::thread;

use relstore::{
    AssociativeStore, BipartiteStore, DenseStore, Entry, IdList, LoadConfig, Loader, RangeIndex,
    StoreError, Triple,
};

fn index(ids: &[&'static str]) -> Arc<IdList<&'static str>> {
    Arc::new(IdList::from_unique(ids.to_vec()).unwrap())
}

fn scenario() -> Vec<Triple<&'static str, &'static str>> {
    vec![
        Triple::new("u1", "i1", 1.0),
        Triple::new("u1", "i2", 2.0),
        Triple::new("u2", "i1", 3.0),
    ]
}

#[test]
fn dense_scenario() {
    let store = DenseStore::load(scenario(), index(&["u1", "u2"]), index(&["i1", "i2"])).unwrap();

    assert_eq!(store.num_left_keys(), 2);
    assert_eq!(store.num_right_keys(), 2);
    assert_eq!(store.num_entries(), 3);
    assert_eq!(
        store.right_entries(0).unwrap().copied().collect::<Vec<_>>(),
        vec![Entry::new(0, 1.0), Entry::new(1, 2.0)]
    );
    assert_eq!(
        store.left_entries(0).unwrap().copied().collect::<Vec<_>>(),
        vec![Entry::new(0, 1.0), Entry::new(1, 3.0)]
    );
}

#[test]
fn associative_scenario() {
    let store = AssociativeStore::load(scenario());

    assert_eq!(store.num_left_keys(), 2);
    assert_eq!(store.num_right_keys(), 2);
    assert_eq!(store.num_entries(), 3);
    assert_eq!(
        store.right_entries("u1").copied().collect::<Vec<_>>(),
        vec![Entry::new("i1", 1.0), Entry::new("i2", 2.0)]
    );
    assert_eq!(
        store.left_entries("i1").copied().collect::<Vec<_>>(),
        vec![Entry::new("u1", 1.0), Entry::new("u2", 3.0)]
    );
}

#[test]
fn empty_input() {
    let store = DenseStore::load(Vec::new(), index(&["u1"]), index(&["i1", "i2"])).unwrap();
    assert_eq!(store.num_entries(), 0);
    assert_eq!(store.num_left_keys(), 0);
    assert_eq!(store.num_right_keys(), 0);
    assert_eq!(store.left_keys().count(), 0);
    assert_eq!(store.num_right_entries(0).unwrap(), 0);
    assert_eq!(store.left_entries(1).unwrap().count(), 0);

    let assoc: AssociativeStore<String, String> = AssociativeStore::load(Vec::new());
    assert_eq!(assoc.num_entries(), 0);
    assert_eq!(assoc.num_left_keys(), 0);
    assert_eq!(assoc.right_entries("x").count(), 0);
    assert!(!assoc.contains_left("x"));
}

#[test]
fn dense_one_past_end() {
    let store = DenseStore::load(scenario(), index(&["u1", "u2"]), index(&["i1", "i2"])).unwrap();
    match store.right_entries(2) {
        Err(StoreError::IndexOutOfRange { index, size }) => {
            assert_eq!(index, 2);
            assert_eq!(size, 2);
        }
        _ => panic!("expected out-of-range error"),
    }
    assert!(matches!(
        store.num_left_entries(2),
        Err(StoreError::IndexOutOfRange { .. })
    ));
}

#[test]
fn unknown_identifier_aborts_load() {
    let res = DenseStore::load(scenario(), index(&["u1", "u2"]), index(&["i1"]));
    assert!(matches!(res, Err(StoreError::UnknownIdentifier(_))));
}

#[test]
fn duplicates_are_kept() {
    let triples = vec![
        Triple::new(0u32, 1u32, 1.0),
        Triple::new(0, 1, 1.0),
        Triple::new(0, 1, 4.0),
    ];
    let store = DenseStore::load(
        triples.clone(),
        Arc::new(RangeIndex::new(1)),
        Arc::new(RangeIndex::new(2)),
    )
    .unwrap();
    assert_eq!(store.num_entries(), 3);
    assert_eq!(
        store.right_values(0).unwrap().collect::<Vec<_>>(),
        vec![1.0, 1.0, 4.0]
    );
    assert_eq!(store.num_left_entries(1).unwrap(), 3);

    let assoc = AssociativeStore::load(triples);
    assert_eq!(assoc.num_entries(), 3);
    assert_eq!(assoc.num_left_entries(&1), 3);
}

#[test]
fn repeated_queries_agree() {
    let store = AssociativeStore::load(scenario());
    let a: Vec<_> = store.right_entries("u1").collect();
    let b: Vec<_> = store.right_entries("u1").collect();
    assert_eq!(a, b);

    let dense = DenseStore::load(scenario(), index(&["u1", "u2"]), index(&["i1", "i2"])).unwrap();
    let a: Vec<_> = dense.left_entries(0).unwrap().collect();
    let b: Vec<_> = dense.left_entries(0).unwrap().collect();
    assert_eq!(a, b);
}

#[test]
fn parallel_matches_sequential() {
    let n_users = 50u32;
    let n_items = 80u32;
    let triples: Vec<_> = (0..5000u32)
        .map(|k| Triple::new((k * 7) % n_users, (k * 13) % n_items, k as f64))
        .collect();
    let users = Arc::new(RangeIndex::new(n_users as usize));
    let items = Arc::new(RangeIndex::new(n_items as usize));

    let seq = Loader::default()
        .load_dense(triples.clone(), users.clone(), items.clone())
        .unwrap();
    let par = Loader::new(LoadConfig::parallel(Some(4)))
        .load_dense(triples, users, items)
        .unwrap();

    assert_eq!(seq.num_entries(), par.num_entries());
    assert_eq!(
        seq.left_keys().collect::<Vec<_>>(),
        par.left_keys().collect::<Vec<_>>()
    );
    for u in 0..n_users {
        let s: Vec<_> = seq.right_entries(u).unwrap().collect();
        let p: Vec<_> = par.right_entries(u).unwrap().collect();
        assert_eq!(s, p);
    }
    for i in 0..n_items {
        let s: Vec<_> = seq.left_entries(i).unwrap().collect();
        let p: Vec<_> = par.left_entries(i).unwrap().collect();
        assert_eq!(s, p);
    }
}

#[test]
fn parallel_propagates_resolution_failure() {
    let loader = Loader::new(LoadConfig::parallel(None));
    let res = loader.load_dense(scenario(), index(&["u1"]), index(&["i1", "i2"]));
    assert!(matches!(res, Err(StoreError::UnknownIdentifier(_))));
}

#[test]
fn loader_from_json_config() {
    let config = LoadConfig::from_json(r#"{"parallel": true, "progress": true}"#).unwrap();
    let store = Loader::new(config)
        .load_dense(scenario(), index(&["u1", "u2"]), index(&["i1", "i2"]))
        .unwrap();
    assert_eq!(store.num_entries(), 3);
}

#[test]
fn shared_across_threads() {
    let store = Arc::new(
        DenseStore::load(scenario(), index(&["u1", "u2"]), index(&["i1", "i2"])).unwrap(),
    );
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                store
                    .left_keys()
                    .map(|u| store.num_right_entries(u).unwrap())
                    .sum::<usize>()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 3);
    }
}

/// Consumers see both flavors through the same contract.
fn total_via_left<S: BipartiteStore>(store: &S) -> usize {
    store
        .left_keys()
        .map(|k| store.num_right_entries(&k).unwrap())
        .sum()
}

#[test]
fn generic_consumer() {
    let assoc = AssociativeStore::load(scenario());
    let dense = DenseStore::load(scenario(), index(&["u1", "u2"]), index(&["i1", "i2"])).unwrap();
    assert_eq!(total_via_left(&assoc), 3);
    assert_eq!(total_via_left(&dense), 3);
}
