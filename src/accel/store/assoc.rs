// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::slice;

use rustc_hash::FxBuildHasher;

use crate::errors::StoreResult;
use crate::load::Loader;
use crate::store::BipartiteStore;
use crate::types::{Entry, Triple};

pub(crate) type AdjacencyMap<K, P> = HashMap<K, Vec<Entry<P>>, FxBuildHasher>;

/// Relation store keyed by arbitrary identifiers on both sides.
///
/// Each side is a hash map from key to its adjacency list.  A key is present
/// in a map only once it has received an entry, and lists are never emptied,
/// so map membership is exactly "has entries".
#[derive(Debug, Clone)]
pub struct AssociativeStore<L, R> {
    forward: AdjacencyMap<L, R>,
    backward: AdjacencyMap<R, L>,
}

impl<L, R> AssociativeStore<L, R>
where
    L: Hash + Eq + Clone,
    R: Hash + Eq + Clone,
{
    /// Load a store from a sequence of triples with the default loader.
    pub fn load<I>(triples: I) -> AssociativeStore<L, R>
    where
        I: IntoIterator<Item = Triple<L, R>>,
    {
        Loader::default().load_associative(triples)
    }
}

impl<L, R> AssociativeStore<L, R>
where
    L: Hash + Eq,
    R: Hash + Eq,
{
    pub(crate) fn from_maps(
        forward: AdjacencyMap<L, R>,
        backward: AdjacencyMap<R, L>,
    ) -> AssociativeStore<L, R> {
        AssociativeStore { forward, backward }
    }

    /// Iterate the left keys with entries, in no particular order.
    pub fn left_keys(&self) -> impl Iterator<Item = &L> + '_ {
        self.forward.keys()
    }

    /// Iterate the right keys with entries, in no particular order.
    pub fn right_keys(&self) -> impl Iterator<Item = &R> + '_ {
        self.backward.keys()
    }

    /// Iterate the entries for a left key; unknown keys have none.
    pub fn right_entries<Q>(&self, left: &Q) -> slice::Iter<'_, Entry<R>>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward
            .get(left)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
    }

    /// Iterate the entries for a right key; unknown keys have none.
    pub fn left_entries<Q>(&self, right: &Q) -> slice::Iter<'_, Entry<L>>
    where
        R: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.backward
            .get(right)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
    }

    pub fn contains_left<Q>(&self, left: &Q) -> bool
    where
        L: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward.contains_key(left)
    }

    pub fn contains_right<Q>(&self, right: &Q) -> bool
    where
        R: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.backward.contains_key(right)
    }

    pub fn num_left_keys(&self) -> usize {
        self.forward.len()
    }

    pub fn num_right_keys(&self) -> usize {
        self.backward.len()
    }

    pub fn num_right_entries<Q>(&self, left: &Q) -> usize
    where
        L: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward.get(left).map(Vec::len).unwrap_or(0)
    }

    pub fn num_left_entries<Q>(&self, right: &Q) -> usize
    where
        R: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.backward.get(right).map(Vec::len).unwrap_or(0)
    }

    /// Total number of entries, computed from the forward view.
    pub fn num_entries(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }
}

impl<L, R> BipartiteStore for AssociativeStore<L, R>
where
    L: Hash + Eq + Clone,
    R: Hash + Eq + Clone,
{
    type Left = L;
    type Right = R;

    fn left_keys(&self) -> impl Iterator<Item = L> + '_ {
        self.forward.keys().cloned()
    }

    fn right_keys(&self) -> impl Iterator<Item = R> + '_ {
        self.backward.keys().cloned()
    }

    fn right_entries(&self, left: &L) -> StoreResult<impl Iterator<Item = &Entry<R>> + '_> {
        Ok(AssociativeStore::right_entries(self, left))
    }

    fn left_entries(&self, right: &R) -> StoreResult<impl Iterator<Item = &Entry<L>> + '_> {
        Ok(AssociativeStore::left_entries(self, right))
    }

    fn contains_left(&self, left: &L) -> bool {
        self.forward.contains_key(left)
    }

    fn contains_right(&self, right: &R) -> bool {
        self.backward.contains_key(right)
    }

    fn num_left_keys(&self) -> usize {
        self.forward.len()
    }

    fn num_right_keys(&self) -> usize {
        self.backward.len()
    }

    fn num_right_entries(&self, left: &L) -> StoreResult<usize> {
        Ok(AssociativeStore::num_right_entries(self, left))
    }

    fn num_left_entries(&self, right: &R) -> StoreResult<usize> {
        Ok(AssociativeStore::num_left_entries(self, right))
    }

    fn num_entries(&self) -> usize {
        AssociativeStore::num_entries(self)
    }
}

#[cfg(test)]
fn features() -> AssociativeStore<u64, String> {
    AssociativeStore::load(vec![
        Triple::new(1, "drama".to_string(), 1.0),
        Triple::new(1, "comedy".to_string(), 0.5),
        Triple::new(2, "drama".to_string(), 1.0),
        Triple::new(3, "horror".to_string(), 2.0),
    ])
}

#[test]
fn test_counts() {
    let fd = features();
    assert_eq!(fd.num_left_keys(), 3);
    assert_eq!(fd.num_right_keys(), 3);
    assert_eq!(fd.num_entries(), 4);
    assert_eq!(fd.num_right_entries(&1), 2);
    assert_eq!(fd.num_left_entries("drama"), 2);
    assert_eq!(fd.num_left_entries("horror"), 1);
}

#[test]
fn test_borrowed_lookup() {
    let fd = features();
    assert!(fd.contains_right("comedy"));
    assert!(!fd.contains_right("western"));
    let items: Vec<_> = fd.left_entries("drama").map(|e| e.key).collect();
    assert_eq!(items, vec![1, 2]);
}

#[test]
fn test_unknown_keys_empty() {
    let fd = features();
    assert!(!fd.contains_left(&42));
    assert_eq!(fd.num_right_entries(&42), 0);
    assert_eq!(fd.right_entries(&42).count(), 0);
    assert_eq!(fd.left_entries("western").count(), 0);
}

#[test]
fn test_trait_matches_inherent() {
    let fd = features();
    let via_trait: Vec<Entry<String>> = BipartiteStore::right_entries(&fd, &1)
        .unwrap()
        .cloned()
        .collect();
    let direct: Vec<Entry<String>> = fd.right_entries(&1).cloned().collect();
    assert_eq!(via_trait, direct);
    assert_eq!(
        BipartiteStore::num_left_entries(&fd, &"drama".to_string()).unwrap(),
        2
    );

    let mut keys: Vec<u64> = BipartiteStore::left_keys(&fd).collect();
    keys.sort();
    assert_eq!(keys, vec![1, 2, 3]);
}
