// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use std::convert::Infallible;
use std::hash::Hash;

use log::*;

use crate::load::RelationSink;
use crate::store::assoc::AdjacencyMap;
use crate::store::AssociativeStore;
use crate::types::{Entry, Triple};

/// Accumulate triples into two hash maps of adjacency lists.
pub(crate) struct MapSink<L, R> {
    forward: AdjacencyMap<L, R>,
    backward: AdjacencyMap<R, L>,
}

impl<L, R> MapSink<L, R> {
    pub fn new() -> MapSink<L, R> {
        MapSink {
            forward: AdjacencyMap::default(),
            backward: AdjacencyMap::default(),
        }
    }
}

impl<L, R> RelationSink for MapSink<L, R>
where
    L: Hash + Eq + Clone,
    R: Hash + Eq + Clone,
{
    type Left = L;
    type Right = R;
    type Output = AssociativeStore<L, R>;
    type Error = Infallible;

    fn record(&mut self, triple: Triple<L, R>) -> Result<(), Infallible> {
        let Triple { left, right, value } = triple;
        self.forward
            .entry(left.clone())
            .or_default()
            .push(Entry::new(right.clone(), value));
        self.backward
            .entry(right)
            .or_default()
            .push(Entry::new(left, value));
        Ok(())
    }

    fn finish(self) -> AssociativeStore<L, R> {
        debug!(
            "finished associative store with {} left and {} right keys",
            self.forward.len(),
            self.backward.len()
        );
        AssociativeStore::from_maps(self.forward, self.backward)
    }
}

#[test]
fn test_mirrored_entries() {
    let mut sink = MapSink::new();
    sink.record(Triple::new("a", 1, 0.5)).unwrap();
    sink.record(Triple::new("a", 1, 0.5)).unwrap();
    sink.record(Triple::new("b", 1, 2.0)).unwrap();
    let store = sink.finish();

    assert_eq!(store.num_entries(), 3);
    let fwd: Vec<_> = store.right_entries("a").copied().collect();
    assert_eq!(fwd, vec![Entry::new(1, 0.5), Entry::new(1, 0.5)]);
    let bwd: Vec<_> = store.left_entries(&1).copied().collect();
    assert_eq!(
        bwd,
        vec![Entry::new("a", 0.5), Entry::new("a", 0.5), Entry::new("b", 2.0)]
    );
}
