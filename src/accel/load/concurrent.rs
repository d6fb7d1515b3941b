// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::*;
use rayon::prelude::*;

use crate::atomic::SpinCell;
use crate::errors::StoreResult;
use crate::index::{check_domain, IdIndex};
use crate::load::dense::check_bounds;
use crate::store::dense::Slots;
use crate::store::DenseStore;
use crate::types::{Entry, Triple};

/// Entries tagged with the input position of their triple.
type TaggedList = Vec<(usize, Entry<u32>)>;

/// Dense sink that accepts triples from many threads at once.
///
/// Every slot has its own lock, so appends to one key are serialized while
/// different keys proceed independently.  Entries carry their input position
/// and are sorted back into input order by [`ConcurrentDenseSink::finish`].
pub(crate) struct ConcurrentDenseSink<LI: IdIndex, RI: IdIndex> {
    left_index: Arc<LI>,
    right_index: Arc<RI>,
    forward: Vec<SpinCell<TaggedList>>,
    backward: Vec<SpinCell<TaggedList>>,
    n_entries: AtomicUsize,
}

impl<LI: IdIndex, RI: IdIndex> ConcurrentDenseSink<LI, RI> {
    pub fn new(left_index: Arc<LI>, right_index: Arc<RI>) -> StoreResult<Self> {
        check_domain(left_index.domain_size())?;
        check_domain(right_index.domain_size())?;
        let forward = (0..left_index.domain_size())
            .map(|_| SpinCell::new(Vec::new()))
            .collect();
        let backward = (0..right_index.domain_size())
            .map(|_| SpinCell::new(Vec::new()))
            .collect();
        Ok(ConcurrentDenseSink {
            left_index,
            right_index,
            forward,
            backward,
            n_entries: AtomicUsize::new(0),
        })
    }

    /// Record the triple found at position `pos` of the input.
    pub fn record_at(&self, pos: usize, triple: &Triple<LI::Id, RI::Id>) -> StoreResult<()> {
        let li = self.left_index.resolve(&triple.left)?;
        let ri = self.right_index.resolve(&triple.right)?;
        check_bounds(li, self.forward.len())?;
        check_bounds(ri, self.backward.len())?;

        self.forward[li as usize].with_mut(|l| l.push((pos, Entry::new(ri, triple.value))));
        self.backward[ri as usize].with_mut(|l| l.push((pos, Entry::new(li, triple.value))));
        self.n_entries.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn finish(self) -> DenseStore<LI, RI> {
        let n_entries = self.n_entries.into_inner();
        debug!("sorting {} concurrently-loaded entries", n_entries);
        DenseStore::from_parts(
            self.left_index,
            self.right_index,
            restore_order(self.forward),
            restore_order(self.backward),
            n_entries,
        )
    }
}

/// Sort each slot by input position and drop the tags.
fn restore_order(cells: Vec<SpinCell<TaggedList>>) -> Slots {
    cells
        .into_par_iter()
        .map(|cell| {
            let mut list = cell.into_inner();
            if list.is_empty() {
                None
            } else {
                list.sort_unstable_by_key(|(pos, _)| *pos);
                Some(list.into_iter().map(|(_, e)| e).collect())
            }
        })
        .collect()
}

#[test]
fn test_out_of_order_records() {
    use crate::index::RangeIndex;

    let sink =
        ConcurrentDenseSink::new(Arc::new(RangeIndex::new(2)), Arc::new(RangeIndex::new(2)))
            .unwrap();
    let triples = [
        Triple::new(0, 0, 1.0),
        Triple::new(0, 1, 2.0),
        Triple::new(1, 0, 3.0),
    ];
    // deliberately record in reverse
    for (pos, t) in triples.iter().enumerate().rev() {
        sink.record_at(pos, t).unwrap();
    }
    let store = sink.finish();
    assert_eq!(store.num_entries(), 3);
    assert_eq!(store.right_indices(0).unwrap().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(store.left_values(0).unwrap().collect::<Vec<_>>(), vec![1.0, 3.0]);
    assert!(!store.contains_right(5));
}
