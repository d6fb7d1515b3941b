// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use log::*;

use crate::errors::{StoreError, StoreResult};
use crate::index::{check_domain, IdIndex};
use crate::load::RelationSink;
use crate::store::dense::Slots;
use crate::store::DenseStore;
use crate::types::{Entry, Triple};

/// Accumulate triples into two arrays of optional adjacency lists.
pub(crate) struct DenseSink<LI: IdIndex, RI: IdIndex> {
    left_index: Arc<LI>,
    right_index: Arc<RI>,
    forward: Vec<Option<Vec<Entry<u32>>>>,
    backward: Vec<Option<Vec<Entry<u32>>>>,
    n_entries: usize,
}

impl<LI: IdIndex, RI: IdIndex> DenseSink<LI, RI> {
    pub fn new(left_index: Arc<LI>, right_index: Arc<RI>) -> StoreResult<Self> {
        check_domain(left_index.domain_size())?;
        check_domain(right_index.domain_size())?;
        let forward = vec![None; left_index.domain_size()];
        let backward = vec![None; right_index.domain_size()];
        Ok(DenseSink {
            left_index,
            right_index,
            forward,
            backward,
            n_entries: 0,
        })
    }
}

impl<LI: IdIndex, RI: IdIndex> RelationSink for DenseSink<LI, RI> {
    type Left = LI::Id;
    type Right = RI::Id;
    type Output = DenseStore<LI, RI>;
    type Error = StoreError;

    fn record(&mut self, triple: Triple<LI::Id, RI::Id>) -> StoreResult<()> {
        let li = self.left_index.resolve(&triple.left)?;
        let ri = self.right_index.resolve(&triple.right)?;
        check_bounds(li, self.forward.len())?;
        check_bounds(ri, self.backward.len())?;

        self.forward[li as usize]
            .get_or_insert_with(Vec::new)
            .push(Entry::new(ri, triple.value));
        self.backward[ri as usize]
            .get_or_insert_with(Vec::new)
            .push(Entry::new(li, triple.value));
        self.n_entries += 1;
        Ok(())
    }

    fn finish(self) -> DenseStore<LI, RI> {
        trace!("freezing {} dense adjacency entries", self.n_entries);
        DenseStore::from_parts(
            self.left_index,
            self.right_index,
            freeze(self.forward),
            freeze(self.backward),
            self.n_entries,
        )
    }
}

/// Check that an index resolved by a collaborator fits its domain.
pub(crate) fn check_bounds(idx: u32, size: usize) -> StoreResult<()> {
    if (idx as usize) < size {
        Ok(())
    } else {
        Err(StoreError::IndexOutOfRange {
            index: idx as usize,
            size,
        })
    }
}

fn freeze(lists: Vec<Option<Vec<Entry<u32>>>>) -> Slots {
    lists
        .into_iter()
        .map(|l| l.map(Vec::into_boxed_slice))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::errors::StoreError;
    use crate::index::{IdIndex, IdList, RangeIndex};
    use crate::load::RelationSink;
    use crate::types::Triple;

    use super::DenseSink;

    /// Index that claims a smaller domain than the positions it hands out.
    struct Lying;

    impl IdIndex for Lying {
        type Id = u32;
        fn lookup(&self, id: &u32) -> Option<u32> {
            Some(*id)
        }
        fn id_of(&self, idx: u32) -> Option<u32> {
            Some(idx)
        }
        fn domain_size(&self) -> usize {
            1
        }
    }

    #[test]
    fn test_unknown_identifier_aborts() {
        let users = Arc::new(IdList::from_unique(vec!["u1"]).unwrap());
        let items = Arc::new(IdList::from_unique(vec!["i1"]).unwrap());
        let mut sink = DenseSink::new(users, items).unwrap();
        sink.record(Triple::new("u1", "i1", 1.0)).unwrap();
        match sink.record(Triple::new("u1", "i9", 1.0)) {
            Err(StoreError::UnknownIdentifier(id)) => assert_eq!(id, "\"i9\""),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_resolved_out_of_domain() {
        let mut sink = DenseSink::new(Arc::new(Lying), Arc::new(RangeIndex::new(4))).unwrap();
        sink.record(Triple::new(0, 3, 1.0)).unwrap();
        assert!(matches!(
            sink.record(Triple::new(1, 0, 1.0)),
            Err(StoreError::IndexOutOfRange { index: 1, size: 1 })
        ));
        // the failed triple left no half-appended entry behind
        let store = sink.finish();
        assert_eq!(store.num_entries(), 1);
        assert_eq!(store.num_left_entries(0).unwrap(), 0);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_rejects_oversized_domain() {
        let huge = u32::MAX as usize + 2;
        let res = DenseSink::<RangeIndex, RangeIndex>::new(
            Arc::new(RangeIndex::new(huge)),
            Arc::new(RangeIndex::new(1)),
        );
        match res {
            Err(StoreError::DomainTooLarge(n)) => assert_eq!(n, huge),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("oversized domain accepted"),
        }
    }
}
