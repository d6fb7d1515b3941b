// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use hashbrown::{hash_table::Entry, HashTable};
use log::*;
use rustc_hash::FxHasher;

use crate::errors::{StoreError, StoreResult};

use super::{check_domain, IdIndex};

/// Identifier list with a hash table of positions.
///
/// The table stores positions into the list rather than the identifiers, so
/// each identifier is kept once.
#[derive(Clone)]
pub struct IdList<T> {
    ids: Vec<T>,
    table: HashTable<u32>,
}

impl<T: Hash + Eq> IdList<T> {
    /// Create an index from unique identifiers, failing if any repeat.
    pub fn from_unique(ids: Vec<T>) -> StoreResult<IdList<T>> {
        check_domain(ids.len())?;
        let mut table = HashTable::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            let i = i as u32;
            let hash = hash_id(id);
            let e = table.entry(
                hash,
                |jr: &u32| ids[*jr as usize] == *id,
                |jr: &u32| hash_id(&ids[*jr as usize]),
            );
            if let Entry::Occupied(_) = &e {
                return Err(StoreError::DuplicateIdentifier(i));
            }
            e.insert(i);
        }
        debug!("indexed {} unique identifiers", ids.len());

        Ok(IdList { ids, table })
    }

    /// Create an index from identifiers that may repeat, keeping the first
    /// occurrence of each.  Fails if there are more distinct identifiers than
    /// `u32` positions.
    pub fn from_ids<I: IntoIterator<Item = T>>(ids: I) -> StoreResult<IdList<T>> {
        let mut list: Vec<T> = Vec::new();
        let mut table = HashTable::new();
        let mut n_seen = 0;
        for id in ids {
            n_seen += 1;
            let hash = hash_id(&id);
            if table
                .find(hash, |jr: &u32| list[*jr as usize] == id)
                .is_none()
            {
                let pos = u32::try_from(list.len())
                    .map_err(|_| StoreError::DomainTooLarge(list.len() + 1))?;
                table.insert_unique(hash, pos, |jr: &u32| hash_id(&list[*jr as usize]));
                list.push(id);
            }
        }
        debug!(
            "indexed {} unique identifiers from {} inputs",
            list.len(),
            n_seen
        );

        Ok(IdList { ids: list, table })
    }

    /// Get the position of an identifier.
    pub fn get_index(&self, id: &T) -> Option<u32> {
        self.table
            .find(hash_id(id), |jr| self.ids[*jr as usize] == *id)
            .copied()
    }

    /// Get the identifiers in position order.
    pub fn ids(&self) -> &[T] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<T> IdIndex for IdList<T>
where
    T: Hash + Eq + Clone + Debug + Send + Sync,
{
    type Id = T;

    fn lookup(&self, id: &T) -> Option<u32> {
        self.get_index(id)
    }

    fn id_of(&self, idx: u32) -> Option<T> {
        self.ids.get(idx as usize).cloned()
    }

    fn domain_size(&self) -> usize {
        self.ids.len()
    }
}

fn hash_id<T: Hash + ?Sized>(id: &T) -> u64 {
    let mut h = FxHasher::default();
    id.hash(&mut h);
    h.finish()
}

#[test]
fn test_unique_lookup() {
    let idx = IdList::from_unique(vec!["a", "b", "c"]).unwrap();
    assert_eq!(idx.len(), 3);
    assert_eq!(idx.get_index(&"a"), Some(0));
    assert_eq!(idx.get_index(&"c"), Some(2));
    assert_eq!(idx.get_index(&"z"), None);
    assert_eq!(idx.id_of(1), Some("b"));
    assert_eq!(idx.id_of(3), None);
}

#[test]
fn test_unique_rejects_duplicate() {
    match IdList::from_unique(vec![10u64, 20, 10]) {
        Err(StoreError::DuplicateIdentifier(i)) => assert_eq!(i, 2),
        _ => panic!("duplicate not detected"),
    }
}

#[test]
fn test_from_ids_keeps_first() {
    let idx = IdList::from_ids(vec!["x", "y", "x", "z", "y"]).unwrap();
    assert_eq!(idx.ids(), &["x", "y", "z"]);
    assert_eq!(idx.domain_size(), 3);
    assert_eq!(idx.lookup(&"z"), Some(2));
}

#[test]
fn test_empty() {
    let idx: IdList<String> = IdList::from_ids(Vec::new()).unwrap();
    assert!(idx.is_empty());
    assert!(idx.resolve(&"a".to_string()).is_err());
}

#[test]
fn test_many_ids() {
    let idx = IdList::from_unique((0..5000u32).map(|i| i * 7).collect()).unwrap();
    for i in 0..5000u32 {
        assert_eq!(idx.get_index(&(i * 7)), Some(i));
    }
    assert_eq!(idx.get_index(&1), None);
}
