// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use std::slice;
use std::sync::Arc;

use arrow::array::LargeListArray;
use log::*;

use crate::arrow::adjacency_array;
use crate::errors::{StoreError, StoreResult};
use crate::index::IdIndex;
use crate::load::Loader;
use crate::store::BipartiteStore;
use crate::types::{Entry, Triple};

/// One dense adjacency view: a slot per index, absent until its first entry.
pub(crate) type Slots = Vec<Option<Box<[Entry<u32>]>>>;

/// Relation store keyed by dense indices on both sides.
///
/// The two views are arrays sized to the index domains at build time, so
/// slot access needs no hashing.  A slot is `None` if no entry was ever
/// added for it; a present slot is never empty.
pub struct DenseStore<LI: IdIndex, RI: IdIndex> {
    left_index: Arc<LI>,
    right_index: Arc<RI>,
    forward: Slots,
    backward: Slots,
    n_entries: usize,
}

impl<LI: IdIndex, RI: IdIndex> DenseStore<LI, RI> {
    /// Load a store from triples of raw identifiers with the default loader.
    pub fn load<I>(triples: I, left_index: Arc<LI>, right_index: Arc<RI>) -> StoreResult<Self>
    where
        I: IntoIterator<Item = Triple<LI::Id, RI::Id>>,
    {
        Loader::default().load_dense(triples, left_index, right_index)
    }

    pub(crate) fn from_parts(
        left_index: Arc<LI>,
        right_index: Arc<RI>,
        forward: Slots,
        backward: Slots,
        n_entries: usize,
    ) -> Self {
        debug!(
            "assembled {}x{} dense store with {} entries",
            forward.len(),
            backward.len(),
            n_entries
        );
        DenseStore {
            left_index,
            right_index,
            forward,
            backward,
            n_entries,
        }
    }

    /// The index for left identifiers.
    pub fn left_index(&self) -> &LI {
        &self.left_index
    }

    /// The index for right identifiers.
    pub fn right_index(&self) -> &RI {
        &self.right_index
    }

    /// Size of the left domain, including keys with no entries.
    pub fn left_domain_size(&self) -> usize {
        self.forward.len()
    }

    /// Size of the right domain, including keys with no entries.
    pub fn right_domain_size(&self) -> usize {
        self.backward.len()
    }

    fn forward_slot(&self, left: u32) -> StoreResult<&[Entry<u32>]> {
        slot(&self.forward, left)
    }

    fn backward_slot(&self, right: u32) -> StoreResult<&[Entry<u32>]> {
        slot(&self.backward, right)
    }

    /// Iterate the entries of a left index.
    pub fn right_entries(&self, left: u32) -> StoreResult<slice::Iter<'_, Entry<u32>>> {
        self.forward_slot(left).map(|s| s.iter())
    }

    /// Iterate the entries of a right index.
    pub fn left_entries(&self, right: u32) -> StoreResult<slice::Iter<'_, Entry<u32>>> {
        self.backward_slot(right).map(|s| s.iter())
    }

    /// Iterate the right indices paired with a left index.
    pub fn right_indices(&self, left: u32) -> StoreResult<impl Iterator<Item = u32> + '_> {
        Ok(self.forward_slot(left)?.iter().map(|e| e.key))
    }

    /// Iterate the values paired with a left index.
    pub fn right_values(&self, left: u32) -> StoreResult<impl Iterator<Item = f64> + '_> {
        Ok(self.forward_slot(left)?.iter().map(|e| e.value))
    }

    /// Iterate the left indices paired with a right index.
    pub fn left_indices(&self, right: u32) -> StoreResult<impl Iterator<Item = u32> + '_> {
        Ok(self.backward_slot(right)?.iter().map(|e| e.key))
    }

    /// Iterate the values paired with a right index.
    pub fn left_values(&self, right: u32) -> StoreResult<impl Iterator<Item = f64> + '_> {
        Ok(self.backward_slot(right)?.iter().map(|e| e.value))
    }

    /// Ascending left indices whose slot has entries.
    ///
    /// This scans the whole domain.
    pub fn left_keys(&self) -> impl Iterator<Item = u32> + '_ {
        present(&self.forward)
    }

    /// Ascending right indices whose slot has entries.
    pub fn right_keys(&self) -> impl Iterator<Item = u32> + '_ {
        present(&self.backward)
    }

    pub fn contains_left(&self, left: u32) -> bool {
        matches!(self.forward.get(left as usize), Some(Some(_)))
    }

    pub fn contains_right(&self, right: u32) -> bool {
        matches!(self.backward.get(right as usize), Some(Some(_)))
    }

    pub fn num_left_keys(&self) -> usize {
        self.forward.iter().filter(|s| s.is_some()).count()
    }

    pub fn num_right_keys(&self) -> usize {
        self.backward.iter().filter(|s| s.is_some()).count()
    }

    pub fn num_right_entries(&self, left: u32) -> StoreResult<usize> {
        self.forward_slot(left).map(|s| s.len())
    }

    pub fn num_left_entries(&self, right: u32) -> StoreResult<usize> {
        self.backward_slot(right).map(|s| s.len())
    }

    /// Number of triples consumed when loading.
    pub fn num_entries(&self) -> usize {
        self.n_entries
    }

    /// Look up the entries of a left identifier, translated back to right
    /// identifiers.  Unknown identifiers have no entries.
    pub fn right_entries_by_id<'a>(
        &'a self,
        left: &LI::Id,
    ) -> impl Iterator<Item = Entry<RI::Id>> + 'a {
        let entries = self
            .left_index
            .lookup(left)
            .and_then(|i| self.forward_slot(i).ok())
            .unwrap_or(&[]);
        entries.iter().filter_map(move |e| {
            self.right_index
                .id_of(e.key)
                .map(|id| Entry::new(id, e.value))
        })
    }

    /// Look up the entries of a right identifier, translated back to left
    /// identifiers.  Unknown identifiers have no entries.
    pub fn left_entries_by_id<'a>(
        &'a self,
        right: &RI::Id,
    ) -> impl Iterator<Item = Entry<LI::Id>> + 'a {
        let entries = self
            .right_index
            .lookup(right)
            .and_then(|i| self.backward_slot(i).ok())
            .unwrap_or(&[]);
        entries.iter().filter_map(move |e| {
            self.left_index
                .id_of(e.key)
                .map(|id| Entry::new(id, e.value))
        })
    }

    /// Export the left-to-right view as an Arrow list array.
    pub fn forward_array(&self) -> StoreResult<LargeListArray> {
        adjacency_array(&self.forward)
    }

    /// Export the right-to-left view as an Arrow list array.
    pub fn backward_array(&self) -> StoreResult<LargeListArray> {
        adjacency_array(&self.backward)
    }
}

impl<LI: IdIndex, RI: IdIndex> BipartiteStore for DenseStore<LI, RI> {
    type Left = u32;
    type Right = u32;

    fn left_keys(&self) -> impl Iterator<Item = u32> + '_ {
        present(&self.forward)
    }

    fn right_keys(&self) -> impl Iterator<Item = u32> + '_ {
        present(&self.backward)
    }

    fn right_entries(&self, left: &u32) -> StoreResult<impl Iterator<Item = &Entry<u32>> + '_> {
        DenseStore::right_entries(self, *left)
    }

    fn left_entries(&self, right: &u32) -> StoreResult<impl Iterator<Item = &Entry<u32>> + '_> {
        DenseStore::left_entries(self, *right)
    }

    fn contains_left(&self, left: &u32) -> bool {
        DenseStore::contains_left(self, *left)
    }

    fn contains_right(&self, right: &u32) -> bool {
        DenseStore::contains_right(self, *right)
    }

    fn num_left_keys(&self) -> usize {
        DenseStore::num_left_keys(self)
    }

    fn num_right_keys(&self) -> usize {
        DenseStore::num_right_keys(self)
    }

    fn num_right_entries(&self, left: &u32) -> StoreResult<usize> {
        DenseStore::num_right_entries(self, *left)
    }

    fn num_left_entries(&self, right: &u32) -> StoreResult<usize> {
        DenseStore::num_left_entries(self, *right)
    }

    fn num_entries(&self) -> usize {
        self.n_entries
    }

    // nested lists of entries; the primitive iterators project each entry
    fn prefers_primitive_iteration(&self) -> bool {
        false
    }
}

fn slot(slots: &Slots, idx: u32) -> StoreResult<&[Entry<u32>]> {
    match slots.get(idx as usize) {
        Some(s) => Ok(s.as_deref().unwrap_or(&[])),
        None => Err(StoreError::IndexOutOfRange {
            index: idx as usize,
            size: slots.len(),
        }),
    }
}

fn present(slots: &Slots) -> impl Iterator<Item = u32> + '_ {
    slots
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_some())
        .map(|(i, _)| i as u32)
}
