// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Bipartite relation stores.
//!
//! A store holds two synchronized adjacency views of the same relation: one
//! from each left key to its `(right, value)` entries, and one from each
//! right key to its `(left, value)` entries.  Stores are populated once by a
//! [loader](crate::load) and are read-only afterwards, so they can be shared
//! across threads without locking.

use crate::errors::StoreResult;
use crate::types::Entry;

pub(crate) mod assoc;
pub(crate) mod dense;

pub use assoc::AssociativeStore;
pub use dense::DenseStore;

/// Common query contract for bipartite relation stores.
///
/// Per-key queries on a key that never received an entry return an empty
/// sequence or zero.  Only keys outside a store's declared domain are
/// errors, which can happen for dense stores.
pub trait BipartiteStore {
    type Left: Clone;
    type Right: Clone;

    /// Enumerate the left keys with at least one entry.
    fn left_keys(&self) -> impl Iterator<Item = Self::Left> + '_;

    /// Enumerate the right keys with at least one entry.
    fn right_keys(&self) -> impl Iterator<Item = Self::Right> + '_;

    /// Iterate the right-side entries of a left key, in load order.
    fn right_entries(
        &self,
        left: &Self::Left,
    ) -> StoreResult<impl Iterator<Item = &Entry<Self::Right>> + '_>;

    /// Iterate the left-side entries of a right key, in load order.
    fn left_entries(
        &self,
        right: &Self::Right,
    ) -> StoreResult<impl Iterator<Item = &Entry<Self::Left>> + '_>;

    fn contains_left(&self, left: &Self::Left) -> bool;
    fn contains_right(&self, right: &Self::Right) -> bool;

    /// Number of left keys with at least one entry.
    fn num_left_keys(&self) -> usize;
    /// Number of right keys with at least one entry.
    fn num_right_keys(&self) -> usize;

    fn num_right_entries(&self, left: &Self::Left) -> StoreResult<usize>;
    fn num_left_entries(&self, right: &Self::Right) -> StoreResult<usize>;

    /// Total number of entries (triples loaded, counting repeats).
    fn num_entries(&self) -> usize;

    /// Whether callers in tight numeric loops should prefer the store's
    /// primitive index/value iterators over entry iterators.
    ///
    /// This is only a performance hint; both paths yield the same content.
    fn prefers_primitive_iteration(&self) -> bool {
        false
    }
}
