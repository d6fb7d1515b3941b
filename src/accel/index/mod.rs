// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Identifier indexes mapping entity IDs to dense positions.
//!
//! The dense store only reads an index; assigning positions is up to whoever
//! constructs it.  Two implementations are provided: [`IdList`], a hashed
//! list of arbitrary identifiers, and [`RangeIndex`], an identity index for
//! identifiers that are already dense.
use std::fmt::Debug;

use crate::errors::{StoreError, StoreResult};

mod table;

pub use table::IdList;

/// Bidirectional mapping between identifiers and dense indices in `0..n`.
pub trait IdIndex: Send + Sync {
    type Id: Clone + Debug + Send + Sync;

    /// Look up the position of an identifier.
    fn lookup(&self, id: &Self::Id) -> Option<u32>;

    /// Get the identifier at a position.
    fn id_of(&self, idx: u32) -> Option<Self::Id>;

    /// Get the number of positions in the domain.
    fn domain_size(&self) -> usize;

    /// Resolve an identifier, failing if it has no position.
    fn resolve(&self, id: &Self::Id) -> StoreResult<u32> {
        self.lookup(id)
            .ok_or_else(|| StoreError::UnknownIdentifier(format!("{:?}", id)))
    }
}

/// Check that a domain of `size` positions is addressable by `u32` indices.
pub(crate) fn check_domain(size: usize) -> StoreResult<()> {
    if size == 0 || u32::try_from(size - 1).is_ok() {
        Ok(())
    } else {
        Err(StoreError::DomainTooLarge(size))
    }
}

/// Identity index over `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeIndex {
    size: usize,
}

impl RangeIndex {
    pub fn new(size: usize) -> RangeIndex {
        RangeIndex { size }
    }
}

impl IdIndex for RangeIndex {
    type Id = u32;

    fn lookup(&self, id: &u32) -> Option<u32> {
        if (*id as usize) < self.size {
            Some(*id)
        } else {
            None
        }
    }

    fn id_of(&self, idx: u32) -> Option<u32> {
        self.lookup(&idx)
    }

    fn domain_size(&self) -> usize {
        self.size
    }
}

#[test]
fn test_range_lookup() {
    let idx = RangeIndex::new(3);
    assert_eq!(idx.domain_size(), 3);
    assert_eq!(idx.lookup(&0), Some(0));
    assert_eq!(idx.lookup(&2), Some(2));
    assert_eq!(idx.lookup(&3), None);
    assert_eq!(idx.id_of(1), Some(1));
}

#[test]
fn test_range_resolve_unknown() {
    let idx = RangeIndex::new(2);
    match idx.resolve(&9) {
        Err(StoreError::UnknownIdentifier(s)) => assert_eq!(s, "9"),
        r => panic!("unexpected result {:?}", r),
    }
}

#[test]
fn test_domain_limit() {
    assert!(check_domain(0).is_ok());
    assert!(check_domain(u32::MAX as usize).is_ok());
    #[cfg(target_pointer_width = "64")]
    {
        assert!(check_domain(u32::MAX as usize + 1).is_ok());
        assert!(matches!(
            check_domain(u32::MAX as usize + 2),
            Err(StoreError::DomainTooLarge(_))
        ));
    }
}
