// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Bipartite relation stores.
//!
//! A relation is a multiset of `(left, right, value)` triples, such as
//! user-item ratings or item-feature weights.  The stores here keep two
//! synchronized adjacency views of a relation so it can be queried from
//! either side:
//!
//! - [`AssociativeStore`] is keyed by arbitrary hashable identifiers.
//! - [`DenseStore`] is keyed by dense indices resolved through an
//!   [`IdIndex`], with array-backed slots.
//!
//! Both are built once by a [`Loader`] and are read-only afterwards.

pub mod arrow;
mod atomic;
pub mod config;
pub mod errors;
pub mod index;
pub mod load;
pub mod parallel;
mod progress;
pub mod store;
pub mod types;

#[cfg(feature = "python")]
mod python;

pub use config::LoadConfig;
pub use errors::{StoreError, StoreResult};
pub use index::{IdIndex, IdList, RangeIndex};
pub use load::Loader;
pub use store::{AssociativeStore, BipartiteStore, DenseStore};
pub use types::{Entry, Triple};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Entry point for the Python module.
#[cfg(feature = "python")]
#[pymodule]
fn relstore(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<python::DenseRelation>()?;
    m.add_function(wrap_pyfunction!(parallel::py::init_pool, m)?)?;
    m.add_function(wrap_pyfunction!(parallel::py::thread_count, m)?)?;

    Ok(())
}
