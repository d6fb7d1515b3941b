// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use log::*;

#[cfg(feature = "fuse-parallel")]
use rayon::iter::PanicFuse;
use rayon::{current_num_threads, iter::ParallelIterator, ThreadPool, ThreadPoolBuilder};

use crate::errors::StoreResult;

/// Initialize the global Rayon pool with a fixed number of threads.
pub fn init_global_pool(n_threads: usize) -> StoreResult<()> {
    debug!("initializing global thread pool with {} threads", n_threads);
    ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()?;
    Ok(())
}

/// Build a dedicated pool for a single load.
pub fn build_pool(n_threads: usize) -> StoreResult<ThreadPool> {
    debug!("building load thread pool with {} threads", n_threads);
    Ok(ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("relstore-load-{}", i))
        .build()?)
}

/// Number of threads in the current pool.
pub fn thread_count() -> usize {
    current_num_threads()
}

#[cfg(not(feature = "fuse-parallel"))]
pub fn maybe_fuse<I: ParallelIterator>(iter: I) -> I {
    iter
}

#[cfg(feature = "fuse-parallel")]
pub fn maybe_fuse<I: ParallelIterator>(iter: I) -> PanicFuse<I> {
    iter.panic_fuse()
}

#[cfg(feature = "python")]
pub(crate) mod py {
    use pyo3::prelude::*;

    #[pyfunction]
    pub fn init_pool(n_threads: usize) -> PyResult<()> {
        Ok(super::init_global_pool(n_threads)?)
    }

    #[pyfunction]
    pub fn thread_count() -> usize {
        super::thread_count()
    }
}

#[test]
fn test_dedicated_pool() {
    let pool = build_pool(2).unwrap();
    assert_eq!(pool.install(thread_count), 2);
}
