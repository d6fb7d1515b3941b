// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Loading relation stores from triples.
//!
//! Both store flavors are built by the same loop: create empty containers,
//! then for each triple resolve its keys and append the two mirrored
//! entries.  The flavors differ only in their [`RelationSink`].
use std::convert::Infallible;
use std::hash::Hash;
use std::sync::Arc;

use log::*;
use rayon::prelude::*;

use crate::config::LoadConfig;
use crate::errors::{StoreError, StoreResult};
use crate::index::IdIndex;
use crate::parallel::{build_pool, maybe_fuse};
use crate::progress::ProgressHandle;
use crate::store::{AssociativeStore, DenseStore};
use crate::types::Triple;

mod concurrent;
mod dense;
mod map;

pub(crate) use concurrent::ConcurrentDenseSink;
pub(crate) use dense::DenseSink;
pub(crate) use map::MapSink;

/// Trait for accumulating triples into a store under construction.
pub(crate) trait RelationSink {
    type Left;
    type Right;
    type Output;
    type Error;

    /// Record one triple in both adjacency views.
    fn record(&mut self, triple: Triple<Self::Left, Self::Right>) -> Result<(), Self::Error>;

    /// Finish into an immutable store.
    fn finish(self) -> Self::Output;
}

/// Feed a sequence of triples through a sink, in order.
fn drive<S, I>(mut sink: S, triples: I, progress: &ProgressHandle) -> Result<S::Output, S::Error>
where
    S: RelationSink,
    I: IntoIterator<Item = Triple<S::Left, S::Right>>,
{
    for triple in triples {
        sink.record(triple)?;
        progress.tick();
    }
    progress.finish();
    Ok(sink.finish())
}

/// Builds relation stores according to a [`LoadConfig`].
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: LoadConfig,
}

impl Loader {
    pub fn new(config: LoadConfig) -> Loader {
        Loader { config }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Load an associative store.  This consumes the triples exactly once.
    pub fn load_associative<L, R, I>(&self, triples: I) -> AssociativeStore<L, R>
    where
        L: Hash + Eq + Clone,
        R: Hash + Eq + Clone,
        I: IntoIterator<Item = Triple<L, R>>,
    {
        debug!("loading associative relation store");
        let progress = ProgressHandle::new("associative load", self.config.progress);
        let res: Result<_, Infallible> = drive(MapSink::new(), triples, &progress);
        match res {
            Ok(store) => store,
            Err(e) => match e {},
        }
    }

    /// Load a dense store, resolving identifiers through the two indexes.
    ///
    /// If any identifier fails to resolve, the load is aborted and the error
    /// is returned.
    pub fn load_dense<LI, RI, I>(
        &self,
        triples: I,
        left_index: Arc<LI>,
        right_index: Arc<RI>,
    ) -> StoreResult<DenseStore<LI, RI>>
    where
        LI: IdIndex,
        RI: IdIndex,
        I: IntoIterator<Item = Triple<LI::Id, RI::Id>>,
    {
        debug!(
            "loading {}x{} dense relation store",
            left_index.domain_size(),
            right_index.domain_size()
        );
        if self.config.parallel {
            let triples: Vec<_> = triples.into_iter().collect();
            return self.load_dense_parallel(&triples, left_index, right_index);
        }

        let progress = ProgressHandle::new("dense load", self.config.progress);
        drive(DenseSink::new(left_index, right_index)?, triples, &progress)
    }

    /// Load a dense store with concurrent resolution and appends.
    ///
    /// The result is identical to [`Loader::load_dense`] on the same triples:
    /// entries are tagged with their input position and each list is put
    /// back in input order when the build finishes.
    pub fn load_dense_parallel<LI, RI>(
        &self,
        triples: &[Triple<LI::Id, RI::Id>],
        left_index: Arc<LI>,
        right_index: Arc<RI>,
    ) -> StoreResult<DenseStore<LI, RI>>
    where
        LI: IdIndex,
        RI: IdIndex,
    {
        let progress = ProgressHandle::new("parallel dense load", self.config.progress);
        let run = || -> StoreResult<DenseStore<LI, RI>> {
            let sink = ConcurrentDenseSink::new(left_index, right_index)?;
            debug!("recording {} triples in parallel", triples.len());
            maybe_fuse(triples.par_iter().enumerate()).try_for_each(|(pos, t)| {
                sink.record_at(pos, t)?;
                progress.tick();
                Ok::<(), StoreError>(())
            })?;
            progress.finish();
            Ok(sink.finish())
        };

        match self.config.threads {
            Some(n) => build_pool(n)?.install(run),
            None => run(),
        }
    }
}
