// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

use std::sync::RwLock;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Instant,
};

use log::*;

const UPDATE_SECS: f64 = 5.0;

#[derive(Clone, Copy)]
struct UpdateState {
    count: usize,
    time: f64,
    rate: f64,
}

/// Throttled progress reporting through the log.
///
/// Counting is lock-free so worker threads can tick concurrently; at most
/// one message is logged per update interval.
pub(crate) struct ProgressHandle {
    label: &'static str,
    enabled: bool,
    start: Instant,
    count: AtomicUsize,
    last_update: RwLock<Option<UpdateState>>,
}

impl ProgressHandle {
    pub fn new(label: &'static str, enabled: bool) -> Self {
        ProgressHandle {
            label,
            enabled,
            start: Instant::now(),
            count: AtomicUsize::new(0),
            last_update: RwLock::new(None),
        }
    }

    pub fn tick(&self) {
        self.advance(1);
    }

    pub fn advance(&self, n: usize) {
        let count = self.count.fetch_add(n, Ordering::Relaxed) + n;
        if !self.enabled {
            return;
        }

        let last_update = self.last_update.read().map(|lu| *lu).unwrap_or(None);

        let thresh = if let Some(lu) = last_update {
            // bail early if the rate estimate says we don't need to update;
            // another worker may already have published a later count
            let n = count.saturating_sub(lu.count) as f64;
            if n / lu.rate < UPDATE_SECS * 0.95 {
                return;
            }

            lu.time
        } else {
            0.0
        };

        let time = self.start.elapsed().as_secs_f64();
        if time < thresh + UPDATE_SECS {
            return;
        }

        // if someone else is writing, they're handling this update
        if let Ok(mut lock) = self.last_update.try_write() {
            let rate = count as f64 / time;
            *lock = Some(UpdateState { count, time, rate });
            info!("{}: {} processed ({:.0}/s)", self.label, count, rate);
        }
    }

    /// Total number of ticks so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn finish(&self) {
        let count = self.count();
        let time = self.start.elapsed().as_secs_f64();
        if self.enabled {
            info!("{}: finished {} in {:.2}s", self.label, count, time);
        } else {
            debug!("{}: finished {} in {:.2}s", self.label, count, time);
        }
    }
}

#[test]
fn test_counts_when_disabled() {
    let pb = ProgressHandle::new("test", false);
    pb.tick();
    pb.advance(4);
    assert_eq!(pb.count(), 5);
}

#[test]
fn test_counts_concurrently() {
    use rayon::prelude::*;

    let pb = ProgressHandle::new("test", true);
    (0..1000).into_par_iter().for_each(|_| pb.tick());
    assert_eq!(pb.count(), 1000);
}

#[test]
fn test_tick_behind_published_count() {
    let pb = ProgressHandle::new("test", true);
    if let Ok(mut lock) = pb.last_update.write() {
        *lock = Some(UpdateState {
            count: 10,
            time: 0.0,
            rate: 1.0,
        });
    }
    pb.tick();
    pb.advance(3);
    assert_eq!(pb.count(), 4);
}
