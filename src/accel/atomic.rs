// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Atomic utilities

use std::{
    hint::spin_loop,
    ptr,
    sync::atomic::{AtomicPtr, Ordering},
};

/// A cell supporting exclusive mutation with spin locks for waiters.
///
/// The cell owns a boxed value; a thread locks it by swapping the pointer
/// for null and unlocks it by putting the pointer back.  This lets us keep
/// one lock per adjacency slot without an OS-level mutex for each.
#[repr(transparent)]
pub struct SpinCell<T: Send> {
    pointer: AtomicPtr<T>,
}

impl<T: Send> SpinCell<T> {
    /// Construct a new cell.
    pub fn new(value: T) -> Self {
        let ptr = Box::into_raw(Box::new(value));
        SpinCell {
            pointer: AtomicPtr::new(ptr),
        }
    }

    /// Mutate the contents while holding the lock.
    ///
    /// The lock is released even if `func` panics.
    pub fn with_mut<R, F: FnOnce(&mut T) -> R>(&self, func: F) -> R {
        let guard = SpinGuard {
            cell: self,
            ptr: self.lock(),
        };
        // SAFETY: the pointer is non-null and no other thread can observe it
        // until the guard releases it.
        func(unsafe { &mut *guard.ptr })
    }

    /// Take the contents out of the cell.
    pub fn into_inner(mut self) -> T {
        let ptr = std::mem::replace(self.pointer.get_mut(), ptr::null_mut());
        assert!(!ptr.is_null(), "cell consumed while locked");
        // SAFETY: the pointer came from Box::into_raw and has been detached
        // from the cell, so drop will not free it again.
        *unsafe { Box::from_raw(ptr) }
    }

    fn lock(&self) -> *mut T {
        let mut ptr = self.pointer.load(Ordering::Acquire);
        loop {
            if !ptr.is_null() {
                match self.pointer.compare_exchange_weak(
                    ptr,
                    ptr::null_mut(),
                    Ordering::Acquire,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => return ptr,
                    Err(p) => {
                        ptr = p;
                        continue;
                    }
                }
            }
            spin_loop();
            ptr = self.pointer.load(Ordering::Acquire);
        }
    }

    fn unlock(&self, ptr: *mut T) {
        let prev = self.pointer.swap(ptr, Ordering::Release);
        assert!(prev.is_null(), "another thread wrote while we held the lock");
    }
}

/// Puts a locked pointer back into its cell when dropped.
struct SpinGuard<'a, T: Send> {
    cell: &'a SpinCell<T>,
    ptr: *mut T,
}

impl<T: Send> Drop for SpinGuard<'_, T> {
    fn drop(&mut self) {
        self.cell.unlock(self.ptr);
    }
}

impl<T: Send> Drop for SpinCell<T> {
    fn drop(&mut self) {
        let ptr = *self.pointer.get_mut();
        if !ptr.is_null() {
            // SAFETY: a non-null pointer is always the live boxed value.
            drop(unsafe { Box::from_raw(ptr) });
        }
    }
}

#[test]
fn test_cell_roundtrip() {
    let cell = SpinCell::new(vec![1, 2]);
    cell.with_mut(|v| v.push(3));
    assert_eq!(cell.into_inner(), vec![1, 2, 3]);
}

#[test]
fn test_cell_concurrent_pushes() {
    use rayon::prelude::*;

    let cell = SpinCell::new(Vec::new());
    (0..10_000usize).into_par_iter().for_each(|i| {
        cell.with_mut(|v| v.push(i));
    });
    let mut v = cell.into_inner();
    assert_eq!(v.len(), 10_000);
    v.sort();
    assert!(v.iter().enumerate().all(|(i, x)| i == *x));
}

#[test]
fn test_cell_unlocked_after_panic() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let cell = SpinCell::new(vec![1]);
    let res = catch_unwind(AssertUnwindSafe(|| {
        cell.with_mut(|v| {
            v.push(2);
            panic!("failed inside the lock");
        })
    }));
    assert!(res.is_err());

    cell.with_mut(|v| v.push(3));
    assert_eq!(cell.into_inner(), vec![1, 2, 3]);
}
