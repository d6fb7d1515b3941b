// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Record types shared by the stores and loaders.
use serde::{Deserialize, Serialize};

/// One weighted relation between a left entity and a right entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triple<L, R> {
    pub left: L,
    pub right: R,
    pub value: f64,
}

impl<L, R> Triple<L, R> {
    pub fn new(left: L, right: R, value: f64) -> Self {
        Triple { left, right, value }
    }
}

impl<L, R> From<(L, R, f64)> for Triple<L, R> {
    fn from((left, right, value): (L, R, f64)) -> Self {
        Triple { left, right, value }
    }
}

/// One side of a triple, stored in the adjacency list of the other side.
///
/// `key` identifies the paired entity; `value` is the weight of this
/// specific occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<K> {
    pub key: K,
    pub value: f64,
}

impl<K> Entry<K> {
    pub fn new(key: K, value: f64) -> Self {
        Entry { key, value }
    }
}

#[test]
fn test_triple_from_tuple() {
    let t: Triple<&str, u32> = ("u1", 7, 2.5).into();
    assert_eq!(t, Triple::new("u1", 7, 2.5));
}

#[test]
fn test_triple_json() {
    let t: Triple<String, String> =
        serde_json::from_str(r#"{"left": "u1", "right": "i1", "value": 1.0}"#).unwrap();
    assert_eq!(t.left, "u1");
    assert_eq!(t.right, "i1");
    assert_eq!(t.value, 1.0);
}
