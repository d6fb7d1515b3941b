// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Loader configuration.

use serde::{Deserialize, Serialize};
use serde_json::from_str;

use crate::errors::StoreResult;

/// Options controlling how relation stores are loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Build dense stores with the concurrent loader.
    pub parallel: bool,
    /// Size of a dedicated thread pool for concurrent builds.
    ///
    /// When unset, concurrent builds run on the global Rayon pool.
    pub threads: Option<usize>,
    /// Log throughput while consuming triples.
    pub progress: bool,
}

impl LoadConfig {
    /// Parse a configuration from JSON.  Missing fields take their defaults.
    pub fn from_json(json: &str) -> StoreResult<LoadConfig> {
        Ok(from_str(json)?)
    }

    /// Sequential configuration.
    pub fn sequential() -> LoadConfig {
        LoadConfig::default()
    }

    /// Concurrent configuration, optionally on a dedicated pool.
    pub fn parallel(threads: Option<usize>) -> LoadConfig {
        LoadConfig {
            parallel: true,
            threads,
            ..Default::default()
        }
    }
}

#[test]
fn test_default_is_sequential() {
    let cfg = LoadConfig::default();
    assert!(!cfg.parallel);
    assert!(!cfg.progress);
    assert_eq!(cfg.threads, None);
}

#[test]
fn test_partial_json() {
    let cfg = LoadConfig::from_json(r#"{"parallel": true}"#).unwrap();
    assert_eq!(cfg, LoadConfig::parallel(None));
}

#[test]
fn test_full_json() {
    let cfg = LoadConfig::from_json(r#"{"parallel": true, "threads": 4, "progress": true}"#)
        .unwrap();
    assert!(cfg.parallel);
    assert!(cfg.progress);
    assert_eq!(cfg.threads, Some(4));
}

#[test]
fn test_unknown_field_rejected() {
    assert!(LoadConfig::from_json(r#"{"workers": 4}"#).is_err());
}
