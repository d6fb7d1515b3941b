// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Error types for relation stores.

use arrow::error::ArrowError;
use thiserror::Error;

/// Errors raised while building or querying a relation store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A dense index outside the declared domain.
    #[error("index {index} out of range for domain of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    /// A domain with more positions than a `u32` index can address.
    #[error("domain of size {0} exceeds the u32 index range")]
    DomainTooLarge(usize),
    /// An index too large for an exported `Int32` column.
    #[error("index {0} does not fit in an Int32 column")]
    ExportOverflow(u32),
    /// An identifier with no assigned dense index.
    #[error("unknown identifier {0}")]
    UnknownIdentifier(String),
    #[error("duplicate identifier found at index {0}")]
    DuplicateIdentifier(u32),
    #[error("column length mismatch: {0} != {1}")]
    LengthMismatch(usize, usize),
    #[error("invalid row {0}: null or negative entry")]
    InvalidRow(usize),
    #[error("missing or mistyped column {0}")]
    InvalidColumn(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("thread pool initialization failed: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(feature = "python")]
impl From<StoreError> for pyo3::PyErr {
    fn from(value: StoreError) -> Self {
        use pyo3::exceptions::{
            PyIndexError, PyKeyError, PyOverflowError, PyRuntimeError, PyValueError,
        };
        let msg = format!("{}", value);
        match value {
            StoreError::IndexOutOfRange { .. } => PyIndexError::new_err(msg),
            StoreError::ExportOverflow(_) => PyOverflowError::new_err(msg),
            StoreError::UnknownIdentifier(_) => PyKeyError::new_err(msg),
            StoreError::ThreadPool(_) => PyRuntimeError::new_err(msg),
            _ => PyValueError::new_err(msg),
        }
    }
}

#[test]
fn test_out_of_range_message() {
    let err = StoreError::IndexOutOfRange { index: 5, size: 5 };
    assert_eq!(err.to_string(), "index 5 out of range for domain of size 5");
}

#[test]
fn test_config_error_from_json() {
    let err: StoreError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, StoreError::Config(_)));
}
