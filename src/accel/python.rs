// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Python interface to dense relation stores.
use std::sync::Arc;

use arrow::{
    array::{make_array, Array, ArrayData, AsArray},
    datatypes::{Float64Type, Int32Type},
    pyarrow::PyArrowType,
};
use log::*;
use pyo3::{exceptions::PyTypeError, prelude::*};

use crate::arrow::triples_from_arrays;
use crate::config::LoadConfig;
use crate::index::RangeIndex;
use crate::load::Loader;
use crate::store::DenseStore;

/// Dense relation over already-indexed left and right entities.
#[pyclass]
pub struct DenseRelation {
    store: DenseStore<RangeIndex, RangeIndex>,
}

#[pymethods]
impl DenseRelation {
    /// Build a relation from parallel Int32 index and Float64 value arrays.
    #[new]
    #[pyo3(signature = (left, right, values, shape, parallel=false))]
    fn new(
        py: Python<'_>,
        left: PyArrowType<ArrayData>,
        right: PyArrowType<ArrayData>,
        values: PyArrowType<ArrayData>,
        shape: (usize, usize),
        parallel: bool,
    ) -> PyResult<Self> {
        let left = make_array(left.0);
        let right = make_array(right.0);
        let values = make_array(values.0);
        let left = left.as_primitive_opt::<Int32Type>().ok_or_else(|| {
            PyTypeError::new_err(format!("invalid left type {}", left.data_type()))
        })?;
        let right = right.as_primitive_opt::<Int32Type>().ok_or_else(|| {
            PyTypeError::new_err(format!("invalid right type {}", right.data_type()))
        })?;
        let values = values.as_primitive_opt::<Float64Type>().ok_or_else(|| {
            PyTypeError::new_err(format!("invalid value type {}", values.data_type()))
        })?;

        let triples = triples_from_arrays(left, right, values)?;
        let (n_left, n_right) = shape;
        debug!(
            "building {}x{} relation from {} triples",
            n_left,
            n_right,
            triples.len()
        );
        let config = if parallel {
            LoadConfig::parallel(None)
        } else {
            LoadConfig::sequential()
        };
        let store = py.allow_threads(|| {
            Loader::new(config).load_dense(
                triples,
                Arc::new(RangeIndex::new(n_left)),
                Arc::new(RangeIndex::new(n_right)),
            )
        })?;
        Ok(DenseRelation { store })
    }

    /// Get the (indices, values) paired with a left index.
    fn right_entries(&self, left: u32) -> PyResult<(Vec<u32>, Vec<f64>)> {
        let idx = self.store.right_indices(left)?.collect();
        let vals = self.store.right_values(left)?.collect();
        Ok((idx, vals))
    }

    /// Get the (indices, values) paired with a right index.
    fn left_entries(&self, right: u32) -> PyResult<(Vec<u32>, Vec<f64>)> {
        let idx = self.store.left_indices(right)?.collect();
        let vals = self.store.left_values(right)?.collect();
        Ok((idx, vals))
    }

    fn num_right_entries(&self, left: u32) -> PyResult<usize> {
        Ok(self.store.num_right_entries(left)?)
    }

    fn num_left_entries(&self, right: u32) -> PyResult<usize> {
        Ok(self.store.num_left_entries(right)?)
    }

    fn left_keys(&self) -> Vec<u32> {
        self.store.left_keys().collect()
    }

    fn right_keys(&self) -> Vec<u32> {
        self.store.right_keys().collect()
    }

    #[getter]
    fn num_entries(&self) -> usize {
        self.store.num_entries()
    }

    #[getter]
    fn num_left_keys(&self) -> usize {
        self.store.num_left_keys()
    }

    #[getter]
    fn num_right_keys(&self) -> usize {
        self.store.num_right_keys()
    }

    #[getter]
    fn shape(&self) -> (usize, usize) {
        (
            self.store.left_domain_size(),
            self.store.right_domain_size(),
        )
    }

    /// Export the left-to-right view as a list-of-struct Arrow array.
    fn forward_array(&self) -> PyResult<PyArrowType<ArrayData>> {
        Ok(self.store.forward_array()?.into_data().into())
    }

    /// Export the right-to-left view as a list-of-struct Arrow array.
    fn backward_array(&self) -> PyResult<PyArrowType<ArrayData>> {
        Ok(self.store.backward_array()?.into_data().into())
    }
}
