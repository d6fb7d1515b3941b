// This file is part of LensKit.
// Copyright (C) 2018-2023 Boise State University.
// Copyright (C) 2023-2026 Drexel University.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Arrow conversion utilities.
//!
//! Adjacency views are exported as `LargeList<Struct<index: Int32, value:
//! Float64>>` arrays with one row per dense key.  Absent slots are null rows,
//! so the exported array keeps the distinction between keys that never had
//! entries and the (impossible) empty list.

use std::sync::Arc;

use arrow::{
    array::{
        Array, ArrayRef, AsArray, Float64Array, Float64Builder, Int32Array, Int32Builder,
        LargeListArray, RecordBatch, StructArray,
    },
    buffer::{NullBuffer, OffsetBuffer},
    datatypes::{DataType, Field, Fields, Float64Type, Int32Type},
};
use log::*;

use crate::errors::{StoreError, StoreResult};
use crate::store::dense::Slots;
use crate::types::Triple;

/// Fields of the entry structs in exported adjacency arrays.
pub fn entry_fields() -> Fields {
    Fields::from(vec![
        Field::new("index", DataType::Int32, false),
        Field::new("value", DataType::Float64, false),
    ])
}

/// Convert a dense adjacency view into an Arrow list array.
pub(crate) fn adjacency_array(slots: &Slots) -> StoreResult<LargeListArray> {
    let lengths: Vec<usize> = slots
        .iter()
        .map(|s| s.as_ref().map(|l| l.len()).unwrap_or(0))
        .collect();
    let n_entries = lengths.iter().sum();
    debug!(
        "exporting {} adjacency lists with {} entries",
        slots.len(),
        n_entries
    );

    let mut idx_bld = Int32Builder::with_capacity(n_entries);
    let mut val_bld = Float64Builder::with_capacity(n_entries);
    for e in slots.iter().flatten().flat_map(|l| l.iter()) {
        let idx = i32::try_from(e.key).map_err(|_| StoreError::ExportOverflow(e.key))?;
        idx_bld.append_value(idx);
        val_bld.append_value(e.value);
    }

    let fields = entry_fields();
    let list_field = Field::new("entries", DataType::Struct(fields.clone()), false);
    let columns: Vec<ArrayRef> = vec![Arc::new(idx_bld.finish()), Arc::new(val_bld.finish())];
    let sa = StructArray::try_new(fields, columns, None)?;
    let nulls = NullBuffer::from(slots.iter().map(|s| s.is_some()).collect::<Vec<bool>>());
    let list = LargeListArray::try_new(
        Arc::new(list_field),
        OffsetBuffer::from_lengths(lengths),
        Arc::new(sa),
        Some(nulls),
    )?;
    Ok(list)
}

/// Build dense triples from parallel index and value columns.
pub fn triples_from_arrays(
    left: &Int32Array,
    right: &Int32Array,
    values: &Float64Array,
) -> StoreResult<Vec<Triple<u32, u32>>> {
    let n = left.len();
    if right.len() != n {
        return Err(StoreError::LengthMismatch(n, right.len()));
    }
    if values.len() != n {
        return Err(StoreError::LengthMismatch(n, values.len()));
    }

    let mut triples = Vec::with_capacity(n);
    for i in 0..n {
        if values.is_null(i) {
            return Err(StoreError::InvalidRow(i));
        }
        triples.push(Triple::new(
            dense_value(left, i)?,
            dense_value(right, i)?,
            values.value(i),
        ));
    }
    trace!("extracted {} triples from arrow columns", n);
    Ok(triples)
}

/// Build dense triples from named columns of a record batch.
pub fn triples_from_batch(
    batch: &RecordBatch,
    left: &str,
    right: &str,
    value: &str,
) -> StoreResult<Vec<Triple<u32, u32>>> {
    let lcol = batch
        .column_by_name(left)
        .and_then(|c| c.as_primitive_opt::<Int32Type>())
        .ok_or_else(|| StoreError::InvalidColumn(left.into()))?;
    let rcol = batch
        .column_by_name(right)
        .and_then(|c| c.as_primitive_opt::<Int32Type>())
        .ok_or_else(|| StoreError::InvalidColumn(right.into()))?;
    let vcol = batch
        .column_by_name(value)
        .and_then(|c| c.as_primitive_opt::<Float64Type>())
        .ok_or_else(|| StoreError::InvalidColumn(value.into()))?;
    triples_from_arrays(lcol, rcol, vcol)
}

fn dense_value(arr: &Int32Array, i: usize) -> StoreResult<u32> {
    if arr.is_null(i) {
        return Err(StoreError::InvalidRow(i));
    }
    u32::try_from(arr.value(i)).map_err(|_| StoreError::InvalidRow(i))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Array, AsArray, Float64Array, Int32Array, RecordBatch};
    use arrow::datatypes::{Float64Type, Int32Type};

    use super::{adjacency_array, triples_from_arrays, triples_from_batch};
    use crate::errors::StoreError;
    use crate::index::RangeIndex;
    use crate::store::DenseStore;
    use crate::types::{Entry, Triple};

    #[test]
    fn test_triples_from_arrays() {
        let l = Int32Array::from(vec![0, 1]);
        let r = Int32Array::from(vec![2, 0]);
        let v = Float64Array::from(vec![1.5, 2.5]);
        let ts = triples_from_arrays(&l, &r, &v).unwrap();
        assert_eq!(ts, vec![Triple::new(0, 2, 1.5), Triple::new(1, 0, 2.5)]);
    }

    #[test]
    fn test_rejects_negative_and_null() {
        let l = Int32Array::from(vec![Some(0), Some(-1)]);
        let r = Int32Array::from(vec![Some(0), Some(0)]);
        let v = Float64Array::from(vec![1.0, 1.0]);
        assert!(matches!(
            triples_from_arrays(&l, &r, &v),
            Err(StoreError::InvalidRow(1))
        ));

        let l = Int32Array::from(vec![Some(0), None]);
        assert!(matches!(
            triples_from_arrays(&l, &r, &v),
            Err(StoreError::InvalidRow(1))
        ));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let l = Int32Array::from(vec![0, 1]);
        let r = Int32Array::from(vec![0]);
        let v = Float64Array::from(vec![1.0, 1.0]);
        assert!(matches!(
            triples_from_arrays(&l, &r, &v),
            Err(StoreError::LengthMismatch(2, 1))
        ));
    }

    #[test]
    fn test_batch_columns() {
        let batch = RecordBatch::try_from_iter(vec![
            ("user", Arc::new(Int32Array::from(vec![0, 0])) as Arc<dyn Array>),
            ("item", Arc::new(Int32Array::from(vec![1, 0])) as Arc<dyn Array>),
            ("rating", Arc::new(Float64Array::from(vec![4.0, 3.5])) as Arc<dyn Array>),
        ])
        .unwrap();
        let ts = triples_from_batch(&batch, "user", "item", "rating").unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts[1], Triple::new(0, 0, 3.5));
        assert!(matches!(
            triples_from_batch(&batch, "user", "item", "score"),
            Err(StoreError::InvalidColumn(_))
        ));
        assert!(matches!(
            triples_from_batch(&batch, "rating", "item", "rating"),
            Err(StoreError::InvalidColumn(_))
        ));
    }

    #[test]
    fn test_export_forward() {
        let store = DenseStore::load(
            vec![
                Triple::new(0u32, 1u32, 1.0),
                Triple::new(2, 0, 2.0),
                Triple::new(0, 0, 3.0),
            ],
            Arc::new(RangeIndex::new(3)),
            Arc::new(RangeIndex::new(2)),
        )
        .unwrap();

        let fwd = store.forward_array().unwrap();
        assert_eq!(fwd.len(), 3);
        assert!(fwd.is_valid(0));
        assert!(fwd.is_null(1));
        assert!(fwd.is_valid(2));
        assert_eq!(fwd.value_offsets(), &[0, 2, 2, 3]);

        let row = fwd.value(0);
        let row = row.as_struct();
        let idx = row.column(0).as_primitive::<Int32Type>();
        let val = row.column(1).as_primitive::<Float64Type>();
        assert_eq!(idx.values().to_vec(), vec![1, 0]);
        assert_eq!(val.values().to_vec(), vec![1.0, 3.0]);

        let bwd = store.backward_array().unwrap();
        assert_eq!(bwd.len(), 2);
        assert_eq!(bwd.null_count(), 0);
        assert_eq!(bwd.value_length(0), 2);
    }

    #[test]
    fn test_export_rejects_wide_index() {
        let slots = vec![
            Some(vec![Entry::new(3, 1.0)].into_boxed_slice()),
            Some(vec![Entry::new(u32::MAX, 2.0)].into_boxed_slice()),
        ];
        assert!(matches!(
            adjacency_array(&slots),
            Err(StoreError::ExportOverflow(k)) if k == u32::MAX
        ));
    }
}
