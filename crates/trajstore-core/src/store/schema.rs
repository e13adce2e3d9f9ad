//! Table layout of a trajectory store and conversion between rows and Arrow batches.

use crate::core::models::atom::AtomRecord;
use crate::core::models::trajectory::SimulationParameters;
use arrow::array::{Array, ArrayRef, FixedSizeListArray, Float64Array, UInt8Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use std::sync::{Arc, LazyLock};

/// File extension of every table in a store.
pub const TABLE_EXTENSION: &str = "parquet";
/// Name of the manifest file at the root of a store.
pub const MANIFEST_FILE: &str = "manifest.toml";

pub const PARAMS_GROUP: &str = "calculation_input";
pub const PARAMS_GROUP_TITLE: &str = "MD Calculation Input";
pub const PARAMS_TABLE: &str = "md_params";

pub const SIMULATION_GROUP: &str = "simulation";
pub const SIMULATION_GROUP_TITLE: &str = "Full MD simulation (all snapshots)";

/// Prefix of every snapshot table name.
pub const SNAPSHOT_PREFIX: &str = "SS_";
/// Width of the zero-padded decimal index in snapshot table names.
pub const SNAPSHOT_INDEX_WIDTH: usize = 10;

pub const COL_BOX_X: &str = "box_x";
pub const COL_BOX_Y: &str = "box_y";
pub const COL_BOX_Z: &str = "box_z";
pub const COL_ATOMIC_NUMBER: &str = "atomic_number";
pub const COL_POSITION: &str = "pos";
pub const COL_MOMENTUM: &str = "momentum";

/// Returns the table name of the snapshot with the given index, e.g. `SS_0000000042`.
pub fn snapshot_table_name(index: u64) -> String {
    format!("{SNAPSHOT_PREFIX}{index:0width$}", width = SNAPSHOT_INDEX_WIDTH)
}

/// Parses a snapshot table name back into its index.
///
/// Only names produced by [`snapshot_table_name`] are accepted.
pub fn parse_snapshot_table_name(name: &str) -> Option<u64> {
    let digits = name.strip_prefix(SNAPSHOT_PREFIX)?;
    if digits.len() < SNAPSHOT_INDEX_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: u64 = digits.parse().ok()?;
    (snapshot_table_name(index) == name).then_some(index)
}

fn vector_item_field() -> Arc<Field> {
    Arc::new(Field::new("item", DataType::Float64, false))
}

fn vector_data_type() -> DataType {
    DataType::FixedSizeList(vector_item_field(), 3)
}

static PARAMS_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new(COL_BOX_X, DataType::Float64, false),
        Field::new(COL_BOX_Y, DataType::Float64, false),
        Field::new(COL_BOX_Z, DataType::Float64, false),
    ]))
});

static SNAPSHOT_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new(COL_ATOMIC_NUMBER, DataType::UInt8, false),
        Field::new(COL_POSITION, vector_data_type(), false),
        Field::new(COL_MOMENTUM, vector_data_type(), false),
    ]))
});

/// Schema of the `md_params` table.
pub fn params_schema() -> SchemaRef {
    PARAMS_SCHEMA.clone()
}

/// Schema of every snapshot table.
pub fn snapshot_schema() -> SchemaRef {
    SNAPSHOT_SCHEMA.clone()
}

pub fn params_to_batch(params: &SimulationParameters) -> Result<RecordBatch, ArrowError> {
    RecordBatch::try_new(
        params_schema(),
        vec![
            Arc::new(Float64Array::from(vec![params.box_x])) as ArrayRef,
            Arc::new(Float64Array::from(vec![params.box_y])) as ArrayRef,
            Arc::new(Float64Array::from(vec![params.box_z])) as ArrayRef,
        ],
    )
}

pub fn records_to_batch(records: &[AtomRecord]) -> Result<RecordBatch, ArrowError> {
    let atomic_numbers = UInt8Array::from_iter_values(records.iter().map(|r| r.atomic_number));
    let positions: Vec<f64> = records.iter().flat_map(|r| r.position_array()).collect();
    let momenta: Vec<f64> = records.iter().flat_map(|r| r.momentum_array()).collect();

    RecordBatch::try_new(
        snapshot_schema(),
        vec![
            Arc::new(atomic_numbers) as ArrayRef,
            vector_column(positions)?,
            vector_column(momenta)?,
        ],
    )
}

fn vector_column(values: Vec<f64>) -> Result<ArrayRef, ArrowError> {
    let list = FixedSizeListArray::try_new(
        vector_item_field(),
        3,
        Arc::new(Float64Array::from(values)),
        None,
    )?;
    Ok(Arc::new(list))
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T, String> {
    batch
        .column_by_name(name)
        .ok_or_else(|| format!("missing column '{name}'"))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| format!("column '{name}' has unexpected type"))
}

fn vector_at(list: &FixedSizeListArray, values: &Float64Array, row: usize) -> [f64; 3] {
    let start = list.value_offset(row) as usize;
    [values.value(start), values.value(start + 1), values.value(start + 2)]
}

fn vector_values<'a>(list: &'a FixedSizeListArray, name: &str) -> Result<&'a Float64Array, String> {
    if list.value_length() != 3 {
        return Err(format!(
            "column '{name}' holds vectors of length {}, expected 3",
            list.value_length()
        ));
    }
    list.values()
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| format!("column '{name}' does not hold Float64 components"))
}

/// Decodes the rows of a params batch. The error string describes the schema mismatch.
pub fn batch_to_params(batch: &RecordBatch) -> Result<Vec<SimulationParameters>, String> {
    let x = column::<Float64Array>(batch, COL_BOX_X)?;
    let y = column::<Float64Array>(batch, COL_BOX_Y)?;
    let z = column::<Float64Array>(batch, COL_BOX_Z)?;

    Ok((0..batch.num_rows())
        .map(|row| SimulationParameters::new(x.value(row), y.value(row), z.value(row)))
        .collect())
}

/// Decodes the rows of a snapshot batch. The error string describes the schema mismatch.
pub fn batch_to_records(batch: &RecordBatch) -> Result<Vec<AtomRecord>, String> {
    let atomic_numbers = column::<UInt8Array>(batch, COL_ATOMIC_NUMBER)?;
    let positions = column::<FixedSizeListArray>(batch, COL_POSITION)?;
    let momenta = column::<FixedSizeListArray>(batch, COL_MOMENTUM)?;
    let position_values = vector_values(positions, COL_POSITION)?;
    let momentum_values = vector_values(momenta, COL_MOMENTUM)?;

    Ok((0..batch.num_rows())
        .map(|row| {
            AtomRecord::from_arrays(
                atomic_numbers.value(row),
                vector_at(positions, position_values, row),
                vector_at(momenta, momentum_values, row),
            )
        })
        .collect())
}
