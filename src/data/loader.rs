use std::collections::BTreeSet;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, Date32Array, Float32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{columns, SalesDataset, SalesRecord};

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

/// Everything that can go wrong while loading a dataset. Load failures are
/// fatal for the attempt: the dataset stays unloaded and the error is shown
/// once. Row indices are zero-based data rows (the header not counted).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse date '{value}' (expected YYYY-MM-DD or MM/DD/YYYY)")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: invalid revenue {value} (must be a non-negative number)")]
    InvalidRevenue { row: usize, value: f64 },

    #[error("row {row}: null value in column '{column}'")]
    NullValue { row: usize, column: &'static str },

    #[error("column '{column}' has unsupported type {datatype}")]
    ColumnType { column: &'static str, datatype: String },

    #[error("reading file: {0}")]
    Io(#[from] std::io::Error),

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("reading Arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the nine required columns
/// * `.json`    – records orientation, `[{ "OrderID": …, … }, …]`
///   (the default `df.to_json(orient='records')`)
/// * `.parquet` – flat table with the same column names
pub fn load_file(path: &Path) -> Result<SalesDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Row parsing shared by CSV and JSON
// ---------------------------------------------------------------------------

/// One row as it appears in the file, before validation. The `Date` field
/// stays text until [`parse_date`]; everything else deserializes directly.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "OrderID")]
    order_id: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Product")]
    product: String,
    #[serde(rename = "Store")]
    store: String,
    #[serde(rename = "CustomerSegment")]
    customer_segment: String,
    #[serde(rename = "PaymentMethod")]
    payment_method: String,
    #[serde(rename = "TotalRevenue")]
    total_revenue: f64,
}

/// Accepted date formats, tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

fn parse_date(value: &str, row: usize) -> Result<NaiveDate, LoadError> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| LoadError::InvalidDate {
            row,
            value: value.to_string(),
        })
}

fn validate_revenue(value: f64, row: usize) -> Result<f64, LoadError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LoadError::InvalidRevenue { row, value })
    }
}

/// Validate one raw row and derive the calendar fields.
fn finish_row(raw: RawRow, row: usize) -> Result<SalesRecord, LoadError> {
    let date = parse_date(&raw.date, row)?;
    let revenue = validate_revenue(raw.total_revenue, row)?;
    Ok(SalesRecord::new(
        raw.order_id,
        date,
        raw.region,
        raw.category,
        raw.product,
        raw.store,
        raw.customer_segment,
        raw.payment_method,
        revenue,
    ))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<SalesDataset, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;

    let present: BTreeSet<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    for required in columns::ALL {
        if !present.contains(required) {
            return Err(LoadError::MissingColumn(required));
        }
    }

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<RawRow>().enumerate() {
        records.push(finish_row(result?, row)?);
    }
    Ok(SalesDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<SalesDataset, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let rows: Vec<RawRow> = serde_json::from_str(&text)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, raw) in rows.into_iter().enumerate() {
        records.push(finish_row(raw, row)?);
    }
    Ok(SalesDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with a flat sales table.
///
/// Expected schema: the string columns as `Utf8`/`LargeUtf8`, `Date` as
/// either text or `Date32`, `TotalRevenue` as `Float64`/`Float32`/`Int64`.
/// Works with files written by both Pandas (`df.to_parquet()`) and Polars
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<SalesDataset, LoadError> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    let mut row_base = 0usize;

    for batch_result in reader {
        let batch = batch_result?;

        let order_ids = batch_column(&batch, columns::ORDER_ID)?;
        let dates = batch_column(&batch, columns::DATE)?;
        let regions = batch_column(&batch, columns::REGION)?;
        let categories = batch_column(&batch, columns::CATEGORY)?;
        let products = batch_column(&batch, columns::PRODUCT)?;
        let stores = batch_column(&batch, columns::STORE)?;
        let segments = batch_column(&batch, columns::CUSTOMER_SEGMENT)?;
        let payments = batch_column(&batch, columns::PAYMENT_METHOD)?;
        let revenues = batch_column(&batch, columns::TOTAL_REVENUE)?;

        for i in 0..batch.num_rows() {
            let row = row_base + i;
            let date = read_date(dates, columns::DATE, i, row)?;
            let revenue =
                validate_revenue(read_f64(revenues, columns::TOTAL_REVENUE, i, row)?, row)?;

            records.push(SalesRecord::new(
                read_string(order_ids, columns::ORDER_ID, i, row)?,
                date,
                read_string(regions, columns::REGION, i, row)?,
                read_string(categories, columns::CATEGORY, i, row)?,
                read_string(products, columns::PRODUCT, i, row)?,
                read_string(stores, columns::STORE, i, row)?,
                read_string(segments, columns::CUSTOMER_SEGMENT, i, row)?,
                read_string(payments, columns::PAYMENT_METHOD, i, row)?,
                revenue,
            ));
        }
        row_base += batch.num_rows();
    }
    Ok(SalesDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn batch_column<'a>(batch: &'a RecordBatch, name: &'static str) -> Result<&'a ArrayRef, LoadError> {
    let schema = batch.schema();
    let idx = schema
        .index_of(name)
        .map_err(|_| LoadError::MissingColumn(name))?;
    Ok(batch.column(idx))
}

/// Extract a string cell from a `Utf8` or `LargeUtf8` column.
fn read_string(
    col: &ArrayRef,
    column: &'static str,
    i: usize,
    row: usize,
) -> Result<String, LoadError> {
    if col.is_null(i) {
        return Err(LoadError::NullValue { row, column });
    }
    match col.data_type() {
        DataType::Utf8 => {
            // Downcast cannot fail once the data type matched.
            let arr = col.as_any().downcast_ref::<StringArray>().unwrap();
            Ok(arr.value(i).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(i).to_string()),
        other => Err(LoadError::ColumnType {
            column,
            datatype: format!("{other:?}"),
        }),
    }
}

/// Extract a date cell: text columns go through [`parse_date`], `Date32`
/// converts directly.
fn read_date(
    col: &ArrayRef,
    column: &'static str,
    i: usize,
    row: usize,
) -> Result<NaiveDate, LoadError> {
    if col.is_null(i) {
        return Err(LoadError::NullValue { row, column });
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            parse_date(&read_string(col, column, i, row)?, row)
        }
        DataType::Date32 => {
            let arr = col.as_any().downcast_ref::<Date32Array>().unwrap();
            arr.value_as_date(i).ok_or_else(|| LoadError::InvalidDate {
                row,
                value: arr.value(i).to_string(),
            })
        }
        other => Err(LoadError::ColumnType {
            column,
            datatype: format!("{other:?}"),
        }),
    }
}

/// Extract a numeric cell as `f64`.
fn read_f64(col: &ArrayRef, column: &'static str, i: usize, row: usize) -> Result<f64, LoadError> {
    if col.is_null(i) {
        return Err(LoadError::NullValue { row, column });
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            Ok(arr.value(i))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            Ok(arr.value(i) as f64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(arr.value(i) as f64)
        }
        other => Err(LoadError::ColumnType {
            column,
            datatype: format!("{other:?}"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
