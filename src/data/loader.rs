use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{Dataset, Field, Record};

/// Text columns every source must provide, in addition to the [`Field`] columns.
pub const KEY_COLUMNS: [&str; 3] = ["iso_code", "location", "date"];

/// Cell texts read as "no value", the same set pandas treats as NA by default.
pub const NULL_TOKENS: [&str; 11] = [
    "", "NaN", "nan", "-NaN", "-nan", "NA", "N/A", "n/a", "null", "NULL", "<NA>",
];

/// Every column a source must provide.
fn required_columns() -> impl Iterator<Item = &'static str> {
    KEY_COLUMNS
        .into_iter()
        .chain(Field::ALL.into_iter().map(Field::column))
}

/// Non-finite values (NaN, infinities) count as missing.
fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the key and numeric columns
/// * `.json`    – `[{ "iso_code": "KEN", "location": "Kenya", "date": "2021-01-01", ... }, ...]`
/// * `.parquet` – same column names; `date` as Date32 or text
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || {
        File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let dataset = match ext.as_str() {
        "csv" => load_csv(BufReader::new(open()?))?,
        "json" => load_json(BufReader::new(open()?))?,
        "parquet" | "pq" => load_parquet(open()?)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} records from {} ({} skipped without a date)",
        dataset.len(),
        path.display(),
        dataset.skipped_rows()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row-oriented sources (CSV, JSON)
// ---------------------------------------------------------------------------

/// One row as it appears in a row-oriented source, before date parsing.
#[derive(Debug, Deserialize)]
struct RawRecord {
    iso_code: String,
    location: String,
    date: Option<String>,
    #[serde(deserialize_with = "nullable_number")]
    total_cases: Option<f64>,
    #[serde(deserialize_with = "nullable_number")]
    total_deaths: Option<f64>,
    #[serde(deserialize_with = "nullable_number")]
    new_cases: Option<f64>,
    #[serde(deserialize_with = "nullable_number")]
    new_deaths: Option<f64>,
    #[serde(deserialize_with = "nullable_number")]
    people_fully_vaccinated_per_hundred: Option<f64>,
}

/// Numeric cell that may be missing: accepts numbers, numeric text, `null`
/// and the [`NULL_TOKENS`]. NaN and infinities become `None`.
fn nullable_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(NullableNumber)
}

struct NullableNumber;

impl<'de> Visitor<'de> for NullableNumber {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or an empty/NA cell")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(finite(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let v = v.trim();
        if NULL_TOKENS.contains(&v) {
            return Ok(None);
        }
        v.parse::<f64>()
            .map(finite)
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(self)
    }
}

impl RawRecord {
    /// `Ok(None)` when the row has no date and must be skipped.
    fn into_record(self, row: usize) -> Result<Option<Record>, LoadError> {
        let Some(date) = resolve_date(self.date.as_deref(), row)? else {
            return Ok(None);
        };
        Ok(Some(Record {
            iso_code: self.iso_code,
            location: self.location,
            date,
            total_cases: self.total_cases,
            total_deaths: self.total_deaths,
            new_cases: self.new_cases,
            new_deaths: self.new_deaths,
            people_fully_vaccinated_per_hundred: self.people_fully_vaccinated_per_hundred,
        }))
    }
}

/// Collect raw rows into a dataset, skipping and counting those without a date.
fn collect_rows<I>(rows: I) -> Result<Dataset, LoadError>
where
    I: IntoIterator<Item = Result<RawRecord, LoadError>>,
{
    let mut records = Vec::new();
    let mut skipped = 0;

    for (row_no, raw) in rows.into_iter().enumerate() {
        let row = row_no + 1;
        match raw?.into_record(row)? {
            Some(record) => records.push(record),
            None => {
                log::warn!("row {row}: empty date, skipping");
                skipped += 1;
            }
        }
    }

    Ok(Dataset::new(records, skipped))
}

/// CSV layout: header row with column names, one observation per line.
/// Columns may come in any order; columns not listed in [`KEY_COLUMNS`] or
/// [`Field`] are ignored. Empty and NA numeric cells become `None`.
pub fn load_csv<R: Read>(source: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers()?.clone();

    for column in required_columns() {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column.to_string()));
        }
    }

    collect_rows(
        reader
            .deserialize::<RawRecord>()
            .map(|r| r.map_err(LoadError::from)),
    )
}

/// Records-oriented JSON, the layout of `df.to_json(orient='records', date_format='iso')`.
/// Every object must carry every required key, `null` standing for a missing value.
pub fn load_json<R: Read>(source: R) -> Result<Dataset, LoadError> {
    let rows: Vec<JsonValue> = serde_json::from_reader(source)?;

    for row in &rows {
        if let Some(obj) = row.as_object() {
            if let Some(column) = required_columns().find(|c| !obj.contains_key(*c)) {
                return Err(LoadError::MissingColumn(column.to_string()));
            }
        }
    }

    collect_rows(
        rows.into_iter()
            .map(|row| serde_json::from_value::<RawRecord>(row).map_err(LoadError::from)),
    )
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same column names as the CSV layout.
///
/// `iso_code` and `location` may be any string type, numeric columns any
/// Arrow numeric type, and `date` either text or a date/timestamp type.
pub fn load_parquet(file: File) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    // Checked up front: a file without row groups never reaches `decode_batch`.
    if let Some(column) =
        required_columns().find(|c| builder.schema().column_with_name(c).is_none())
    {
        return Err(LoadError::MissingColumn(column.to_string()));
    }
    let reader = builder.build()?;

    let mut records = Vec::new();
    let mut skipped = 0;
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result?;
        skipped += decode_batch(&batch, row_offset, &mut records)?;
        row_offset += batch.num_rows();
    }

    Ok(Dataset::new(records, skipped))
}

/// Append the rows of one batch to `out`; returns how many were skipped.
fn decode_batch(
    batch: &RecordBatch,
    row_offset: usize,
    out: &mut Vec<Record>,
) -> Result<usize, LoadError> {
    let iso_code = text_column(batch, "iso_code")?;
    let location = text_column(batch, "location")?;
    let dates = DateColumn::from_batch(batch)?;

    let mut numeric = Vec::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        numeric.push(numeric_column(batch, field.column())?);
    }
    let value_at = |field: Field, row: usize| -> Option<f64> {
        let idx = Field::ALL.iter().position(|f| *f == field)?;
        let col = numeric[idx].as_primitive::<Float64Type>();
        (!col.is_null(row)).then(|| col.value(row)).and_then(finite)
    };

    let iso_code = iso_code.as_string::<i32>();
    let location = location.as_string::<i32>();
    let mut skipped = 0;

    for i in 0..batch.num_rows() {
        let row = row_offset + i + 1;
        let Some(date) = dates.get(i, row)? else {
            log::warn!("row {row}: empty date, skipping");
            skipped += 1;
            continue;
        };
        out.push(Record {
            iso_code: text_or_empty(iso_code, i),
            location: text_or_empty(location, i),
            date,
            total_cases: value_at(Field::TotalCases, i),
            total_deaths: value_at(Field::TotalDeaths, i),
            new_cases: value_at(Field::NewCases, i),
            new_deaths: value_at(Field::NewDeaths, i),
            people_fully_vaccinated_per_hundred: value_at(
                Field::PeopleFullyVaccinatedPerHundred,
                i,
            ),
        });
    }

    Ok(skipped)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, LoadError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

/// Fetch a column and normalise it to `Utf8`.
fn text_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef, LoadError> {
    let col = column(batch, name)?;
    Ok(cast(col.as_ref(), &DataType::Utf8)?)
}

/// Fetch a column and normalise it to `Float64`. Text columns are rejected
/// rather than silently cast to nulls.
fn numeric_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef, LoadError> {
    let col = column(batch, name)?;
    let data_type = col.data_type();
    if !(data_type.is_numeric() || *data_type == DataType::Null) {
        return Err(LoadError::ColumnType {
            column: name.to_string(),
            found: data_type.to_string(),
        });
    }
    Ok(cast(col.as_ref(), &DataType::Float64)?)
}

fn text_or_empty(col: &StringArray, row: usize) -> String {
    if col.is_null(row) {
        String::new()
    } else {
        col.value(row).to_string()
    }
}

/// The `date` column, either still textual or already a calendar type.
enum DateColumn {
    Text(ArrayRef),
    Days(ArrayRef),
}

impl DateColumn {
    fn from_batch(batch: &RecordBatch) -> Result<Self, LoadError> {
        let col = column(batch, "date")?;
        Ok(match col.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 => {
                DateColumn::Text(cast(col.as_ref(), &DataType::Utf8)?)
            }
            _ => DateColumn::Days(cast(col.as_ref(), &DataType::Date32)?),
        })
    }

    fn get(&self, i: usize, row: usize) -> Result<Option<NaiveDate>, LoadError> {
        match self {
            DateColumn::Text(arr) => {
                let arr = arr.as_string::<i32>();
                let cell = (!arr.is_null(i)).then(|| arr.value(i));
                resolve_date(cell, row)
            }
            DateColumn::Days(arr) => {
                let arr = arr.as_primitive::<Date32Type>();
                if arr.is_null(i) {
                    return Ok(None);
                }
                arr.value_as_date(i)
                    .map(Some)
                    .ok_or_else(|| LoadError::InvalidDate {
                        row,
                        value: arr.value(i).to_string(),
                    })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Empty or absent cells give `Ok(None)`; anything else must parse.
fn resolve_date(cell: Option<&str>, row: usize) -> Result<Option<NaiveDate>, LoadError> {
    let raw = cell.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Ok(None);
    }
    parse_date(raw)
        .map(Some)
        .ok_or_else(|| LoadError::InvalidDate {
            row,
            value: raw.to_string(),
        })
}

/// Accepts `YYYY-MM-DD` and ISO-8601 date-times; the time part is dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|dt| dt.date()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
