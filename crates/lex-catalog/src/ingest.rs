//! Conversion between polars frames and catalog records.
//!
//! Input frames map column names to column values. Only the catalog columns
//! are read; extra columns are ignored and missing optional columns are
//! treated as all-absent. The required columns (`type`, `title`,
//! `release_year`) must be present.

use crate::error::{CatalogError, Result, ResultExt};
use crate::types::{RawRecord, Record};
use crate::utils::normalize_cell;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Columns that must be present in every input frame.
pub const REQUIRED_COLUMNS: [&str; 3] = ["type", "title", "release_year"];

/// Columns that default to all-absent when missing.
pub const OPTIONAL_COLUMNS: [&str; 8] = [
    "director",
    "cast",
    "country",
    "date_added",
    "rating",
    "duration",
    "listed_in",
    "description",
];

// =============================================================================
// Frame -> Records
// =============================================================================

/// Convert an input frame into raw records, one per row.
///
/// Text cells are normalized with [`normalize_cell`]; `release_year` is cast
/// to an integer and unparsable years become absent.
pub fn records_from_dataframe(df: &DataFrame) -> Result<Vec<RawRecord>> {
    let height = df.height();

    for name in REQUIRED_COLUMNS {
        if df.column(name).is_err() {
            return Err(CatalogError::ColumnNotFound(name.to_string()));
        }
    }

    let content_type = text_column(df, "type")?;
    let title = text_column(df, "title")?;
    let director = text_column(df, "director")?;
    let cast = text_column(df, "cast")?;
    let country = text_column(df, "country")?;
    let date_added = text_column(df, "date_added")?;
    let rating = text_column(df, "rating")?;
    let duration = text_column(df, "duration")?;
    let listed_in = text_column(df, "listed_in")?;
    let description = text_column(df, "description")?;
    let release_year = year_column(df)?;

    let records = (0..height)
        .map(|i| RawRecord {
            content_type: content_type[i].clone(),
            title: title[i].clone(),
            director: director[i].clone(),
            cast: cast[i].clone(),
            country: country[i].clone(),
            date_added: date_added[i].clone(),
            release_year: release_year[i],
            rating: rating[i].clone(),
            duration: duration[i].clone(),
            listed_in: listed_in[i].clone(),
            description: description[i].clone(),
        })
        .collect();

    debug!("Ingested {} rows from {} columns", height, df.width());
    Ok(records)
}

/// Read a column as normalized text, all-absent if the column is missing.
fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let Ok(column) = df.column(name) else {
        debug!("Column '{}' not present, treating as absent", name);
        return Ok(vec![None; df.height()]);
    };

    let series = column
        .as_materialized_series()
        .cast(&DataType::String)
        .context(format!("Casting column '{}' to text", name))?;
    let values = series.str().context(format!("Reading column '{}'", name))?;

    Ok(values.into_iter().map(normalize_cell).collect())
}

fn year_column(df: &DataFrame) -> Result<Vec<Option<i64>>> {
    let column = df
        .column("release_year")
        .map_err(|_| CatalogError::ColumnNotFound("release_year".to_string()))?;

    // text years are trimmed before the integer cast
    let series = match column.dtype() {
        DataType::String => {
            let trimmed: Vec<Option<String>> = column
                .as_materialized_series()
                .str()
                .context("Reading column 'release_year'")?
                .into_iter()
                .map(|v| v.map(|s| s.trim().to_string()))
                .collect();
            Series::new("release_year".into(), trimmed)
        }
        _ => column.as_materialized_series().clone(),
    };

    let years = series
        .cast(&DataType::Int64)
        .context("Casting column 'release_year' to integer")?;
    let values = years
        .i64()
        .context("Reading column 'release_year'")?;

    Ok(values.into_iter().collect())
}

// =============================================================================
// Records -> Frame
// =============================================================================

/// Convert cleaned records into a frame with the repaired columns followed by
/// the derived ones.
pub fn records_to_dataframe(records: &[Record]) -> PolarsResult<DataFrame> {
    fn text<'a>(records: &'a [Record], f: impl Fn(&'a Record) -> &'a str) -> Vec<&'a str> {
        records.iter().map(f).collect()
    }

    let columns = vec![
        Column::new("type".into(), text(records, |r| r.content_type.label())),
        Column::new("title".into(), text(records, |r| r.title.as_str())),
        Column::new("director".into(), text(records, |r| r.director.as_str())),
        Column::new("cast".into(), text(records, |r| r.cast.as_str())),
        Column::new("country".into(), text(records, |r| r.country.as_str())),
        Column::new("date_added".into(), text(records, |r| r.date_added.as_str())),
        Column::new(
            "release_year".into(),
            records.iter().map(|r| r.release_year).collect::<Vec<i64>>(),
        ),
        Column::new("rating".into(), text(records, |r| r.rating.as_str())),
        Column::new("duration".into(), text(records, |r| r.duration.as_str())),
        Column::new("listed_in".into(), text(records, |r| r.listed_in.as_str())),
        Column::new("description".into(), text(records, |r| r.description.as_str())),
        Column::new(
            "duration_minutes".into(),
            records
                .iter()
                .map(Record::duration_minutes)
                .collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "year_added".into(),
            records
                .iter()
                .map(Record::year_added)
                .collect::<Vec<Option<&str>>>(),
        ),
        Column::new("month_added".into(), text(records, Record::month_added)),
        Column::new("age_group".into(), text(records, |r| r.age_group.label())),
    ];

    DataFrame::new(columns)
}

// =============================================================================
// CSV Loading
// =============================================================================

/// Load a catalog CSV with multiple fallback strategies.
///
/// Every column is read as text; typing happens in
/// [`records_from_dataframe`].
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();

    // Strategy 1: standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: pre-clean content
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cleaned = clean_csv_content(&content);
            let cursor = std::io::Cursor::new(cleaned);

            CsvReadOptions::default()
                .with_infer_schema_length(Some(0))
                .with_has_header(true)
                .into_reader_with_file_handle(cursor)
                .finish()
                .context(format!("Loading CSV '{}'", path.display()))
        }
        Err(e) => {
            error!("Could not read file: {}", e);
            Err(e.into())
        }
    }
}

/// Collapse tripled and doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
