use crate::detect::{TimeAxis, detect_time_axis};
use crate::table::{Column, ColumnData, FileFormat, HeaderRow, Table};
use crate::{Result, TsvizError};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{debug, info, warn};

/// Name of the time column made up for files that carry none.
pub const SYNTHETIC_TIME_COLUMN: &str = "datetime";

/// First stamp of the made-up hourly axis.
pub fn synthetic_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2027, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
pub struct PrepareOptions {
    /// Value columns to plot; empty means every numeric column.
    pub columns: Vec<String>,
    pub header: HeaderRow,
    pub index_column: Option<String>,
}

impl PrepareOptions {
    pub fn with_columns(columns: Vec<String>) -> Self {
        PrepareOptions {
            columns,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub table: Table,
    pub time_column: String,
    pub value_columns: Vec<String>,
}

pub fn prepare(path: &Path, columns: Option<&[String]>) -> Result<PreparedData> {
    let columns = columns.map(<[String]>::to_vec).unwrap_or_default();
    let options = PrepareOptions::with_columns(columns);
    prepare_with(path, &options)
}

pub fn prepare_with(path: &Path, options: &PrepareOptions) -> Result<PreparedData> {
    if !path.exists() {
        return Err(TsvizError::FileNotFound(path.to_path_buf()));
    }
    let format = FileFormat::from_path(path)?;

    let mut table = Table::load(path, format, options.header)?;
    if let Some(index) = &options.index_column {
        table.set_index(index)?;
    }

    let (mut table, axis) = locate_time_axis(table, path, format, options.header)?;
    let time_column = match axis {
        Some(TimeAxis::Column(name)) => name,
        Some(TimeAxis::Parsed { name, stamps }) => {
            install_timestamps(&mut table, &name, stamps)?;
            name
        }
        Some(TimeAxis::Index) => table.reset_index().ok_or(TsvizError::NoTimeColumn)?,
        None => synthesize_time_column(&mut table)?,
    };
    info!(time_column = %time_column, "time column chosen");

    drop_empty_columns(&mut table, &time_column);

    let value_columns = resolve_value_columns(&table, &time_column, &options.columns)?;
    Ok(PreparedData {
        table,
        time_column,
        value_columns,
    })
}

/// Runs detection, reloading a lone non-numeric CSV column as headerless data
/// when nothing was found. Returns the table detection ended up looking at.
pub fn locate_time_axis(
    table: Table,
    path: &Path,
    format: FileFormat,
    header: HeaderRow,
) -> Result<(Table, Option<TimeAxis>)> {
    let axis = detect_time_axis(&table);
    if axis.is_some() || !needs_headerless_reload(&table, format, header) {
        return Ok((table, axis));
    }

    warn!(
        path = %path.display(),
        "single text column without timestamps, reloading as headerless"
    );
    let table = Table::from_csv(path, HeaderRow::Absent)?;
    let axis = detect_time_axis(&table);
    Ok((table, axis))
}

fn needs_headerless_reload(table: &Table, format: FileFormat, header: HeaderRow) -> bool {
    format == FileFormat::Csv
        && header == HeaderRow::Present
        && table.index().is_none()
        && table.columns().len() == 1
        && !table.columns()[0].is_numeric()
}

/// Appends an hourly axis from 2027-01-01 when exactly one column is numeric.
fn synthesize_time_column(table: &mut Table) -> Result<String> {
    let numeric = table.columns().iter().filter(|c| c.is_numeric()).count();
    if numeric != 1 {
        return Err(TsvizError::NoTimeColumn);
    }

    let start = synthetic_start();
    let stamps = (0..table.row_count())
        .map(|hour| Some(start + Duration::hours(hour as i64)))
        .collect();
    table.push_column(Column::new(SYNTHETIC_TIME_COLUMN, ColumnData::Timestamp(stamps)));
    info!(rows = table.row_count(), "synthesized hourly time column");
    Ok(SYNTHETIC_TIME_COLUMN.to_string())
}

/// Swaps a text time column for the stamps parsed while detecting it.
fn install_timestamps(
    table: &mut Table,
    name: &str,
    stamps: Vec<Option<NaiveDateTime>>,
) -> Result<()> {
    let column = table.column_mut(name).ok_or(TsvizError::NoTimeColumn)?;
    column.data = ColumnData::Timestamp(stamps);
    Ok(())
}

pub fn drop_empty_columns(table: &mut Table, time_column: &str) {
    let before = table.columns().len();
    table.retain_columns(|c| c.name == time_column || !c.data.is_all_null());
    let dropped = before - table.columns().len();
    if dropped > 0 {
        debug!(dropped, "dropped all-null columns");
    }
}

pub fn resolve_value_columns(
    table: &Table,
    time_column: &str,
    requested: &[String],
) -> Result<Vec<String>> {
    let value_columns: Vec<String> = if requested.is_empty() {
        table
            .columns()
            .iter()
            .filter(|c| c.name != time_column && c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    } else {
        let mut unique: Vec<String> = Vec::with_capacity(requested.len());
        for name in requested {
            if !unique.contains(name) {
                unique.push(name.clone());
            }
        }

        let missing: Vec<String> = unique
            .iter()
            .filter(|name| table.column(name).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(TsvizError::MissingColumns(missing));
        }

        let non_numeric: Vec<String> = unique
            .iter()
            .filter(|name| table.column(name).is_some_and(|c| !c.is_numeric()))
            .cloned()
            .collect();
        if !non_numeric.is_empty() {
            return Err(TsvizError::NonNumericColumns(non_numeric));
        }
        unique
    };

    if value_columns.is_empty() {
        return Err(TsvizError::NoNumericColumns);
    }
    Ok(value_columns)
}
