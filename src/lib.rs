mod chart;
mod detect;
mod prepare;
mod render;
mod table;
mod theme;
mod types;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use chart::{Chart, DEFAULT_TITLE, Point, Series, build, format_value};
pub use detect::{DETECTION_ORDER, Strategy, TimeAxis, detect_time_axis};
pub use prepare::{
    PrepareOptions, PreparedData, SYNTHETIC_TIME_COLUMN, prepare, prepare_with, synthetic_start,
};
pub use render::{show, to_html, to_plot, write_html};
pub use table::{Column, ColumnData, FileFormat, HEADERLESS_COLUMN, HeaderRow, Table};
pub use theme::{NAMED_COLORS, PALETTE, THEME, Theme, series_color};
pub use types::{Cell, TypeInference};

#[derive(Debug, Error)]
pub enum TsvizError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("No datetime column found in the file")]
    NoTimeColumn,
    #[error("Could not parse column '{column}' as datetime: '{value}'")]
    TimeParseError { column: String, value: String },
    #[error("Columns not found: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Columns are not numeric: {}", .0.join(", "))]
    NonNumericColumns(Vec<String>),
    #[error("No numeric columns found to plot")]
    NoNumericColumns,
    #[error("Index column not found: {0}")]
    IndexColumnNotFound(String),
    #[error("Workbook has no worksheets")]
    EmptyWorkbook,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TsvizError>;

/// Loads, prepares and charts a file in one go.
pub fn chart_file(path: &Path, options: &PrepareOptions) -> Result<(PreparedData, Chart)> {
    let prepared = prepare_with(path, options)?;
    let chart = build(&prepared.table, &prepared.time_column, &prepared.value_columns);
    Ok((prepared, chart))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_all() {
        let err = TsvizError::MissingColumns(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Columns not found: a, b");
    }

    #[test]
    fn test_file_not_found_message() {
        let err = TsvizError::FileNotFound(PathBuf::from("data.csv"));
        assert_eq!(err.to_string(), "File not found: data.csv");
    }
}
