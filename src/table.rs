use crate::types::{Cell, TypeInference, infer_type, parse_timestamp};
use crate::{Result, TsvizError};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Name given to the only column of a headerless single-column file.
pub const HEADERLESS_COLUMN: &str = "value";

const UNNAMED_INDEX: &str = "index";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xls" | "xlsx" => Ok(FileFormat::Excel),
            "" => Err(TsvizError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(TsvizError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderRow {
    #[default]
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        match infer_type(&cells) {
            TypeInference::Numeric => ColumnData::Numeric(
                cells
                    .into_iter()
                    .map(|c| match c {
                        Cell::Number(v) => Some(v),
                        _ => None,
                    })
                    .collect(),
            ),
            TypeInference::Timestamp => ColumnData::Timestamp(
                cells
                    .into_iter()
                    .map(|c| match c {
                        Cell::Timestamp(v) => Some(v),
                        _ => None,
                    })
                    .collect(),
            ),
            TypeInference::Text => ColumnData::Text(
                cells
                    .into_iter()
                    .map(|c| match c {
                        Cell::Null => None,
                        Cell::Text(v) => Some(v),
                        other => Some(other.to_string()),
                    })
                    .collect(),
            ),
        }
    }

    pub fn kind(&self) -> TypeInference {
        match self {
            ColumnData::Numeric(_) => TypeInference::Numeric,
            ColumnData::Timestamp(_) => TypeInference::Timestamp,
            ColumnData::Text(_) => TypeInference::Text,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_all_null(&self) -> bool {
        match self {
            ColumnData::Numeric(v) => v.iter().all(Option::is_none),
            ColumnData::Timestamp(v) => v.iter().all(Option::is_none),
            ColumnData::Text(v) => v.iter().all(Option::is_none),
        }
    }

    /// Parses every non-null text value as a timestamp, failing on the
    /// first one that does not parse.
    pub fn parse_timestamps(
        values: &[Option<String>],
    ) -> std::result::Result<Vec<Option<NaiveDateTime>>, String> {
        values
            .iter()
            .map(|v| match v {
                None => Ok(None),
                Some(s) => parse_timestamp(s).map(Some).ok_or_else(|| s.clone()),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Column {
            name: name.into(),
            data,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.data.kind() == TypeInference::Numeric
    }

    pub fn is_timestamp(&self) -> bool {
        self.data.kind() == TypeInference::Timestamp
    }
}

/// Column-oriented table. Every column, and the row index when present,
/// holds exactly `rows` values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    index: Option<Column>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        let rows = columns.first().map_or(0, |c| c.data.len());
        debug_assert!(columns.iter().all(|c| c.data.len() == rows));
        Table {
            columns,
            index: None,
            rows,
        }
    }

    /// Builds a table from row-major cells. With no headers the columns are
    /// named `value` when there is only one, else by position.
    pub fn from_rows(headers: Option<Vec<String>>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers
            .as_ref()
            .map(Vec::len)
            .or_else(|| rows.first().map(Vec::len))
            .unwrap_or(0);
        let names = match headers {
            Some(raw) => column_names(raw),
            None if width == 1 => vec![HEADERLESS_COLUMN.to_string()],
            None => (0..width).map(|i| i.to_string()).collect(),
        };

        let mut cells: Vec<Vec<Cell>> =
            (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
        for row in rows {
            let mut row = row.into_iter();
            for col in cells.iter_mut() {
                col.push(row.next().unwrap_or(Cell::Null));
            }
        }

        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, ColumnData::from_cells(cells)))
            .collect();
        Table::new(columns)
    }

    pub fn from_csv(path: &Path, header: HeaderRow) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let mut records = rdr.records();
        let headers = match header {
            HeaderRow::Present => match records.next() {
                Some(record) => Some(record?.iter().map(String::from).collect::<Vec<String>>()),
                None => Some(Vec::new()),
            },
            HeaderRow::Absent => None,
        };
        let rows: Vec<Vec<Cell>> = records
            .map(|r| {
                let record = r?;
                Ok(record.iter().map(Cell::from_field).collect::<Vec<Cell>>())
            })
            .collect::<Result<Vec<_>>>()?;

        let table = Table::from_rows(headers, rows);
        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.columns.len(),
            "loaded csv"
        );
        Ok(table)
    }

    /// Reads the first worksheet only.
    pub fn from_excel(path: &Path, header: HeaderRow) -> Result<Self> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(TsvizError::EmptyWorkbook)??;

        let mut sheet_rows = range.rows();
        let headers = match header {
            HeaderRow::Present => Some(
                sheet_rows
                    .next()
                    .map(|r| r.iter().map(|c| c.to_string()).collect::<Vec<String>>())
                    .unwrap_or_default(),
            ),
            HeaderRow::Absent => None,
        };
        let rows: Vec<Vec<Cell>> = sheet_rows
            .map(|r| r.iter().map(cell_from_excel).collect())
            .collect();

        let table = Table::from_rows(headers, rows);
        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.columns.len(),
            "loaded first worksheet"
        );
        Ok(table)
    }

    pub fn load(path: &Path, format: FileFormat, header: HeaderRow) -> Result<Self> {
        match format {
            FileFormat::Csv => Table::from_csv(path, header),
            FileFormat::Excel => Table::from_excel(path, header),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn index(&self) -> Option<&Column> {
        self.index.as_ref()
    }

    pub fn has_datetime_index(&self) -> bool {
        self.index.as_ref().is_some_and(Column::is_timestamp)
    }

    /// Appends a column, replacing any existing column of the same name in place.
    pub fn push_column(&mut self, column: Column) {
        debug_assert_eq!(column.data.len(), self.rows);
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    pub fn retain_columns<F: FnMut(&Column) -> bool>(&mut self, f: F) {
        self.columns.retain(f);
    }

    /// Moves a column into the row index. A text column is coerced to
    /// timestamps on the way, so the index becomes a datetime index; the first
    /// value that does not parse fails the move.
    pub fn set_index(&mut self, name: &str) -> Result<()> {
        let pos = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| TsvizError::IndexColumnNotFound(name.to_string()))?;
        if let ColumnData::Text(values) = &self.columns[pos].data {
            let stamps =
                ColumnData::parse_timestamps(values).map_err(|value| TsvizError::TimeParseError {
                    column: name.to_string(),
                    value,
                })?;
            self.columns[pos].data = ColumnData::Timestamp(stamps);
        }
        self.index = Some(self.columns.remove(pos));
        Ok(())
    }

    /// Moves the row index back in as the first column and returns its name.
    pub fn reset_index(&mut self) -> Option<String> {
        let mut column = self.index.take()?;
        if column.name.is_empty() {
            column.name = UNNAMED_INDEX.to_string();
        }
        if self.column(&column.name).is_some() {
            column.name = "level_0".to_string();
        }
        let name = column.name.clone();
        self.columns.insert(0, column);
        Some(name)
    }
}

fn cell_from_excel(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Null,
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) => Cell::Number(*v),
        Data::String(s) => Cell::from_field(s),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt.as_datetime().map_or(Cell::Null, Cell::Timestamp),
        Data::DateTimeIso(s) => {
            parse_timestamp(s).map_or_else(|| Cell::Text(s.clone()), Cell::Timestamp)
        }
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Blank headers become `Unnamed: <i>`, repeats get `.1`, `.2`, ... suffixes.
fn column_names(raw: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let base = match name.trim() {
            "" => format!("Unnamed: {i}"),
            trimmed => trimmed.to_string(),
        };
        let mut candidate = base.clone();
        let mut n = 0;
        while taken.contains(&candidate) {
            n += 1;
            candidate = format!("{base}.{n}");
        }
        taken.insert(candidate.clone());
        names.push(candidate);
    }
    names
}
