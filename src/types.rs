use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;

/// Spellings that load as a missing value.
pub const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
];

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single loaded value before its column type is settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Cell {
    /// Reads a raw text field the way a CSV loader sees it.
    pub fn from_field(raw: &str) -> Cell {
        let val = raw.trim();
        if is_null_marker(val) {
            Cell::Null
        } else if let Ok(num) = val.parse::<f64>() {
            Cell::Number(num)
        } else {
            Cell::Text(val.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(v) => write!(f, "{v}"),
            Cell::Timestamp(v) => write!(f, "{}", v.format(DISPLAY_FORMAT)),
        }
    }
}

pub fn is_null_marker(val: &str) -> bool {
    NULL_MARKERS.contains(&val)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeInference {
    Numeric,
    Timestamp,
    Text,
}

/// Settles the type of a column from its cells. Nulls never vote, so a column
/// holding nothing but nulls comes out numeric.
pub fn infer_type(cells: &[Cell]) -> TypeInference {
    let mut is_numeric = true;
    let mut is_timestamp = true;
    let mut seen = false;

    for cell in cells {
        match cell {
            Cell::Null => continue,
            Cell::Number(_) => is_timestamp = false,
            Cell::Timestamp(_) => is_numeric = false,
            Cell::Text(_) => return TypeInference::Text,
        }
        seen = true;
        if !is_numeric && !is_timestamp {
            return TypeInference::Text;
        }
    }

    if is_numeric {
        TypeInference::Numeric
    } else if is_timestamp && seen {
        TypeInference::Timestamp
    } else {
        TypeInference::Text
    }
}

/// Parses one text value as a timestamp. Offsets are dropped and the wall
/// clock time kept; bare dates land on midnight.
pub fn parse_timestamp(val: &str) -> Option<NaiveDateTime> {
    let val = val.trim();
    if val.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(val) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(val, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(val, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
