use crate::table::{ColumnData, Table};
use chrono::NaiveDateTime;
use tracing::debug;

/// Where the time axis of a table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeAxis {
    /// A column already typed as timestamps.
    Column(String),
    /// A text column whose values all parsed, carrying the parsed stamps.
    Parsed {
        name: String,
        stamps: Vec<Option<NaiveDateTime>>,
    },
    /// The row index holds timestamps but is not yet a column.
    Index,
}

impl TimeAxis {
    /// Column name of the axis; `None` for the row index.
    pub fn column_name(&self) -> Option<&str> {
        match self {
            TimeAxis::Column(name) | TimeAxis::Parsed { name, .. } => Some(name),
            TimeAxis::Index => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    TypedTimestamp,
    ParseableColumn,
    DatetimeIndex,
}

/// Strategies in the order they are tried; the first hit wins.
pub const DETECTION_ORDER: [Strategy; 3] = [
    Strategy::TypedTimestamp,
    Strategy::ParseableColumn,
    Strategy::DatetimeIndex,
];

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::TypedTimestamp => "typed-timestamp",
            Strategy::ParseableColumn => "parseable-column",
            Strategy::DatetimeIndex => "datetime-index",
        }
    }

    pub fn attempt(&self, table: &Table) -> Option<TimeAxis> {
        match self {
            Strategy::TypedTimestamp => table
                .columns()
                .iter()
                .find(|c| c.is_timestamp())
                .map(|c| TimeAxis::Column(c.name.clone())),
            // Every non-null value has to parse; one stray string rejects the column.
            Strategy::ParseableColumn => table.columns().iter().find_map(|c| match &c.data {
                ColumnData::Text(values) if !c.data.is_all_null() => {
                    ColumnData::parse_timestamps(values)
                        .ok()
                        .map(|stamps| TimeAxis::Parsed {
                            name: c.name.clone(),
                            stamps,
                        })
                }
                _ => None,
            }),
            Strategy::DatetimeIndex => table.has_datetime_index().then_some(TimeAxis::Index),
        }
    }
}

pub fn detect_time_axis(table: &Table) -> Option<TimeAxis> {
    DETECTION_ORDER.iter().find_map(|strategy| {
        let found = strategy.attempt(table);
        debug!(
            strategy = strategy.name(),
            found = ?found.as_ref().map(|axis| axis.column_name().unwrap_or("<index>")),
            "time axis detection"
        );
        found
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;
    use chrono::NaiveDate;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn midnight(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn stamp(day: u32) -> Cell {
        Cell::Timestamp(midnight(day))
    }

    #[test]
    fn test_typed_timestamp_wins_over_parseable() {
        let table = Table::from_rows(
            Some(vec!["label".into(), "when".into(), "v".into()]),
            vec![
                vec![text("2024-01-01"), stamp(1), Cell::Number(1.0)],
                vec![text("2024-01-02"), stamp(2), Cell::Number(2.0)],
            ],
        );
        assert_eq!(detect_time_axis(&table), Some(TimeAxis::Column("when".into())));
    }

    #[test]
    fn test_parseable_leftmost() {
        let table = Table::from_rows(
            Some(vec!["v".into(), "a".into(), "b".into()]),
            vec![
                vec![Cell::Number(1.0), text("2024-01-01"), text("2024-02-01")],
                vec![Cell::Number(2.0), text("2024-01-02"), text("2024-02-02")],
            ],
        );
        let axis = detect_time_axis(&table).unwrap();
        assert_eq!(axis.column_name(), Some("a"));
        assert_eq!(
            axis,
            TimeAxis::Parsed {
                name: "a".into(),
                stamps: vec![Some(midnight(1)), Some(midnight(2))],
            }
        );
    }

    #[test]
    fn test_one_bad_value_rejects_column() {
        let mut rows: Vec<Vec<Cell>> = (1..=9)
            .map(|d| vec![text(&format!("2024-01-0{d}")), Cell::Number(d as f64)])
            .collect();
        rows.push(vec![text("not a date"), Cell::Number(10.0)]);
        let table = Table::from_rows(Some(vec!["when".into(), "v".into()]), rows);
        assert_eq!(Strategy::ParseableColumn.attempt(&table), None);
        assert_eq!(detect_time_axis(&table), None);
    }

    #[test]
    fn test_nulls_do_not_reject() {
        let table = Table::from_rows(
            Some(vec!["when".into()]),
            vec![vec![text("2024-01-01")], vec![Cell::Null]],
        );
        assert_eq!(
            detect_time_axis(&table),
            Some(TimeAxis::Parsed {
                name: "when".into(),
                stamps: vec![Some(midnight(1)), None],
            })
        );
    }

    #[test]
    fn test_numeric_never_time() {
        let table = Table::from_rows(
            Some(vec!["v".into()]),
            vec![vec![Cell::Number(20240101.0)], vec![Cell::Number(20240102.0)]],
        );
        assert_eq!(detect_time_axis(&table), None);
    }

    #[test]
    fn test_datetime_index() {
        let mut table = Table::from_rows(
            Some(vec!["when".into(), "v".into()]),
            vec![vec![text("2024-01-01"), Cell::Number(1.0)]],
        );
        table.set_index("when").unwrap();
        assert_eq!(detect_time_axis(&table), Some(TimeAxis::Index));
        assert_eq!(TimeAxis::Index.column_name(), None);
    }
}
