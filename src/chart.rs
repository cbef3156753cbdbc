use crate::table::{ColumnData, Table};
use crate::theme::{THEME, Theme, series_color};
use crate::types::DISPLAY_FORMAT;
use chrono::NaiveDateTime;

pub const DEFAULT_TITLE: &str = "Time Series Visualization";
pub const X_AXIS_LABEL: &str = "Time";
pub const Y_AXIS_LABEL: &str = "Value";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub time: Option<NaiveDateTime>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: &'static str,
    pub points: Vec<Point>,
    /// Per-point weekday names, present when the axis carries calendar dates.
    pub day_of_week: Option<Vec<Option<String>>>,
    /// Hover label per point, lines joined with `<br>`; `None` where the
    /// point has no value.
    pub hover_text: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub theme: Theme,
}

impl Chart {
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }
}

/// One line series per value column, colored by position.
pub fn build(table: &Table, time_column: &str, value_columns: &[String]) -> Chart {
    let times: Vec<Option<NaiveDateTime>> = match table.column(time_column).map(|c| &c.data) {
        Some(ColumnData::Timestamp(stamps)) => stamps.clone(),
        _ => vec![None; table.row_count()],
    };
    let has_calendar = times.iter().any(Option::is_some);
    let day_of_week: Option<Vec<Option<String>>> = has_calendar.then(|| {
        times
            .iter()
            .map(|t| t.map(|t| t.format("%A").to_string()))
            .collect()
    });

    let series = value_columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<Option<f64>> = match table.column(name).map(|c| &c.data) {
                Some(ColumnData::Numeric(values)) => values.clone(),
                _ => vec![None; table.row_count()],
            };
            let points: Vec<Point> = times
                .iter()
                .zip(values)
                .map(|(&time, value)| Point { time, value })
                .collect();
            let hover_text = points
                .iter()
                .enumerate()
                .map(|(row, point)| {
                    let day = day_of_week.as_ref().and_then(|days| days[row].as_deref());
                    format_hover(name, point, day)
                })
                .collect();

            Series {
                name: name.clone(),
                color: series_color(idx),
                points,
                day_of_week: day_of_week.clone(),
                hover_text,
            }
        })
        .collect();

    Chart {
        title: DEFAULT_TITLE.to_string(),
        x_label: X_AXIS_LABEL.to_string(),
        y_label: Y_AXIS_LABEL.to_string(),
        series,
        theme: THEME,
    }
}

fn format_hover(name: &str, point: &Point, day: Option<&str>) -> Option<String> {
    let value = point.value?;
    let mut lines = vec![format!("<b>{name}</b>")];
    if let Some(time) = point.time {
        lines.push(format!("Date: {}", time.format(DISPLAY_FORMAT)));
    }
    if let Some(day) = day {
        lines.push(format!("Day: {day}"));
    }
    lines.push(format!("Value: {}", format_value(value)));
    Some(lines.join("<br>"))
}

/// Two decimals with comma thousands separators, e.g. `-1,234,567.89`.
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
