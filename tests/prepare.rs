use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;
use tsviz::{
    ColumnData, HeaderRow, PALETTE, PrepareOptions, Table, TsvizError, build, prepare, prepare_with,
};

fn csv(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn leftmost_timestamp_and_numeric_columns_in_file_order() {
    let dir = TempDir::new().unwrap();
    let path = csv(
        &dir,
        "sensors.csv",
        "stamp,z,note,a,m\n2024-05-01 00:00:00,1,ok,2,3\n2024-05-01 01:00:00,4,ok,5,6\n",
    );
    let prepared = prepare(&path, None).unwrap();
    assert_eq!(prepared.time_column, "stamp");
    assert_eq!(prepared.value_columns, vec!["z", "a", "m"]);

    let chart = build(&prepared.table, &prepared.time_column, &prepared.value_columns);
    let colors: Vec<&str> = chart.series.iter().map(|s| s.color).collect();
    assert_eq!(colors, vec![PALETTE[0], PALETTE[1], PALETTE[2]]);
}

#[test]
fn near_date_column_is_not_time() {
    let dir = TempDir::new().unwrap();
    let mut contents = String::from("maybe,when,v\n");
    for day in 1..=10 {
        let maybe = if day == 7 { "later".to_string() } else { format!("2024-02-{day:02}") };
        contents.push_str(&format!("{maybe},2024-03-{day:02},{day}\n"));
    }
    let path = csv(&dir, "near.csv", &contents);
    let prepared = prepare(&path, None).unwrap();
    assert_eq!(prepared.time_column, "when");
    assert_eq!(prepared.value_columns, vec!["v"]);
}

#[test]
fn headerless_reload_equals_direct_headerless_load() {
    let dir = TempDir::new().unwrap();
    let path = csv(&dir, "labels.csv", "status\nup\ndown\nup\n");
    let direct = Table::from_csv(&path, HeaderRow::Absent).unwrap();
    assert_eq!(direct.column_names(), vec!["value"]);
    assert_eq!(
        direct.column("value").unwrap().data,
        ColumnData::Text(
            ["status", "up", "down", "up"]
                .iter()
                .map(|s| Some(s.to_string()))
                .collect()
        )
    );

    let options = PrepareOptions {
        header: HeaderRow::Absent,
        ..Default::default()
    };
    assert!(matches!(prepare_with(&path, &options), Err(TsvizError::NoTimeColumn)));
    assert!(matches!(prepare(&path, None), Err(TsvizError::NoTimeColumn)));
}

#[test]
fn headerless_reload_still_rejects_mixed_column() {
    let dir = TempDir::new().unwrap();
    let path = csv(&dir, "dates.csv", "2024-01-01\nnot a date\n");
    // the date in the header row does not rescue the column once reloaded
    assert!(matches!(prepare(&path, None), Err(TsvizError::NoTimeColumn)));
}

#[test]
fn synthetic_axis_spans_2027() {
    let dir = TempDir::new().unwrap();
    let mut contents = String::from("load\n");
    for i in 0..8760 {
        contents.push_str(&format!("{i}\n"));
    }
    let path = csv(&dir, "curve.csv", &contents);
    let prepared = prepare(&path, None).unwrap();
    let stamps = match &prepared.table.column(&prepared.time_column).unwrap().data {
        ColumnData::Timestamp(stamps) => stamps.clone(),
        other => panic!("time column is not timestamps: {other:?}"),
    };
    let first = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let last = NaiveDate::from_ymd_opt(2027, 12, 31).unwrap().and_hms_opt(23, 0, 0).unwrap();
    assert_eq!(stamps.first().copied().flatten(), Some(first));
    assert_eq!(stamps.last().copied().flatten(), Some(last));
    assert_eq!(prepared.value_columns, vec!["load"]);
}
