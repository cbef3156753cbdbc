use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tsviz::{HeaderRow, PrepareOptions, chart_file, show, write_html};

/// Create interactive time series charts from CSV or Excel files.
///
/// Examples:
///
///     tsviz data.csv
///
///     tsviz data.csv -c column1 -c column2
///
///     tsviz data.xlsx -o output.html
///
///     tsviz data.csv -c temperature -t "Temperature Over Time"
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Interactive time series charts from CSV and Excel files.",
    long_about
)]
struct Args {
    /// CSV, XLS or XLSX file to plot
    file: PathBuf,

    /// Column to plot (repeat for several); defaults to every numeric column
    #[arg(short = 'c', long = "columns")]
    columns: Vec<String>,

    /// Save the chart to this HTML file instead of opening a browser
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Custom chart title
    #[arg(short = 't', long = "title")]
    title: Option<String>,

    /// Treat the first row as data rather than column names
    #[arg(long = "no-header")]
    no_header: bool,

    /// Load this column as the row index
    #[arg(long = "index-column")]
    index_column: Option<String>,
}

impl Args {
    fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            columns: self.columns.clone(),
            header: if self.no_header {
                HeaderRow::Absent
            } else {
                HeaderRow::Present
            },
            index_column: self.index_column.clone(),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(args: &Args) -> tsviz::Result<()> {
    let (prepared, mut chart) = chart_file(&args.file, &args.prepare_options())?;

    println!("Time column: {}", prepared.time_column);
    println!("Plotting columns: {}", prepared.value_columns.join(", "));
    println!("Data points: {}", prepared.table.row_count());

    if let Some(title) = &args.title {
        chart.set_title(title.as_str());
    }

    match &args.output {
        Some(path) => {
            write_html(&chart, path)?;
            println!("Plot saved to: {}", path.display());
        }
        None => {
            show(&chart);
            println!("Plot opened in browser");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeatable_columns() {
        let args = Args::try_parse_from([
            "tsviz", "data.csv", "-c", "a", "--columns", "b", "-t", "Load",
        ])
        .unwrap();
        assert_eq!(args.file, PathBuf::from("data.csv"));
        assert_eq!(args.columns, vec!["a", "b"]);
        assert_eq!(args.title.as_deref(), Some("Load"));
        assert!(args.output.is_none());
    }

    #[test]
    fn test_prepare_options() {
        let args = Args::try_parse_from([
            "tsviz",
            "data.csv",
            "--no-header",
            "--index-column",
            "when",
        ])
        .unwrap();
        let options = args.prepare_options();
        assert!(options.columns.is_empty());
        assert_eq!(options.header, HeaderRow::Absent);
        assert_eq!(options.index_column.as_deref(), Some("when"));
    }

    #[test]
    fn test_file_required() {
        assert!(Args::try_parse_from(["tsviz"]).is_err());
    }
}
