//! Command implementations for the CLI
//!
//! Dispatches parsed arguments to the library using the parquet container
//! adapter and reports a short summary on stdout.

use crate::cli::args::{Args, CatalogArgs, Commands, ReadArgs, WriteArgs};
use crate::constants::{
    COL_DATA_TYPE, COL_DATETIME, COL_FILE_PATH, COL_PATHNAME, COL_STUDY, COL_UNITS,
};
use crate::error::{DssError, Result};
use crate::io::DssIo;
use crate::store::ParquetStore;
use crate::tidy::has_column;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use colored::*;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Run the parsed command
pub fn run(args: Args) -> Result<()> {
    let io = DssIo::new(ParquetStore::new());
    match args.command {
        Commands::Catalog(catalog_args) => run_catalog(&io, catalog_args),
        Commands::Read(read_args) => run_read(&io, read_args),
        Commands::Write(write_args) => run_write(&io, write_args),
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dss_tidy={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

fn run_catalog(io: &DssIo<ParquetStore>, args: CatalogArgs) -> Result<()> {
    let catalog = io.read_catalog(&args.selection.to_selection())?;
    let mut df = catalog.to_frame()?;

    println!(
        "{} {}",
        "Pathnames:".bright_cyan(),
        catalog.len().to_string().bright_white().bold()
    );
    emit(&mut df, args.output.as_deref())
}

fn run_read(io: &DssIo<ParquetStore>, args: ReadArgs) -> Result<()> {
    let start = args.start.unwrap_or(io.config().start_date);
    let end = args.end.unwrap_or(io.config().end_date);

    let mut df = io.read_between(&args.selection.to_selection(), start, end)?;

    println!(
        "{} {} to {}",
        "Window:".bright_cyan(),
        start.to_string().bright_white(),
        end.to_string().bright_white()
    );
    println!(
        "{} {}",
        "Rows:".bright_cyan(),
        df.height().to_string().bright_white().bold()
    );
    emit(&mut df, args.output.as_deref())
}

fn run_write(io: &DssIo<ParquetStore>, args: WriteArgs) -> Result<()> {
    let destinations = args.to_destinations()?;
    let df = load_table(&args.input)?;

    let stats = io.write(&destinations, &df)?;

    println!("{}", "Write Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Containers:".bright_cyan(),
        stats.containers_written.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Series:".bright_cyan(),
        stats.series_written.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Rows:".bright_cyan(),
        stats.rows_written.to_string().bright_white().bold()
    );
    Ok(())
}

/// Print `df`, or save it as csv / parquet depending on the extension
fn emit(df: &mut DataFrame, output: Option<&Path>) -> Result<()> {
    let Some(path) = output else {
        println!("{}", df);
        return Ok(());
    };

    match extension(path).as_deref() {
        Some("csv") => {
            CsvWriter::new(File::create(path)?).finish(df)?;
        }
        Some("parquet") => {
            ParquetWriter::new(File::create(path)?).finish(df)?;
        }
        _ => return Err(unsupported_format(path)),
    }

    println!(
        "{} {}",
        "Saved:".bright_green(),
        path.display().to_string().bright_white()
    );
    Ok(())
}

/// Load a tidy table from a .csv or .parquet file
fn load_table(path: &Path) -> Result<DataFrame> {
    let df = match extension(path).as_deref() {
        Some("parquet") => ParquetReader::new(File::open(path)?).finish()?,
        Some("csv") => {
            let df = CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(None)
                .try_into_reader_with_file_path(Some(path.to_path_buf()))?
                .finish()?;
            restore_csv_types(df)?
        }
        _ => return Err(unsupported_format(path)),
    };
    debug!("Loaded {} rows from {}", df.height(), path.display());
    Ok(df)
}

/// CSV carries DateTime as text and may infer label columns as numbers
fn restore_csv_types(mut df: DataFrame) -> Result<DataFrame> {
    if has_column(&df, COL_DATETIME) {
        let column = df.column(COL_DATETIME)?;
        if matches!(column.dtype(), DataType::String) {
            let millis = column
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|text| text.map(parse_timestamp).transpose())
                .collect::<Result<Vec<Option<i64>>>>()?;
            let parsed = Column::new(COL_DATETIME.into(), millis)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
            df.with_column(parsed)?;
        }
    }

    for name in [COL_PATHNAME, COL_UNITS, COL_DATA_TYPE, COL_STUDY, COL_FILE_PATH] {
        if has_column(&df, name) && !matches!(df.column(name)?.dtype(), DataType::String) {
            let text = df.column(name)?.cast(&DataType::String)?;
            df.with_column(text)?;
        }
    }
    Ok(df)
}

/// Epoch milliseconds for a DateTime written as text
fn parse_timestamp(text: &str) -> Result<i64> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map(|t| t.and_utc().timestamp_millis())
        .map_err(|_| {
            DssError::malformed(format!("cannot parse {} value '{}'", COL_DATETIME, text))
        })
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

fn unsupported_format(path: &Path) -> DssError {
    DssError::Configuration {
        message: format!(
            "unsupported table format for {} (use .csv or .parquet)",
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSeries;
    use crate::store::{ContainerHandle, ContainerStore};
    use crate::tidy::TidyFrameBuilder;
    use clap::Parser;
    use tempfile::TempDir;

    const SHASTA: &str = "/CALSIM/S_SHSTA/STORAGE//1MON/L2020A/";

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_saved_csv_table_writes_back() {
        let temp_dir = TempDir::new().unwrap();
        let csv = temp_dir.path().join("table.csv");
        let dest = temp_dir.path().join("out.parquet");

        let series = TimeSeries::from_points(
            [(ts("1921-10-31 00:00"), 3000.5), (ts("1921-11-30 00:00"), 3100.0)],
            "TAF",
            "PER-AVER",
        );
        let mut builder = TidyFrameBuilder::new();
        builder.push_series(&series, SHASTA, None, None);
        let mut df = builder.finish().unwrap();
        emit(&mut df, Some(&csv)).unwrap();

        let args = Args::parse_from([
            "dss_tidy",
            "write",
            "-i",
            csv.to_str().unwrap(),
            "--dest",
            dest.to_str().unwrap(),
        ]);
        run(args).unwrap();

        let mut handle = ParquetStore::new().open(&dest).unwrap();
        let stored = handle
            .read_series(SHASTA, date("1921-10-01"), date("1921-12-31"))
            .unwrap();
        assert_eq!(stored, series);
    }

    #[test]
    fn test_csv_timestamp_forms() {
        let expected = ts("1921-10-31 00:00").and_utc().timestamp_millis();
        assert_eq!(parse_timestamp("1921-10-31T00:00:00.000").unwrap(), expected);
        assert_eq!(parse_timestamp("1921-10-31 00:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("1921-10-31").unwrap(), expected);
        assert!(matches!(
            parse_timestamp("October 1921"),
            Err(DssError::MalformedTable { .. })
        ));
    }

    #[test]
    fn test_unknown_table_format_rejected() {
        let result = load_table(Path::new("table.json"));
        assert!(matches!(result, Err(DssError::Configuration { .. })));
    }
}
