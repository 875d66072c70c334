//! Tidy-format validation.
//!
//! A table is tidy when it carries exactly the interchange columns with the
//! expected types, no nulls outside `Value` and `File Path`, and at most one
//! observation per (Study, Pathname, DateTime).

use crate::constants::{
    COL_DATETIME, COL_FILE_PATH, COL_STUDY, COL_VALUE, TIDY_OPTIONAL_COLUMNS,
    TIDY_REQUIRED_COLUMNS,
};
use crate::error::{DssError, Result};
use crate::tidy::{has_column, tidy_rows};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// Whether `df` is in tidy format
pub fn is_tidy(df: &DataFrame) -> bool {
    match validate_tidy(df) {
        Ok(()) => true,
        Err(e) => {
            debug!("Table rejected as not tidy: {}", e);
            false
        }
    }
}

/// Check `df` is in tidy format, naming the first violation found
pub fn validate_tidy(df: &DataFrame) -> Result<()> {
    for required in TIDY_REQUIRED_COLUMNS {
        if !has_column(df, required) {
            return Err(DssError::malformed(format!("missing column {}", required)));
        }
    }

    for name in df.get_column_names() {
        let name = name.as_str();
        if !TIDY_REQUIRED_COLUMNS.contains(&name) && !TIDY_OPTIONAL_COLUMNS.contains(&name) {
            return Err(DssError::malformed(format!("unexpected column {}", name)));
        }
    }

    for column in df.get_columns() {
        let name = column.name().as_str();
        let dtype = column.dtype();
        let type_ok = match name {
            COL_DATETIME => matches!(dtype, DataType::Datetime(_, _)),
            COL_VALUE => is_numeric(dtype),
            _ => matches!(dtype, DataType::String),
        };
        if !type_ok {
            return Err(DssError::malformed(format!(
                "column {} has unexpected type {}",
                name, dtype
            )));
        }
        if name != COL_VALUE && name != COL_FILE_PATH && column.null_count() > 0 {
            return Err(DssError::malformed(format!("column {} contains nulls", name)));
        }
    }

    let mut seen = HashSet::new();
    for row in tidy_rows(df)? {
        if !seen.insert((row.study.clone(), row.pathname.clone(), row.datetime)) {
            return Err(DssError::malformed(format!(
                "duplicate observation for {}{} at {}",
                row.pathname,
                row.study
                    .map(|s| format!(" in study {}", s))
                    .unwrap_or_default(),
                row.datetime
            )));
        }
    }

    debug!(
        "Validated tidy table: {} rows, study column: {}",
        df.height(),
        has_column(df, COL_STUDY)
    );
    Ok(())
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSeries;
    use crate::tidy::TidyFrameBuilder;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn sample_table() -> DataFrame {
        let series = TimeSeries::from_points(
            [(ts("2000-01-31 00:00"), 1.0), (ts("2000-02-29 00:00"), f64::NAN)],
            "CFS",
            "PER-AVER",
        );
        let mut builder = TidyFrameBuilder::new().with_study_column();
        builder.push_series(&series, "/A/B/C//1MON/F/", Some("Base"), None);
        builder.finish().unwrap()
    }

    #[test]
    fn test_built_table_is_tidy() {
        assert!(is_tidy(&sample_table()));
    }

    #[test]
    fn test_missing_required_column() {
        let df = sample_table().drop("Units").unwrap();
        let err = validate_tidy(&df).unwrap_err();
        assert!(err.to_string().contains("missing column Units"));
        assert!(!is_tidy(&df));
    }

    #[test]
    fn test_unexpected_column() {
        let mut df = sample_table();
        df.with_column(Column::new("Extra".into(), vec![1i32, 2]))
            .unwrap();
        assert!(!is_tidy(&df));
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let series = TimeSeries::from_points(
            [(ts("2000-01-31 00:00"), 1.0), (ts("2000-01-31 00:00"), 2.0)],
            "CFS",
            "PER-AVER",
        );
        let mut builder = TidyFrameBuilder::new();
        builder.push_series(&series, "/A/B/C//1MON/F/", None, None);
        let df = builder.finish().unwrap();
        let err = validate_tidy(&df).unwrap_err();
        assert!(err.to_string().contains("duplicate observation"));
    }

    #[test]
    fn test_same_timestamp_in_different_studies_allowed() {
        let series = TimeSeries::from_points([(ts("2000-01-31 00:00"), 1.0)], "CFS", "PER-AVER");
        let mut builder = TidyFrameBuilder::new().with_study_column();
        builder.push_series(&series, "/A/B/C//1MON/F/", Some("Base"), None);
        builder.push_series(&series, "/A/B/C//1MON/F/", Some("Alt"), None);
        assert!(is_tidy(&builder.finish().unwrap()));
    }

    #[test]
    fn test_string_value_column_rejected() {
        let df = df!(
            "Value" => &["1.0"],
            "Pathname" => &["/A/B/C//1MON/F/"],
            "Units" => &["CFS"],
            "Data Type" => &["PER-AVER"]
        )
        .unwrap();
        let mut df = df;
        let datetime = Column::new("DateTime".into(), vec![0i64])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        df.with_column(datetime).unwrap();
        assert!(!is_tidy(&df));
    }
}
