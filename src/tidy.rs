//! Tidy table interchange.
//!
//! Converts between typed rows and the long-format `DataFrame` shared by the
//! reader, the writer and all downstream analysis code.

use crate::constants::{
    COL_DATA_TYPE, COL_DATETIME, COL_FILE_PATH, COL_PATHNAME, COL_STUDY, COL_UNITS, COL_VALUE,
};
use crate::error::{DssError, Result};
use crate::models::TimeSeries;
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

/// One observation of the tidy table
#[derive(Debug, Clone, PartialEq)]
pub struct TidyRow {
    pub datetime: NaiveDateTime,
    pub value: f64,
    pub pathname: String,
    pub units: String,
    pub data_type: String,
    pub study: Option<String>,
    pub file_path: Option<String>,
}

/// Accumulates tidy rows column by column
#[derive(Debug, Default)]
pub struct TidyFrameBuilder {
    datetimes: Vec<i64>,
    values: Vec<f64>,
    pathnames: Vec<String>,
    units: Vec<String>,
    data_types: Vec<String>,
    studies: Option<Vec<Option<String>>>,
    file_paths: Option<Vec<Option<String>>>,
}

impl TidyFrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a `Study` column
    pub fn with_study_column(mut self) -> Self {
        self.studies = Some(Vec::new());
        self
    }

    /// Emit a `File Path` column
    pub fn with_file_path_column(mut self) -> Self {
        self.file_paths = Some(Vec::new());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append every point of `series`, tagged with constant columns
    pub fn push_series(
        &mut self,
        series: &TimeSeries,
        pathname: &str,
        study: Option<&str>,
        file_path: Option<&str>,
    ) {
        for (datetime, value) in series.points() {
            self.push(
                datetime,
                value,
                pathname,
                &series.units,
                &series.data_type,
                study,
                file_path,
            );
        }
    }

    pub fn push_row(&mut self, row: &TidyRow) {
        self.push(
            row.datetime,
            row.value,
            &row.pathname,
            &row.units,
            &row.data_type,
            row.study.as_deref(),
            row.file_path.as_deref(),
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        datetime: NaiveDateTime,
        value: f64,
        pathname: &str,
        units: &str,
        data_type: &str,
        study: Option<&str>,
        file_path: Option<&str>,
    ) {
        self.datetimes.push(datetime.and_utc().timestamp_millis());
        self.values.push(value);
        self.pathnames.push(pathname.to_string());
        self.units.push(units.to_string());
        self.data_types.push(data_type.to_string());
        if let Some(studies) = self.studies.as_mut() {
            studies.push(study.map(str::to_string));
        }
        if let Some(file_paths) = self.file_paths.as_mut() {
            file_paths.push(file_path.map(str::to_string));
        }
    }

    pub fn finish(self) -> Result<DataFrame> {
        let datetime = Column::new(COL_DATETIME.into(), self.datetimes)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

        let mut columns = vec![
            datetime,
            Column::new(COL_VALUE.into(), self.values),
            Column::new(COL_PATHNAME.into(), self.pathnames),
            Column::new(COL_UNITS.into(), self.units),
            Column::new(COL_DATA_TYPE.into(), self.data_types),
        ];
        if let Some(studies) = self.studies {
            columns.push(Column::new(COL_STUDY.into(), studies));
        }
        if let Some(file_paths) = self.file_paths {
            columns.push(Column::new(COL_FILE_PATH.into(), file_paths));
        }

        Ok(DataFrame::new(columns)?)
    }
}

/// Whether `df` has a column called `name`
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|n| n.as_str() == name)
}

/// Extract typed rows from a tidy table.
///
/// Missing values (null or NaN) come back as NaN. Nulls in any other
/// column are rejected.
pub fn tidy_rows(df: &DataFrame) -> Result<Vec<TidyRow>> {
    let datetimes = datetime_values(df, COL_DATETIME)?;
    let values = float_values(df, COL_VALUE)?;
    let pathnames = required_strings(df, COL_PATHNAME)?;
    let units = required_strings(df, COL_UNITS)?;
    let data_types = required_strings(df, COL_DATA_TYPE)?;
    let studies = if has_column(df, COL_STUDY) {
        Some(required_strings(df, COL_STUDY)?)
    } else {
        None
    };
    let file_paths = if has_column(df, COL_FILE_PATH) {
        Some(string_values(df, COL_FILE_PATH)?)
    } else {
        None
    };

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let datetime = datetimes[i]
            .ok_or_else(|| DssError::malformed(format!("null {} in row {}", COL_DATETIME, i)))?;
        rows.push(TidyRow {
            datetime,
            value: values[i],
            pathname: pathnames[i].clone(),
            units: units[i].clone(),
            data_type: data_types[i].clone(),
            study: studies.as_ref().map(|s| s[i].clone()),
            file_path: file_paths.as_ref().and_then(|f| f[i].clone()),
        });
    }
    Ok(rows)
}

fn datetime_values(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDateTime>>> {
    let column = df.column(name)?;
    let unit = match column.dtype() {
        DataType::Datetime(unit, _) => *unit,
        other => {
            return Err(DssError::malformed(format!(
                "column {} must be a datetime, found {}",
                name, other
            )));
        }
    };

    let raw = column.cast(&DataType::Int64)?;
    let values = raw
        .as_materialized_series()
        .i64()?
        .into_iter()
        .map(|v| v.and_then(|v| from_timestamp(v, unit)))
        .collect();
    Ok(values)
}

fn from_timestamp(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let datetime = match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value)?,
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value)?,
        TimeUnit::Nanoseconds => DateTime::from_timestamp_nanos(value),
    };
    Some(datetime.naive_utc())
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let values = column
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();
    Ok(values)
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?;
    let values = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

fn required_strings(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    string_values(df, name)?
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or_else(|| DssError::malformed(format!("null {} in row {}", name, i))))
        .collect()
}
