//! Configuration for read windows.
//!
//! Centralizes the default study period used whenever a caller does not
//! supply explicit read dates.

use crate::constants::{DEFAULT_END_DATE, DEFAULT_START_DATE};
use crate::error::{DssError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Read configuration with named defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoConfig {
    /// First date of the read window (inclusive)
    pub start_date: NaiveDate,

    /// Last date of the read window (inclusive)
    pub end_date: NaiveDate,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            start_date: default_date(DEFAULT_START_DATE),
            end_date: default_date(DEFAULT_END_DATE),
        }
    }
}

fn default_date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

impl IoConfig {
    /// Set the first date of the read window
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// Set the last date of the read window
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = end_date;
        self
    }

    /// Set both ends of the read window
    pub fn with_window(self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.with_start_date(start_date).with_end_date(end_date)
    }

    /// Check the window is ordered
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(DssError::Configuration {
                message: format!(
                    "start date {} is after end date {}",
                    self.start_date, self.end_date
                ),
            });
        }
        Ok(())
    }
}
