//! Application constants for tidy container access
//!
//! Column names of the catalog and tidy tables, sentinel values of the
//! container encoding and the default study period.

// =============================================================================
// Tidy Table Columns
// =============================================================================

pub const COL_DATETIME: &str = "DateTime";
pub const COL_VALUE: &str = "Value";
pub const COL_PATHNAME: &str = "Pathname";
pub const COL_UNITS: &str = "Units";
pub const COL_DATA_TYPE: &str = "Data Type";
pub const COL_STUDY: &str = "Study";
pub const COL_FILE_PATH: &str = "File Path";

/// Columns every tidy table must carry
pub const TIDY_REQUIRED_COLUMNS: &[&str] = &[
    COL_DATETIME,
    COL_VALUE,
    COL_PATHNAME,
    COL_UNITS,
    COL_DATA_TYPE,
];

/// Columns a tidy table may carry in addition to the required ones
pub const TIDY_OPTIONAL_COLUMNS: &[&str] = &[COL_STUDY, COL_FILE_PATH];

// =============================================================================
// Catalog Columns
// =============================================================================

pub const COL_PART_A: &str = "Part A";
pub const COL_PART_B: &str = "Part B";
pub const COL_PART_C: &str = "Part C";
pub const COL_PART_E: &str = "Part E";
pub const COL_PART_F: &str = "Part F";

// =============================================================================
// Container Encoding
// =============================================================================

/// Sentinel for missing / no data. The only sentinel ever written.
pub const MISSING_NO_DATA: f64 = -901.0;

/// Sentinel for missing / questionable data. Read-only.
pub const MISSING_QUESTIONABLE: f64 = -902.0;

/// Values mapped to NaN when reading
pub const MISSING_SENTINELS: &[f64] = &[MISSING_NO_DATA, MISSING_QUESTIONABLE];

/// Field delimiter of record pathnames
pub const PATHNAME_DELIMITER: char = '/';

/// Number of parts in a record pathname
pub const PATHNAME_PARTS: usize = 6;

// =============================================================================
// Defaults
// =============================================================================

/// Prefix of synthesized study labels (`Alt0`, `Alt1`, ...)
pub const SYNTHESIZED_STUDY_PREFIX: &str = "Alt";

/// Default historical study period (inclusive)
pub const DEFAULT_START_DATE: (i32, u32, u32) = (1921, 10, 31);
pub const DEFAULT_END_DATE: (i32, u32, u32) = (2003, 9, 30);
