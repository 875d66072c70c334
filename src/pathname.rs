//! Record pathname parsing and reconstruction.
//!
//! A record pathname is the six part key `/A/B/C/D/E/F/` identifying one
//! series inside a container. Part D carries the date block and is not part
//! of the series identity.

use crate::constants::{PATHNAME_DELIMITER, PATHNAME_PARTS};
use crate::error::{DssError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Six part hierarchical record key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RecordPath {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
    pub e: String,
    pub f: String,
}

impl RecordPath {
    /// Build a pathname from catalog parts, leaving part D empty
    pub fn from_parts(
        a: impl Into<String>,
        b: impl Into<String>,
        c: impl Into<String>,
        e: impl Into<String>,
        f: impl Into<String>,
    ) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: String::new(),
            e: e.into(),
            f: f.into(),
        }
    }

    /// Parse `/A/B/C/D/E/F/`
    pub fn parse(pathname: &str) -> Result<Self> {
        let invalid = |reason: &str| DssError::InvalidPathname {
            pathname: pathname.to_string(),
            reason: reason.to_string(),
        };

        let inner = pathname
            .trim()
            .strip_prefix(PATHNAME_DELIMITER)
            .and_then(|rest| rest.strip_suffix(PATHNAME_DELIMITER))
            .ok_or_else(|| invalid("must start and end with '/'"))?;

        let parts: Vec<&str> = inner.split(PATHNAME_DELIMITER).collect();
        if parts.len() != PATHNAME_PARTS {
            return Err(invalid(&format!(
                "expected {} parts, found {}",
                PATHNAME_PARTS,
                parts.len()
            )));
        }

        Ok(Self {
            a: parts[0].to_string(),
            b: parts[1].to_string(),
            c: parts[2].to_string(),
            d: parts[3].to_string(),
            e: parts[4].to_string(),
            f: parts[5].to_string(),
        })
    }

    /// Same pathname with the date block dropped
    pub fn without_date(&self) -> Self {
        Self {
            d: String::new(),
            ..self.clone()
        }
    }

    /// Case-insensitive identity of the series, independent of part D
    pub fn series_key(&self) -> String {
        self.without_date().to_string().to_uppercase()
    }
}

impl fmt::Display for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = PATHNAME_DELIMITER;
        write!(
            f,
            "{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

impl FromStr for RecordPath {
    type Err = DssError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_parts() {
        let path = RecordPath::parse("/CALSIM/S_SHSTA/STORAGE/01JAN1920/1MON/L2020A/").unwrap();
        assert_eq!(path.a, "CALSIM");
        assert_eq!(path.b, "S_SHSTA");
        assert_eq!(path.c, "STORAGE");
        assert_eq!(path.d, "01JAN1920");
        assert_eq!(path.e, "1MON");
        assert_eq!(path.f, "L2020A");
    }

    #[test]
    fn test_parse_keeps_empty_parts() {
        let path = RecordPath::parse("/CALSIM/C_KSWCK/FLOW-CHANNEL//1MON/L2020A/").unwrap();
        assert!(path.d.is_empty());
        assert_eq!(path.to_string(), "/CALSIM/C_KSWCK/FLOW-CHANNEL//1MON/L2020A/");
    }

    #[test]
    fn test_parse_rejects_wrong_part_count() {
        let result = RecordPath::parse("/CALSIM/S_SHSTA/STORAGE/1MON/L2020A/");
        assert!(matches!(result, Err(DssError::InvalidPathname { .. })));
    }

    #[test]
    fn test_parse_rejects_missing_delimiters() {
        assert!(RecordPath::parse("CALSIM/S_SHSTA/STORAGE//1MON/L2020A").is_err());
    }

    #[test]
    fn test_from_parts_leaves_date_empty() {
        let path = RecordPath::from_parts("CALSIM", "S_SHSTA", "STORAGE", "1MON", "L2020A");
        assert_eq!(path.to_string(), "/CALSIM/S_SHSTA/STORAGE//1MON/L2020A/");
    }

    #[test]
    fn test_series_key_ignores_date_and_case() {
        let blocked = RecordPath::parse("/calsim/S_SHSTA/STORAGE/01JAN1930/1MON/L2020A/").unwrap();
        let bare = RecordPath::parse("/CALSIM/S_SHSTA/STORAGE//1MON/L2020A/").unwrap();
        assert_eq!(blocked.series_key(), bare.series_key());
    }
}
