use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Tournaments are expected to start roughly half a month after a set releases.
const TOURNAMENT_START_OFFSET_DAYS: u64 = 15;

/// A card-set era. Declaration order is release order, so the derived `Ord`
/// gives a well-defined "ascending meta-format" comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MetaFormat {
    OP01,
    OP02,
    OP03,
    OP04,
    OP05,
    OP06,
}

#[derive(Debug, Error)]
#[error("Unknown meta format: {0}")]
pub struct UnknownMetaFormat(pub String);

impl MetaFormat {
    pub fn all() -> &'static [MetaFormat] {
        &[
            MetaFormat::OP01,
            MetaFormat::OP02,
            MetaFormat::OP03,
            MetaFormat::OP04,
            MetaFormat::OP05,
            MetaFormat::OP06,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetaFormat::OP01 => "OP01",
            MetaFormat::OP02 => "OP02",
            MetaFormat::OP03 => "OP03",
            MetaFormat::OP04 => "OP04",
            MetaFormat::OP05 => "OP05",
            MetaFormat::OP06 => "OP06",
        }
    }

    pub fn release_date(&self) -> NaiveDate {
        let (year, month, day) = match self {
            MetaFormat::OP01 => (2022, 12, 2),
            MetaFormat::OP02 => (2023, 3, 10),
            MetaFormat::OP03 => (2023, 6, 30),
            MetaFormat::OP04 => (2023, 9, 22),
            MetaFormat::OP05 => (2023, 12, 8),
            MetaFormat::OP06 => (2024, 3, 8),
        };
        NaiveDate::from_ymd_opt(year, month, day).expect("valid release date")
    }

    /// Approximate start of tournament play for this meta.
    pub fn approximate_tournament_start(&self) -> NaiveDateTime {
        self.release_date()
            .checked_add_days(Days::new(TOURNAMENT_START_OFFSET_DAYS))
            .expect("valid tournament start date")
            .and_hms_opt(0, 0, 0)
            .expect("valid midnight timestamp")
    }
}

impl fmt::Display for MetaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetaFormat {
    type Err = UnknownMetaFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetaFormat::all()
            .iter()
            .find(|meta| meta.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownMetaFormat(s.to_string()))
    }
}
