// src/layout/period.rs

use chrono::Month;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::PipelineError;

static MONTH_NAME_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|[^a-z])(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)[-_ .]?((?:19|20)\d{2})(?:\D|$)",
    )
    .expect("month-name pattern is valid")
});

static YEAR_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\D)((?:19|20)\d{2})[-_.]?(0[1-9]|1[0-2])(?:\D|$)")
        .expect("year-month pattern is valid")
});

/// Reporting period of one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, PipelineError> {
        if !(1..=12).contains(&month) {
            return Err(PipelineError::InvalidPeriod { year, month });
        }
        Ok(Period { year, month })
    }

    /// Pull a period out of a file name such as `ATM_December_2023.xlsx`,
    /// `neft_dec2023.xls` or `atm_pos_card_2023-12.xlsx`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if let Some(caps) = MONTH_NAME_YEAR.captures(name) {
            let month = caps[1][..3].parse::<Month>().ok()?;
            let year = caps[2].parse::<i32>().ok()?;
            return Some(Period {
                year,
                month: month.number_from_month(),
            });
        }
        let caps = YEAR_MONTH.captures(name)?;
        Some(Period {
            year: caps[1].parse().ok()?,
            month: caps[2].parse().ok()?,
        })
    }

    /// `YYYY_MM`, the suffix of every output document name.
    pub fn key(&self) -> String {
        format!("{}_{:02}", self.year, self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Accepts `YYYY-MM` or `YYYY_MM`.
impl FromStr for Period {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || PipelineError::UnknownPeriod(s.to_string());
        let (y, m) = s.trim().split_once(['-', '_']).ok_or_else(unknown)?;
        let year = y.parse::<i32>().map_err(|_| unknown())?;
        let month = m.parse::<u32>().map_err(|_| unknown())?;
        Period::new(year, month)
    }
}
