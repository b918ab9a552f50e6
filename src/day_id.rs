//! Canonical `YYYY-MM-DD` keys for calendar days.
//!
//! Keys are plain local calendar fields with no timezone attached. Zero-padding
//! makes lexicographic order match chronological order, which the store relies on
//! for range reads.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const MIN_YEAR: i32 = 2020;
pub const MAX_YEAR: i32 = 2040;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DayIdError {
    #[error("malformed day id '{0}', expected YYYY-MM-DD")]
    Malformed(String),
    #[error("year {0} is outside the supported range {MIN_YEAR}..={MAX_YEAR}")]
    YearOutOfRange(i32),
    #[error("month index {0} is outside 0..=11")]
    MonthOutOfRange(u32),
    #[error("'{0}' is not a calendar date")]
    NotADate(String),
}

/// Decoded calendar fields. `month0` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayParts {
    pub year: i32,
    pub month0: u32,
    pub day: u32,
}

pub fn encode(year: i32, month0: u32, day: u32) -> String {
    format!("{year}-{:02}-{:02}", month0 + 1, day)
}

pub fn decode(id: &str) -> Result<DayParts, DayIdError> {
    let malformed = || DayIdError::Malformed(id.to_string());

    let mut parts = id.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };
    // `str::parse` would also take a leading sign.
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !(digits(year) && digits(month) && digits(day)) {
        return Err(malformed());
    }

    let year: i32 = year.parse().map_err(|_| malformed())?;
    let month: u32 = month.parse().map_err(|_| malformed())?;
    let day: u32 = day.parse().map_err(|_| malformed())?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DayIdError::YearOutOfRange(year));
    }
    if !(1..=12).contains(&month) {
        return Err(DayIdError::MonthOutOfRange(month.saturating_sub(1)));
    }
    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return Err(DayIdError::NotADate(id.to_string()));
    }

    Ok(DayParts {
        year,
        month0: month - 1,
        day,
    })
}

pub fn check_year(year: i32) -> Result<(), DayIdError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(DayIdError::YearOutOfRange(year))
    }
}

/// A validated, canonical day key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayId(String);

impl DayId {
    pub fn new(year: i32, month0: u32, day: u32) -> Result<Self, DayIdError> {
        if month0 > 11 {
            return Err(DayIdError::MonthOutOfRange(month0));
        }
        Self::parse(&encode(year, month0, day))
    }

    /// Parses and canonicalizes, so `2024-3-5` becomes `2024-03-05`.
    pub fn parse(raw: &str) -> Result<Self, DayIdError> {
        let parts = decode(raw)?;
        Ok(Self(encode(parts.year, parts.month0, parts.day)))
    }

    /// Keys any date without the year-range check, so grids at the edges of the
    /// range can hold ids (`2041-01-06`) that [`DayId::parse`] refuses.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(encode(date.year(), date.month0(), date.day()))
    }

    pub fn parts(&self) -> DayParts {
        // Only constructed through `parse` or `from_date`, both of which emit
        // three numeric fields.
        let mut fields = self.0.split('-').map(|field| field.parse::<u32>().unwrap_or(0));
        let year = fields.next().unwrap_or(0) as i32;
        let month = fields.next().unwrap_or(1);
        let day = fields.next().unwrap_or(1);
        DayParts {
            year,
            month0: month.saturating_sub(1),
            day,
        }
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        let parts = self.parts();
        NaiveDate::from_ymd_opt(parts.year, parts.month0 + 1, parts.day)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Key-to-date conversion used by scans. Only canonical keys count; aliases such
/// as `2024-3-5` are treated as malformed so every scan sees the same days.
pub fn date_of(raw: &str) -> Option<NaiveDate> {
    let id = DayId::parse(raw).ok()?;
    if id.as_str() != raw {
        return None;
    }
    id.to_date()
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DayId {
    type Err = DayIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DayId {
    type Error = DayIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DayId> for String {
    fn from(value: DayId) -> Self {
        value.0
    }
}
