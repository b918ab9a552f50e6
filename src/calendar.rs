//! Monday-first month grid, six full weeks regardless of month length.

use crate::day_id::{DayId, DayIdError, check_year};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

pub const GRID_CELLS: usize = 42;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Leading and trailing cells of the first and last supported months fall
/// outside the year range; their ids come from [`DayId::from_date`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub day_id: DayId,
    pub day: u32,
    pub in_month: bool,
}

pub fn month_grid(year: i32, month0: u32) -> Result<Vec<GridCell>, DayIdError> {
    let start = grid_start(year, month0)?;

    Ok((0..GRID_CELLS as i64)
        .map(|offset| {
            let date = start + Duration::days(offset);
            GridCell {
                day_id: DayId::from_date(date),
                day: date.day(),
                in_month: date.year() == year && date.month0() == month0,
            }
        })
        .collect())
}

/// First and last day shown by [`month_grid`], for range reads.
pub fn grid_bounds(year: i32, month0: u32) -> Result<(DayId, DayId), DayIdError> {
    let start = grid_start(year, month0)?;
    let end = start + Duration::days(GRID_CELLS as i64 - 1);
    Ok((DayId::from_date(start), DayId::from_date(end)))
}

pub fn days_in_month(year: i32, month0: u32) -> u32 {
    let (next_year, next_month) = if month0 >= 11 {
        (year + 1, 1)
    } else {
        (year, month0 + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

fn grid_start(year: i32, month0: u32) -> Result<NaiveDate, DayIdError> {
    check_year(year)?;
    if month0 > 11 {
        return Err(DayIdError::MonthOutOfRange(month0));
    }
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .ok_or(DayIdError::MonthOutOfRange(month0))?;
    Ok(first - Duration::days(first.weekday().num_days_from_monday() as i64))
}
