use crate::day_id::{DayId, date_of};
use crate::models::DayRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakResult {
    pub current: u32,
    pub best: u32,
}

pub fn compute_streaks(today: NaiveDate, days: &BTreeMap<String, DayRecord>) -> StreakResult {
    StreakResult {
        current: current_streak(today, days),
        best: best_streak(days),
    }
}

/// Consecutive joint days ending at `today`, inclusive.
pub fn current_streak(today: NaiveDate, days: &BTreeMap<String, DayRecord>) -> u32 {
    let mut count = 0;
    let mut cursor = Some(today);

    while let Some(date) = cursor {
        let joint = days
            .get(DayId::from_date(date).as_str())
            .is_some_and(DayRecord::is_joint);
        if !joint {
            break;
        }
        count += 1;
        cursor = date.pred_opt();
    }

    count
}

/// Longest run of consecutive joint days anywhere in `days`.
pub fn best_streak(days: &BTreeMap<String, DayRecord>) -> u32 {
    let mut joint_dates: Vec<NaiveDate> = days
        .iter()
        .filter(|(_, record)| record.is_joint())
        .filter_map(|(id, _)| date_of(id))
        .collect();
    joint_dates.sort_unstable();

    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in joint_dates {
        run = match previous {
            Some(prev) if (date - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(date);
    }

    best
}
