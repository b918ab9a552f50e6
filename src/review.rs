//! Year-in-review aggregation.
//!
//! Every figure is derived from the snapshot handed in; nothing is cached. Keys that
//! do not decode, or decode to another year, are left out.

use crate::calendar::{MONTH_NAMES, days_in_month};
use crate::day_id::{DayId, date_of};
use crate::models::{DayRecord, Role};
use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::BTreeMap;

pub const MEMORY_PICK_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    None,
    One,
    Both,
}

impl Coverage {
    fn of(record: Option<&DayRecord>) -> Self {
        match record.map_or(0, DayRecord::photo_count) {
            0 => Coverage::None,
            1 => Coverage::One,
            _ => Coverage::Both,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapMonth {
    pub month0: u32,
    pub name: &'static str,
    /// Index `d - 1` holds day `d`.
    pub days: Vec<Coverage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestMonth {
    pub month0: u32,
    pub name: &'static str,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReelPick {
    pub role: Role,
    pub day_id: DayId,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub joint_count: u32,
    pub photo_count: u32,
    pub longest_joint_streak: u32,
    pub monthly_joint_counts: [u32; 12],
    /// `None` when the year has no joint day at all.
    pub best_month: Option<BestMonth>,
    pub monthly_heatmap: Vec<HeatmapMonth>,
    pub memory_picks: Vec<DayId>,
    pub reel: Vec<ReelPick>,
}

pub fn summarize_year<R: Rng + ?Sized>(
    year: i32,
    days: &BTreeMap<String, DayRecord>,
    rng: &mut R,
) -> YearSummary {
    let in_year = records_in_year(year, days);

    let mut joint_count = 0;
    let mut photo_count = 0;
    let mut monthly_joint_counts = [0u32; 12];
    for (date, record) in &in_year {
        photo_count += record.photo_count();
        if record.is_joint() {
            joint_count += 1;
            monthly_joint_counts[date.month0() as usize] += 1;
        }
    }

    YearSummary {
        year,
        joint_count,
        photo_count,
        longest_joint_streak: longest_joint_streak(year, &in_year),
        monthly_joint_counts,
        best_month: best_month(&monthly_joint_counts),
        monthly_heatmap: heatmap(year, &in_year),
        memory_picks: memory_picks(&in_year, MEMORY_PICK_COUNT, rng),
        reel: reel(&in_year, rng),
    }
}

fn records_in_year(year: i32, days: &BTreeMap<String, DayRecord>) -> BTreeMap<NaiveDate, &DayRecord> {
    days.iter()
        .filter_map(|(id, record)| date_of(id).map(|date| (date, record)))
        .filter(|(date, _)| date.year() == year)
        .collect()
}

/// Walks every calendar day of the year, not just the ones with records.
pub fn longest_joint_streak(year: i32, in_year: &BTreeMap<NaiveDate, &DayRecord>) -> u32 {
    let (Some(first), Some(last)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return 0;
    };

    let mut best = 0;
    let mut run = 0;
    for date in first.iter_days().take_while(|date| *date <= last) {
        if in_year.get(&date).is_some_and(|record| record.is_joint()) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

/// First maximum wins; an all-zero year has no best month.
pub fn best_month(monthly_joint_counts: &[u32; 12]) -> Option<BestMonth> {
    let mut best = 0;
    for (month0, count) in monthly_joint_counts.iter().enumerate().skip(1) {
        if *count > monthly_joint_counts[best] {
            best = month0;
        }
    }

    let count = monthly_joint_counts[best];
    (count > 0).then(|| BestMonth {
        month0: best as u32,
        name: MONTH_NAMES[best],
        count,
    })
}

fn heatmap(year: i32, in_year: &BTreeMap<NaiveDate, &DayRecord>) -> Vec<HeatmapMonth> {
    (0..12u32)
        .map(|month0| HeatmapMonth {
            month0,
            name: MONTH_NAMES[month0 as usize],
            days: (1..=days_in_month(year, month0))
                .map(|day| {
                    let record = NaiveDate::from_ymd_opt(year, month0 + 1, day)
                        .and_then(|date| in_year.get(&date).copied());
                    Coverage::of(record)
                })
                .collect(),
        })
        .collect()
}

/// Uniform sample without replacement from the joint days.
pub fn memory_picks<R: Rng + ?Sized>(
    in_year: &BTreeMap<NaiveDate, &DayRecord>,
    count: usize,
    rng: &mut R,
) -> Vec<DayId> {
    let mut joint: Vec<NaiveDate> = in_year
        .iter()
        .filter(|(_, record)| record.is_joint())
        .map(|(date, _)| *date)
        .collect();

    let (picked, _) = joint.partial_shuffle(rng, count);
    picked.iter().map(|date| DayId::from_date(*date)).collect()
}

/// One random photo per partner from any day of the year.
fn reel<R: Rng + ?Sized>(in_year: &BTreeMap<NaiveDate, &DayRecord>, rng: &mut R) -> Vec<ReelPick> {
    Role::ALL
        .iter()
        .filter_map(|role| {
            let candidates: Vec<(&NaiveDate, &&DayRecord)> = in_year
                .iter()
                .filter(|(_, record)| record.has_photo(*role))
                .collect();
            candidates.choose(rng).map(|(date, record)| ReelPick {
                role: *role,
                day_id: DayId::from_date(**date),
                url: record.photo_url(*role).to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn record(husband: bool, wife: bool) -> DayRecord {
        DayRecord {
            husband_url: if husband { "https://img/h.jpg".into() } else { String::new() },
            wife_url: if wife { "https://img/w.jpg".into() } else { String::new() },
            ..DayRecord::default()
        }
    }

    fn summarize(year: i32, days: &BTreeMap<String, DayRecord>) -> YearSummary {
        summarize_year(year, days, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn empty_year_has_no_data() {
        let summary = summarize(2024, &BTreeMap::new());
        assert_eq!(summary.joint_count, 0);
        assert_eq!(summary.photo_count, 0);
        assert_eq!(summary.longest_joint_streak, 0);
        assert_eq!(summary.best_month, None);
        assert!(summary.memory_picks.is_empty());
        assert!(summary.reel.is_empty());
        assert_eq!(summary.monthly_heatmap.len(), 12);
        assert_eq!(summary.monthly_heatmap[1].days.len(), 29);
        assert!(summary.monthly_heatmap[0].days.iter().all(|c| *c == Coverage::None));
    }

    #[test]
    fn unpaired_photos_count_individually() {
        let mut days = BTreeMap::new();
        days.insert("2024-03-05".to_string(), record(true, false));
        days.insert("2024-03-06".to_string(), record(true, true));
        days.insert("2024-03-07".to_string(), record(false, true));

        let summary = summarize(2024, &days);
        assert_eq!(summary.joint_count, 1);
        assert_eq!(summary.photo_count, 3);
        assert_eq!(summary.monthly_joint_counts[2], 1);
        assert_eq!(
            summary.best_month,
            Some(BestMonth {
                month0: 2,
                name: "March",
                count: 1
            })
        );

        let march = &summary.monthly_heatmap[2].days;
        assert_eq!(march[3], Coverage::None);
        assert_eq!(march[4], Coverage::One);
        assert_eq!(march[5], Coverage::Both);
        assert_eq!(march[6], Coverage::One);
        assert_eq!(summary.memory_picks, vec![DayId::parse("2024-03-06").unwrap()]);
    }

    #[test]
    fn longest_streak_resets_at_gap() {
        let mut days = BTreeMap::new();
        for day in 1..=31 {
            days.insert(format!("2024-01-{day:02}"), record(true, true));
        }
        days.insert("2024-02-01".to_string(), record(true, false));
        for day in 2..=20 {
            days.insert(format!("2024-02-{day:02}"), record(true, true));
        }

        let summary = summarize(2024, &days);
        assert_eq!(summary.longest_joint_streak, 31);
        assert_eq!(summary.joint_count, 50);
        assert_eq!(summary.best_month.unwrap().month0, 0);
    }

    #[test]
    fn other_years_and_bad_keys_are_ignored() {
        let mut days = BTreeMap::new();
        days.insert("2023-12-31".to_string(), record(true, true));
        days.insert("2024-01-01".to_string(), record(true, true));
        days.insert("oops".to_string(), record(true, true));
        days.insert("2024-02-31".to_string(), record(true, true));

        let summary = summarize(2024, &days);
        assert_eq!(summary.joint_count, 1);
        assert_eq!(summary.photo_count, 2);
        assert_eq!(summary.longest_joint_streak, 1);
    }

    #[test]
    fn alias_keys_agree_with_streaks() {
        let mut days = BTreeMap::new();
        days.insert("2024-03-05".to_string(), record(true, true));
        days.insert("2024-3-5".to_string(), record(false, false));
        days.insert("2024-+3-06".to_string(), record(true, true));

        let summary = summarize(2024, &days);
        assert_eq!(summary.joint_count, 1);
        assert_eq!(summary.photo_count, 2);
        assert_eq!(summary.longest_joint_streak, 1);
        assert_eq!(summary.longest_joint_streak, crate::streak::best_streak(&days));
        assert_eq!(summary.monthly_heatmap[2].days[4], Coverage::Both);
        assert_eq!(summary.monthly_heatmap[2].days[5], Coverage::None);
    }

    #[test]
    fn best_month_ties_go_to_earliest() {
        let mut counts = [0u32; 12];
        counts[4] = 3;
        counts[9] = 3;
        assert_eq!(best_month(&counts).unwrap().month0, 4);
        assert_eq!(best_month(&[0; 12]), None);
    }

    #[test]
    fn memory_picks_are_distinct_joint_days() {
        let mut days = BTreeMap::new();
        for day in 1..=30 {
            days.insert(format!("2025-06-{day:02}"), record(true, day % 3 != 0));
        }

        let summary = summarize(2025, &days);
        assert_eq!(summary.memory_picks.len(), MEMORY_PICK_COUNT);
        let unique: HashSet<_> = summary.memory_picks.iter().collect();
        assert_eq!(unique.len(), MEMORY_PICK_COUNT);
        for pick in &summary.memory_picks {
            assert!(days[pick.as_str()].is_joint());
        }

        let again = summarize(2025, &days);
        assert_eq!(again.memory_picks, summary.memory_picks);
    }

    #[test]
    fn reel_has_one_pick_per_role_with_photos() {
        let mut days = BTreeMap::new();
        days.insert("2024-08-01".to_string(), record(false, true));
        days.insert("2024-08-02".to_string(), record(false, true));

        let summary = summarize(2024, &days);
        assert_eq!(summary.reel.len(), 1);
        assert_eq!(summary.reel[0].role, Role::Wife);
        assert_eq!(summary.reel[0].url, "https://img/w.jpg");
    }
}
