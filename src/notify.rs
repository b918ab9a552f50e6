//! Decides who, if anyone, hears about a fresh check-in. Delivery lives elsewhere.

use crate::day_id::DayId;
use crate::models::{DayRecord, Role};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub recipient: Role,
    pub day_id: DayId,
    pub title: String,
    pub body: String,
}

/// Only today's writes notify, and only the partner who has not checked in yet.
pub fn check_in_notice(
    day_id: &DayId,
    today: NaiveDate,
    before: Option<&DayRecord>,
    after: &DayRecord,
) -> Option<Notice> {
    if *day_id != DayId::from_date(today) {
        return None;
    }

    let just_checked_in = |role: Role| {
        let now = after.photo_url(role).trim();
        let then = before.map_or("", |record| record.photo_url(role).trim());
        !now.is_empty() && now != then
    };

    let husband = just_checked_in(Role::Husband);
    let wife = just_checked_in(Role::Wife);

    let sender = match (husband, wife) {
        (true, false) => Role::Husband,
        (false, true) => Role::Wife,
        _ => return None,
    };
    let recipient = sender.partner();
    if after.has_photo(recipient) {
        return None;
    }

    let who = sender.label().to_lowercase();
    Some(Notice {
        recipient,
        day_id: day_id.clone(),
        title: format!("💗 {} checked in", sender.label()),
        body: format!("Your {who} just checked in for today. Tap to see the photo."),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
    }

    fn with_urls(husband: &str, wife: &str) -> DayRecord {
        DayRecord {
            husband_url: husband.into(),
            wife_url: wife.into(),
            ..DayRecord::default()
        }
    }

    #[test]
    fn husband_first_notifies_wife() {
        let id = DayId::from_date(today());
        let notice = check_in_notice(&id, today(), None, &with_urls("h1", "")).unwrap();
        assert_eq!(notice.recipient, Role::Wife);
        assert_eq!(notice.title, "💗 Husband checked in");
        assert!(notice.body.starts_with("Your husband just checked in"));
    }

    #[test]
    fn second_partner_does_not_notify() {
        let id = DayId::from_date(today());
        let before = with_urls("h1", "");
        assert_eq!(check_in_notice(&id, today(), Some(&before), &with_urls("h1", "w1")), None);
    }

    #[test]
    fn both_in_one_write_or_no_photo_change_is_silent() {
        let id = DayId::from_date(today());
        assert_eq!(check_in_notice(&id, today(), None, &with_urls("h1", "w1")), None);

        let before = with_urls("", "w1");
        assert_eq!(check_in_notice(&id, today(), Some(&before), &with_urls("", "w1")), None);
    }

    #[test]
    fn replaced_photo_notifies_again() {
        let id = DayId::from_date(today());
        let before = with_urls("", "w1");
        let notice = check_in_notice(&id, today(), Some(&before), &with_urls("", "w2")).unwrap();
        assert_eq!(notice.recipient, Role::Husband);
    }

    #[test]
    fn other_days_are_silent() {
        let yesterday = DayId::from_date(today().pred_opt().unwrap());
        assert_eq!(check_in_notice(&yesterday, today(), None, &with_urls("h1", "")), None);
    }
}
