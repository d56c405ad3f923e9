//! Time until the next scheduled deal refresh.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

/// Local hours at which the deal list is refreshed.
pub const REFRESH_HOURS: [u32; 4] = [9, 13, 18, 21];

/// First refresh slot strictly after the current hour, else 09:00 tomorrow.
pub fn next_refresh(now: NaiveDateTime) -> NaiveDateTime {
    let hour = now.hour();
    let date = now.date();
    match REFRESH_HOURS.iter().find(|&&h| h > hour) {
        Some(&h) => date.and_time(slot(h)),
        None => (date + Duration::days(1)).and_time(slot(REFRESH_HOURS[0])),
    }
}

fn slot(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub fn time_until_refresh(now: NaiveDateTime) -> Duration {
    next_refresh(now) - now
}

/// `HH:MM:SS`, hours not wrapped at 24.
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_next_slot_same_day() {
        assert_eq!(next_refresh(at(8, 30, 0)), at(9, 0, 0));
        assert_eq!(next_refresh(at(9, 0, 0)), at(13, 0, 0));
        assert_eq!(next_refresh(at(17, 59, 59)), at(18, 0, 0));
    }

    #[test]
    fn test_rolls_over_to_tomorrow() {
        let next = next_refresh(at(21, 15, 0));
        assert_eq!(next, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap().and_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(time_until_refresh(at(12, 58, 30))), "00:01:30");
        assert_eq!(format_countdown(time_until_refresh(at(21, 0, 0))), "12:00:00");
    }
}
