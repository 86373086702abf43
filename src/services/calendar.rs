use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::catalog::MEETING_DURATION_MINUTES;

/// A date picked on the calendar. Ranges report their first day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CalendarSelection {
    Single(NaiveDate),
    Range([NaiveDate; 2]),
}

impl CalendarSelection {
    pub fn first(&self) -> NaiveDate {
        match self {
            CalendarSelection::Single(d) => *d,
            CalendarSelection::Range([start, _]) => *start,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub month_label: String,
    /// Sunday-first rows; days outside the month are `None`.
    pub weeks: Vec<[Option<NaiveDate>; 7]>,
    pub timezone: String,
}

pub fn month_grid(year: i32, month: u32, tz: Tz, now: DateTime<Utc>) -> Option<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let days = (next_month - first).num_days() as usize;
    let lead = first.weekday().num_days_from_sunday() as usize;

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    for cell in 0..lead + days {
        if cell >= lead {
            week[cell % 7] = Some(first + Duration::days((cell - lead) as i64));
        }
        if cell % 7 == 6 {
            weeks.push(week);
            week = [None; 7];
        }
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }

    Some(MonthGrid {
        year,
        month,
        month_label: first.format("%B %Y").to_string(),
        weeks,
        timezone: timezone_label(tz, now),
    })
}

/// `Asia/Dhaka (1:34 pm)`
pub fn timezone_label(tz: Tz, now: DateTime<Utc>) -> String {
    let local = now.with_timezone(&tz);
    format!("{} ({})", tz.name(), clock_label(local.time()))
}

/// Calendar fields of the picked day, never shifted through UTC.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `2024-06-01` -> `Saturday, June 1, 2024`. Unparseable input is returned as-is.
pub fn long_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Parses `h:mm am|pm`.
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    let (clock, period) = s.trim().split_once(' ')?;
    let (hours, minutes) = clock.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if !(1..=12).contains(&hours) {
        return None;
    }
    let offset = match period.trim().to_ascii_lowercase().as_str() {
        "am" => 0,
        "pm" => 12,
        _ => return None,
    };
    NaiveTime::from_hms_opt(hours % 12 + offset, minutes, 0)
}

pub fn clock_label(time: NaiveTime) -> String {
    let (pm, hour) = time.hour12();
    format!("{hour}:{:02} {}", time.minute(), if pm { "pm" } else { "am" })
}

/// End of a meeting starting at `start`. Wraps through noon and midnight.
pub fn end_time(start: &str) -> Option<String> {
    let start = parse_clock(start)?;
    Some(clock_label(start + Duration::minutes(MEETING_DURATION_MINUTES)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_end_time_half_hour() {
        assert_eq!(end_time("5:30 pm").as_deref(), Some("6:00 pm"));
        assert_eq!(end_time("3:00 pm").as_deref(), Some("3:30 pm"));
    }

    #[test]
    fn test_end_time_carries_minutes() {
        assert_eq!(end_time("5:45 pm").as_deref(), Some("6:15 pm"));
    }

    #[test]
    fn test_end_time_crosses_noon_and_midnight() {
        assert_eq!(end_time("11:30 am").as_deref(), Some("12:00 pm"));
        assert_eq!(end_time("11:30 pm").as_deref(), Some("12:00 am"));
        assert_eq!(end_time("12:45 pm").as_deref(), Some("1:15 pm"));
    }

    #[test]
    fn test_end_time_rejects_garbage() {
        assert_eq!(end_time("25:00 pm"), None);
        assert_eq!(end_time("5:30"), None);
        assert_eq!(end_time("5:30 xm"), None);
    }

    #[test]
    fn test_long_date() {
        assert_eq!(long_date("2024-06-01"), "Saturday, June 1, 2024");
        assert_eq!(long_date("not a date"), "not a date");
    }

    #[test]
    fn test_selection_range_reports_first_day() {
        let sel: CalendarSelection = serde_json::from_str(r#"["2024-06-03","2024-06-07"]"#).unwrap();
        assert_eq!(format_date(sel.first()), "2024-06-03");
        let sel: CalendarSelection = serde_json::from_str(r#""2024-06-01""#).unwrap();
        assert_eq!(format_date(sel.first()), "2024-06-01");
    }

    #[test]
    fn test_timezone_label() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 7, 34, 0).unwrap();
        assert_eq!(timezone_label(chrono_tz::Asia::Dhaka, now), "Asia/Dhaka (1:34 pm)");
    }

    #[test]
    fn test_month_grid_june_2024() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let grid = month_grid(2024, 6, chrono_tz::Asia::Dhaka, now).unwrap();
        assert_eq!(grid.month_label, "June 2024");
        // June 1st 2024 is a Saturday, June 30th a Sunday
        assert_eq!(grid.weeks.len(), 6);
        assert_eq!(grid.weeks[0][6], NaiveDate::from_ymd_opt(2024, 6, 1));
        assert!(grid.weeks[0][..6].iter().all(Option::is_none));
        assert_eq!(grid.weeks[5][0], NaiveDate::from_ymd_opt(2024, 6, 30));
        let days = grid.weeks.iter().flatten().filter(|d| d.is_some()).count();
        assert_eq!(days, 30);
    }

    #[test]
    fn test_month_grid_rejects_bad_month() {
        let now = Utc::now();
        assert!(month_grid(2024, 13, chrono_tz::UTC, now).is_none());
    }
}
