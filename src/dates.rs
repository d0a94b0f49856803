//! Date-window helpers shared by the collector modules.

use chrono::{Datelike, NaiveDate, Weekday};

/// Number of days in the given month, accounting for leap years
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return 0,
    };
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next_month {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        None => 0,
    }
}

/// Localized weekday label used in hotel records
pub fn weekday_name_es(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Lunes",
        Weekday::Tue => "Martes",
        Weekday::Wed => "Miercoles",
        Weekday::Thu => "Jueves",
        Weekday::Fri => "Viernes",
        Weekday::Sat => "Sabado",
        Weekday::Sun => "Domingo",
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_lengths_match_the_calendar() {
        assert_eq!(days_in_month(2025, 7), 31);
        assert_eq!(days_in_month(2025, 6), 30);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn invalid_month_yields_zero_days() {
        assert_eq!(days_in_month(2025, 13), 0);
        assert_eq!(days_in_month(2025, 0), 0);
    }

    #[test]
    fn weekday_names_line_up() {
        // 2025-07-07 is a Monday
        let monday = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        assert_eq!(weekday_name_es(monday), "Lunes");
        assert_eq!(weekday_name_es(monday.succ_opt().unwrap()), "Martes");
        // 2025-07-13 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2025, 7, 13).unwrap();
        assert_eq!(weekday_name_es(sunday), "Domingo");
    }
}
