use crate::models::{ServerDate, Settings};
use chrono::{Datelike, Local, Month, NaiveDate};

/// A viewed month: the year plus one of the twelve calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub year: i32,
    pub month: Month,
}

impl Period {
    pub fn parse(year: &str, month_name: &str) -> Option<Self> {
        let year = year.trim().parse::<i32>().ok()?;
        let month = parse_month(month_name)?;
        Some(Self { year, month })
    }

    pub fn from_settings(settings: &Settings) -> Option<Self> {
        Self::parse(&settings.year, &settings.month)
    }

    pub fn from_server_date(date: &ServerDate) -> Option<Self> {
        Some(Self {
            year: date.year,
            month: parse_month(&date.month)?,
        })
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: month_from_number(today.month()).unwrap_or(Month::January),
        }
    }

    pub fn month_number(&self) -> u32 {
        self.month.number_from_month()
    }

    pub fn month_name(&self) -> &'static str {
        self.month.name()
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month_number()).unwrap_or(31)
    }
}

/// Accepts the English month names, ignoring case and surrounding whitespace.
pub fn parse_month(name: &str) -> Option<Month> {
    name.trim().parse::<Month>().ok()
}

pub fn month_from_number(number: u32) -> Option<Month> {
    u8::try_from(number).ok().and_then(|n| Month::try_from(n).ok())
}

/// Last day of the month: the day before the first of the following month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
}

/// Days left in the viewed month counting `today` itself.
pub fn days_left(days_in_month: u32, today: u32) -> i64 {
    i64::from(days_in_month) - i64::from(today) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_in_month_follows_calendar() {
        let expected = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (index, days) in expected.iter().enumerate() {
            assert_eq!(days_in_month(2023, index as u32 + 1), Some(*days));
        }
    }

    #[test]
    fn february_respects_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(1900, 2), Some(28));
    }

    #[test]
    fn rejects_out_of_range_months() {
        assert_eq!(days_in_month(2024, 0), None);
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn parses_every_stored_month_name() {
        let names = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        for (index, name) in names.iter().enumerate() {
            let period = Period::parse("2025", name).expect(name);
            assert_eq!(period.month_number(), index as u32 + 1);
            assert_eq!(period.month_name(), *name);
        }
        assert_eq!(parse_month(" march "), Some(Month::March));
        assert_eq!(parse_month("Smarch"), None);
    }

    #[test]
    fn period_days_uses_year_and_month() {
        let period = Period::parse("2024", "February").unwrap();
        assert_eq!(period.days(), 29);
        assert!(Period::parse("twenty", "February").is_none());
    }

    #[test]
    fn days_left_counts_today() {
        assert_eq!(days_left(31, 1), 31);
        assert_eq!(days_left(30, 30), 1);
    }
}
