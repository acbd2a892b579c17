use chrono::{DateTime, Month, Months, NaiveDate, Utc};

use crate::error::SchoolError;

/// Number of calendar days in `month` (1-12) of `year`, Gregorian rules.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Parse a full English month name, ignoring case, into 1-12.
pub fn parse_month_name(name: &str) -> Result<u32, SchoolError> {
    let needle = name.trim();
    (1u8..=12)
        .filter_map(|n| Month::try_from(n).ok())
        .find(|m| m.name().eq_ignore_ascii_case(needle))
        .map(|m| m.number_from_month())
        .ok_or_else(|| {
            SchoolError::validation(format!(
                "Unknown month \"{name}\"; use a full English month name."
            ))
        })
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; only the date is kept.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, SchoolError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| {
            SchoolError::validation(format!(
                "Field `{field}` must be a date (YYYY-MM-DD), got \"{raw}\"."
            ))
        })
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn february_follows_the_gregorian_leap_rule() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2025, 1), Some(31));
        assert_eq!(days_in_month(2025, 4), Some(30));
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2025, 13), None);
        assert_eq!(days_in_month(2025, 0), None);
    }

    #[test]
    fn month_names_are_full_and_case_insensitive() {
        assert_eq!(parse_month_name("january").unwrap(), 1);
        assert_eq!(parse_month_name("SEPTEMBER").unwrap(), 9);
        assert_eq!(parse_month_name("December").unwrap(), 12);
        assert!(parse_month_name("Sept").is_err());
        assert!(parse_month_name("13").is_err());
    }

    #[test]
    fn dates_accept_plain_and_rfc3339() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(parse_date("exam_date", "2025-03-14").unwrap(), d);
        assert_eq!(
            parse_date("exam_date", "2025-03-14T09:30:00Z").unwrap(),
            d
        );
        assert!(parse_date("exam_date", "14/03/2025").is_err());
    }
}
