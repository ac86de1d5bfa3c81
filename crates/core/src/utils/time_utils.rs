use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::errors::{Error, Result};

/// Parses an IANA timezone name such as `Asia/Taipei`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| Error::InvalidConfigValue(format!("Unknown timezone '{}'", name)))
}

/// Converts a UTC instant to a calendar date in the given timezone.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Every calendar day from `start` to `end`, both inclusive. Empty when `start > end`.
pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    start.iter_days().take_while(|day| *day <= end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_days_between_is_inclusive_and_gapless() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let days = get_days_between(start, end);

        assert_eq!(days.len(), 5); // leap year: 27, 28, 29, 1, 2
        assert_eq!(days.first(), Some(&start));
        assert_eq!(days.last(), Some(&end));
        assert!(get_days_between(end, start).is_empty());
    }

    #[test]
    fn test_valuation_date_crosses_midnight_by_timezone() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        let taipei = parse_timezone("Asia/Taipei").unwrap();

        assert_eq!(
            valuation_date_from_utc(instant, taipei),
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
        );
        assert_eq!(
            valuation_date_from_utc(instant, chrono_tz::America::New_York),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_unknown_timezone_is_config_error() {
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(Error::InvalidConfigValue(_))
        ));
    }
}
