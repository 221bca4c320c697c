//! Parsing of raw form input into typed values.
//!
//! All helpers fail with `ValidationError` and have no side effects.

use crate::model::validation::ValidationError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::time::Duration;

pub use crate::model::validation::require_text;

/// Parses a 24-hour `HH:MM` time of day.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Joins a picked date with a typed `HH:MM` time.
pub fn combine(date: NaiveDate, time: &str) -> Result<NaiveDateTime, ValidationError> {
    Ok(date.and_time(parse_time_of_day(time)?))
}

/// Countdown length from hour/minute/second fields. Must be non-zero.
pub fn timer_duration(hours: u64, minutes: u64, seconds: u64) -> Result<Duration, ValidationError> {
    let total = hours
        .checked_mul(3600)
        .zip(minutes.checked_mul(60))
        .and_then(|(h, m)| h.checked_add(m))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or(ValidationError::DurationTooLong)?;
    if total == 0 {
        return Err(ValidationError::ZeroDuration);
    }
    Ok(Duration::from_secs(total))
}

/// Rejects a new event scheduled before `now`.
pub fn require_not_past(when: NaiveDateTime, now: NaiveDateTime) -> Result<(), ValidationError> {
    if when < now {
        return Err(ValidationError::EventInPast);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{combine, parse_date, parse_time_of_day, require_not_past, timer_duration};
    use crate::model::validation::ValidationError;
    use chrono::{NaiveDate, Timelike};
    use std::time::Duration;

    #[test]
    fn time_of_day_accepts_hh_mm() {
        let time = parse_time_of_day("07:45").unwrap();
        assert_eq!((time.hour(), time.minute()), (7, 45));
    }

    #[test]
    fn time_of_day_rejects_other_shapes() {
        assert_eq!(
            parse_time_of_day("25:00"),
            Err(ValidationError::InvalidTime("25:00".to_string()))
        );
        assert!(parse_time_of_day("noon").is_err());
    }

    #[test]
    fn combine_joins_date_and_time() {
        let date = parse_date("2023-12-31").unwrap();
        let joined = combine(date, "23:59").unwrap();
        assert_eq!(
            joined,
            NaiveDate::from_ymd_opt(2023, 12, 31)
                .and_then(|d| d.and_hms_opt(23, 59, 0))
                .unwrap()
        );
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(matches!(
            parse_date("31/12/2023"),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn timer_duration_sums_fields_and_rejects_zero() {
        assert_eq!(timer_duration(1, 2, 3).unwrap(), Duration::from_secs(3723));
        assert_eq!(timer_duration(0, 0, 0), Err(ValidationError::ZeroDuration));
    }

    #[test]
    fn timer_duration_rejects_overflowing_fields() {
        assert_eq!(
            timer_duration(u64::MAX, 0, 0),
            Err(ValidationError::DurationTooLong)
        );
        assert_eq!(
            timer_duration(0, u64::MAX / 60, 60),
            Err(ValidationError::DurationTooLong)
        );
    }

    #[test]
    fn past_event_times_are_rejected() {
        let now = combine(parse_date("2024-05-10").unwrap(), "12:00").unwrap();
        let earlier = combine(parse_date("2024-05-10").unwrap(), "11:59").unwrap();
        let later = combine(parse_date("2024-05-11").unwrap(), "09:00").unwrap();

        assert_eq!(
            require_not_past(earlier, now),
            Err(ValidationError::EventInPast)
        );
        assert_eq!(require_not_past(now, now), Ok(()));
        assert_eq!(require_not_past(later, now), Ok(()));
    }
}
