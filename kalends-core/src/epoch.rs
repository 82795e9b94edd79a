//! Epoch arithmetic
//!
//! Every conversion in Kalends pivots on the *epoch day*: the signed number of
//! days since 1970-01-01 in the proleptic Gregorian calendar. This module holds
//! the exact integer algorithms between epoch days and civil dates, and the
//! codec between epoch minutes and (date, hour, minute).

use crate::date::{IsoDate, YEAR_MAX, YEAR_MIN};
use crate::error::CalendarError;

pub const MINUTES_PER_HOUR: i64 = 60;
pub const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Days from 0000-03-01 to 1970-01-01
const UNIX_EPOCH_DAYS: i64 = 719_468;

/// Days in one 400-year Gregorian cycle
pub const DAYS_PER_400_YEARS: i64 = 146_097;

/// Days in each month (non-leap year)
const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

// ============================================================================
// Gregorian rules
// ============================================================================

/// Check if year is a leap year
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Get days in a month, 0 for a month outside 1-12
pub const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        1..=12 => DAYS_IN_MONTH[(month - 1) as usize],
        _ => 0,
    }
}

pub const fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Convert a civil date to days since 1970-01-01
///
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
/// The caller guarantees `month` is 1-12; `day` may run past the month end,
/// which simply counts forward.
pub const fn days_from_civil(year: i32, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let era = y.div_euclid(400);
    let yoe = y - era * 400; // [0, 399]
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * DAYS_PER_400_YEARS + doe - UNIX_EPOCH_DAYS
}

/// Convert days since 1970-01-01 to a civil (year, month, day)
///
/// The year is returned as `i64` so callers can range-check it.
pub const fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + UNIX_EPOCH_DAYS;
    let era = z.div_euclid(DAYS_PER_400_YEARS);
    let doe = z - era * DAYS_PER_400_YEARS; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // [0, 399]
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
    let year = if m <= 2 { y + 1 } else { y };
    (year, m as u8, d as u8)
}

/// First and last epoch day representable as an `IsoDate`
pub const MIN_EPOCH_DAY: i64 = days_from_civil(YEAR_MIN, 1, 1);
pub const MAX_EPOCH_DAY: i64 = days_from_civil(YEAR_MAX, 12, 31);

// ============================================================================
// EpochMinuteCodec
// ============================================================================

/// Codec between minutes since the local Unix epoch and calendar fields
///
/// Minute counts are local: there is no time zone, 1970-01-01T00:00 is zero.
pub struct EpochMinuteCodec;

impl EpochMinuteCodec {
    /// Encode a date and wall-clock hour/minute as minutes since the epoch
    pub fn encode(date: IsoDate, hour: u8, minute: u8) -> Result<i64, CalendarError> {
        if hour > 23 {
            return Err(CalendarError::invalid_field("hour", hour, "must be 0-23"));
        }
        if minute > 59 {
            return Err(CalendarError::invalid_field("minute", minute, "must be 0-59"));
        }
        let minutes = date
            .to_epoch_days()
            .checked_mul(MINUTES_PER_DAY)
            .and_then(|m| m.checked_add(hour as i64 * MINUTES_PER_HOUR + minute as i64))
            .ok_or_else(|| CalendarError::range(format!("{} does not fit in 64-bit minutes", date)))?;
        Ok(minutes)
    }

    /// Decode a 32-bit minute count
    pub fn decode(minutes: i32) -> Result<(IsoDate, u8, u8), CalendarError> {
        Self::decode_i64(minutes as i64)
    }

    /// Decode a 64-bit minute count, failing if the year leaves the supported range
    pub fn decode_i64(minutes: i64) -> Result<(IsoDate, u8, u8), CalendarError> {
        // Floor division so that -1 is 23:59 on the previous day
        let days = minutes.div_euclid(MINUTES_PER_DAY);
        let minute_of_day = minutes.rem_euclid(MINUTES_PER_DAY);
        let date = IsoDate::from_epoch_days(days)?;
        let hour = (minute_of_day / MINUTES_PER_HOUR) as u8;
        let minute = (minute_of_day % MINUTES_PER_HOUR) as u8;
        Ok((date, hour, minute))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u8, d: u8) -> IsoDate {
        IsoDate::try_new(y, m, d).unwrap()
    }

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(is_leap_year(0));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(-100));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2023, 13), 0);
        assert_eq!(days_in_month(2023, 0), 0);
    }

    #[test]
    fn test_days_from_civil() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(1969, 12, 31), -1);
        assert_eq!(days_from_civil(2000, 1, 1), 10_957);
        assert_eq!(days_from_civil(1, 1, 1), -719_162);
        assert_eq!(days_from_civil(0, 12, 30), -719_164);
    }

    #[test]
    fn test_civil_from_days() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(-1), (1969, 12, 31));
        assert_eq!(civil_from_days(10_957), (2000, 1, 1));
        assert_eq!(civil_from_days(11_016), (2000, 2, 29));
        assert_eq!(civil_from_days(-719_162), (1, 1, 1));
    }

    #[test]
    fn test_civil_roundtrip_across_cycles() {
        // Walk two full 400-year cycles straddling year 0
        let start = days_from_civil(-400, 1, 1);
        let end = days_from_civil(401, 1, 1);
        let mut expected = (-400i64, 1u8, 1u8);
        for days in start..end {
            let got = civil_from_days(days);
            assert_eq!(got, expected, "epoch day {}", days);
            assert_eq!(days_from_civil(got.0 as i32, got.1, got.2), days);
            let (y, m, d) = expected;
            expected = if d < days_in_month(y as i32, m) {
                (y, m, d + 1)
            } else if m < 12 {
                (y, m + 1, 1)
            } else {
                (y + 1, 1, 1)
            };
        }
    }

    #[test]
    fn test_epoch_range_constants() {
        assert_eq!(civil_from_days(MIN_EPOCH_DAY), (-9999, 1, 1));
        assert_eq!(civil_from_days(MAX_EPOCH_DAY), (9999, 12, 31));
    }

    #[test]
    fn test_encode_epoch() {
        assert_eq!(EpochMinuteCodec::encode(date(1970, 1, 1), 0, 0).unwrap(), 0);
        assert_eq!(EpochMinuteCodec::encode(date(1970, 1, 1), 1, 1).unwrap(), 61);
        assert_eq!(EpochMinuteCodec::encode(date(2000, 1, 1), 0, 0).unwrap(), 15_778_080);
        assert_eq!(EpochMinuteCodec::encode(date(1969, 12, 31), 23, 59).unwrap(), -1);
    }

    #[test]
    fn test_encode_rejects_bad_time() {
        let err = EpochMinuteCodec::encode(date(1970, 1, 1), 24, 0).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidField { field: "hour", .. }));
        let err = EpochMinuteCodec::encode(date(1970, 1, 1), 0, 60).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidField { field: "minute", .. }));
    }

    #[test]
    fn test_decode_negative_one() {
        let (d, h, m) = EpochMinuteCodec::decode(-1).unwrap();
        assert_eq!(d, date(1969, 12, 31));
        assert_eq!((h, m), (23, 59));
    }

    #[test]
    fn test_decode_i32_extremes() {
        let (d, h, m) = EpochMinuteCodec::decode(i32::MAX).unwrap();
        assert_eq!(d, date(6053, 1, 23));
        assert_eq!(EpochMinuteCodec::encode(d, h, m).unwrap(), i32::MAX as i64);

        let (d, h, m) = EpochMinuteCodec::decode(i32::MIN).unwrap();
        assert_eq!(d, date(-2114, 12, 8));
        assert_eq!(EpochMinuteCodec::encode(d, h, m).unwrap(), i32::MIN as i64);
    }

    #[test]
    fn test_decode_i64_out_of_range() {
        let too_late = (MAX_EPOCH_DAY + 1) * MINUTES_PER_DAY;
        assert!(matches!(
            EpochMinuteCodec::decode_i64(too_late),
            Err(CalendarError::Range(_))
        ));
        let too_early = MIN_EPOCH_DAY * MINUTES_PER_DAY - 1;
        assert!(matches!(
            EpochMinuteCodec::decode_i64(too_early),
            Err(CalendarError::Range(_))
        ));
        assert!(EpochMinuteCodec::decode_i64(MAX_EPOCH_DAY * MINUTES_PER_DAY + 1439).is_ok());
    }

    quickcheck::quickcheck! {
        fn prop_encode_then_decode(d: IsoDate, hour: u8, minute: u8) -> bool {
            let (hour, minute) = (hour % 24, minute % 60);
            let minutes = EpochMinuteCodec::encode(d, hour, minute).unwrap();
            EpochMinuteCodec::decode_i64(minutes).unwrap() == (d, hour, minute)
        }

        fn prop_decode_then_encode(minutes: i32) -> bool {
            let (d, h, m) = EpochMinuteCodec::decode(minutes).unwrap();
            EpochMinuteCodec::encode(d, h, m).unwrap() == minutes as i64
        }
    }
}
