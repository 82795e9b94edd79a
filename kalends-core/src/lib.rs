//! Kalends Core - Fundamental types
//!
//! This crate provides the calendar-independent pieces of Kalends:
//! - `IsoDate`, `IsoTime`, `IsoDateTime`: validated ISO-8601 values
//! - `EpochMinuteCodec`: exact minutes-since-epoch conversion
//! - `TimePrecision` and IXDTF text parsing/printing
//! - `CalendarError` / `KalendsError`: typed and structured errors

mod date;
mod error;
pub mod epoch;
mod format;

pub use date::{IsoDate, IsoDateTime, IsoTime, Weekday, YEAR_MAX, YEAR_MIN};
pub use epoch::EpochMinuteCodec;
pub use error::{codes, CalendarError, ErrorContext, KalendsError, Severity};
pub use format::{IxdtfRecord, TimePrecision};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{
        CalendarError, EpochMinuteCodec, IsoDate, IsoDateTime, IsoTime, KalendsError, Severity,
        TimePrecision, Weekday,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_origin() {
        let origin = IsoDate::try_new(1970, 1, 1).unwrap();
        assert_eq!(EpochMinuteCodec::encode(origin, 0, 0).unwrap(), 0);

        let (date, hour, minute) = EpochMinuteCodec::decode(-1).unwrap();
        assert_eq!(date.to_string(), "1969-12-31");
        assert_eq!((hour, minute), (23, 59));
    }

    #[test]
    fn test_leap_february() {
        for (year, expected) in [(2000, 29), (1900, 28), (2024, 29), (2023, 28)] {
            let feb = IsoDate::try_new(year, 2, 1).unwrap();
            assert_eq!(feb.days_in_month(), expected, "February {}", year);
        }
    }

    #[test]
    fn test_invalid_dates_are_field_errors() {
        let err = IsoDate::try_new(2023, 2, 30).unwrap_err();
        assert_eq!(err.code(), codes::INVALID_FIELD);
        let err = IsoDate::try_new(2023, 13, 1).unwrap_err();
        assert_eq!(err.code(), codes::INVALID_FIELD);
    }

    #[test]
    fn test_text_to_minutes() {
        let dt: IsoDateTime = "2000-01-01T00:00".parse().unwrap();
        assert_eq!(dt.minutes_since_local_unix_epoch().unwrap(), 15_778_080);
        let back = IsoDateTime::from_minutes_since_local_unix_epoch(15_778_080).unwrap();
        assert_eq!(back.format(TimePrecision::Minute), "2000-01-01T00:00");
    }
}
