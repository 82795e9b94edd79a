//! Indian national (Saka) calendar

use kalends_core::epoch;
use kalends_plugin::prelude::*;

pub struct Indian;

/// Saka year 1 began in Gregorian year 79
const SAKA_OFFSET: i32 = 78;

static INDIAN_ERAS: [EraDef; 1] = [EraDef::unbounded("shaka", "Saka", 0)];

impl CalendarSystem for Indian {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "indian",
            name: "Indian National",
            description: "Saka calendar, year starting 22 March (21 March in Gregorian leap years)",
            aliases: &["saka"],
            eras: &INDIAN_ERAS,
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        let gregorian = year + SAKA_OFFSET;
        let day = if epoch::is_leap_year(gregorian) { 21 } else { 22 };
        epoch::days_from_civil(gregorian, 3, day)
    }

    /// Leap with the Gregorian year in which it starts
    fn is_leap_year(&self, year: i32) -> bool {
        epoch::is_leap_year(year + SAKA_OFFSET)
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        match month {
            1 if self.is_leap_year(year) => 31,
            1 => 30,
            2..=6 => 31,
            7..=12 => 30,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn saka(y: i32, m: u8, d: u8) -> (i32, u8, u8) {
        let iso = IsoDateTime::try_new(y, m, d, 0, 0, 0, 0).unwrap();
        let cal: CalendarRef = Arc::new(Indian);
        let date = CalendarConverter::to_calendar(&iso, &cal).unwrap();
        (date.extended_year(), date.month(), date.day_of_month())
    }

    #[test]
    fn test_known_dates() {
        assert_eq!(saka(2024, 3, 20), (1945, 12, 30));
        assert_eq!(saka(2024, 3, 21), (1946, 1, 1));
        assert_eq!(saka(1970, 1, 1), (1891, 10, 11));
        assert_eq!(saka(2000, 2, 29), (1921, 12, 10));
        assert_eq!(saka(2024, 7, 17), (1946, 4, 26));
    }

    #[test]
    fn test_leap_chaitra() {
        let cal = Indian;
        assert!(cal.is_leap_year(1946));
        assert_eq!(cal.days_in_month(1946, 1), 31);
        assert_eq!(cal.days_in_month(1945, 1), 30);
        assert_eq!(cal.new_year(1947) - cal.new_year(1946), 366);
    }
}
