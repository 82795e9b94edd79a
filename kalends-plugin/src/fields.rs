//! Derived fields of a calendar date
//!
//! Answers come from the rules of the calendar that owns the date, so
//! `days_in_month` of a Hebrew date depends on the Hebrew year type, not on
//! the ISO month the day happens to fall in.

use crate::CalendarDateTime;
use kalends_core::Weekday;

/// Field queries over a `CalendarDateTime`
pub struct FieldQueryEngine;

impl FieldQueryEngine {
    pub fn days_in_month(date: &CalendarDateTime) -> u8 {
        date.calendar().days_in_month(date.extended_year(), date.month())
    }

    pub fn days_in_year(date: &CalendarDateTime) -> u16 {
        let calendar = date.calendar();
        let year = date.extended_year();
        (calendar.new_year(year + 1) - calendar.new_year(year)) as u16
    }

    pub fn months_in_year(date: &CalendarDateTime) -> u8 {
        date.calendar().months_in_year(date.extended_year())
    }

    /// Weekday from the epoch day, so it always agrees with the ISO date
    pub fn day_of_week(date: &CalendarDateTime) -> Weekday {
        Weekday::from_epoch_days(date.epoch_days())
    }

    /// Day of year (1-based)
    pub fn day_of_year(date: &CalendarDateTime) -> u16 {
        let start = date.calendar().new_year(date.extended_year());
        (date.epoch_days() - start + 1) as u16
    }

    pub fn is_in_leap_year(date: &CalendarDateTime) -> bool {
        date.calendar().is_leap_year(date.extended_year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lunisolar, proleptic, thirteen};
    use crate::CalendarConverter;
    use kalends_core::{IsoDateTime, IsoTime};

    fn on(y: i32, m: u8, d: u8, cal: &crate::CalendarRef) -> CalendarDateTime {
        let iso = IsoDateTime::try_new(y, m, d, 0, 0, 0, 0).unwrap();
        CalendarConverter::to_calendar(&iso, cal).unwrap()
    }

    #[test]
    fn test_proleptic_fields() {
        let date = on(2024, 2, 10, &proleptic());
        assert_eq!(FieldQueryEngine::days_in_month(&date), 29);
        assert_eq!(FieldQueryEngine::days_in_year(&date), 366);
        assert_eq!(FieldQueryEngine::months_in_year(&date), 12);
        assert_eq!(FieldQueryEngine::day_of_year(&date), 41);
        assert!(FieldQueryEngine::is_in_leap_year(&date));
        assert_eq!(FieldQueryEngine::day_of_week(&date), Weekday::Saturday);

        let date = on(1900, 2, 10, &proleptic());
        assert_eq!(FieldQueryEngine::days_in_month(&date), 28);
        assert!(!FieldQueryEngine::is_in_leap_year(&date));
    }

    #[test]
    fn test_fields_follow_owning_calendar() {
        // Same ISO day, different month lengths
        let date = on(2023, 12, 31, &thirteen());
        assert_eq!(date.month(), 13);
        assert_eq!(FieldQueryEngine::days_in_month(&date), 29);
        assert_eq!(FieldQueryEngine::months_in_year(&date), 13);
        assert_eq!(FieldQueryEngine::day_of_year(&date), 365);
    }

    #[test]
    fn test_leap_year_lengths() {
        let cal = lunisolar();
        let leap = CalendarConverter::from_fields(&cal, None, 6, 7, 1, IsoTime::midnight()).unwrap();
        assert_eq!(FieldQueryEngine::days_in_year(&leap), 384);
        assert_eq!(FieldQueryEngine::months_in_year(&leap), 13);
        assert_eq!(FieldQueryEngine::day_of_year(&leap), 178);

        let common = CalendarConverter::from_fields(&cal, None, 7, 12, 29, IsoTime::midnight()).unwrap();
        assert_eq!(FieldQueryEngine::days_in_year(&common), 354);
        assert_eq!(FieldQueryEngine::day_of_year(&common), 354);
        assert_eq!(FieldQueryEngine::days_in_month(&common), 29);
    }

    #[test]
    fn test_convenience_methods_delegate() {
        let date = on(2024, 3, 20, &thirteen());
        assert_eq!(date.days_in_month(), FieldQueryEngine::days_in_month(&date));
        assert_eq!(date.days_in_year(), FieldQueryEngine::days_in_year(&date));
        assert_eq!(date.day_of_year(), FieldQueryEngine::day_of_year(&date));
        assert_eq!(date.day_of_week(), Weekday::Wednesday);
    }
}
