//! Hebrew calendar
//!
//! Arithmetic (rabbinic) calendar: months follow the mean lunation, the
//! year starts on the day of the molad of Tishri subject to the postponement
//! rules, and 7 of every 19 years carry an extra month, Adar I.

use kalends_plugin::prelude::*;

pub struct Hebrew;

/// Epoch day of the Hebrew epoch, 7 October 3761 BCE Julian
const HEBREW_EPOCH: i64 = -2_092_590;

/// Parts (1/1080 hour) in a day and in a mean month
const PARTS_PER_DAY: i64 = 25_920;
const PARTS_PER_MONTH: i64 = 13_753;
/// Molad of Tishri AM 1, in parts past the start of a day
const MOLAD_BEHERAD: i64 = 12_084;

static HEBREW_ERAS: [EraDef; 1] = [EraDef::unbounded("am", "Anno Mundi", 0)];

fn is_leap(year: i32) -> bool {
    (7 * year as i64 + 1).rem_euclid(19) < 7
}

/// Days from the epoch to the molad-based start of `year`, with the
/// day-of-week postponement applied
fn elapsed_days(year: i32) -> i64 {
    let months = (235 * year as i64 - 234).div_euclid(19);
    let parts = MOLAD_BEHERAD + PARTS_PER_MONTH * months;
    let days = 29 * months + parts.div_euclid(PARTS_PER_DAY);
    // Rosh Hashanah never on Sunday, Wednesday or Friday
    if (3 * (days + 1)).rem_euclid(7) < 3 {
        days + 1
    } else {
        days
    }
}

/// Extra postponement keeping year lengths within 353-355 / 383-385
fn year_length_correction(year: i32) -> i64 {
    let (prev, this, next) = (elapsed_days(year - 1), elapsed_days(year), elapsed_days(year + 1));
    if next - this == 356 {
        2
    } else if this - prev == 382 {
        1
    } else {
        0
    }
}

fn new_year(year: i32) -> i64 {
    HEBREW_EPOCH + elapsed_days(year) + year_length_correction(year)
}

/// Month lengths of `year`, in ordinal order
fn month_lengths(year: i32) -> ([u8; 13], u8) {
    let leap = is_leap(year);
    let length = new_year(year + 1) - new_year(year);
    // 0 = deficient, 1 = regular, 2 = complete
    let kind = length - if leap { 383 } else { 353 };
    let heshvan = if kind == 2 { 30 } else { 29 };
    let kislev = if kind == 0 { 29 } else { 30 };
    if leap {
        ([30, heshvan, kislev, 29, 30, 30, 29, 30, 29, 30, 29, 30, 29], 13)
    } else {
        ([30, heshvan, kislev, 29, 30, 29, 30, 29, 30, 29, 30, 29, 0], 12)
    }
}

impl CalendarSystem for Hebrew {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "hebrew",
            name: "Hebrew",
            description: "Arithmetic Hebrew calendar with molad postponements and Adar I in leap years",
            aliases: &[],
            eras: &HEBREW_ERAS,
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        new_year(year)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_leap(year)
    }

    fn months_in_year(&self, year: i32) -> u8 {
        if is_leap(year) {
            13
        } else {
            12
        }
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        let (lengths, count) = month_lengths(year);
        if month == 0 || month > count {
            return 0;
        }
        lengths[(month - 1) as usize]
    }

    /// Adar I is `M05L`; in leap years later months shift by one ordinal
    fn month_code(&self, year: i32, month: u8) -> MonthCode {
        if !is_leap(year) || month < 6 {
            MonthCode::new(month)
        } else if month == 6 {
            MonthCode::new_leap(5)
        } else {
            MonthCode::new(month - 1)
        }
    }

    fn mean_year(&self) -> (i64, i64) {
        // 235 mean months of 29d 13753p per 19 years
        (179_876_755, 492_480)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn hebrew(y: i32, m: u8, d: u8) -> CalendarDateTime {
        let iso = IsoDateTime::try_new(y, m, d, 0, 0, 0, 0).unwrap();
        let cal: CalendarRef = Arc::new(Hebrew);
        CalendarConverter::to_calendar(&iso, &cal).unwrap()
    }

    fn ymd(date: &CalendarDateTime) -> (i32, u8, u8) {
        (date.extended_year(), date.month(), date.day_of_month())
    }

    #[test]
    fn test_rosh_hashanah() {
        assert_eq!(ymd(&hebrew(2022, 9, 26)), (5783, 1, 1));
        assert_eq!(ymd(&hebrew(2023, 9, 16)), (5784, 1, 1));
        assert_eq!(ymd(&hebrew(2024, 10, 3)), (5785, 1, 1));
        assert_eq!(ymd(&hebrew(2025, 9, 23)), (5786, 1, 1));
        assert_eq!(ymd(&hebrew(2024, 10, 2)), (5784, 13, 29));
    }

    #[test]
    fn test_year_lengths() {
        let cal = Hebrew;
        for (year, days, months) in [(5783, 355, 12), (5784, 383, 13), (5785, 355, 12), (5786, 354, 12)] {
            assert_eq!(cal.new_year(year + 1) - cal.new_year(year), days, "year {}", year);
            assert_eq!(cal.months_in_year(year), months);
        }
        assert_eq!(cal.days_in_month(5784, 2), 29);
        assert_eq!(cal.days_in_month(5784, 3), 29);
        assert_eq!(cal.days_in_month(5785, 2), 30);
        assert_eq!(cal.days_in_month(5785, 13), 0);
    }

    #[test]
    fn test_adar_two() {
        let date = hebrew(2024, 3, 20);
        assert_eq!(ymd(&date), (5784, 7, 10));
        assert_eq!(date.month_code(), MonthCode::new(6));
        assert!(date.is_in_leap_year());

        let tammuz = hebrew(2024, 7, 17);
        assert_eq!(ymd(&tammuz), (5784, 11, 11));
        assert_eq!(tammuz.month_code().to_string(), "M10");
    }

    #[test]
    fn test_adar_one_code() {
        let cal: CalendarRef = Arc::new(Hebrew);
        let adar_one =
            CalendarConverter::from_codes(&cal, None, 5784, MonthCode::new_leap(5), 1, IsoTime::midnight()).unwrap();
        assert_eq!(adar_one.month(), 6);
        assert_eq!(adar_one.to_iso().unwrap().date(), IsoDate::try_new(2024, 2, 10).unwrap());

        // Adar I does not exist in a common year
        assert!(CalendarConverter::from_codes(&cal, None, 5785, MonthCode::new_leap(5), 1, IsoTime::midnight())
            .is_err());
        let adar = CalendarConverter::from_codes(&cal, None, 5785, MonthCode::new(6), 1, IsoTime::midnight()).unwrap();
        assert_eq!(adar.month(), 6);
    }

    #[test]
    fn test_known_dates() {
        assert_eq!(ymd(&hebrew(1970, 1, 1)), (5730, 4, 23));
        assert_eq!(ymd(&hebrew(2000, 2, 29)), (5760, 6, 23));
    }

    #[test]
    fn test_leap_cycle() {
        let leap: Vec<i32> = (1..=19).filter(|&y| is_leap(y)).collect();
        assert_eq!(leap, vec![3, 6, 8, 11, 14, 17, 19]);
    }

    #[test]
    fn test_rosh_hashanah_weekday() {
        for year in 5700..5800 {
            let first = Weekday::from_epoch_days(new_year(year));
            assert!(
                !matches!(first, Weekday::Sunday | Weekday::Wednesday | Weekday::Friday),
                "year {} starts on {}",
                year,
                first
            );
        }
    }
}
