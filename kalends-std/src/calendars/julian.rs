//! Proleptic Julian calendar

use kalends_core::epoch;
use kalends_plugin::prelude::*;

pub struct Julian;

/// Epoch day of Julian 0001-01-01 (Gregorian 0000-12-30)
const JULIAN_EPOCH: i64 = epoch::days_from_civil(0, 12, 30);

static JULIAN_ERAS: [EraDef; 2] = [
    EraDef::inverse("bce", "Before Common Era", 1),
    EraDef::starting("ce", "Common Era", (1, 1, 1), 0),
];

fn is_julian_leap(year: i32) -> bool {
    year.rem_euclid(4) == 0
}

/// Epoch day of Julian (year, 1, 1)
fn julian_new_year(year: i32) -> i64 {
    let y = year as i64 - 1;
    JULIAN_EPOCH + 365 * y + y.div_euclid(4)
}

impl CalendarSystem for Julian {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "julian",
            name: "Julian",
            description: "Proleptic Julian: a leap day every fourth year",
            aliases: &[],
            eras: &JULIAN_ERAS,
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        julian_new_year(year)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_julian_leap(year)
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        match month {
            2 if is_julian_leap(year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            1..=12 => 31,
            _ => 0,
        }
    }

    fn mean_year(&self) -> (i64, i64) {
        (1461, 4)
    }
}
