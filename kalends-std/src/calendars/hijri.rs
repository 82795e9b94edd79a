//! Tabular Islamic calendar
//!
//! Arithmetic Hijri calendar with the type II leap rule (years 2, 5, 7, 10,
//! 13, 16, 18, 21, 24, 26 and 29 of each 30-year cycle) and the Friday
//! (civil) epoch, 16 July 622 Julian.

use kalends_plugin::prelude::*;

pub struct HijriTabular;

/// Epoch day of 1 Muharram 1 AH
const HIJRI_EPOCH: i64 = -492_148;

static HIJRI_ERAS: [EraDef; 2] = [
    EraDef::inverse("bh", "Before Hijrah", 1),
    EraDef::starting("ah", "Anno Hegirae", (1, 1, 1), 0),
];

fn is_leap(year: i32) -> bool {
    (14 + 11 * year as i64).rem_euclid(30) < 11
}

impl CalendarSystem for HijriTabular {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "islamic-civil",
            name: "Islamic (tabular, civil epoch)",
            description: "Arithmetic Hijri calendar: 30-year cycle with 11 leap years",
            aliases: &["hijri-tabular", "islamicc"],
            eras: &HIJRI_ERAS,
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        let y = year as i64;
        HIJRI_EPOCH + (y - 1) * 354 + (3 + 11 * y).div_euclid(30)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_leap(year)
    }

    /// Odd months have 30 days, even months 29; Dhu al-Hijjah gets 30 in leap years
    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        match month {
            12 if is_leap(year) => 30,
            1..=12 if month % 2 == 1 => 30,
            1..=12 => 29,
            _ => 0,
        }
    }

    fn mean_year(&self) -> (i64, i64) {
        (10_631, 30)
    }
}
