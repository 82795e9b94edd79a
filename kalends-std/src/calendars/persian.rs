//! Persian (Solar Hijri) calendar
//!
//! Arithmetic 33-year cycle, corrected by a table of years where the
//! astronomical calendar differs: a listed year is not leap and the year
//! after it is, with Nowruz of that following year one day earlier.

use kalends_plugin::prelude::*;

pub struct Persian;

/// Epoch day of 1 Farvardin 1 AP (19 March 622 Julian)
const PERSIAN_EPOCH: i64 = -492_267;

/// Years the 33-year rule marks leap that the astronomical calendar does not
static NON_LEAP_CORRECTION: [i32; 78] = [
    1502, 1601, 1634, 1667, 1700, 1733, 1766, 1799, 1832, 1865, 1898, 1931, 1964, 1997, 2030, 2059,
    2063, 2096, 2129, 2158, 2162, 2191, 2195, 2224, 2228, 2257, 2261, 2290, 2294, 2323, 2327, 2356,
    2360, 2389, 2393, 2422, 2426, 2455, 2459, 2488, 2492, 2521, 2525, 2554, 2558, 2587, 2591, 2620,
    2624, 2653, 2657, 2686, 2690, 2719, 2723, 2748, 2752, 2756, 2781, 2785, 2789, 2818, 2822, 2847,
    2851, 2855, 2880, 2884, 2888, 2913, 2917, 2921, 2946, 2950, 2954, 2979, 2983, 2987,
];

static PERSIAN_ERAS: [EraDef; 1] = [EraDef::unbounded("ap", "Anno Persico", 0)];

fn is_corrected(year: i32) -> bool {
    NON_LEAP_CORRECTION.binary_search(&year).is_ok()
}

fn is_leap(year: i32) -> bool {
    if is_corrected(year) {
        false
    } else if is_corrected(year - 1) {
        true
    } else {
        (25 * year as i64 + 11).rem_euclid(33) < 8
    }
}

impl CalendarSystem for Persian {
    fn meta(&self) -> CalendarMeta {
        CalendarMeta {
            id: "persian",
            name: "Persian",
            description: "Solar Hijri calendar, 33-year arithmetic rule with corrections",
            aliases: &["solar-hijri"],
            eras: &PERSIAN_ERAS,
        }
    }

    fn new_year(&self, year: i32) -> i64 {
        let y = year as i64;
        let mut day = PERSIAN_EPOCH - 1 + 365 * (y - 1) + (8 * y + 21).div_euclid(33);
        if is_corrected(year - 1) {
            day -= 1;
        }
        day
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_leap(year)
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        match month {
            1..=6 => 31,
            7..=11 => 30,
            12 if is_leap(year) => 30,
            12 => 29,
            _ => 0,
        }
    }

    fn mean_year(&self) -> (i64, i64) {
        (12_053, 33)
    }
}
