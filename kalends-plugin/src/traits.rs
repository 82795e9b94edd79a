//! Calendar descriptor traits

use kalends_core::CalendarError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An era and how its years map onto the calendar's extended year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EraDef {
    /// Era code, as used in `from_fields` (e.g. "reiwa", "bce")
    pub code: &'static str,
    pub name: &'static str,
    /// First day of the era as (extended year, month ordinal, day).
    /// `None` means the era has no start and runs back indefinitely.
    pub start: Option<(i32, u8, u8)>,
    /// Extended year of era year 0
    pub offset: i32,
    /// Era years count backwards from `offset` (BCE-style)
    pub inverse: bool,
}

impl EraDef {
    /// Era starting on a given day; year 1 is `offset + 1`
    pub const fn starting(
        code: &'static str,
        name: &'static str,
        start: (i32, u8, u8),
        offset: i32,
    ) -> Self {
        Self { code, name, start: Some(start), offset, inverse: false }
    }

    /// Era covering every year; era year = extended year - `offset`
    pub const fn unbounded(code: &'static str, name: &'static str, offset: i32) -> Self {
        Self { code, name, start: None, offset, inverse: false }
    }

    /// Era counting backwards; era year 1 is extended year `offset - 1`
    pub const fn inverse(code: &'static str, name: &'static str, offset: i32) -> Self {
        Self { code, name, start: None, offset, inverse: true }
    }

    pub fn era_year(&self, extended_year: i32) -> i32 {
        if self.inverse {
            self.offset - extended_year
        } else {
            extended_year - self.offset
        }
    }

    pub fn extended_year(&self, era_year: i32) -> i32 {
        if self.inverse {
            self.offset - era_year
        } else {
            self.offset + era_year
        }
    }

    /// Whether era years below 1 are meaningful
    pub fn allows_any_year(&self) -> bool {
        self.start.is_none() && !self.inverse
    }
}

/// Metadata for a calendar system
#[derive(Debug, Clone, Serialize)]
pub struct CalendarMeta {
    /// Canonical identifier, as used in `[u-ca=...]`
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub aliases: &'static [&'static str],
    pub eras: &'static [EraDef],
}

/// Calendar system descriptor
///
/// Every method is a pure function of the extended year (and month ordinal).
/// The converter validates the values it gets back, so a descriptor that
/// breaks the rules yields `CalendarError::UnsupportedCalendar` instead of a
/// wrong date.
pub trait CalendarSystem: Send + Sync {
    fn meta(&self) -> CalendarMeta;

    /// Epoch day (days since 1970-01-01 ISO) of the first day of `year`
    fn new_year(&self, year: i32) -> i64;

    fn is_leap_year(&self, year: i32) -> bool;

    /// Length of month `month` (1-based ordinal) in `year`
    fn days_in_month(&self, year: i32, month: u8) -> u8;

    fn months_in_year(&self, _year: i32) -> u8 {
        12
    }

    /// Stable code of an ordinal month
    fn month_code(&self, _year: i32, month: u8) -> MonthCode {
        MonthCode::new(month)
    }

    /// Ordinal month for a code, `None` if the year has no such month
    fn month_for_code(&self, year: i32, code: MonthCode) -> Option<u8> {
        (1..=self.months_in_year(year)).find(|&m| self.month_code(year, m) == code)
    }

    /// Average year length as `(days, years)`, used to estimate the year of a day
    fn mean_year(&self) -> (i64, i64) {
        (146_097, 400)
    }
}

// ============================================================================
// MonthCode
// ============================================================================

/// Textual month identity, `M01`..`M13`, with an `L` suffix for leap months
///
/// Ordinals shift when a leap month is inserted; codes do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MonthCode {
    number: u8,
    leap: bool,
}

impl MonthCode {
    pub const fn new(number: u8) -> Self {
        Self { number, leap: false }
    }

    /// Leap month following month `number`
    pub const fn new_leap(number: u8) -> Self {
        Self { number, leap: true }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn is_leap(&self) -> bool {
        self.leap
    }
}

impl fmt::Display for MonthCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{:02}", self.number)?;
        if self.leap {
            f.write_str("L")?;
        }
        Ok(())
    }
}

impl FromStr for MonthCode {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::invalid_field("month_code", s, "expected M01-M13 or M01L-M12L");
        let rest = s.strip_prefix('M').ok_or_else(invalid)?;
        let (digits, leap) = match rest.strip_suffix('L') {
            Some(d) => (d, true),
            None => (rest, false),
        };
        if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: u8 = digits.parse().map_err(|_| invalid())?;
        if number == 0 || number > 13 || (leap && number > 12) {
            return Err(invalid());
        }
        Ok(Self { number, leap })
    }
}

impl From<MonthCode> for String {
    fn from(code: MonthCode) -> Self {
        code.to_string()
    }
}

impl TryFrom<String> for MonthCode {
    type Error = CalendarError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_code_text() {
        assert_eq!(MonthCode::new(1).to_string(), "M01");
        assert_eq!(MonthCode::new(13).to_string(), "M13");
        assert_eq!(MonthCode::new_leap(5).to_string(), "M05L");
        assert_eq!("M05L".parse::<MonthCode>().unwrap(), MonthCode::new_leap(5));
        assert_eq!("M12".parse::<MonthCode>().unwrap(), MonthCode::new(12));
    }

    #[test]
    fn test_month_code_rejects() {
        for bad in ["M00", "M14", "M13L", "M5", "m05", "05", "M05X", "M1L", ""] {
            assert!(bad.parse::<MonthCode>().is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_month_code_serde() {
        let json = serde_json::to_value(MonthCode::new_leap(5)).unwrap();
        assert_eq!(json, "M05L");
        let code: MonthCode = serde_json::from_value(json).unwrap();
        assert!(code.is_leap());
        assert!(serde_json::from_str::<MonthCode>("\"M99\"").is_err());
    }

    #[test]
    fn test_era_years() {
        let bce = EraDef::inverse("bce", "Before Common Era", 1);
        assert_eq!(bce.era_year(0), 1);
        assert_eq!(bce.era_year(-43), 44);
        assert_eq!(bce.extended_year(44), -43);

        let reiwa = EraDef::starting("reiwa", "Reiwa", (2019, 5, 1), 2018);
        assert_eq!(reiwa.era_year(2019), 1);
        assert_eq!(reiwa.extended_year(6), 2024);

        let aa = EraDef::unbounded("aa", "Amete Alem", -5500);
        assert_eq!(aa.era_year(0), 5500);
        assert!(aa.allows_any_year());
        assert!(!bce.allows_any_year());
        assert!(!reiwa.allows_any_year());
    }
}
