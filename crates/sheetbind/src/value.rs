use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use std::fmt::{self, Display};

/* ───────────────────── Excel date-serial utilities ───────────────────
Excel's serial date system:
  Serial 1  = 1900-01-01
  Serial 59 = 1900-02-28
  Serial 60 = 1900-02-29  (phantom – doesn't exist, but Excel thinks it does)
  Serial 61 = 1900-03-01
Base date = 1899-12-31 so that serial 1 = base + 1 day = 1900-01-01.
Time is stored as fractional days (no timezone).
------------------------------------------------------------------- */

/// Base date for the 1900 date system. Serial 1 = base + 1 day = 1900-01-01.
const EXCEL_EPOCH: NaiveDate = NaiveDate::from_ymd_opt(1899, 12, 31).unwrap();
const PHANTOM_LEAP_DAY: NaiveDate = NaiveDate::from_ymd_opt(1900, 2, 28).unwrap();
const FIRST_REAL_MARCH: NaiveDate = NaiveDate::from_ymd_opt(1900, 3, 1).unwrap();
const SECS_PER_DAY: i64 = 86_400;

pub fn datetime_to_serial(dt: &NaiveDateTime) -> f64 {
    let days = (dt.date() - EXCEL_EPOCH).num_days();
    // Dates on or after 1900-03-01 get +1 to account for phantom Feb 29
    let serial_days = if dt.date() >= FIRST_REAL_MARCH {
        days + 1
    } else {
        days
    };

    let secs_in_day = dt.time().num_seconds_from_midnight() as f64;
    serial_days as f64 + secs_in_day / SECS_PER_DAY as f64
}

/// Decode a 1900-system serial into a date/time.
///
/// Returns `None` for non-finite serials and serials outside chrono's range.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    // Round to the second first so 0.99999999 of a day rolls into the next date.
    let total_secs = (serial * SECS_PER_DAY as f64).round();
    if total_secs.abs() > i64::MAX as f64 {
        return None;
    }
    let total_secs = total_secs as i64;
    let days = total_secs.div_euclid(SECS_PER_DAY);
    let secs = total_secs.rem_euclid(SECS_PER_DAY) as u32;

    // Serial 60 is phantom 1900-02-29; map to 1900-02-28
    let date = if days == 60 {
        PHANTOM_LEAP_DAY
    } else {
        // serial < 60: offset = serial (no phantom day yet)
        // serial > 60: offset = serial - 1 (skip phantom day)
        let offset = if days < 60 { days } else { days - 1 };
        EXCEL_EPOCH.checked_add_signed(TimeDelta::try_days(offset)?)?
    };

    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)?;
    Some(date.and_time(time))
}

/// Native spreadsheet error codes, carrying the byte value the legacy binary
/// format stores for each of them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Null,
    Div0,
    Value,
    Ref,
    Name,
    Num,
    Na,
    GettingData,
}

impl ErrorCode {
    pub const fn code(self) -> u8 {
        match self {
            Self::Null => 0x00,
            Self::Div0 => 0x07,
            Self::Value => 0x0F,
            Self::Ref => 0x17,
            Self::Name => 0x1D,
            Self::Num => 0x24,
            Self::Na => 0x2A,
            Self::GettingData => 0x2B,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0x00 => Self::Null,
            0x07 => Self::Div0,
            0x0F => Self::Value,
            0x17 => Self::Ref,
            0x1D => Self::Name,
            0x24 => Self::Num,
            0x2A => Self::Na,
            0x2B => Self::GettingData,
            _ => return None,
        })
    }

    /// Parse the displayed form (`#DIV/0!`, `#N/A`, ...), case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_uppercase().as_str() {
            "#NULL!" => Self::Null,
            "#DIV/0!" => Self::Div0,
            "#VALUE!" => Self::Value,
            "#REF!" => Self::Ref,
            "#NAME?" => Self::Name,
            "#NUM!" => Self::Num,
            "#N/A" => Self::Na,
            "#GETTING_DATA" => Self::GettingData,
            _ => return None,
        })
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "#NULL!",
            Self::Div0 => "#DIV/0!",
            Self::Value => "#VALUE!",
            Self::Ref => "#REF!",
            Self::Name => "#NAME?",
            Self::Num => "#NUM!",
            Self::Na => "#N/A",
            Self::GettingData => "#GETTING_DATA",
        })
    }
}

/// A raw cell as reported by a spreadsheet backend.
///
/// This is the storage-level view: a numeric cell stays a double, and whether
/// it displays as a date is carried alongside rather than decoded here.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Boolean(bool),
    Error(ErrorCode),
    /// Formula source without the leading `=`.
    Formula(String),
    Numeric { value: f64, date_formatted: bool },
    Text(String),
}

impl CellValue {
    pub fn number(value: f64) -> Self {
        CellValue::Numeric {
            value,
            date_formatted: false,
        }
    }

    pub fn date(dt: NaiveDateTime) -> Self {
        CellValue::Numeric {
            value: datetime_to_serial(&dt),
            date_formatted: true,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn formula(source: impl Into<String>) -> Self {
        let source = source.into();
        match source.strip_prefix('=') {
            Some(stripped) => CellValue::Formula(stripped.to_string()),
            None => CellValue::Formula(source),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    /// Default string rendering of the cell, independent of any target type.
    pub fn raw_text(&self) -> String {
        match self {
            CellValue::Blank => String::new(),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
            CellValue::Error(code) => code.to_string(),
            CellValue::Formula(f) => f.clone(),
            CellValue::Numeric { value, .. } => format!("{value}"),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// Text used to name a column when this cell sits in the header row.
    /// Blank cells, empty strings and error cells name nothing.
    pub fn header_text(&self) -> Option<String> {
        match self {
            CellValue::Blank | CellValue::Error(_) => None,
            CellValue::Text(s) | CellValue::Formula(s) if s.is_empty() => None,
            other => Some(other.raw_text()),
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn serial_decodes_known_dates() {
        assert_eq!(
            serial_to_datetime(45306.0),
            Some(ymd_hms(2024, 1, 15, 0, 0, 0))
        );
        assert_eq!(
            serial_to_datetime(44986.5),
            Some(ymd_hms(2023, 3, 1, 12, 0, 0))
        );
        assert_eq!(serial_to_datetime(1.0), Some(ymd_hms(1900, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn phantom_leap_day_maps_to_feb_28() {
        assert_eq!(serial_to_datetime(60.0), Some(ymd_hms(1900, 2, 28, 0, 0, 0)));
        assert_eq!(serial_to_datetime(61.0), Some(ymd_hms(1900, 3, 1, 0, 0, 0)));
    }

    #[test]
    fn near_midnight_rounds_into_next_day() {
        let almost = 45306.0 + 86_399.9 / 86_400.0;
        assert_eq!(
            serial_to_datetime(almost),
            Some(ymd_hms(2024, 1, 16, 0, 0, 0))
        );
    }

    #[test]
    fn serial_rejects_non_finite_and_huge() {
        assert_eq!(serial_to_datetime(f64::NAN), None);
        assert_eq!(serial_to_datetime(f64::INFINITY), None);
        assert_eq!(serial_to_datetime(1e300), None);
    }

    #[test]
    fn datetime_serial_roundtrip() {
        let dt = ymd_hms(2021, 7, 4, 18, 30, 15);
        assert_eq!(serial_to_datetime(datetime_to_serial(&dt)), Some(dt));
    }

    #[test]
    fn error_codes_match_native_bytes() {
        assert_eq!(ErrorCode::Div0.code(), 0x07);
        assert_eq!(ErrorCode::Na.code(), 0x2A);
        for code in [0x00, 0x07, 0x0F, 0x17, 0x1D, 0x24, 0x2A, 0x2B] {
            assert_eq!(ErrorCode::from_code(code).map(ErrorCode::code), Some(code));
        }
        assert_eq!(ErrorCode::from_code(0x01), None);
        assert_eq!(ErrorCode::parse("#div/0!"), Some(ErrorCode::Div0));
        assert_eq!(ErrorCode::Ref.to_string(), "#REF!");
    }

    #[test]
    fn header_text_skips_blank_and_errors() {
        assert_eq!(CellValue::Blank.header_text(), None);
        assert_eq!(CellValue::text("").header_text(), None);
        assert_eq!(CellValue::Error(ErrorCode::Na).header_text(), None);
        assert_eq!(CellValue::text("Name").header_text().as_deref(), Some("Name"));
        assert_eq!(
            CellValue::formula("=A1&B1").header_text().as_deref(),
            Some("A1&B1")
        );
        assert_eq!(CellValue::number(2024.0).header_text().as_deref(), Some("2024"));
    }
}
