use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::error::{BindError, CoercionError};

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A validated chrono strftime pattern.
///
/// Used both to render date-formatted cells into text fields and to parse
/// text cells into date fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateFormat(String);

impl DateFormat {
    pub fn new(pattern: impl Into<String>) -> Result<Self, BindError> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(BindError::InvalidConfig("date format is empty".to_string()));
        }
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(BindError::InvalidConfig(format!(
                "invalid date format '{pattern}'"
            )));
        }
        // Offset fields such as `%z` parse as items but cannot render a
        // `NaiveDateTime`.
        let mut sample = String::new();
        if write!(sample, "{}", NaiveDateTime::default().format(&pattern)).is_err() {
            return Err(BindError::InvalidConfig(format!(
                "date format '{pattern}' cannot render a date without a time zone"
            )));
        }
        Ok(Self(pattern))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn format(&self, dt: &NaiveDateTime) -> String {
        let mut out = String::new();
        // `new` rejects every pattern that fails to render.
        let _ = write!(out, "{}", dt.format(&self.0));
        out
    }

    /// Parse with the full pattern, falling back to a date-only reading
    /// (midnight) for patterns without time fields.
    pub fn parse(&self, text: &str) -> Result<NaiveDateTime, CoercionError> {
        let text = text.trim();
        NaiveDateTime::parse_from_str(text, &self.0)
            .or_else(|_| {
                NaiveDate::parse_from_str(text, &self.0).map(|d| d.and_time(NaiveTime::default()))
            })
            .map_err(|_| CoercionError::DateParse {
                text: text.to_string(),
                format: self.0.clone(),
            })
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self(DEFAULT_DATE_FORMAT.to_string())
    }
}

impl TryFrom<String> for DateFormat {
    type Error = BindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DateFormat> for String {
    fn from(value: DateFormat) -> Self {
        value.0
    }
}

/// Options recognized by [`SheetBinder`](crate::SheetBinder).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// 1-based index of the header row; data starts on the row after it.
    pub start_row: u32,
    pub sheet_name: String,
    pub date_format: DateFormat,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            start_row: 1,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            date_format: DateFormat::default(),
        }
    }
}

impl SheetConfig {
    pub fn with_start_row(mut self, start_row: u32) -> Result<Self, BindError> {
        self.set_start_row(start_row)?;
        Ok(self)
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Result<Self, BindError> {
        self.date_format = DateFormat::new(pattern)?;
        Ok(self)
    }

    pub fn set_start_row(&mut self, start_row: u32) -> Result<(), BindError> {
        if start_row < 1 {
            return Err(BindError::InvalidConfig(
                "start_row is 1-based and must be at least 1".to_string(),
            ));
        }
        self.start_row = start_row;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), BindError> {
        if self.start_row < 1 {
            return Err(BindError::InvalidConfig(
                "start_row is 1-based and must be at least 1".to_string(),
            ));
        }
        if self.sheet_name.is_empty() {
            return Err(BindError::InvalidConfig("sheet_name is empty".to_string()));
        }
        Ok(())
    }

    /// Zero-based index of the header row.
    pub fn header_row_index(&self) -> u32 {
        self.start_row.saturating_sub(1)
    }
}
