//! Cell value coercion.
//!
//! Spreadsheet cells are dynamically typed; record fields are not. Every
//! conversion between the two happens in [`coerce`], which dispatches first on
//! the kind of cell and then on the declared type of the target field.

use rust_decimal::Decimal;

use crate::config::DateFormat;
use crate::error::CoercionError;
use crate::schema::{FieldValue, TypeTag};
use crate::value::{CellValue, serial_to_datetime};

/// Convert one cell into a value for a field declared as `target`.
///
/// Blank cells never fail: they coerce to empty text whatever the target,
/// and every field type reads empty text as its default.
pub fn coerce(
    cell: &CellValue,
    target: TypeTag,
    date_format: &DateFormat,
) -> Result<FieldValue, CoercionError> {
    match cell {
        CellValue::Blank => Ok(FieldValue::Text(String::new())),
        CellValue::Boolean(b) => match target {
            TypeTag::Bool => Ok(FieldValue::Bool(*b)),
            other => Err(CoercionError::BooleanTarget { target: other }),
        },
        // Error cells surface their native code, not user data.
        CellValue::Error(code) => Ok(FieldValue::Byte(code.code() as i8)),
        CellValue::Formula(source) => Ok(FieldValue::Text(source.clone())),
        CellValue::Numeric {
            value,
            date_formatted: true,
        } => {
            let dt = serial_to_datetime(*value).ok_or(CoercionError::DateOutOfRange(*value))?;
            match target {
                TypeTag::Date => Ok(FieldValue::Date(dt)),
                _ => Ok(FieldValue::Text(date_format.format(&dt))),
            }
        }
        CellValue::Numeric {
            value,
            date_formatted: false,
        } => Ok(coerce_number(*value, target)),
        CellValue::Text(s) => match target {
            TypeTag::Date => date_format.parse(s).map(FieldValue::Date),
            _ => Ok(FieldValue::Text(s.clone())),
        },
    }
}

fn coerce_number(value: f64, target: TypeTag) -> FieldValue {
    // `as` truncates toward zero and saturates at the bounds of the target.
    match target {
        TypeTag::Int => FieldValue::Int(value as i32),
        TypeTag::Short => FieldValue::Short(value as i16),
        TypeTag::Float => FieldValue::Float(value as f32),
        TypeTag::Byte => FieldValue::Byte(value as i8),
        TypeTag::String | TypeTag::Unknown => FieldValue::Text(number_text(value)),
        TypeTag::Bool | TypeTag::Double | TypeTag::Date => FieldValue::Double(value),
    }
}

/// Canonical text of a double, never in exponential notation.
///
/// Magnitudes in `[1e-3, 1e7)` (and zero) keep the shortest round-trip
/// rendering (`3.0`, `0.25`). Anything outside that band would be written
/// with an exponent, so it is re-rendered as a plain decimal instead; long
/// identifiers stored as numbers (`13800138000`) survive as bare digits.
pub fn number_text(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() || magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        format!("{value:?}")
    } else {
        plain_decimal(value)
    }
}

/// Plain (non-exponential) decimal rendering of `value`.
pub fn plain_decimal(value: f64) -> String {
    match Decimal::from_scientific(&format!("{value:e}")) {
        Ok(d) => d.normalize().to_string(),
        // Beyond Decimal's 96-bit range; Display never uses an exponent.
        Err(_) => format!("{value}"),
    }
}
