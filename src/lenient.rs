//! Coercion for optional numeric columns: never fails, falls back to a default.

use std::str::FromStr;

use crate::store::Cell;

/// Parses `text` (surrounding whitespace ignored), or returns `T::default()`.
pub fn parse_lenient<T: FromStr + Default>(text: &str) -> T {
    text.trim().parse().unwrap_or_default()
}

pub fn float(cell: &Cell) -> f64 {
    match cell {
        Cell::Null => 0.0,
        Cell::Integer(value) => *value as f64,
        Cell::Real(value) if value.is_finite() => *value,
        Cell::Real(_) => 0.0,
        Cell::Text(text) => {
            let value: f64 = parse_lenient(text);
            if value.is_finite() {
                value
            } else {
                0.0
            }
        }
    }
}

/// Integer columns; reals are truncated, text must be an integer literal.
pub fn int(cell: &Cell) -> i64 {
    match cell {
        Cell::Null => 0,
        Cell::Integer(value) => *value,
        Cell::Real(value) if value.is_finite() => value.trunc() as i64,
        Cell::Real(_) => 0,
        Cell::Text(text) => parse_lenient(text),
    }
}

pub fn optional_float(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Null => None,
        other => Some(float(other)),
    }
}

pub fn optional_int(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Null => None,
        other => Some(int(other)),
    }
}

/// Text columns; null becomes the empty string.
pub fn text(cell: &Cell) -> String {
    cell.as_text().unwrap_or_default()
}
