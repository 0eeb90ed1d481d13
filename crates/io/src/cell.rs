use std::fmt;

use calamine::Data;
use serde::Serialize;

/// A raw cell value as read from a report export.
///
/// Both container backends collapse onto these three shapes so nothing
/// downstream ever matches on a library-specific type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, CellValue::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True for a numeric cell holding 0 (or -0.0). Text "0" is not a numeric zero.
    pub fn is_numeric_zero(&self) -> bool {
        matches!(self, CellValue::Number(n) if *n == 0.0)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            // An empty string cell reads as blank, matching the legacy reader.
            Data::String(s) if s.is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(n) => CellValue::Number(*n),
            Data::Int(n) => CellValue::Number(*n as f64),
            Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
            // Date cells keep their serial; reports store dates as text anyway
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calamine_values_collapse_to_three_shapes() {
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Empty);
        assert_eq!(CellValue::from(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(CellValue::from(&Data::String("nsk".into())), CellValue::Text("nsk".into()));
        assert_eq!(CellValue::from(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(CellValue::from(&Data::Float(8.5)), CellValue::Number(8.5));
        assert_eq!(CellValue::from(&Data::Bool(true)), CellValue::Number(1.0));
    }

    #[test]
    fn numeric_zero_is_not_text_zero() {
        assert!(CellValue::Number(0.0).is_numeric_zero());
        assert!(CellValue::Number(-0.0).is_numeric_zero());
        assert!(!CellValue::Text("0".into()).is_numeric_zero());
        assert!(!CellValue::Empty.is_numeric_zero());
    }

    #[test]
    fn display_drops_integral_fraction() {
        assert_eq!(CellValue::Number(9.0).to_string(), "9");
        assert_eq!(CellValue::Number(8.25).to_string(), "8.25");
        assert_eq!(CellValue::Empty.to_string(), "");
    }
}
