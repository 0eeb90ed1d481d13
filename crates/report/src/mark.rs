// Raw cell → canonical mark.
//
// The platform writes 0 where it has no data; a zero is never a grade.

use chrono::NaiveDate;
use gradebook_io::CellValue;
use serde::Serialize;

use crate::error::ReportError;

/// "įskaityta": course passed.
pub const PASSED: &str = "įsk";
/// "neįskaityta": course not passed.
pub const NOT_PASSED: &str = "nsk";
/// "atleistas": pupil exempt from the subject.
pub const EXEMPT: &str = "atl";
/// Absence markers: absent, absent (illness), late.
pub const ABSENCE_MARKERS: [&str; 3] = ["n", "nk", "nl"];
/// Individualised / adapted programme decorations appended to a mark.
pub const PROGRAM_SUFFIXES: [&str; 2] = ["IN", "PR"];

const HOUR_SUFFIXES: [&str; 2] = ["val.", "val"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkValue {
    Numeric(f64),
    Binary(bool),
    Absent,
}

/// A normalized evaluation, optionally stamped with the day it was given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mark {
    pub value: MarkValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl Mark {
    pub fn new(value: MarkValue) -> Self {
        Self { value, date: None }
    }

    pub fn absent() -> Self {
        Self::new(MarkValue::Absent)
    }

    pub fn is_absent(&self) -> bool {
        self.value == MarkValue::Absent
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            MarkValue::Numeric(n) => Some(n),
            _ => None,
        }
    }
}

/// Convert a raw mark cell. Unknown text is an error, never a guess.
pub fn normalize(raw: &CellValue, date: Option<NaiveDate>) -> Result<Mark, ReportError> {
    let value = match raw {
        CellValue::Empty => MarkValue::Absent,
        CellValue::Number(n) if *n == 0.0 => MarkValue::Absent,
        CellValue::Number(n) => MarkValue::Numeric(*n),
        CellValue::Text(text) => normalize_text(text)?,
    };
    Ok(Mark { value, date })
}

fn normalize_text(text: &str) -> Result<MarkValue, ReportError> {
    if text == "-"
        || text == EXEMPT
        || ABSENCE_MARKERS.contains(&text)
        || HOUR_SUFFIXES.iter().any(|s| text.ends_with(s))
    {
        return Ok(MarkValue::Absent);
    }

    let token = strip_program_suffixes(text);
    match token {
        PASSED => return Ok(MarkValue::Binary(true)),
        NOT_PASSED => return Ok(MarkValue::Binary(false)),
        EXEMPT => return Ok(MarkValue::Absent),
        _ => {}
    }

    match parse_unsigned_decimal(token) {
        Some(n) if n == 0.0 => Ok(MarkValue::Absent),
        Some(n) => Ok(MarkValue::Numeric(n)),
        None => Err(ReportError::UnrecognizedMarkToken(text.to_string())),
    }
}

/// Remove any trailing run of programme decorations, in any order.
fn strip_program_suffixes(mut token: &str) -> &str {
    while let Some(stripped) = PROGRAM_SUFFIXES.iter().find_map(|s| token.strip_suffix(*s)) {
        token = stripped;
    }
    token
}

/// Digits with at most one decimal point. No sign, no exponent, no spaces.
fn parse_unsigned_decimal(token: &str) -> Option<f64> {
    let mut dots = 0;
    let mut digits = 0;
    for c in token.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    token.parse().ok()
}
