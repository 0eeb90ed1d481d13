use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::mark::Mark;
use crate::subject::SubjectClassifier;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// The three export shapes the platform produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Class report for a semester/trimester (or the whole year)
    Semester,
    /// Class report of averages for a custom date range
    Period,
    /// Per-group (single subject) report with dated marks
    Group,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Semester => write!(f, "semester"),
            Self::Period => write!(f, "period"),
            Self::Group => write!(f, "group"),
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semester" => Ok(Self::Semester),
            "period" => Ok(Self::Period),
            "group" => Ok(Self::Group),
            other => Err(format!("unknown layout '{other}' (expected semester, period or group)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Pupil data
// ---------------------------------------------------------------------------

/// Missed lessons for one pupil in one period. Counts are independent;
/// the platform does not guarantee they add up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Attendance {
    pub total_missed: u32,
    pub excused_illness: u32,
    pub excused_other: u32,
    pub unexcused: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subject {
    pub name: String,
    pub mark: Mark,
}

impl Subject {
    pub fn is_module(&self) -> bool {
        SubjectClassifier::is_module(&self.name)
    }

    pub fn generic_name(&self) -> String {
        SubjectClassifier::generic_name(&self.name)
    }
}

/// Pupil identity across reports. The exports carry no stable ID, so this
/// is the full name with whitespace normalized; namesakes collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PupilKey(String);

impl PupilKey {
    pub fn new(name: &str) -> Self {
        Self(name.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PupilKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pupil {
    /// As exported: surname first
    pub name: String,
    pub subjects: Vec<Subject>,
    /// The period average
    pub average: Mark,
    pub attendance: Attendance,
}

impl Pupil {
    pub fn key(&self) -> PupilKey {
        PupilKey::new(&self.name)
    }

    /// Name with the given name first.
    pub fn sane_name(&self) -> String {
        self.name.split(' ').rev().collect::<Vec<_>>().join(" ")
    }

    pub fn sorted_subjects(&self) -> Vec<&Subject> {
        let mut subjects: Vec<&Subject> = self.subjects.iter().collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        subjects
    }

    /// Dated marks given in `month` (group reports only; undated marks never match).
    pub fn marks_for_month(&self, month: u32) -> Vec<&Mark> {
        self.subjects
            .iter()
            .map(|s| &s.mark)
            .filter(|m| m.date.is_some_and(|d| d.month() == month))
            .collect()
    }

    pub fn valid_marks_for_month(&self, month: u32) -> Vec<&Mark> {
        self.marks_for_month(month)
            .into_iter()
            .filter(|m| !m.is_absent())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Term type (semester layout)
// ---------------------------------------------------------------------------

/// Which part of the school year a semester-layout report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TermType {
    Trimester(u8),
    HalfYear(u8),
    Annual,
}

const ANNUAL: &str = "metinis";
const HALF_YEAR: &str = "pusmetis";
const TRIMESTER: &str = "trimestras";
const ROMAN: [&str; 4] = ["I", "II", "III", "IV"];

impl TermType {
    /// Parse the export's term label: `I`, `II pusmetis`, `III trimestras`, `metinis`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw == ANNUAL {
            return Some(Self::Annual);
        }
        let (numeral, rest) = raw.split_once(' ').unwrap_or((raw, ""));
        let ordinal = ROMAN.iter().position(|r| *r == numeral)? as u8 + 1;
        match rest.trim() {
            "" | TRIMESTER => Some(Self::Trimester(ordinal)),
            HALF_YEAR => Some(Self::HalfYear(ordinal)),
            _ => None,
        }
    }

    /// I → 1, II → 2, ...; -1 for the annual report.
    pub fn as_int(&self) -> i32 {
        match self {
            Self::Trimester(n) | Self::HalfYear(n) => *n as i32,
            Self::Annual => -1,
        }
    }

    pub fn is_annual(&self) -> bool {
        matches!(self, Self::Annual)
    }

    pub fn period_name(&self) -> String {
        match self {
            Self::Trimester(n) => format!("{} {TRIMESTER}", roman(*n)),
            Self::HalfYear(n) => format!("{} {HALF_YEAR}", roman(*n)),
            Self::Annual => ANNUAL.to_string(),
        }
    }
}

fn roman(n: u8) -> &'static str {
    ROMAN.get(usize::from(n).saturating_sub(1)).copied().unwrap_or("?")
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Gymnasium grades are written in roman numerals and follow grade 8.
const GYMNASIUM_GRADES: [(&str, i32); 4] = [("I", 9), ("II", 10), ("III", 11), ("IV", 12)];

const GRADE_SUFFIX: &str = "klasė";

/// One parsed report. Built once by a parser, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub layout: Layout,
    pub grade_name: String,
    /// Group reports only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    pub term_start: NaiveDate,
    pub term_end: NaiveDate,
    /// Semester reports only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_type: Option<TermType>,
    pub pupils: Vec<Pupil>,
}

impl Summary {
    /// Plain numeric grades ("5") read as "5 klasė"; gymnasium grades stay as-is.
    pub fn normalize_grade_name(label: &str) -> String {
        let label = label.trim();
        if !label.is_empty() && label.chars().all(|c| c.is_ascii_digit()) {
            format!("{label} {GRADE_SUFFIX}")
        } else {
            label.to_string()
        }
    }

    /// Leading grade token as a number; gymnasium I–IV map to 9–12, else -1.
    pub fn grade_name_as_int(&self) -> i32 {
        let token = self.grade_name.split(' ').next().unwrap_or("");
        token.parse().unwrap_or_else(|_| {
            GYMNASIUM_GRADES
                .iter()
                .find(|(roman, _)| *roman == token)
                .map(|(_, grade)| *grade)
                .unwrap_or(-1)
        })
    }

    /// School years covered, e.g. "2020-2021".
    pub fn period(&self) -> String {
        format!("{}-{}", self.term_start.year(), self.term_end.year())
    }

    /// Label that identifies the period; two reports with equal labels are
    /// the same submission.
    pub fn representable_name(&self) -> String {
        match &self.term_type {
            Some(term) => format!(
                "{} kl.\n{}\n({})",
                self.grade_name_as_int(),
                term.period_name(),
                self.period()
            ),
            None => format!(
                "{} - {}",
                self.term_start.format("%m-%d"),
                self.term_end.format("%m-%d")
            ),
        }
    }

    pub fn full_representable_name(&self) -> String {
        format!(
            "{} - {}",
            self.term_start.format("%Y-%m-%d"),
            self.term_end.format("%Y-%m-%d")
        )
    }
}

/// Order summaries by period start, then by term within the same year.
///
/// The batch aggregator keeps input order; callers sort explicitly.
pub fn sort_chronologically(summaries: &mut [Summary]) {
    summaries.sort_by_key(|s| (s.term_start, s.term_type.map(|t| t.as_int()).unwrap_or(0)));
}
