//! Report parsing.
//!
//! One engine drives all three layouts; the differences live in
//! [`LayoutSpec`]. Parsing reads in a fixed order: report-type marker,
//! header cells, structural locators, completeness footer, then the pupil
//! rows. The first failure aborts the report.

mod header;

use chrono::NaiveDate;
use gradebook_config::settings::DEFAULT_SCAN_LIMIT;
use gradebook_config::Settings;
use gradebook_io::{CellGrid, CellValue};

use crate::error::ReportError;
use crate::layout::{GradeFormat, LayoutSpec, PeriodFormat, SubjectHeader};
use crate::locate::Locator;
use crate::mark::{self, Mark};
use crate::model::{Attendance, Layout, Pupil, Subject, Summary, TermType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Read per-subject marks. Off leaves every pupil's subject list empty.
    pub fetch_subjects: bool,
    /// Upper bound on cells visited by each structural scan.
    pub scan_limit: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { fetch_subjects: true, scan_limit: DEFAULT_SCAN_LIMIT }
    }
}

impl From<&Settings> for ParseOptions {
    fn from(settings: &Settings) -> Self {
        Self { fetch_subjects: settings.fetch_subjects, scan_limit: settings.scan_limit }
    }
}

struct Term {
    start: NaiveDate,
    end: NaiveDate,
    kind: Option<TermType>,
}

/// A mark column: which subject it belongs to and, for group reports, when
/// the mark was given.
struct MarkColumn {
    column: u32,
    subject: String,
    date: Option<NaiveDate>,
}

/// Parses one worksheet into a [`Summary`]. Holds no state between calls;
/// parsing the same grid twice yields equal summaries.
pub struct ReportParser<G: CellGrid> {
    grid: G,
    spec: LayoutSpec,
    options: ParseOptions,
}

impl<G: CellGrid> ReportParser<G> {
    pub fn new(grid: G, layout: Layout, options: ParseOptions) -> Self {
        Self::with_spec(grid, LayoutSpec::for_layout(layout), options)
    }

    pub fn with_spec(grid: G, spec: LayoutSpec, options: ParseOptions) -> Self {
        Self { grid, spec, options }
    }

    pub fn semester(grid: G, options: ParseOptions) -> Self {
        Self::with_spec(grid, LayoutSpec::semester(), options)
    }

    pub fn period(grid: G, options: ParseOptions) -> Self {
        Self::with_spec(grid, LayoutSpec::period(), options)
    }

    pub fn group(grid: G, options: ParseOptions) -> Self {
        Self::with_spec(grid, LayoutSpec::group(), options)
    }

    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    pub fn parse(&self) -> Result<Summary, ReportError> {
        // Checked first: a foreign report must not surface as a header error
        self.check_report_type()?;

        let grade_name = self.grade_name()?;
        let group_name = self.group_name()?;
        let term = self.term()?;

        let mut locator = Locator::new(&self.grid, &self.spec, self.options.scan_limit);
        let average_column = locator.average_column()?;
        let last_row = locator.last_pupil_row()?;

        if self.grid.get(average_column, last_row + 1).is_numeric_zero() {
            return Err(ReportError::InconclusiveResource);
        }

        let attendance_column = locator.attendance_column()?;

        let columns = if self.options.fetch_subjects {
            self.mark_columns(average_column, group_name.as_deref(), term.start)?
        } else {
            Vec::new()
        };

        let pupils = (self.spec.first_pupil_row..=last_row)
            .map(|row| self.pupil(row, &columns, average_column, attendance_column))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Summary {
            layout: self.spec.layout,
            grade_name,
            group_name,
            term_start: term.start,
            term_end: term.end,
            term_type: term.kind,
            pupils,
        })
    }

    // -----------------------------------------------------------------------
    // Header cells
    // -----------------------------------------------------------------------

    fn check_report_type(&self) -> Result<(), ReportError> {
        let at = self.spec.title_cell;
        match self.grid.get(at.column, at.row).as_text() {
            Some(text) if self.spec.title_matches(text) => Ok(()),
            _ => Err(ReportError::InvalidResourceType),
        }
    }

    fn grade_name(&self) -> Result<String, ReportError> {
        let at = self.spec.grade_cell;
        let value = self.grid.get(at.column, at.row);
        let label = match (&value, self.spec.grade_format) {
            (CellValue::Text(text), _) => strip_nonempty(text),
            (CellValue::Number(_), GradeFormat::Bare) => Some(value.to_string()),
            _ => None,
        };
        label
            .map(|l| Summary::normalize_grade_name(&l))
            .ok_or_else(|| ReportError::malformed("grade", at.column, at.row, &value))
    }

    fn group_name(&self) -> Result<Option<String>, ReportError> {
        let Some(at) = self.spec.group_cell else {
            return Ok(None);
        };
        let value = self.grid.get(at.column, at.row);
        match value.as_text().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(Some(name.to_string())),
            _ => Err(ReportError::malformed("group name", at.column, at.row, &value)),
        }
    }

    fn term(&self) -> Result<Term, ReportError> {
        let at = self.spec.period_cell;
        let value = self.grid.get(at.column, at.row);
        let text = value.as_text().unwrap_or_default();

        let term = match self.spec.period_format {
            PeriodFormat::SchoolYear => header::parse_school_year(text)
                .map(|(start, end, kind)| Term { start, end, kind: Some(kind) }),
            PeriodFormat::DateRange => header::parse_date_range(text)
                .map(|(start, end)| Term { start, end, kind: None }),
        };
        term.ok_or_else(|| ReportError::malformed("period", at.column, at.row, &value))
    }

    /// Subject names (or mark dates) for every column left of the average.
    fn mark_columns(
        &self,
        average_column: u32,
        group_name: Option<&str>,
        period_start: NaiveDate,
    ) -> Result<Vec<MarkColumn>, ReportError> {
        let row = self.spec.header_row;
        (self.spec.first_subject_column..average_column)
            .map(|column| -> Result<MarkColumn, ReportError> {
                let value = self.grid.get(column, row);
                match self.spec.subject_header {
                    SubjectHeader::Names => match value.as_text() {
                        Some(name) => Ok(MarkColumn { column, subject: name.trim().to_string(), date: None }),
                        None => Err(ReportError::malformed("subject name", column, row, &value)),
                    },
                    SubjectHeader::Dates => {
                        let date = value
                            .as_text()
                            .and_then(header::parse_month_day)
                            .and_then(|(m, d)| header::resolve_mark_date(m, d, period_start))
                            .ok_or_else(|| ReportError::malformed("mark date", column, row, &value))?;
                        Ok(MarkColumn {
                            column,
                            subject: group_name.unwrap_or_default().to_string(),
                            date: Some(date),
                        })
                    }
                }
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Pupil rows
    // -----------------------------------------------------------------------

    fn pupil(
        &self,
        row: u32,
        columns: &[MarkColumn],
        average_column: u32,
        attendance_column: u32,
    ) -> Result<Pupil, ReportError> {
        let name_value = self.grid.get(self.spec.name_column, row);
        let name = name_value.to_string().trim().to_string();
        if name.is_empty() {
            return Err(ReportError::malformed("pupil name", self.spec.name_column, row, &name_value));
        }

        let subjects = columns
            .iter()
            .map(|c| -> Result<Subject, ReportError> {
                let mark = mark::normalize(&self.grid.get(c.column, row), c.date)?;
                Ok(Subject { name: c.subject.clone(), mark })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let average = self.average(row, average_column)?;
        let attendance = self.attendance(row, attendance_column)?;

        Ok(Pupil { name, subjects, average, attendance })
    }

    fn average(&self, row: u32, column: u32) -> Result<Mark, ReportError> {
        mark::normalize(&self.grid.get(column, row), None)
    }

    fn attendance(&self, row: u32, first_column: u32) -> Result<Attendance, ReportError> {
        let [total, illness, other, unexcused] = self.spec.attendance_order;
        let count = |offset: u32| self.count(first_column + offset, row);
        Ok(Attendance {
            total_missed: count(total)?,
            excused_illness: count(illness)?,
            excused_other: count(other)?,
            unexcused: count(unexcused)?,
        })
    }

    fn count(&self, column: u32, row: u32) -> Result<u32, ReportError> {
        let value = self.grid.get(column, row);
        let count = match &value {
            CellValue::Empty => Some(0),
            CellValue::Number(n) if *n >= 0.0 => Some(n.trunc() as u32),
            CellValue::Number(_) => None,
            CellValue::Text(text) => text.trim().parse().ok(),
        };
        count.ok_or_else(|| ReportError::InvalidAttendance { column, row, value: value.to_string() })
    }
}

fn strip_nonempty(text: &str) -> Option<String> {
    let label = header::strip_label(text);
    (!label.is_empty()).then(|| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::MarkValue;
    use gradebook_io::MemoryGrid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Two pupils, three subjects, average in column 6, attendance 8..=11.
    fn semester_grid() -> MemoryGrid {
        let mut g = MemoryGrid::new();
        g.set(1, 2, "Ataskaita: Mokinių pasiekimų ir lankomumo suvestinė")
            .set(9, 1, "Klasė: 5")
            .set(9, 2, "Laikotarpis: 2020-2021m.m.II pusmetis")
            .set(7, 3, "Pažangumas")
            .set(8, 3, "Praleista pamokų")
            .set_row(3, 4, ["Matematika", "Etika", "Istorija"]);

        g.set(1, 14, 1.0).set(2, 14, "Jonaitis Jonas");
        g.set_row(3, 14, [CellValue::from(9.0), "įsk".into(), "8IN".into(), CellValue::from(8.5)]);
        g.set_row(8, 14, [12.0, 10.0, 2.0, 0.0]);

        g.set(1, 15, 2.0).set(2, 15, "Petraitė Ona");
        g.set_row(3, 15, [CellValue::from(10.0), "nsk".into(), "n".into(), CellValue::from(0.0)]);
        g.set_row(8, 15, [CellValue::from(3.0), CellValue::Empty, "1".into(), CellValue::from(2.0)]);

        g.set(1, 16, "Klasės vidurkis").set(6, 16, 8.1);
        g
    }

    fn period_grid() -> MemoryGrid {
        let mut g = MemoryGrid::new();
        g.set(1, 1, "Ataskaita: Mokinių vidurkių suvestinė ")
            .set(5, 1, "Klasė: 5a, ")
            .set(7, 1, "2021-09-01 - 2021-12-31")
            .set(6, 2, "Vidurkis")
            .set_row(4, 3, ["Matematika", "Fizika"]);

        g.set(1, 12, 1.0).set(2, 12, "Jonaitis Jonas").set_row(4, 12, [9.0, 8.0, 8.5]);
        g.set(1, 13, 2.0).set(2, 13, "Petraitė Ona").set_row(4, 13, [7.0, 7.0, 7.0]);
        g.set(1, 14, "Iš viso").set(6, 14, 7.75);
        g
    }

    fn group_grid() -> MemoryGrid {
        let mut g = MemoryGrid::new();
        g.set(1, 1, "Ataskaita pagal grupę")
            .set(4, 3, "2021-09-01 - 2022-01-31")
            .set(4, 5, 7.0)
            .set(4, 7, "Matematika 7a")
            .set_row(6, 17, ["09\n15", "01\n10", "Vidurkis"]);

        g.set(1, 18, 1.0).set(2, 18, "Jonaitis Jonas").set_row(6, 18, [9.0, 7.0, 8.0]);
        // illness, other, total, unexcused
        g.set_row(9, 18, [4.0, 1.0, 6.0, 1.0]);
        g.set(1, 19, 2.0).set(2, 19, "Petraitė Ona");
        g.set_row(6, 19, [CellValue::from("nk"), CellValue::from(10.0), CellValue::from(10.0)]);
        g
    }

    #[test]
    fn parses_semester_report() {
        let summary = ReportParser::semester(semester_grid(), ParseOptions::default())
            .parse()
            .unwrap();

        assert_eq!(summary.layout, Layout::Semester);
        assert_eq!(summary.grade_name, "5 klasė");
        assert_eq!(summary.grade_name_as_int(), 5);
        assert_eq!(summary.term_type, Some(TermType::HalfYear(2)));
        assert_eq!(summary.term_start, date(2020, 1, 1));
        assert_eq!(summary.term_end, date(2021, 1, 1));
        assert_eq!(summary.representable_name(), "5 kl.\nII pusmetis\n(2020-2021)");
        assert_eq!(summary.pupils.len(), 2);

        let jonas = &summary.pupils[0];
        assert_eq!(jonas.name, "Jonaitis Jonas");
        let names: Vec<_> = jonas.subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Matematika", "Etika", "Istorija"]);
        assert_eq!(jonas.subjects[1].mark.value, MarkValue::Binary(true));
        assert_eq!(jonas.subjects[2].mark.value, MarkValue::Numeric(8.0));
        assert_eq!(jonas.average.value, MarkValue::Numeric(8.5));
        assert_eq!(
            jonas.attendance,
            Attendance { total_missed: 12, excused_illness: 10, excused_other: 2, unexcused: 0 }
        );

        let ona = &summary.pupils[1];
        assert!(ona.average.is_absent());
        assert_eq!(ona.subjects[2].mark.value, MarkValue::Absent);
        assert_eq!(
            ona.attendance,
            Attendance { total_missed: 3, excused_illness: 0, excused_other: 1, unexcused: 2 }
        );
    }

    #[test]
    fn zero_footer_is_inconclusive() {
        let mut grid = semester_grid();
        grid.set(6, 16, 0.0);
        let err = ReportParser::semester(grid, ParseOptions::default()).parse().unwrap_err();
        assert!(matches!(err, ReportError::InconclusiveResource));
    }

    #[test]
    fn wrong_report_type_is_checked_before_headers() {
        let mut grid = semester_grid();
        grid.set(1, 2, "Ataskaita: Kita").set(9, 2, "garbage");
        let err = ReportParser::semester(grid, ParseOptions::default()).parse().unwrap_err();
        assert!(matches!(err, ReportError::InvalidResourceType));

        // a group report handed to the period parser
        let err = ReportParser::period(group_grid(), ParseOptions::default()).parse().unwrap_err();
        assert!(matches!(err, ReportError::InvalidResourceType));
    }

    #[test]
    fn unknown_mark_token_aborts() {
        let mut grid = semester_grid();
        grid.set(3, 15, "x");
        match ReportParser::semester(grid, ParseOptions::default()).parse() {
            Err(ReportError::UnrecognizedMarkToken(token)) => assert_eq!(token, "x"),
            other => panic!("expected UnrecognizedMarkToken, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_attendance_is_rejected() {
        let mut grid = semester_grid();
        grid.set(9, 14, "daug");
        match ReportParser::semester(grid, ParseOptions::default()).parse() {
            Err(ReportError::InvalidAttendance { column, row, value }) => {
                assert_eq!((column, row), (9, 14));
                assert_eq!(value, "daug");
            }
            other => panic!("expected InvalidAttendance, got {other:?}"),
        }
    }

    #[test]
    fn malformed_period_names_the_cell() {
        let mut grid = semester_grid();
        grid.set(9, 2, "Laikotarpis: nežinomas");
        match ReportParser::semester(grid, ParseOptions::default()).parse() {
            Err(ReportError::MalformedHeader { what, column, row, .. }) => {
                assert_eq!(what, "period");
                assert_eq!((column, row), (9, 2));
            }
            other => panic!("expected MalformedHeader, got {other:?}"),
        }
    }

    #[test]
    fn parsing_is_deterministic() {
        let options = ParseOptions::default();
        let parser = ReportParser::semester(semester_grid(), options);
        assert_eq!(parser.parse().unwrap(), parser.parse().unwrap());
        let parser = ReportParser::period(period_grid(), options);
        assert_eq!(parser.parse().unwrap(), parser.parse().unwrap());
        let parser = ReportParser::group(group_grid(), options);
        assert_eq!(parser.parse().unwrap(), parser.parse().unwrap());
    }

    #[test]
    fn subjects_can_be_skipped() {
        let options = ParseOptions { fetch_subjects: false, ..ParseOptions::default() };
        let summary = ReportParser::semester(semester_grid(), options).parse().unwrap();
        assert!(summary.pupils.iter().all(|p| p.subjects.is_empty()));
        assert_eq!(summary.pupils[0].average.as_number(), Some(8.5));
    }

    #[test]
    fn parses_period_report() {
        let summary = ReportParser::period(period_grid(), ParseOptions::default())
            .parse()
            .unwrap();

        assert_eq!(summary.layout, Layout::Period);
        assert_eq!(summary.grade_name, "5a");
        assert_eq!(summary.term_type, None);
        assert_eq!(summary.representable_name(), "09-01 - 12-31");
        assert_eq!(summary.full_representable_name(), "2021-09-01 - 2021-12-31");
        assert_eq!(summary.pupils.len(), 2);
        assert_eq!(summary.pupils[0].subjects.len(), 2);
        assert_eq!(summary.pupils[0].subjects[1].name, "Fizika");
        assert_eq!(summary.pupils[1].average.as_number(), Some(7.0));
        // no attendance cells: every count is zero
        assert_eq!(summary.pupils[0].attendance, Attendance::default());
    }

    #[test]
    fn period_title_needs_its_trailing_char() {
        let mut grid = period_grid();
        grid.set(1, 1, "Ataskaita: Mokinių vidurkių suvestinė");
        let err = ReportParser::period(grid, ParseOptions::default()).parse().unwrap_err();
        assert!(matches!(err, ReportError::InvalidResourceType));
    }

    #[test]
    fn parses_group_report() {
        let summary = ReportParser::group(group_grid(), ParseOptions::default())
            .parse()
            .unwrap();

        assert_eq!(summary.layout, Layout::Group);
        assert_eq!(summary.grade_name, "7 klasė");
        assert_eq!(summary.group_name.as_deref(), Some("Matematika 7a"));
        assert_eq!(summary.pupils.len(), 2);

        let jonas = &summary.pupils[0];
        assert!(jonas.subjects.iter().all(|s| s.name == "Matematika 7a"));
        assert_eq!(jonas.subjects[0].mark.date, Some(date(2021, 9, 15)));
        assert_eq!(jonas.subjects[1].mark.date, Some(date(2022, 1, 10)));
        assert_eq!(jonas.average.as_number(), Some(8.0));
        assert_eq!(
            jonas.attendance,
            Attendance { total_missed: 6, excused_illness: 4, excused_other: 1, unexcused: 1 }
        );
        assert_eq!(jonas.valid_marks_for_month(1).len(), 1);

        let ona = &summary.pupils[1];
        assert!(ona.subjects[0].mark.is_absent());
        assert_eq!(ona.marks_for_month(9).len(), 1);
        assert!(ona.valid_marks_for_month(9).is_empty());
    }

    #[test]
    fn leap_day_mark_in_the_spring_half() {
        let mut grid = group_grid();
        grid.set(4, 3, "2023-09-01 - 2024-06-30").set(7, 17, "02\n29");
        let summary = ReportParser::group(grid, ParseOptions::default()).parse().unwrap();

        let jonas = &summary.pupils[0];
        assert_eq!(jonas.subjects[0].mark.date, Some(date(2023, 9, 15)));
        assert_eq!(jonas.subjects[1].mark.date, Some(date(2024, 2, 29)));
        assert_eq!(jonas.valid_marks_for_month(2).len(), 1);
    }

    #[test]
    fn bad_mark_date_is_a_header_error() {
        let mut grid = group_grid();
        grid.set(7, 17, "02\n30");
        match ReportParser::group(grid, ParseOptions::default()).parse() {
            Err(ReportError::MalformedHeader { what, .. }) => assert_eq!(what, "mark date"),
            other => panic!("expected MalformedHeader, got {other:?}"),
        }
    }
}
