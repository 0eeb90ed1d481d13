// Fixed cell geometry of each export layout.
//
// All positions are 1-based (column, row), the way the exports are read
// when opened in a spreadsheet. Nothing here is configurable: the platform
// owns these shapes.

use crate::model::Layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub column: u32,
    pub row: u32,
}

const fn at(column: u32, row: u32) -> Position {
    Position { column, row }
}

/// How the report-type marker cell is compared to the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleMatch {
    Exact,
    /// The platform appends one varying character to the title
    IgnoringLastChar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeFormat {
    /// "Klasė: 5" style text
    Labelled,
    /// A bare number or text
    Bare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFormat {
    /// "Laikotarpis: 2020-2021m.m.II pusmetis"
    SchoolYear,
    /// "2021-09-01 - 2021-12-31"
    DateRange,
}

/// What the average-column probe looks for along its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AverageProbe {
    FirstNonEmpty,
    Text(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceColumn {
    /// Second text cell in this row, right of the average column
    SecondTextInRow(u32),
    /// Directly right of the average column
    AfterAverage,
}

/// What the per-column header row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectHeader {
    /// One subject per column, named in the header row
    Names,
    /// One dated mark per column ("MM\nDD"); the subject is the group
    Dates,
}

/// Cell value in the probe column that ends the pupil block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTerminator {
    FirstText,
    FirstEmpty,
}

/// Offsets from the attendance column, in the order
/// total, excused by illness, excused otherwise, unexcused.
pub type AttendanceOrder = [u32; 4];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSpec {
    pub layout: Layout,
    pub title: &'static str,
    pub title_cell: Position,
    pub title_match: TitleMatch,
    pub grade_cell: Position,
    pub grade_format: GradeFormat,
    pub group_cell: Option<Position>,
    pub period_cell: Position,
    pub period_format: PeriodFormat,
    /// Row scanned for the average marker, and the first column scanned
    pub average_probe_at: Position,
    pub average_probe: AverageProbe,
    /// Average column = probe hit + offset
    pub average_offset: i32,
    pub attendance_column: AttendanceColumn,
    pub attendance_order: AttendanceOrder,
    pub header_row: u32,
    pub first_subject_column: u32,
    pub subject_header: SubjectHeader,
    pub first_pupil_row: u32,
    /// Column scanned downwards for the end of the pupil block
    pub probe_column: u32,
    pub terminator: RowTerminator,
    pub name_column: u32,
}

impl LayoutSpec {
    pub fn for_layout(layout: Layout) -> Self {
        match layout {
            Layout::Semester => Self::semester(),
            Layout::Period => Self::period(),
            Layout::Group => Self::group(),
        }
    }

    pub fn semester() -> Self {
        Self {
            layout: Layout::Semester,
            title: "Ataskaita: Mokinių pasiekimų ir lankomumo suvestinė",
            title_cell: at(1, 2),
            title_match: TitleMatch::Exact,
            grade_cell: at(9, 1),
            grade_format: GradeFormat::Labelled,
            group_cell: None,
            period_cell: at(9, 2),
            period_format: PeriodFormat::SchoolYear,
            average_probe_at: at(4, 3),
            average_probe: AverageProbe::FirstNonEmpty,
            average_offset: -1,
            attendance_column: AttendanceColumn::SecondTextInRow(3),
            attendance_order: [0, 1, 2, 3],
            header_row: 4,
            first_subject_column: 3,
            subject_header: SubjectHeader::Names,
            first_pupil_row: 14,
            probe_column: 1,
            terminator: RowTerminator::FirstText,
            name_column: 2,
        }
    }

    pub fn period() -> Self {
        Self {
            layout: Layout::Period,
            title: "Ataskaita: Mokinių vidurkių suvestinė",
            title_cell: at(1, 1),
            title_match: TitleMatch::IgnoringLastChar,
            grade_cell: at(5, 1),
            grade_format: GradeFormat::Labelled,
            group_cell: None,
            period_cell: at(7, 1),
            period_format: PeriodFormat::DateRange,
            average_probe_at: at(5, 2),
            average_probe: AverageProbe::FirstNonEmpty,
            average_offset: 0,
            attendance_column: AttendanceColumn::AfterAverage,
            attendance_order: [0, 1, 2, 3],
            header_row: 3,
            first_subject_column: 4,
            subject_header: SubjectHeader::Names,
            first_pupil_row: 12,
            probe_column: 1,
            terminator: RowTerminator::FirstText,
            name_column: 2,
        }
    }

    pub fn group() -> Self {
        Self {
            layout: Layout::Group,
            title: "Ataskaita pagal grupę",
            title_cell: at(1, 1),
            title_match: TitleMatch::Exact,
            grade_cell: at(4, 5),
            grade_format: GradeFormat::Bare,
            group_cell: Some(at(4, 7)),
            period_cell: at(4, 3),
            period_format: PeriodFormat::DateRange,
            average_probe_at: at(5, 17),
            average_probe: AverageProbe::Text("Vidurkis"),
            average_offset: 0,
            attendance_column: AttendanceColumn::AfterAverage,
            attendance_order: [2, 0, 1, 3],
            header_row: 17,
            first_subject_column: 6,
            subject_header: SubjectHeader::Dates,
            first_pupil_row: 18,
            probe_column: 1,
            terminator: RowTerminator::FirstEmpty,
            name_column: 2,
        }
    }

    pub fn title_matches(&self, text: &str) -> bool {
        match self.title_match {
            TitleMatch::Exact => text == self.title,
            TitleMatch::IgnoringLastChar => {
                let mut chars = text.chars();
                chars.next_back().is_some() && chars.as_str() == self.title
            }
        }
    }
}
