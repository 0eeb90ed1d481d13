use std::fmt;

use gradebook_io::{CellValue, GridError};

/// Why a single report file could not be turned into a `Summary`.
///
/// `Display` is the reason shown to the user next to the file name.
#[derive(Debug)]
pub enum ReportError {
    /// The report-type marker cell does not hold this layout's title.
    InvalidResourceType,
    /// The class average footer is zero: the period is not finalized upstream.
    InconclusiveResource,
    /// A mark cell holds a token no known platform encoding produces.
    UnrecognizedMarkToken(String),
    /// A locator ran out of cells before finding its structural marker.
    StructuralScanFailure { what: &'static str, limit: u32 },
    /// A header cell (grade, period, dates) could not be interpreted.
    MalformedHeader { what: &'static str, column: u32, row: u32, value: String },
    /// An attendance cell is neither blank nor a whole count.
    InvalidAttendance { column: u32, row: u32, value: String },
    /// The file could not be opened as a workbook.
    Grid(GridError),
}

impl ReportError {
    pub(crate) fn malformed(what: &'static str, column: u32, row: u32, value: &CellValue) -> Self {
        Self::MalformedHeader { what, column, row, value: value.to_string() }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidResourceType => write!(f, "the report is not of the expected type"),
            Self::InconclusiveResource => write!(
                f,
                "the report is incomplete (class average is zero); make sure the period marks are finalized"
            ),
            Self::UnrecognizedMarkToken(token) => {
                write!(f, "cannot interpret mark '{token}'")
            }
            Self::StructuralScanFailure { what, limit } => {
                write!(f, "report layout not recognized: {what} not found within {limit} cells")
            }
            Self::MalformedHeader { what, column, row, value } => {
                write!(f, "cannot read {what} from cell ({column}, {row}): '{value}'")
            }
            Self::InvalidAttendance { column, row, value } => {
                write!(f, "attendance cell ({column}, {row}) holds '{value}', expected a count")
            }
            Self::Grid(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ReportError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
