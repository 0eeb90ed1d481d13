// Workbook loading for report exports.
//
// The container format is chosen from the leading bytes, never from the
// file extension: the platform has shipped .xls files that are really OOXML.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Range, Reader, Xls, Xlsx};

use crate::cell::CellValue;
use crate::grid::CellGrid;

/// ZIP local file header; every OOXML package starts with one.
const ARCHIVE_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE2 compound document header used by legacy BIFF workbooks.
const COMPOUND_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

#[derive(Debug)]
pub enum GridError {
    /// The file could not be read.
    Io(String),
    /// Leading bytes match neither supported container.
    UnknownFormat,
    /// The container was recognized but the workbook could not be opened.
    Open { format: ContainerFormat, message: String },
    /// The workbook has no worksheets.
    NoSheets,
    /// The first worksheet could not be decoded.
    Sheet(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "cannot read file: {msg}"),
            Self::UnknownFormat => write!(f, "not an Excel workbook (unrecognized file signature)"),
            Self::Open { format, message } => write!(f, "failed to open {format} workbook: {message}"),
            Self::NoSheets => write!(f, "workbook contains no sheets"),
            Self::Sheet(msg) => write!(f, "failed to read first sheet: {msg}"),
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// BIFF8 inside an OLE2 compound document (.xls)
    LegacyBinary,
    /// Office Open XML package (.xlsx)
    OpenXml,
}

impl ContainerFormat {
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&ARCHIVE_SIGNATURE) {
            Some(Self::OpenXml)
        } else if bytes.starts_with(&COMPOUND_SIGNATURE) {
            Some(Self::LegacyBinary)
        } else {
            None
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyBinary => write!(f, "xls"),
            Self::OpenXml => write!(f, "xlsx"),
        }
    }
}

/// The first worksheet of a workbook, decoded eagerly.
///
/// The file is read into memory and released before decoding, so a
/// `SheetGrid` never holds an open file handle.
#[derive(Debug, Clone)]
pub struct SheetGrid {
    format: ContainerFormat,
    range: Range<Data>,
}

impl SheetGrid {
    pub fn open(path: &Path) -> Result<Self, GridError> {
        let bytes = std::fs::read(path).map_err(|e| GridError::Io(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, GridError> {
        let format = ContainerFormat::detect(&bytes).ok_or(GridError::UnknownFormat)?;
        let cursor = Cursor::new(bytes);

        let range = match format {
            ContainerFormat::OpenXml => {
                let mut workbook: Xlsx<_> = Xlsx::new(cursor)
                    .map_err(|e| GridError::Open { format, message: e.to_string() })?;
                workbook
                    .worksheet_range_at(0)
                    .ok_or(GridError::NoSheets)?
                    .map_err(|e| GridError::Sheet(e.to_string()))?
            }
            ContainerFormat::LegacyBinary => {
                let mut workbook: Xls<_> = Xls::new(cursor)
                    .map_err(|e| GridError::Open { format, message: e.to_string() })?;
                workbook
                    .worksheet_range_at(0)
                    .ok_or(GridError::NoSheets)?
                    .map_err(|e| GridError::Sheet(e.to_string()))?
            }
        };

        Ok(Self { format, range })
    }

    pub fn format(&self) -> ContainerFormat {
        self.format
    }
}

impl CellGrid for SheetGrid {
    fn get(&self, column: u32, row: u32) -> CellValue {
        if column == 0 || row == 0 {
            return CellValue::Empty;
        }
        // calamine addresses (row, col), 0-based and absolute
        self.range
            .get_value((row - 1, column - 1))
            .map(CellValue::from)
            .unwrap_or(CellValue::Empty)
    }
}
