// Spreadsheet I/O
//
// Report exports arrive in two container formats (legacy BIFF .xls and
// OOXML .xlsx). Both are exposed through one 1-based `(column, row)` grid.

pub mod cell;
pub mod grid;
pub mod workbook;

pub use cell::CellValue;
pub use grid::{CellGrid, MemoryGrid};
pub use workbook::{ContainerFormat, GridError, SheetGrid};
