use std::collections::HashMap;

use crate::cell::CellValue;

/// Read-only, coordinate-addressed view of a single worksheet.
///
/// Coordinates are 1-based `(column, row)`. Reads outside the populated
/// region (including column or row 0) return `CellValue::Empty`; callers
/// scan past the data and stop on value shape, never on bounds errors.
pub trait CellGrid {
    fn get(&self, column: u32, row: u32) -> CellValue;
}

impl<G: CellGrid + ?Sized> CellGrid for &G {
    fn get(&self, column: u32, row: u32) -> CellValue {
        (**self).get(column, row)
    }
}

/// Sparse in-memory grid. Used for grids assembled by hand (tests, callers
/// that already hold decoded cell data).
#[derive(Debug, Default, Clone)]
pub struct MemoryGrid {
    cells: HashMap<(u32, u32), CellValue>,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: u32, row: u32, value: impl Into<CellValue>) -> &mut Self {
        let value = value.into();
        if value.is_empty() {
            self.cells.remove(&(column, row));
        } else {
            self.cells.insert((column, row), value);
        }
        self
    }

    /// Write a run of values rightward starting at `(column, row)`.
    pub fn set_row<V: Into<CellValue>>(
        &mut self,
        column: u32,
        row: u32,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        for (i, value) in values.into_iter().enumerate() {
            self.set(column + i as u32, row, value);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl CellGrid for MemoryGrid {
    fn get(&self, column: u32, row: u32) -> CellValue {
        self.cells.get(&(column, row)).cloned().unwrap_or(CellValue::Empty)
    }
}
