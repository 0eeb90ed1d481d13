// Structural locators.
//
// The exports move columns around depending on how many subjects a class
// has, so the average column, the attendance block and the end of the
// pupil block are found by scanning. Every scan is bounded; results are
// computed once per parse.

use gradebook_io::CellGrid;

use crate::error::ReportError;
use crate::layout::{AttendanceColumn, AverageProbe, LayoutSpec, RowTerminator};

pub struct Locator<'a, G: CellGrid> {
    grid: &'a G,
    spec: &'a LayoutSpec,
    limit: u32,
    average_column: Option<u32>,
    last_pupil_row: Option<u32>,
    attendance_column: Option<u32>,
}

impl<'a, G: CellGrid> Locator<'a, G> {
    pub fn new(grid: &'a G, spec: &'a LayoutSpec, limit: u32) -> Self {
        Self {
            grid,
            spec,
            limit,
            average_column: None,
            last_pupil_row: None,
            attendance_column: None,
        }
    }

    /// Column holding each pupil's period average. Subject columns end
    /// just before it.
    pub fn average_column(&mut self) -> Result<u32, ReportError> {
        if let Some(column) = self.average_column {
            return Ok(column);
        }

        let probe = self.spec.average_probe_at;
        let hit = (0..self.limit)
            .map_while(|i| probe.column.checked_add(i))
            .find(|&column| {
                let value = self.grid.get(column, probe.row);
                match self.spec.average_probe {
                    AverageProbe::FirstNonEmpty => !value.is_empty(),
                    AverageProbe::Text(marker) => value.as_text() == Some(marker),
                }
            })
            .ok_or_else(|| self.failure("average column marker"))?;

        let column = hit
            .checked_add_signed(self.spec.average_offset)
            .filter(|c| *c > 0)
            .ok_or_else(|| self.failure("average column marker"))?;

        log::trace!("{}: average column {column}", self.spec.layout);
        self.average_column = Some(column);
        Ok(column)
    }

    /// Last row of the pupil block. Returns `first_pupil_row - 1` when the
    /// block is empty.
    pub fn last_pupil_row(&mut self) -> Result<u32, ReportError> {
        if let Some(row) = self.last_pupil_row {
            return Ok(row);
        }

        let first = self.spec.first_pupil_row;
        let terminator = (0..self.limit)
            .map_while(|i| first.checked_add(i))
            .find(|&row| {
                let value = self.grid.get(self.spec.probe_column, row);
                match self.spec.terminator {
                    RowTerminator::FirstText => value.is_text(),
                    RowTerminator::FirstEmpty => value.is_empty(),
                }
            })
            .ok_or_else(|| self.failure("end of pupil list"))?;

        let row = terminator - 1;
        log::trace!("{}: last pupil row {row}", self.spec.layout);
        self.last_pupil_row = Some(row);
        Ok(row)
    }

    /// First of the four attendance columns.
    pub fn attendance_column(&mut self) -> Result<u32, ReportError> {
        if let Some(column) = self.attendance_column {
            return Ok(column);
        }

        let average = self.average_column()?;
        let column = match self.spec.attendance_column {
            AttendanceColumn::AfterAverage => average
                .checked_add(1)
                .ok_or_else(|| self.failure("attendance columns"))?,
            AttendanceColumn::SecondTextInRow(row) => (0..self.limit)
                .map_while(|i| average.checked_add(1)?.checked_add(i))
                .filter(|&column| self.grid.get(column, row).is_text())
                .nth(1)
                .ok_or_else(|| self.failure("attendance columns"))?,
        };

        self.attendance_column = Some(column);
        Ok(column)
    }

    fn failure(&self, what: &'static str) -> ReportError {
        ReportError::StructuralScanFailure { what, limit: self.limit }
    }
}
