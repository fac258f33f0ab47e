//! Score posting: month/category targeting and the posting pipeline.
//!
//! A posting run is locate → evaluate → write: find the employee's row via
//! the name columns, run the entry's formula over the export rows, then
//! write the result into the month column of the first matching category row.

use tracing::{debug, warn};

use tallysheet_engine::engine::{Engine, create_engine, evaluate};
use tallysheet_engine::value::CellValue;

use crate::entry::Entry;
use crate::error::{Result, TallyError};
use crate::layout::WorkbookLayout;
use crate::locate::locate_name;
use crate::month::month_offset;
use crate::workbook::{Workbook, cell_text};

/// Sentinel employee name that fans a posting run out over every employee.
pub const ALL_EMPLOYEES: &str = "Alle";

/// Cell a score was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteTarget {
    pub row: usize,
    pub col: usize,
}

/// First row at or below `start_row` whose trimmed category matches.
pub fn find_category_row(categories: &[String], target: &str, start_row: usize) -> Option<usize> {
    categories
        .iter()
        .enumerate()
        .skip(start_row)
        .find(|(_, category)| category.trim() == target)
        .map(|(idx, _)| idx)
}

/// Write `value` into the month column of the first matching category row.
///
/// `write_cell` is invoked exactly once, with the destination row/column;
/// on any error no write happens. Re-running with identical inputs against
/// an unmutated sheet overwrites the same cell (last write wins).
pub fn write_score(
    categories: &[String],
    target_category: &str,
    start_row: usize,
    month: &str,
    value: &CellValue,
    layout: &WorkbookLayout,
    mut write_cell: impl FnMut(usize, usize, &CellValue) -> Result<()>,
) -> Result<WriteTarget> {
    let month_col = month_offset(month).ok_or_else(|| TallyError::UnknownMonth {
        month: month.to_string(),
    })?;
    let category_row = find_category_row(categories, target_category, start_row).ok_or_else(|| {
        TallyError::CategoryNotFound {
            category: target_category.to_string(),
            start_row,
        }
    })?;

    let target = WriteTarget {
        row: category_row + layout.score_row_offset,
        col: month_col + layout.month_start_col,
    };
    write_cell(target.row, target.col, value)?;
    Ok(target)
}

/// Outcome of a posting run. Batch runs can post some employees and skip
/// others; single runs produce exactly one posted employee.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub posted: Vec<(String, WriteTarget)>,
    pub skipped: Vec<(String, TallyError)>,
}

/// Runs the locate → evaluate → write pipeline against a workbook.
///
/// Every run re-reads the name columns and re-scans from scratch; row
/// positions are never cached across runs.
pub struct Poster<'a, W: Workbook> {
    workbook: &'a mut W,
    layout: &'a WorkbookLayout,
    engine: Engine,
}

impl<'a, W: Workbook> Poster<'a, W> {
    pub fn new(workbook: &'a mut W, layout: &'a WorkbookLayout) -> Self {
        Poster {
            workbook,
            layout,
            engine: create_engine(),
        }
    }

    /// Unique employee names from the export sheet, in first-seen order.
    pub fn employee_names(&mut self) -> Result<Vec<String>> {
        let column = self
            .workbook
            .read_column(&self.layout.export_sheet, self.layout.export_employee_col)?;
        let mut names = Vec::new();
        for value in column.iter().skip(self.layout.export_header_rows) {
            let name = cell_text(value);
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Unique category labels from the score sheet, in first-seen order.
    pub fn category_labels(&mut self) -> Result<Vec<String>> {
        let column = self
            .workbook
            .read_column(&self.layout.score_sheet, self.layout.category_col)?;
        let mut labels = Vec::new();
        for value in &column {
            let label = cell_text(value);
            if !label.is_empty() && !labels.contains(&label) {
                labels.push(label);
            }
        }
        Ok(labels)
    }

    /// Post one entry for `month`. The [`ALL_EMPLOYEES`] sentinel fans out
    /// over every employee on the export sheet.
    pub fn post(&mut self, entry: &Entry, month: &str) -> Result<BatchReport> {
        if entry.employee == ALL_EMPLOYEES {
            return self.post_all(entry, month);
        }
        let target = self.post_one(entry, &entry.employee, month)?;
        Ok(BatchReport {
            posted: vec![(entry.employee.clone(), target)],
            skipped: Vec::new(),
        })
    }

    /// Run the pipeline for every employee, one at a time. A failing
    /// employee is logged and skipped; the rest always continue.
    fn post_all(&mut self, entry: &Entry, month: &str) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        for employee in self.employee_names()? {
            match self.post_one(entry, &employee, month) {
                Ok(target) => report.posted.push((employee, target)),
                Err(err) => {
                    warn!(
                        employee = %employee,
                        category = %entry.category,
                        month = %month,
                        error = %err,
                        "skipping employee"
                    );
                    report.skipped.push((employee, err));
                }
            }
        }
        Ok(report)
    }

    fn post_one(&mut self, entry: &Entry, employee: &str, month: &str) -> Result<WriteTarget> {
        let layout = self.layout;

        let first_names = self.read_text_column(&layout.score_sheet, layout.first_name_col)?;
        let last_names = self.read_text_column(&layout.score_sheet, layout.last_name_col)?;
        let start_row = locate_name(employee, &first_names, &last_names).ok_or_else(|| {
            TallyError::NameNotFound {
                employee: employee.to_string(),
            }
        })?;
        debug!(employee = %employee, start_row, "located name");

        let data = self.workbook.read_rows(&layout.export_sheet)?;
        let result = evaluate(&self.engine, &entry.formula, &data, employee)?;
        let value = CellValue::from_dynamic(&result).ok_or_else(|| TallyError::EvalResult {
            type_name: result.type_name().to_string(),
        })?;

        let categories = self.read_text_column(&layout.score_sheet, layout.category_col)?;
        let sheet = layout.score_sheet.clone();
        let workbook = &mut *self.workbook;
        write_score(
            &categories,
            &entry.category,
            start_row,
            month,
            &value,
            layout,
            |row, col, v| workbook.write_cell(&sheet, row, col, v.clone()),
        )
    }

    fn read_text_column(&mut self, sheet: &str, col: usize) -> Result<Vec<String>> {
        let column = self.workbook.read_column(sheet, col)?;
        Ok(column.iter().map(cell_text).collect())
    }
}
