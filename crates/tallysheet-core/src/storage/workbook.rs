//! CSV-backed workbook adapter.
//!
//! Each sheet is a `<name>.csv` file in the workbook directory. Sheets load
//! lazily on first access; writes stay in memory until [`CsvWorkbook::save`]
//! rewrites the dirty sheets.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tallysheet_engine::value::CellValue;

use crate::error::{Result, TallyError};
use crate::workbook::Workbook;

use super::csv::{parse_rows, write_rows};

pub struct CsvWorkbook {
    dir: PathBuf,
    sheets: HashMap<String, Vec<Vec<CellValue>>>,
    dirty: HashSet<String>,
}

impl CsvWorkbook {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        CsvWorkbook {
            dir: dir.into(),
            sheets: HashMap::new(),
            dirty: HashSet::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.dir.join(format!("{sheet}.csv"))
    }

    fn sheet(&mut self, name: &str) -> Result<&mut Vec<Vec<CellValue>>> {
        if !self.sheets.contains_key(name) {
            let path = self.sheet_path(name);
            if !path.is_file() {
                return Err(TallyError::SheetNotFound {
                    sheet: name.to_string(),
                });
            }
            let text = std::fs::read_to_string(&path)?;
            self.sheets.insert(name.to_string(), parse_rows(&text));
        }
        self.sheets
            .get_mut(name)
            .ok_or_else(|| TallyError::SheetNotFound {
                sheet: name.to_string(),
            })
    }

    /// Rewrite every sheet written to since open (or the last save).
    pub fn save(&mut self) -> Result<()> {
        let dirty: Vec<String> = self.dirty.drain().collect();
        for name in dirty {
            let Some(rows) = self.sheets.get(&name) else {
                continue;
            };
            let text = write_rows(rows);
            // Write-then-rename so a failed write never truncates the sheet.
            let path = self.sheet_path(&name);
            let tmp = path.with_extension("csv.tmp");
            std::fs::write(&tmp, text)?;
            std::fs::rename(&tmp, &path)?;
        }
        Ok(())
    }
}

impl Workbook for CsvWorkbook {
    fn read_column(&mut self, sheet: &str, col: usize) -> Result<Vec<CellValue>> {
        let rows = self.sheet(sheet)?;
        Ok(rows
            .iter()
            .map(|row| row.get(col).cloned().unwrap_or(CellValue::Empty))
            .collect())
    }

    fn read_rows(&mut self, sheet: &str) -> Result<Vec<Vec<CellValue>>> {
        Ok(self.sheet(sheet)?.clone())
    }

    fn write_cell(&mut self, sheet: &str, row: usize, col: usize, value: CellValue) -> Result<()> {
        let rows = self.sheet(sheet)?;
        if rows.len() <= row {
            rows.resize(row + 1, Vec::new());
        }
        if rows[row].len() <= col {
            rows[row].resize(col + 1, CellValue::Empty);
        }
        rows[row][col] = value;
        self.dirty.insert(sheet.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_workbook_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "tallysheet_workbook_{}_{}_{}_{:?}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
            std::thread::current().id(),
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    struct Cleanup(PathBuf);
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_missing_sheet_is_an_error() {
        let dir = temp_workbook_dir("missing");
        let _cleanup = Cleanup(dir.clone());

        let mut workbook = CsvWorkbook::open(&dir);
        assert!(matches!(
            workbook.read_rows("Nope"),
            Err(TallyError::SheetNotFound { .. })
        ));
    }

    #[test]
    fn test_read_column_pads_short_rows() {
        let dir = temp_workbook_dir("pad");
        let _cleanup = Cleanup(dir.clone());
        std::fs::write(dir.join("Scores.csv"), "a,b\nc\n").unwrap();

        let mut workbook = CsvWorkbook::open(&dir);
        let column = workbook.read_column("Scores", 1).unwrap();
        assert_eq!(column.len(), 2);
        assert_eq!(column[0], CellValue::Text("b".to_string()));
        assert_eq!(column[1], CellValue::Empty);
    }

    #[test]
    fn test_write_cell_save_reload() {
        let dir = temp_workbook_dir("save");
        let _cleanup = Cleanup(dir.clone());
        std::fs::write(dir.join("Scores.csv"), "a\n").unwrap();

        let mut workbook = CsvWorkbook::open(&dir);
        workbook
            .write_cell("Scores", 2, 3, CellValue::Number(7.5))
            .unwrap();
        workbook.save().unwrap();

        let mut reloaded = CsvWorkbook::open(&dir);
        let rows = reloaded.read_rows("Scores").unwrap();
        assert_eq!(rows[2][3], CellValue::Number(7.5));
        assert_eq!(rows[0][0], CellValue::Text("a".to_string()));
    }

    #[test]
    fn test_save_skips_untouched_sheets() {
        let dir = temp_workbook_dir("untouched");
        let _cleanup = Cleanup(dir.clone());
        std::fs::write(dir.join("Scores.csv"), "a\n").unwrap();
        std::fs::write(dir.join("Export.csv"), "x\n").unwrap();

        let mut workbook = CsvWorkbook::open(&dir);
        let _ = workbook.read_rows("Export").unwrap();
        workbook
            .write_cell("Scores", 0, 0, CellValue::Number(1.0))
            .unwrap();
        let export_mtime = std::fs::metadata(dir.join("Export.csv"))
            .unwrap()
            .modified()
            .unwrap();
        workbook.save().unwrap();

        let export_mtime_after = std::fs::metadata(dir.join("Export.csv"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(export_mtime, export_mtime_after);
    }
}
