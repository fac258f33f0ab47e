//! Workbook layout configuration.
//!
//! The add-in this replaces wired sheet names and column letters straight
//! into the code; here they are data with serde defaults, loadable from a
//! TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};

/// Where names, categories, months and export data live in the workbook.
///
/// All indices are zero-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkbookLayout {
    /// Sheet holding the name columns, the category column and the month grid.
    pub score_sheet: String,
    /// Sheet holding the raw export rows handed to formulas.
    pub export_sheet: String,
    /// Column of first names on the score sheet.
    pub first_name_col: usize,
    /// Column of last names on the score sheet.
    pub last_name_col: usize,
    /// Column of category labels on the score sheet.
    pub category_col: usize,
    /// Column of the export sheet holding employee names.
    pub export_employee_col: usize,
    /// Header rows skipped when enumerating employees from the export sheet.
    pub export_header_rows: usize,
    /// Rows added to a category match to reach the write row.
    pub score_row_offset: usize,
    /// Column of the first month on the score sheet.
    pub month_start_col: usize,
}

impl Default for WorkbookLayout {
    fn default() -> Self {
        WorkbookLayout {
            score_sheet: "Scores".to_string(),
            export_sheet: "Export".to_string(),
            first_name_col: 2,
            last_name_col: 3,
            category_col: 4,
            export_employee_col: 4,
            export_header_rows: 1,
            score_row_offset: 4,
            month_start_col: 6,
        }
    }
}

impl WorkbookLayout {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| TallyError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::WorkbookLayout;

    #[test]
    fn test_from_toml_partial_override_keeps_defaults() {
        let layout = WorkbookLayout::from_toml(
            r#"
            score_sheet = "Kreis TRADE - 2024"
            export_sheet = "ExportDaten"
            "#,
        )
        .unwrap();
        assert_eq!(layout.score_sheet, "Kreis TRADE - 2024");
        assert_eq!(layout.export_sheet, "ExportDaten");
        assert_eq!(layout.first_name_col, 2);
        assert_eq!(layout.month_start_col, 6);
    }

    #[test]
    fn test_from_toml_rejects_unknown_fields() {
        assert!(WorkbookLayout::from_toml("score_shet = \"typo\"").is_err());
    }
}
