//! Error types for tallysheet core.

use thiserror::Error;

use tallysheet_engine::engine::EvalAltResult;

/// Errors that can occur while managing entries or posting scores.
#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("employee '{employee}' not found in the name columns")]
    NameNotFound { employee: String },

    #[error("category '{category}' not found at or below row {start_row}")]
    CategoryNotFound { category: String, start_row: usize },

    #[error("unknown month '{month}'")]
    UnknownMonth { month: String },

    #[error("no entry stored for employee '{employee}' and category '{category}'")]
    EntryNotFound { employee: String, category: String },

    #[error("an entry for employee '{employee}' and category '{category}' already exists")]
    DuplicateEntry { employee: String, category: String },

    #[error("formula error: {0}")]
    Eval(
        #[from]
        #[source]
        Box<EvalAltResult>,
    ),

    #[error("formula produced no writable value (result type: {type_name})")]
    EvalResult { type_name: String },

    #[error("sheet '{sheet}' not found in the workbook")]
    SheetNotFound { sheet: String },

    #[error("failed to persist settings: {0}")]
    Persist(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
