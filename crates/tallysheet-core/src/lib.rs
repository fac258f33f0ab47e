//! tallysheet-core - UI-agnostic domain model + storage adapters.

pub mod entry;
pub mod error;
pub mod layout;
pub mod locate;
pub mod month;
pub mod post;
pub mod storage;
pub mod workbook;

pub use entry::{Entry, EntryStore};
pub use error::{Result, TallyError};
pub use layout::WorkbookLayout;
pub use locate::locate_name;
pub use month::{MONTHS, month_offset};
pub use post::{ALL_EMPLOYEES, BatchReport, Poster, WriteTarget};
pub use workbook::{SettingsStore, Workbook};

pub use tallysheet_engine::value::CellValue;
