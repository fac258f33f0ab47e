//! Settings stores: a TOML-backed file and an in-memory bag.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Result, TallyError};
use crate::workbook::SettingsStore;

/// Settings persisted as a single TOML table of string values.
pub struct TomlSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlSettings {
    /// Open a settings file. A missing file starts empty; an unreadable one
    /// is an error rather than silent data loss.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            toml::from_str(&text).map_err(|e| {
                TallyError::Persist(format!("settings file {} is unreadable: {e}", path.display()))
            })?
        } else {
            BTreeMap::new()
        };
        Ok(TomlSettings { path, values })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SettingsStore for TomlSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn persist(&mut self) -> Result<()> {
        let text =
            toml::to_string(&self.values).map_err(|e| TallyError::Persist(e.to_string()))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a failed write never truncates the old file.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory settings bag for tests and ephemeral runs.
#[derive(Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
    /// Make `persist` fail, for exercising persistence error paths.
    pub fail_persist: bool,
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn persist(&mut self) -> Result<()> {
        if self.fail_persist {
            return Err(TallyError::Persist("settings store rejected the save".to_string()));
        }
        Ok(())
    }
}
