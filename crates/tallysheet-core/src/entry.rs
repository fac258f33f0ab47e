//! Persisted (employee, category, formula) entries.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};
use crate::workbook::SettingsStore;

/// Settings key the entry list is stored under.
pub const SETTINGS_KEY: &str = "entries";

/// One stored association of an employee and a category with a formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub employee: String,
    pub category: String,
    #[serde(default)]
    pub formula: String,
}

/// Persisted payload: a TOML document of `[[entry]]` tables.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedEntries {
    #[serde(default)]
    entry: Vec<Entry>,
}

/// Ordered entry list, mirrored into a settings store on every mutation.
///
/// (employee, category) pairs are unique; adding an existing pair is
/// rejected rather than silently duplicated.
pub struct EntryStore {
    entries: Vec<Entry>,
}

impl EntryStore {
    /// Restore the list from the settings store. A missing key is an empty
    /// list; an unreadable payload is an error.
    pub fn load(settings: &dyn SettingsStore) -> Result<Self> {
        let entries = match settings.get(SETTINGS_KEY) {
            Some(text) => {
                let saved: SavedEntries = toml::from_str(&text).map_err(|e| {
                    TallyError::Persist(format!("stored entries are unreadable: {e}"))
                })?;
                saved.entry
            }
            None => Vec::new(),
        };
        Ok(EntryStore { entries })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The entry for an (employee, category) pair, if stored.
    pub fn find(&self, employee: &str, category: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.employee == employee && e.category == category)
    }

    /// Add a new entry with an empty formula and save.
    pub fn add(
        &mut self,
        settings: &mut dyn SettingsStore,
        employee: &str,
        category: &str,
    ) -> Result<()> {
        if self.find(employee, category).is_some() {
            return Err(TallyError::DuplicateEntry {
                employee: employee.to_string(),
                category: category.to_string(),
            });
        }
        self.entries.push(Entry {
            employee: employee.to_string(),
            category: category.to_string(),
            formula: String::new(),
        });
        self.save(settings)
    }

    /// Replace the formula of an existing entry and save.
    pub fn set_formula(
        &mut self,
        settings: &mut dyn SettingsStore,
        employee: &str,
        category: &str,
        formula: &str,
    ) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.employee == employee && e.category == category)
            .ok_or_else(|| TallyError::EntryNotFound {
                employee: employee.to_string(),
                category: category.to_string(),
            })?;
        entry.formula = formula.to_string();
        self.save(settings)
    }

    /// Remove an entry and save.
    pub fn remove(
        &mut self,
        settings: &mut dyn SettingsStore,
        employee: &str,
        category: &str,
    ) -> Result<()> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.employee == employee && e.category == category)
            .ok_or_else(|| TallyError::EntryNotFound {
                employee: employee.to_string(),
                category: category.to_string(),
            })?;
        self.entries.remove(idx);
        self.save(settings)
    }

    fn save(&self, settings: &mut dyn SettingsStore) -> Result<()> {
        let payload = SavedEntries {
            entry: self.entries.clone(),
        };
        let text = toml::to_string(&payload).map_err(|e| TallyError::Persist(e.to_string()))?;
        settings.set(SETTINGS_KEY, text);
        settings.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySettings;

    #[test]
    fn test_load_from_empty_settings() {
        let settings = MemorySettings::default();
        let store = EntryStore::load(&settings).unwrap();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn test_add_and_reload_round_trip() {
        let mut settings = MemorySettings::default();
        let mut store = EntryStore::load(&settings).unwrap();
        store.add(&mut settings, "Erika Muster", "Umsatz").unwrap();
        store
            .set_formula(&mut settings, "Erika Muster", "Umsatz", "data.len()")
            .unwrap();

        let reloaded = EntryStore::load(&settings).unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        let entry = reloaded.find("Erika Muster", "Umsatz").unwrap();
        assert_eq!(entry.formula, "data.len()");
    }

    #[test]
    fn test_add_duplicate_pair_is_rejected() {
        let mut settings = MemorySettings::default();
        let mut store = EntryStore::load(&settings).unwrap();
        store.add(&mut settings, "Erika Muster", "Umsatz").unwrap();

        let err = store.add(&mut settings, "Erika Muster", "Umsatz").unwrap_err();
        assert!(matches!(err, TallyError::DuplicateEntry { .. }));
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn test_same_employee_different_category_is_allowed() {
        let mut settings = MemorySettings::default();
        let mut store = EntryStore::load(&settings).unwrap();
        store.add(&mut settings, "Erika Muster", "Umsatz").unwrap();
        store.add(&mut settings, "Erika Muster", "Bonus").unwrap();
        assert_eq!(store.entries().len(), 2);
    }

    #[test]
    fn test_set_formula_on_missing_entry() {
        let mut settings = MemorySettings::default();
        let mut store = EntryStore::load(&settings).unwrap();
        let err = store
            .set_formula(&mut settings, "Erika Muster", "Umsatz", "1")
            .unwrap_err();
        assert!(matches!(err, TallyError::EntryNotFound { .. }));
    }

    #[test]
    fn test_remove_entry_persists() {
        let mut settings = MemorySettings::default();
        let mut store = EntryStore::load(&settings).unwrap();
        store.add(&mut settings, "Erika Muster", "Umsatz").unwrap();
        store.remove(&mut settings, "Erika Muster", "Umsatz").unwrap();

        let reloaded = EntryStore::load(&settings).unwrap();
        assert!(reloaded.entries().is_empty());
    }

    #[test]
    fn test_persist_failure_is_surfaced() {
        let mut settings = MemorySettings::default();
        settings.fail_persist = true;
        let mut store = EntryStore::load(&settings).unwrap();
        let err = store.add(&mut settings, "Erika Muster", "Umsatz").unwrap_err();
        assert!(matches!(err, TallyError::Persist(_)));
    }

    #[test]
    fn test_load_rejects_garbage_payload() {
        let mut settings = MemorySettings::default();
        settings.set(SETTINGS_KEY, "not = [valid".to_string());
        assert!(matches!(
            EntryStore::load(&settings),
            Err(TallyError::Persist(_))
        ));
    }
}
