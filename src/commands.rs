//! Subcommand execution over the entry store and the posting pipeline.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use tallysheet_core::storage::{CsvWorkbook, TomlSettings};
use tallysheet_core::{EntryStore, MONTHS, Poster, WorkbookLayout};

pub struct Options {
    pub workbook_dir: PathBuf,
    pub entries_file: PathBuf,
    pub layout: WorkbookLayout,
}

impl Options {
    pub fn resolve(
        workbook_dir: Option<PathBuf>,
        entries_file: Option<PathBuf>,
        config_file: Option<PathBuf>,
    ) -> Result<Self> {
        let workbook_dir = workbook_dir.unwrap_or_else(|| PathBuf::from("."));
        let entries_file = match entries_file {
            Some(path) => path,
            None => crate::paths::default_entries_path()
                .context("no user config directory found; pass --entries <FILE>")?,
        };
        let layout = match config_file {
            Some(path) => WorkbookLayout::load(&path)
                .with_context(|| format!("loading layout from {}", path.display()))?,
            None => WorkbookLayout::default(),
        };
        Ok(Options {
            workbook_dir,
            entries_file,
            layout,
        })
    }
}

pub fn run(command: &str, args: &[String], options: Options) -> Result<()> {
    match command {
        "list" => list(&options),
        "add" => {
            let (employee, category) = two_args(args, "add <employee> <category>")?;
            add(&options, employee, category)
        }
        "set-formula" => set_formula(&options, args),
        "remove" => {
            let (employee, category) = two_args(args, "remove <employee> <category>")?;
            remove(&options, employee, category)
        }
        "post" => {
            let [employee, category, month] = args else {
                bail!("usage: post <employee> <category> <month>");
            };
            post(&options, employee, category, month)
        }
        "employees" => employees(&options),
        "categories" => categories(&options),
        "months" => {
            for month in MONTHS {
                println!("{month}");
            }
            Ok(())
        }
        "functions" => {
            for builtin in tallysheet_engine::builtins::BUILTINS {
                println!("{:<12} {}", builtin.name, builtin.description);
            }
            Ok(())
        }
        other => bail!("unknown command: {other}"),
    }
}

fn two_args<'a>(args: &'a [String], usage: &str) -> Result<(&'a str, &'a str)> {
    let [first, second] = args else {
        bail!("usage: {usage}");
    };
    Ok((first.as_str(), second.as_str()))
}

fn open_settings(options: &Options) -> Result<TomlSettings> {
    TomlSettings::open(&options.entries_file)
        .with_context(|| format!("opening {}", options.entries_file.display()))
}

fn list(options: &Options) -> Result<()> {
    let settings = open_settings(options)?;
    let store = EntryStore::load(&settings)?;
    if store.entries().is_empty() {
        println!("No entries stored.");
        return Ok(());
    }
    for entry in store.entries() {
        println!(
            "{} | {} | {}",
            entry.employee,
            entry.category,
            formula_preview(&entry.formula)
        );
    }
    Ok(())
}

fn formula_preview(formula: &str) -> String {
    let first_line = formula.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        return "(no formula)".to_string();
    }
    let truncated: String = first_line.chars().take(48).collect();
    if truncated.len() < first_line.len() || formula.lines().count() > 1 {
        format!("{truncated}…")
    } else {
        truncated
    }
}

fn add(options: &Options, employee: &str, category: &str) -> Result<()> {
    let mut settings = open_settings(options)?;
    let mut store = EntryStore::load(&settings)?;
    store.add(&mut settings, employee, category)?;
    println!("Added entry for {} / {}.", employee, category);
    Ok(())
}

fn set_formula(options: &Options, args: &[String]) -> Result<()> {
    let usage = "set-formula <employee> <category> (<text> | --file <path>)";
    let [employee, category, rest @ ..] = args else {
        bail!("usage: {usage}");
    };
    let formula = match rest {
        [flag, path] if flag.as_str() == "--file" => std::fs::read_to_string(path)
            .with_context(|| format!("reading formula from {path}"))?,
        [] => bail!("usage: {usage}"),
        text => text.join(" "),
    };

    let mut settings = open_settings(options)?;
    let mut store = EntryStore::load(&settings)?;
    store.set_formula(&mut settings, employee, category, &formula)?;
    println!("Updated formula for {} / {}.", employee, category);
    Ok(())
}

fn remove(options: &Options, employee: &str, category: &str) -> Result<()> {
    let mut settings = open_settings(options)?;
    let mut store = EntryStore::load(&settings)?;
    store.remove(&mut settings, employee, category)?;
    println!("Removed entry for {} / {}.", employee, category);
    Ok(())
}

fn post(options: &Options, employee: &str, category: &str, month: &str) -> Result<()> {
    let settings = open_settings(options)?;
    let store = EntryStore::load(&settings)?;
    let Some(entry) = store.find(employee, category) else {
        bail!("no entry stored for employee '{employee}' and category '{category}'");
    };

    let mut workbook = CsvWorkbook::open(&options.workbook_dir);
    let report = Poster::new(&mut workbook, &options.layout).post(entry, month)?;
    workbook.save().context("saving workbook sheets")?;

    for (name, target) in &report.posted {
        println!("Posted {}: row {}, column {}", name, target.row, target.col);
    }
    for (name, err) in &report.skipped {
        eprintln!("Skipped {}: {}", name, err);
    }
    Ok(())
}

fn employees(options: &Options) -> Result<()> {
    let mut workbook = CsvWorkbook::open(&options.workbook_dir);
    let names = Poster::new(&mut workbook, &options.layout).employee_names()?;
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn categories(options: &Options) -> Result<()> {
    let mut workbook = CsvWorkbook::open(&options.workbook_dir);
    let labels = Poster::new(&mut workbook, &options.layout).category_labels()?;
    for label in labels {
        println!("{label}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::formula_preview;

    #[test]
    fn test_formula_preview_empty() {
        assert_eq!(formula_preview(""), "(no formula)");
    }

    #[test]
    fn test_formula_preview_single_line() {
        assert_eq!(formula_preview("data.len()"), "data.len()");
    }

    #[test]
    fn test_formula_preview_multiline_is_truncated() {
        let preview = formula_preview("let x = 1;\nx + 1");
        assert!(preview.ends_with('…'));
    }
}
