//! Integration tests for the CLI posting flow.

use std::path::PathBuf;
use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .arg("run")
        .arg("-q")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    /// A workbook matching the default layout: names in columns C/D,
    /// categories in column E, months from column G, writes 4 rows below
    /// the category match.
    fn new(tag: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "tallysheet_cli_{}_{}_{}_{:?}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
            std::thread::current().id(),
        ));
        std::fs::create_dir_all(&dir).unwrap();

        std::fs::write(
            dir.join("Scores.csv"),
            ",,Vorname,Nachname,Kategorie\n\
             ,,Anna,Beispiel,Umsatz\n\
             ,,Max,Mustermann,Umsatz\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("Export.csv"),
            ",,,,Name,Betrag\n\
             ,,,,Anna Beispiel,3\n\
             ,,,,Max Mustermann,4\n\
             ,,,,Anna Beispiel,2\n",
        )
        .unwrap();

        Fixture { dir }
    }

    fn args<'a>(&'a self, rest: &[&'a str]) -> Vec<String> {
        let mut args = vec![
            "--workbook".to_string(),
            self.dir.to_string_lossy().to_string(),
            "--entries".to_string(),
            self.dir.join("entries.toml").to_string_lossy().to_string(),
        ];
        args.extend(rest.iter().map(|s| s.to_string()));
        args
    }

    fn run(&self, rest: &[&str]) -> (String, String, i32) {
        let args = self.args(rest);
        let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        run_command(&arg_refs)
    }

    fn scores_field(&self, row: usize, col: usize) -> String {
        let content = std::fs::read_to_string(self.dir.join("Scores.csv")).unwrap();
        let line = content.lines().nth(row).unwrap_or("");
        line.split(',').nth(col).unwrap_or("").to_string()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

const SUM_FORMULA: &str = "SUM(COLUMN(ROWS_WHERE(data, 4, employee_name), 5))";

#[test]
fn test_months_lists_twelve() {
    let (stdout, _, code) = run_command(&["months"]);
    assert_eq!(code, 0);
    let months: Vec<&str> = stdout.lines().collect();
    assert_eq!(months.len(), 12);
    assert_eq!(months[0], "Januar");
    assert_eq!(months[11], "Dezember");
}

#[test]
fn test_functions_lists_builtins() {
    let (stdout, _, code) = run_command(&["functions"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("SUM"));
    assert!(stdout.contains("ROWS_WHERE"));
}

#[test]
fn test_unknown_command_fails() {
    let (_, stderr, code) = run_command(&["frobnicate"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown command"));
}

#[test]
fn test_employees_come_from_export_sheet() {
    let fixture = Fixture::new("employees");
    let (stdout, _, code) = fixture.run(&["employees"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Anna Beispiel\nMax Mustermann");
}

#[test]
fn test_post_single_employee_writes_score() {
    let fixture = Fixture::new("post_single");

    let (_, _, code) = fixture.run(&["add", "Anna Beispiel", "Umsatz"]);
    assert_eq!(code, 0);
    let (_, _, code) = fixture.run(&["set-formula", "Anna Beispiel", "Umsatz", SUM_FORMULA]);
    assert_eq!(code, 0);

    let (stdout, _, code) = fixture.run(&["post", "Anna Beispiel", "Umsatz", "Januar"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Posted Anna Beispiel"));

    // Anna's category row is 1; the score lands 4 rows below, in Januar's
    // column (G).
    assert_eq!(fixture.scores_field(5, 6), "5");
}

#[test]
fn test_post_all_writes_every_employee() {
    let fixture = Fixture::new("post_all");

    fixture.run(&["add", "Alle", "Umsatz"]);
    fixture.run(&["set-formula", "Alle", "Umsatz", SUM_FORMULA]);

    let (stdout, _, code) = fixture.run(&["post", "Alle", "Umsatz", "Februar"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Posted Anna Beispiel"));
    assert!(stdout.contains("Posted Max Mustermann"));

    assert_eq!(fixture.scores_field(5, 7), "5");
    assert_eq!(fixture.scores_field(6, 7), "4");
}

#[test]
fn test_post_unknown_month_fails_without_write() {
    let fixture = Fixture::new("bad_month");

    fixture.run(&["add", "Anna Beispiel", "Umsatz"]);
    fixture.run(&["set-formula", "Anna Beispiel", "Umsatz", SUM_FORMULA]);

    let (_, stderr, code) = fixture.run(&["post", "Anna Beispiel", "Umsatz", "Brumaire"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown month"));

    let content = std::fs::read_to_string(fixture.dir.join("Scores.csv")).unwrap();
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_duplicate_entry_is_rejected() {
    let fixture = Fixture::new("duplicate");

    let (_, _, code) = fixture.run(&["add", "Anna Beispiel", "Umsatz"]);
    assert_eq!(code, 0);
    let (_, stderr, code) = fixture.run(&["add", "Anna Beispiel", "Umsatz"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("already exists"));
}
