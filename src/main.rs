//! Tallysheet - posts formula-computed scores into a workbook.

mod commands;
mod paths;

use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: tallysheet [OPTIONS] <COMMAND> [ARGS]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list                                      List stored entries");
    eprintln!("  add <employee> <category>                 Store a new entry");
    eprintln!("  set-formula <employee> <category> <text>  Attach a formula (or --file <path>)");
    eprintln!("  remove <employee> <category>              Delete an entry");
    eprintln!("  post <employee> <category> <month>        Compute and write the score ('Alle' = every employee)");
    eprintln!("  employees                                 List employee names from the export sheet");
    eprintln!("  categories                                List category labels from the score sheet");
    eprintln!("  months                                    List the canonical month names");
    eprintln!("  functions                                 List formula built-ins");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -w, --workbook <DIR>   Workbook directory of <sheet>.csv files (default: .)");
    eprintln!("  -e, --entries <FILE>   Entries settings file (default: user config dir)");
    eprintln!("  -c, --config <FILE>    Workbook layout TOML file");
    eprintln!("  -h, --help             Print help");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut workbook_dir: Option<PathBuf> = None;
    let mut entries_file: Option<PathBuf> = None;
    let mut config_file: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-w" | "--workbook" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --workbook requires a directory");
                    std::process::exit(1);
                }
                workbook_dir = Some(PathBuf::from(&args[i]));
            }
            "-e" | "--entries" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --entries requires a file path");
                    std::process::exit(1);
                }
                entries_file = Some(PathBuf::from(&args[i]));
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') && positional.is_empty() => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => positional.push(args[i].clone()),
        }
        i += 1;
    }

    let Some((command, command_args)) = positional.split_first() else {
        print_usage();
        std::process::exit(1);
    };

    let options = match commands::Options::resolve(workbook_dir, entries_file, config_file) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = commands::run(command, command_args, options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
