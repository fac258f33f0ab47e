//! Built-in formula helpers (Rust) and their metadata.
//!
//! Conventions:
//! - Formula-facing built-in names are ALL CAPS (e.g. `SUM`, `COLUMN`).
//! - If you add a new built-in, update `BUILTINS` and register its
//!   implementation in `register_builtins`.

use rhai::{Array, Dynamic, Engine, EvalAltResult, Position};

pub struct Builtin {
    pub name: &'static str,
    pub description: &'static str,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "SUM",
        description: "Sum of numeric values in an array",
    },
    Builtin {
        name: "AVG",
        description: "Average of numeric values in an array",
    },
    Builtin {
        name: "COUNT",
        description: "Count of non-empty values in an array",
    },
    Builtin {
        name: "MIN",
        description: "Minimum numeric value in an array",
    },
    Builtin {
        name: "MAX",
        description: "Maximum numeric value in an array",
    },
    Builtin {
        name: "NUM",
        description: "Coerce a value to a number",
    },
    Builtin {
        name: "COLUMN",
        description: "Project one column out of the data rows",
    },
    Builtin {
        name: "ROWS_WHERE",
        description: "Rows whose column matches a value",
    },
];

fn invalid_arg(message: &str) -> Box<EvalAltResult> {
    EvalAltResult::ErrorRuntime(message.into(), Position::NONE).into()
}

/// Lenient numeric coercion: ints, floats, and numeric-looking strings.
fn numeric(value: &Dynamic) -> Option<f64> {
    if let Ok(n) = value.as_float() {
        return Some(n);
    }
    if let Ok(n) = value.as_int() {
        return Some(n as f64);
    }
    if let Ok(s) = value.clone().into_string() {
        return s.trim().parse::<f64>().ok();
    }
    None
}

/// Equality used by `ROWS_WHERE`: numeric when both sides coerce, otherwise
/// trimmed string comparison.
fn values_equal(a: &Dynamic, b: &Dynamic) -> bool {
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return x == y;
    }
    a.to_string().trim() == b.to_string().trim()
}

fn row_array(row: &Dynamic, fn_name: &str) -> Result<Array, Box<EvalAltResult>> {
    row.clone()
        .try_cast::<Array>()
        .ok_or_else(|| invalid_arg(&format!("{} expects rows of arrays", fn_name)))
}

fn column_index(idx: i64, fn_name: &str) -> Result<usize, Box<EvalAltResult>> {
    usize::try_from(idx).map_err(|_| invalid_arg(&format!("{} column must be >= 0", fn_name)))
}

/// Register all built-ins on the engine.
pub fn register_builtins(engine: &mut Engine) {
    engine.register_fn("SUM", |values: Array| -> f64 {
        values.iter().filter_map(numeric).sum()
    });

    engine.register_fn("AVG", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        let numbers: Vec<f64> = values.iter().filter_map(numeric).collect();
        if numbers.is_empty() {
            return Err(invalid_arg("AVG() needs at least one numeric value"));
        }
        Ok(numbers.iter().sum::<f64>() / numbers.len() as f64)
    });

    engine.register_fn("COUNT", |values: Array| -> i64 {
        values.iter().filter(|v| !v.is_unit()).count() as i64
    });

    engine.register_fn("MIN", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        values
            .iter()
            .filter_map(numeric)
            .fold(None, |acc: Option<f64>, n| Some(acc.map_or(n, |a| a.min(n))))
            .ok_or_else(|| invalid_arg("MIN() needs at least one numeric value"))
    });

    engine.register_fn("MAX", |values: Array| -> Result<f64, Box<EvalAltResult>> {
        values
            .iter()
            .filter_map(numeric)
            .fold(None, |acc: Option<f64>, n| Some(acc.map_or(n, |a| a.max(n))))
            .ok_or_else(|| invalid_arg("MAX() needs at least one numeric value"))
    });

    engine.register_fn("NUM", |value: Dynamic| -> Result<f64, Box<EvalAltResult>> {
        numeric(&value).ok_or_else(|| invalid_arg(&format!("NUM() cannot coerce {}", value.type_name())))
    });

    engine.register_fn(
        "COLUMN",
        |data: Array, idx: i64| -> Result<Array, Box<EvalAltResult>> {
            let idx = column_index(idx, "COLUMN()")?;
            let mut column = Array::with_capacity(data.len());
            for row in &data {
                let row = row_array(row, "COLUMN()")?;
                column.push(row.get(idx).cloned().unwrap_or(Dynamic::UNIT));
            }
            Ok(column)
        },
    );

    engine.register_fn(
        "ROWS_WHERE",
        |data: Array, idx: i64, value: Dynamic| -> Result<Array, Box<EvalAltResult>> {
            let idx = column_index(idx, "ROWS_WHERE()")?;
            let mut matching = Array::new();
            for row in &data {
                let cells = row_array(row, "ROWS_WHERE()")?;
                let matches = cells
                    .get(idx)
                    .is_some_and(|cell| values_equal(cell, &value));
                if matches {
                    matching.push(row.clone());
                }
            }
            Ok(matching)
        },
    );
}
