//! Rhai engine creation and formula evaluation.
//!
//! Formulas are user-authored script bodies. They run inside a Rhai engine
//! with no ambient I/O and hard resource caps, with `data` (the export rows)
//! and `employee_name` bound in scope. The last expression is the result.

use rhai::{Array, Dynamic, Engine, EvalAltResult, Scope};

use crate::value::CellValue;

/// Operation cap per evaluation. Runaway loops hit this and error out.
const MAX_OPERATIONS: u64 = 1_000_000;
const MAX_EXPR_DEPTH: usize = 64;
const MAX_CALL_LEVELS: usize = 64;
const MAX_STRING_SIZE: usize = 64 * 1024;
const MAX_ARRAY_SIZE: usize = 1_000_000;
const MAX_MAP_SIZE: usize = 4_096;

/// Create a Rhai engine with built-ins registered and resource caps applied.
pub fn create_engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_max_operations(MAX_OPERATIONS);
    engine.set_max_expr_depths(MAX_EXPR_DEPTH, MAX_EXPR_DEPTH);
    engine.set_max_call_levels(MAX_CALL_LEVELS);
    engine.set_max_string_size(MAX_STRING_SIZE);
    engine.set_max_array_size(MAX_ARRAY_SIZE);
    engine.set_max_map_size(MAX_MAP_SIZE);
    crate::builtins::register_builtins(&mut engine);
    engine
}

/// Convert export rows into the nested array formulas see as `data`.
pub fn data_to_array(data: &[Vec<CellValue>]) -> Array {
    data.iter()
        .map(|row| {
            Dynamic::from(row.iter().map(CellValue::to_dynamic).collect::<Array>())
        })
        .collect()
}

/// Evaluate a scoring formula with `data` and `employee_name` in scope.
pub fn evaluate(
    engine: &Engine,
    formula: &str,
    data: &[Vec<CellValue>],
    employee_name: &str,
) -> Result<Dynamic, Box<EvalAltResult>> {
    let mut scope = Scope::new();
    scope.push("data", data_to_array(data));
    scope.push("employee_name", employee_name.to_string());
    engine.eval_with_scope::<Dynamic>(&mut scope, formula)
}
