//! Cell values crossing the workbook boundary.

use rhai::Dynamic;

/// Content of a single workbook cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Convert to a Rhai value for use inside formulas.
    pub fn to_dynamic(&self) -> Dynamic {
        match self {
            CellValue::Number(n) => Dynamic::from(*n),
            CellValue::Text(s) => Dynamic::from(s.clone()),
            CellValue::Bool(b) => Dynamic::from(*b),
            CellValue::Empty => Dynamic::UNIT,
        }
    }

    /// Convert a formula result back into a writable cell value.
    ///
    /// Returns `None` for unit (no value) and for aggregate types like
    /// arrays or maps, which have no single-cell representation.
    pub fn from_dynamic(value: &Dynamic) -> Option<CellValue> {
        if value.is_unit() {
            return None;
        }
        if let Ok(n) = value.as_int() {
            return Some(CellValue::Number(n as f64));
        }
        if let Ok(n) = value.as_float() {
            return Some(CellValue::Number(n));
        }
        if let Ok(b) = value.as_bool() {
            return Some(CellValue::Bool(b));
        }
        if let Ok(s) = value.clone().into_string() {
            return Some(CellValue::Text(s));
        }
        None
    }

    /// Display form, as written to CSV sheets and the console.
    pub fn display(&self) -> String {
        match self {
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

/// Format a number for display.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{:.0}", n)
    } else {
        format!("{:.2}", n)
    }
}
