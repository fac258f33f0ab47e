//! First/last name lookup over parallel workbook columns.

use tracing::debug;

/// Locate `full_name` in parallel first/last name columns.
///
/// Only the first two whitespace-separated tokens of `full_name` are
/// significant; trailing tokens are ignored. Column entries are trimmed
/// before the exact, case-sensitive comparison. Returns the zero-based row
/// of the first match.
pub fn locate_name(full_name: &str, first_names: &[String], last_names: &[String]) -> Option<usize> {
    let mut tokens = full_name.split_whitespace();
    let (Some(first), Some(last)) = (tokens.next(), tokens.next()) else {
        debug!(name = full_name, "name needs a first and a last token");
        return None;
    };

    first_names
        .iter()
        .zip(last_names.iter())
        .position(|(f, l)| f.trim() == first && l.trim() == last)
}
