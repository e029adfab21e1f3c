//! Terminal output utilities.
//!
//! Provides formatting helpers for terminal output.

use colored::Colorize;

/// Join fields into one tab-separated line.
pub fn tsv_line<I, T>(fields: I) -> String
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    fields
        .into_iter()
        .map(|f| f.to_string().replace(['\t', '\n'], " "))
        .collect::<Vec<String>>()
        .join("\t")
}

/// Red when the line is actionable, unchanged otherwise.
///
/// Colouring follows `colored`'s terminal and `NO_COLOR` detection.
pub fn highlight(line: &str, actionable: bool) -> String {
    if actionable {
        line.red().to_string()
    } else {
        line.to_string()
    }
}
