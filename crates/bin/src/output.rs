//! Output formatting helpers for human-readable and JSON output.

use serde_json::{Value, json};
use userbridge::ModelError;
use userbridge::fields::as_text;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    print_row(headers.iter().copied(), &widths);
    for row in rows {
        print_row(row.iter().map(String::as_str).take(col_count), &widths);
    }
}

fn print_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    println!("{}", line.join("  ").trim_end());
}

/// Render an optional field value for a table cell.
pub fn cell(value: Option<&Value>) -> String {
    value.and_then(as_text).unwrap_or_default()
}

/// Print the errors collected by an adapter operation to stderr.
pub fn print_errors(errors: &[ModelError]) {
    for error in errors {
        match error.code() {
            Some(code) => eprintln!("error[{code}]: {error}"),
            None => eprintln!("error: {error}"),
        }
    }
}

/// Collected errors as a JSON array of `{code, message}` objects.
pub fn errors_json(errors: &[ModelError]) -> Value {
    errors
        .iter()
        .map(|error| json!({"code": error.code(), "message": error.to_string()}))
        .collect()
}
