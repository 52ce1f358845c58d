//! Text rendering for CLI output.

use serde::Serialize;

use super::commands::OutputFormat;
use crate::error::Result;
use crate::record::{Field, StudentRecord};
use crate::validation::ValidationErrors;

/// Header for the position column.
const NO_HEADER: &str = "No.";

#[derive(Serialize)]
struct Row<'a> {
    no: usize,
    #[serde(flatten)]
    record: &'a StudentRecord,
}

/// Render records paired with their 0-based collection positions.
///
/// Positions are shown 1-based.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_records(hits: &[(usize, StudentRecord)], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(render_plain(hits)),
        OutputFormat::Table => Ok(render_table(hits)),
        OutputFormat::Json => {
            let rows: Vec<Row<'_>> = hits
                .iter()
                .map(|(index, record)| Row {
                    no: index + 1,
                    record,
                })
                .collect();
            Ok(serde_json::to_string_pretty(&rows)?)
        }
    }
}

fn render_plain(hits: &[(usize, StudentRecord)]) -> String {
    hits.iter()
        .map(|(index, r)| {
            format!(
                "{}. {} | {} | {} | {}\n",
                index + 1,
                r.name,
                r.id,
                r.email,
                r.contact
            )
        })
        .collect()
}

fn render_table(hits: &[(usize, StudentRecord)]) -> String {
    let numbers: Vec<String> = hits.iter().map(|(i, _)| format!("{}.", i + 1)).collect();

    let mut widths = [NO_HEADER.len(), 0, 0, 0, 0];
    for (col, field) in Field::ALL.iter().enumerate() {
        widths[col + 1] = field.label().chars().count();
    }
    for (number, (_, record)) in numbers.iter().zip(hits) {
        widths[0] = widths[0].max(number.chars().count());
        for (col, (_, value)) in record.fields().enumerate() {
            widths[col + 1] = widths[col + 1].max(value.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<&str> = std::iter::once(NO_HEADER)
        .chain(Field::ALL.iter().map(|f| f.label()))
        .collect();
    push_row(&mut out, &header, &widths);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(
        &mut out,
        &rule.iter().map(String::as_str).collect::<Vec<_>>(),
        &widths,
    );

    for (number, (_, record)) in numbers.iter().zip(hits) {
        let cells: Vec<&str> = std::iter::once(number.as_str())
            .chain(record.fields().map(|(_, v)| v))
            .collect();
        push_row(&mut out, &cells, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[&str], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Render one record as labelled lines, for confirmation prompts.
#[must_use]
pub fn render_details(record: &StudentRecord) -> String {
    record
        .fields()
        .map(|(field, value)| format!("  {:<13}: {value}\n", field.label()))
        .collect()
}

/// Render field errors as labelled lines.
#[must_use]
pub fn render_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("  {}: {msg}\n", field.label()))
        .collect()
}
