//! `inspect` command: what the normalizer made of a file.

use std::collections::BTreeMap;
use std::fmt::Display;

use mediaintel_analytics::summarize;

use crate::session::Session;

pub(crate) fn run_inspect(session: &Session) {
    print!("{}", render_inspect(session));
}

pub(crate) fn render_inspect(session: &Session) -> String {
    let mut out = Vec::new();

    out.push("Columns".to_string());
    for (field, column) in session.columns.columns() {
        out.push(format!("  {field:?} <- {column}"));
    }
    if !session.columns.ignored().is_empty() {
        out.push(format!("  ignored: {}", session.columns.ignored().join(", ")));
    }

    let report = &session.rejections;
    out.push(String::new());
    out.push(format!(
        "Rows: {} read, {} accepted, {} rejected, {} duplicates",
        report.total_rows, report.accepted, report.rejected, report.duplicates
    ));
    for (reason, count) in &report.reasons {
        out.push(format!("  {reason}: {count}"));
    }
    for sample in &report.samples {
        if sample.detail.is_empty() {
            out.push(format!("  row {}: {}", sample.row, sample.reason));
        } else {
            out.push(format!(
                "  row {}: {} ({})",
                sample.row, sample.reason, sample.detail
            ));
        }
    }

    let summary = summarize(&session.records);
    out.push(String::new());
    match summary.first_date.zip(summary.last_date) {
        Some((first, last)) => out.push(format!("Dates: {first} to {last}")),
        None => out.push("Dates: none".to_string()),
    }
    out.push(values_line("Platforms", &summary.platforms));
    out.push(values_line("Sentiments", &summary.sentiments));
    out.push(values_line("Media types", &summary.media_types));
    out.push(values_line("Locations", &summary.locations));

    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn values_line<K: Display>(label: &str, values: &BTreeMap<K, usize>) -> String {
    if values.is_empty() {
        return format!("{label}: none");
    }
    let listed: Vec<String> = values.iter().map(|(k, n)| format!("{k} ({n})")).collect();
    format!("{label}: {}", listed.join(", "))
}
