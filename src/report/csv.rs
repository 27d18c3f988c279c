//! CSV export of loaded submissions.

use crate::models::FeedbackRecord;
use chrono::SecondsFormat;

const HEADER: [&str; 3] = ["email", "message", "timestamp"];

/// Export records as CSV with columns `email,message,timestamp`.
pub fn generate_csv(items: &[FeedbackRecord]) -> String {
    let mut csv = String::new();
    csv.push_str(&HEADER.join(","));
    csv.push('\n');

    for item in items {
        let fields = [
            item.email.clone().unwrap_or_default(),
            item.message.clone(),
            item.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        ];
        let line = fields
            .iter()
            .map(|field| escape_csv(field))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    csv
}

/// Quote a field when it holds a delimiter, quote, or line break.
fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}
