//! Markdown and JSON report generation.
//!
//! This module generates Markdown feedback reports from an aggregated
//! [`Report`], plus a pretty-printed JSON variant.

use crate::analysis::source_breakdown;
use crate::models::{FeedbackRecord, Report, ReportMetadata, Summary};
use anyhow::Result;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Feedback Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summary, &report.items));
    output.push_str(&generate_submissions_section(&report.items));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Period:** {} – {}\n",
        metadata.window_start.format(DATE_FORMAT),
        metadata.window_end.format(DATE_FORMAT)
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format(DATETIME_FORMAT)
    ));
    section.push_str(&format!("- **Mode:** {}\n", metadata.mode));

    if metadata.sources.is_empty() {
        section.push_str("- **Sources:** none\n");
    } else {
        section.push_str(&format!("- **Sources:** {}\n", metadata.sources.join(", ")));
    }

    if metadata.fell_back {
        section.push_str("- **Note:** feedback endpoint unavailable, local storage used\n");
    }
    section.push('\n');

    section
}

/// Generate the summary section.
fn generate_summary_section(summary: &Summary, items: &[FeedbackRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Total Submissions | Unique Senders | Average Rating | Daily Average |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {:.1} | {:.1} |\n\n",
        summary.total, summary.unique_emails, summary.average_rating, summary.daily_average
    ));

    let breakdown = source_breakdown(items);
    if !breakdown.is_empty() {
        section.push_str("### Submissions by Source\n\n");
        section.push_str("| Source | Count |\n");
        section.push_str("|:---|:---:|\n");
        for (source, count) in breakdown {
            section.push_str(&format!("| {} | {} |\n", source, count));
        }
        section.push('\n');
    }

    section
}

/// Generate the submissions list.
fn generate_submissions_section(items: &[FeedbackRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Submissions\n\n");

    if items.is_empty() {
        section.push_str("No feedback submissions found for this period.\n\n");
        return section;
    }

    for item in items {
        section.push_str(&generate_submission_block(item));
    }

    section
}

/// Generate a single submission block.
fn generate_submission_block(item: &FeedbackRecord) -> String {
    let mut block = String::new();

    block.push_str(&format!("### {}\n\n", markdown_inline(item.display_email())));
    block.push_str(&format!(
        "*{} • Source: {}",
        item.timestamp.format(DATETIME_FORMAT),
        markdown_inline(item.display_source())
    ));
    if let Some(rating) = item.rating {
        block.push_str(&format!(" • Rating: {}/5", rating));
    }
    block.push_str("*\n\n");

    if !item.message.is_empty() {
        for line in item.message.lines() {
            block.push_str("> ");
            block.push_str(&markdown_inline(line));
            block.push('\n');
        }
        block.push('\n');
    }

    block
}

/// Neutralize characters that would be read as Markdown or raw HTML.
fn markdown_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '*' | '_' | '`' | '[' | ']' | '#' | '|' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by feedback-report*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
