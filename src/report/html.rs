//! Standalone HTML rendering.
//!
//! Produces the summary counters and the submissions list as a single page.
//! All record text is escaped before it reaches the markup.

use crate::models::{FeedbackRecord, Report};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

const STYLE: &str = r#"body{font-family:system-ui,sans-serif;margin:2rem auto;max-width:56rem;color:#1d1d1f}
.summary{display:flex;gap:1rem;margin:1.5rem 0}
.stat-card{flex:1;border:1px solid #ddd;border-radius:8px;padding:1rem;text-align:center}
.stat-value{font-size:2rem;font-weight:600}
.submission-item{border-bottom:1px solid #eee;padding:.75rem 0}
.submission-email{font-weight:600}
.submission-date{color:#666;font-size:.875rem}
.submission-message{white-space:pre-wrap;margin-top:.25rem}
.no-data{color:#666;font-style:italic}"#;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a full HTML document for `report`.
pub fn generate_html_report(report: &Report) -> String {
    let meta = &report.metadata;
    let summary = &report.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Feedback Report</title>\n");
    html.push_str(&format!("<style>\n{}\n</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<h1>Feedback Report</h1>\n");

    html.push_str(&format!(
        "<p id=\"report-period\">Period: {} – {}</p>\n",
        meta.window_start.format(DATE_FORMAT),
        meta.window_end.format(DATE_FORMAT)
    ));
    if meta.fell_back {
        html.push_str(
            "<p class=\"notice\">Feedback endpoint unavailable; showing locally stored submissions.</p>\n",
        );
    }

    html.push_str("<div class=\"summary\">\n");
    html.push_str(&stat_card("total-submissions", "Total Submissions", &summary.total.to_string()));
    html.push_str(&stat_card(
        "unique-emails",
        "Unique Senders",
        &summary.unique_emails.to_string(),
    ));
    html.push_str(&stat_card(
        "average-rating",
        "Average Rating",
        &format!("{:.1}", summary.average_rating),
    ));
    html.push_str(&stat_card(
        "daily-average",
        "Daily Average",
        &format!("{:.1}", summary.daily_average),
    ));
    html.push_str("</div>\n");

    html.push_str("<div id=\"submissions-container\">\n");
    if report.items.is_empty() {
        html.push_str("<div class=\"no-data\">No feedback submissions found for this period</div>\n");
    } else {
        html.push_str("<div class=\"submissions-list\">\n");
        for item in &report.items {
            html.push_str(&submission_item(item));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n</body>\n</html>\n");

    html
}

fn stat_card(id: &str, label: &str, value: &str) -> String {
    format!(
        "<div class=\"stat-card\"><div class=\"stat-value\" id=\"{}\">{}</div><div class=\"stat-label\">{}</div></div>\n",
        id, value, label
    )
}

fn submission_item(item: &FeedbackRecord) -> String {
    let mut meta = format!(
        "{} • Source: {}",
        item.timestamp.format(DATETIME_FORMAT),
        escape_html(item.display_source())
    );
    if let Some(rating) = item.rating {
        meta.push_str(&format!(" • Rating: {}/5", rating));
    }

    format!(
        "<div class=\"submission-item\">\n<div class=\"submission-email\">{}</div>\n<div class=\"submission-date\">{}</div>\n<div class=\"submission-message\">{}</div>\n</div>\n",
        escape_html(item.display_email()),
        meta,
        escape_html(&item.message)
    )
}
