//! Record aggregation and statistics.
//!
//! This module merges normalized sources, filters them to a window,
//! computes the summary block and orders records newest first.

use crate::analysis::window::ReportWindow;
use crate::models::{FeedbackRecord, ReportResult, Summary};
use crate::sources::RecordSource;
use std::collections::HashSet;
use tracing::debug;

/// Build a report from `sources` over `window`.
///
/// Inputs are not modified; calling twice with the same arguments gives the
/// same result.
pub fn generate_report(sources: &[RecordSource], window: &ReportWindow) -> ReportResult {
    let merged = merge_sources(sources);
    let merged_len = merged.len();

    let mut items = filter_by_window(merged, window);
    debug!(
        "{} of {} normalized records fall inside the window",
        items.len(),
        merged_len
    );

    sort_newest_first(&mut items);
    let summary = summarize(&items, window);

    ReportResult { summary, items }
}

/// Normalize each source and concatenate them in source order.
pub fn merge_sources(sources: &[RecordSource]) -> Vec<FeedbackRecord> {
    sources.iter().flat_map(|s| s.normalized()).collect()
}

/// Keep records whose timestamp lies inside the window.
pub fn filter_by_window(records: Vec<FeedbackRecord>, window: &ReportWindow) -> Vec<FeedbackRecord> {
    records
        .into_iter()
        .filter(|r| window.contains(r.timestamp))
        .collect()
}

/// Sort by timestamp, newest first. Ties keep their relative order.
pub fn sort_newest_first(records: &mut [FeedbackRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Compute summary statistics for the records of a window.
pub fn summarize(records: &[FeedbackRecord], window: &ReportWindow) -> Summary {
    let total = records.len();

    let unique_emails = records
        .iter()
        .map(|r| r.email.as_deref())
        .collect::<HashSet<_>>()
        .len();

    let ratings: Vec<u8> = records.iter().filter_map(|r| r.rating).collect();
    let average_rating = if ratings.is_empty() {
        0.0
    } else {
        let sum: u32 = ratings.iter().map(|&r| u32::from(r)).sum();
        round_one_decimal(f64::from(sum) / ratings.len() as f64)
    };

    let daily_average = round_one_decimal(total as f64 / window.days() as f64);

    Summary {
        total,
        unique_emails,
        average_rating,
        daily_average,
    }
}

/// Round half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Count records per source tag, most frequent first.
pub fn source_breakdown(records: &[FeedbackRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for record in records {
        let tag = record.display_source();
        match counts.iter_mut().find(|(name, _)| name == tag) {
            Some((_, count)) => *count += 1,
            None => counts.push((tag.to_string(), 1)),
        }
    }

    counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::adapter::FieldMapping;
    use serde_json::{json, Value};

    fn source(records: Vec<Value>) -> RecordSource {
        RecordSource::new("test", FieldMapping::feedback_data(), records)
    }

    fn window(start: &str, end: &str) -> ReportWindow {
        ReportWindow::parse(Some(start), Some(end)).unwrap()
    }

    #[test]
    fn test_window_scenario() {
        let sources = vec![RecordSource::new(
            "ai_file_requests",
            FieldMapping::ai_file_requests(),
            vec![
                json!({"email": "a@x.com", "ts": "2025-09-01"}),
                json!({"email": "b@y.com", "ts": "2025-09-05"}),
            ],
        )];

        let result = generate_report(&sources, &window("2025-09-01", "2025-09-04"));

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].email.as_deref(), Some("a@x.com"));
        assert_eq!(result.summary.total, 1);
        assert_eq!(result.summary.unique_emails, 1);
    }

    #[test]
    fn test_empty_input() {
        let result = generate_report(&[], &window("2025-09-01", "2025-09-04"));
        assert!(result.items.is_empty());
        assert_eq!(result.summary, Summary::default());
    }

    #[test]
    fn test_shared_email_counts_once() {
        let sources = vec![source(vec![
            json!({"email": "a@x.com", "timestamp": "2025-09-01T10:00:00Z"}),
            json!({"email": "a@x.com", "timestamp": "2025-09-02T10:00:00Z"}),
        ])];
        let result = generate_report(&sources, &window("2025-09-01", "2025-09-04"));
        assert_eq!(result.summary.total, 2);
        assert_eq!(result.summary.unique_emails, 1);
    }

    #[test]
    fn test_missing_email_is_one_bucket() {
        let sources = vec![source(vec![
            json!({"timestamp": "2025-09-01T10:00:00Z"}),
            json!({"timestamp": "2025-09-02T10:00:00Z"}),
            json!({"email": "a@x.com", "timestamp": "2025-09-02T11:00:00Z"}),
        ])];
        let result = generate_report(&sources, &window("2025-09-01", "2025-09-04"));
        assert_eq!(result.summary.unique_emails, 2);
    }

    #[test]
    fn test_average_rating_uses_present_ratings() {
        let sources = vec![source(vec![
            json!({"email": "a@x.com", "timestamp": "2025-09-01T10:00:00Z", "rating": 5}),
            json!({"email": "b@x.com", "timestamp": "2025-09-01T11:00:00Z", "rating": 4}),
            json!({"email": "c@x.com", "timestamp": "2025-09-01T12:00:00Z", "rating": 4}),
            json!({"email": "d@x.com", "timestamp": "2025-09-01T13:00:00Z"}),
        ])];
        let result = generate_report(&sources, &window("2025-09-01", "2025-09-04"));
        assert_eq!(result.summary.average_rating, 4.3);
    }

    #[test]
    fn test_daily_average() {
        let sources = vec![source(
            (1..=4)
                .map(|d| json!({"email": "a@x.com", "timestamp": format!("2025-09-0{}", d)}))
                .collect(),
        )];
        let result = generate_report(&sources, &window("2025-09-01", "2025-09-04"));
        assert_eq!(result.summary.total, 4);
        assert_eq!(result.summary.daily_average, 1.3);
    }

    #[test]
    fn test_sort_desc_and_stable_across_sources() {
        let first = RecordSource::new(
            "first",
            FieldMapping::feedback_data(),
            vec![
                json!({"email": "tie-1@x.com", "timestamp": "2025-09-02T00:00:00Z"}),
                json!({"email": "old@x.com", "timestamp": "2025-09-01T00:00:00Z"}),
            ],
        );
        let second = RecordSource::new(
            "second",
            FieldMapping::feedback_data(),
            vec![
                json!({"email": "new@x.com", "timestamp": "2025-09-03T00:00:00Z"}),
                json!({"email": "tie-2@x.com", "timestamp": "2025-09-02T00:00:00Z"}),
            ],
        );

        let result = generate_report(&[first, second], &window("2025-09-01", "2025-09-04"));
        let emails: Vec<_> = result
            .items
            .iter()
            .map(|r| r.display_email().to_string())
            .collect();
        assert_eq!(
            emails,
            vec!["new@x.com", "tie-1@x.com", "tie-2@x.com", "old@x.com"]
        );
    }

    #[test]
    fn test_invariants_hold_and_inputs_untouched() {
        let sources = vec![source(vec![
            json!({"email": "a@x.com", "timestamp": "2025-08-31T23:59:59Z"}),
            json!({"email": "b@x.com", "timestamp": "2025-09-02"}),
            json!({"email": "c@x.com", "timestamp": "garbage"}),
            json!({"email": "d@x.com"}),
            json!(42),
        ])];
        let before = sources[0].records.clone();
        let w = window("2025-09-01", "2025-09-04");

        let first = generate_report(&sources, &w);
        let second = generate_report(&sources, &w);

        assert_eq!(first, second);
        assert_eq!(sources[0].records, before);
        assert!(first.items.len() <= sources[0].records.len());
        assert_eq!(first.summary.total, first.items.len());
        assert!(first.items.iter().all(|r| w.contains(r.timestamp)));
    }

    #[test]
    fn test_source_breakdown() {
        let sources = vec![source(vec![
            json!({"timestamp": "2025-09-01", "source": "contact_form"}),
            json!({"timestamp": "2025-09-01", "source": "ai_files_form"}),
            json!({"timestamp": "2025-09-01", "source": "contact_form"}),
            json!({"timestamp": "2025-09-01"}),
        ])];
        let records = merge_sources(&sources);
        let breakdown = source_breakdown(&records);
        assert_eq!(breakdown[0], ("contact_form".to_string(), 2));
        assert_eq!(breakdown.len(), 3);
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(4.333), 4.3);
        assert_eq!(round_one_decimal(0.25), 0.3);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }
}
