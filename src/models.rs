//! Data models for the feedback report.
//!
//! This module contains the core data structures used throughout
//! the application for representing records, summaries, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the report's records come from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Remote endpoint when configured, local storage otherwise
    #[default]
    Live,
    /// The fixed demonstration dataset only
    Demo,
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportMode::Live => write!(f, "live"),
            ReportMode::Demo => write!(f, "demo"),
        }
    }
}

/// A single normalized feedback submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Submitter's email, if the source carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Free-form message text.
    pub message: String,
    /// When the submission was made.
    pub timestamp: DateTime<Utc>,
    /// Rating between 0 and 5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Origin tag such as `contact_form` or `ai_files_form`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl FeedbackRecord {
    /// Email for display, or a placeholder when absent.
    pub fn display_email(&self) -> &str {
        self.email.as_deref().unwrap_or("(no email)")
    }

    /// Source tag for display.
    pub fn display_source(&self) -> &str {
        self.source.as_deref().unwrap_or("unknown")
    }
}

/// Summary statistics over the records in a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of records in the window.
    pub total: usize,
    /// Number of distinct emails; records without one share a bucket.
    pub unique_emails: usize,
    /// Mean of the present ratings, one decimal place.
    pub average_rating: f64,
    /// Records per day over the window, one decimal place.
    pub daily_average: f64,
}

/// Output of the aggregator: summary plus newest-first records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportResult {
    pub summary: Summary,
    pub items: Vec<FeedbackRecord>,
}

/// Metadata about how a report was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Inclusive window start.
    pub window_start: DateTime<Utc>,
    /// Inclusive window end.
    pub window_end: DateTime<Utc>,
    /// Mode the records were collected in.
    pub mode: ReportMode,
    /// Names of the sources that contributed records.
    pub sources: Vec<String>,
    /// Whether the remote endpoint failed and local storage was used instead.
    pub fell_back: bool,
}

/// The complete feedback report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: Summary,
    pub items: Vec<FeedbackRecord>,
}

impl Report {
    /// Attach metadata to an aggregation result.
    pub fn new(metadata: ReportMetadata, result: ReportResult) -> Self {
        Self {
            metadata,
            summary: result.summary,
            items: result.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_fallbacks() {
        let record = FeedbackRecord {
            email: None,
            message: "hi".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap(),
            rating: None,
            source: None,
        };
        assert_eq!(record.display_email(), "(no email)");
        assert_eq!(record.display_source(), "unknown");
    }

    #[test]
    fn test_mode_serde() {
        let mode: ReportMode = serde_json::from_str("\"demo\"").unwrap();
        assert_eq!(mode, ReportMode::Demo);
        assert_eq!(ReportMode::default().to_string(), "live");
    }

    #[test]
    fn test_record_skips_absent_fields() {
        let record = FeedbackRecord {
            email: Some("a@x.com".to_string()),
            message: "hello".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap(),
            rating: None,
            source: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"email\""));
        assert!(!json.contains("\"rating\""));
        assert!(!json.contains("\"source\""));
    }
}
