//! Fixed demonstration dataset.
//!
//! Only used when the caller asks for demo mode; never mixed with live data.

use super::adapter::FieldMapping;
use super::RecordSource;
use serde_json::{json, Value};

/// Name reported for demo records.
pub const DEMO_SOURCE_NAME: &str = "demo";

/// The demo records as raw JSON, newest first.
pub fn demo_records() -> Vec<Value> {
    vec![
        json!({
            "email": "john@techstartup.com",
            "message": "Interested in AI visibility kit for our SaaS product",
            "timestamp": "2025-09-18T14:30:00.000Z",
            "source": "contact_form"
        }),
        json!({
            "email": "sarah@marketingagency.io",
            "message": "agentbase inbound",
            "timestamp": "2025-09-17T09:15:00.000Z",
            "source": "ai_files_form"
        }),
        json!({
            "email": "mike@consultancy.net",
            "message": "Looking for client acquisition strategy help",
            "timestamp": "2025-09-16T16:45:00.000Z",
            "source": "contact_form"
        }),
        json!({
            "email": "lisa@ecommerce.shop",
            "message": "agentbase inbound",
            "timestamp": "2025-09-15T11:20:00.000Z",
            "source": "ai_files_form"
        }),
        json!({
            "email": "david@b2bsoftware.com",
            "message": "Demo request for AI-first marketing approach",
            "timestamp": "2025-09-14T13:30:00.000Z",
            "source": "calendly"
        }),
    ]
}

/// The demo dataset as a single source.
pub fn demo_source() -> RecordSource {
    RecordSource::new(
        DEMO_SOURCE_NAME,
        FieldMapping::feedback_data(),
        demo_records(),
    )
}
