//! Extraction of structured fields embedded in free text.
//!
//! Contact forms often deliver a single text blob such as:
//!
//! ```text
//! Email: jane@example.com
//! Message: Interested in the starter kit
//! for our agency.
//! ```
//!
//! or, on one line, `Email: jane@example.com, Message: hi`.
//!
//! A header matching `(?i)\b(email|message|rating)\s*:` may appear anywhere
//! in the text. Each value runs until the next header, with surrounding
//! whitespace and trailing `,`/`;` trimmed. Emails and ratings take the first
//! whitespace-separated token of their value. When a header repeats, the
//! first valid value wins. Text before the first header is ignored; when no
//! header is present nothing is extracted and callers keep the original text.

use regex::Regex;
use std::sync::OnceLock;

fn field_header_re() -> &'static Regex {
    static FIELD_HEADER_RE: OnceLock<Regex> = OnceLock::new();
    FIELD_HEADER_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(email|message|rating)\s*:").expect("valid embedded field regex")
    })
}

/// Fields found inside a text blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedFields {
    pub email: Option<String>,
    pub message: Option<String>,
    pub rating: Option<u8>,
}

impl EmbeddedFields {
    /// Whether any field was found.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.message.is_none() && self.rating.is_none()
    }
}

/// Extract embedded `Email:`, `Message:` and `Rating:` fields from `text`.
pub fn extract_embedded(text: &str) -> EmbeddedFields {
    let mut fields = EmbeddedFields::default();
    let headers: Vec<_> = field_header_re().captures_iter(text).collect();

    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value_end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let value = clean_value(&text[whole.end()..value_end]);

        match name.as_str().to_ascii_lowercase().as_str() {
            "email" => {
                if fields.email.is_none() {
                    fields.email = first_token(value).map(String::from);
                }
            }
            "message" => {
                if fields.message.is_none() && !value.is_empty() {
                    fields.message = Some(value.to_string());
                }
            }
            _ => {
                if fields.rating.is_none() {
                    fields.rating = first_token(value)
                        .and_then(|t| t.parse::<u8>().ok())
                        .filter(|r| *r <= 5);
                }
            }
        }
    }

    fields
}

fn clean_value(raw: &str) -> &str {
    raw.trim()
        .trim_end_matches([',', ';'])
        .trim_end()
}

fn first_token(value: &str) -> Option<&str> {
    value
        .split_whitespace()
        .next()
        .map(|t| t.trim_end_matches([',', ';']))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_has_no_fields() {
        let fields = extract_embedded("Looking for client acquisition strategy help");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_email_and_message() {
        let fields = extract_embedded("Email: jane@example.com\nMessage: Hello there");
        assert_eq!(fields.email.as_deref(), Some("jane@example.com"));
        assert_eq!(fields.message.as_deref(), Some("Hello there"));
        assert_eq!(fields.rating, None);
    }

    #[test]
    fn test_fields_on_one_line() {
        let fields = extract_embedded("Email: a@x.com, Message: hi");
        assert_eq!(fields.email.as_deref(), Some("a@x.com"));
        assert_eq!(fields.message.as_deref(), Some("hi"));

        let fields = extract_embedded("Email: jane@x.com Message: hello there; Rating: 4");
        assert_eq!(fields.email.as_deref(), Some("jane@x.com"));
        assert_eq!(fields.message.as_deref(), Some("hello there"));
        assert_eq!(fields.rating, Some(4));
    }

    #[test]
    fn test_multiline_message_and_case() {
        let text = "name: Jane\nEMAIL:jane@example.com\nmessage: first line\nsecond line\n\n";
        let fields = extract_embedded(text);
        assert_eq!(fields.email.as_deref(), Some("jane@example.com"));
        assert_eq!(fields.message.as_deref(), Some("first line\nsecond line"));
    }

    #[test]
    fn test_message_before_email() {
        let fields = extract_embedded("Message: Please call me\nEmail: bob@y.com");
        assert_eq!(fields.message.as_deref(), Some("Please call me"));
        assert_eq!(fields.email.as_deref(), Some("bob@y.com"));
    }

    #[test]
    fn test_rating_bounds() {
        assert_eq!(extract_embedded("Rating: 4").rating, Some(4));
        assert_eq!(extract_embedded("Rating: 9").rating, None);
        assert_eq!(extract_embedded("Rating: great").rating, None);
    }

    #[test]
    fn test_repeated_headers_first_valid_wins() {
        let fields = extract_embedded(
            "Email: first@x.com\nEmail: second@x.com\nRating: 4\nRating: nope\nMessage: one\nMessage: two",
        );
        assert_eq!(fields.email.as_deref(), Some("first@x.com"));
        assert_eq!(fields.rating, Some(4));
        assert_eq!(fields.message.as_deref(), Some("one"));

        let fields = extract_embedded("Rating: 9\nRating: 3\nEmail:\nEmail: late@x.com");
        assert_eq!(fields.rating, Some(3));
        assert_eq!(fields.email.as_deref(), Some("late@x.com"));
    }

    #[test]
    fn test_empty_field_values_ignored() {
        let fields = extract_embedded("Email:\nMessage:   ");
        assert!(fields.is_empty());
    }
}
