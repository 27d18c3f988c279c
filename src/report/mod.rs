//! Report rendering: Markdown, JSON, HTML and CSV.

pub mod csv;
pub mod generator;
pub mod html;

pub use csv::generate_csv;
pub use generator::{generate_json_report, generate_markdown_report};
pub use html::generate_html_report;
