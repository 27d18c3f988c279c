//! Report analysis: windows, filtering and summary statistics.

pub mod aggregator;
pub mod window;

pub use aggregator::*;
pub use window::ReportWindow;
