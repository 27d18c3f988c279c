//! Record sources and their collection.
//!
//! A report is built from one or more [`RecordSource`]s. In live mode the
//! remote endpoint is preferred and local storage is the fallback; demo mode
//! uses only the fixed dataset.

pub mod adapter;
pub mod demo;
pub mod extract;
pub mod remote;
pub mod storage;

use crate::analysis::window::ReportWindow;
use crate::models::{FeedbackRecord, ReportMode};
use adapter::FieldMapping;
use remote::{RemoteClient, RemoteError};
use serde_json::Value;
use storage::KeyValueStore;
use tracing::{info, warn};

/// A raw record collection plus the mapping that reads it.
#[derive(Debug, Clone)]
pub struct RecordSource {
    pub name: String,
    pub mapping: FieldMapping,
    pub records: Vec<Value>,
}

impl RecordSource {
    pub fn new(name: impl Into<String>, mapping: FieldMapping, records: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            mapping,
            records,
        }
    }

    /// Records that normalize cleanly, in stored order.
    pub fn normalized(&self) -> Vec<FeedbackRecord> {
        self.records
            .iter()
            .filter_map(|raw| self.mapping.normalize(raw))
            .collect()
    }
}

/// Sources gathered for one report.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub sources: Vec<RecordSource>,
    /// The remote endpoint failed and local storage was used instead.
    pub fell_back: bool,
}

impl Collected {
    /// Number of raw records across all sources.
    pub fn raw_len(&self) -> usize {
        self.sources.iter().map(|s| s.records.len()).sum()
    }

    /// Names of sources that hold at least one record.
    pub fn source_names(&self) -> Vec<String> {
        self.sources
            .iter()
            .filter(|s| !s.records.is_empty())
            .map(|s| s.name.clone())
            .collect()
    }
}

/// Gather the sources for `mode`.
///
/// Never fails: remote errors degrade to local storage with a warning.
pub async fn collect_sources(
    mode: ReportMode,
    store: &dyn KeyValueStore,
    remote: Option<&RemoteClient>,
    window: &ReportWindow,
) -> Collected {
    match mode {
        ReportMode::Demo => {
            info!("Demo mode: using the fixed demonstration dataset");
            Collected {
                sources: vec![demo::demo_source()],
                fell_back: false,
            }
        }
        ReportMode::Live => {
            let remote_result = match remote {
                Some(client) => {
                    info!("Fetching feedback from {}", client.base_url());
                    Some(client.fetch_source(window).await)
                }
                None => None,
            };
            resolve_live(remote_result, store)
        }
    }
}

/// Pick live sources given the outcome of the optional remote call.
pub fn resolve_live(
    remote_result: Option<Result<RecordSource, RemoteError>>,
    store: &dyn KeyValueStore,
) -> Collected {
    let fell_back = match remote_result {
        Some(Ok(source)) => {
            return Collected {
                sources: vec![source],
                fell_back: false,
            };
        }
        Some(Err(e)) => {
            warn!("Could not fetch from feedback endpoint: {}", e);
            warn!("Falling back to local storage");
            true
        }
        None => false,
    };

    let collected = Collected {
        sources: storage::local_sources(store),
        fell_back,
    };

    if collected.raw_len() == 0 {
        warn!("No stored feedback records found; the report will be empty");
    }

    collected
}
