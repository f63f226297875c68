use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::error::FetchError;
use crate::models::{Query, Report};
use crate::ports::DemographicsSource;

/// In-memory demographics source keyed by municipality name.
///
/// Lookups are case-insensitive. Unknown names answer with the same
/// application failure the data service uses.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: RwLock<HashMap<String, Result<Report, FetchError>>>,
    requests: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a report under its own municipality name
    pub fn with_report(self, report: Report) -> Self {
        let key = report.municipality.clone();
        self.with_outcome(&key, Ok(report))
    }

    /// Register an arbitrary outcome for a name
    pub fn with_outcome(self, name: &str, outcome: Result<Report, FetchError>) -> Self {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(name.to_lowercase(), outcome);
        }
        self
    }

    /// Number of fetches issued against this source
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DemographicsSource for MemorySource {
    async fn fetch(&self, query: &Query) -> Result<Report, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let entries = self
            .entries
            .read()
            .map_err(|e| FetchError::transport(format!("Lock error: {}", e)))?;

        match entries.get(&query.as_str().to_lowercase()) {
            Some(outcome) => outcome.clone(),
            None => Err(FetchError::application(Some(format!(
                "No municipality found for '{}'",
                query
            )))),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}
