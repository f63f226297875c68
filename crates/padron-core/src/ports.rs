//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod memory;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{Query, Report};

pub use memory::MemorySource;

/// Port for the demographic data service
#[async_trait]
pub trait DemographicsSource: Send + Sync {
    /// Resolve a municipality name to its demographic report
    ///
    /// Implementations issue exactly one request per call and never retry.
    async fn fetch(&self, query: &Query) -> std::result::Result<Report, FetchError>;

    /// Short identifier used in logs (e.g. the endpoint URL)
    fn name(&self) -> &str;
}
