//! Case logging and retrieval
//!
//! Every prediction can be logged with its risk score into a vector store;
//! stored cases back similarity search and per-area statistics.

pub mod ingest;
pub mod memory_store;
pub mod record;
pub mod stats;
pub mod vector_db;

use crate::cli::config::VectorDbConfig;
use crate::embedding::{Embedder, HashEmbedder, NomicEmbedder};
use crate::errors::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use ingest::{ingest_cases, HistoricalCase, IngestReport};
pub use memory_store::InMemoryCaseStore;
pub use record::{CaseRecord, SimilarCase, StoredCase};
pub use stats::{AreaRisk, AreaStatistics};
pub use vector_db::QdrantCaseStore;

/// Default number of neighbours for similarity search
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

/// Default average risk for `high_risk_areas`
pub const DEFAULT_HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Vector index of logged cases
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Store a case; returns its id
    async fn add_case(&self, record: &CaseRecord) -> Result<String>;

    async fn search_similar(&self, query: &str, limit: usize) -> Result<Vec<SimilarCase>>;

    async fn area_statistics(&self, district: &str, area: &str) -> Result<Option<AreaStatistics>>;

    async fn high_risk_areas(&self, threshold: f64) -> Result<Vec<AreaRisk>>;

    async fn count(&self) -> Result<u64>;

    /// Backend name for diagnostics
    fn backend(&self) -> &str;
}

/// Build the configured embedder
pub fn build_embedder(config: &VectorDbConfig) -> Result<Arc<dyn Embedder>> {
    match config.embedder.as_str() {
        "nomic" => Ok(Arc::new(NomicEmbedder::new()?)),
        _ => Ok(Arc::new(HashEmbedder::default())),
    }
}

/// Connect the configured store; `None` when case logging is disabled
pub async fn connect_store(config: &VectorDbConfig) -> Result<Option<Arc<dyn CaseStore>>> {
    if !config.enabled {
        return Ok(None);
    }

    let embedder = build_embedder(config)?;
    let store = QdrantCaseStore::connect(config, embedder).await?;
    Ok(Some(Arc::new(store)))
}
