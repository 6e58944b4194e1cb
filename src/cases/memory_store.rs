//! Process-local case store with brute-force cosine search

use super::record::{CaseRecord, SimilarCase, StoredCase};
use super::stats::{self, AreaRisk, AreaStatistics};
use super::CaseStore;
use crate::embedding::{cosine_similarity, embed_blocking, Embedder, HashEmbedder};
use crate::errors::Result;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct InMemoryCaseStore {
    embedder: Arc<dyn Embedder>,
    entries: RwLock<Vec<(StoredCase, Vec<f32>)>>,
}

impl Default for InMemoryCaseStore {
    fn default() -> Self {
        Self::new(Arc::new(HashEmbedder::default()))
    }
}

impl InMemoryCaseStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of stored payloads in insertion order
    pub async fn cases(&self) -> Vec<StoredCase> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(case, _)| case.clone())
            .collect()
    }
}

#[async_trait]
impl CaseStore for InMemoryCaseStore {
    async fn add_case(&self, record: &CaseRecord) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let stored = record.to_stored(id.clone());
        let description = stored.description.clone();
        let embedding = embed_blocking(&self.embedder, move |e| e.embed(&description)).await?;
        self.entries.write().await.push((stored, embedding));
        Ok(id)
    }

    async fn search_similar(&self, query: &str, limit: usize) -> Result<Vec<SimilarCase>> {
        let query = query.to_string();
        let query_embedding = embed_blocking(&self.embedder, move |e| e.embed_query(&query)).await?;
        let entries = self.entries.read().await;

        let mut hits: Vec<SimilarCase> = entries
            .iter()
            .map(|(case, embedding)| SimilarCase {
                score: cosine_similarity(&query_embedding, embedding),
                case: case.clone(),
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn area_statistics(&self, district: &str, area: &str) -> Result<Option<AreaStatistics>> {
        let entries = self.entries.read().await;
        Ok(stats::area_statistics(
            entries.iter().map(|(case, _)| case),
            district,
            area,
        ))
    }

    async fn high_risk_areas(&self, threshold: f64) -> Result<Vec<AreaRisk>> {
        let entries = self.entries.read().await;
        Ok(stats::high_risk_areas(
            entries.iter().map(|(case, _)| case),
            threshold,
        ))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.entries.read().await.len() as u64)
    }

    fn backend(&self) -> &str {
        "memory"
    }
}
