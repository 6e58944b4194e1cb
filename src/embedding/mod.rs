//! Text embedders for the case store

pub mod engine;
pub mod hash;

use crate::errors::{PredictorError, Result};
use std::sync::Arc;

pub use engine::NomicEmbedder;
pub use hash::HashEmbedder;

/// Maps a case description or free-text query to a fixed-size vector
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding for a search query; same as `embed` unless the model
    /// distinguishes queries from documents
    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(text)
    }

    fn dimension(&self) -> usize;
}

/// Run `f` on the blocking pool; model inference must not stall async workers
pub async fn embed_blocking<F>(embedder: &Arc<dyn Embedder>, f: F) -> Result<Vec<f32>>
where
    F: FnOnce(&dyn Embedder) -> Result<Vec<f32>> + Send + 'static,
{
    let embedder = Arc::clone(embedder);
    tokio::task::spawn_blocking(move || f(embedder.as_ref()))
        .await
        .map_err(|e| PredictorError::Generic(format!("Embedding task failed: {}", e)))?
}

/// Cosine similarity; zero when either vector has no magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
