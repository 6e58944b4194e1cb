//! Deterministic digest embedding
//!
//! The MD5 hex digest is split into 4-digit chunks, each normalized by
//! 65535, and the vector is zero-padded to the configured dimension. Equal
//! texts map to equal vectors; nothing else is semantically meaningful.

use super::Embedder;
use crate::errors::Result;

/// Dimension of the hosted `dengue-cases` index
pub const DEFAULT_DIMENSION: usize = 1536;

#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hex = format!("{:x}", md5::compute(text.as_bytes()));

        let mut embedding: Vec<f32> = hex
            .as_bytes()
            .chunks(4)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok())
            .filter_map(|chunk| u16::from_str_radix(chunk, 16).ok())
            .map(|value| value as f32 / 65535.0)
            .take(self.dimension)
            .collect();

        embedding.resize(self.dimension, 0.0);
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
