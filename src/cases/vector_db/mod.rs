//! Qdrant-backed case store

pub mod manager;

pub use manager::QdrantCaseStore;
