// Case store on a Qdrant collection
#![allow(deprecated)]

use crate::cases::record::{CaseRecord, SimilarCase, StoredCase};
use crate::cases::stats::{self, AreaRisk, AreaStatistics};
use crate::cases::CaseStore;
use crate::cli::config::VectorDbConfig;
use crate::embedding::{embed_blocking, Embedder};
use anyhow::{Context, Result};
use async_trait::async_trait;
use qdrant_client::{
    client::QdrantClient,
    qdrant::{
        condition::ConditionOneOf, r#match::MatchValue, vectors_config::Config,
        with_payload_selector::SelectorOptions, Condition, CreateCollection, Distance,
        FieldCondition, Filter, Match, PointId, PointStruct, ScrollPoints, SearchPoints,
        Value as QdrantValue, VectorParams, VectorsConfig, WithPayloadSelector,
    },
};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Points fetched per scroll request when aggregating
const SCROLL_PAGE: u32 = 256;

pub struct QdrantCaseStore {
    client: QdrantClient,
    collection: String,
    embedder: Arc<dyn Embedder>,
}

impl QdrantCaseStore {
    /// Connect and create the collection if it does not exist
    pub async fn connect(config: &VectorDbConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let mut client_config = QdrantClient::from_url(&config.url);
        client_config.api_key = config.api_key.clone();
        let client = client_config
            .build()
            .context("Failed to create Qdrant client")?;

        let store = Self {
            client,
            collection: config.collection.clone(),
            embedder,
        };
        store.init_collection().await?;
        info!(url = %config.url, collection = %store.collection, "Connected to vector store");

        Ok(store)
    }

    async fn init_collection(&self) -> Result<()> {
        let collections = self.client.list_collections().await?;
        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            self.client
                .create_collection(&CreateCollection {
                    collection_name: self.collection.clone(),
                    vectors_config: Some(VectorsConfig {
                        config: Some(Config::Params(VectorParams {
                            size: self.embedder.dimension() as u64,
                            distance: Distance::Cosine.into(),
                            ..Default::default()
                        })),
                    }),
                    ..Default::default()
                })
                .await
                .context(format!("Failed to create collection: {}", self.collection))?;
            info!(collection = %self.collection, "Created vector collection");
        }

        Ok(())
    }

    async fn upsert(&self, record: &CaseRecord) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let stored = record.to_stored(id.clone());
        let description = stored.description.clone();
        let embedding = embed_blocking(&self.embedder, move |e| e.embed(&description)).await?;

        let mut payload = HashMap::new();
        if let JsonValue::Object(fields) = serde_json::to_value(&stored)? {
            for (key, value) in fields {
                if key != "id" {
                    payload.insert(key, json_to_qdrant_value(value));
                }
            }
        }

        let point = PointStruct::new(id.clone(), embedding, payload);
        self.client
            .upsert_points_blocking(&self.collection, None, vec![point], None)
            .await
            .context("Failed to upsert case")?;

        debug!(id = %id, "Stored case");
        Ok(id)
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SimilarCase>> {
        let query = query.to_string();
        let query_embedding = embed_blocking(&self.embedder, move |e| e.embed_query(&query)).await?;

        let search_result = self
            .client
            .search_points(&SearchPoints {
                collection_name: self.collection.clone(),
                vector: query_embedding,
                limit: limit as u64,
                with_payload: Some(WithPayloadSelector {
                    selector_options: Some(SelectorOptions::Enable(true)),
                }),
                ..Default::default()
            })
            .await
            .context("Failed to search cases")?;

        Ok(search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let case = payload_to_case(&point.id, point.payload)?;
                Some(SimilarCase {
                    score: point.score,
                    case,
                })
            })
            .collect())
    }

    /// Every stored case matching `filter`, following scroll pages
    async fn scroll_all(&self, filter: Option<Filter>) -> Result<Vec<StoredCase>> {
        let mut cases = Vec::new();
        let mut offset: Option<PointId> = None;

        loop {
            let page = self
                .client
                .scroll(&ScrollPoints {
                    collection_name: self.collection.clone(),
                    filter: filter.clone(),
                    offset: offset.take(),
                    limit: Some(SCROLL_PAGE),
                    with_payload: Some(WithPayloadSelector {
                        selector_options: Some(SelectorOptions::Enable(true)),
                    }),
                    ..Default::default()
                })
                .await
                .context("Failed to scroll cases")?;

            cases.extend(
                page.result
                    .into_iter()
                    .filter_map(|point| payload_to_case(&point.id, point.payload)),
            );

            match page.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(cases)
    }

    async fn collection_count(&self) -> Result<u64> {
        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .context("Failed to get collection info")?;

        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0))
    }
}

#[async_trait]
impl CaseStore for QdrantCaseStore {
    async fn add_case(&self, record: &CaseRecord) -> crate::errors::Result<String> {
        Ok(self.upsert(record).await?)
    }

    async fn search_similar(
        &self,
        query: &str,
        limit: usize,
    ) -> crate::errors::Result<Vec<SimilarCase>> {
        Ok(self.search(query, limit).await?)
    }

    async fn area_statistics(
        &self,
        district: &str,
        area: &str,
    ) -> crate::errors::Result<Option<AreaStatistics>> {
        let filter = Filter {
            must: vec![keyword_condition("district", district), keyword_condition("area", area)],
            ..Default::default()
        };
        let cases = self.scroll_all(Some(filter)).await?;
        Ok(stats::area_statistics(&cases, district, area))
    }

    async fn high_risk_areas(&self, threshold: f64) -> crate::errors::Result<Vec<AreaRisk>> {
        let cases = self.scroll_all(None).await?;
        Ok(stats::high_risk_areas(&cases, threshold))
    }

    async fn count(&self) -> crate::errors::Result<u64> {
        Ok(self.collection_count().await?)
    }

    fn backend(&self) -> &str {
        "qdrant"
    }
}

fn keyword_condition(key: &str, value: &str) -> Condition {
    Condition {
        condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
            key: key.to_string(),
            r#match: Some(Match {
                match_value: Some(MatchValue::Keyword(value.to_string())),
            }),
            ..Default::default()
        })),
    }
}

fn payload_to_case(
    point_id: &Option<PointId>,
    payload: HashMap<String, QdrantValue>,
) -> Option<StoredCase> {
    let mut fields: Map<String, JsonValue> = payload
        .iter()
        .filter_map(|(key, value)| qdrant_to_json_value(value).map(|v| (key.clone(), v)))
        .collect();
    fields.insert("id".to_string(), JsonValue::String(point_id_to_string(point_id)));

    serde_json::from_value(JsonValue::Object(fields)).ok()
}

// Helper functions for type conversions
fn json_to_qdrant_value(json: JsonValue) -> QdrantValue {
    match json {
        JsonValue::String(s) => QdrantValue::from(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                QdrantValue::from(i)
            } else if let Some(f) = n.as_f64() {
                QdrantValue::from(f)
            } else {
                QdrantValue::from(0)
            }
        }
        JsonValue::Bool(b) => QdrantValue::from(b),
        _ => QdrantValue::from(""),
    }
}

fn qdrant_to_json_value(value: &QdrantValue) -> Option<JsonValue> {
    value.kind.as_ref().and_then(|kind| {
        use qdrant_client::qdrant::value::Kind;
        match kind {
            Kind::StringValue(s) => Some(JsonValue::String(s.clone())),
            Kind::IntegerValue(i) => Some(JsonValue::Number((*i).into())),
            Kind::DoubleValue(f) => serde_json::Number::from_f64(*f).map(JsonValue::Number),
            Kind::BoolValue(b) => Some(JsonValue::Bool(*b)),
            _ => None,
        }
    })
}

fn point_id_to_string(point_id: &Option<PointId>) -> String {
    point_id
        .as_ref()
        .map(|id| {
            use qdrant_client::qdrant::point_id::PointIdOptions;
            match &id.point_id_options {
                Some(PointIdOptions::Num(n)) => n.to_string(),
                Some(PointIdOptions::Uuid(u)) => u.clone(),
                None => "unknown".to_string(),
            }
        })
        .unwrap_or_else(|| "unknown".to_string())
}
