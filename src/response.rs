//! Response models wrapping decoded API payloads.

use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiError, Params};
use crate::document::Document;

/// A single record lookup.
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    pub document: Document,
    pub params: Params,
}

impl RecordResponse {
    /// Build from a record payload: `{"success": true, "object": {...}}`.
    pub fn from_json(json: Value, params: Params) -> Result<Self, ApiError> {
        let object = match json {
            Value::Object(mut map) => map.remove("object"),
            _ => None,
        };

        let document = object
            .and_then(Document::from_value)
            .ok_or_else(|| ApiError::Malformed("record response has no object".to_string()))?;

        Ok(Self { document, params })
    }
}

/// A page of search results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub total_results: u64,
    pub items_count: u64,
    pub documents: Vec<Document>,
    pub facets: Vec<Value>,
    pub params: Params,
}

impl SearchResponse {
    /// Build from a search payload. Missing counts are zero, missing lists
    /// empty, and items that are not objects are skipped.
    pub fn from_json(json: Value, params: Params) -> Self {
        let Value::Object(mut map) = json else {
            return Self::empty(params);
        };

        let documents: Vec<Document> = match map.remove("items") {
            Some(Value::Array(items)) => items.into_iter().filter_map(Document::from_value).collect(),
            _ => Vec::new(),
        };
        let facets = match map.remove("facets") {
            Some(Value::Array(facets)) => facets,
            _ => Vec::new(),
        };
        let total_results = map.get("totalResults").and_then(Value::as_u64).unwrap_or(0);
        let items_count = map
            .get("itemsCount")
            .and_then(Value::as_u64)
            .unwrap_or(documents.len() as u64);

        Self {
            total_results,
            items_count,
            documents,
            facets,
            params,
        }
    }

    fn empty(params: Params) -> Self {
        Self {
            total_results: 0,
            items_count: 0,
            documents: Vec::new(),
            facets: Vec::new(),
            params,
        }
    }
}
