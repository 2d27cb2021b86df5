//! Wire types for the catalog backend

use crate::session::{AppId, CatalogItem, ItemDetail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Body of `POST /search`
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
}

/// Body of `POST /find`
#[derive(Debug, Serialize)]
pub struct FindRequest {
    pub app_id: AppId,
}

/// Body of `POST /message`
#[derive(Debug, Serialize)]
pub struct MessageRequest<'a> {
    pub message: &'a str,
}

/// Body of `POST /additional-reviews`
#[derive(Debug, Serialize)]
pub struct AdditionalReviewsRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize)]
pub struct FindResponse {
    pub details: ItemDetail,
}

/// Assistant answer to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAnswer {
    pub response: String,
    /// Most relevant review backing the answer
    #[serde(default)]
    pub review_text: Option<String>,
}

/// Which backend credentials are configured, keyed by credential name
pub type KeyStatus = BTreeMap<String, bool>;

/// Extract the credential flags from a `/keys` payload
#[must_use]
pub fn key_status_from_value(value: &Value) -> KeyStatus {
    value
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(name, flag)| flag.as_bool().map(|flag| (name.clone(), flag)))
                .collect()
        })
        .unwrap_or_default()
}

/// Message of a nested `error` field, if the body carries one
#[must_use]
pub fn error_field(value: &Value) -> Option<&str> {
    value.get("error").and_then(Value::as_str)
}

/// The top-level `status` field
#[must_use]
pub fn status_field(value: &Value) -> Option<&str> {
    value.get("status").and_then(Value::as_str)
}
