//! HTTP implementation of the catalog backend

use super::types::{
    error_field, key_status_from_value, status_field, AdditionalReviewsRequest, FindRequest,
    FindResponse, KeyStatus, MessageAnswer, MessageRequest, SearchRequest, SearchResponse,
};
use super::BackendError;
use crate::runtime::CatalogBackend;
use crate::session::{AppId, CatalogItem, ItemDetail};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const SUCCESS: &str = "success";

/// Talks to the catalog backend over one configured base endpoint
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let value = Self::execute(self.client.post(self.url(path)).json(body)).await?;
        serde_json::from_value(value)
            .map_err(|e| BackendError::decode(format!("Failed to parse {path} response: {e}")))
    }

    /// Send the request and return the body of a successful response
    async fn execute(request: RequestBuilder) -> Result<Value, BackendError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::timeout(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                BackendError::connect(format!("Connection failed: {e}"))
            } else {
                BackendError::transport(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::transport(format!("Failed to read response: {e}")))?;
        let parsed = serde_json::from_str::<Value>(&body);

        if !status.is_success() {
            let message = parsed
                .as_ref()
                .ok()
                .and_then(error_field)
                .map_or_else(
                    || format!("Request failed with status code {}", status.as_u16()),
                    str::to_string,
                );
            return Err(BackendError::rejected(message).with_status(status.as_u16()));
        }

        let value = parsed
            .map_err(|e| BackendError::decode(format!("Response is not JSON: {e}")))?;

        if status_field(&value) == Some(SUCCESS) {
            return Ok(value);
        }
        let message = error_field(&value).map_or_else(
            || {
                format!(
                    "Unexpected response status: {}",
                    status_field(&value).unwrap_or("missing")
                )
            },
            str::to_string,
        );
        Err(BackendError::rejected(message).with_status(status.as_u16()))
    }
}

#[async_trait]
impl CatalogBackend for HttpBackend {
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, BackendError> {
        let response: SearchResponse = self.post("search", &SearchRequest { query }).await?;
        Ok(response.results)
    }

    async fn find(&self, app_id: AppId) -> Result<ItemDetail, BackendError> {
        let response: FindResponse = self.post("find", &FindRequest { app_id }).await?;
        Ok(response.details)
    }

    async fn message(&self, text: &str) -> Result<MessageAnswer, BackendError> {
        self.post("message", &MessageRequest { message: text }).await
    }

    async fn additional_reviews(&self, query: &str) -> Result<(), BackendError> {
        let _: IgnoredAny = self
            .post("additional-reviews", &AdditionalReviewsRequest { query })
            .await?;
        Ok(())
    }

    async fn key_status(&self) -> Result<KeyStatus, BackendError> {
        let value = Self::execute(self.client.get(self.url("keys"))).await?;
        Ok(key_status_from_value(&value))
    }
}
