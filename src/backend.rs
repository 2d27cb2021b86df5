//! Catalog backend client
//!
//! Wire types, error classification and the HTTP implementation of
//! [`CatalogBackend`].

mod error;
mod http;
mod types;

pub use error::{BackendError, BackendErrorKind};
pub use http::HttpBackend;
pub use types::{KeyStatus, MessageAnswer};

use crate::runtime::CatalogBackend;
use crate::session::{AppId, CatalogItem, ItemDetail};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Logging wrapper for catalog backends
pub struct LoggingBackend {
    inner: Arc<dyn CatalogBackend>,
}

impl LoggingBackend {
    #[must_use]
    pub fn new(inner: Arc<dyn CatalogBackend>) -> Self {
        Self { inner }
    }
}

fn log_outcome<T>(operation: &str, started: Instant, result: &Result<T, BackendError>) {
    let duration = started.elapsed();
    match result {
        Ok(_) => {
            tracing::info!(
                operation,
                duration_ms = %duration.as_millis(),
                "Backend request completed"
            );
        }
        Err(e) => {
            tracing::error!(
                operation,
                duration_ms = %duration.as_millis(),
                error = %e.message,
                kind = ?e.kind,
                status = ?e.status,
                "Backend request failed"
            );
        }
    }
}

#[async_trait]
impl CatalogBackend for LoggingBackend {
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, BackendError> {
        let started = Instant::now();
        let result = self.inner.search(query).await;
        if let Ok(items) = &result {
            tracing::debug!(query, count = items.len(), "Search results received");
        }
        log_outcome("search", started, &result);
        result
    }

    async fn find(&self, app_id: AppId) -> Result<ItemDetail, BackendError> {
        let started = Instant::now();
        let result = self.inner.find(app_id).await;
        log_outcome("find", started, &result);
        result
    }

    async fn message(&self, text: &str) -> Result<MessageAnswer, BackendError> {
        let started = Instant::now();
        let result = self.inner.message(text).await;
        if let Ok(answer) = &result {
            tracing::debug!(
                has_review = answer.review_text.is_some(),
                "Answer received"
            );
        }
        log_outcome("message", started, &result);
        result
    }

    async fn additional_reviews(&self, query: &str) -> Result<(), BackendError> {
        let started = Instant::now();
        let result = self.inner.additional_reviews(query).await;
        log_outcome("additional_reviews", started, &result);
        result
    }

    async fn key_status(&self) -> Result<KeyStatus, BackendError> {
        let started = Instant::now();
        let result = self.inner.key_status().await;
        log_outcome("keys", started, &result);
        result
    }
}

/// Names of backend credentials reported as not configured
///
/// # Errors
///
/// Propagates the failure of the `keys` request.
pub async fn missing_credentials(backend: &dyn CatalogBackend) -> Result<Vec<String>, BackendError> {
    let status = backend.key_status().await?;
    Ok(status
        .into_iter()
        .filter_map(|(name, configured)| (!configured).then_some(name))
        .collect())
}
