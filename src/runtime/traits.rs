//! Trait abstractions for runtime I/O
//!
//! The runtime only talks to the backend through `CatalogBackend`, so the
//! executor can be tested with mock implementations.

use crate::backend::{BackendError, KeyStatus, MessageAnswer};
use crate::session::{AppId, CatalogItem, ItemDetail};
use async_trait::async_trait;
use std::sync::Arc;

/// The remote catalog assistant
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Search the catalog
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, BackendError>;

    /// Fetch detail for one item
    async fn find(&self, app_id: AppId) -> Result<ItemDetail, BackendError>;

    /// Ask a question about the selected item
    async fn message(&self, text: &str) -> Result<MessageAnswer, BackendError>;

    /// Widen the evidence pool for `query`. Only success matters.
    async fn additional_reviews(&self, query: &str) -> Result<(), BackendError>;

    /// Which credentials the backend has configured
    async fn key_status(&self) -> Result<KeyStatus, BackendError>;
}

// ============================================================================
// Arc implementation for trait objects
// ============================================================================

#[async_trait]
impl<T: CatalogBackend + ?Sized> CatalogBackend for Arc<T> {
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, BackendError> {
        (**self).search(query).await
    }

    async fn find(&self, app_id: AppId) -> Result<ItemDetail, BackendError> {
        (**self).find(app_id).await
    }

    async fn message(&self, text: &str) -> Result<MessageAnswer, BackendError> {
        (**self).message(text).await
    }

    async fn additional_reviews(&self, query: &str) -> Result<(), BackendError> {
        (**self).additional_reviews(query).await
    }

    async fn key_status(&self) -> Result<KeyStatus, BackendError> {
        (**self).key_status().await
    }
}
