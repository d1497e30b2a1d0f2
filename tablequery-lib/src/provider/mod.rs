//! Remote data providers
//!
//! A [`DataProvider`] turns a [`QueryRequest`] into one page of records. The
//! controller only knows this trait; [`HttpProvider`] is the implementation
//! for HTTP endpoints.

mod http;
mod response;

pub use http::*;
pub use response::*;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::query::QueryRequest;

/// Source of table records.
///
/// Implementations must be idempotent reads: the controller may issue a
/// request whose response it later discards.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches the records matching `request`.
    async fn fetch(&self, request: &QueryRequest) -> Result<ProviderResponse, ApiError>;
}

#[async_trait]
impl<P: DataProvider + ?Sized> DataProvider for Arc<P> {
    async fn fetch(&self, request: &QueryRequest) -> Result<ProviderResponse, ApiError> {
        (**self).fetch(request).await
    }
}
