//! Capability trait implemented by every provider adapter.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::YogiError;
use crate::types::{Model, ModelVersion};

/// The fixed capability set a model provider adapter implements.
///
/// Every call issues one or more outbound HTTP requests; adapters hold no
/// mutable state beyond their configuration. Cross-cutting concerns
/// (caching, metrics) live in the registry, not here.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Registry name of this provider.
    fn name(&self) -> &str;

    /// Fetch one model's metadata.
    ///
    /// Fails with [`YogiError::NotFound`] when the upstream API reports a
    /// missing resource, and [`YogiError::Upstream`] for any other non-2xx
    /// response.
    async fn get_model(&self, id: &str) -> Result<Model, YogiError>;

    /// List or search models.
    ///
    /// `query` is an opaque free-text filter, forwarded to the upstream
    /// search where one exists and applied as a case-insensitive substring
    /// match otherwise. An empty result is not an error.
    async fn get_models(&self, query: Option<&str>) -> Result<Vec<Model>, YogiError>;

    /// All known versions of a model, provider order preserved.
    ///
    /// Providers without a versioning concept synthesize exactly one
    /// pseudo-version per model.
    async fn get_model_versions(&self, model_id: &str) -> Result<Vec<ModelVersion>, YogiError>;

    /// Submit one inference request with free-form input parameters.
    ///
    /// The upstream result is returned as-is. Providers with asynchronous
    /// job semantics are still exposed as a single call; no poll loop is
    /// run here.
    async fn run_prediction(
        &self,
        model_id: &str,
        version: &str,
        input: Value,
    ) -> Result<Value, YogiError>;
}
