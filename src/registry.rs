//! Provider-agnostic façade over the registered model adapters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CachedValue, ResponseCache};
use crate::error::YogiError;
use crate::metrics::MetricsSink;
use crate::traits::ModelProvider;
use crate::types::{Model, ModelVersion};

/// Resolves provider names to adapters and wraps each read operation with
/// the cache and metrics collaborators handed in at construction.
///
/// Registration is last-write-wins: registering a second adapter under an
/// existing name silently replaces the first. This is intentional — callers
/// and tests rely on the override behavior.
///
/// Predictions are never cached; they are not idempotent.
pub struct ModelRegistry {
    providers: Mutex<HashMap<String, Arc<dyn ModelProvider>>>,
    cache: ResponseCache,
    metrics: MetricsSink,
}

impl Default for ModelRegistry {
    /// Registry with a fresh five-minute cache and a fresh counter sink.
    fn default() -> Self {
        Self::new(ResponseCache::default(), MetricsSink::new())
    }
}

impl ModelRegistry {
    /// Create a registry with the given collaborators.
    ///
    /// Handing in fresh instances per test gives full isolation without any
    /// global reset.
    pub fn new(cache: ResponseCache, metrics: MetricsSink) -> Self {
        Self {
            providers: Mutex::new(HashMap::new()),
            cache,
            metrics,
        }
    }

    /// Registry pre-populated with every adapter whose credentials are
    /// present in the environment.
    ///
    /// Looks for `REPLICATE_API_TOKEN`, `OPENROUTER_API_KEY` and
    /// `GROQ_API_KEY`; providers without credentials are simply skipped.
    pub fn from_env() -> Result<Self, YogiError> {
        let registry = Self::default();

        #[cfg(feature = "replicate")]
        if let Ok(config) = crate::providers::replicate::ReplicateConfig::from_env() {
            registry.register_provider(Arc::new(crate::providers::replicate::ReplicateProvider::new(
                config,
                reqwest::Client::new(),
            )))?;
        }

        #[cfg(feature = "openrouter")]
        if let Ok(config) = crate::providers::openrouter::OpenRouterConfig::from_env() {
            registry.register_provider(Arc::new(
                crate::providers::openrouter::OpenRouterProvider::new(config, reqwest::Client::new()),
            ))?;
        }

        #[cfg(feature = "groq")]
        if let Ok(config) = crate::providers::groq::GroqConfig::from_env() {
            registry.register_provider(Arc::new(crate::providers::groq::GroqProvider::new(
                config,
                reqwest::Client::new(),
            )))?;
        }

        Ok(registry)
    }

    /// Store `adapter` under its name, overwriting any previous registration.
    pub fn register_provider(&self, adapter: Arc<dyn ModelProvider>) -> Result<(), YogiError> {
        let name = adapter.name().to_string();
        let mut providers = self.lock_providers()?;
        if providers.insert(name.clone(), adapter).is_some() {
            debug!(provider = %name, "replaced existing provider registration");
        }
        Ok(())
    }

    /// Resolve a provider by name.
    ///
    /// Also exposed for test introspection.
    pub fn provider(&self, name: &str) -> Result<Arc<dyn ModelProvider>, YogiError> {
        self.lock_providers()?
            .get(name)
            .cloned()
            .ok_or_else(|| YogiError::ProviderNotFound(name.to_string()))
    }

    /// Names of all registered providers.
    pub fn provider_names(&self) -> Result<Vec<String>, YogiError> {
        Ok(self.lock_providers()?.keys().cloned().collect())
    }

    /// Fetch one model, memoized under `model:<provider>:<id>`.
    pub async fn get_model(&self, provider: &str, id: &str) -> Result<Model, YogiError> {
        let key = format!("model:{provider}:{id}");
        if let Some(CachedValue::Model(model)) = self.cache.get(&key)? {
            debug!(provider, id, "model cache hit");
            return Ok(model);
        }

        let adapter = self.provider(provider)?;
        match adapter.get_model(id).await {
            Ok(model) => {
                self.cache.insert(key, CachedValue::Model(model.clone()))?;
                self.metrics.incr(format!("{provider}_model_fetches"))?;
                Ok(model)
            }
            Err(err) => {
                warn!(provider, id, error = %err, "model fetch failed");
                self.metrics.incr(format!("{provider}_model_errors"))?;
                Err(err)
            }
        }
    }

    /// List or search models, memoized under `models:<provider>:<query-or-*>`.
    pub async fn get_models(
        &self,
        provider: &str,
        query: Option<&str>,
    ) -> Result<Vec<Model>, YogiError> {
        let key = format!("models:{provider}:{}", query.unwrap_or("*"));
        if let Some(CachedValue::Models(models)) = self.cache.get(&key)? {
            debug!(provider, query, "model list cache hit");
            return Ok(models);
        }

        let adapter = self.provider(provider)?;
        match adapter.get_models(query).await {
            Ok(models) => {
                self.cache.insert(key, CachedValue::Models(models.clone()))?;
                self.metrics.incr(format!("{provider}_models_fetches"))?;
                Ok(models)
            }
            Err(err) => {
                warn!(provider, query, error = %err, "model list fetch failed");
                self.metrics.incr(format!("{provider}_models_errors"))?;
                Err(err)
            }
        }
    }

    /// List a model's versions, memoized under `versions:<provider>:<modelId>`.
    pub async fn get_model_versions(
        &self,
        provider: &str,
        model_id: &str,
    ) -> Result<Vec<ModelVersion>, YogiError> {
        let key = format!("versions:{provider}:{model_id}");
        if let Some(CachedValue::Versions(versions)) = self.cache.get(&key)? {
            debug!(provider, model_id, "version list cache hit");
            return Ok(versions);
        }

        let adapter = self.provider(provider)?;
        match adapter.get_model_versions(model_id).await {
            Ok(versions) => {
                self.cache
                    .insert(key, CachedValue::Versions(versions.clone()))?;
                self.metrics.incr(format!("{provider}_versions_fetches"))?;
                Ok(versions)
            }
            Err(err) => {
                warn!(provider, model_id, error = %err, "version list fetch failed");
                self.metrics.incr(format!("{provider}_versions_errors"))?;
                Err(err)
            }
        }
    }

    /// Submit one inference request. Never cached.
    pub async fn run_prediction(
        &self,
        provider: &str,
        model_id: &str,
        version: &str,
        input: Value,
    ) -> Result<Value, YogiError> {
        let adapter = self.provider(provider)?;
        match adapter.run_prediction(model_id, version, input).await {
            Ok(result) => {
                self.metrics.incr(format!("{provider}_predictions"))?;
                Ok(result)
            }
            Err(err) => {
                warn!(provider, model_id, version, error = %err, "prediction failed");
                self.metrics.incr(format!("{provider}_prediction_errors"))?;
                Err(err)
            }
        }
    }

    /// Snapshot of all counters. Never resets state.
    pub fn metrics(&self) -> Result<HashMap<String, u64>, YogiError> {
        self.metrics.snapshot()
    }

    /// Drop all cache entries immediately.
    pub fn clear_cache(&self) -> Result<(), YogiError> {
        self.cache.clear()
    }

    fn lock_providers(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, Arc<dyn ModelProvider>>>, YogiError> {
        self.providers
            .lock()
            .map_err(|e| YogiError::Internal(format!("provider map lock poisoned: {e}")))
    }
}
