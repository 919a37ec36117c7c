//! OpenRouter provider adapter.
//!
//! OpenRouter exposes a flat `/models` catalog with no search endpoint and
//! no versioning concept: search happens locally and every model carries
//! exactly one synthesized `latest` pseudo-version. Predictions go to the
//! OpenAI-compatible chat/completion endpoints depending on the input
//! shape.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::YogiError;
use crate::providers::http::decode_json;
use crate::providers::openai_compat::{matches_query, pseudo_version, shape_prediction};
use crate::traits::ModelProvider;
use crate::types::{Model, ModelVersion};
use crate::utils::join_url;

const PROVIDER_NAME: &str = "openrouter";
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_REFERER: &str = "https://github.com/yogi-ai/yogi";
const DEFAULT_TITLE: &str = "Yogi AI Platform";

/// Configuration for the OpenRouter adapter.
///
/// OpenRouter asks callers to identify themselves through the
/// `HTTP-Referer` and `X-Title` headers; both have library defaults and can
/// be overridden.
#[derive(Clone)]
pub struct OpenRouterConfig {
    api_key: SecretString,
    base_url: String,
    referer: String,
    title: String,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Read the key from `OPENROUTER_API_KEY`.
    pub fn from_env() -> Result<Self, YogiError> {
        let key = std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            YogiError::Configuration(
                "OPENROUTER_API_KEY environment variable is required".to_string(),
            )
        })?;
        Ok(Self::new(key))
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the `HTTP-Referer` attribution header.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    /// Set the `X-Title` attribution header.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// OpenRouter provider adapter.
#[derive(Clone)]
pub struct OpenRouterProvider {
    config: OpenRouterConfig,
    http_client: reqwest::Client,
}

/// Raw model shape returned by `GET /models`.
#[derive(Debug, Deserialize)]
struct OpenRouterModel {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    /// Unix timestamp of the model's listing.
    #[serde(default)]
    created: Option<i64>,
    #[serde(default)]
    context_length: Option<u64>,
    #[serde(default)]
    pricing: Option<Value>,
    #[serde(default)]
    top_provider: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<OpenRouterModel>,
}

impl OpenRouterProvider {
    pub fn new(config: OpenRouterConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(self.config.api_key.expose_secret())
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
    }

    async fn list_all(&self) -> Result<Vec<Model>, YogiError> {
        let url = join_url(&self.config.base_url, "models");
        debug!(%url, "openrouter request");
        let response = self.request(self.http_client.get(&url)).send().await?;
        let json = decode_json(PROVIDER_NAME, "Models", response).await?;
        let list: ModelList = serde_json::from_value(json)
            .map_err(|e| YogiError::Parse(format!("Failed to parse OpenRouter model list: {e}")))?;
        Ok(list.data.into_iter().map(Self::convert_model).collect())
    }

    fn convert_model(raw: OpenRouterModel) -> Model {
        let mut metadata = serde_json::Map::new();
        if let Some(len) = raw.context_length {
            metadata.insert("context_length".to_string(), Value::from(len));
        }
        if let Some(pricing) = raw.pricing {
            metadata.insert("pricing".to_string(), pricing);
        }
        if let Some(top) = raw.top_provider {
            metadata.insert("top_provider".to_string(), top);
        }

        Model {
            id: raw.id,
            provider: PROVIDER_NAME.to_string(),
            name: raw.name,
            description: raw.description,
            metadata,
            latest_version: Some(pseudo_version(raw.created)),
        }
    }
}

#[async_trait]
impl ModelProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_model(&self, id: &str) -> Result<Model, YogiError> {
        // no single-model endpoint upstream; list and select
        let models = self.list_all().await?;
        models
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| YogiError::NotFound(format!("Model '{id}' not found")))
    }

    async fn get_models(&self, query: Option<&str>) -> Result<Vec<Model>, YogiError> {
        let models = self.list_all().await?;
        Ok(match query {
            Some(q) if !q.is_empty() => models
                .into_iter()
                .filter(|m| matches_query(m, q))
                .collect(),
            _ => models,
        })
    }

    async fn get_model_versions(&self, model_id: &str) -> Result<Vec<ModelVersion>, YogiError> {
        let model = self.get_model(model_id).await?;
        Ok(model
            .latest_version
            .map(|v| vec![v])
            .unwrap_or_else(|| vec![pseudo_version(None)]))
    }

    async fn run_prediction(
        &self,
        model_id: &str,
        _version: &str,
        input: Value,
    ) -> Result<Value, YogiError> {
        let (endpoint, body) = shape_prediction(PROVIDER_NAME, model_id, input)?;
        let url = join_url(&self.config.base_url, endpoint.path());
        debug!(%url, model_id, "openrouter prediction");
        let response = self
            .request(self.http_client.post(&url))
            .json(&body)
            .send()
            .await?;
        decode_json(PROVIDER_NAME, &format!("Model '{model_id}'"), response).await
    }
}
