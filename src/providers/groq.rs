//! Groq provider adapter.
//!
//! Groq serves an OpenAI-compatible surface. Like OpenRouter it has no
//! search endpoint and no versioning, so the same local filtering and
//! pseudo-version synthesis apply. Predictions default `max_tokens` to a
//! conservative 1024 when the caller does not set one.

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

const PROVIDER_NAME: &str = "groq";
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";
const DEFAULT_MAX_TOKENS: u64 = 1024;

/// Configuration for the Groq adapter.
#[derive(Clone)]
pub struct GroqConfig {
    api_key: SecretString,
    base_url: String,
    default_model: String,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Read the key from `GROQ_API_KEY` and the default model from
    /// `GROQ_MODEL` when set.
    pub fn from_env() -> Result<Self, YogiError> {
        let key = std::env::var("GROQ_API_KEY").map_err(|_| {
            YogiError::Configuration("GROQ_API_KEY environment variable is required".to_string())
        })?;
        let mut config = Self::new(key);
        if let Ok(model) = std::env::var("GROQ_MODEL") {
            config.default_model = model;
        }
        Ok(config)
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model used when a prediction is submitted with an empty model id.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }
}

/// Groq provider adapter.
#[derive(Clone)]
pub struct GroqProvider {
    config: GroqConfig,
    http_client: reqwest::Client,
}

/// Raw model shape returned by `GET /models`.
#[derive(Debug, Deserialize)]
struct GroqModel {
    id: String,
    #[serde(default)]
    owned_by: Option<String>,
    #[serde(default)]
    created: Option<i64>,
    #[serde(default)]
    context_window: Option<u64>,
    #[serde(default)]
    active: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<GroqModel>,
}

impl GroqProvider {
    pub fn new(config: GroqConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    async fn list_all(&self) -> Result<Vec<Model>, YogiError> {
        let url = join_url(&self.config.base_url, "models");
        debug!(%url, "groq request");
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .send()
            .await?;
        let json = decode_json(PROVIDER_NAME, "Models", response).await?;
        let list: ModelList = serde_json::from_value(json)
            .map_err(|e| YogiError::Parse(format!("Failed to parse Groq model list: {e}")))?;
        Ok(list.data.into_iter().map(Self::convert_model).collect())
    }

    fn convert_model(raw: GroqModel) -> Model {
        let mut metadata = serde_json::Map::new();
        if let Some(owner) = raw.owned_by {
            metadata.insert("owned_by".to_string(), Value::String(owner));
        }
        if let Some(window) = raw.context_window {
            metadata.insert("context_window".to_string(), Value::from(window));
        }
        if let Some(active) = raw.active {
            metadata.insert("active".to_string(), Value::Bool(active));
        }

        Model {
            id: raw.id,
            provider: PROVIDER_NAME.to_string(),
            name: None,
            description: None,
            metadata,
            latest_version: Some(pseudo_version(raw.created)),
        }
    }
}

#[async_trait]
impl ModelProvider for GroqProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_model(&self, id: &str) -> Result<Model, YogiError> {
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
        let model = if model_id.is_empty() {
            self.config.default_model.as_str()
        } else {
            model_id
        };
        let (endpoint, mut body) = shape_prediction(PROVIDER_NAME, model, input)?;
        body.entry("max_tokens".to_string())
            .or_insert_with(|| Value::from(DEFAULT_MAX_TOKENS));

        let url = join_url(&self.config.base_url, endpoint.path());
        debug!(%url, model, "groq prediction");
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;
        decode_json(PROVIDER_NAME, &format!("Model '{model}'"), response).await
    }
}
