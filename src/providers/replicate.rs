//! Replicate provider adapter.
//!
//! Implements the model capability set against the Replicate REST API:
//! <https://replicate.com/docs/reference/http>
//!
//! Model ids are `owner/name` pairs. Predictions are submitted as a single
//! `POST /predictions` call; the created prediction object is returned
//! as-is and any polling of its status is left to the caller.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::YogiError;
use crate::providers::http::decode_json;
use crate::traits::ModelProvider;
use crate::types::{Model, ModelVersion};
use crate::utils::join_url;

const PROVIDER_NAME: &str = "replicate";
const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";

/// Configuration for the Replicate adapter.
#[derive(Clone)]
pub struct ReplicateConfig {
    api_token: SecretString,
    base_url: String,
}

impl ReplicateConfig {
    /// Create a configuration with the given API token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: SecretString::from(api_token.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the token from `REPLICATE_API_TOKEN`.
    pub fn from_env() -> Result<Self, YogiError> {
        let token = std::env::var("REPLICATE_API_TOKEN").map_err(|_| {
            YogiError::Configuration(
                "REPLICATE_API_TOKEN environment variable is required".to_string(),
            )
        })?;
        Ok(Self::new(token))
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Replicate provider adapter.
#[derive(Clone)]
pub struct ReplicateProvider {
    config: ReplicateConfig,
    http_client: reqwest::Client,
}

/// Raw model shape returned by the Replicate API.
#[derive(Debug, Deserialize)]
struct ReplicateModel {
    owner: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    github_url: Option<String>,
    #[serde(default)]
    paper_url: Option<String>,
    #[serde(default)]
    license_url: Option<String>,
    #[serde(default)]
    run_count: Option<u64>,
    #[serde(default)]
    cover_image_url: Option<String>,
    #[serde(default)]
    latest_version: Option<ModelVersion>,
}

#[derive(Debug, Deserialize)]
struct ModelPage {
    results: Vec<ReplicateModel>,
}

#[derive(Debug, Deserialize)]
struct VersionPage {
    results: Vec<ModelVersion>,
}

impl ReplicateProvider {
    pub fn new(config: ReplicateConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn split_model_id(id: &str) -> Result<(&str, &str), YogiError> {
        id.split_once('/')
            .filter(|(owner, name)| !owner.is_empty() && !name.is_empty())
            .ok_or_else(|| {
                YogiError::InvalidInput(format!(
                    "Replicate model ids must look like 'owner/name', got '{id}'"
                ))
            })
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.config.api_token.expose_secret())
    }

    async fn get_json(&self, path: &str, resource: &str) -> Result<Value, YogiError> {
        let url = join_url(&self.config.base_url, path);
        debug!(%url, "replicate request");
        let response = self
            .http_client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;
        decode_json(PROVIDER_NAME, resource, response).await
    }

    async fn post_json(&self, path: &str, resource: &str, body: Value) -> Result<Value, YogiError> {
        let url = join_url(&self.config.base_url, path);
        debug!(%url, "replicate request");
        let response = self
            .http_client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await?;
        decode_json(PROVIDER_NAME, resource, response).await
    }

    fn convert_model(raw: ReplicateModel) -> Model {
        let id = format!("{}/{}", raw.owner, raw.name);
        let mut metadata = serde_json::Map::new();
        if let Some(url) = raw.github_url {
            metadata.insert("github_url".to_string(), Value::String(url));
        }
        if let Some(url) = raw.paper_url {
            metadata.insert("paper_url".to_string(), Value::String(url));
        }
        if let Some(url) = raw.license_url {
            metadata.insert("license_url".to_string(), Value::String(url));
        }
        if let Some(count) = raw.run_count {
            metadata.insert("run_count".to_string(), Value::from(count));
        }
        if let Some(url) = raw.cover_image_url {
            metadata.insert("cover_image_url".to_string(), Value::String(url));
        }

        Model {
            id,
            provider: PROVIDER_NAME.to_string(),
            name: Some(raw.name),
            description: raw.description,
            metadata,
            latest_version: raw.latest_version,
        }
    }
}

#[async_trait]
impl ModelProvider for ReplicateProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_model(&self, id: &str) -> Result<Model, YogiError> {
        let (owner, name) = Self::split_model_id(id)?;
        let json = self
            .get_json(&format!("models/{owner}/{name}"), &format!("Model '{id}'"))
            .await?;
        let raw: ReplicateModel = serde_json::from_value(json)
            .map_err(|e| YogiError::Parse(format!("Failed to parse Replicate model: {e}")))?;
        Ok(Self::convert_model(raw))
    }

    async fn get_models(&self, query: Option<&str>) -> Result<Vec<Model>, YogiError> {
        let path = match query {
            Some(q) => format!("models?q={}", urlencoding::encode(q)),
            None => "models".to_string(),
        };
        let json = self.get_json(&path, "Models").await?;
        let page: ModelPage = serde_json::from_value(json)
            .map_err(|e| YogiError::Parse(format!("Failed to parse Replicate model list: {e}")))?;
        Ok(page.results.into_iter().map(Self::convert_model).collect())
    }

    async fn get_model_versions(&self, model_id: &str) -> Result<Vec<ModelVersion>, YogiError> {
        let (owner, name) = Self::split_model_id(model_id)?;
        let json = self
            .get_json(
                &format!("models/{owner}/{name}/versions"),
                &format!("Model '{model_id}'"),
            )
            .await?;
        let page: VersionPage = serde_json::from_value(json).map_err(|e| {
            YogiError::Parse(format!("Failed to parse Replicate version list: {e}"))
        })?;
        // upstream order is newest first; keep it
        Ok(page.results)
    }

    async fn run_prediction(
        &self,
        model_id: &str,
        version: &str,
        input: Value,
    ) -> Result<Value, YogiError> {
        Self::split_model_id(model_id)?;
        let body = serde_json::json!({
            "version": format!("{model_id}:{version}"),
            "input": input,
        });
        self.post_json("predictions", &format!("Model '{model_id}'"), body)
            .await
    }
}
