//! Unified video service.
//!
//! One `generate_video` call regardless of whether Replicate or a
//! Hunyuan-style self-hosted endpoint does the work, plus processing and
//! streaming wrappers around the configured provider.

use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;

use crate::error::YogiError;
use crate::providers::http::{decode_json, status_text};
use crate::utils::join_url;

use super::types::{
    ByteStream, ProviderInfo, ProviderModelInfo, ServiceConfig, StreamingOptions,
    VideoGenerationOptions, VideoProcessingOptions,
};

const REPLICATE_BASE_URL: &str = "https://api.replicate.com/v1";
const DEFAULT_HUNYUAN_MODEL: &str = "hunyuan-video";

enum VideoBackend {
    Replicate {
        api_token: SecretString,
        base_url: String,
    },
    Hunyuan {
        api_key: SecretString,
        endpoint: String,
    },
}

impl VideoBackend {
    fn provider_id(&self) -> &'static str {
        match self {
            Self::Replicate { .. } => "replicate",
            Self::Hunyuan { .. } => "hunyuan",
        }
    }

    fn process_endpoint(&self) -> String {
        match self {
            Self::Replicate { base_url, .. } => join_url(base_url, "process"),
            Self::Hunyuan { endpoint, .. } => join_url(endpoint, "process"),
        }
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Replicate { api_token, .. } => builder.header(
                "Authorization",
                format!("Token {}", api_token.expose_secret()),
            ),
            Self::Hunyuan { api_key, .. } => builder.bearer_auth(api_key.expose_secret()),
        }
    }
}

/// Unified video generation/processing/streaming service.
///
/// Must be configured with [`ServiceConfig`] before use; operations fail
/// with [`YogiError::NotConfigured`] otherwise.
pub struct VideoService {
    http_client: reqwest::Client,
    backend: Option<VideoBackend>,
}

impl VideoService {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            backend: None,
        }
    }

    /// Providers this service can drive.
    pub fn available_providers() -> Vec<ProviderInfo> {
        vec![
            ProviderInfo {
                id: "replicate".to_string(),
                name: "Replicate".to_string(),
                description: "Video generation using various Replicate models".to_string(),
                models: vec![ProviderModelInfo {
                    id: "zeroscope".to_string(),
                    name: "ZeroScope".to_string(),
                    description: "Text-to-video generation model".to_string(),
                }],
            },
            ProviderInfo {
                id: "hunyuan".to_string(),
                name: "Hunyuan".to_string(),
                description: "Advanced video generation using a Hunyuan endpoint".to_string(),
                models: vec![ProviderModelInfo {
                    id: DEFAULT_HUNYUAN_MODEL.to_string(),
                    name: "Hunyuan Video".to_string(),
                    description: "Default Hunyuan video generation model".to_string(),
                }],
            },
        ]
    }

    /// Validate credentials for the selected provider and activate it.
    ///
    /// `options.base_url` overrides the Replicate API endpoint (useful for
    /// tests and gateways). Fails with an error naming the missing
    /// credential.
    pub fn configure(&mut self, config: ServiceConfig) -> Result<(), YogiError> {
        let backend = match config.provider.as_str() {
            "replicate" => {
                let token = config.credential("api_token").ok_or_else(|| {
                    YogiError::Configuration("Replicate API token is required".to_string())
                })?;
                VideoBackend::Replicate {
                    api_token: SecretString::from(token.to_string()),
                    base_url: config
                        .option_str("base_url")
                        .unwrap_or(REPLICATE_BASE_URL)
                        .to_string(),
                }
            }
            "hunyuan" => {
                let key = config.credential("api_key").ok_or_else(|| {
                    YogiError::Configuration("Hunyuan API key is required".to_string())
                })?;
                let endpoint = config.credential("endpoint").ok_or_else(|| {
                    YogiError::Configuration("Hunyuan API endpoint is required".to_string())
                })?;
                VideoBackend::Hunyuan {
                    api_key: SecretString::from(key.to_string()),
                    endpoint: endpoint.to_string(),
                }
            }
            other => {
                return Err(YogiError::UnsupportedOperation(format!(
                    "Unsupported video provider: {other}"
                )));
            }
        };

        debug!(provider = backend.provider_id(), "video service configured");
        self.backend = Some(backend);
        Ok(())
    }

    /// Provider the service is currently configured for.
    pub fn provider_id(&self) -> Option<&'static str> {
        self.backend.as_ref().map(VideoBackend::provider_id)
    }

    fn backend(&self) -> Result<&VideoBackend, YogiError> {
        self.backend.as_ref().ok_or(YogiError::NotConfigured)
    }

    /// Generate a video and return the URL of the result.
    ///
    /// On the Replicate path this is the prediction's `urls.get` endpoint —
    /// the caller polls it for the finished asset. On the Hunyuan path it
    /// is the `video_url` of the response.
    pub async fn generate_video(
        &self,
        options: &VideoGenerationOptions,
    ) -> Result<String, YogiError> {
        match self.backend()? {
            VideoBackend::Replicate {
                api_token,
                base_url,
            } => {
                let version = options.replicate_version.as_deref().ok_or_else(|| {
                    YogiError::InvalidInput(
                        "Replicate model configuration is required".to_string(),
                    )
                })?;

                let mut input = serde_json::Map::new();
                input.insert(
                    "prompt".to_string(),
                    Value::String(options.prompt.clone()),
                );
                input.extend(options.additional_params.clone());
                let body = serde_json::json!({ "version": version, "input": input });

                let url = join_url(base_url, "predictions");
                debug!(%url, version, "replicate video generation");
                let response = self
                    .http_client
                    .post(&url)
                    .header(
                        "Authorization",
                        format!("Token {}", api_token.expose_secret()),
                    )
                    .json(&body)
                    .send()
                    .await?;
                let json = decode_json("replicate", "Prediction", response).await?;
                json.pointer("/urls/get")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        YogiError::Parse(
                            "Replicate prediction response is missing urls.get".to_string(),
                        )
                    })
            }
            VideoBackend::Hunyuan { api_key, endpoint } => {
                let mut body = serde_json::Map::new();
                body.insert(
                    "prompt".to_string(),
                    Value::String(options.prompt.clone()),
                );
                body.insert(
                    "model".to_string(),
                    Value::String(
                        options
                            .hunyuan_model
                            .clone()
                            .unwrap_or_else(|| DEFAULT_HUNYUAN_MODEL.to_string()),
                    ),
                );
                body.extend(options.additional_params.clone());

                debug!(%endpoint, "hunyuan video generation");
                let response = self
                    .http_client
                    .post(endpoint.as_str())
                    .bearer_auth(api_key.expose_secret())
                    .json(&Value::Object(body))
                    .send()
                    .await?;
                let json = decode_json("hunyuan", "Video generation", response).await?;
                json.get("video_url")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        YogiError::Parse("Hunyuan response is missing video_url".to_string())
                    })
            }
        }
    }

    /// Fetch a video from `input_url` and upload it to the provider's
    /// processing endpoint; returns the URL of the processed result.
    pub async fn process_video(
        &self,
        input_url: &str,
        options: &VideoProcessingOptions,
    ) -> Result<String, YogiError> {
        let backend = self.backend()?;

        let source = self.http_client.get(input_url).send().await?;
        let status = source.status();
        if !status.is_success() {
            return Err(YogiError::Upstream {
                provider: backend.provider_id().to_string(),
                status: format!("failed to fetch input video: {}", status_text(status)),
            });
        }
        let video = source.bytes().await?.to_vec();

        let mime = mime_guess::from_path(input_url)
            .first_or_octet_stream()
            .to_string();
        let part = reqwest::multipart::Part::bytes(video)
            .file_name("input")
            .mime_str(&mime)?;
        let mut form = reqwest::multipart::Form::new()
            .part("video", part)
            .text("operation", options.operation.as_str());
        if let Some(start) = options.start_time {
            form = form.text("start_time", start.to_string());
        }
        if let Some(end) = options.end_time {
            form = form.text("end_time", end.to_string());
        }
        if let Some(format) = &options.target_format {
            form = form.text("target_format", format.clone());
        }
        if let Some(level) = options.compression_level {
            form = form.text("compression_level", level.to_string());
        }

        let endpoint = backend.process_endpoint();
        debug!(%endpoint, operation = options.operation.as_str(), "video processing");
        let response = backend
            .authorize(self.http_client.post(&endpoint))
            .multipart(form)
            .send()
            .await?;
        let json = decode_json(backend.provider_id(), "Video processing", response).await?;
        json.get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                YogiError::Parse("Video processing response is missing url".to_string())
            })
    }

    /// Stream a video's bytes.
    ///
    /// The stream is finite and single-pass. When `max_duration` is set and
    /// the server reports a content length, the transfer stops once the
    /// loaded percentage exceeds it; the crossing chunk is dropped.
    pub async fn stream_video(
        &self,
        url: &str,
        options: &StreamingOptions,
    ) -> Result<ByteStream, YogiError> {
        let backend = self.backend()?;

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(YogiError::Upstream {
                provider: backend.provider_id().to_string(),
                status: format!("failed to fetch video: {}", status_text(status)),
            });
        }

        let content_length = response.content_length().unwrap_or(0);
        let max_duration = options.max_duration;
        let mut body = response.bytes_stream();

        let stream = async_stream::try_stream! {
            let mut loaded: u64 = 0;
            while let Some(chunk) = body.next().await {
                let chunk = chunk.map_err(YogiError::Http)?;
                loaded += chunk.len() as u64;
                if let Some(max) = max_duration {
                    if content_length > 0 {
                        let progress = loaded as f64 * 100.0 / content_length as f64;
                        if progress > max {
                            break;
                        }
                    }
                }
                yield chunk.to_vec();
            }
        };

        let boxed: ByteStream = Box::pin(stream);
        Ok(boxed)
    }
}
