//! ElevenLabs speech synthesis client.
//!
//! Not a model provider: ElevenLabs exposes voices rather than versioned
//! models, so this client backs the unified speech service instead of the
//! registry. Synthesis returns the raw audio bytes from the streaming
//! endpoint in one piece.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::error::YogiError;
use crate::providers::http::{decode_bytes, decode_json};
use crate::utils::join_url;

const PROVIDER_NAME: &str = "elevenlabs";
const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Synthesis model requested for every clip.
const MODEL_ID: &str = "eleven_monolingual_v1";

/// Configuration for the ElevenLabs client.
#[derive(Clone)]
pub struct ElevenLabsConfig {
    api_key: SecretString,
    base_url: String,
}

impl ElevenLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the key from `ELEVENLABS_API_KEY`.
    pub fn from_env() -> Result<Self, YogiError> {
        let key = std::env::var("ELEVENLABS_API_KEY").map_err(|_| {
            YogiError::Configuration(
                "ELEVENLABS_API_KEY environment variable is required".to_string(),
            )
        })?;
        Ok(Self::new(key))
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// A voice available for synthesis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub preview_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VoiceList {
    voices: Vec<Voice>,
}

/// ElevenLabs API client.
#[derive(Clone)]
pub struct ElevenLabsClient {
    config: ElevenLabsConfig,
    http_client: reqwest::Client,
}

impl ElevenLabsClient {
    pub fn new(config: ElevenLabsConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Synthesize `text` with `voice_id`, returning raw MP3 bytes.
    pub async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, YogiError> {
        let url = join_url(
            &self.config.base_url,
            &format!("text-to-speech/{voice_id}/stream"),
        );
        debug!(%url, voice_id, "elevenlabs synthesis");
        let body = serde_json::json!({
            "text": text,
            "model_id": MODEL_ID,
            "voice_settings": {
                "stability": 0.5,
                "similarity_boost": 0.75,
            },
        });
        let response = self
            .http_client
            .post(&url)
            .header("xi-api-key", self.config.api_key.expose_secret())
            .header("Accept", "audio/mpeg")
            .json(&body)
            .send()
            .await?;
        decode_bytes(PROVIDER_NAME, &format!("Voice '{voice_id}'"), response).await
    }

    /// List the voices available to this account.
    pub async fn voices(&self) -> Result<Vec<Voice>, YogiError> {
        let url = join_url(&self.config.base_url, "voices");
        debug!(%url, "elevenlabs voices");
        let response = self
            .http_client
            .get(&url)
            .header("xi-api-key", self.config.api_key.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await?;
        let json = decode_json(PROVIDER_NAME, "Voices", response).await?;
        let list: VoiceList = serde_json::from_value(json)
            .map_err(|e| YogiError::Parse(format!("Failed to parse ElevenLabs voices: {e}")))?;
        Ok(list.voices)
    }
}
