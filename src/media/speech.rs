//! Unified speech service.
//!
//! ElevenLabs handles synthesis, Whisper handles recognition; asking the
//! configured provider for the other operation fails with
//! [`YogiError::UnsupportedOperation`].

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;

use crate::error::YogiError;
use crate::providers::elevenlabs::{ElevenLabsClient, ElevenLabsConfig};
use crate::providers::http::decode_json;
use crate::utils::join_url;

use super::types::{
    ByteStream, ProviderInfo, ProviderModelInfo, RecognitionOptions, ServiceConfig, StreamOptions,
    SynthesisOptions,
};

const WHISPER_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_WHISPER_MODEL: &str = "whisper-1";

/// Default streaming chunk size: 16 KiB.
const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Delay between chunks when realtime pacing is requested.
const REALTIME_CHUNK_DELAY: Duration = Duration::from_millis(100);

enum SpeechBackend {
    ElevenLabs(ElevenLabsClient),
    Whisper {
        api_key: SecretString,
        base_url: String,
    },
}

impl SpeechBackend {
    fn provider_id(&self) -> &'static str {
        match self {
            Self::ElevenLabs(_) => "elevenlabs",
            Self::Whisper { .. } => "whisper",
        }
    }
}

/// Unified speech synthesis/recognition service.
///
/// Must be configured with [`ServiceConfig`] before use; operations fail
/// with [`YogiError::NotConfigured`] otherwise.
pub struct SpeechService {
    http_client: reqwest::Client,
    backend: Option<SpeechBackend>,
}

impl SpeechService {
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
                id: "elevenlabs".to_string(),
                name: "ElevenLabs".to_string(),
                description: "High-quality speech synthesis".to_string(),
                models: Vec::new(),
            },
            ProviderInfo {
                id: "whisper".to_string(),
                name: "OpenAI Whisper".to_string(),
                description: "High-accuracy speech recognition using Whisper".to_string(),
                models: vec![ProviderModelInfo {
                    id: DEFAULT_WHISPER_MODEL.to_string(),
                    name: "Whisper v1".to_string(),
                    description: "Latest Whisper model".to_string(),
                }],
            },
        ]
    }

    /// Validate credentials for the selected provider and activate it.
    ///
    /// `options.base_url` overrides the provider endpoint. Fails with an
    /// error naming the missing credential.
    pub fn configure(&mut self, config: ServiceConfig) -> Result<(), YogiError> {
        let backend = match config.provider.as_str() {
            "elevenlabs" => {
                let key = config.credential("api_key").ok_or_else(|| {
                    YogiError::Configuration("ElevenLabs API key is required".to_string())
                })?;
                let mut client_config = ElevenLabsConfig::new(key);
                if let Some(base_url) = config.option_str("base_url") {
                    client_config = client_config.with_base_url(base_url);
                }
                SpeechBackend::ElevenLabs(ElevenLabsClient::new(
                    client_config,
                    self.http_client.clone(),
                ))
            }
            "whisper" => {
                let key = config.credential("api_key").ok_or_else(|| {
                    YogiError::Configuration("OpenAI API key is required for Whisper".to_string())
                })?;
                SpeechBackend::Whisper {
                    api_key: SecretString::from(key.to_string()),
                    base_url: config
                        .option_str("base_url")
                        .unwrap_or(WHISPER_BASE_URL)
                        .to_string(),
                }
            }
            other => {
                return Err(YogiError::UnsupportedOperation(format!(
                    "Unsupported speech provider: {other}"
                )));
            }
        };

        debug!(provider = backend.provider_id(), "speech service configured");
        self.backend = Some(backend);
        Ok(())
    }

    /// Provider the service is currently configured for.
    pub fn provider_id(&self) -> Option<&'static str> {
        self.backend.as_ref().map(SpeechBackend::provider_id)
    }

    fn backend(&self) -> Result<&SpeechBackend, YogiError> {
        self.backend.as_ref().ok_or(YogiError::NotConfigured)
    }

    /// Synthesize speech, returning the audio bytes in one piece.
    pub async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<Vec<u8>, YogiError> {
        match self.backend()? {
            SpeechBackend::ElevenLabs(client) => client.synthesize(text, &options.voice).await,
            other => Err(YogiError::UnsupportedOperation(format!(
                "Speech synthesis is not supported for provider '{}'",
                other.provider_id()
            ))),
        }
    }

    /// Transcribe audio to text.
    pub async fn recognize(
        &self,
        audio: Vec<u8>,
        options: &RecognitionOptions,
    ) -> Result<String, YogiError> {
        match self.backend()? {
            SpeechBackend::Whisper { api_key, base_url } => {
                let model = options
                    .model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_WHISPER_MODEL.to_string());
                let part = reqwest::multipart::Part::bytes(audio)
                    .file_name("audio.wav")
                    .mime_str("audio/wav")?;
                let mut form = reqwest::multipart::Form::new()
                    .part("file", part)
                    .text("model", model);
                if let Some(language) = &options.language {
                    form = form.text("language", language.clone());
                }

                let url = join_url(base_url, "audio/transcriptions");
                debug!(%url, "whisper transcription");
                let response = self
                    .http_client
                    .post(&url)
                    .bearer_auth(api_key.expose_secret())
                    .multipart(form)
                    .send()
                    .await?;
                let json = decode_json("whisper", "Transcription", response).await?;
                json.get("text")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        YogiError::Parse("Transcription response is missing text".to_string())
                    })
            }
            other => Err(YogiError::UnsupportedOperation(format!(
                "Speech recognition is not supported for provider '{}'",
                other.provider_id()
            ))),
        }
    }

    /// Synthesize speech and emit it as a chunked byte stream.
    ///
    /// Chunks are `chunk_size` bytes (16 KiB default). With `realtime` set,
    /// a short delay is inserted between chunks to simulate playback
    /// pacing. The progress callback receives the emitted percentage after
    /// each chunk.
    pub async fn stream(&self, text: &str, options: StreamOptions) -> Result<ByteStream, YogiError> {
        if options.voice.is_empty() {
            return Err(YogiError::InvalidInput(
                "Voice id is required for streaming synthesis".to_string(),
            ));
        }

        let audio = self
            .synthesize(text, &SynthesisOptions::voice(options.voice.clone()))
            .await?;

        let chunk_size = options.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE).max(1);
        let realtime = options.realtime;
        let on_progress = options.on_progress.clone();

        let stream = async_stream::stream! {
            let total = audio.len();
            let mut emitted = 0usize;
            for chunk in audio.chunks(chunk_size) {
                emitted += chunk.len();
                yield Ok::<Vec<u8>, YogiError>(chunk.to_vec());
                if let Some(callback) = &on_progress {
                    callback(emitted as f64 * 100.0 / total as f64);
                }
                if realtime && emitted < total {
                    tokio::time::sleep(REALTIME_CHUNK_DELAY).await;
                }
            }
        };

        let boxed: ByteStream = Box::pin(stream);
        Ok(boxed)
    }
}
