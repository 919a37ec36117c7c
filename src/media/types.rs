//! Shared vocabulary for the unified media services.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::YogiError;

/// A lazily produced, single-pass sequence of byte chunks.
///
/// Streams are finite and not restartable; consuming one drives the
/// underlying transfer.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, YogiError>>;

/// Fire-and-forget percentage progress callback (0–100).
pub type PercentCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Fire-and-forget stage progress callback.
pub type ProgressCallback = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Descriptor of a provider a unified service can drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<ProviderModelInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Provider selection plus its credentials and free-form options.
///
/// Which credential keys are required depends on the provider; `configure`
/// rejects the config with an error naming the missing credential.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub provider: String,
    #[serde(default)]
    pub credentials: HashMap<String, String>,
    #[serde(default)]
    pub options: HashMap<String, Value>,
}

impl ServiceConfig {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            credentials: HashMap::new(),
            options: HashMap::new(),
        }
    }

    pub fn with_credential(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.credentials.insert(key.into(), value.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub(crate) fn credential(&self, key: &str) -> Option<&str> {
        self.credentials
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub(crate) fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }
}

/// Stages a content generation moves through.
///
/// `Error` is a terminal stage reachable from any non-terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    Preparing,
    Generating,
    Processing,
    Completed,
    Error,
}

/// One progress notification emitted during a generation.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub stage: GenerationStage,
    /// 0–100.
    pub progress: u8,
    pub message: Option<String>,
    pub preview_url: Option<String>,
}

/// Options for unified video generation.
#[derive(Debug, Clone, Default)]
pub struct VideoGenerationOptions {
    pub prompt: String,
    /// Replicate version id driving the generation; required on the
    /// Replicate path.
    pub replicate_version: Option<String>,
    /// Hunyuan model id; the provider default is used when unset.
    pub hunyuan_model: Option<String>,
    /// Extra parameters merged into the provider request body.
    pub additional_params: serde_json::Map<String, Value>,
}

/// Server-side operation applied by `process_video`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoOperation {
    Trim,
    Merge,
    Convert,
    Compress,
}

impl VideoOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trim => "trim",
            Self::Merge => "merge",
            Self::Convert => "convert",
            Self::Compress => "compress",
        }
    }
}

/// Options for `process_video`.
#[derive(Debug, Clone)]
pub struct VideoProcessingOptions {
    pub operation: VideoOperation,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub target_format: Option<String>,
    pub compression_level: Option<u8>,
}

impl VideoProcessingOptions {
    pub fn new(operation: VideoOperation) -> Self {
        Self {
            operation,
            start_time: None,
            end_time: None,
            target_format: None,
            compression_level: None,
        }
    }
}

/// Options for `stream_video`.
#[derive(Clone, Default)]
pub struct StreamingOptions {
    /// Cutoff expressed as a percentage of the total expected bytes.
    /// Ignored when the server does not report a content length.
    pub max_duration: Option<f64>,
}

/// Options for speech synthesis.
#[derive(Debug, Clone, Default)]
pub struct SynthesisOptions {
    pub voice: String,
    pub format: Option<String>,
    /// 0–100 scale.
    pub quality: Option<u8>,
}

impl SynthesisOptions {
    pub fn voice(voice: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            format: None,
            quality: None,
        }
    }
}

/// Options for chunked synthesis streaming.
#[derive(Clone, Default)]
pub struct StreamOptions {
    pub voice: String,
    /// Chunk size in bytes; 16 KiB when unset.
    pub chunk_size: Option<usize>,
    /// Insert a short delay between chunks to simulate realtime playback.
    pub realtime: bool,
    pub on_progress: Option<PercentCallback>,
}

/// Options for speech recognition.
#[derive(Debug, Clone, Default)]
pub struct RecognitionOptions {
    pub language: Option<String>,
    /// Recognition model id; the provider default is used when unset.
    pub model: Option<String>,
}
