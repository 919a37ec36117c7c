//! Content-creation flows composing the registry and the media services.
//!
//! Character generation walks a staged pipeline and reports progress
//! through a fire-and-forget callback; a per-generation cancel handle is
//! checked between awaited stages. Video generation first enhances the
//! prompt through an OpenRouter prediction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::YogiError;
use crate::registry::ModelRegistry;
use crate::utils::CancelHandle;

use super::speech::SpeechService;
use super::types::{
    GenerationStage, ProgressCallback, ProgressUpdate, SynthesisOptions, VideoGenerationOptions,
};
use super::video::VideoService;

/// Model used to enhance video prompts.
const ENHANCEMENT_MODEL: &str = "anthropic/claude-3-opus";

/// Options for character generation.
#[derive(Clone)]
pub struct CharacterGenerationOptions {
    pub name: String,
    /// Voice for the spoken sample; skipped when unset.
    pub voice: Option<String>,
    /// Replicate version id of the character video model.
    pub replicate_version: String,
    pub appearance: String,
    pub animation: String,
    pub on_update: Option<ProgressCallback>,
}

/// Options for podcast generation.
#[derive(Debug, Clone)]
pub struct PodcastGenerationOptions {
    pub script: String,
    pub voice: String,
    /// `mp3` when unset.
    pub format: Option<String>,
    /// 0–100 scale; 90 when unset.
    pub quality: Option<u8>,
}

/// Metadata stamped onto every generation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    /// RFC-3339 creation time.
    pub timestamp: String,
}

impl ResultMetadata {
    fn stamped() -> Self {
        Self {
            duration: None,
            format: None,
            quality: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A generated asset addressed by URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCreationResult {
    pub url: String,
    pub metadata: ResultMetadata,
}

/// A synthesized podcast, returned as audio bytes.
#[derive(Debug, Clone)]
pub struct PodcastResult {
    pub audio: Vec<u8>,
    pub metadata: ResultMetadata,
}

/// Orchestrates multi-step generation flows across the registry and the
/// unified media services.
pub struct ContentCreationService {
    registry: Arc<ModelRegistry>,
    video: VideoService,
    speech: SpeechService,
    active: Mutex<HashMap<String, CancelHandle>>,
}

impl ContentCreationService {
    /// Compose the service from an adapter registry and the two media
    /// services, which must already be configured.
    pub fn new(registry: Arc<ModelRegistry>, video: VideoService, speech: SpeechService) -> Self {
        Self {
            registry,
            video,
            speech,
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Generate a video from a prompt.
    ///
    /// The prompt is first enhanced through an OpenRouter chat prediction;
    /// when the enhancement result is not a string the raw prompt is used
    /// instead. Enhancement *errors* propagate.
    pub async fn generate_video(
        &self,
        prompt: &str,
        mut options: VideoGenerationOptions,
    ) -> Result<ContentCreationResult, YogiError> {
        let enhanced = self.enhance_prompt(prompt).await?;
        options.prompt = enhanced.unwrap_or_else(|| prompt.to_string());

        let url = self.video.generate_video(&options).await?;
        Ok(ContentCreationResult {
            url,
            metadata: ResultMetadata::stamped(),
        })
    }

    /// Generate a character video plus an optional voice sample, walking
    /// the `preparing → generating → processing → completed` stages.
    ///
    /// Returns the generation's result; on failure the `error` stage is
    /// emitted before the error propagates. Cancellation is cooperative and
    /// only observed between stages.
    pub async fn generate_character(
        &self,
        options: CharacterGenerationOptions,
    ) -> Result<ContentCreationResult, YogiError> {
        let generation_id = format!("character-{}", Uuid::new_v4());
        let cancel = CancelHandle::new();
        self.lock_active()?
            .insert(generation_id.clone(), cancel.clone());
        debug!(%generation_id, "character generation started");

        let result = self
            .run_character_flow(&generation_id, &cancel, &options)
            .await;

        self.lock_active()?.remove(&generation_id);

        if let Err(err) = &result {
            emit(
                options.on_update.as_ref(),
                GenerationStage::Error,
                100,
                Some(err.to_string()),
                None,
            );
        }
        result
    }

    /// Synthesize a podcast from a script.
    ///
    /// Background music/effects mixing is not implemented; the synthesized
    /// narration is returned as-is.
    pub async fn generate_podcast(
        &self,
        options: PodcastGenerationOptions,
    ) -> Result<PodcastResult, YogiError> {
        let audio = self
            .speech
            .synthesize(
                &options.script,
                &SynthesisOptions {
                    voice: options.voice.clone(),
                    format: options.format.clone(),
                    quality: options.quality,
                },
            )
            .await?;

        Ok(PodcastResult {
            audio,
            metadata: ResultMetadata {
                duration: None,
                format: Some(options.format.unwrap_or_else(|| "mp3".to_string())),
                quality: Some(options.quality.unwrap_or(90)),
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        })
    }

    /// Request cancellation of a running generation. The flow stops at its
    /// next stage boundary; an in-flight HTTP call runs to completion.
    pub fn cancel_generation(&self, generation_id: &str) -> Result<(), YogiError> {
        if let Some(handle) = self.lock_active()?.remove(generation_id) {
            handle.cancel();
            debug!(generation_id, "generation cancelled");
        }
        Ok(())
    }

    /// Ids of generations currently in flight.
    pub fn active_generations(&self) -> Result<Vec<String>, YogiError> {
        Ok(self.lock_active()?.keys().cloned().collect())
    }

    async fn run_character_flow(
        &self,
        generation_id: &str,
        cancel: &CancelHandle,
        options: &CharacterGenerationOptions,
    ) -> Result<ContentCreationResult, YogiError> {
        let callback = options.on_update.as_ref();

        emit(
            callback,
            GenerationStage::Preparing,
            0,
            Some("Preparing character generation...".to_string()),
            None,
        );
        self.check_cancelled(generation_id, cancel)?;

        emit(
            callback,
            GenerationStage::Generating,
            20,
            Some("Generating character video...".to_string()),
            None,
        );
        let prompt = format!(
            "{} {} animation, {} style",
            options.name, options.animation, options.appearance
        );
        let video_result = self
            .generate_video(
                &prompt,
                VideoGenerationOptions {
                    replicate_version: Some(options.replicate_version.clone()),
                    ..VideoGenerationOptions::default()
                },
            )
            .await?;

        emit(
            callback,
            GenerationStage::Processing,
            60,
            Some("Processing video...".to_string()),
            Some(video_result.url.clone()),
        );
        self.check_cancelled(generation_id, cancel)?;

        if let Some(voice) = &options.voice {
            emit(
                callback,
                GenerationStage::Processing,
                80,
                Some("Generating voice sample...".to_string()),
                None,
            );
            let sample = format!("Hello, I'm {}. Nice to meet you!", options.name);
            self.speech
                .synthesize(&sample, &SynthesisOptions::voice(voice.clone()))
                .await?;
        }

        emit(
            callback,
            GenerationStage::Completed,
            100,
            Some("Character generation complete!".to_string()),
            Some(video_result.url.clone()),
        );
        Ok(video_result)
    }

    /// Run the prompt through the enhancement model. `Ok(None)` means the
    /// upstream answered with something that is not a string.
    async fn enhance_prompt(&self, prompt: &str) -> Result<Option<String>, YogiError> {
        let input = serde_json::json!({
            "messages": [{
                "role": "user",
                "content": format!(
                    "Enhance this video generation prompt with more details about visual elements, style, and mood: {prompt}"
                ),
            }],
        });

        let result = self
            .registry
            .run_prediction("openrouter", ENHANCEMENT_MODEL, "latest", input)
            .await?;

        let content = result
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string);
        if content.is_none() {
            warn!("prompt enhancement returned a non-string result; using the raw prompt");
        }
        Ok(content)
    }

    fn check_cancelled(
        &self,
        generation_id: &str,
        cancel: &CancelHandle,
    ) -> Result<(), YogiError> {
        if cancel.is_cancelled() {
            return Err(YogiError::Cancelled(generation_id.to_string()));
        }
        Ok(())
    }

    fn lock_active(&self) -> Result<MutexGuard<'_, HashMap<String, CancelHandle>>, YogiError> {
        self.active
            .lock()
            .map_err(|e| YogiError::Internal(format!("active generation map lock poisoned: {e}")))
    }
}

fn emit(
    callback: Option<&ProgressCallback>,
    stage: GenerationStage,
    progress: u8,
    message: Option<String>,
    preview_url: Option<String>,
) {
    if let Some(callback) = callback {
        callback(ProgressUpdate {
            stage,
            progress,
            message,
            preview_url,
        });
    }
}
