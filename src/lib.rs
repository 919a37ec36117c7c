//! # Yogi
//!
//! A unified generative-media provider interface for Rust.
//!
//! Yogi wraps third-party generative-AI HTTP APIs (Replicate, OpenRouter,
//! Groq, ElevenLabs, self-hosted Hunyuan-style endpoints) behind one
//! provider-agnostic surface:
//!
//! - **Provider adapters** implement a fixed capability set — describe a
//!   model, list/search models, list versions, run a prediction — and
//!   normalize each API's native JSON into common [`types::Model`] /
//!   [`types::ModelVersion`] records.
//! - **[`registry::ModelRegistry`]** resolves provider names to adapters and
//!   wraps every read operation with a time-bounded response cache and a
//!   call-counter sink.
//! - **[`media`]** layers unified video/speech services and a
//!   content-creation orchestrator on top, exposing one `generate`-shaped
//!   call regardless of which provider is configured.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use yogi::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), YogiError> {
//!     let registry = ModelRegistry::default();
//!     registry.register_provider(Arc::new(ReplicateProvider::new(
//!         ReplicateConfig::from_env()?,
//!         reqwest::Client::new(),
//!     )))?;
//!
//!     let model = registry.get_model("replicate", "stability-ai/sdxl").await?;
//!     println!("{}: {:?}", model.id, model.description);
//!
//!     let versions = registry.get_model_versions("replicate", &model.id).await?;
//!     let output = registry
//!         .run_prediction(
//!             "replicate",
//!             &model.id,
//!             &versions[0].id,
//!             serde_json::json!({ "prompt": "a watercolor lighthouse" }),
//!         )
//!         .await?;
//!     println!("{output}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature flags
//!
//! Each provider can be enabled independently; `all-providers` (the default)
//! enables every one of them.
//!
//! - `replicate` — Replicate adapter
//! - `openrouter` — OpenRouter adapter
//! - `groq` — Groq adapter
//! - `elevenlabs` — ElevenLabs client plus the unified speech service and
//!   the content-creation flows built on it

pub mod cache;
pub mod error;
pub mod media;
pub mod metrics;
pub mod providers;
pub mod registry;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::YogiError;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::cache::ResponseCache;
    pub use crate::error::YogiError;
    pub use crate::metrics::MetricsSink;
    pub use crate::registry::ModelRegistry;
    pub use crate::traits::ModelProvider;
    pub use crate::types::{Model, ModelVersion};

    pub use crate::media::types::ServiceConfig;
    pub use crate::media::video::VideoService;

    #[cfg(feature = "elevenlabs")]
    pub use crate::media::content::ContentCreationService;
    #[cfg(feature = "elevenlabs")]
    pub use crate::media::speech::SpeechService;

    #[cfg(feature = "elevenlabs")]
    pub use crate::providers::elevenlabs::{ElevenLabsClient, ElevenLabsConfig};
    #[cfg(feature = "groq")]
    pub use crate::providers::groq::{GroqConfig, GroqProvider};
    #[cfg(feature = "openrouter")]
    pub use crate::providers::openrouter::{OpenRouterConfig, OpenRouterProvider};
    #[cfg(feature = "replicate")]
    pub use crate::providers::replicate::{ReplicateConfig, ReplicateProvider};
}
