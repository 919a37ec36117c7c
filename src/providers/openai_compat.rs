//! Helpers shared by the OpenAI-compatible prediction surfaces.
//!
//! OpenRouter and Groq expose the same two inference endpoints; the shape
//! of the input bag decides which one a prediction targets. Neither API has
//! a native model search or a versioning concept, so search is a local
//! substring match and every model carries one synthesized pseudo-version.

use serde_json::{Map, Value};

use crate::error::YogiError;
use crate::types::{Model, ModelVersion};

/// Endpoint a shaped prediction request should be posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PredictionEndpoint {
    ChatCompletions,
    Completions,
}

impl PredictionEndpoint {
    pub(crate) fn path(self) -> &'static str {
        match self {
            Self::ChatCompletions => "chat/completions",
            Self::Completions => "completions",
        }
    }
}

/// Turn a free-form prediction input into a request body for `model`.
///
/// The input must carry either a `messages` list (chat) or a `prompt`
/// string (completion); everything else in the bag is forwarded upstream
/// unchanged.
pub(crate) fn shape_prediction(
    provider: &str,
    model: &str,
    input: Value,
) -> Result<(PredictionEndpoint, Map<String, Value>), YogiError> {
    let mut body = match input {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => {
            return Err(YogiError::InvalidInput(format!(
                "{provider} prediction input must be a JSON object"
            )));
        }
    };

    let endpoint = if body.get("messages").is_some_and(Value::is_array) {
        PredictionEndpoint::ChatCompletions
    } else if body.get("prompt").is_some_and(Value::is_string) {
        PredictionEndpoint::Completions
    } else {
        return Err(YogiError::InvalidInput(format!(
            "{provider} predictions require either a 'messages' list or a 'prompt' in the input"
        )));
    };

    body.insert("model".to_string(), Value::String(model.to_string()));
    Ok((endpoint, body))
}

/// Case-insensitive substring match over id, name and description.
pub(crate) fn matches_query(model: &Model, query: &str) -> bool {
    let needle = query.to_lowercase();
    model.id.to_lowercase().contains(&needle)
        || model
            .name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&needle))
        || model
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

/// The single pseudo-version synthesized for providers without versioning.
pub(crate) fn pseudo_version(created: Option<i64>) -> ModelVersion {
    let created_at = created
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default();
    ModelVersion {
        id: "latest".to_string(),
        created_at,
        cog_version: None,
        openapi_schema: None,
    }
}
