//! Provider-agnostic model records.
//!
//! Adapters normalize each upstream API's native JSON into these shapes.
//! The `metadata` bag carries provider-specific fields (URLs, pricing,
//! context length, run counts) that the registry passes through without
//! interpreting.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized description of a generative model.
///
/// `id` is unique within one provider; `(provider, id)` is the global key.
/// Models are constructed fresh on every adapter call and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    /// Name of the owning adapter.
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Open bag of provider-specific fields, passed through as-is.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<ModelVersion>,
}

/// A specific immutable snapshot of a model.
///
/// A version id is stable and never reused for different content within one
/// model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVersion {
    pub id: String,
    /// ISO-8601 creation timestamp as reported upstream.
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cog_version: Option<String>,
    /// JSON-Schema fragment describing prediction input parameters.
    /// Consumed as data by dynamic form generators; never validated here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openapi_schema: Option<Value>,
}
