//! Shared test support: an in-process provider with call counters.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use yogi::YogiError;
use yogi::traits::ModelProvider;
use yogi::types::{Model, ModelVersion};

/// A provider whose calls are counted and whose answers are canned, so
/// registry behavior can be asserted without any network.
pub struct StubProvider {
    pub name: String,
    /// Underlying fetches across get_model/get_models/get_model_versions.
    pub fetches: Arc<AtomicUsize>,
    pub prediction_calls: Arc<AtomicUsize>,
    pub prediction_result: Value,
    /// Model ids whose fetch fails with an upstream error.
    pub failing_ids: Vec<String>,
    /// `name` field stamped onto returned models.
    pub model_name: String,
}

impl StubProvider {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fetches: Arc::new(AtomicUsize::new(0)),
            prediction_calls: Arc::new(AtomicUsize::new(0)),
            prediction_result: serde_json::json!({ "id": "prediction-1" }),
            failing_ids: Vec::new(),
            model_name: "Model One".to_string(),
        }
    }

    pub fn with_model_name(mut self, model_name: &str) -> Self {
        self.model_name = model_name.to_string();
        self
    }

    pub fn with_failing_id(mut self, id: &str) -> Self {
        self.failing_ids.push(id.to_string());
        self
    }

    pub fn with_prediction_result(mut self, result: Value) -> Self {
        self.prediction_result = result;
        self
    }

    pub fn model(&self, id: &str) -> Model {
        Model {
            id: id.to_string(),
            provider: self.name.clone(),
            name: Some(self.model_name.clone()),
            description: None,
            metadata: serde_json::Map::new(),
            latest_version: None,
        }
    }
}

#[async_trait]
impl ModelProvider for StubProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_model(&self, id: &str) -> Result<Model, YogiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing_ids.iter().any(|f| f == id) {
            return Err(YogiError::Upstream {
                provider: self.name.clone(),
                status: "Internal Server Error".to_string(),
            });
        }
        Ok(self.model(id))
    }

    async fn get_models(&self, _query: Option<&str>) -> Result<Vec<Model>, YogiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.model("m1")])
    }

    async fn get_model_versions(&self, _model_id: &str) -> Result<Vec<ModelVersion>, YogiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(vec![ModelVersion {
            id: "v1".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            cog_version: None,
            openapi_schema: None,
        }])
    }

    async fn run_prediction(
        &self,
        _model_id: &str,
        _version: &str,
        _input: Value,
    ) -> Result<Value, YogiError> {
        self.prediction_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.prediction_result.clone())
    }
}
