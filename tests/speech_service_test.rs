#![cfg(feature = "elevenlabs")]

//! Unified speech service: configuration validation, synthesis,
//! recognition, chunked streaming.

use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yogi::YogiError;
use yogi::media::types::{RecognitionOptions, StreamOptions, SynthesisOptions};
use yogi::prelude::*;

async fn elevenlabs_service(server: &MockServer) -> SpeechService {
    let mut service = SpeechService::new(reqwest::Client::new());
    service
        .configure(
            ServiceConfig::new("elevenlabs")
                .with_credential("api_key", "xi-key")
                .with_option("base_url", server.uri()),
        )
        .unwrap();
    service
}

#[test]
fn advertises_its_providers() {
    let ids: Vec<String> = SpeechService::available_providers()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec!["elevenlabs".to_string(), "whisper".to_string()]);
}

#[test]
fn configure_rejects_missing_credentials_by_name() {
    let mut service = SpeechService::new(reqwest::Client::new());

    let err = service
        .configure(ServiceConfig::new("elevenlabs"))
        .unwrap_err();
    assert_eq!(err.code(), "CONFIGURATION_ERROR");
    assert!(err.to_string().contains("ElevenLabs API key"));

    let err = service.configure(ServiceConfig::new("whisper")).unwrap_err();
    assert!(err.to_string().contains("OpenAI API key"));

    let err = service.configure(ServiceConfig::new("browser")).unwrap_err();
    assert_eq!(err.code(), "UNSUPPORTED_OPERATION");
}

#[tokio::test]
async fn operations_require_configuration_first() {
    let service = SpeechService::new(reqwest::Client::new());
    let err = service
        .synthesize("hello", &SynthesisOptions::voice("v1"))
        .await
        .unwrap_err();
    assert!(matches!(err, YogiError::NotConfigured));
}

#[tokio::test]
async fn synthesis_returns_the_raw_audio_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-1/stream"))
        .and(header("xi-api-key", "xi-key"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let service = elevenlabs_service(&server).await;
    let audio = service
        .synthesize("hello there", &SynthesisOptions::voice("voice-1"))
        .await
        .unwrap();
    assert_eq!(audio, b"mp3-bytes");
}

#[tokio::test]
async fn mismatched_operations_are_unsupported() {
    let server = MockServer::start().await;
    let service = elevenlabs_service(&server).await;

    let err = service
        .recognize(vec![0u8; 16], &RecognitionOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UNSUPPORTED_OPERATION");
    assert!(err.to_string().contains("elevenlabs"));

    let mut whisper = SpeechService::new(reqwest::Client::new());
    whisper
        .configure(ServiceConfig::new("whisper").with_credential("api_key", "sk-key"))
        .unwrap();
    let err = whisper
        .synthesize("hello", &SynthesisOptions::voice("v1"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UNSUPPORTED_OPERATION");
    assert!(err.to_string().contains("whisper"));
}

#[tokio::test]
async fn whisper_recognition_transcribes_audio() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(header("authorization", "Bearer sk-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "hello world" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = SpeechService::new(reqwest::Client::new());
    service
        .configure(
            ServiceConfig::new("whisper")
                .with_credential("api_key", "sk-key")
                .with_option("base_url", server.uri()),
        )
        .unwrap();

    let text = service
        .recognize(vec![0u8; 128], &RecognitionOptions::default())
        .await
        .unwrap();
    assert_eq!(text, "hello world");
}

#[tokio::test]
async fn streaming_chunks_the_audio_and_reports_progress() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-1/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8; 10]))
        .mount(&server)
        .await;

    let service = elevenlabs_service(&server).await;
    let progress: Arc<Mutex<Vec<f64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = progress.clone();

    let stream = service
        .stream(
            "hello there",
            StreamOptions {
                voice: "voice-1".to_string(),
                chunk_size: Some(4),
                realtime: false,
                on_progress: Some(Arc::new(move |percent| {
                    sink.lock().unwrap().push(percent);
                })),
            },
        )
        .await
        .unwrap();

    let chunks: Vec<Vec<u8>> = stream.map(|c| c.unwrap()).collect().await;
    let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![4, 4, 2]);

    let reported = progress.lock().unwrap().clone();
    assert_eq!(reported, vec![40.0, 80.0, 100.0]);
}

#[tokio::test]
async fn the_client_lists_account_voices() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/voices"))
        .and(header("xi-api-key", "xi-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "voices": [
                { "voice_id": "v1", "name": "Aria", "preview_url": "https://cdn.example.com/v1.mp3" },
                { "voice_id": "v2", "name": "Bram" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ElevenLabsClient::new(
        ElevenLabsConfig::new("xi-key").with_base_url(server.uri()),
        reqwest::Client::new(),
    );
    let voices = client.voices().await.unwrap();
    assert_eq!(voices.len(), 2);
    assert_eq!(voices[0].voice_id, "v1");
    assert_eq!(voices[0].name, "Aria");
    assert!(voices[1].preview_url.is_none());
}

#[tokio::test]
async fn streaming_requires_a_voice() {
    let server = MockServer::start().await;
    let service = elevenlabs_service(&server).await;

    let err = service
        .stream("hello", StreamOptions::default())
        .await
        .err()
        .unwrap();
    assert_eq!(err.code(), "INVALID_INPUT");
}
