//! Webhook boundary tests
//!
//! The inbound handler must acknowledge every request with 200 "ok",
//! including unparseable bodies and internal failures.

use std::sync::Arc;

use actix_web::{test, web, App};
use anyhow::Result;
use async_trait::async_trait;

use voicecast::adapters::{
    ChannelMessenger, PodcastPublisher, Summarizer, TopicAnalysis, TopicAnalyzer, Transcriber,
};
use voicecast::server::{routes, AppState};
use voicecast::{ArtifactStore, IngestionController, MemoryStore, MetadataExtractor};

struct StubTranscriber {
    fail: bool,
}

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, _audio_uri: &str) -> Result<String> {
        if self.fail {
            anyhow::bail!("recognizer unavailable");
        }
        Ok("the quick brown fox".to_string())
    }
}

struct StubSummarizer;

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, _text: &str, _sentences: u8) -> Result<String> {
        Ok("A fox ran.".to_string())
    }
}

struct StubAnalyzer;

#[async_trait]
impl TopicAnalyzer for StubAnalyzer {
    async fn analyze(&self, _text: &str) -> Result<TopicAnalysis> {
        Ok(TopicAnalysis::default())
    }
}

struct StubPublisher;

#[async_trait]
impl PodcastPublisher for StubPublisher {
    async fn publish(
        &self,
        _media_url: &str,
        _title: &str,
        _content: &str,
    ) -> Result<Option<String>> {
        Ok(Some("https://host.example/player/e1".to_string()))
    }
}

struct StubMessenger;

#[async_trait]
impl ChannelMessenger for StubMessenger {
    async fn fetch_voice(&self, _file_id: &str) -> Result<Vec<u8>> {
        Ok(b"voice-bytes".to_vec())
    }

    async fn edit_caption(&self, _chat_id: i64, _message_id: i64, _caption: &str) -> Result<()> {
        Ok(())
    }
}

fn state(store: Arc<MemoryStore>, transcription_fails: bool) -> AppState {
    let controller = IngestionController::new(
        store,
        Arc::new(StubTranscriber {
            fail: transcription_fails,
        }),
        MetadataExtractor::new(Arc::new(StubSummarizer), Arc::new(StubAnalyzer)),
        Arc::new(StubPublisher),
        Arc::new(StubMessenger),
        "test-podcasts".to_string(),
    );
    AppState::new(Arc::new(controller))
}

#[actix_web::test]
async fn webhook_processes_new_voice_post() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(store.clone(), false)))
            .configure(routes),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/webhook")
        .set_payload(
            r#"{
                "update_id": 1,
                "channel_post": {
                    "message_id": 42,
                    "chat": {"id": -1009},
                    "voice": {"file_id": "file-7"}
                }
            }"#,
        )
        .to_request();

    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());

    // Both artifacts landed
    assert!(store.exists("-1009/42.mp3").await.unwrap());
    assert!(store.exists("-1009/42.json").await.unwrap());
}

#[actix_web::test]
async fn webhook_acknowledges_unparseable_body() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(store.clone(), false)))
            .configure(routes),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/webhook")
        .set_payload("this is not json")
        .to_request();

    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());
    assert!(store.is_empty());
}

#[actix_web::test]
async fn webhook_acknowledges_internal_failure() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(store.clone(), true)))
            .configure(routes),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/webhook")
        .set_payload(
            r#"{
                "channel_post": {
                    "message_id": 42,
                    "chat": {"id": -1009},
                    "voice": {"file_id": "file-7"}
                }
            }"#,
        )
        .to_request();

    // Transcription fails inside; the caller still sees success
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());
}

#[actix_web::test]
async fn webhook_ignores_non_voice_updates() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(store.clone(), false)))
            .configure(routes),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/webhook")
        .set_payload(r#"{"update_id": 5, "message": {"text": "plain chat message"}}"#)
        .to_request();

    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());
    assert!(store.is_empty());
}

#[actix_web::test]
async fn health_reports_ok() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(store, false)))
            .configure(routes),
    )
    .await;

    let request = test::TestRequest::get().uri("/health").to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["status"], "ok");
}
