use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tripsmith::{
    Attraction, CatalogSource, CompletionClient, CompletionConfig, ItineraryPipeline,
    PipelineError, Result as PipelineResult, TripRequest,
};

fn attraction(id: &str, name: &str) -> Attraction {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "type": "historical",
        "location": {"lat": 39.9163, "lng": 116.3972, "address": "somewhere in Beijing"},
        "duration": {"quick": 60, "normal": 120, "deep": 240},
        "openingHours": {"weekday": "08:30-17:00", "weekend": "08:30-17:00"},
        "ticketInfo": {"price": 60, "needReservation": true},
        "tags": ["imperial"]
    }))
    .unwrap()
}

/// In-memory catalog source standing in for the external collaborator
struct StaticCatalog;

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load(&self, destination: &str) -> PipelineResult<Vec<Attraction>> {
        if destination == "beijing" {
            Ok(vec![
                attraction("beijing-gugong", "The Palace Museum"),
                attraction("beijing-jingshan", "Jingshan Park"),
            ])
        } else {
            Ok(Vec::new())
        }
    }
}

fn pipeline_for(base_url: &str, api_key: &str) -> ItineraryPipeline<StaticCatalog> {
    let config = CompletionConfig::new(api_key)
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5));
    ItineraryPipeline::new(StaticCatalog, CompletionClient::new(config))
}

/// A minimal three-variant batch referencing the given attraction id
fn plans_json(attraction_id: &str) -> serde_json::Value {
    json!({
        "plans": [
            {
                "version": "deep",
                "title": "In-depth",
                "description": "relaxed",
                "totalAttractions": 1,
                "dailyPlans": [{
                    "day": 1,
                    "date": "2026-05-01",
                    "theme": "Imperial axis",
                    "activities": [{
                        "time": "08:30",
                        "type": "attraction",
                        "attractionId": attraction_id,
                        "name": "The Palace Museum",
                        "duration": 180,
                        "tips": ["enter via the Meridian Gate"],
                        "aiReason": "quiet in the morning"
                    }],
                    "estimatedCost": 200
                }]
            },
            {"version": "classic", "title": "Classic", "description": "", "totalAttractions": 0, "dailyPlans": []},
            {"version": "niche", "title": "Niche", "description": "", "totalAttractions": 0, "dailyPlans": []}
        ]
    })
}

fn completion_body(content: &str) -> String {
    json!({"choices": [{"message": {"content": content}}]}).to_string()
}

#[tokio::test]
async fn test_full_pipeline_with_fenced_reply() {
    let mut server = mockito::Server::new_async().await;
    let content = format!(
        "Here is your plan:\n```json\n{}\n```\nEnjoy!",
        plans_json("beijing-gugong")
    );
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(&content))
        .create_async()
        .await;

    let pipeline = pipeline_for(&server.url(), "test-key");
    let response = pipeline
        .generate(&TripRequest::new("beijing", 3))
        .await
        .unwrap();

    assert_eq!(response.plans.len(), 3);
    let activity = &response.plans[0].daily_plans[0].activities[0];
    assert_eq!(activity.attraction_id.as_deref(), Some("beijing-gugong"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unknown_attraction_id_rejected() {
    let mut server = mockito::Server::new_async().await;
    let content = plans_json("beijing-forbidden-lake").to_string();
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(&content))
        .create_async()
        .await;

    let pipeline = pipeline_for(&server.url(), "test-key");
    let err = pipeline
        .generate(&TripRequest::new("beijing", 3))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert!(err.to_string().contains("beijing-forbidden-lake"));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_empty_plans_fails_validation() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(
            "Here is your plan:\n```json\n{\"plans\":[]}\n```\nEnjoy!",
        ))
        .create_async()
        .await;

    let pipeline = pipeline_for(&server.url(), "test-key");
    let err = pipeline
        .generate(&TripRequest::new("beijing", 3))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert!(err.to_string().contains("plans array is empty"));
}

#[tokio::test]
async fn test_prose_only_reply_is_extraction_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(
            "I'm sorry, I can't produce an itinerary right now.",
        ))
        .create_async()
        .await;

    let pipeline = pipeline_for(&server.url(), "test-key");
    let err = pipeline
        .generate(&TripRequest::new("beijing", 3))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "EXTRACTION_ERROR");
    assert!(err.is_retryable());
    match err {
        PipelineError::Extraction { raw_preview, .. } => {
            assert!(raw_preview.starts_with("I'm sorry"));
        }
        other => panic!("expected extraction error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_credential_makes_no_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server.url(), "");
    let err = pipeline
        .generate(&TripRequest::new("beijing", 3))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(!err.is_retryable());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_chunked_body(|writer| {
            std::thread::sleep(Duration::from_millis(500));
            writer.write_all(b"{}")
        })
        .create_async()
        .await;

    let config = CompletionConfig::new("test-key")
        .with_base_url(server.url())
        .with_timeout(Duration::from_millis(100));
    let pipeline = ItineraryPipeline::new(StaticCatalog, CompletionClient::new(config));

    let err = pipeline
        .generate(&TripRequest::new("beijing", 3))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "TIMEOUT_ERROR");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_upstream_error_carries_status_and_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(r#"{"error": {"message": "quota exceeded"}}"#)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server.url(), "test-key");
    let err = pipeline
        .generate(&TripRequest::new("beijing", 3))
        .await
        .unwrap_err();

    match &err {
        PipelineError::Upstream { status, message } => {
            assert_eq!(*status, 429);
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_success_body_without_content_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server.url(), "test-key");
    let err = pipeline
        .generate(&TripRequest::new("beijing", 3))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "MALFORMED_UPSTREAM_RESPONSE");
}

#[tokio::test]
async fn test_unknown_destination_makes_no_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let pipeline = pipeline_for(&server.url(), "test-key");
    let err = pipeline
        .generate(&TripRequest::new("atlantis", 3))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "CATALOG_NOT_FOUND");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unfenced_reply_with_trailing_prose() {
    // The model ignored the "JSON only" instruction but the brace span
    // still recovers the batch.
    let mut server = mockito::Server::new_async().await;
    let content = format!(
        "Sure! Your itinerary: {} Have a wonderful trip!",
        plans_json("beijing-jingshan")
    );
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body(&content))
        .create_async()
        .await;

    let pipeline = pipeline_for(&server.url(), "test-key");
    let response = pipeline
        .generate(&TripRequest::new("beijing", 3))
        .await
        .unwrap();

    let activity = &response.plans[0].daily_plans[0].activities[0];
    assert_eq!(activity.attraction_id.as_deref(), Some("beijing-jingshan"));
}
