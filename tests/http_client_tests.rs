//! # HTTP Client Tests
//!
//! Runs the text-generation and nutrition clients against local mock servers
//! to check request shape and status/body error mapping.

use recipe_carbs::analysis_config::{NutritionServiceConfig, TextServiceConfig};
use recipe_carbs::analysis_errors::AnalysisError;
use recipe_carbs::nutrition_client::{NutritionSource, NutritionixClient};
use recipe_carbs::text_generation::{OpenAiClient, TextGenerator};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn text_client(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(TextServiceConfig {
        api_key: "sk-test".to_string(),
        // Trailing slash must not produce a double slash in the request path
        base_url: format!("{}/v1/", server.uri()),
        ..TextServiceConfig::default()
    })
    .expect("Failed to build text client")
}

fn nutrition_client(server: &MockServer) -> NutritionixClient {
    NutritionixClient::new(NutritionServiceConfig {
        app_id: "app-123".to_string(),
        api_key: "key-456".to_string(),
        base_url: server.uri(),
        ..NutritionServiceConfig::default()
    })
    .expect("Failed to build nutrition client")
}

#[tokio::test]
async fn test_text_client_returns_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                {"role": "system", "content": "list ingredients"},
                {"role": "user", "content": "2 eggs"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "NO_INGREDIENTS"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let content = text_client(&server)
        .complete("list ingredients", "2 eggs")
        .await
        .unwrap();

    assert_eq!(content, "NO_INGREDIENTS");
}

#[tokio::test]
async fn test_text_client_maps_unauthorized_to_service_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let outcome = text_client(&server).complete("prompt", "recipe").await;

    match outcome {
        Err(AnalysisError::TextServiceFailure(message)) => {
            assert!(message.contains("401"));
            assert!(message.contains("invalid api key"));
        }
        other => panic!("expected TextServiceFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_text_client_maps_garbage_body_to_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let outcome = text_client(&server).complete("prompt", "recipe").await;

    assert!(matches!(outcome, Err(AnalysisError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_text_client_without_choices_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let outcome = text_client(&server).complete("prompt", "recipe").await;

    assert!(matches!(outcome, Err(AnalysisError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_nutrition_client_sends_credentials_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/natural/nutrients"))
        .and(header("x-app-id", "app-123"))
        .and(header("x-app-key", "key-456"))
        .and(body_partial_json(json!({"query": "egg, flour"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foods": [
                {"food_name": "egg", "serving_weight_grams": 50, "nf_total_carbohydrate": 0.36},
                {"food_name": "flour", "serving_weight_grams": 125, "nf_total_carbohydrate": 95.4}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let foods = nutrition_client(&server).foods("egg, flour").await.unwrap();

    assert_eq!(foods.len(), 2);
    assert_eq!(foods[0].food_name, "egg");
    assert_eq!(foods[1].serving_weight_grams, Some(125.0));
}

#[tokio::test]
async fn test_nutrition_client_maps_rate_limit_to_service_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/natural/nutrients"))
        .respond_with(ResponseTemplate::new(429).set_body_string("usage limits exceeded"))
        .mount(&server)
        .await;

    let outcome = nutrition_client(&server).foods("egg").await;

    match outcome {
        Err(AnalysisError::NutritionServiceFailure(message)) => {
            assert!(message.contains("429"));
        }
        other => panic!("expected NutritionServiceFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_nutrition_client_maps_unauthorized_to_service_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/natural/nutrients"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "unauthorized"})))
        .mount(&server)
        .await;

    let outcome = nutrition_client(&server).foods("egg").await;

    assert!(matches!(outcome, Err(AnalysisError::NutritionServiceFailure(_))));
}

#[tokio::test]
async fn test_nutrition_client_maps_garbage_body_to_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/natural/nutrients"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let outcome = nutrition_client(&server).foods("egg").await;

    assert!(matches!(outcome, Err(AnalysisError::MalformedResponse(_))));
}
