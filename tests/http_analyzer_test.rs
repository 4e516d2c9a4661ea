use home_sentinel::adapters::{ConfiguredAnalyzer, HttpImageAnalyzer};
use home_sentinel::config::{AnalysisConfig, AnalysisProvider};
use home_sentinel::{
    AlarmEngine, AlarmStatus, ArmingStatus, ImageAnalyzer, InMemoryRepository, SecurityError,
};
use httpmock::prelude::*;
use std::time::Duration;

fn analyzer(server: &MockServer) -> HttpImageAnalyzer {
    HttpImageAnalyzer::new(server.url("/labels"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_cat_label_above_threshold() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/labels")
            .query_param_exists("min_confidence")
            .header("content-type", "application/octet-stream")
            .body("jpeg-bytes");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "labels": [
                    {"name": "Sofa", "confidence": 99.1},
                    {"name": "Cat", "confidence": 91.4}
                ]
            }));
    });

    let detected = analyzer(&server)
        .contains_cat(b"jpeg-bytes", 50.0)
        .await
        .unwrap();

    api_mock.assert();
    assert!(detected);
}

#[tokio::test]
async fn test_cat_label_below_threshold_is_ignored() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/labels");
        then.status(200).json_body(serde_json::json!({
            "labels": [{"name": "cat", "confidence": 42.0}]
        }));
    });

    let detected = analyzer(&server).contains_cat(b"img", 50.0).await.unwrap();

    api_mock.assert();
    assert!(!detected);
}

#[tokio::test]
async fn test_other_labels_are_not_cats() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/labels");
        then.status(200).json_body(serde_json::json!({
            "labels": [
                {"name": "Dog", "confidence": 98.0},
                {"name": "Catamaran", "confidence": 97.0}
            ]
        }));
    });

    assert!(!analyzer(&server).contains_cat(b"img", 50.0).await.unwrap());
}

#[tokio::test]
async fn test_empty_label_list() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/labels");
        then.status(200).json_body(serde_json::json!({}));
    });

    assert!(!analyzer(&server).contains_cat(b"img", 50.0).await.unwrap());
}

#[tokio::test]
async fn test_server_error_is_analysis_error() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/labels");
        then.status(503);
    });

    let err = analyzer(&server).contains_cat(b"img", 50.0).await.unwrap_err();

    api_mock.assert();
    assert!(matches!(err, SecurityError::AnalysisError { .. }));
}

#[tokio::test]
async fn test_malformed_body_is_analysis_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/labels");
        then.status(200).body("<html>maintenance</html>");
    });

    let err = analyzer(&server).contains_cat(b"img", 50.0).await.unwrap_err();
    assert!(matches!(err, SecurityError::AnalysisError { .. }));
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/labels");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(serde_json::json!({"labels": []}));
    });
    let analyzer = HttpImageAnalyzer::new(server.url("/labels"), Duration::from_millis(300)).unwrap();

    let err = analyzer.contains_cat(b"img", 50.0).await.unwrap_err();
    assert!(matches!(err, SecurityError::AnalysisError { .. }));
}

#[tokio::test]
async fn test_engine_with_configured_http_provider() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/labels");
        then.status(200).json_body(serde_json::json!({
            "labels": [{"name": "Cat", "confidence": 88.0}]
        }));
    });

    let config = AnalysisConfig {
        provider: AnalysisProvider::Http,
        endpoint: Some(server.url("/labels")),
        ..AnalysisConfig::default()
    };
    let analyzer = ConfiguredAnalyzer::from_config(&config).unwrap();
    let engine = AlarmEngine::new(InMemoryRepository::new(), analyzer);
    engine.set_arming_status(ArmingStatus::ArmedHome).await.unwrap();

    assert!(engine.process_image(b"frame").await.unwrap());
    assert_eq!(engine.get_alarm_status().await.unwrap(), AlarmStatus::Alarm);
}

#[tokio::test]
async fn test_engine_state_untouched_when_provider_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/labels");
        then.status(500);
    });

    let engine = AlarmEngine::new(InMemoryRepository::new(), analyzer(&server));
    engine.set_arming_status(ArmingStatus::ArmedHome).await.unwrap();
    let before = engine.state().await.unwrap();

    assert!(engine.process_image(b"frame").await.is_err());
    assert_eq!(engine.state().await.unwrap(), before);
}
