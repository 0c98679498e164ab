//! Integration tests for the polling API

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use nids_core::logic::model::forest::{DecisionTree, TreeNode};
use nids_core::{Classifier, ClassifierError, ForestModel, SamplePool, TrafficLabel, TrafficSimulator};
use nids_dashboard::{create_router, AppState};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::{json, Value};
use tower::ServiceExt;

/// One feature, `src_bytes > 0.5` is an attack with probability 0.95
fn attack_model() -> Arc<ForestModel> {
    let tree = DecisionTree::new(vec![
        TreeNode::split(0, 0.5, 1, 2).with_stats(0.5, 40),
        TreeNode::leaf([20.0, 0.0]).with_stats(0.0, 20),
        TreeNode::leaf([0.05, 0.95]).with_stats(0.095, 20),
    ]);
    Arc::new(ForestModel::new(vec!["src_bytes".to_string()], 1, vec![tree]).unwrap())
}

fn attack_pool() -> Arc<SamplePool> {
    Arc::new(SamplePool::from_rows(vec!["src_bytes".to_string()], vec![vec![1.0]], None).unwrap())
}

fn app_with(classifier: Arc<dyn Classifier>) -> (Router, Arc<TrafficSimulator>) {
    let simulator = Arc::new(TrafficSimulator::new(attack_pool(), classifier, StdRng::seed_from_u64(3)).unwrap());
    let state = AppState::new(simulator.clone(), attack_model());
    (create_router(state), simulator)
}

fn app() -> (Router, Arc<TrafficSimulator>) {
    app_with(attack_model())
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_stats_poll_triggers_burst() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);

    let total = body["total_packets"].as_u64().unwrap();
    assert!((1..=5).contains(&total));
    assert_eq!(body["threats_detected"].as_u64(), Some(total));
    assert_eq!(body["threat_level"], "Normal");
    assert_eq!(body["threat_level_normalized"], "High");
    assert_eq!(body["simulation_running"], true);
}

#[tokio::test]
async fn test_stop_is_idempotent_and_freezes_counters() {
    let (app, _) = app();

    let first = send(&app, Method::POST, "/api/control/stop").await;
    let second = send(&app, Method::POST, "/api/control/stop").await;
    assert_eq!(first, (StatusCode::OK, json!({"status": "stopped", "running": false})));
    assert_eq!(first, second);

    for _ in 0..5 {
        let (_, body) = send(&app, Method::GET, "/api/stats").await;
        assert_eq!(body["total_packets"], 0);
        assert_eq!(body["simulation_running"], false);
    }

    let (_, body) = send(&app, Method::POST, "/api/control/start").await;
    assert_eq!(body, json!({"status": "started", "running": true}));

    let (_, body) = send(&app, Method::GET, "/api/stats").await;
    assert!(body["total_packets"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_alerts_newest_first() {
    let (app, simulator) = app();
    simulator.prewarm(3).unwrap();

    let (status, body) = send(&app, Method::GET, "/api/alerts").await;
    assert_eq!(status, StatusCode::OK);

    let alerts = body.as_array().unwrap();
    let ids: Vec<u64> = alerts.iter().map(|a| a["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![3, 2, 1]);

    for alert in alerts {
        assert_eq!(alert["severity"], "High");
        assert_eq!(alert["score"], 0.95);
        assert_eq!(alert["type"], "Malicious Activity");

        let ts = alert["timestamp"].as_str().unwrap();
        assert_eq!(ts.len(), 8);
        assert_eq!(&ts[2..3], ":");
        assert_eq!(&ts[5..6], ":");
    }
}

#[tokio::test]
async fn test_alerts_do_not_trigger_sampling() {
    let (app, simulator) = app();

    let (_, body) = send(&app, Method::GET, "/api/alerts").await;
    assert_eq!(body, json!([]));
    assert_eq!(simulator.snapshot().total_sampled, 0);
}

#[tokio::test]
async fn test_alert_feed_capped_while_counters_keep_counting() {
    let (app, simulator) = app();
    simulator.prewarm(60).unwrap();
    send(&app, Method::POST, "/api/control/stop").await;

    let (_, alerts) = send(&app, Method::GET, "/api/alerts").await;
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 50);
    assert_eq!(alerts[0]["id"], 60);
    assert_eq!(alerts[49]["id"], 11);

    let (_, stats) = send(&app, Method::GET, "/api/stats").await;
    assert_eq!(stats["threats_detected"], 60);
    assert_eq!(stats["threat_level"], "Elevated");

    simulator.prewarm(41).unwrap();
    let (_, stats) = send(&app, Method::GET, "/api/stats").await;
    assert_eq!(stats["threats_detected"], 101);
    assert_eq!(stats["threat_level"], "Critical");
}

#[tokio::test]
async fn test_model_info() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/api/model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trees"], 1);
    assert_eq!(body["features"], 1);
    assert_eq!(body["pool_rows"], 1);
    assert_eq!(body["top_features"][0]["name"], "src_bytes");
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["simulation_running"], true);
    assert_eq!(body["pool_rows"], 1);

    send(&app, Method::POST, "/api/control/stop").await;
    let (_, body) = send(&app, Method::GET, "/health").await;
    assert_eq!(body["simulation_running"], false);
}

#[tokio::test]
async fn test_dashboard_page() {
    let (app, _) = app();

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("/api/stats"));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict(&self, _row: &[f32]) -> Result<TrafficLabel, ClassifierError> {
        Err(ClassifierError("tree index out of bounds".to_string()))
    }

    fn predict_proba(&self, _row: &[f32]) -> Result<[f64; 2], ClassifierError> {
        Err(ClassifierError("tree index out of bounds".to_string()))
    }

    fn n_features(&self) -> usize {
        1
    }
}

#[tokio::test]
async fn test_classifier_failure_is_server_error() {
    let (app, simulator) = app_with(Arc::new(FailingClassifier));

    let (status, body) = send(&app, Method::GET, "/api/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Simulation error occurred", "status": 500}));
    assert_eq!(simulator.snapshot().total_sampled, 0);
}
