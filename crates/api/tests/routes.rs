//! Route-level integration tests driving the full router with `oneshot`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use runbook_api::config::ServerConfig;
use runbook_api::router::build_app_router;
use runbook_api::state::AppState;
use runbook_core::types::JobId;
use runbook_dispatch::{Dispatcher, DispatcherConfig, JobService};
use runbook_engine::{
    EngineError, EngineOutcome, EventSink, ExecutionRequest, PlaybookEngine,
};

/// Resolves without emitting any status events, so rows stay in `created`
/// and route assertions are deterministic.
struct NullEngine;

#[async_trait]
impl PlaybookEngine for NullEngine {
    async fn run(
        &self,
        request: ExecutionRequest,
        _sink: EventSink,
    ) -> Result<EngineOutcome, EngineError> {
        Ok(EngineOutcome {
            identifier: request.identifier,
            rc: Some(0),
        })
    }
}

fn test_app(pool: PgPool, playbook_dir: PathBuf) -> Router {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
    };

    let dispatcher = Dispatcher::new(
        Arc::new(NullEngine),
        pool.clone(),
        DispatcherConfig::default(),
    );
    let service = Arc::new(JobService::new(pool.clone(), dispatcher));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        playbook_dir,
        service,
    };

    build_app_router(state, &config)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[sqlx::test(migrations = "../../migrations")]
async fn health_reports_ok(pool: PgPool) {
    let app = test_app(pool, PathBuf::from("/nonexistent"));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
}

#[sqlx::test(migrations = "../../migrations")]
async fn start_playbook_returns_created_job(pool: PgPool) {
    let app = test_app(pool, PathBuf::from("/nonexistent"));

    let response = app
        .oneshot(post_json("/api/v1/playbooks/site.yml", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let job = &body["data"];
    assert_eq!(job["job_name"], "site.yml");
    assert_eq!(job["initiator"], "rest");
    assert_eq!(job["status"], "created");
    assert!(job["start_time"].is_null());
    assert!(job["end_time"].is_null());
    assert!(job["result"].is_null());
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_job_round_trips_and_unknown_is_404(pool: PgPool) {
    let app = test_app(pool, PathBuf::from("/nonexistent"));

    let response = app
        .clone()
        .oneshot(post_json("/api/v1/playbooks/site.yml", "{}"))
        .await
        .unwrap();
    let created = body_json(response).await;
    let identifier = created["data"]["job_uuid"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/jobs/{identifier}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["job_uuid"], identifier.as_str());

    let response = app
        .oneshot(get(&format!("/api/v1/jobs/{}", JobId::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_jobs_returns_envelope(pool: PgPool) {
    let app = test_app(pool, PathBuf::from("/nonexistent"));

    for playbook in ["one.yml", "two.yml"] {
        app.clone()
            .oneshot(post_json(&format!("/api/v1/playbooks/{playbook}"), "{}"))
            .await
            .unwrap();
    }

    let response = app.oneshot(get("/api/v1/jobs?limit=10")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_job_then_404(pool: PgPool) {
    let app = test_app(pool, PathBuf::from("/nonexistent"));

    let response = app
        .clone()
        .oneshot(post_json("/api/v1/playbooks/site.yml", "{}"))
        .await
        .unwrap();
    let created = body_json(response).await;
    let identifier = created["data"]["job_uuid"].as_str().unwrap().to_string();

    let delete = |uri: String| {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(delete(format!("/api/v1/jobs/{identifier}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(delete(format!("/api/v1/jobs/{identifier}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_playbooks_filters_yaml_extensions(pool: PgPool) {
    let playbook_dir = std::env::temp_dir().join(format!("playbooks-{}", JobId::new_v4()));
    tokio::fs::create_dir_all(&playbook_dir).await.unwrap();
    for name in ["site.yml", "deploy.yaml", "notes.txt"] {
        tokio::fs::write(playbook_dir.join(name), "---\n").await.unwrap();
    }

    let app = test_app(pool, playbook_dir.clone());

    let response = app.oneshot(get("/api/v1/playbooks")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"], serde_json::json!(["deploy.yaml", "site.yml"]));

    tokio::fs::remove_dir_all(&playbook_dir).await.unwrap();
}
