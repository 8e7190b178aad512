//! GitLabGateway against an in-process stand-in for the GitLab API

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use stage_release::gateway::{GatewayError, GitLabGateway, MergeRequestGateway};
use std::collections::HashMap;
use std::time::Duration;

const MR_ROUTE: &str = "/api/v4/projects/{id}/merge_requests";

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn gateway(base: &str, project_id: &str, token: Option<&str>) -> GitLabGateway {
    GitLabGateway::new(
        base,
        project_id,
        token.map(str::to_string),
        Duration::from_secs(5),
    )
    .unwrap()
}

/// Mirrors GitLab: opened MRs only, token checked, X-Total set
async fn merge_requests(
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if headers.get("private-token").and_then(|v| v.to_str().ok()) != Some("s3cret") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "401 Unauthorized"})))
            .into_response();
    }
    if id != "team/web-app" || query.get("state").map(String::as_str) != Some("opened") {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "404 Project Not Found"})))
            .into_response();
    }
    ([("x-total", "7")], Json(json!([{"iid": 1}, {"iid": 2}]))).into_response()
}

#[tokio::test]
async fn test_count_prefers_total_header() {
    let base = spawn_server(Router::new().route(MR_ROUTE, get(merge_requests))).await;

    let count = gateway(&base, "team/web-app", Some("s3cret"))
        .open_merge_requests()
        .await
        .unwrap();

    assert_eq!(count, 7);
}

#[tokio::test]
async fn test_count_falls_back_to_array_length() {
    let router = Router::new().route(
        MR_ROUTE,
        get(|| async { Json(json!([{"iid": 1}, {"iid": 2}, {"iid": 3}])) }),
    );
    let base = spawn_server(router).await;

    let count = gateway(&base, "42", None).open_merge_requests().await.unwrap();

    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_empty_list_is_zero() {
    let router = Router::new().route(MR_ROUTE, get(|| async { Json(json!([])) }));
    let base = spawn_server(router).await;

    assert_eq!(gateway(&base, "42", None).open_merge_requests().await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let base = spawn_server(Router::new().route(MR_ROUTE, get(merge_requests))).await;

    let err = gateway(&base, "team/web-app", None)
        .open_merge_requests()
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Unauthorized(401)));
}

#[tokio::test]
async fn test_unknown_project_reports_status() {
    let base = spawn_server(Router::new().route(MR_ROUTE, get(merge_requests))).await;

    let err = gateway(&base, "team/other", Some("s3cret"))
        .open_merge_requests()
        .await
        .unwrap_err();

    match err {
        GatewayError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Project Not Found"));
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_array_body_is_a_decode_error() {
    let router = Router::new().route(MR_ROUTE, get(|| async { Json(json!({"count": 2})) }));
    let base = spawn_server(router).await;

    let err = gateway(&base, "42", None).open_merge_requests().await.unwrap_err();

    assert!(matches!(err, GatewayError::Decode(ref msg) if msg.contains("an object")));
}

#[tokio::test]
async fn test_slow_host_times_out() {
    let router = Router::new().route(
        MR_ROUTE,
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!([]))
        }),
    );
    let base = spawn_server(router).await;
    let gateway = GitLabGateway::new(&base, "42", None, Duration::from_millis(200)).unwrap();

    let err = gateway.open_merge_requests().await.unwrap_err();

    assert!(matches!(err, GatewayError::Http(ref e) if e.is_timeout()));
}
