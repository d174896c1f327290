//! End-to-end tests for the webhook and admin API: real router, real
//! dispatcher and TEO adapter, remote purge API mocked at the HTTP layer.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use spurgo::application::dispatcher::PurgeDispatcher;
use spurgo::application::history::HistoryService;
use spurgo::application::repos::{EdgeSettingsRepo, HistoryRepo};
use spurgo::application::settings::EdgeSettingsService;
use spurgo::config::EdgeClientSettings;
use spurgo::domain::settings::EdgeSettingsRecord;
use spurgo::infra::edge::{EdgePurgeClient, TeoEdgeClient};
use spurgo::infra::http::{AdminState, build_router};
use spurgo::infra::store::MemoryStore;
use tower::ServiceExt;

const TOKEN: &str = "test-token";

fn seeded_store(default_host: &str) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.set_settings(EdgeSettingsRecord {
        secret_id: "id".to_string(),
        secret_key: "key".to_string(),
        zone_id: "zone-1".to_string(),
        default_host: default_host.to_string(),
    });
    store
}

fn router_with(endpoint: &str, store: Arc<MemoryStore>, site_host: Option<&str>) -> Router {
    let edge = EdgeClientSettings {
        endpoint: Some(endpoint.to_string()),
        timeout: Duration::from_secs(5),
        encode_urls: true,
    };
    let settings_repo: Arc<dyn EdgeSettingsRepo> = store.clone();
    let history_repo: Arc<dyn HistoryRepo> = store;

    let client: Arc<dyn EdgePurgeClient> =
        Arc::new(TeoEdgeClient::new(&edge, settings_repo.clone()).expect("client"));
    let settings = EdgeSettingsService::new(settings_repo, site_host.map(String::from));
    let history = HistoryService::new(history_repo);
    let dispatcher = Arc::new(PurgeDispatcher::new(client, settings.clone(), history.clone()));

    build_router(AdminState {
        dispatcher,
        history,
        settings,
        admin_token: Some(TOKEN.to_string()),
    })
}

fn request(
    method: &str,
    path: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).expect("body")))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(req).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn teo_ok<'a>(server: &'a MockServer, partial: &str) -> httpmock::Mock<'a> {
    let partial = partial.to_string();
    server
        .mock_async(move |when, then| {
            when.method(POST).path("/").json_body_includes(partial);
            then.status(200).json_body(serde_json::json!({
                "Response": {"RequestId": "req-9", "JobId": "job-9"}
            }));
        })
        .await
}

#[tokio::test]
async fn health_is_open() {
    let server = MockServer::start_async().await;
    let router = router_with(&server.base_url(), seeded_store(""), None);

    let (status, _) = send(&router, request("GET", "/healthz", None, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn admin_routes_reject_missing_or_wrong_tokens() {
    let server = MockServer::start_async().await;
    let router = router_with(&server.base_url(), seeded_store(""), None);

    let (status, body) = send(&router, request("GET", "/admin/history", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");

    let (status, _) = send(
        &router,
        request("GET", "/admin/history", None, Some("wrong")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn purge_url_submits_a_task_and_records_history() {
    let server = MockServer::start_async().await;
    let mock = teo_ok(
        &server,
        r#"{"Type": "purge_url", "Targets": ["https://example.com/post"], "EncodeUrl": true, "ZoneId": "zone-1"}"#,
    )
    .await;
    let router = router_with(&server.base_url(), seeded_store(""), None);

    let (status, body) = send(
        &router,
        request(
            "POST",
            "/admin/purge/url",
            Some(serde_json::json!({"url": "https://example.com/post"})),
            Some(TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request_id"], "req-9");
    assert_eq!(body["task_id"], "job-9");
    mock.assert_async().await;

    let (status, body) = send(&router, request("GET", "/admin/history", None, Some(TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["kind"], "url");
    assert_eq!(entries[0]["success"], true);
    assert_eq!(entries[0]["target"], "https://example.com/post");
}

#[tokio::test]
async fn purge_url_with_incomplete_settings_reports_the_missing_field() {
    let server = MockServer::start_async().await;
    let store = Arc::new(MemoryStore::new());
    store.set_settings(EdgeSettingsRecord {
        secret_id: "id".to_string(),
        ..Default::default()
    });
    let router = router_with(&server.base_url(), store, None);

    let (status, body) = send(
        &router,
        request(
            "POST",
            "/admin/purge/url",
            Some(serde_json::json!({"url": "https://example.com/post"})),
            Some(TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "config_incomplete");
    assert!(
        body["error"]["message"]
            .as_str()
            .expect("message")
            .contains("secret_key")
    );

    // The failed attempt is still recorded.
    let (_, body) = send(&router, request("GET", "/admin/history", None, Some(TOKEN))).await;
    let entries = body["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["success"], false);
}

#[tokio::test]
async fn purge_all_requires_confirmation() {
    let server = MockServer::start_async().await;
    let mock = teo_ok(&server, r#"{"Type": "purge_all"}"#).await;
    let router = router_with(&server.base_url(), seeded_store(""), None);

    let (status, body) = send(
        &router,
        request(
            "POST",
            "/admin/purge/all",
            Some(serde_json::json!({})),
            Some(TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "confirmation_required");
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn confirmed_purge_all_invalidates_the_whole_zone() {
    let server = MockServer::start_async().await;
    let mock = teo_ok(
        &server,
        r#"{"Type": "purge_all", "Method": "invalidate", "ZoneId": "zone-1"}"#,
    )
    .await;
    let router = router_with(&server.base_url(), seeded_store(""), None);

    let (status, body) = send(
        &router,
        request(
            "POST",
            "/admin/purge/all",
            Some(serde_json::json!({"confirm": true})),
            Some(TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "all");
    assert_eq!(body["target"], "all");
    mock.assert_async().await;

    let (_, body) = send(&router, request("GET", "/admin/history", None, Some(TOKEN))).await;
    let entries = body["entries"].as_array().expect("entries");
    assert_eq!(entries[0]["target"], "all");
    assert_eq!(entries[0]["success"], true);
}

#[tokio::test]
async fn first_publish_webhook_purges_the_default_host() {
    let server = MockServer::start_async().await;
    let mock = teo_ok(
        &server,
        r#"{"Type": "purge_host", "Targets": ["cdn.example.com"], "Method": "invalidate"}"#,
    )
    .await;
    let router = router_with(&server.base_url(), seeded_store("cdn.example.com"), None);

    let (status, _) = send(
        &router,
        request(
            "POST",
            "/hooks/content-status",
            Some(serde_json::json!({
                "new_status": "publish",
                "old_status": "draft",
                "content": {"id": "42", "type": "post", "permalink": "https://example.com/post"}
            })),
            Some(TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    mock.assert_async().await;
}

#[tokio::test]
async fn first_publish_webhook_falls_back_to_the_site_host() {
    let server = MockServer::start_async().await;
    let mock = teo_ok(
        &server,
        r#"{"Type": "purge_host", "Targets": ["example.com"], "Method": "invalidate"}"#,
    )
    .await;
    let router = router_with(&server.base_url(), seeded_store(""), Some("example.com"));

    let (status, _) = send(
        &router,
        request(
            "POST",
            "/hooks/content-status",
            Some(serde_json::json!({
                "new_status": "publish",
                "old_status": "pending",
                "content": {"id": "42", "type": "post", "permalink": "https://example.com/post"}
            })),
            Some(TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    mock.assert_async().await;
}

#[tokio::test]
async fn republish_webhook_purges_the_permalink() {
    let server = MockServer::start_async().await;
    let mock = teo_ok(
        &server,
        r#"{"Type": "purge_url", "Targets": ["https://example.com/post"]}"#,
    )
    .await;
    let router = router_with(&server.base_url(), seeded_store("cdn.example.com"), None);

    let (status, _) = send(
        &router,
        request(
            "POST",
            "/hooks/content-status",
            Some(serde_json::json!({
                "new_status": "publish",
                "old_status": "publish",
                "content": {"id": "42", "type": "post", "permalink": "https://example.com/post"}
            })),
            Some(TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    mock.assert_async().await;
}

#[tokio::test]
async fn draft_save_webhook_is_a_complete_noop() {
    let server = MockServer::start_async().await;
    let mock = teo_ok(&server, "{}").await;
    let router = router_with(&server.base_url(), seeded_store("cdn.example.com"), None);

    let (status, _) = send(
        &router,
        request(
            "POST",
            "/hooks/content-status",
            Some(serde_json::json!({
                "new_status": "draft",
                "old_status": "draft",
                "content": {"id": "42", "type": "post", "permalink": "https://example.com/post"}
            })),
            Some(TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    mock.assert_hits_async(0).await;

    let (_, body) = send(&router, request("GET", "/admin/history", None, Some(TOKEN))).await;
    assert!(body["entries"].as_array().expect("entries").is_empty());
}

#[tokio::test]
async fn webhook_accepts_even_when_the_remote_purge_fails() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(500).body("upstream exploded");
        })
        .await;
    let router = router_with(&server.base_url(), seeded_store("cdn.example.com"), None);

    let (status, _) = send(
        &router,
        request(
            "POST",
            "/hooks/content-status",
            Some(serde_json::json!({
                "new_status": "publish",
                "old_status": "draft",
                "content": {"id": "42", "type": "post", "permalink": "https://example.com/post"}
            })),
            Some(TOKEN),
        ),
    )
    .await;

    // The platform save must never observe the failure.
    assert_eq!(status, StatusCode::ACCEPTED);
    mock.assert_async().await;

    let (_, body) = send(&router, request("GET", "/admin/history", None, Some(TOKEN))).await;
    let entries = body["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["success"], false);
}

#[tokio::test]
async fn history_clear_requires_confirmation_then_empties_the_log() {
    let server = MockServer::start_async().await;
    let _mock = teo_ok(&server, r#"{"Type": "purge_all"}"#).await;
    let router = router_with(&server.base_url(), seeded_store(""), None);

    send(
        &router,
        request(
            "POST",
            "/admin/purge/all",
            Some(serde_json::json!({"confirm": true})),
            Some(TOKEN),
        ),
    )
    .await;

    let (status, body) = send(
        &router,
        request(
            "POST",
            "/admin/history/clear",
            Some(serde_json::json!({})),
            Some(TOKEN),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "confirmation_required");

    let (status, _) = send(
        &router,
        request(
            "POST",
            "/admin/history/clear",
            Some(serde_json::json!({"confirm": true})),
            Some(TOKEN),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&router, request("GET", "/admin/history", None, Some(TOKEN))).await;
    assert!(body["entries"].as_array().expect("entries").is_empty());
}

#[tokio::test]
async fn settings_roundtrip_redacts_the_secret_key() {
    let server = MockServer::start_async().await;
    let router = router_with(&server.base_url(), Arc::new(MemoryStore::new()), None);

    let (status, body) = send(
        &router,
        request(
            "PUT",
            "/admin/settings",
            Some(serde_json::json!({
                "secret_id": "id-1",
                "secret_key": "super-secret",
                "zone_id": "zone-1",
                "default_host": "cdn.example.com"
            })),
            Some(TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["secret_id"], "id-1");
    assert_eq!(body["secret_key_set"], true);
    assert!(body.get("secret_key").is_none());

    let (status, body) = send(&router, request("GET", "/admin/settings", None, Some(TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["zone_id"], "zone-1");
    assert_eq!(body["default_host"], "cdn.example.com");
    assert!(body.get("secret_key").is_none());
}
