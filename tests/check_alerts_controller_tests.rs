use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mongodb::Client;
use tower::ServiceExt;

use deepterminal_alerts::{config, routes, services, AppState};

async fn test_state(app_env: &str) -> AppState {
    let mut settings = config::load();
    settings.app_env = app_env.to_string();
    settings.cron_secret = "test-cron-secret".to_string();
    settings.finnhub_api_key = String::new();
    settings.symbol_pause_ms = 0;
    settings.check_interval_secs = 0;

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    let quotes = services::quotes::QuoteClient::new(settings.finnhub_api_key.clone());
    let mailer = services::notifier::Mailer::new(
        settings.resend_api_key.clone(),
        settings.alert_email_from.clone(),
    );
    let push = services::notifier::PushClient::new(
        settings.push_gateway_url.clone(),
        settings.push_gateway_key.clone(),
    );

    AppState {
        db,
        settings,
        quotes,
        mailer,
        push,
    }
}

async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn get_check_alerts_without_credentials_returns_401() {
    let state = test_state("production").await;
    let app = routes::app(state);

    let req = Request::builder()
        .method("GET")
        .uri("/check-alerts")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = response_body_string(res).await;
    assert!(body.contains("unauthorized"));
}

#[tokio::test]
async fn post_check_alerts_without_credentials_returns_401() {
    let state = test_state("production").await;
    let app = routes::app(state);

    let req = Request::builder()
        .method("POST")
        .uri("/check-alerts")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn check_alerts_with_wrong_bearer_returns_401() {
    let state = test_state("production").await;
    let app = routes::app(state);

    let req = Request::builder()
        .method("GET")
        .uri("/check-alerts")
        .header(header::AUTHORIZATION, "Bearer wrong-secret")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_reachable_without_credentials() {
    let state = test_state("production").await;
    let app = routes::app(state);

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    assert!(body.contains("ok"));
}

#[tokio::test]
async fn unknown_path_without_credentials_returns_401() {
    // Anything outside the public health paths sits behind the cron gate,
    // so unauthenticated requests to unknown paths get 401, not 404.
    let state = test_state("production").await;
    let app = routes::app(state);

    let req = Request::builder()
        .method("GET")
        .uri("/nope")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_path_in_dev_mode_returns_404_json() {
    let state = test_state("development").await;
    let app = routes::app(state);

    let req = Request::builder()
        .method("GET")
        .uri("/nope")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = response_body_string(res).await;
    assert!(body.contains("not found"));
}
