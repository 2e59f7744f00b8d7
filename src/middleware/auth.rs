use axum::{
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{config::Settings, AppState};

/// Decides whether an invocation comes from a trusted scheduler or operator.
///
/// Accepted: the platform cron header, or a bearer token matching
/// `CRON_SECRET`. Development mode skips the check entirely.
pub fn is_cron_authorized(headers: &HeaderMap, settings: &Settings) -> bool {
    if settings.is_development() {
        return true;
    }

    if headers.contains_key("x-vercel-cron") {
        return true;
    }

    // An unset secret must not match an absent/empty bearer token.
    if settings.cron_secret.trim().is_empty() {
        return false;
    }

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    bearer == Some(settings.cron_secret.as_str())
}

fn is_public_path(path: &str) -> bool {
    path == "/" || path == "/health" || path == "/health/db"
}

pub async fn require_cron_auth(
    State(state): State<AppState>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    if is_public_path(req.uri().path()) {
        return next.run(req).await;
    }

    if !is_cron_authorized(req.headers(), &state.settings) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized" })),
        )
            .into_response();
    }

    next.run(req).await
}
