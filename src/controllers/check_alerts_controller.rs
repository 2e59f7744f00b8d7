use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::{
    services::check_alerts::{self, RunResults},
    AppState,
};

// GET/POST /check-alerts — same behavior for both methods so platform crons
// and manual curl invocations both work.
pub async fn run_check_alerts(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let mut results = RunResults::default();

    match check_alerts::run(&state, &mut results).await {
        Ok(()) => {
            let duration = started.elapsed().as_millis() as u64;
            tracing::info!(
                duration_ms = duration,
                stock_checked = results.stock_alerts.checked,
                stock_triggered = results.stock_alerts.triggered,
                portfolio_checked = results.portfolio_alerts.checked,
                portfolio_triggered = results.portfolio_alerts.triggered,
                errors = results.errors.len(),
                "alert check finished"
            );

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "results": results,
                    "duration": duration,
                })),
            )
                .into_response()
        }
        Err(e) => {
            let duration = started.elapsed().as_millis() as u64;
            tracing::error!(duration_ms = duration, error = %e, "alert check failed");

            // Partial results accumulated before the failure still go out.
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "alert check failed",
                    "details": e,
                    "results": results,
                    "duration": duration,
                })),
            )
                .into_response()
        }
    }
}
