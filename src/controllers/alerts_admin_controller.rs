//! Operator triage views: what the next evaluation pass will look at.
//! Gated by the same cron/admin bearer secret as /check-alerts.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::{services::alert_store, AppState};

// GET /admin/alerts/stock
pub async fn get_active_stock_alerts(State(state): State<AppState>) -> Response {
    let items = match alert_store::list_active_stock_alerts(&state).await {
        Ok(v) => v,
        Err(e) => return db_error(e),
    };

    let alerts: Vec<serde_json::Value> = items
        .into_iter()
        .map(|entry| {
            json!({
                "id": entry.alert.id.to_hex(),
                "userId": entry.alert.user_id.to_hex(),
                "symbol": entry.alert.symbol,
                "condition": entry.alert.condition,
                "targetPrice": entry.alert.target_price,
                "createdAt": entry.alert.created_at,
                "userEmail": entry.user_email,
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({ "count": alerts.len(), "alerts": alerts })),
    )
        .into_response()
}

// GET /admin/alerts/portfolio
pub async fn get_active_portfolio_alerts(State(state): State<AppState>) -> Response {
    let items = match alert_store::list_active_portfolio_alerts(&state).await {
        Ok(v) => v,
        Err(e) => return db_error(e),
    };

    let alerts: Vec<serde_json::Value> = items
        .into_iter()
        .map(|entry| {
            json!({
                "id": entry.alert.id.to_hex(),
                "userId": entry.alert.user_id.to_hex(),
                "portfolioId": entry.alert.portfolio_id.to_hex(),
                "symbol": entry.alert.symbol,
                "alertType": entry.alert.alert_type,
                "conditionValue": entry.alert.condition_value,
                "conditionPercent": entry.alert.condition_percent,
                "isEmailEnabled": entry.alert.is_email_enabled,
                "isPushEnabled": entry.alert.is_push_enabled,
                "triggerCount": entry.alert.trigger_count,
                "lastTriggeredAt": entry.alert.last_triggered_at,
                "userEmail": entry.user_email,
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({ "count": alerts.len(), "alerts": alerts })),
    )
        .into_response()
}

fn db_error(e: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "db error", "details": e })),
    )
        .into_response()
}
