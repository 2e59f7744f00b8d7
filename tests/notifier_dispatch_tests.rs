use chrono::Utc;
use mongodb::{bson::oid::ObjectId, Client};

use deepterminal_alerts::{
    config,
    models::{PortfolioAlert, StockAlert},
    services::{self, notifier},
    AppState,
};

// Mailer and push client are left unconfigured (empty key / empty gateway
// URL), so every delivery attempt fails locally without touching the network.
async fn test_state() -> AppState {
    let mut settings = config::load();
    settings.app_env = "production".to_string();
    settings.finnhub_api_key = String::new();
    settings.resend_api_key = String::new();
    settings.push_gateway_url = String::new();

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

fn stock_alert(symbol: &str) -> StockAlert {
    StockAlert {
        id: ObjectId::new(),
        user_id: ObjectId::new(),
        symbol: symbol.to_string(),
        condition: "above".to_string(),
        target_price: 150.0,
        is_active: true,
        triggered_at: None,
        created_at: Utc::now().timestamp(),
    }
}

fn portfolio_alert(email_enabled: bool, push_enabled: bool) -> PortfolioAlert {
    PortfolioAlert {
        id: ObjectId::new(),
        user_id: ObjectId::new(),
        portfolio_id: ObjectId::new(),
        symbol: Some("AAPL".to_string()),
        alert_type: "price_below".to_string(),
        condition_value: Some(50.0),
        condition_percent: None,
        is_active: true,
        is_email_enabled: email_enabled,
        is_push_enabled: push_enabled,
        last_triggered_at: None,
        trigger_count: 0,
        created_at: Utc::now().timestamp(),
    }
}

#[tokio::test]
async fn stock_dispatch_attempts_both_channels_despite_failures() {
    let state = test_state().await;
    let alert = stock_alert("AAPL");
    let mut errors: Vec<String> = Vec::new();

    let email_sent = notifier::dispatch_stock_alert(
        &state,
        &alert,
        Some("owner@example.com"),
        152.30,
        &mut errors,
    )
    .await;

    // The email failure did not short-circuit the push attempt; both
    // failures are recorded against the alert id and nothing propagated.
    assert!(!email_sent);
    assert_eq!(errors.len(), 2);
    let id = alert.id.to_hex();
    assert!(errors.iter().all(|e| e.contains(&id)));
    assert!(errors.iter().any(|e| e.contains("email failed")));
    assert!(errors.iter().any(|e| e.contains("push failed")));
}

#[tokio::test]
async fn stock_dispatch_failure_does_not_block_the_next_alert() {
    let state = test_state().await;
    let first = stock_alert("AAPL");
    let second = stock_alert("TSLA");
    let mut errors: Vec<String> = Vec::new();

    notifier::dispatch_stock_alert(&state, &first, Some("a@example.com"), 152.30, &mut errors)
        .await;
    notifier::dispatch_stock_alert(&state, &second, Some("b@example.com"), 201.00, &mut errors)
        .await;

    assert!(errors.iter().any(|e| e.contains(&first.id.to_hex())));
    assert!(errors.iter().any(|e| e.contains(&second.id.to_hex())));
}

#[tokio::test]
async fn portfolio_dispatch_attempts_both_enabled_channels_despite_failures() {
    let state = test_state().await;
    let alert = portfolio_alert(true, true);
    let mut errors: Vec<String> = Vec::new();

    let email_sent = notifier::dispatch_portfolio_alert(
        &state,
        &alert,
        Some("owner@example.com"),
        45.00,
        &mut errors,
    )
    .await;

    assert!(!email_sent);
    assert_eq!(errors.len(), 2);
    let id = alert.id.to_hex();
    assert!(errors.iter().all(|e| e.contains(&id)));
}

#[tokio::test]
async fn portfolio_dispatch_skips_disabled_push_channel() {
    let state = test_state().await;
    let alert = portfolio_alert(true, false);
    let mut errors: Vec<String> = Vec::new();

    notifier::dispatch_portfolio_alert(
        &state,
        &alert,
        Some("owner@example.com"),
        45.00,
        &mut errors,
    )
    .await;

    // Only the enabled email channel was attempted.
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("email failed"));
}
