//! Trigger message formatting and delivery.
//!
//! Email goes through a Resend-style HTTP API, push through a small gateway
//! that fans out to the user's registered devices. A failure in one channel
//! never blocks the other; callers collect per-channel errors keyed by alert
//! id so an operator can triage from the run summary.

use reqwest::Client;
use serde_json::json;

use crate::{
    models::{PortfolioAlert, StockAlert},
    AppState,
};

#[derive(Clone)]
pub struct Mailer {
    http: Client,
    api_key: String,
    from: String,
}

impl Mailer {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            from,
        }
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), String> {
        if !self.has_key() {
            return Err("RESEND_API_KEY is missing in .env".to_string());
        }

        let res = self
            .http
            .post("https://api.resend.com/emails")
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": [to],
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("email send failed: {status} {body}"));
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct PushClient {
    http: Client,
    url: String,
    api_key: String,
}

impl PushClient {
    pub fn new(url: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            url,
            api_key,
        }
    }

    fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub async fn send(
        &self,
        user_id: &str,
        title: &str,
        body: &str,
        tag: &str,
        data: serde_json::Value,
    ) -> Result<(), String> {
        if !self.is_configured() {
            return Err("PUSH_GATEWAY_URL is missing in .env".to_string());
        }

        let res = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "userId": user_id,
                "notification": {
                    "title": title,
                    "body": body,
                    "tag": tag,
                    "data": data,
                },
            }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("push send failed: {status} {body}"));
        }

        Ok(())
    }
}

// ---------------- Formatting ----------------

pub fn fmt_price(price: f64) -> String {
    format!("${:.2}", price)
}

pub fn stock_condition_text(condition: &str, target_price: f64) -> String {
    match condition {
        "above" => format!("rose above {}", fmt_price(target_price)),
        "below" => format!("fell below {}", fmt_price(target_price)),
        "crosses_above" => format!("crossed above {}", fmt_price(target_price)),
        "crosses_below" => format!("crossed below {}", fmt_price(target_price)),
        other => format!("met condition \"{other}\""),
    }
}

pub fn portfolio_condition_text(
    alert_type: &str,
    condition_value: Option<f64>,
    condition_percent: Option<f64>,
) -> String {
    match alert_type {
        "price_above" => match condition_value {
            Some(v) => format!("rose above {}", fmt_price(v)),
            None => "rose above its threshold".to_string(),
        },
        "price_below" => match condition_value {
            Some(v) => format!("fell below {}", fmt_price(v)),
            None => "fell below its threshold".to_string(),
        },
        "percent_change" => match condition_percent {
            Some(p) => format!("moved more than {p:.1}%"),
            None => "moved past its percent threshold".to_string(),
        },
        other => format!("met condition \"{other}\""),
    }
}

pub fn alert_email_subject(symbol: &str) -> String {
    format!("Price alert: {symbol}")
}

pub fn alert_email_html(symbol: &str, condition_text: &str, price_text: &str) -> String {
    format!(
        "<h2>Deep Terminal price alert</h2>\
         <p><strong>{symbol}</strong> {condition_text}.</p>\
         <p>Current price: <strong>{price_text}</strong></p>"
    )
}

// ---------------- Dispatch ----------------

/// Delivers notifications for a triggered stock alert.
///
/// Fixed policy for this alert kind: email whenever the owner has an email on
/// file, push always. Returns whether an email actually went out.
pub async fn dispatch_stock_alert(
    state: &AppState,
    alert: &StockAlert,
    user_email: Option<&str>,
    current_price: f64,
    errors: &mut Vec<String>,
) -> bool {
    let condition_text = stock_condition_text(&alert.condition, alert.target_price);
    let price_text = fmt_price(current_price);
    let mut email_sent = false;

    if let Some(to) = user_email {
        let subject = alert_email_subject(&alert.symbol);
        let html = alert_email_html(&alert.symbol, &condition_text, &price_text);

        match state.mailer.send(to, &subject, &html).await {
            Ok(()) => email_sent = true,
            Err(e) => errors.push(format!("alert {}: email failed: {e}", alert.id.to_hex())),
        }
    }

    let body = format!("{} {} (now {})", alert.symbol, condition_text, price_text);
    if let Err(e) = state
        .push
        .send(
            &alert.user_id.to_hex(),
            "Price alert",
            &body,
            &format!("stock-alert-{}", alert.id.to_hex()),
            json!({ "symbol": alert.symbol, "price": current_price }),
        )
        .await
    {
        errors.push(format!("alert {}: push failed: {e}", alert.id.to_hex()));
    }

    email_sent
}

/// Delivers notifications for a triggered portfolio alert, honoring the
/// per-alert channel toggles. Returns whether an email actually went out.
pub async fn dispatch_portfolio_alert(
    state: &AppState,
    alert: &PortfolioAlert,
    user_email: Option<&str>,
    current_price: f64,
    errors: &mut Vec<String>,
) -> bool {
    let symbol = alert.symbol.as_deref().unwrap_or("portfolio");
    let condition_text =
        portfolio_condition_text(&alert.alert_type, alert.condition_value, alert.condition_percent);
    let price_text = fmt_price(current_price);
    let mut email_sent = false;

    if alert.is_email_enabled {
        if let Some(to) = user_email {
            let subject = alert_email_subject(symbol);
            let html = alert_email_html(symbol, &condition_text, &price_text);

            match state.mailer.send(to, &subject, &html).await {
                Ok(()) => email_sent = true,
                Err(e) => errors.push(format!("alert {}: email failed: {e}", alert.id.to_hex())),
            }
        }
    }

    if alert.is_push_enabled {
        let body = format!("{symbol} {condition_text} (now {price_text})");
        if let Err(e) = state
            .push
            .send(
                &alert.user_id.to_hex(),
                "Portfolio alert",
                &body,
                &format!("portfolio-alert-{}", alert.id.to_hex()),
                json!({ "symbol": symbol, "price": current_price }),
            )
            .await
        {
            errors.push(format!("alert {}: push failed: {e}", alert.id.to_hex()));
        }
    }

    email_sent
}
