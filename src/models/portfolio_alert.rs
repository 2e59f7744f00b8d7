use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Recurring watch condition, optionally tied to a ticker. Stays active after
/// triggering; `trigger_count` only ever goes up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAlert {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub portfolio_id: ObjectId,

    // None for portfolio-level alert types (portfolio_value, daily_gain_loss).
    pub symbol: Option<String>,

    // "price_above" | "price_below" | "percent_change" | "portfolio_value"
    // | "daily_gain_loss" | "news"
    pub alert_type: String,
    pub condition_value: Option<f64>,
    pub condition_percent: Option<f64>,

    pub is_active: bool,
    pub is_email_enabled: bool,
    pub is_push_enabled: bool,

    pub last_triggered_at: Option<i64>,
    #[serde(default)]
    pub trigger_count: i64,

    pub created_at: i64,
}
