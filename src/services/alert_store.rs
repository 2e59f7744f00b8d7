use std::collections::HashMap;

use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use crate::{
    models::{PortfolioAlert, StockAlert, User},
    AppState,
};

/// Active alert joined with the owner's contact email (None when the user
/// record is missing or has no email).
#[derive(Debug, Clone)]
pub struct ActiveStockAlert {
    pub alert: StockAlert,
    pub user_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ActivePortfolioAlert {
    pub alert: PortfolioAlert,
    pub user_email: Option<String>,
}

pub async fn list_active_stock_alerts(
    state: &AppState,
) -> Result<Vec<ActiveStockAlert>, String> {
    let alerts = state.db.collection::<StockAlert>("stock_alerts");

    let mut cursor = alerts
        .find(doc! { "is_active": true }, None)
        .await
        .map_err(|e| e.to_string())?;

    let mut items: Vec<StockAlert> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res.map_err(|e| e.to_string())?);
    }

    let emails = user_emails(state, items.iter().map(|a| a.user_id)).await?;

    Ok(items
        .into_iter()
        .map(|alert| ActiveStockAlert {
            user_email: emails.get(&alert.user_id).cloned(),
            alert,
        })
        .collect())
}

pub async fn list_active_portfolio_alerts(
    state: &AppState,
) -> Result<Vec<ActivePortfolioAlert>, String> {
    let alerts = state.db.collection::<PortfolioAlert>("portfolio_alerts");

    let mut cursor = alerts
        .find(doc! { "is_active": true }, None)
        .await
        .map_err(|e| e.to_string())?;

    let mut items: Vec<PortfolioAlert> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res.map_err(|e| e.to_string())?);
    }

    let emails = user_emails(state, items.iter().map(|a| a.user_id)).await?;

    Ok(items
        .into_iter()
        .map(|alert| ActivePortfolioAlert {
            user_email: emails.get(&alert.user_id).cloned(),
            alert,
        })
        .collect())
}

async fn user_emails(
    state: &AppState,
    user_ids: impl Iterator<Item = ObjectId>,
) -> Result<HashMap<ObjectId, String>, String> {
    let ids: Vec<ObjectId> = user_ids.collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = state.db.collection::<User>("users");

    let mut cursor = users
        .find(doc! { "_id": { "$in": ids } }, None)
        .await
        .map_err(|e| e.to_string())?;

    let mut map: HashMap<ObjectId, String> = HashMap::new();
    while let Some(res) = cursor.next().await {
        let u = res.map_err(|e| e.to_string())?;
        map.insert(u.id, u.email);
    }

    Ok(map)
}

/// Marks a one-shot alert triggered. Returns true only when this call flipped
/// it; the `is_active` guard makes the transition happen exactly once even if
/// two runs race on the same alert.
pub async fn deactivate_stock_alert(
    state: &AppState,
    alert_id: ObjectId,
) -> Result<bool, String> {
    let alerts = state.db.collection::<StockAlert>("stock_alerts");
    let now = Utc::now().timestamp();

    let res = alerts
        .update_one(
            doc! { "_id": alert_id, "is_active": true },
            doc! { "$set": { "is_active": false, "triggered_at": now } },
            None,
        )
        .await
        .map_err(|e| e.to_string())?;

    Ok(res.matched_count > 0)
}

/// Records a trigger on a recurring alert without deactivating it.
pub async fn bump_portfolio_alert(
    state: &AppState,
    alert_id: ObjectId,
    new_trigger_count: i64,
) -> Result<(), String> {
    let alerts = state.db.collection::<PortfolioAlert>("portfolio_alerts");
    let now = Utc::now().timestamp();

    alerts
        .update_one(
            doc! { "_id": alert_id },
            doc! { "$set": { "last_triggered_at": now, "trigger_count": new_trigger_count } },
            None,
        )
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
