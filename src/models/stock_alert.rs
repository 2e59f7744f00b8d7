use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One-shot price watch on a single ticker. Deactivated the first time its
/// condition holds; never evaluated again after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAlert {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub symbol: String,

    // "above" | "below" | "crosses_above" | "crosses_below"
    pub condition: String,
    pub target_price: f64,

    pub is_active: bool,
    pub triggered_at: Option<i64>,

    pub created_at: i64,
}
