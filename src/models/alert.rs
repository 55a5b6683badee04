use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub asset: String,
    pub target_price: f64,
    pub email: String,

    pub created_at: i64,

    // flips false -> true exactly once, never back
    pub triggered: bool,
    pub triggered_at: Option<i64>,
}

impl Alert {
    pub fn new(asset: impl Into<String>, target_price: f64, email: impl Into<String>, now: i64) -> Self {
        Self {
            id: ObjectId::new(),
            asset: asset.into(),
            target_price,
            email: email.into(),
            created_at: now,
            triggered: false,
            triggered_at: None,
        }
    }
}
