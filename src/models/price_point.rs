use serde::{Deserialize, Serialize};

/// One observed price for one asset. Append-only: samples are never
/// updated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub asset: String,
    pub price: f64,
    pub timestamp: i64,
}

impl PricePoint {
    pub fn new(asset: impl Into<String>, price: f64, timestamp: i64) -> Self {
        Self {
            asset: asset.into(),
            price,
            timestamp,
        }
    }
}
