use mongodb::{
    bson::doc,
    Database, IndexModel,
};

use crate::error::StoreError;

pub async fn ensure_indexes(db: &Database) -> Result<(), StoreError> {
    // prices: per-asset series scans sorted by time
    {
        let col = db.collection::<mongodb::bson::Document>("prices");
        let model = IndexModel::builder()
            .keys(doc! { "asset": 1, "timestamp": -1 })
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
    }

    // alerts: pending scan per asset
    {
        let col = db.collection::<mongodb::bson::Document>("alerts");
        let model = IndexModel::builder()
            .keys(doc! { "asset": 1, "triggered": 1 })
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
    }

    Ok(())
}
