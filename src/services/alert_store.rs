use async_trait::async_trait;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;
use mongodb::Database;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::Alert;

#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn insert(&self, alert: Alert) -> Result<(), StoreError>;

    /// Alerts for the asset still waiting to fire, newest first.
    async fn pending_for_asset(&self, asset: &str) -> Result<Vec<Alert>, StoreError>;

    async fn get(&self, id: ObjectId) -> Result<Option<Alert>, StoreError>;

    /// Compare-and-set on the triggered flag. Returns true if this call
    /// performed the false -> true transition, false if the alert was
    /// already triggered (or is unknown). There is no reverse transition.
    async fn mark_triggered(&self, id: ObjectId, at: i64) -> Result<bool, StoreError>;
}

pub struct MongoAlertStore {
    db: Database,
}

impl MongoAlertStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlertStore for MongoAlertStore {
    async fn insert(&self, alert: Alert) -> Result<(), StoreError> {
        let alerts = self.db.collection::<Alert>("alerts");

        alerts
            .insert_one(&alert, None)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn pending_for_asset(&self, asset: &str) -> Result<Vec<Alert>, StoreError> {
        let alerts = self.db.collection::<Alert>("alerts");
        let opts = FindOptions::builder().sort(doc! { "created_at": -1 }).build();

        let mut cursor = alerts
            .find(doc! { "asset": asset, "triggered": false }, opts)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut items: Vec<Alert> = Vec::new();
        while let Some(res) = cursor.next().await {
            items.push(res.map_err(|e| StoreError::Database(e.to_string()))?);
        }

        Ok(items)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Alert>, StoreError> {
        let alerts = self.db.collection::<Alert>("alerts");

        alerts
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn mark_triggered(&self, id: ObjectId, at: i64) -> Result<bool, StoreError> {
        let alerts = self.db.collection::<Alert>("alerts");

        let res = alerts
            .update_one(
                doc! { "_id": id, "triggered": false },
                doc! { "$set": { "triggered": true, "triggered_at": at } },
                None,
            )
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(res.matched_count > 0)
    }
}

#[derive(Default)]
pub struct MemoryAlertStore {
    alerts: RwLock<Vec<Alert>>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn insert(&self, alert: Alert) -> Result<(), StoreError> {
        let mut alerts = self.alerts.write().await;
        alerts.push(alert);
        Ok(())
    }

    async fn pending_for_asset(&self, asset: &str) -> Result<Vec<Alert>, StoreError> {
        let alerts = self.alerts.read().await;

        let mut items: Vec<Alert> = alerts
            .iter()
            .filter(|a| a.asset == asset && !a.triggered)
            .cloned()
            .collect();

        items.sort_by_key(|a| std::cmp::Reverse(a.created_at));

        Ok(items)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Alert>, StoreError> {
        let alerts = self.alerts.read().await;
        Ok(alerts.iter().find(|a| a.id == id).cloned())
    }

    async fn mark_triggered(&self, id: ObjectId, at: i64) -> Result<bool, StoreError> {
        let mut alerts = self.alerts.write().await;

        match alerts.iter_mut().find(|a| a.id == id && !a.triggered) {
            Some(alert) => {
                alert.triggered = true;
                alert.triggered_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
