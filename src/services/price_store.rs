use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::StreamExt;
use mongodb::bson::doc;
use mongodb::options::{FindOneOptions, FindOptions};
use mongodb::Database;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::PricePoint;

/// Append-only time series of price samples. Duplicate (asset, timestamp)
/// pairs are allowed; readers treat them as independent samples.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn append(&self, point: PricePoint) -> Result<(), StoreError>;

    /// Most recent sample for the asset, if any.
    async fn latest(&self, asset: &str) -> Result<Option<PricePoint>, StoreError>;

    /// Most recent sample strictly older than `cutoff`, if any.
    async fn latest_before(&self, asset: &str, cutoff: i64)
        -> Result<Option<PricePoint>, StoreError>;

    /// Samples with `timestamp >= since`, newest first. With `asset = None`
    /// every tracked asset is included.
    async fn range_since(
        &self,
        asset: Option<&str>,
        since: i64,
    ) -> Result<Vec<PricePoint>, StoreError>;
}

pub struct MongoPriceStore {
    db: Database,
}

impl MongoPriceStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PriceStore for MongoPriceStore {
    async fn append(&self, point: PricePoint) -> Result<(), StoreError> {
        let prices = self.db.collection::<PricePoint>("prices");

        prices
            .insert_one(&point, None)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn latest(&self, asset: &str) -> Result<Option<PricePoint>, StoreError> {
        let prices = self.db.collection::<PricePoint>("prices");
        let opts = FindOneOptions::builder()
            .sort(doc! { "timestamp": -1 })
            .build();

        prices
            .find_one(doc! { "asset": asset }, opts)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn latest_before(
        &self,
        asset: &str,
        cutoff: i64,
    ) -> Result<Option<PricePoint>, StoreError> {
        let prices = self.db.collection::<PricePoint>("prices");
        let opts = FindOneOptions::builder()
            .sort(doc! { "timestamp": -1 })
            .build();

        prices
            .find_one(doc! { "asset": asset, "timestamp": { "$lt": cutoff } }, opts)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn range_since(
        &self,
        asset: Option<&str>,
        since: i64,
    ) -> Result<Vec<PricePoint>, StoreError> {
        let prices = self.db.collection::<PricePoint>("prices");

        let mut filter = doc! { "timestamp": { "$gte": since } };
        if let Some(asset) = asset {
            filter.insert("asset", asset);
        }

        let opts = FindOptions::builder().sort(doc! { "timestamp": -1 }).build();

        let mut cursor = prices
            .find(filter, opts)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut items: Vec<PricePoint> = Vec::new();
        while let Some(res) = cursor.next().await {
            items.push(res.map_err(|e| StoreError::Database(e.to_string()))?);
        }

        Ok(items)
    }
}

/// In-memory store keyed by asset. Backs tests and any run without Mongo.
#[derive(Default)]
pub struct MemoryPriceStore {
    points: RwLock<HashMap<String, Vec<PricePoint>>>,
}

impl MemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PriceStore for MemoryPriceStore {
    async fn append(&self, point: PricePoint) -> Result<(), StoreError> {
        let mut points = self.points.write().await;
        points.entry(point.asset.clone()).or_default().push(point);
        Ok(())
    }

    async fn latest(&self, asset: &str) -> Result<Option<PricePoint>, StoreError> {
        let points = self.points.read().await;
        Ok(points
            .get(asset)
            .and_then(|series| series.iter().max_by_key(|p| p.timestamp))
            .cloned())
    }

    async fn latest_before(
        &self,
        asset: &str,
        cutoff: i64,
    ) -> Result<Option<PricePoint>, StoreError> {
        let points = self.points.read().await;
        Ok(points
            .get(asset)
            .and_then(|series| {
                series
                    .iter()
                    .filter(|p| p.timestamp < cutoff)
                    .max_by_key(|p| p.timestamp)
            })
            .cloned())
    }

    async fn range_since(
        &self,
        asset: Option<&str>,
        since: i64,
    ) -> Result<Vec<PricePoint>, StoreError> {
        let points = self.points.read().await;

        let mut items: Vec<PricePoint> = points
            .iter()
            .filter(|(key, _)| asset.map_or(true, |a| a == key.as_str()))
            .flat_map(|(_, series)| series.iter())
            .filter(|p| p.timestamp >= since)
            .cloned()
            .collect();

        items.sort_by_key(|p| std::cmp::Reverse(p.timestamp));

        Ok(items)
    }
}
