#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use http_body_util::BodyExt;
use mongodb::Client;
use tokio::sync::Mutex;

use pricewatch::config;
use pricewatch::error::{NotifyError, SourceError};
use pricewatch::services::alert_store::MemoryAlertStore;
use pricewatch::services::notifier::Notifier;
use pricewatch::services::price_source::PriceSource;
use pricewatch::services::price_store::MemoryPriceStore;
use pricewatch::AppState;

/// Price source scripted per asset. Unlisted assets fail like a dead
/// network connection.
pub struct StaticPriceSource {
    prices: HashMap<String, f64>,
}

impl StaticPriceSource {
    pub fn new(prices: &[(&str, f64)]) -> Self {
        Self {
            prices: prices.iter().map(|(a, p)| (a.to_string(), *p)).collect(),
        }
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn fetch_usd_price(&self, asset: &str) -> Result<f64, SourceError> {
        match self.prices.get(asset) {
            Some(&price) => Ok(price),
            None => Err(SourceError::Network("connection refused".to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SentNotification {
    Volatility {
        asset: String,
        percentage_change: f64,
    },
    TargetHit {
        asset: String,
        price: f64,
        email: String,
    },
    AlertCreated {
        asset: String,
        target_price: f64,
        email: String,
    },
}

/// Sink that records every delivery it is asked to make. With
/// `fail_sends` it still records, then reports a delivery error.
#[derive(Default)]
pub struct RecordingNotifier {
    fail_sends: bool,
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub async fn deliveries(&self) -> Vec<SentNotification> {
        self.sent.lock().await.clone()
    }

    async fn record(&self, notification: SentNotification) -> Result<(), NotifyError> {
        self.sent.lock().await.push(notification);

        if self.fail_sends {
            return Err(NotifyError::Delivery("smtp down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_volatility(
        &self,
        asset: &str,
        percentage_change: f64,
    ) -> Result<(), NotifyError> {
        self.record(SentNotification::Volatility {
            asset: asset.to_string(),
            percentage_change,
        })
        .await
    }

    async fn notify_target_hit(
        &self,
        asset: &str,
        price: f64,
        email: &str,
    ) -> Result<(), NotifyError> {
        self.record(SentNotification::TargetHit {
            asset: asset.to_string(),
            price,
            email: email.to_string(),
        })
        .await
    }

    async fn notify_alert_created(
        &self,
        asset: &str,
        target_price: f64,
        email: &str,
    ) -> Result<(), NotifyError> {
        self.record(SentNotification::AlertCreated {
            asset: asset.to_string(),
            target_price,
            email: email.to_string(),
        })
        .await
    }
}

pub async fn test_state() -> AppState {
    test_state_with(
        Arc::new(StaticPriceSource::new(&[])),
        Arc::new(RecordingNotifier::new()),
    )
    .await
}

pub async fn test_state_with(
    source: Arc<dyn PriceSource>,
    notifier: Arc<dyn Notifier>,
) -> AppState {
    let settings = config::load();

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    AppState {
        db,
        settings,
        price_store: Arc::new(MemoryPriceStore::new()),
        alert_store: Arc::new(MemoryAlertStore::new()),
        price_source: source,
        notifier,
    }
}

pub async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}
