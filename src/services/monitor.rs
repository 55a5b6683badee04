use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;

use crate::config::Settings;
use crate::error::TickError;
use crate::models::PricePoint;
use crate::services::alert_evaluator::evaluate_alerts;
use crate::services::alert_store::AlertStore;
use crate::services::change_detector::check_price_change;
use crate::services::notifier::Notifier;
use crate::services::price_source::PriceSource;
use crate::services::price_store::PriceStore;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub tracked_assets: Vec<String>,
    pub fallback_prices: HashMap<String, f64>,
    pub volatility_window_secs: i64,
    pub volatility_threshold_pct: f64,
    pub crossing_epsilon_pct: f64,
}

impl MonitorConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            tracked_assets: settings.tracked_assets.clone(),
            fallback_prices: settings.fallback_prices.clone(),
            volatility_window_secs: settings.volatility_window_secs,
            volatility_threshold_pct: settings.volatility_threshold_pct,
            crossing_epsilon_pct: settings.crossing_epsilon_pct,
        }
    }
}

/// What one asset's pass through the pipeline produced. `fallback` marks
/// samples that came from the configured constant instead of the live API.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub asset: String,
    pub price: f64,
    pub fallback: bool,
    pub volatility_pct: Option<f64>,
    pub alerts_triggered: usize,
}

/// Periodic sampling loop: fetch, store, detect movement, run alerts.
/// One instance is shared by the timer task; per-asset in-flight flags
/// keep overlapping passes for the same asset from running twice.
pub struct PriceMonitor {
    source: Arc<dyn PriceSource>,
    prices: Arc<dyn PriceStore>,
    alerts: Arc<dyn AlertStore>,
    notifier: Arc<dyn Notifier>,
    cfg: MonitorConfig,
    in_flight: Mutex<HashSet<String>>,
}

impl PriceMonitor {
    pub fn new(
        source: Arc<dyn PriceSource>,
        prices: Arc<dyn PriceStore>,
        alerts: Arc<dyn AlertStore>,
        notifier: Arc<dyn Notifier>,
        cfg: MonitorConfig,
    ) -> Self {
        Self {
            source,
            prices,
            alerts,
            notifier,
            cfg,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// One full tick over the tracked assets, in configured order.
    /// A failing asset is reported and skipped; it never stops the others.
    pub async fn run_tick(&self) -> Vec<TickOutcome> {
        let mut outcomes = Vec::with_capacity(self.cfg.tracked_assets.len());

        for asset in &self.cfg.tracked_assets {
            if !self.try_begin(asset).await {
                tracing::warn!("skipping {}: previous pass still in flight", asset);
                continue;
            }

            let res = self.run_asset_tick(asset).await;
            self.finish(asset).await;

            match res {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => eprintln!("[price-monitor] {} tick error: {}", asset, e),
            }
        }

        outcomes
    }

    async fn try_begin(&self, asset: &str) -> bool {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.insert(asset.to_string())
    }

    async fn finish(&self, asset: &str) {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.remove(asset);
    }

    async fn run_asset_tick(&self, asset: &str) -> Result<TickOutcome, TickError> {
        let now = Utc::now().timestamp();

        let (price, fallback) = self.sample_price(asset).await?;
        tracing::info!("{} price: {}", asset, price);

        self.prices
            .append(PricePoint::new(asset, price, now))
            .await?;

        let volatility_pct = check_price_change(
            self.prices.as_ref(),
            asset,
            now,
            self.cfg.volatility_window_secs,
            self.cfg.volatility_threshold_pct,
        )
        .await?;

        if let Some(pct) = volatility_pct {
            if let Err(e) = self.notifier.notify_volatility(asset, pct).await {
                tracing::warn!("volatility delivery for {} failed: {}", asset, e);
            }
        }

        let alerts_triggered = evaluate_alerts(
            self.alerts.as_ref(),
            self.notifier.as_ref(),
            asset,
            price,
            self.cfg.crossing_epsilon_pct,
            now,
        )
        .await?;

        Ok(TickOutcome {
            asset: asset.to_string(),
            price,
            fallback,
            volatility_pct,
            alerts_triggered,
        })
    }

    /// Live price when the source delivers a usable one, otherwise the
    /// configured fallback constant. Non-finite and non-positive quotes
    /// count as fetch failures. With no fallback on file the asset's
    /// tick fails.
    async fn sample_price(&self, asset: &str) -> Result<(f64, bool), TickError> {
        let reason = match self.source.fetch_usd_price(asset).await {
            Ok(price) if price.is_finite() && price > 0.0 => return Ok((price, false)),
            Ok(price) => format!("unusable quote: {}", price),
            Err(e) => e.to_string(),
        };

        match self.cfg.fallback_prices.get(asset) {
            Some(&fallback) => {
                tracing::warn!("using fallback price {} for {}: {}", fallback, asset, reason);
                Ok((fallback, true))
            }
            None => Err(TickError::SourceUnavailable {
                asset: asset.to_string(),
                reason,
            }),
        }
    }
}

pub fn spawn_price_monitor(monitor: Arc<PriceMonitor>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(period);

        loop {
            interval.tick().await;
            monitor.run_tick().await;
        }
    })
}
