//! Error types for the monitoring pipeline and its collaborators.

use thiserror::Error;

/// Failures while fetching a price from the external market-data API.
/// All of these are transient by default: the monitor recovers with the
/// configured fallback price instead of failing the tick.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by price API")]
    RateLimited,

    #[error("unknown asset: {0}")]
    UnknownAsset(String),
}

/// Failures talking to the price or alert store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}

/// Failures delivering a notification. Logged and reported, never allowed
/// to block or reverse an alert's triggered transition.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Failure of a single asset's tick. One asset failing never stops the
/// other assets or the next tick.
#[derive(Error, Debug)]
pub enum TickError {
    #[error("no usable price for {asset} and no fallback configured: {reason}")]
    SourceUnavailable { asset: String, reason: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
