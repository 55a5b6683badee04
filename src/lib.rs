//! Library entrypoint for PriceWatch.
//!
//! This file exists mainly to make controller tests easy (integration tests
//! under `tests/` can import the app state, routers, controllers, services).

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;

pub mod services;

pub mod controllers;
pub mod routes;

use services::alert_store::AlertStore;
use services::notifier::Notifier;
use services::price_source::PriceSource;
use services::price_store::PriceStore;

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub price_store: Arc<dyn PriceStore>,
    pub alert_store: Arc<dyn AlertStore>,
    pub price_source: Arc<dyn PriceSource>,
    pub notifier: Arc<dyn Notifier>,
}
