pub mod price_source;
pub mod price_store;
pub mod alert_store;
pub mod notifier;
pub mod db_init;

pub mod change_detector;
pub mod alert_evaluator;
pub mod monitor;

pub mod prices_service;
pub mod alerts_service;
pub mod swap_service;
