use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mongodb::Client;

use pricewatch::config;
use pricewatch::routes;
use pricewatch::services::alert_store::MongoAlertStore;
use pricewatch::services::db_init;
use pricewatch::services::monitor::{spawn_price_monitor, MonitorConfig, PriceMonitor};
use pricewatch::services::notifier::{EmailNotifier, LogNotifier, Notifier};
use pricewatch::services::price_source::CoinGeckoClient;
use pricewatch::services::price_store::MongoPriceStore;
use pricewatch::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = db_init::ensure_indexes(&db).await {
        tracing::warn!("could not ensure indexes: {}", e);
    }

    let price_source = Arc::new(CoinGeckoClient::new(
        settings.price_api_url.clone(),
        settings.price_api_key.clone(),
        Duration::from_secs(settings.fetch_timeout_secs),
    ));
    let price_store = Arc::new(MongoPriceStore::new(db.clone()));
    let alert_store = Arc::new(MongoAlertStore::new(db.clone()));

    let notifier: Arc<dyn Notifier> = if settings.email_api_url.trim().is_empty() {
        Arc::new(LogNotifier::new())
    } else {
        Arc::new(EmailNotifier::new(
            settings.email_api_url.clone(),
            settings.email_api_key.clone(),
            settings.email_from.clone(),
            settings.alert_email.clone(),
        ))
    };

    let monitor = Arc::new(PriceMonitor::new(
        price_source.clone(),
        price_store.clone(),
        alert_store.clone(),
        notifier.clone(),
        MonitorConfig::from_settings(&settings),
    ));
    spawn_price_monitor(monitor, Duration::from_secs(settings.tick_interval_secs));

    let state = AppState {
        db,
        settings: settings.clone(),
        price_store,
        alert_store,
        price_source,
        notifier,
    };

    let app = routes::app(state);

    let addr = SocketAddr::from((settings.host.parse::<std::net::IpAddr>().unwrap(), settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
