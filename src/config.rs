use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub price_api_url: String,
    pub price_api_key: String,
    pub fetch_timeout_secs: u64,

    pub tick_interval_secs: u64,
    pub volatility_window_secs: i64,
    pub volatility_threshold_pct: f64,
    pub crossing_epsilon_pct: f64,

    pub tracked_assets: Vec<String>,
    pub fallback_prices: HashMap<String, f64>,

    pub swap_fee_pct: f64,

    pub alert_email: String,
    pub email_api_url: String,
    pub email_api_key: String,
    pub email_from: String,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "pricewatch".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let price_api_url = env::var("PRICE_API_URL")
        .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".to_string());

    let price_api_key = env::var("PRICE_API_KEY").unwrap_or_default();

    let fetch_timeout_secs = env::var("FETCH_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10);

    // A zero interval would panic tokio's interval timer inside the
    // monitor task, so it falls back to the default.
    let tick_interval_secs = env::var("TICK_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .unwrap_or(300);

    let volatility_window_secs = env::var("VOLATILITY_WINDOW_SECS")
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(3600);

    let volatility_threshold_pct = env::var("VOLATILITY_THRESHOLD_PCT")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(3.0);

    let crossing_epsilon_pct = env::var("CROSSING_EPSILON_PCT")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(1.0);

    let tracked_assets = parse_tracked_assets(
        &env::var("TRACKED_ASSETS").unwrap_or_else(|_| "ethereum,polygon".to_string()),
    );

    let fallback_prices = parse_fallback_prices(
        &env::var("FALLBACK_PRICES").unwrap_or_else(|_| "ethereum=2200,polygon=1.5".to_string()),
    );

    let swap_fee_pct = env::var("SWAP_FEE_PCT")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.3);

    let alert_email = env::var("ALERT_EMAIL")
        .unwrap_or_else(|_| "alerts@example.com".to_string());

    let email_api_url = env::var("EMAIL_API_URL").unwrap_or_default();
    let email_api_key = env::var("EMAIL_API_KEY").unwrap_or_default();

    let email_from = env::var("EMAIL_FROM")
        .unwrap_or_else(|_| "pricewatch@example.com".to_string());

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        price_api_url,
        price_api_key,
        fetch_timeout_secs,
        tick_interval_secs,
        volatility_window_secs,
        volatility_threshold_pct,
        crossing_epsilon_pct,
        tracked_assets,
        fallback_prices,
        swap_fee_pct,
        alert_email,
        email_api_url,
        email_api_key,
        email_from,
    }
}

/// Comma-separated asset ids, e.g. `"ethereum,polygon"`.
pub fn parse_tracked_assets(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Comma-separated `asset=price` pairs, e.g. `"ethereum=2200,polygon=1.5"`.
/// Entries that do not parse are skipped.
pub fn parse_fallback_prices(raw: &str) -> HashMap<String, f64> {
    let mut prices = HashMap::new();

    for entry in raw.split(',') {
        let Some((asset, value)) = entry.split_once('=') else {
            continue;
        };

        let asset = asset.trim().to_lowercase();
        if asset.is_empty() {
            continue;
        }

        if let Ok(price) = value.trim().parse::<f64>() {
            prices.insert(asset, price);
        }
    }

    prices
}
