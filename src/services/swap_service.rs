use crate::error::SourceError;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapQuote {
    pub btc_amount: f64,
    pub fee_eth: f64,
    pub fee_usd: f64,
}

/// ETH to BTC conversion at the given spot prices. The fee comes off
/// the ETH side before conversion.
pub fn swap_rate(eth_amount: f64, eth_price: f64, btc_price: f64, fee_pct: f64) -> SwapQuote {
    let fee_eth = eth_amount * fee_pct / 100.0;
    let fee_usd = fee_eth * eth_price;
    let btc_amount = (eth_amount - fee_eth) * eth_price / btc_price;

    SwapQuote {
        btc_amount,
        fee_eth,
        fee_usd,
    }
}

pub async fn eth_to_btc(state: &AppState, eth_amount: f64) -> Result<SwapQuote, SourceError> {
    let eth_price = price_with_fallback(state, "ethereum").await?;
    let btc_price = price_with_fallback(state, "bitcoin").await?;

    Ok(swap_rate(
        eth_amount,
        eth_price,
        btc_price,
        state.settings.swap_fee_pct,
    ))
}

async fn price_with_fallback(state: &AppState, asset: &str) -> Result<f64, SourceError> {
    match state.price_source.fetch_usd_price(asset).await {
        Ok(price) if price.is_finite() && price > 0.0 => Ok(price),
        Ok(price) => stale_quote(state, asset, &format!("unusable quote: {}", price)),
        Err(e) => stale_quote(state, asset, &e.to_string()),
    }
}

fn stale_quote(state: &AppState, asset: &str, reason: &str) -> Result<f64, SourceError> {
    match state.settings.fallback_prices.get(asset) {
        Some(&fallback) => {
            tracing::warn!("using fallback price {} for {}: {}", fallback, asset, reason);
            Ok(fallback)
        }
        None => Err(SourceError::Network(format!(
            "no price for {}: {}",
            asset, reason
        ))),
    }
}
