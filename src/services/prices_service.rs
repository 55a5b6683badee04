use chrono::Utc;

use crate::error::StoreError;
use crate::models::PricePoint;
use crate::AppState;

/// Stored samples from the last `hours` hours, newest first. Pass an
/// asset to narrow the view to one series.
pub async fn recent_prices(
    state: &AppState,
    asset: Option<&str>,
    hours: i64,
) -> Result<Vec<PricePoint>, StoreError> {
    let since = Utc::now().timestamp().saturating_sub(hours.saturating_mul(3600));
    state.price_store.range_since(asset, since).await
}
