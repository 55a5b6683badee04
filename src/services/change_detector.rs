use crate::error::StoreError;
use crate::services::price_store::PriceStore;

/// Percent movement from `baseline` to `current`. A zero baseline has no
/// meaningful ratio, so it yields no signal instead of dividing by zero.
pub fn percentage_change(baseline: f64, current: f64) -> Option<f64> {
    if baseline == 0.0 {
        return None;
    }
    Some((current - baseline) / baseline * 100.0)
}

/// Compares the newest sample against the newest sample older than the
/// lookback window. Returns the percentage change when it is large enough
/// to notify about, `None` when there is no signal. Nothing is persisted;
/// the same movement can keep notifying on consecutive ticks until the
/// window slides past it.
pub async fn check_price_change(
    prices: &dyn PriceStore,
    asset: &str,
    now: i64,
    window_secs: i64,
    threshold_pct: f64,
) -> Result<Option<f64>, StoreError> {
    let Some(current) = prices.latest(asset).await? else {
        return Ok(None);
    };
    let Some(baseline) = prices.latest_before(asset, now - window_secs).await? else {
        return Ok(None);
    };

    let change = percentage_change(baseline.price, current.price);

    Ok(change.filter(|pct| pct.abs() >= threshold_pct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use crate::services::price_store::MemoryPriceStore;

    #[test]
    fn zero_baseline_yields_no_signal() {
        assert_eq!(percentage_change(0.0, 120.0), None);
    }

    #[test]
    fn computes_signed_percentage() {
        assert_eq!(percentage_change(100.0, 103.0), Some(3.0));
        assert_eq!(percentage_change(100.0, 97.0), Some(-3.0));
    }

    #[tokio::test]
    async fn fires_at_threshold_and_skips_below_it() {
        let store = MemoryPriceStore::new();
        store.append(PricePoint::new("ethereum", 100.0, 100)).await.unwrap();
        store.append(PricePoint::new("ethereum", 103.0, 4000)).await.unwrap();

        let fired = check_price_change(&store, "ethereum", 4000, 3600, 3.0)
            .await
            .unwrap();
        assert_eq!(fired, Some(3.0));

        let quiet = check_price_change(&store, "ethereum", 4000, 3600, 5.0)
            .await
            .unwrap();
        assert_eq!(quiet, None);
    }

    #[tokio::test]
    async fn downward_moves_count_by_magnitude() {
        let store = MemoryPriceStore::new();
        store.append(PricePoint::new("ethereum", 100.0, 100)).await.unwrap();
        store.append(PricePoint::new("ethereum", 96.0, 4000)).await.unwrap();

        let fired = check_price_change(&store, "ethereum", 4000, 3600, 3.0)
            .await
            .unwrap();
        assert_eq!(fired, Some(-4.0));
    }

    #[tokio::test]
    async fn missing_baseline_is_skipped_quietly() {
        let store = MemoryPriceStore::new();
        store.append(PricePoint::new("ethereum", 103.0, 4000)).await.unwrap();

        let outcome = check_price_change(&store, "ethereum", 4000, 3600, 3.0)
            .await
            .unwrap();
        assert_eq!(outcome, None);
    }

    #[tokio::test]
    async fn zero_priced_baseline_is_skipped_quietly() {
        let store = MemoryPriceStore::new();
        store.append(PricePoint::new("ethereum", 0.0, 100)).await.unwrap();
        store.append(PricePoint::new("ethereum", 103.0, 4000)).await.unwrap();

        let outcome = check_price_change(&store, "ethereum", 4000, 3600, 3.0)
            .await
            .unwrap();
        assert_eq!(outcome, None);
    }
}
