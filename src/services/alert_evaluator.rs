use crate::error::StoreError;
use crate::services::alert_store::AlertStore;
use crate::services::notifier::Notifier;

/// True when the price moved from one side of the target to the other
/// (or landed on it) between the two reference points.
pub fn crosses_target(previous: f64, current: f64, target: f64) -> bool {
    (previous < target && current >= target) || (previous > target && current <= target)
}

/// Runs every pending alert for the asset against the current price.
/// An alert that fires is notified first and committed second, so a crash
/// between the two can at worst repeat a notification, never lose the
/// triggered record silently. A delivery failure does not block the
/// commit. A commit failure is logged, the pass continues, and the first
/// such error is returned once the pass is done.
///
/// Returns the number of alerts this pass transitioned to triggered.
pub async fn evaluate_alerts(
    alerts: &dyn AlertStore,
    notifier: &dyn Notifier,
    asset: &str,
    current_price: f64,
    epsilon_pct: f64,
    now: i64,
) -> Result<usize, StoreError> {
    let pending = alerts.pending_for_asset(asset).await?;

    // Approximation of the price just before this sample; no paired
    // historical sample is looked up here.
    let previous = current_price * (1.0 - epsilon_pct / 100.0);

    let mut fired = 0usize;
    let mut first_commit_error: Option<StoreError> = None;

    for alert in pending {
        if !crosses_target(previous, current_price, alert.target_price) {
            continue;
        }

        if let Err(e) = notifier
            .notify_target_hit(asset, current_price, &alert.email)
            .await
        {
            tracing::warn!("target-hit delivery to {} failed: {}", alert.email, e);
        }

        match alerts.mark_triggered(alert.id, now).await {
            Ok(true) => fired += 1,
            Ok(false) => {
                tracing::warn!("alert {} already triggered by another pass", alert.id);
            }
            Err(e) => {
                tracing::error!("could not commit triggered flag for alert {}: {}", alert.id, e);
                if first_commit_error.is_none() {
                    first_commit_error = Some(e);
                }
            }
        }
    }

    match first_commit_error {
        Some(e) => Err(e),
        None => Ok(fired),
    }
}
