use chrono::Utc;

use crate::error::StoreError;
use crate::models::Alert;
use crate::AppState;

/// Registers a pending alert and hands back the stored record. The
/// confirmation mail is best effort: the caller gets the alert whether
/// or not delivery worked.
pub async fn create_alert(
    state: &AppState,
    asset: &str,
    target_price: f64,
    email: &str,
) -> Result<Alert, StoreError> {
    let asset = asset.to_lowercase();
    let now = Utc::now().timestamp();

    let alert = Alert::new(asset.clone(), target_price, email, now);
    state.alert_store.insert(alert.clone()).await?;

    if let Err(e) = state
        .notifier
        .notify_alert_created(&asset, target_price, email)
        .await
    {
        tracing::warn!("confirmation delivery to {} failed: {}", email, e);
    }

    Ok(alert)
}
