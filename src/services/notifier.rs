use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::NotifyError;

/// Delivery side of the alerting pipeline. Failures are reported to the
/// caller but never retried here.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short-horizon movement notice, sent to the operator address.
    async fn notify_volatility(&self, asset: &str, percentage_change: f64)
        -> Result<(), NotifyError>;

    /// Target-price notice, sent to the alert owner.
    async fn notify_target_hit(&self, asset: &str, price: f64, email: &str)
        -> Result<(), NotifyError>;

    /// Confirmation that an alert was registered.
    async fn notify_alert_created(
        &self,
        asset: &str,
        target_price: f64,
        email: &str,
    ) -> Result<(), NotifyError>;
}

#[derive(Serialize)]
struct EmailMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Sends mail through an HTTP email API.
#[derive(Clone)]
pub struct EmailNotifier {
    http: Client,
    api_url: String,
    api_key: String,
    from: String,
    alert_email: String,
}

impl EmailNotifier {
    pub fn new(api_url: String, api_key: String, from: String, alert_email: String) -> Self {
        Self {
            http: Client::new(),
            api_url,
            api_key,
            from,
            alert_email,
        }
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/send", self.api_url.trim_end_matches('/'));
        let message = EmailMessage {
            from: &self.from,
            to,
            subject,
            text,
        };

        let mut req = self.http.post(&url).json(&message);

        if self.has_key() {
            req = req.bearer_auth(&self.api_key);
        }

        let res = req
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(NotifyError::Delivery(format!(
                "email send failed: {status} {body}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify_volatility(
        &self,
        asset: &str,
        percentage_change: f64,
    ) -> Result<(), NotifyError> {
        self.send(
            &self.alert_email,
            &format!("{asset} Price Change Alert"),
            &format!("{asset} price has changed by {percentage_change}% in the last hour"),
        )
        .await
    }

    async fn notify_target_hit(
        &self,
        asset: &str,
        price: f64,
        email: &str,
    ) -> Result<(), NotifyError> {
        self.send(
            email,
            &format!("Price Alert for {asset}"),
            &format!("The price of {asset} has reached {price}"),
        )
        .await
    }

    async fn notify_alert_created(
        &self,
        asset: &str,
        target_price: f64,
        email: &str,
    ) -> Result<(), NotifyError> {
        self.send(
            email,
            &format!("Price Alert Confirmation for {asset}"),
            &format!("You will be notified at this address when {asset} reaches {target_price}"),
        )
        .await
    }
}

/// Fallback sink for runs without an email API configured. Writes each
/// notification to the log and always succeeds.
#[derive(Default, Clone)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_volatility(
        &self,
        asset: &str,
        percentage_change: f64,
    ) -> Result<(), NotifyError> {
        tracing::info!("volatility notice: {} moved {:.2}% over the window", asset, percentage_change);
        Ok(())
    }

    async fn notify_target_hit(
        &self,
        asset: &str,
        price: f64,
        email: &str,
    ) -> Result<(), NotifyError> {
        tracing::info!("target notice for {}: {} reached {}", email, asset, price);
        Ok(())
    }

    async fn notify_alert_created(
        &self,
        asset: &str,
        target_price: f64,
        email: &str,
    ) -> Result<(), NotifyError> {
        tracing::info!("alert registered for {}: {} at {}", email, asset, target_price);
        Ok(())
    }
}
