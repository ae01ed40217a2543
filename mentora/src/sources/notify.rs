//! Webhook-based notification delivery

use async_trait::async_trait;
use serde_json::json;

use super::traits::{NotificationSender, Result, SourceError};

/// Delivers notifications by POSTing JSON to a configured webhook URL.
///
/// SMTP or other delivery channels are external collaborators; this adapter
/// covers the common "hand the result to an automation endpoint" case.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier posting to the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl NotificationSender for WebhookNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let payload = json!({
            "recipient": recipient,
            "subject": subject,
            "body": body,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Unavailable(format!(
                "webhook returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
