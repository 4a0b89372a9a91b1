use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::CoreConfig;
use crate::constants::NOTIFICATIONS_PATH;
use crate::models::Notification;

use super::NotificationApi;

/// One page of notifications as served by the REST backend.
#[derive(Debug, Deserialize)]
struct NotificationPage {
    content: Vec<Notification>,
}

/// Reference REST client for the notifications API.
///
/// Plain bindings of the three endpoints the engine needs; authentication
/// and retry policy live in the `reqwest::Client` the application passes in.
pub struct HttpNotificationApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNotificationApi {
    pub fn new(config: &CoreConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Use an application-provided client (session auth headers, timeouts).
    pub fn with_client(config: &CoreConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: format!(
                "{}{}",
                config.api_base.trim_end_matches('/'),
                NOTIFICATIONS_PATH
            ),
            client,
        }
    }
}

impl NotificationApi for HttpNotificationApi {
    async fn fetch_unread_count(&self) -> Result<i64> {
        let url = format!("{}/unread-count", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch unread count")?;

        if !response.status().is_success() {
            anyhow::bail!("Unread count request failed ({})", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse unread count")
    }

    async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .context("Failed to fetch notifications")?;

        if !response.status().is_success() {
            anyhow::bail!("Notifications request failed ({})", response.status());
        }

        let page: NotificationPage = response
            .json()
            .await
            .context("Failed to parse notifications page")?;
        Ok(page.content)
    }

    async fn acknowledge_read(&self, id: &str) -> Result<()> {
        let url = format!("{}/{}/read", self.base_url, id);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to acknowledge notification")?;

        if !response.status().is_success() {
            anyhow::bail!("Acknowledgement failed ({})", response.status());
        }

        Ok(())
    }
}
