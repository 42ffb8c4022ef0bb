use serde_json::json;

use crate::core::config::WebhookConfig;
use crate::core::error::AppError;
use crate::features::submissions::models::Submission;
use crate::shared::templates::{render_new_submission_message, render_ping_message};

/// Path advertised in the ping message
const PING_PATH: &str = "/api/moderation/discord-ping";

/// Characters of the Discord reply kept in the ping report
const BODY_PREVIEW_CHARS: usize = 200;

/// Result of a webhook connectivity test
#[derive(Debug, Clone)]
pub struct PingReport {
    pub status: u16,
    pub body_preview: String,
}

/// Best-effort Discord webhook client. Without a URL every call is a no-op.
#[derive(Clone)]
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl DiscordNotifier {
    pub fn new(config: &WebhookConfig) -> Result<Self, AppError> {
        if config.discord_url.is_none() {
            return Ok(Self::disabled());
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            webhook_url: config.discord_url.clone(),
        })
    }

    /// Notifier that never sends anything
    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Announce a new submission on a detached task. Failures are only logged.
    pub fn notify_new_submission(&self, submission: &Submission) {
        let Some(url) = self.webhook_url.clone() else {
            return;
        };

        let content = match render_new_submission_message(
            submission.category,
            &submission.title,
            &submission.content,
            submission.barrio.as_deref(),
        ) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to render Discord message: {}", e);
                return;
            }
        };

        let client = self.client.clone();
        let submission_id = submission.id;
        tokio::spawn(async move {
            match post_message(&client, &url, &content).await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!("Discord notified for submission {}", submission_id);
                }
                Ok(response) => {
                    tracing::warn!(
                        "Discord webhook answered {} for submission {}",
                        response.status(),
                        submission_id
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Discord webhook failed for submission {}: {}",
                        submission_id,
                        e
                    );
                }
            }
        });
    }

    /// Send a test message and report what Discord answered
    pub async fn ping(&self) -> Result<PingReport, AppError> {
        let url = self.webhook_url.as_deref().ok_or_else(|| {
            AppError::Upstream("No hay webhook de Discord configurado".to_string())
        })?;

        let content = render_ping_message(PING_PATH)
            .map_err(|e| AppError::Internal(format!("Failed to render ping message: {}", e)))?;

        let response = post_message(&self.client, url, &content)
            .await
            .map_err(|e| AppError::Upstream(format!("No se pudo contactar a Discord: {}", e)))?;

        let status = response.status();
        let body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(BODY_PREVIEW_CHARS)
            .collect();

        if !status.is_success() {
            tracing::warn!("Discord ping answered {}: {}", status, body);
            return Err(AppError::Upstream(format!(
                "Discord respondió {}",
                status.as_u16()
            )));
        }

        Ok(PingReport {
            status: status.as_u16(),
            body_preview: body,
        })
    }
}

async fn post_message(
    client: &reqwest::Client,
    url: &str,
    content: &str,
) -> Result<reqwest::Response, reqwest::Error> {
    client
        .post(url)
        .json(&json!({ "content": content }))
        .send()
        .await
}
