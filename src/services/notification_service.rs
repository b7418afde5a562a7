//! Workflow notifications.
//!
//! The delivery mechanics live behind a webhook relay; this service only
//! implements the "notify on event" contract: render a configured template
//! and hand the message off. Delivery failure is logged, never fatal to the
//! request that triggered it.
//!
//! ## Configuration
//!
//! ```bash
//! NOTIFY_WEBHOOK_URL=https://relay.example.org/hooks/registry
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::config::Template;

/// Outbound notification relay configuration.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub webhook_url: String,
}

impl NotificationConfig {
    /// Load configuration from environment variables. Absent configuration
    /// means notifications are disabled.
    pub fn from_env() -> Option<Self> {
        let webhook_url = std::env::var("NOTIFY_WEBHOOK_URL").ok()?;
        Some(Self { webhook_url })
    }
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    recipient: &'a str,
    subject: String,
    text: String,
}

/// Notification dispatcher.
pub struct NotificationService {
    client: Client,
    config: Option<NotificationConfig>,
}

impl NotificationService {
    pub fn new(config: Option<NotificationConfig>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    pub fn from_env() -> Self {
        Self::new(NotificationConfig::from_env())
    }

    /// Whether a sender is configured. Callers skip dispatch when false.
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Render `template` with `arg` and dispatch to `recipient`.
    pub async fn send(&self, template: &Template, recipient: &str, arg: &str) {
        let Some(config) = &self.config else {
            return;
        };
        let message = OutboundMessage {
            recipient,
            subject: render(&template.subject, arg),
            text: render(&template.text, arg),
        };
        match self.client.post(&config.webhook_url).json(&message).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!(recipient, subject = %message.subject, "Notification dispatched");
            }
            Ok(resp) => {
                tracing::warn!(recipient, status = %resp.status(), "Notification relay rejected message");
            }
            Err(e) => {
                tracing::warn!(recipient, error = %e, "Notification dispatch failed");
            }
        }
    }
}

/// Substitute the `{0}` placeholder in a template string.
fn render(template: &str, arg: &str) -> String {
    template.replace("{0}", arg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_placeholder() {
        assert_eq!(render("Service submission {0}", "alice_123"), "Service submission alice_123");
        assert_eq!(render("no placeholder", "x"), "no placeholder");
    }

    #[test]
    fn unconfigured_service_reports_not_configured() {
        let svc = NotificationService::new(None);
        assert!(!svc.is_configured());
    }
}
