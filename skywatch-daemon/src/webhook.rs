//! Outbound webhook channels — Discord, Slack, Microsoft Teams.
//!
//! Fire-and-forget HTTP POST of a text message wrapped in each channel's
//! JSON envelope. Channels fail independently; a send counts as delivered
//! when at least one channel accepted it.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{info, warn};

use skywatch_core::config::IntegrationsConfig;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Discord,
    Slack,
    Teams,
}

impl ChannelKind {
    pub fn name(self) -> &'static str {
        match self {
            ChannelKind::Discord => "discord",
            ChannelKind::Slack => "slack",
            ChannelKind::Teams => "teams",
        }
    }

    /// The channel-specific JSON envelope; one field holds the message text.
    pub fn envelope(self, message: &str) -> Value {
        match self {
            ChannelKind::Discord => json!({ "content": message }),
            ChannelKind::Slack | ChannelKind::Teams => json!({ "text": message }),
        }
    }
}

#[derive(Debug, Clone)]
struct Channel {
    kind: ChannelKind,
    url: String,
}

/// Dispatches notification text to every configured channel.
pub struct WebhookSender {
    channels: Vec<Channel>,
    client: reqwest::Client,
}

impl WebhookSender {
    pub fn from_config(integrations: &IntegrationsConfig) -> reqwest::Result<Self> {
        let mut channels = Vec::new();
        for (kind, cfg) in [
            (ChannelKind::Discord, &integrations.discord),
            (ChannelKind::Slack, &integrations.slack),
            (ChannelKind::Teams, &integrations.teams),
        ] {
            if let Some(url) = cfg.url() {
                channels.push(Channel {
                    kind,
                    url: url.to_string(),
                });
            }
        }
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(WebhookSender { channels, client })
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.kind.name()).collect()
    }

    /// POST the message to every channel. True iff at least one accepted.
    pub async fn send(&self, message: &str) -> bool {
        let mut delivered = false;
        for ch in &self.channels {
            let result = self
                .client
                .post(&ch.url)
                .json(&ch.kind.envelope(message))
                .send()
                .await;
            match result {
                Ok(resp) if resp.status().is_success() => {
                    info!(channel = ch.kind.name(), "notification sent");
                    delivered = true;
                }
                Ok(resp) => {
                    warn!(channel = ch.kind.name(), status = %resp.status(), "webhook rejected");
                }
                Err(e) => {
                    warn!(channel = ch.kind.name(), error = %e, "webhook failed");
                }
            }
        }
        delivered
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use skywatch_core::config::ChannelConfig;

    #[test]
    fn test_envelope_shapes() {
        let msg = "**N12345 LANDED**";
        assert_eq!(
            ChannelKind::Discord.envelope(msg),
            json!({"content": "**N12345 LANDED**"})
        );
        assert_eq!(
            ChannelKind::Slack.envelope(msg),
            json!({"text": "**N12345 LANDED**"})
        );
        assert_eq!(
            ChannelKind::Teams.envelope(msg),
            json!({"text": "**N12345 LANDED**"})
        );
    }

    #[test]
    fn test_from_config_keeps_enabled_channels() {
        let integrations = IntegrationsConfig {
            discord: ChannelConfig {
                enabled: true,
                webhook_url: "https://example.com/d".into(),
            },
            slack: ChannelConfig {
                enabled: false,
                webhook_url: "https://example.com/s".into(),
            },
            teams: ChannelConfig {
                enabled: true,
                webhook_url: String::new(), // enabled but no URL
            },
        };
        let sender = WebhookSender::from_config(&integrations).unwrap();
        assert_eq!(sender.channel_names(), vec!["discord"]);
    }

    #[test]
    fn test_from_config_empty() {
        let sender = WebhookSender::from_config(&IntegrationsConfig::default()).unwrap();
        assert!(sender.is_empty());
    }
}
