//! LINE Messaging API adapter

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::application::errors::BotError;
use crate::domain::entities::{Content, Message as BotMessage, User};
use crate::domain::traits::{Bot, BotInfo};

/// LINE API base URL
pub const API_BASE: &str = "https://api.line.me";

/// Header carrying the webhook body signature
pub const SIGNATURE_HEADER: &str = "x-line-signature";

type HmacSha256 = Hmac<Sha256>;

/// Check `signature` (base64 HMAC-SHA256 of `body` keyed by the channel secret)
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Webhook request body. Events are kept raw so one odd event cannot
/// fail the whole batch.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackRequest {
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

impl CallbackRequest {
    pub fn parse(body: &[u8]) -> Result<Self, BotError> {
        serde_json::from_slice(body).map_err(|e| BotError::Parse(e.to_string()))
    }
}

/// Webhook event. Only message events are answered.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    Message {
        /// Absent for events received in standby mode
        #[serde(rename = "replyToken", default)]
        reply_token: Option<String>,
        #[serde(default)]
        timestamp: i64,
        source: Option<Source>,
        message: MessageContent,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text {
        id: String,
        text: String,
    },
    Sticker {
        id: String,
        #[serde(rename = "packageId")]
        package_id: String,
        #[serde(rename = "stickerId")]
        sticker_id: String,
    },
    #[serde(other)]
    Unsupported,
}

impl Event {
    pub fn from_value(value: serde_json::Value) -> Result<Self, BotError> {
        serde_json::from_value(value).map_err(|e| BotError::Parse(e.to_string()))
    }

    /// Convert to a domain message. `None` for non-message events and for
    /// messages that carry no reply token.
    pub fn into_message(self) -> Option<BotMessage> {
        let Event::Message { reply_token, timestamp, source, message } = self else {
            return None;
        };
        let Some(reply_token) = reply_token else {
            tracing::info!("Message event without reply token (standby mode?), skipping");
            return None;
        };

        let sender = source.and_then(|s| s.user_id.map(|id| User::new(id).with_source(s.kind)));
        let mut msg = match message {
            MessageContent::Text { id, text } => BotMessage::from_text(reply_token, text).with_id(id),
            MessageContent::Sticker { id, package_id, sticker_id } => {
                BotMessage::from_sticker(reply_token, package_id, sticker_id).with_id(id)
            }
            MessageContent::Unsupported => {
                BotMessage::new(reply_token, Content::Unsupported("other".to_string()))
            }
        }
        .with_platform("line")
        .with_sender_opt(sender);
        if timestamp > 0 {
            if let Some(ts) = Utc.timestamp_millis_opt(timestamp).single() {
                msg = msg.with_timestamp(ts);
            }
        }
        Some(msg)
    }
}

/// LINE bot adapter
pub struct LineAdapter {
    token: String,
    api_base: String,
    client: Client,
    info: BotInfo,
}

impl LineAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: API_BASE.to_string(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "drink-bot".to_string(),
                username: "drink_bot".to_string(),
            },
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API URL for a path
    fn api_url(&self, path: &str) -> String {
        format!("{}/v2/bot/{}", self.api_base, path)
    }

    /// Fetch bot info; also validates the access token
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct BotInfoResponse {
            user_id: String,
            basic_id: String,
            display_name: String,
        }

        let url = self.api_url("info");
        let response = self.client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(BotError::Auth(format!("LINE rejected the channel token: {}", status)));
        }
        if !status.is_success() {
            return Err(BotError::Network(format!("LINE API error: {}", status)));
        }

        let data: BotInfoResponse = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        self.info = BotInfo {
            id: data.user_id,
            name: data.display_name,
            username: data.basic_id,
        };

        Ok(())
    }

    /// Send one text message addressed by a reply token
    pub async fn reply_message(&self, reply_token: &str, text: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ReplyMessageRequest<'a> {
            reply_token: &'a str,
            messages: Vec<TextMessage<'a>>,
        }

        #[derive(Serialize)]
        struct TextMessage<'a> {
            #[serde(rename = "type")]
            kind: &'static str,
            text: &'a str,
        }

        let url = self.api_url("message/reply");
        let request = ReplyMessageRequest {
            reply_token,
            messages: vec![TextMessage { kind: "text", text }],
        };

        let response = self.client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!("LINE API error: {} {}", status, error)));
        }

        Ok(())
    }
}

#[async_trait]
impl Bot for LineAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting LINE bot (token: {}...)", &self.token[..8.min(self.token.len())]);
        Ok(())
    }

    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), BotError> {
        tracing::debug!("Replying to {}: {}", reply_token, text);
        self.reply_message(reply_token, text).await
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
