use super::User;
use chrono::{DateTime, Utc};

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Sticker { package_id: String, sticker_id: String },
    /// Any other message kind; carries the platform's type name
    Unsupported(String),
}

impl Content {
    pub fn kind(&self) -> &str {
        match self {
            Content::Text(_) => "text",
            Content::Sticker { .. } => "sticker",
            Content::Unsupported(kind) => kind,
        }
    }
}

/// An inbound message plus the token used to answer it
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub reply_token: String,
    pub sender: Option<User>,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
}

impl Message {
    pub fn new(reply_token: impl Into<String>, content: Content) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            reply_token: reply_token.into(),
            sender: None,
            content,
            timestamp: Utc::now(),
            platform: "unknown".to_string(),
        }
    }

    pub fn from_text(reply_token: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(reply_token, Content::Text(text.into()))
    }

    pub fn from_sticker(
        reply_token: impl Into<String>,
        package_id: impl Into<String>,
        sticker_id: impl Into<String>,
    ) -> Self {
        Self::new(
            reply_token,
            Content::Sticker {
                package_id: package_id.into(),
                sticker_id: sticker_id.into(),
            },
        )
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        if let Some(u) = user {
            self.sender = Some(u);
        }
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
