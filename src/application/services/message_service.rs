use crate::application::errors::BotError;
use crate::domain::entities::Message;
use crate::domain::traits::{Bot, Store};
use super::CommandService;

/// Service for processing messages: one inbound message, at most one reply
pub struct MessageService<B: Bot, S: Store> {
    bot: B,
    commands: CommandService<S>,
}

impl<B: Bot, S: Store> MessageService<B, S> {
    pub fn new(bot: B, commands: CommandService<S>) -> Self {
        Self { bot, commands }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn commands(&self) -> &CommandService<S> {
        &self.commands
    }

    /// Compute the reply for a message without sending it
    pub async fn process(&self, message: &Message) -> Option<String> {
        tracing::info!(
            "Processing {} message {} from {}",
            message.content.kind(),
            message.id,
            message.sender.as_ref().map(|u| u.to_string()).unwrap_or_else(|| "unknown".to_string())
        );
        self.commands.handle(&message.content).await
    }

    /// Process a message and send the reply through the bot.
    ///
    /// Unsupported content is logged and skipped. A failed send is returned
    /// to the caller, which only logs it.
    pub async fn handle(&self, message: Message) -> Result<(), BotError> {
        let Some(reply) = self.process(&message).await else {
            tracing::info!("Unsupported message content: {}", message.content.kind());
            return Ok(());
        };

        self.bot
            .reply(&message.reply_token, &reply)
            .await
            .map_err(|e| BotError::UpstreamSend(e.to_string()))?;
        tracing::info!("Sent {} reply.", message.content.kind());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::entities::{Content, DrinkRecord, Price};
    use crate::domain::traits::BotInfo;
    use crate::infrastructure::storage::MemoryStore;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Bot double that records every reply
    #[derive(Clone, Default)]
    pub(crate) struct RecordingBot {
        pub replies: Arc<Mutex<Vec<(String, String)>>>,
        pub fail: bool,
    }

    impl RecordingBot {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn replies(&self) -> Vec<(String, String)> {
            self.replies.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Bot for RecordingBot {
        async fn start(&self) -> Result<(), BotError> {
            Ok(())
        }

        async fn reply(&self, reply_token: &str, text: &str) -> Result<(), BotError> {
            if self.fail {
                return Err(BotError::Network("connection refused".to_string()));
            }
            self.replies
                .lock()
                .unwrap()
                .push((reply_token.to_string(), text.to_string()));
            Ok(())
        }

        fn bot_info(&self) -> BotInfo {
            BotInfo {
                id: "test".to_string(),
                name: "test".to_string(),
                username: "test".to_string(),
            }
        }
    }

    pub(crate) fn catalog_service() -> CommandService<MemoryStore> {
        let seed = DrinkRecord::new("Water", "NoSugar", "NoIce", Price::new(0));
        CommandService::new(MemoryStore::new(seed))
    }

    #[tokio::test]
    async fn test_reply_addressed_by_token() {
        let bot = RecordingBot::default();
        let service = MessageService::new(bot.clone(), catalog_service());

        service
            .handle(Message::from_text("token-1", "1 Tea LightSugar LightIce 30"))
            .await
            .unwrap();
        service.handle(Message::from_text("token-2", "3 Tea")).await.unwrap();

        let replies = bot.replies();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0], ("token-1".to_string(), "Added successfully".to_string()));
        assert_eq!(replies[1].0, "token-2");
        assert!(replies[1].1.starts_with("Tea LightSugar LightIce"));
    }

    #[tokio::test]
    async fn test_sticker_gets_recommendation() {
        let bot = RecordingBot::default();
        let service = MessageService::new(bot.clone(), catalog_service());
        service.commands().store().insert(DrinkRecord::new("Tea", "s", "i", Price::new(30))).await.unwrap();

        service.handle(Message::from_sticker("tok", "446", "1988")).await.unwrap();
        let replies = bot.replies();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].1.starts_with("Recommended drink:"));
    }

    #[tokio::test]
    async fn test_unsupported_content_sends_nothing() {
        let bot = RecordingBot::default();
        let service = MessageService::new(bot.clone(), catalog_service());
        service
            .handle(Message::new("tok", Content::Unsupported("image".to_string())))
            .await
            .unwrap();
        assert!(bot.replies().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_is_reported() {
        let service = MessageService::new(RecordingBot::failing(), catalog_service());
        let err = service.handle(Message::from_text("tok", "4")).await.unwrap_err();
        assert!(matches!(err, BotError::UpstreamSend(_)));
    }
}
