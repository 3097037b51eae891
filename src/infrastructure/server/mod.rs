//! Webhook server

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::services::MessageService;
use crate::domain::traits::{Bot, Store};
use crate::infrastructure::adapters::line::{self, CallbackRequest, Event};

/// Shared webhook state
struct WebhookState<B: Bot, S: Store> {
    service: Arc<MessageService<B, S>>,
    channel_secret: Arc<str>,
}

impl<B: Bot, S: Store> Clone for WebhookState<B, S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            channel_secret: Arc::clone(&self.channel_secret),
        }
    }
}

/// Build the router serving the platform callback at `callback_path`
pub fn router<B, S>(
    service: Arc<MessageService<B, S>>,
    channel_secret: &str,
    callback_path: &str,
) -> Router
where
    B: Bot + 'static,
    S: Store + 'static,
{
    let state = WebhookState {
        service,
        channel_secret: Arc::from(channel_secret),
    };

    Router::new()
        .route(callback_path, post(callback::<B, S>))
        .with_state(state)
}

/// Bind and serve until the process exits
pub async fn serve(addr: SocketAddr, app: Router) -> Result<(), BotError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BotError::Network(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Listening on http://{}/", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| BotError::Internal(e.to_string()))
}

/// POST callback - verify, parse, answer every message event
async fn callback<B, S>(
    State(state): State<WebhookState<B, S>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode
where
    B: Bot + 'static,
    S: Store + 'static,
{
    tracing::info!("/callback called...");

    let signature = headers
        .get(line::SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !line::verify_signature(&state.channel_secret, &body, signature) {
        tracing::warn!("Cannot parse request: invalid signature");
        return StatusCode::BAD_REQUEST;
    }

    let request = match CallbackRequest::parse(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Cannot parse request: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    tracing::info!("Handling {} events for {}...", request.events.len(), request.destination);
    for value in request.events {
        let event = match Event::from_value(value) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Skipping malformed event: {}", e);
                continue;
            }
        };
        let Some(message) = event.into_message() else {
            tracing::info!("Unsupported event");
            continue;
        };
        if let Err(e) = state.service.handle(message).await {
            tracing::error!("{}", e);
        }
    }

    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::message_service::tests::{catalog_service, RecordingBot};
    use crate::infrastructure::adapters::line::tests::sign;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    const SECRET: &str = "channel-secret";

    fn text_event(token: &str, text: &str) -> serde_json::Value {
        serde_json::json!({
            "type": "message",
            "replyToken": token,
            "source": {"type": "user", "userId": "U1"},
            "message": {"type": "text", "id": token, "text": text}
        })
    }

    fn request(body: &str, signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/callback");
        if let Some(signature) = signature {
            builder = builder.header(line::SIGNATURE_HEADER, signature);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn app(bot: RecordingBot) -> (Router, Arc<MessageService<RecordingBot, crate::infrastructure::storage::MemoryStore>>) {
        let service = Arc::new(MessageService::new(bot, catalog_service()));
        (router(Arc::clone(&service), SECRET, "/callback"), service)
    }

    #[tokio::test]
    async fn test_events_get_one_reply_each() {
        let bot = RecordingBot::default();
        let (app, service) = app(bot.clone());

        let body = serde_json::json!({
            "destination": "U0",
            "events": [
                text_event("t1", "1 Tea LightSugar LightIce 30"),
                text_event("t2", "3 Tea"),
                {"type": "unfollow"},
                text_event("t3", "hello")
            ]
        })
        .to_string();

        let response = app
            .oneshot(request(&body, Some(sign(SECRET, body.as_bytes()))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let replies = bot.replies();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0].1, "Added successfully");
        assert!(replies[1].1.contains("LightSugar"));
        assert!(replies[2].1.starts_with("Recommended drink: Tea"));
        assert_eq!(service.commands().store().len().await, 2);
    }

    #[tokio::test]
    async fn test_odd_events_do_not_drop_the_batch() {
        let bot = RecordingBot::default();
        let (app, service) = app(bot.clone());

        let body = serde_json::json!({
            "destination": "U0",
            "events": [
                {
                    "type": "message",
                    "mode": "standby",
                    "source": {"type": "user", "userId": "U1"},
                    "message": {"type": "text", "id": "m0", "text": "1 Coffee a b 50"}
                },
                {"type": "message", "replyToken": "t-bad", "message": 5},
                text_event("t2", "1 Tea a b 30")
            ]
        })
        .to_string();

        let response = app
            .oneshot(request(&body, Some(sign(SECRET, body.as_bytes()))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let replies = bot.replies();
        assert_eq!(replies, vec![("t2".to_string(), "Added successfully".to_string())]);
        assert_eq!(service.commands().store().len().await, 2);
    }

    #[tokio::test]
    async fn test_bad_signature_rejected() {
        let bot = RecordingBot::default();
        let (app, _) = app(bot.clone());
        let body = serde_json::json!({"events": [text_event("t1", "4")]}).to_string();

        let response = app
            .clone()
            .oneshot(request(&body, Some(sign("wrong", body.as_bytes()))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(request(&body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(bot.replies().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (app, _) = app(RecordingBot::default());
        let body = "{\"events\": 5}";
        let response = app
            .oneshot(request(body, Some(sign(SECRET, body.as_bytes()))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_send_failure_still_acknowledged() {
        let (app, _) = app(RecordingBot::failing());
        let body = serde_json::json!({"events": [text_event("t1", "4")]}).to_string();
        let response = app
            .oneshot(request(&body, Some(sign(SECRET, body.as_bytes()))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_other_paths_not_found() {
        let (app, _) = app(RecordingBot::default());
        let response = app
            .oneshot(Request::builder().method("POST").uri("/other").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
