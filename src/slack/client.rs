//! Slack API client module
//!
//! Encapsulates the Web API calls the bot needs: identity lookup and replies.

use async_trait::async_trait;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::SlackApiChatPostMessageRequest;
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackMessageContent};
use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::BotError;

/// Sends a reply back into the conversation a command came from.
#[async_trait]
pub trait ReplyChannel: Send + Sync {
    async fn send_text(&self, room: &str, text: &str) -> Result<(), BotError>;
}

/// Slack Web API client
pub struct SlackClient {
    client: Arc<SlackHyperClient>,
    token: SlackApiToken,
}

impl SlackClient {
    /// # Errors
    ///
    /// Returns `ApiError` if the HTTPS connector cannot be created.
    pub fn new(token: String) -> Result<Self, BotError> {
        let connector = SlackClientHyperConnector::new().map_err(|e| {
            BotError::ApiError(format!("Failed to create Slack HTTP connector: {e}"))
        })?;

        Ok(Self {
            client: Arc::new(SlackHyperClient::new(connector)),
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        })
    }

    /// Shared handle to the underlying HTTP client, reused by the event listener.
    #[must_use]
    pub fn hyper_client(&self) -> Arc<SlackHyperClient> {
        Arc::clone(&self.client)
    }

    /// # Errors
    ///
    /// Returns an error if `auth.test` fails.
    pub async fn get_bot_user_id(&self) -> Result<String, BotError> {
        let session = self.client.open_session(&self.token);
        let test_resp = session.auth_test().await?;

        info!(bot_user_id = %test_resp.user_id.0, "Resolved bot identity");
        Ok(test_resp.user_id.0)
    }

    /// # Errors
    ///
    /// Returns an error if `chat.postMessage` fails.
    pub async fn post_message(&self, channel_id: &str, message: &str) -> Result<(), BotError> {
        let session = self.client.open_session(&self.token);

        let post_req = SlackApiChatPostMessageRequest::new(
            SlackChannelId(channel_id.to_string()),
            SlackMessageContent::new().with_text(message.to_string()),
        );

        session.chat_post_message(&post_req).await?;
        debug!(channel_id, "Posted message");

        Ok(())
    }
}

#[async_trait]
impl ReplyChannel for SlackClient {
    async fn send_text(&self, room: &str, text: &str) -> Result<(), BotError> {
        self.post_message(room, text).await
    }
}
