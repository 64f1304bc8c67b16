//! Socket Mode event listener
//!
//! Receives `message` push events over Slack's Socket Mode websocket and hands
//! them to the [`CommandDispatcher`]. The dispatcher spawns its own tasks, so
//! the callback returns as soon as the event has been classified.

use slack_morphism::hyper_tokio::SlackHyperClient;
use slack_morphism::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::models::{ChatEvent, EventKind};
use crate::errors::BotError;
use crate::worker::CommandDispatcher;

/// Undo the escaping Slack applies to `&`, `<` and `>` in message text.
#[must_use]
pub fn unescape_message_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Build a [`ChatEvent`] from the parts of a Slack message event.
///
/// Returns `None` when there is no channel to reply into. Messages with a
/// subtype (edits, joins, deletions) or posted by bots are marked
/// [`EventKind::Other`], as are messages with no text. The body is unescaped
/// with [`unescape_message_text`].
#[must_use]
pub fn build_chat_event(
    user: Option<&str>,
    channel: Option<&str>,
    text: Option<&str>,
    has_subtype: bool,
    from_bot: bool,
) -> Option<ChatEvent> {
    let room = channel?;
    let kind = if has_subtype || from_bot || text.is_none() {
        EventKind::Other
    } else {
        EventKind::Text
    };

    Some(ChatEvent {
        sender: user.unwrap_or_default().to_string(),
        room: room.to_string(),
        body: unescape_message_text(text.unwrap_or_default()),
        kind,
    })
}

fn chat_event_from_message(msg: &SlackMessageEvent) -> Option<ChatEvent> {
    build_chat_event(
        msg.sender.user.as_ref().map(|u| u.0.as_str()),
        msg.origin.channel.as_ref().map(|c| c.0.as_str()),
        msg.content.as_ref().and_then(|c| c.text.as_deref()),
        msg.subtype.is_some(),
        msg.sender.bot_id.is_some(),
    )
}

async fn on_push_event(
    event: SlackPushEventCallback,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let SlackEventCallbackBody::Message(msg) = &event.event else {
        debug!("Ignoring non-message push event");
        return Ok(());
    };

    let dispatcher = {
        let states = states.read().await;
        states.get_user_state::<Arc<CommandDispatcher>>().cloned()
    };

    match (dispatcher, chat_event_from_message(msg)) {
        (Some(dispatcher), Some(chat_event)) => {
            dispatcher.on_event(chat_event);
        }
        (None, _) => warn!("Push event received before dispatcher was registered"),
        (_, None) => debug!("Ignoring message event without a channel"),
    }

    Ok(())
}

fn on_listener_error(
    err: Box<dyn std::error::Error + Send + Sync>,
    _client: Arc<SlackHyperClient>,
    _states: SlackClientEventsUserState,
) -> HttpStatusCode {
    warn!("Socket Mode listener error: {}", err);
    HttpStatusCode::OK
}

/// Connect with the app-level token and deliver events until ctrl-c.
///
/// # Errors
///
/// Returns `ApiError` if the Socket Mode connection cannot be opened.
pub async fn run_socket_mode(
    client: Arc<SlackHyperClient>,
    app_token: &str,
    dispatcher: Arc<CommandDispatcher>,
) -> Result<(), BotError> {
    let callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(on_push_event);

    let environment = Arc::new(
        SlackClientEventsListenerEnvironment::new(client)
            .with_error_handler(on_listener_error)
            .with_user_state(dispatcher),
    );

    let listener = SlackClientSocketModeListener::new(
        &SlackClientSocketModeConfig::new(),
        environment,
        callbacks,
    );

    let token = SlackApiToken::new(SlackApiTokenValue::new(app_token.to_string()));
    listener
        .listen_for(&token)
        .await
        .map_err(|e| BotError::ApiError(format!("Socket Mode connection failed: {e}")))?;

    info!("Listening for Slack events");
    listener.serve().await;
    info!("Socket Mode listener stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_user_message_is_text() {
        let event = build_chat_event(Some("U1"), Some("C1"), Some("!wiki rust"), false, false)
            .unwrap();
        assert_eq!(event.kind, EventKind::Text);
        assert_eq!(event.sender, "U1");
        assert_eq!(event.room, "C1");
        assert_eq!(event.body, "!wiki rust");
    }

    #[test]
    fn test_subtype_and_bot_messages_are_other() {
        let edited =
            build_chat_event(Some("U1"), Some("C1"), Some("!wiki rust"), true, false).unwrap();
        assert_eq!(edited.kind, EventKind::Other);

        let bot = build_chat_event(None, Some("C1"), Some("!wiki rust"), false, true).unwrap();
        assert_eq!(bot.kind, EventKind::Other);

        let empty = build_chat_event(Some("U1"), Some("C1"), None, false, false).unwrap();
        assert_eq!(empty.kind, EventKind::Other);
    }

    #[test]
    fn test_escaped_entities_are_decoded() {
        let event = build_chat_event(
            Some("U1"),
            Some("C1"),
            Some("!wiki AT&amp;T &lt;b&gt; &amp;lt;"),
            false,
            false,
        )
        .unwrap();
        assert_eq!(event.body, "!wiki AT&T <b> &lt;");
    }

    #[test]
    fn test_message_without_channel_is_dropped() {
        assert!(build_chat_event(Some("U1"), None, Some("!wiki rust"), false, false).is_none());
    }
}
