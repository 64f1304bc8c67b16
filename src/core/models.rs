/// Kind of inbound chat event as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A plain user-authored text message.
    Text,
    /// Anything else: edits, joins, bot posts, file shares.
    Other,
}

/// An inbound chat event, already stripped of transport-specific framing.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    pub sender: String,
    pub room: String,
    pub body: String,
    pub kind: EventKind,
}

impl ChatEvent {
    #[must_use]
    pub fn text(sender: &str, room: &str, body: &str) -> Self {
        Self {
            sender: sender.to_string(),
            room: room.to_string(),
            body: body.to_string(),
            kind: EventKind::Text,
        }
    }
}

/// A matched command, owned by the task that processes it.
#[derive(Debug, Clone)]
pub struct Command {
    pub correlation_id: String,
    pub origin_room: String,
    pub issuer: String,
    pub raw_text: String,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryOrigin {
    Cache,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub title: String,
    pub text: String,
    pub origin: SummaryOrigin,
}
