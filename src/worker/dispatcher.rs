use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::pipeline::Pipeline;
use super::tracker::InFlight;
use crate::core::models::{ChatEvent, Command, EventKind};
use crate::slack::ReplyChannel;

/// Filters inbound chat events and spawns one pipeline task per command.
pub struct CommandDispatcher {
    pipeline: Pipeline,
    replies: Arc<dyn ReplyChannel>,
    prefix: String,
    self_id: String,
    in_flight: Arc<InFlight>,
    accepting: AtomicBool,
}

impl CommandDispatcher {
    /// `trigger` is the bare command word; commands must start with
    /// `"<trigger> "`. Events sent by `self_id` are always ignored.
    #[must_use]
    pub fn new(
        pipeline: Pipeline,
        replies: Arc<dyn ReplyChannel>,
        trigger: &str,
        self_id: String,
    ) -> Self {
        Self {
            pipeline,
            replies,
            prefix: format!("{trigger} "),
            self_id,
            in_flight: InFlight::new(),
            accepting: AtomicBool::new(true),
        }
    }

    /// Extract a command from `event`, or `None` if it should be ignored.
    #[must_use]
    pub fn parse_command(&self, event: &ChatEvent) -> Option<Command> {
        if event.sender == self.self_id || event.kind != EventKind::Text {
            return None;
        }

        let rest = event.body.strip_prefix(&self.prefix)?;

        Some(Command {
            correlation_id: Uuid::new_v4().to_string(),
            origin_room: event.room.clone(),
            issuer: event.sender.clone(),
            raw_text: event.body.clone(),
            query: rest.trim().to_string(),
        })
    }

    /// Spawn a task for `event` if it is a command. Never waits for the task.
    pub fn on_event(&self, event: ChatEvent) -> Option<JoinHandle<()>> {
        // Entered before reading `accepting`: a concurrent `drain` either sees
        // this event rejected or waits for its task.
        let guard = self.in_flight.enter();
        if !self.accepting.load(Ordering::SeqCst) {
            debug!(room = %event.room, "Shutting down; dropping event");
            return None;
        }

        let command = self.parse_command(&event)?;
        info!(
            correlation_id = %command.correlation_id,
            room = %command.origin_room,
            issuer = %command.issuer,
            query = %command.query,
            "Dispatching command"
        );

        let pipeline = self.pipeline.clone();
        let replies = Arc::clone(&self.replies);

        Some(tokio::spawn(async move {
            let _guard = guard;
            pipeline.handle_command(&command, replies.as_ref()).await;
        }))
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.count()
    }

    /// Stop accepting events and wait up to `timeout` for running commands.
    /// Returns `false` if commands were still running when the timeout hit.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.accepting.store(false, Ordering::SeqCst);
        let outstanding = self.in_flight.count();
        info!(outstanding, "Draining in-flight commands");

        if tokio::time::timeout(timeout, self.in_flight.wait_idle())
            .await
            .is_err()
        {
            warn!(
                outstanding = self.in_flight.count(),
                "Timed out waiting for in-flight commands"
            );
            return false;
        }
        true
    }
}
