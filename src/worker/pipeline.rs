use std::sync::Arc;

use tracing::{error, info, warn};

use crate::ai::Summarizer;
use crate::cache::SummaryStore;
use crate::core::models::{Command, SummaryOrigin, SummaryResult};
use crate::errors::BotError;
use crate::slack::ReplyChannel;
use crate::wiki::{ArticleResolver, ArticleSource};

/// Resolve, check the cache, and on a miss fetch, summarize and store.
///
/// Cloning is cheap; every field is a shared handle.
#[derive(Clone)]
pub struct Pipeline {
    resolver: ArticleResolver,
    articles: Arc<dyn ArticleSource>,
    summarizer: Summarizer,
    store: Arc<SummaryStore>,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        articles: Arc<dyn ArticleSource>,
        summarizer: Summarizer,
        store: Arc<SummaryStore>,
    ) -> Self {
        Self {
            resolver: ArticleResolver::new(Arc::clone(&articles)),
            articles,
            summarizer,
            store,
        }
    }

    #[must_use]
    pub fn store(&self) -> &SummaryStore {
        &self.store
    }

    /// # Errors
    ///
    /// Returns the error of the first stage that failed. A generated summary
    /// is only returned once it has been written to the cache.
    pub async fn summarize_query(&self, query: &str) -> Result<SummaryResult, BotError> {
        let title = self.resolver.resolve(query).await?;

        // Held through the write so concurrent misses on one title generate once.
        let _gate = self.store.lock_title(&title).await;

        if self.store.has(&title).await {
            let text = self.store.read(&title).await?;
            return Ok(SummaryResult {
                title,
                text,
                origin: SummaryOrigin::Cache,
            });
        }

        let content = self
            .articles
            .fetch_content(&title)
            .await
            .map_err(|e| match e {
                BotError::FetchError(_) => e,
                other => BotError::FetchError(other.to_string()),
            })?;

        let text = self.summarizer.summarize(&content).await?;
        self.store.write(&title, &text).await?;

        Ok(SummaryResult {
            title,
            text,
            origin: SummaryOrigin::Generated,
        })
    }

    /// Run one command to completion and send exactly one reply.
    pub async fn handle_command(&self, command: &Command, replies: &dyn ReplyChannel) {
        let reply = match self.summarize_query(&command.query).await {
            Ok(result) => {
                info!(
                    correlation_id = %command.correlation_id,
                    room = %command.origin_room,
                    title = %result.title,
                    origin = ?result.origin,
                    "Summary ready"
                );
                result.text
            }
            Err(e) => {
                warn!(
                    correlation_id = %command.correlation_id,
                    room = %command.origin_room,
                    query = %command.query,
                    stage = e.stage(),
                    "Command failed: {}",
                    e
                );
                e.user_message()
            }
        };

        if let Err(e) = replies.send_text(&command.origin_room, &reply).await {
            error!(
                correlation_id = %command.correlation_id,
                room = %command.origin_room,
                "Failed to deliver reply: {}",
                e
            );
        }
    }
}
