use std::sync::Arc;

use tracing::{debug, info};

use super::client::ArticleSource;
use crate::errors::BotError;

/// Maps a free-text query to the canonical title of its best-matching article.
#[derive(Clone)]
pub struct ArticleResolver {
    source: Arc<dyn ArticleSource>,
}

impl ArticleResolver {
    #[must_use]
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self { source }
    }

    /// Resolve `query` to the first search candidate.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError` for an empty query, when the search provider
    /// fails, or when it returns no candidates.
    pub async fn resolve(&self, query: &str) -> Result<String, BotError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Rejecting empty query without searching");
            return Err(BotError::ResolutionError(
                "no search term was given".to_string(),
            ));
        }

        let title = self
            .source
            .search(query, 1)
            .await
            .map_err(|e| match e {
                BotError::ResolutionError(_) => e,
                other => BotError::ResolutionError(other.to_string()),
            })?
            .into_iter()
            .next()
            .ok_or_else(|| BotError::ResolutionError(format!("no results for '{query}'")))?;

        info!(query, title = %title, "Resolved query");
        Ok(title)
    }
}
