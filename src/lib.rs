/// wikisum - A Slack bot that looks up Wikipedia articles and replies with a
/// ChatGPT summary.
///
/// A user posts `!wiki <search phrase>` in a channel. The bot resolves the
/// phrase to an article title, serves a cached summary if one exists, and
/// otherwise fetches the article, summarizes it, stores the summary on disk,
/// and replies in the same channel.
///
/// # Architecture
///
/// The system uses:
/// - slack-morphism Socket Mode for receiving messages and posting replies
/// - the `MediaWiki` Action API (via reqwest) for search and article text
/// - the `OpenAI` Chat Completions API for summaries
/// - a flat directory of `<title>.txt` files as the summary cache
/// - Tokio tasks, one per command
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use wikisum::ai::{LlmClient, Summarizer};
/// use wikisum::cache::SummaryStore;
/// use wikisum::core::config::AppConfig;
/// use wikisum::slack::SlackClient;
/// use wikisum::wiki::WikiClient;
/// use wikisum::worker::{CommandDispatcher, Pipeline};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     wikisum::setup_logging();
///     let config = AppConfig::load()?;
///
///     let store = Arc::new(SummaryStore::open(&config.output_dir).await?);
///     let llm = LlmClient::new(
///         config.openai_api_key.clone(),
///         config.openai_org_id.clone(),
///         config.openai_base_url.clone(),
///     )?;
///     let summarizer = Summarizer::new(
///         Arc::new(llm),
///         config.system_prompt.clone(),
///         config.openai_model.clone(),
///     );
///     let pipeline = Pipeline::new(
///         Arc::new(WikiClient::new(config.wiki_api_url.clone())?),
///         summarizer,
///         store,
///     );
///
///     let slack = Arc::new(SlackClient::new(config.slack_bot_token.clone())?);
///     let bot_id = slack.get_bot_user_id().await?;
///     let dispatcher = Arc::new(CommandDispatcher::new(
///         pipeline,
///         slack.clone(),
///         &config.trigger,
///         bot_id,
///     ));
///
///     wikisum::slack::run_socket_mode(slack.hyper_client(), &config.slack_app_token, dispatcher)
///         .await?;
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod cache;
pub mod core;
pub mod errors;
pub mod slack;
pub mod wiki;
pub mod worker;

pub use errors::BotError;

/// Configure structured logging with JSON format.
///
/// Call once at process start, before any other component logs.
///
/// # Example
///
/// ```
/// wikisum::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    // A second call (e.g. from several tests in one binary) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
