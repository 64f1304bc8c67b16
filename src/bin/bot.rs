use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};
use wikisum::ai::{LlmClient, Summarizer};
use wikisum::cache::SummaryStore;
use wikisum::core::config::AppConfig;
use wikisum::slack::{SlackClient, run_socket_mode};
use wikisum::wiki::WikiClient;
use wikisum::worker::{CommandDispatcher, Pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    wikisum::setup_logging();

    let config = AppConfig::load()
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;
    info!(
        trigger = %config.trigger,
        output_dir = %config.output_dir.display(),
        model = %config.openai_model,
        "Configuration loaded"
    );

    let store = Arc::new(
        SummaryStore::open(&config.output_dir)
            .await
            .context("Failed to prepare summary cache")?,
    );

    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_org_id.clone(),
        config.openai_base_url.clone(),
    )?;
    let summarizer = Summarizer::new(
        Arc::new(llm),
        config.system_prompt.clone(),
        config.openai_model.clone(),
    );
    let wiki = Arc::new(WikiClient::new(config.wiki_api_url.clone())?);
    let pipeline = Pipeline::new(wiki, summarizer, store);

    let slack = Arc::new(SlackClient::new(config.slack_bot_token.clone())?);
    let bot_user_id = slack
        .get_bot_user_id()
        .await
        .context("Failed to resolve bot identity")?;

    let dispatcher = Arc::new(CommandDispatcher::new(
        pipeline,
        slack.clone(),
        &config.trigger,
        bot_user_id,
    ));

    run_socket_mode(
        slack.hyper_client(),
        &config.slack_app_token,
        Arc::clone(&dispatcher),
    )
    .await
    .context("Slack connection failed")?;

    if !dispatcher
        .drain(Duration::from_secs(config.drain_timeout_secs))
        .await
    {
        warn!("Exiting with commands still in flight");
    }
    info!("Shutdown complete");

    Ok(())
}
