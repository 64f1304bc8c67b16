#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wikisum::ai::{Summarizer, TextGenerator};
use wikisum::cache::SummaryStore;
use wikisum::errors::BotError;
use wikisum::slack::ReplyChannel;
use wikisum::wiki::ArticleSource;
use wikisum::worker::{CommandDispatcher, Pipeline};

pub const BOT_ID: &str = "UBOT";
pub const TRIGGER: &str = "!wiki";
pub const SYSTEM_PROMPT: &str = "Summarize the article.";
pub const MODEL: &str = "test-model";

/// In-memory article provider with call counters.
#[derive(Default)]
pub struct FakeWiki {
    titles: HashMap<String, String>,
    contents: HashMap<String, String>,
    pub search_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    fetch_delay: Option<Duration>,
}

impl FakeWiki {
    pub fn new() -> Self {
        Self::default()
    }

    /// `query` resolves to `title`; `content` is the article text, if any.
    pub fn with_article(mut self, query: &str, title: &str, content: Option<&str>) -> Self {
        self.titles.insert(query.to_string(), title.to_string());
        if let Some(content) = content {
            self.contents.insert(title.to_string(), content.to_string());
        }
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleSource for FakeWiki {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<String>, BotError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(limit, 1, "resolver must ask for a single candidate");
        Ok(self.titles.get(query).cloned().into_iter().collect())
    }

    async fn fetch_content(&self, title: &str) -> Result<String, BotError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.contents
            .get(title)
            .cloned()
            .ok_or_else(|| BotError::FetchError(format!("Page '{title}' does not exist")))
    }
}

/// Generator returning a canned summary per article body.
#[derive(Default)]
pub struct FakeGenerator {
    summaries: HashMap<String, String>,
    fail: bool,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<(String, String, String)>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, content: &str, summary: &str) -> Self {
        self.summaries
            .insert(content.to_string(), summary.to_string());
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn complete(
        &self,
        system_prompt: &str,
        user_content: &str,
        model: &str,
    ) -> Result<String, BotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push((
            system_prompt.to_string(),
            user_content.to_string(),
            model.to_string(),
        ));
        if self.fail {
            return Err(BotError::GenerationError("no response from OpenAI".to_string()));
        }
        Ok(self
            .summaries
            .get(user_content)
            .cloned()
            .unwrap_or_else(|| format!("Summary of: {user_content}")))
    }
}

/// Records every reply instead of sending it.
#[derive(Default)]
pub struct RecordingReplies {
    pub sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingReplies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn replies(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyChannel for RecordingReplies {
    async fn send_text(&self, room: &str, text: &str) -> Result<(), BotError> {
        self.sent
            .lock()
            .unwrap()
            .push((room.to_string(), text.to_string()));
        if self.fail {
            return Err(BotError::ApiError("channel_not_found".to_string()));
        }
        Ok(())
    }
}

pub struct Harness {
    pub wiki: Arc<FakeWiki>,
    pub generator: Arc<FakeGenerator>,
    pub replies: Arc<RecordingReplies>,
    pub store: Arc<SummaryStore>,
    pub pipeline: Pipeline,
    pub dispatcher: CommandDispatcher,
}

pub async fn harness(
    root: &Path,
    wiki: FakeWiki,
    generator: FakeGenerator,
    replies: RecordingReplies,
) -> Harness {
    let wiki = Arc::new(wiki);
    let generator = Arc::new(generator);
    let replies = Arc::new(replies);
    let store = Arc::new(SummaryStore::open(root).await.unwrap());

    let summarizer = Summarizer::new(
        generator.clone(),
        SYSTEM_PROMPT.to_string(),
        MODEL.to_string(),
    );
    let pipeline = Pipeline::new(wiki.clone(), summarizer, store.clone());
    let dispatcher =
        CommandDispatcher::new(pipeline.clone(), replies.clone(), TRIGGER, BOT_ID.to_string());

    Harness {
        wiki,
        generator,
        replies,
        store,
        pipeline,
        dispatcher,
    }
}
