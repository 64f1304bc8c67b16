use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_TRIGGER: &str = "!wiki";
pub const DEFAULT_OUTPUT_DIR: &str = "summaries";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes encyclopedia articles. \
    Reply with a concise plain-text summary of the article provided by the user.";
pub const DEFAULT_WIKI_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_DRAIN_TIMEOUT_SECS: u64 = 30;

/// Environment variable naming the YAML config file read by [`AppConfig::load`].
pub const CONFIG_PATH_ENV: &str = "WIKISUM_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_trigger")]
    pub trigger: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_model")]
    pub openai_model: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    pub openai_api_key: String,
    #[serde(default)]
    pub openai_org_id: Option<String>,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_wiki_api_url")]
    pub wiki_api_url: String,
    pub slack_bot_token: String,
    pub slack_app_token: String,
    #[serde(default = "default_drain_timeout_secs")]
    pub drain_timeout_secs: u64,
}

fn default_trigger() -> String {
    DEFAULT_TRIGGER.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_openai_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

fn default_wiki_api_url() -> String {
    DEFAULT_WIKI_API_URL.to_string()
}

fn default_drain_timeout_secs() -> u64 {
    DEFAULT_DRAIN_TIMEOUT_SECS
}

impl AppConfig {
    /// Load from the YAML file named by `WIKISUM_CONFIG`. Without that
    /// variable, `config.yaml` is used when it exists and the environment
    /// otherwise.
    pub fn load() -> Result<Self, String> {
        Self::load_from(env::var(CONFIG_PATH_ENV).ok().as_deref())
    }

    /// An explicit `path` must exist; only the default file may be absent.
    pub fn load_from(path: Option<&str>) -> Result<Self, String> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Self::from_env(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        Self::from_yaml(&raw).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn from_yaml(raw: &str) -> Result<Self, String> {
        let config: Self = serde_yaml::from_str(raw).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, String> {
        let config = Self {
            trigger: env::var("WIKISUM_TRIGGER").unwrap_or_else(|_| default_trigger()),
            output_dir: env::var("WIKISUM_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_output_dir()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| default_model()),
            system_prompt: env::var("WIKISUM_SYSTEM_PROMPT")
                .unwrap_or_else(|_| default_system_prompt()),
            openai_api_key: env::var("OPENAI_API_KEY")
                .map_err(|e| format!("OPENAI_API_KEY: {}", e))?,
            openai_org_id: env::var("OPENAI_ORG_ID").ok(),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| default_openai_base_url()),
            wiki_api_url: env::var("WIKISUM_WIKI_API_URL")
                .unwrap_or_else(|_| default_wiki_api_url()),
            slack_bot_token: env::var("SLACK_BOT_TOKEN")
                .map_err(|e| format!("SLACK_BOT_TOKEN: {}", e))?,
            slack_app_token: env::var("SLACK_APP_TOKEN")
                .map_err(|e| format!("SLACK_APP_TOKEN: {}", e))?,
            drain_timeout_secs: match env::var("WIKISUM_DRAIN_TIMEOUT_SECS") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|e| format!("WIKISUM_DRAIN_TIMEOUT_SECS: {}", e))?,
                Err(_) => default_drain_timeout_secs(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// The trigger must be a single non-empty word, since commands are matched
    /// as `"<trigger> "`.
    pub fn validate(&self) -> Result<(), String> {
        if self.trigger.is_empty() {
            return Err("trigger: must not be empty".to_string());
        }
        if self.trigger.chars().any(char::is_whitespace) {
            return Err(format!(
                "trigger: must not contain whitespace (got {:?})",
                self.trigger
            ));
        }
        Ok(())
    }

    /// The exact prefix a message body must start with to be treated as a command.
    #[must_use]
    pub fn command_prefix(&self) -> String {
        format!("{} ", self.trigger)
    }
}
