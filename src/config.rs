use std::env;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Default model used for summary and flowchart generation.
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.0-flash";
/// Default base URL of the generative-language service.
pub const DEFAULT_GENERATION_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default maximum chunk length, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 5000;
/// Default ceiling for uploaded request bodies (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// How per-page text is stitched together into one document string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageJoin {
    /// Pages separated by a single newline.
    #[default]
    Newline,
    /// Pages concatenated directly.
    Concat,
}

impl PageJoin {
    /// Separator inserted between consecutive pages.
    pub fn separator(self) -> &'static str {
        match self {
            Self::Newline => "\n",
            Self::Concat => "",
        }
    }
}

impl std::str::FromStr for PageJoin {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newline" => Ok(Self::Newline),
            "concat" => Ok(Self::Concat),
            _ => Err(()),
        }
    }
}

/// Runtime configuration for the pdfbrief server and CLI.
pub struct Config {
    /// API key sent to the generation service. Absence surfaces as an auth failure on first use.
    pub gemini_api_key: Option<String>,
    /// Model identifier passed to the generation service.
    pub generation_model: String,
    /// Base URL of the generation service.
    pub generation_base_url: String,
    /// Optional per-call timeout for generation requests.
    pub generation_timeout: Option<Duration>,
    /// Maximum chunk length in characters; `None` sends the whole document in one prompt.
    pub chunk_size: Option<usize>,
    /// Whether the flowchart step runs after the summary.
    pub flowchart_enabled: bool,
    /// Separator policy applied between extracted pages.
    pub page_join: PageJoin,
    /// Upper bound on the accepted request body size.
    pub max_upload_bytes: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("generation_model", &self.generation_model)
            .field("generation_base_url", &self.generation_base_url)
            .field("generation_timeout", &self.generation_timeout)
            .field("chunk_size", &self.chunk_size)
            .field("flowchart_enabled", &self.flowchart_enabled)
            .field("page_join", &self.page_join)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gemini_api_key: load_env_optional("GEMINI_API_KEY")
                .or_else(|| load_env_optional("GOOGLE_API_KEY")),
            generation_model: load_env_optional("GENERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
            generation_base_url: load_env_optional("GENERATION_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GENERATION_BASE_URL.to_string()),
            generation_timeout: load_env_optional("GENERATION_TIMEOUT_SECS")
                .map(|value| {
                    value
                        .parse::<u64>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .map(Duration::from_secs)
                        .ok_or_else(|| ConfigError::InvalidValue("GENERATION_TIMEOUT_SECS".into()))
                })
                .transpose()?,
            chunk_size: match load_env_optional("SUMMARY_CHUNK_SIZE") {
                Some(value) => parse_chunk_size(&value)?,
                None => Some(DEFAULT_CHUNK_SIZE),
            },
            flowchart_enabled: load_env_optional("FLOWCHART_ENABLED")
                .map(|value| {
                    parse_bool(&value)
                        .ok_or_else(|| ConfigError::InvalidValue("FLOWCHART_ENABLED".into()))
                })
                .transpose()?
                .unwrap_or(true),
            page_join: load_env_optional("PAGE_JOIN")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("PAGE_JOIN".into()))
                })
                .transpose()?
                .unwrap_or_default(),
            max_upload_bytes: load_env_optional("MAX_UPLOAD_BYTES")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("MAX_UPLOAD_BYTES".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

/// Parse a chunk-size setting. `off`, `none` and `disabled` turn chunking off.
pub fn parse_chunk_size(value: &str) -> Result<Option<usize>, ConfigError> {
    let normalized = value.trim().to_lowercase();
    if matches!(normalized.as_str(), "off" | "none" | "disabled") {
        return Ok(None);
    }
    match normalized.parse::<usize>() {
        Ok(size) if size > 0 => Ok(Some(size)),
        _ => Err(ConfigError::InvalidValue("SUMMARY_CHUNK_SIZE".into())),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment (and `.env`) and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; generation requests will be rejected upstream");
    }
    tracing::debug!(
        model = %config.generation_model,
        base_url = %config.generation_base_url,
        chunk_size = ?config.chunk_size,
        flowchart = config.flowchart_enabled,
        page_join = ?config.page_join,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
