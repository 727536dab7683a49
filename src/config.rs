//! Configuration options for the Kong diary client

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Backend address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Environment variable holding the backend address.
pub const ENV_BASE_URL: &str = "KONG_DIARY_URL";

/// Environment variable holding the persisted session file.
pub const ENV_SESSION_FILE: &str = "KONG_DIARY_SESSION_FILE";

/// Configuration options for the Kong diary client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Whether to refresh an expired access token before sending a request
    pub auto_refresh_token: bool,

    /// Whether to write the session to the session store
    pub persist_session: bool,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// JSON file holding the persisted session
    pub session_path: Option<PathBuf>,

    /// Whether drafts without a mood are scored before upload
    pub auto_analyze_mood: bool,

    /// How long before its `exp` claim an access token counts as expired
    pub token_leeway: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            auto_refresh_token: true,
            persist_session: true,
            request_timeout: Some(Duration::from_secs(30)),
            session_path: None,
            auto_analyze_mood: true,
            token_leeway: Duration::from_secs(30),
        }
    }
}

impl ClientOptions {
    /// Set whether to automatically refresh the token
    pub fn with_auto_refresh_token(mut self, value: bool) -> Self {
        self.auto_refresh_token = value;
        self
    }

    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the session file
    pub fn with_session_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.session_path = Some(path.into());
        self
    }

    /// Set whether drafts are scored before upload
    pub fn with_auto_analyze_mood(mut self, value: bool) -> Self {
        self.auto_analyze_mood = value;
        self
    }

    /// Set the expiry leeway
    pub fn with_token_leeway(mut self, value: Duration) -> Self {
        self.token_leeway = value;
        self
    }
}

/// Backend address plus client options.
#[derive(Debug, Clone)]
pub struct DiaryConfig {
    pub base_url: Url,
    pub options: ClientOptions,
}

impl DiaryConfig {
    /// Creates a new configuration, validating the URL.
    pub fn new(url_str: &str) -> Result<Self> {
        let base_url = Url::parse(url_str)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!("{} cannot be used as a base URL", url_str)));
        }
        Ok(Self {
            base_url,
            options: ClientOptions::default(),
        })
    }

    /// Replaces the client options
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Reads `KONG_DIARY_URL` (defaulting to the local backend) and the
    /// optional `KONG_DIARY_SESSION_FILE`.
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var(ENV_BASE_URL).unwrap_or_else(|_| {
            log::info!("{} not set, using {}", ENV_BASE_URL, DEFAULT_BASE_URL);
            DEFAULT_BASE_URL.to_string()
        });

        let mut config = Self::new(&url_str)?;
        if let Ok(path) = std::env::var(ENV_SESSION_FILE) {
            if !path.trim().is_empty() {
                config.options = config.options.with_session_path(path);
            }
        }
        Ok(config)
    }

    /// Base URL without a trailing slash, ready for `format!("{}{}", ..)`.
    pub fn base(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }
}
