//! Kong Diary Rust Client Library
//!
//! A Rust client for the Kong diary backend: sign in, write dated diary
//! entries, and browse them as month calendars tagged with moods.
//!
//! The keyword mood scorer and the calendar grid builder live in their own
//! crates and are re-exported as [`mood`] and [`calendar`].

pub mod auth;
pub mod config;
pub mod diary;
pub mod error;
pub mod fetch;
mod wire;

pub use kong_diary_calendar as calendar;
pub use kong_diary_mood as mood;

use reqwest::Client;
use std::sync::Arc;

use crate::auth::{Auth, FileSessionStore, MemorySessionStore, SessionStore};
use crate::config::DiaryConfig;
use crate::diary::DiaryClient;
use crate::error::Result;

/// The main entry point for the Kong diary client
pub struct KongDiary {
    /// Backend address and client options
    pub config: DiaryConfig,
    /// HTTP client used for requests
    pub http_client: Client,
    auth: Arc<Auth>,
    diaries: DiaryClient,
}

impl KongDiary {
    /// Create a new client for the backend at `url`
    ///
    /// # Example
    ///
    /// ```
    /// use kong_diary::KongDiary;
    ///
    /// let diary = KongDiary::new("http://localhost:8080").unwrap();
    /// assert!(!diary.auth().is_logged_in());
    /// ```
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self::with_config(DiaryConfig::new(url)?))
    }

    /// Create a client from `KONG_DIARY_URL` and `KONG_DIARY_SESSION_FILE`
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_config(DiaryConfig::from_env()?))
    }

    /// Create a client with custom configuration
    ///
    /// The session is kept in the configured session file, or in memory
    /// when there is none.
    ///
    /// # Example
    ///
    /// ```
    /// use kong_diary::{KongDiary, config::{ClientOptions, DiaryConfig}};
    ///
    /// let options = ClientOptions::default().with_auto_analyze_mood(false);
    /// let config = DiaryConfig::new("http://localhost:8080").unwrap().with_options(options);
    /// let diary = KongDiary::with_config(config);
    /// ```
    pub fn with_config(config: DiaryConfig) -> Self {
        let store: Arc<dyn SessionStore> = match &config.options.session_path {
            Some(path) => Arc::new(FileSessionStore::new(path.clone())),
            None => Arc::new(MemorySessionStore::new()),
        };
        Self::with_store(config, store)
    }

    /// Create a client persisting its session in `store`
    pub fn with_store(config: DiaryConfig, store: Arc<dyn SessionStore>) -> Self {
        let http_client = Client::new();
        let base = config.base();

        let auth = Arc::new(Auth::new(
            &base,
            http_client.clone(),
            config.options.clone(),
            store,
        ));
        let diaries = DiaryClient::new(
            &base,
            http_client.clone(),
            Arc::clone(&auth),
            config.options.clone(),
        );

        Self {
            config,
            http_client,
            auth,
            diaries,
        }
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// A shared handle on the auth client, seeing the same session
    pub fn auth_handle(&self) -> Arc<Auth> {
        Arc::clone(&self.auth)
    }

    /// Get a reference to the diary client
    pub fn diaries(&self) -> &DiaryClient {
        &self.diaries
    }

    pub fn config(&self) -> &DiaryConfig {
        &self.config
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{Auth, Session, SessionStore};
    pub use crate::calendar::{build_month_grid, CalendarCell, CalendarGrid, YearMonth};
    pub use crate::config::{ClientOptions, DiaryConfig};
    pub use crate::diary::{DiaryClient, DiaryDraft, DiaryEntry, MoodSummary};
    pub use crate::error::{Error, Result};
    pub use crate::mood::{score_text, EmotionLabel, MoodScore};
    pub use crate::KongDiary;
}
