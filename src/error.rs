//! Error handling for the Kong diary client

use std::fmt;
use thiserror::Error;

/// Unified error type for the Kong diary client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JWT errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Session file errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend rejected the request, either with an HTTP status or with
    /// a non-200 `status` inside the response envelope
    #[error("API error: {message} (Status: {status})")]
    Api { status: i32, message: String },

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not logged in")]
    NotLoggedIn,

    /// The access token could not be renewed; the session has been discarded
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Configuration error: {0}")]
    Config(String),

    /// A diary record from the backend could not be normalized
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Calendar error: {0}")]
    Calendar(#[from] kong_diary_calendar::CalendarError),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new API error
    pub fn api<T: fmt::Display>(status: i32, msg: T) -> Self {
        Error::Api {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new invalid entry error
    pub fn invalid_entry<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidEntry(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// Status code carried by an API error.
    pub fn status(&self) -> Option<i32> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| i32::from(s.as_u16())),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
