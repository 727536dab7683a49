//! Persistence of the current session

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::session::Session;
use crate::error::Result;
use crate::wire::id_from_str_or_number;

/// Where the current session survives between runs
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The stored session, if any
    async fn load(&self) -> Result<Option<Session>>;

    /// Overwrite the stored session
    async fn save(&self, session: &Session) -> Result<()>;

    /// Remove the stored session
    async fn clear(&self) -> Result<()>;
}

/// Keeps the session in memory only
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `session`
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Keeps the session as a JSON file
///
/// A file that cannot be read as a session is removed and treated as absent.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn remove_file(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match decode_record(&bytes) {
            Ok(session) => {
                log::debug!("restored session of user {} from {}", session.user_id, self.path.display());
                Ok(Some(session))
            }
            Err(err) => {
                log::warn!(
                    "discarding unreadable session file {}: {}",
                    self.path.display(),
                    err
                );
                self.remove_file().await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, encode_record(session)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        log::debug!("saved session of user {} to {}", session.user_id, self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.remove_file().await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredUser {
    #[serde(deserialize_with = "id_from_str_or_number")]
    id: i64,
    #[serde(default)]
    email: String,
    #[serde(default, alias = "displayName", alias = "name")]
    nickname: String,
}

/// `{ "accessToken": .., "refreshToken": .., "user": { "id": .. } }`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestedRecord {
    #[serde(alias = "token")]
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    user: StoredUser,
}

/// `{ "id": .., "email": .., "nickname": .., "accessToken": .. }`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatRecord {
    #[serde(deserialize_with = "id_from_str_or_number")]
    id: i64,
    #[serde(default)]
    email: String,
    #[serde(default, alias = "displayName", alias = "name")]
    nickname: String,
    #[serde(alias = "token")]
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredRecord {
    Nested(NestedRecord),
    Flat(FlatRecord),
}

impl From<StoredRecord> for Session {
    fn from(record: StoredRecord) -> Self {
        match record {
            StoredRecord::Nested(record) => Session {
                user_id: record.user.id,
                display_name: record.user.nickname,
                email: record.user.email,
                access_token: record.access_token,
                refresh_token: record.refresh_token,
            },
            StoredRecord::Flat(record) => Session {
                user_id: record.id,
                display_name: record.nickname,
                email: record.email,
                access_token: record.access_token,
                refresh_token: record.refresh_token,
            },
        }
    }
}

/// Reads a stored session in either the nested or the flat user shape.
pub fn decode_record(bytes: &[u8]) -> Result<Session> {
    let record: StoredRecord = serde_json::from_slice(bytes)?;
    Ok(record.into())
}

/// Writes a session in the nested shape.
pub fn encode_record(session: &Session) -> Result<Vec<u8>> {
    let record = NestedRecord {
        access_token: session.access_token.clone(),
        refresh_token: session.refresh_token.clone(),
        user: StoredUser {
            id: session.user_id,
            email: session.email.clone(),
            nickname: session.display_name.clone(),
        },
    };
    Ok(serde_json::to_vec_pretty(&record)?)
}
