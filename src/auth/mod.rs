//! Authentication and session management for the diary backend

mod session;
mod store;
mod types;

use reqwest::{Client, Response, StatusCode};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;

use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::fetch::{Fetch, FetchBuilder};

pub use session::*;
pub use store::*;
pub use types::*;

/// Client for the auth endpoints, owner of the current session
///
/// The session lives in memory and, when `persist_session` is on, in the
/// configured [`SessionStore`].
pub struct Auth {
    /// The base URL of the backend
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Client options
    options: ClientOptions,

    /// The current session
    session: Arc<RwLock<Option<Session>>>,

    store: Arc<dyn SessionStore>,

    /// Serializes token refreshes
    refresh_lock: Mutex<()>,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(
        url: &str,
        client: Client,
        options: ClientOptions,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            options,
            session: Arc::new(RwLock::new(None)),
            store,
            refresh_lock: Mutex::new(()),
        }
    }

    fn get_auth_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.url, path)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Load the persisted session into memory
    pub async fn restore_session(&self) -> Result<Option<Session>> {
        let restored = self.store.load().await?;
        if let Some(ref session) = restored {
            log::info!("restored session of user {}", session.user_id);
            self.replace(Some(session.clone()));
        }
        Ok(restored)
    }

    /// Register a new user
    ///
    /// Does not sign the user in.
    pub async fn sign_up(&self, email: &str, password: &str, nickname: &str) -> Result<UserProfile> {
        let url = self.get_auth_url("/user/signup");
        let body = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            nickname: nickname.to_string(),
        };

        let user = Fetch::post(&self.client, &url)
            .timeout(self.options.request_timeout)
            .json(&body)?
            .execute_envelope::<UserProfile>()
            .await?
            .require_data()?;

        log::info!("registered user {}", user.id);
        Ok(user)
    }

    /// Sign in a user with email and password
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.get_auth_url("/auth/login");
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let login = Fetch::post(&self.client, &url)
            .timeout(self.options.request_timeout)
            .json(&body)?
            .execute_envelope::<LoginResponse>()
            .await?
            .require_data()?;

        let session = Session::from_login(login);
        log::info!("signed in as user {}", session.user_id);
        self.set_session(session.clone()).await?;
        Ok(session)
    }

    /// Exchange the refresh token for a new access token
    ///
    /// Any failure discards the session and yields [`Error::SessionExpired`].
    pub async fn refresh_session(&self) -> Result<Session> {
        let current = self.require_session()?;
        let refresh_token = match current.refresh_token.as_deref() {
            Some(token) if current.can_refresh() => token.to_string(),
            _ => {
                log::warn!("no refresh token for user {}, discarding session", current.user_id);
                self.expire().await;
                return Err(Error::SessionExpired);
            }
        };

        let url = self.get_auth_url("/auth/refresh");
        let result = Fetch::post(&self.client, &url)
            .timeout(self.options.request_timeout)
            .text(&refresh_token)
            .execute_envelope::<TokenResponse>()
            .await
            .and_then(|envelope| envelope.require_data());

        match result {
            Ok(tokens) => {
                let renewed = current.with_tokens(tokens);
                log::info!("refreshed access token of user {}", renewed.user_id);
                self.set_session(renewed.clone()).await?;
                Ok(renewed)
            }
            Err(err) => {
                log::warn!("token refresh failed, discarding session: {}", err);
                self.expire().await;
                Err(Error::SessionExpired)
            }
        }
    }

    /// Sign out the current user
    ///
    /// The local session is removed even when the backend call fails; that
    /// failure is still returned.
    pub async fn sign_out(&self) -> Result<()> {
        let session = self.require_session()?;
        let url = self.get_auth_url("/auth/logout");

        let result = async {
            Fetch::post(&self.client, &url)
                .timeout(self.options.request_timeout)
                .bearer_auth(&session.access_token)
                .json(&LogoutRequest {
                    email: session.email.clone(),
                })?
                .execute_envelope::<serde_json::Value>()
                .await?
                .into_result()
                .map(|_| ())
        }
        .await;

        self.discard_session().await?;
        log::info!("signed out user {}", session.user_id);
        result
    }

    /// Get the current session
    pub fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current session, or [`Error::NotLoggedIn`]
    pub fn require_session(&self) -> Result<Session> {
        self.current_session().ok_or(Error::NotLoggedIn)
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_session().is_some()
    }

    /// Set the session, persisting it when enabled
    pub async fn set_session(&self, session: Session) -> Result<()> {
        self.replace(Some(session.clone()));
        if self.options.persist_session {
            self.store.save(&session).await?;
        }
        Ok(())
    }

    /// Forget the session in memory and in the store
    pub async fn discard_session(&self) -> Result<()> {
        self.replace(None);
        self.store.clear().await
    }

    /// The current session, refreshed first when its access token is about
    /// to expire and `auto_refresh_token` is on.
    pub async fn fresh_session(&self) -> Result<Session> {
        let session = self.require_session()?;
        if self.options.auto_refresh_token
            && session.can_refresh()
            && session.is_expired(self.options.token_leeway)
        {
            log::debug!("access token of user {} is expiring, refreshing", session.user_id);
            return self.refresh_after(&session.access_token).await;
        }
        Ok(session)
    }

    /// Send `request` with the current bearer token.
    ///
    /// A 401 or 403 answer triggers one refresh and one retry with the new
    /// token. The retried response is returned whatever its status.
    pub(crate) async fn send_authorized(&self, request: FetchBuilder<'_>) -> Result<Response> {
        let session = self.fresh_session().await?;
        let mut request = request
            .timeout(self.options.request_timeout)
            .bearer_auth(&session.access_token);

        let response = request.execute_raw().await?;
        if !is_rejection(response.status()) {
            return Ok(response);
        }

        log::info!(
            "{} {} was rejected with {}, refreshing token",
            request.method(),
            request.url(),
            response.status()
        );
        let renewed = self.refresh_after(&session.access_token).await?;
        request.set_bearer(&renewed.access_token);
        request.execute_raw().await
    }

    /// Refresh unless another task already replaced `stale_token`.
    async fn refresh_after(&self, stale_token: &str) -> Result<Session> {
        let _guard = self.refresh_lock.lock().await;
        match self.current_session() {
            Some(session) if session.access_token != stale_token => Ok(session),
            _ => self.refresh_session().await,
        }
    }

    async fn expire(&self) {
        if let Err(err) = self.discard_session().await {
            log::error!("failed to remove the stored session: {}", err);
        }
    }

    fn replace(&self, session: Option<Session>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }
}

fn is_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}
