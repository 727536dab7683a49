//! Session management for authentication

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::types::{LoginResponse, TokenResponse, UserProfile};

/// The signed-in user together with their tokens
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// The user ID
    pub user_id: i64,

    /// The user's nickname
    pub display_name: String,

    pub email: String,

    /// Bearer token sent with every authorized request
    pub access_token: String,

    /// Token exchanged for a new access token
    pub refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

impl Session {
    /// Create a session from a successful login
    pub fn from_login(login: LoginResponse) -> Self {
        let LoginResponse {
            access_token,
            refresh_token,
            user,
        } = login;
        Self {
            user_id: user.id,
            display_name: user.nickname,
            email: user.email,
            access_token,
            refresh_token,
        }
    }

    /// The same user with renewed tokens. A missing refresh token in the
    /// response keeps the current one.
    pub fn with_tokens(&self, tokens: TokenResponse) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token.or_else(|| self.refresh_token.clone()),
            ..self.clone()
        }
    }

    pub fn user(&self) -> UserProfile {
        UserProfile {
            id: self.user_id,
            email: self.email.clone(),
            nickname: self.display_name.clone(),
        }
    }

    /// Expiry of the access token, read from its `exp` claim.
    ///
    /// The signature is not checked; the backend remains the authority on
    /// whether the token is valid. Tokens that are not JWTs have no expiry.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        match decode::<ExpiryClaims>(&self.access_token, &DecodingKey::from_secret(&[]), &validation)
        {
            Ok(data) => data
                .claims
                .exp
                .and_then(|exp| Utc.timestamp_opt(exp, 0).single()),
            Err(err) => {
                log::debug!("access token carries no readable expiry: {}", err);
                None
            }
        }
    }

    /// Check if the access token expires within `leeway`
    pub fn is_expired(&self, leeway: Duration) -> bool {
        match self.expires_at() {
            // a leeway past the end of time counts as expired
            Some(expires_at) => chrono::Duration::from_std(leeway)
                .ok()
                .and_then(|leeway| Utc::now().checked_add_signed(leeway))
                .map_or(true, |deadline| deadline >= expires_at),
            None => false,
        }
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .map(|token| !token.trim().is_empty())
            .unwrap_or(false)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
