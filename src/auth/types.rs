//! Request and response bodies of the auth endpoints

use serde::{Deserialize, Serialize};

use crate::wire::id_from_str_or_number;

/// Sign-up request
#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

/// Login request
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Logout request
#[derive(Debug, Clone, Serialize)]
pub struct LogoutRequest {
    pub email: String,
}

/// Public profile of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "id_from_str_or_number")]
    pub id: i64,

    #[serde(default)]
    pub email: String,

    /// Display name
    #[serde(default)]
    pub nickname: String,
}

/// Payload of a successful login
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: Option<String>,

    pub user: UserProfile,
}

/// Payload of a successful token refresh
///
/// The backend may omit the refresh token, in which case the previous one
/// stays valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: Option<String>,
}
