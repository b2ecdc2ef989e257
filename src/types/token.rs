use serde::{Deserialize, Serialize};

/// Credentials kept in storage. `expires_at` is in unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub token: String,
    pub refresh_token: String,
    pub expires_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body returned by login, register and refresh. Register only fills `message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub refresh_token: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

pub type LogoutRequest = RefreshTokenRequest;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub message: String,
}

impl AuthResponse {
    /// Both tokens, when the server returned a complete pair.
    pub fn token_pair(&self) -> Option<(&str, &str)> {
        match (self.token.as_deref(), self.refresh_token.as_deref()) {
            (Some(token), Some(refresh)) if !token.is_empty() && !refresh.is_empty() => {
                Some((token, refresh))
            }
            _ => None,
        }
    }
}
