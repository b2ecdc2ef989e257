use std::sync::{Arc, RwLock};

use log::{info, warn};

use crate::client::{Client, RequestError};
use crate::jwt::user_id_from_token;
use crate::types::token::{AuthResponse, LoginRequest, RegisterRequest, UserData};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<String>,
    pub authenticated: bool,
    pub user: Option<UserData>,
}

/// Signed-in state of the application, kept in sync with the stored session.
///
/// A session cleared from inside the request pipeline (failed refresh, rejected
/// refresh token) resets the state through the session's cleared callback.
pub struct Auth {
    client: Arc<Client>,
    state: Arc<RwLock<AuthState>>,
}

impl Auth {
    pub fn new(client: Arc<Client>) -> Self {
        let state = Arc::new(RwLock::new(AuthState::default()));

        let cleared = Arc::downgrade(&state);
        client.session().set_tokens_cleared_callback(move || {
            if let Some(state) = cleared.upgrade() {
                if let Ok(mut state) = state.write() {
                    *state = AuthState::default();
                }
            }
            info!("Tokens cleared, signed out");
        });

        Self { client, state }
    }

    pub fn state(&self) -> AuthState {
        match self.state.read() {
            Ok(state) => state.clone(),
            Err(_) => AuthState::default(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().authenticated
    }

    fn set_state(&self, new_state: AuthState) {
        match self.state.write() {
            Ok(mut state) => *state = new_state,
            Err(_) => warn!("Auth state lock poisoned, state not updated"),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthState, RequestError> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self.client.login(&credentials).await?;
        let token = match resp.token_pair() {
            Some((token, _)) => token.to_string(),
            None => return Err(RequestError::NoTokens),
        };

        let user = match user_id_from_token(&token) {
            Some(id) => {
                let user = UserData {
                    id,
                    email: credentials.email,
                    name: String::new(),
                };
                self.client.session().save_user_data(&user)?;
                Some(user)
            }
            None => None,
        };

        let state = AuthState {
            token: Some(token),
            authenticated: true,
            user,
        };
        self.set_state(state.clone());
        Ok(state)
    }

    /// Create an account. The server does not sign the new user in.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, RequestError> {
        let data = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self.client.register(&data).await?;
        info!("User registered");
        Ok(resp)
    }

    /// Sign out. The local state is reset even when the server call fails; that
    /// failure is only logged.
    pub async fn logout(&self) {
        if let Err(err) = self.client.logout().await {
            warn!("Logout request failed: {err}");
        }
        self.set_state(AuthState::default());
    }

    /// Renew the token pair now. Returns whether a usable pair is stored afterwards,
    /// either renewed here or by a refresh that was already in flight.
    pub async fn refresh_session(&self) -> bool {
        match self.client.refresh_session().await {
            Ok(data) => {
                let user = self.state().user;
                self.set_state(AuthState {
                    token: Some(data.token),
                    authenticated: true,
                    user,
                });
                true
            }
            Err(err) => {
                warn!("Refresh session failed: {err}");
                false
            }
        }
    }

    /// Rebuild the state from the stored session, e.g. at startup. When no user
    /// data is stored, a minimal one is derived from the token's `sub` claim.
    pub fn check_auth_status(&self) -> AuthState {
        let state = match self.load_state() {
            Ok(state) => state,
            Err(err) => {
                warn!("Check auth status failed: {err:#}");
                AuthState::default()
            }
        };
        self.set_state(state.clone());
        state
    }

    fn load_state(&self) -> anyhow::Result<AuthState> {
        if !self.client.is_authenticated() {
            return Ok(AuthState::default());
        }

        let session = self.client.session();
        let token = session.get_tokens()?.map(|tokens| tokens.token);
        let user = match session.get_user_data()? {
            Some(user) => Some(user),
            None => match token.as_deref().and_then(user_id_from_token) {
                Some(id) => {
                    let user = UserData {
                        id,
                        email: String::new(),
                        name: String::new(),
                    };
                    session.save_user_data(&user)?;
                    Some(user)
                }
                None => None,
            },
        };

        Ok(AuthState {
            token,
            authenticated: true,
            user,
        })
    }
}
