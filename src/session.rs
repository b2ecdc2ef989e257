use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::storage::{Storage, UnionStorage};
use crate::types::token::{TokenData, UserData};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const TOKEN_EXPIRY_KEY: &str = "token_expiry";
pub const USER_DATA_KEY: &str = "user_data";

const ALL_KEYS: [&str; 4] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    TOKEN_EXPIRY_KEY,
    USER_DATA_KEY,
];

pub type TokensClearedCallback = Arc<dyn Fn() + Send + Sync>;

/// Persisted credentials of the signed-in user.
///
/// The token pair and its expiry live under three separate keys. They are written one
/// after another, so a crash in between can leave them out of sync; a partial set reads
/// back as "no session".
pub struct Session {
    storage: UnionStorage,
    on_cleared: RwLock<Option<TokensClearedCallback>>,
}

impl Session {
    pub fn new(storage: UnionStorage) -> Self {
        Self {
            storage,
            on_cleared: RwLock::new(None),
        }
    }

    /// Register the hook fired after [`Session::clear_all_tokens`]. This is how the
    /// auth layer learns about a logout forced from inside the request pipeline.
    /// A later registration replaces the earlier one.
    pub fn set_tokens_cleared_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        match self.on_cleared.write() {
            Ok(mut slot) => *slot = Some(Arc::new(callback)),
            Err(_) => warn!("Tokens cleared callback lock poisoned, callback not registered"),
        }
    }

    pub fn save_tokens(&self, data: &TokenData) -> Result<()> {
        self.storage
            .set(ACCESS_TOKEN_KEY, &data.token)
            .context("save access token")?;
        self.storage
            .set(REFRESH_TOKEN_KEY, &data.refresh_token)
            .context("save refresh token")?;
        self.storage
            .set(TOKEN_EXPIRY_KEY, &data.expires_at.to_string())
            .context("save token expiry")?;
        Ok(())
    }

    pub fn get_tokens(&self) -> Result<Option<TokenData>> {
        let token = self.storage.get(ACCESS_TOKEN_KEY)?;
        let refresh_token = self.storage.get(REFRESH_TOKEN_KEY)?;
        let expiry = self.storage.get(TOKEN_EXPIRY_KEY)?;

        // A missing refresh token still reads back, so that callers can tell "no
        // session" apart from "session that cannot be renewed".
        let (token, expiry) = match (token, expiry) {
            (Some(token), Some(expiry)) if !token.is_empty() => (token, expiry),
            _ => return Ok(None),
        };
        let refresh_token = refresh_token.unwrap_or_default();

        let expires_at = match expiry.trim().parse::<u64>() {
            Ok(expires_at) => expires_at,
            Err(_) => {
                warn!("Stored token expiry '{expiry}' is invalid, ignoring stored session");
                return Ok(None);
            }
        };

        Ok(Some(TokenData {
            token,
            refresh_token,
            expires_at,
        }))
    }

    pub fn save_user_data(&self, user: &UserData) -> Result<()> {
        let json = serde_json::to_string(user).context("encode user data")?;
        self.storage
            .set(USER_DATA_KEY, &json)
            .context("save user data")
    }

    pub fn get_user_data(&self) -> Result<Option<UserData>> {
        let json = match self.storage.get(USER_DATA_KEY)? {
            Some(json) => json,
            None => return Ok(None),
        };
        match serde_json::from_str(&json) {
            Ok(user) => Ok(Some(user)),
            Err(_) => {
                warn!("Stored user data is invalid, ignoring it");
                Ok(None)
            }
        }
    }

    /// Remove every stored credential and notify the registered callback. Failing to
    /// delete a key is logged, never returned, so that logout cannot get stuck.
    pub fn clear_all_tokens(&self) {
        for key in ALL_KEYS {
            if let Err(err) = self.storage.delete(key) {
                warn!("Failed to delete '{key}' from storage: {err:#}");
            }
        }
        info!("Local session cleared");

        let callback = match self.on_cleared.read() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        if let Some(callback) = callback {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::storage::MemoryStorage;

    use super::*;

    fn new_session() -> Session {
        Session::new(UnionStorage::Memory(MemoryStorage::new()))
    }

    fn sample_tokens() -> TokenData {
        TokenData {
            token: String::from("a.b.c"),
            refresh_token: String::from("6f1c2b9e-opaque"),
            expires_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_save_get_tokens() {
        let session = new_session();
        assert!(session.get_tokens().unwrap().is_none());

        session.save_tokens(&sample_tokens()).unwrap();
        assert_eq!(session.get_tokens().unwrap(), Some(sample_tokens()));
    }

    #[test]
    fn test_partial_tokens() {
        let session = new_session();
        session.save_tokens(&sample_tokens()).unwrap();
        session.storage.delete(TOKEN_EXPIRY_KEY).unwrap();
        assert!(session.get_tokens().unwrap().is_none());

        session.save_tokens(&sample_tokens()).unwrap();
        session.storage.set(TOKEN_EXPIRY_KEY, "soon").unwrap();
        assert!(session.get_tokens().unwrap().is_none());

        session.save_tokens(&sample_tokens()).unwrap();
        session.storage.delete(REFRESH_TOKEN_KEY).unwrap();
        let tokens = session.get_tokens().unwrap().unwrap();
        assert_eq!(tokens.token, "a.b.c");
        assert!(tokens.refresh_token.is_empty());
    }

    #[test]
    fn test_user_data() {
        let session = new_session();
        assert!(session.get_user_data().unwrap().is_none());

        let user = UserData {
            id: String::from("42"),
            email: String::from("ana@example.com"),
            name: String::new(),
        };
        session.save_user_data(&user).unwrap();
        assert_eq!(session.get_user_data().unwrap(), Some(user));

        session.storage.set(USER_DATA_KEY, "{broken").unwrap();
        assert!(session.get_user_data().unwrap().is_none());
    }

    #[test]
    fn test_clear_all_tokens() {
        let session = new_session();
        let count = Arc::new(AtomicUsize::new(0));
        let count_cb = count.clone();
        session.set_tokens_cleared_callback(move || {
            count_cb.fetch_add(1, Ordering::SeqCst);
        });

        session.save_tokens(&sample_tokens()).unwrap();
        session
            .save_user_data(&UserData {
                id: String::from("1"),
                email: String::new(),
                name: String::new(),
            })
            .unwrap();

        session.clear_all_tokens();
        assert!(session.get_tokens().unwrap().is_none());
        assert!(session.get_user_data().unwrap().is_none());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        session.clear_all_tokens();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clear_without_callback() {
        let session = new_session();
        session.save_tokens(&sample_tokens()).unwrap();
        session.clear_all_tokens();
        assert!(session.get_tokens().unwrap().is_none());
    }
}
