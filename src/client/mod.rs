pub mod config;
pub mod error;
pub mod factory;
pub mod resources;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::jwt::{expires_at_millis, is_token_expired, DEFAULT_EXPIRY_BUFFER_SECS};
use crate::session::Session;
use crate::time::{current_millis, format_millis};
use crate::types::response::{ErrorPayload, MIME_JSON};
use crate::types::token::{
    AuthResponse, LoginRequest, LogoutRequest, LogoutResponse, RefreshTokenRequest,
    RegisterRequest, TokenData,
};

pub use error::RequestError;

pub const LOGIN_PATH: &str = "/auth/users/login";
pub const REGISTER_PATH: &str = "/auth/users/register";
pub const REFRESH_PATH: &str = "/auth/users/refresh";
pub const LOGOUT_PATH: &str = "/auth/users/logout";

/// Used as expiry when the access token carries no readable `exp`.
const FALLBACK_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub refresh_buffer_secs: u64,
    pub refresh_wait: Duration,
    pub retry_delay: Duration,
    pub max_retries: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            refresh_buffer_secs: DEFAULT_EXPIRY_BUFFER_SECS,
            refresh_wait: Duration::from_secs(5),
            retry_delay: Duration::from_secs(1),
            max_retries: 1,
        }
    }
}

/// A request to the backend, relative to the client's base url.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Encode `query` as url parameters. `None` fields are left out.
    pub fn query<Q: Serialize>(mut self, query: &Q) -> Result<Self, RequestError> {
        let value = serde_json::to_value(query)
            .map_err(|e| RequestError::Client(format!("encode query failed: {e}")))?;
        let map = match value {
            Value::Object(map) => map,
            _ => return Err(RequestError::Client(String::from("query must be an object"))),
        };
        for (key, value) in map {
            let value = match value {
                Value::Null => continue,
                Value::String(s) => s,
                other => other.to_string(),
            };
            self.query.push((key, value));
        }
        Ok(self)
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, RequestError> {
        let body = serde_json::to_value(body)
            .map_err(|e| RequestError::Client(format!("encode body failed: {e}")))?;
        self.body = Some(body);
        Ok(self)
    }

    /// Auth endpoints carry credentials in the body and never get a bearer token.
    pub fn is_public(&self) -> bool {
        matches!(
            self.path.as_str(),
            LOGIN_PATH | REGISTER_PATH | REFRESH_PATH | LOGOUT_PATH
        )
    }
}

/// The shared http client of the backend api.
///
/// Every non-auth request goes through [`Client::authorize`], which attaches the
/// bearer token and renews it shortly before it expires. Renewal is single-flight:
/// concurrent requests that all find an expired token wait on one refresh instead
/// of issuing their own.
pub struct Client {
    url: String,
    client: reqwest::Client,
    session: Arc<Session>,
    refresh_lock: Mutex<()>,
    opts: ClientOptions,
}

impl Client {
    pub fn new(url: &str, session: Arc<Session>, opts: ClientOptions) -> Result<Self> {
        let url = url.trim_end_matches('/');
        let parsed = match Url::parse(url) {
            Ok(url) => url,
            Err(_) => bail!("invalid server url '{url}'"),
        };
        match parsed.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                parsed.scheme()
            ),
        }

        let client = reqwest::Client::builder()
            .timeout(opts.timeout)
            .build()
            .context("build http client")?;

        Ok(Self {
            url: url.to_string(),
            client,
            session,
            refresh_lock: Mutex::new(()),
            opts,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, RequestError> {
        let req = ApiRequest::post(LOGIN_PATH).json(credentials)?;
        let resp: AuthResponse = self.send(&req).await?;

        if let Some((token, refresh_token)) = resp.token_pair() {
            let data = Self::build_token_data(token, refresh_token);
            self.session.save_tokens(&data)?;
            info!(
                "Login success, token expires at {}",
                format_millis(data.expires_at)
            );
        } else {
            warn!("Login response did not contain a token pair, nothing saved");
        }
        Ok(resp)
    }

    pub async fn register(&self, data: &RegisterRequest) -> Result<AuthResponse, RequestError> {
        let req = ApiRequest::post(REGISTER_PATH).json(data)?;
        let resp: Option<AuthResponse> = self.send(&req).await?;
        Ok(resp.unwrap_or_default())
    }

    /// Exchange `refresh_token` for a new token pair and persist it, without taking
    /// the refresh lock. A 401 from the server also clears the stored session, see
    /// [`Client::execute`].
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenData, RequestError> {
        let req = ApiRequest::post(REFRESH_PATH).json(&RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        })?;
        // The refresh endpoint is public, so skip `send` and its authorization step.
        let body = self.execute(&req, None).await?;
        let resp: Option<AuthResponse> = Self::parse_body(body)?;

        let (token, refresh_token) = match resp.as_ref().and_then(|r| r.token_pair()) {
            Some(pair) => pair,
            None => return Err(RequestError::Refresh("response has no token pair")),
        };
        let data = Self::build_token_data(token, refresh_token);
        self.session.save_tokens(&data)?;
        info!(
            "Token refreshed, expires at {}",
            format_millis(data.expires_at)
        );
        Ok(data)
    }

    /// Revoke the refresh token on the server, if there is one. The local session is
    /// cleared whatever the outcome; a server error is still returned.
    pub async fn logout(&self) -> Result<LogoutResponse, RequestError> {
        let refresh_token = match self.session.get_tokens() {
            Ok(Some(tokens)) if !tokens.refresh_token.is_empty() => Some(tokens.refresh_token),
            Ok(_) => None,
            Err(err) => {
                warn!("Read tokens for logout failed: {err:#}");
                None
            }
        };

        let result = match refresh_token {
            Some(refresh_token) => self.revoke(refresh_token).await,
            None => Ok(LogoutResponse::default()),
        };

        self.session.clear_all_tokens();
        if let Err(err) = result.as_ref() {
            warn!("Server logout failed, local session cleared anyway: {err}");
        }
        result
    }

    async fn revoke(&self, refresh_token: String) -> Result<LogoutResponse, RequestError> {
        let req = ApiRequest::post(LOGOUT_PATH).json(&LogoutRequest { refresh_token })?;
        let resp: Option<LogoutResponse> = self.send(&req).await?;
        Ok(resp.unwrap_or_default())
    }

    /// Whether a usable session is stored. An expired access token still counts when
    /// a refresh token exists; the next real request will renew it.
    pub fn is_authenticated(&self) -> bool {
        let tokens = match self.session.get_tokens() {
            Ok(Some(tokens)) => tokens,
            Ok(None) => return false,
            Err(err) => {
                warn!("Read tokens failed: {err:#}");
                return false;
            }
        };

        if !is_token_expired(&tokens.token, self.opts.refresh_buffer_secs) {
            return true;
        }
        if !tokens.refresh_token.is_empty() {
            return true;
        }

        info!("Access token expired and no refresh token stored");
        self.session.clear_all_tokens();
        false
    }

    /// Send `req` and decode the json response. An empty body decodes as `null`, so
    /// `T` can be `()` or `Option<_>` for endpoints that may not return anything.
    pub async fn send<T: DeserializeOwned>(&self, req: &ApiRequest) -> Result<T, RequestError> {
        let token = if req.is_public() {
            None
        } else {
            self.authorize().await?
        };
        let body = self.execute(req, token.as_deref()).await?;
        Self::parse_body(body)
    }

    /// Like [`Client::send`], but network failures and timeouts are retried after a
    /// delay, up to `max_retries` times.
    pub async fn send_with_retry<T: DeserializeOwned>(
        &self,
        req: &ApiRequest,
    ) -> Result<T, RequestError> {
        let mut attempt = 0;
        loop {
            match self.send(req).await {
                Err(err) if err.is_retryable() && attempt < self.opts.max_retries => {
                    attempt += 1;
                    warn!(
                        "{} {} failed: {err}, retry {attempt}/{} in {}",
                        req.method,
                        req.path,
                        self.opts.max_retries,
                        humantime::format_duration(self.opts.retry_delay)
                    );
                    tokio::time::sleep(self.opts.retry_delay).await;
                }
                result => return result,
            }
        }
    }

    /// The bearer token to attach, refreshing it first if it is about to expire.
    /// `None` means there is no session and the request goes out unauthenticated.
    async fn authorize(&self) -> Result<Option<String>, RequestError> {
        let tokens = match self.session.get_tokens()? {
            Some(tokens) => tokens,
            None => return Ok(None),
        };
        if !is_token_expired(&tokens.token, self.opts.refresh_buffer_secs) {
            return Ok(Some(tokens.token));
        }

        info!("Access token expired, refreshing");
        let data = self.renew(&tokens.token, false).await?;
        Ok(Some(data.token))
    }

    /// Renew the token pair now, even if the access token is still valid. Shares the
    /// refresh lock with the request pipeline, so it never races an automatic refresh.
    /// Without a stored refresh token this fails with `NoRefreshToken` and leaves the
    /// session alone.
    pub async fn refresh_session(&self) -> Result<TokenData, RequestError> {
        let tokens = match self.session.get_tokens()? {
            Some(tokens) => tokens,
            None => return Err(RequestError::SessionExpired),
        };
        if tokens.refresh_token.is_empty() {
            return Err(RequestError::NoRefreshToken);
        }
        self.renew(&tokens.token, true).await
    }

    /// Single-flight refresh. `stale_token` is the access token the caller saw before
    /// waiting for the lock; if the stored token differs once the lock is held,
    /// another task already renewed it. Unless `force` is set, a stored token that is
    /// no longer expired is also taken as is.
    async fn renew(&self, stale_token: &str, force: bool) -> Result<TokenData, RequestError> {
        let _guard = match tokio::time::timeout(self.opts.refresh_wait, self.refresh_lock.lock())
            .await
        {
            Ok(guard) => guard,
            Err(_) => {
                warn!(
                    "Waited {} for another token refresh, giving up",
                    humantime::format_duration(self.opts.refresh_wait)
                );
                return Err(RequestError::RefreshTimeout);
            }
        };

        // Whoever held the lock before us may have already renewed the tokens, or
        // failed and cleared them.
        let tokens = match self.session.get_tokens()? {
            Some(tokens) => tokens,
            None => return Err(RequestError::SessionExpired),
        };
        if tokens.token != stale_token
            || (!force && !is_token_expired(&tokens.token, self.opts.refresh_buffer_secs))
        {
            debug!("Token already refreshed by another request");
            return Ok(tokens);
        }

        if tokens.refresh_token.is_empty() {
            warn!("Access token expired and no refresh token stored, clearing session");
            self.session.clear_all_tokens();
            return Err(RequestError::NoRefreshToken);
        }

        match self.refresh_token(&tokens.refresh_token).await {
            Ok(data) => Ok(data),
            Err(err) => {
                warn!("Refresh token failed: {err}, clearing session");
                // A 401 already cleared the session in execute.
                if !err.is_unauthorized() {
                    self.session.clear_all_tokens();
                }
                Err(err)
            }
        }
    }

    async fn execute(&self, req: &ApiRequest, token: Option<&str>) -> Result<String, RequestError> {
        let url = format!("{}{}", self.url, req.path);
        let mut builder = self
            .client
            .request(req.method.clone(), &url)
            .header("Accept", MIME_JSON);

        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = req.body.as_ref() {
            builder = builder
                .header("Content-Type", MIME_JSON)
                .body(body.to_string());
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let http_req = match builder.build() {
            Ok(req) => req,
            Err(e) => return Err(RequestError::Client(format!("build request failed: {e:#}"))),
        };

        debug!("{} {}", req.method, http_req.url());
        let resp = self
            .client
            .execute(http_req)
            .await
            .map_err(RequestError::from_reqwest)?;
        let status = resp.status();
        let body = resp.text().await.map_err(RequestError::from_reqwest)?;

        if status.is_success() {
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED && req.path == REFRESH_PATH {
            warn!("Refresh token rejected by server, clearing session");
            self.session.clear_all_tokens();
        }
        debug!("{} {} returned {status}: {body}", req.method, req.path);
        Err(RequestError::Status {
            code: status.as_u16(),
            payload: ErrorPayload::parse(&body),
        })
    }

    fn parse_body<T: DeserializeOwned>(body: String) -> Result<T, RequestError> {
        let text = if body.trim().is_empty() {
            "null"
        } else {
            body.as_str()
        };
        match serde_json::from_str(text) {
            Ok(data) => Ok(data),
            Err(_) => Err(RequestError::InvalidJson(body)),
        }
    }

    fn build_token_data(token: &str, refresh_token: &str) -> TokenData {
        let expires_at = match expires_at_millis(token) {
            Some(expires_at) => expires_at,
            None => {
                warn!("Access token has no readable exp claim, assuming a 24h lifetime");
                current_millis() + FALLBACK_TOKEN_LIFETIME.as_millis() as u64
            }
        };
        TokenData {
            token: token.to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at,
        }
    }
}
