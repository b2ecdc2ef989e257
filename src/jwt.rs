use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Deserializer};

use crate::time::current_timestamp;

/// Default number of seconds before `exp` at which a token already counts as expired.
pub const DEFAULT_EXPIRY_BUFFER_SECS: u64 = 5;

const PAYLOAD_CONFIG: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const B64_URL: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, PAYLOAD_CONFIG);
const B64_STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, PAYLOAD_CONFIG);

/// The subset of registered JWT claims the client looks at. The signature is never
/// verified here, that is the server's job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_subject")]
    pub sub: Option<String>,

    #[serde(default)]
    pub iat: Option<i64>,
}

/// Result of looking inside a token. Opaque refresh tokens (UUIDs and the like) are
/// `NotAJwt`, which is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtPayload {
    Decoded(Claims),
    NotAJwt,
}

impl JwtPayload {
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Self::Decoded(claims) => Some(claims),
            Self::NotAJwt => None,
        }
    }
}

pub fn decode_jwt(token: &str) -> JwtPayload {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return JwtPayload::NotAJwt;
    }

    let payload = parts[1];
    let data = match B64_URL.decode(payload) {
        Ok(data) => data,
        Err(_) => match B64_STANDARD.decode(payload) {
            Ok(data) => data,
            Err(_) => return JwtPayload::NotAJwt,
        },
    };

    match serde_json::from_slice::<Claims>(&data) {
        Ok(claims) => JwtPayload::Decoded(claims),
        Err(_) => JwtPayload::NotAJwt,
    }
}

/// A token is expired when it cannot be decoded, carries no `exp`, or
/// `now >= exp - buffer_secs`.
pub fn is_token_expired(token: &str, buffer_secs: u64) -> bool {
    is_token_expired_at(token, buffer_secs, current_timestamp())
}

pub fn is_token_expired_at(token: &str, buffer_secs: u64, now: u64) -> bool {
    let exp = match decode_jwt(token) {
        JwtPayload::Decoded(Claims { exp: Some(exp), .. }) => exp,
        _ => return true,
    };
    (now as i64) >= exp - buffer_secs as i64
}

pub fn user_id_from_token(token: &str) -> Option<String> {
    match decode_jwt(token) {
        JwtPayload::Decoded(claims) => claims.sub,
        JwtPayload::NotAJwt => None,
    }
}

/// The `exp` claim in milliseconds, the unit `TokenData::expires_at` is stored in.
pub fn expires_at_millis(token: &str) -> Option<u64> {
    match decode_jwt(token) {
        JwtPayload::Decoded(Claims { exp: Some(exp), .. }) if exp >= 0 => Some(exp as u64 * 1000),
        _ => None,
    }
}

fn deserialize_subject<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    // Some backends put the numeric user id straight into `sub`.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Subject {
        Text(String),
        Number(i64),
    }

    let subject: Option<Subject> = Option::deserialize(deserializer)?;
    Ok(subject.map(|s| match s {
        Subject::Text(s) => s,
        Subject::Number(n) => n.to_string(),
    }))
}
