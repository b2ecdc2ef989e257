use serde::{Deserialize, Deserializer, Serialize};

pub const MIME_JSON: &str = "application/json";

/// Structured error body the backend may send with a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    /// `errors` is either a single string or a list of strings.
    #[serde(
        default,
        deserialize_with = "deserialize_errors",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub errors: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorPayload {
    pub fn parse(body: &str) -> Option<Self> {
        let payload: Self = serde_json::from_str(body).ok()?;
        if payload.is_empty() {
            return None;
        }
        Some(payload)
    }

    pub fn is_empty(&self) -> bool {
        self.error_code.is_none() && self.errors.is_empty() && self.message.is_none()
    }

    /// The messages to surface verbatim, by preference: `errorCode`, `errors`, `message`.
    pub fn messages(&self) -> Option<Vec<String>> {
        if let Some(code) = self.error_code.as_ref() {
            return Some(vec![code.clone()]);
        }
        if !self.errors.is_empty() {
            return Some(self.errors.clone());
        }
        self.message.as_ref().map(|msg| vec![msg.clone()])
    }
}

fn deserialize_errors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Errors {
        One(String),
        Many(Vec<String>),
    }

    let errors: Option<Errors> = Option::deserialize(deserializer)?;
    Ok(match errors {
        Some(Errors::One(s)) => vec![s],
        Some(Errors::Many(v)) => v,
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload() {
        let payload = ErrorPayload::parse(r#"{"errorCode":"DUPLICATE_CATEGORY"}"#).unwrap();
        assert_eq!(
            payload.messages(),
            Some(vec![String::from("DUPLICATE_CATEGORY")])
        );

        let payload = ErrorPayload::parse(r#"{"errors":["a","b"],"message":"m"}"#).unwrap();
        assert_eq!(
            payload.messages(),
            Some(vec![String::from("a"), String::from("b")])
        );

        let payload = ErrorPayload::parse(r#"{"errors":"only one"}"#).unwrap();
        assert_eq!(payload.messages(), Some(vec![String::from("only one")]));

        let payload = ErrorPayload::parse(r#"{"message":"Bad amount"}"#).unwrap();
        assert_eq!(payload.messages(), Some(vec![String::from("Bad amount")]));

        assert!(ErrorPayload::parse(r#"{"timestamp":"now"}"#).is_none());
        assert!(ErrorPayload::parse("<html>").is_none());
    }
}
