//! Response body normalization.

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// A parsed response body, passed through to callers uninterpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Parses a response body.
    ///
    /// Bodies declared as JSON are parsed as JSON; anything else is read as
    /// text and parsed on a best-effort basis. A body that does not parse is
    /// kept as raw text.
    pub fn parse(content_type: Option<&str>, body: String) -> Self {
        if content_type.is_some_and(is_json_content_type) {
            return match serde_json::from_str(&body) {
                Ok(value) => Payload::Json(value),
                Err(e) => {
                    debug!("Body declared as JSON failed to parse ({}), keeping raw text", e);
                    Payload::Text(body)
                }
            };
        }

        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Payload::Text(body);
        }

        match serde_json::from_str(trimmed) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(body),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    /// Returns a string field of a JSON object payload.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.as_json()?.get(field)?.as_str()
    }

    /// The conventional `error` field servers use for failure messages.
    pub fn error_message(&self) -> Option<&str> {
        self.str_field("error")
    }

    /// Deserializes a JSON payload into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        match self {
            Payload::Json(value) => Ok(T::deserialize(value)?),
            Payload::Text(text) => anyhow::bail!("Expected a JSON response, got text: {}", text),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Json(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => write!(f, "{}", pretty),
                Err(_) => write!(f, "{}", value),
            },
            Payload::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Returns true for `application/json` and `+json` media types.
fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}
