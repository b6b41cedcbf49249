//! Lenient view of an analysis result and its plain-text rendering.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt::Write;

use crate::http::Payload;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(default, deserialize_with = "lenient")]
    pub original_text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub simplified_explanation: String,
}

/// Summary, mind map, risky clauses and a tip for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default, deserialize_with = "lenient")]
    pub summary: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub mind_map: String,
    #[serde(default, deserialize_with = "lenient")]
    pub risks: Vec<Risk>,
    #[serde(default, deserialize_with = "lenient")]
    pub tip: String,
}

/// Deserializes a field, falling back to its default when it has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

impl AnalysisReport {
    /// Finds the report under `result`, then `analysis`, then the root.
    pub fn from_payload(payload: &Payload) -> Option<Self> {
        let root = payload.as_json()?;
        let value = ["result", "analysis"]
            .iter()
            .filter_map(|key| root.get(*key))
            .find(|value| value.is_object())
            .unwrap_or(root);

        if !value.is_object() {
            return None;
        }
        Self::deserialize(value).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.mind_map.trim().is_empty()
            && self.risks.is_empty()
            && self.tip.trim().is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        if !self.summary.is_empty() {
            out.push_str("Summary\n");
            for point in &self.summary {
                let _ = writeln!(out, "  - {}", point);
            }
            out.push('\n');
        }

        if !self.mind_map.trim().is_empty() {
            out.push_str("Mind map\n");
            for line in self.mind_map.lines() {
                let _ = writeln!(out, "  {}", line);
            }
            out.push('\n');
        }

        if !self.risks.is_empty() {
            out.push_str("Risks\n");
            for (i, risk) in self.risks.iter().enumerate() {
                let _ = writeln!(out, "  {}. \"{}\"", i + 1, risk.original_text);
                let _ = writeln!(out, "     {}", risk.simplified_explanation);
            }
            out.push('\n');
        }

        if !self.tip.trim().is_empty() {
            let _ = writeln!(out, "Did you know? {}", self.tip);
        }

        out.trim_end().to_string()
    }
}

/// Extracts the assistant reply from a chat payload.
pub fn chat_reply(payload: &Payload) -> Option<String> {
    match payload {
        Payload::Text(text) => Some(text.clone()),
        Payload::Json(value) => ["response", "reply", "answer"]
            .iter()
            .filter_map(|key| value.get(*key))
            .find_map(Value::as_str)
            .map(str::to_string),
    }
}
