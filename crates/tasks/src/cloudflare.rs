//! Cloudflare Turnstile.

use std::collections::BTreeMap;

use protocol::CaptchaTask;
use serde::{Deserialize, Serialize};

/// Solves a Cloudflare Turnstile widget. Always submitted proxy-less.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AntiTurnstileTask {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    pub website_key: String,
    /// Extra Turnstile data such as `action` or `cdata`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl AntiTurnstileTask {
    pub fn new(website_url: impl Into<String>, website_key: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            website_key: website_key.into(),
            metadata: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntiTurnstileSolution {
    pub token: String,
    /// Which kind of Cloudflare challenge was solved.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl CaptchaTask for AntiTurnstileTask {
    type Solution = AntiTurnstileSolution;

    fn task_type(&self) -> &str {
        "AntiTurnstileTaskProxyLess"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_metadata_is_omitted_when_empty() {
        let mut task = AntiTurnstileTask {
            website_url: "https://example.com".into(),
            website_key: "0x4AAAA".into(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&task).unwrap(),
            json!({"websiteURL": "https://example.com", "websiteKey": "0x4AAAA"})
        );

        task.metadata.insert("action".into(), "login".into());
        assert_eq!(
            serde_json::to_value(&task).unwrap()["metadata"],
            json!({"action": "login"})
        );
    }

    #[test]
    fn test_solution_decodes() {
        let solution: AntiTurnstileSolution = serde_json::from_value(json!({
            "token": "0.abc",
            "type": "turnstile",
            "userAgent": "Mozilla/5.0"
        }))
        .unwrap();
        assert_eq!(solution.token, "0.abc");
        assert_eq!(solution.kind, "turnstile");
        assert_eq!(solution.user_agent.as_deref(), Some("Mozilla/5.0"));
    }
}
