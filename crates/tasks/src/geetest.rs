//! Geetest v3 and v4.

use protocol::CaptchaTask;
use serde::{Deserialize, Serialize};

use crate::is_blank;

/// Solves a Geetest challenge. Set `gt` and `challenge` for v3, or
/// `captcha_id` for v4.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeeTestTask {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub gt: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub challenge: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub captcha_id: Option<String>,
    /// Overrides the API subdomain, e.g. `"api.geetest.com"`.
    #[serde(skip_serializing_if = "is_blank")]
    pub geetest_api_server_subdomain: Option<String>,
}

/// Solution for both versions; v3 fills `challenge` and `validate`, v4 the rest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeeTestSolution {
    pub challenge: Option<String>,
    pub validate: Option<String>,
    pub captcha_id: Option<String>,
    pub captcha_output: Option<String>,
    pub gen_time: Option<String>,
    pub lot_number: Option<String>,
    pub pass_token: Option<String>,
    pub risk_type: Option<String>,
}

impl CaptchaTask for GeeTestTask {
    type Solution = GeeTestSolution;

    fn task_type(&self) -> &str {
        "GeeTestTaskProxyLess"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_v4_task_wire_shape() {
        let task = GeeTestTask {
            website_url: "https://example.com".into(),
            captcha_id: Some("e392e1d7fd421dc63325744d5a2b9c73".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&task).unwrap(),
            json!({
                "websiteURL": "https://example.com",
                "captchaId": "e392e1d7fd421dc63325744d5a2b9c73"
            })
        );
    }

    #[test]
    fn test_v4_solution_uses_snake_case_keys() {
        let solution: GeeTestSolution = serde_json::from_value(json!({
            "captcha_id": "id",
            "captcha_output": "out",
            "gen_time": "1700000000",
            "lot_number": "lot",
            "pass_token": "pass",
            "risk_type": "slide"
        }))
        .unwrap();
        assert_eq!(solution.captcha_output.as_deref(), Some("out"));
        assert_eq!(solution.risk_type.as_deref(), Some("slide"));
        assert!(solution.validate.is_none());
    }
}
