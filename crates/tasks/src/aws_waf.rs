//! AWS WAF image classification and token tasks.

use protocol::CaptchaTask;
use serde::{Deserialize, Serialize};

use crate::{is_blank, proxy_variant};

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifies an AWS WAF puzzle image. Resolved synchronously by `/createTask`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AwsWafClassificationTask {
    /// Page source URL; improves accuracy.
    #[serde(rename = "websiteURL", skip_serializing_if = "is_blank")]
    pub website_url: Option<String>,
    /// One base64 image, or up to nine for grid puzzles.
    pub images: Vec<String>,
    /// Classification code, e.g. `"aws:toycarcity:carcity"` or `"aws:grid:bed"`.
    pub question: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AwsWafClassificationSolution {
    /// `[x, y]` for point-based puzzles.
    #[serde(rename = "box")]
    pub box_: Vec<f64>,
    /// Indexes of matching tiles for grid puzzles.
    pub objects: Vec<u32>,
    /// Slide distance for slider puzzles.
    pub distance: f64,
}

impl CaptchaTask for AwsWafClassificationTask {
    type Solution = AwsWafClassificationSolution;

    fn task_type(&self) -> &str {
        "AwsWafClassification"
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// Obtains an AWS WAF `aws-waf-token` cookie.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AntiAwsWafTask {
    /// Proxy in `http://ip:port:user:pass` form. Selects `AntiAwsWafTask`.
    #[serde(skip_serializing_if = "is_blank")]
    pub proxy: Option<String>,
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    /// `key` value from the captcha page.
    #[serde(skip_serializing_if = "is_blank")]
    pub aws_key: Option<String>,
    /// `iv` value from the captcha page.
    #[serde(skip_serializing_if = "is_blank")]
    pub aws_iv: Option<String>,
    /// `context` value from the captcha page.
    #[serde(skip_serializing_if = "is_blank")]
    pub aws_context: Option<String>,
    /// `challenge.js` link from the captcha page.
    #[serde(rename = "awsChallengeJS", skip_serializing_if = "is_blank")]
    pub aws_challenge_js: Option<String>,
    /// `problem` endpoint URL.
    #[serde(skip_serializing_if = "is_blank")]
    pub aws_problem_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AntiAwsWafSolution {
    pub cookie: String,
}

impl CaptchaTask for AntiAwsWafTask {
    type Solution = AntiAwsWafSolution;

    fn task_type(&self) -> &str {
        proxy_variant(&self.proxy, "AntiAwsWafTask", "AntiAwsWafTaskProxyLess")
    }
}
