//! MTCaptcha.

use protocol::CaptchaTask;
use serde::{Deserialize, Serialize};

use crate::{is_blank, proxy_variant};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MtCaptchaTask {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    /// Public site key, e.g. `"MTPublic-xxx"`.
    pub website_key: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub proxy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MtCaptchaSolution {
    pub token: String,
}

impl CaptchaTask for MtCaptchaTask {
    type Solution = MtCaptchaSolution;

    fn task_type(&self) -> &str {
        proxy_variant(&self.proxy, "MtCaptchaTask", "MtCaptchaTaskProxyLess")
    }
}
