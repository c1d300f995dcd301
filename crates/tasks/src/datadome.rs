//! DataDome slider and interstitial.

use protocol::CaptchaTask;
use serde::{Deserialize, Serialize};

/// Solves a DataDome slider. A proxy is mandatory for this task kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDomeSliderTask {
    /// Captcha URL; must include `t=fe`.
    pub captcha_url: String,
    /// Must match the User-Agent used against the target site.
    pub user_agent: String,
    pub proxy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDomeSolution {
    #[serde(default)]
    pub user_agent: String,
    /// The `datadome` cookie to send on subsequent requests.
    pub cookie: String,
}

impl CaptchaTask for DataDomeSliderTask {
    type Solution = DataDomeSolution;

    fn task_type(&self) -> &str {
        "DatadomeSliderTask"
    }
}
