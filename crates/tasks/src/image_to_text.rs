//! Text recognition from images.

use protocol::CaptchaTask;
use serde::{Deserialize, Serialize};

use crate::is_blank;

/// Recognises the text in an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageToTextTask {
    #[serde(rename = "websiteURL", skip_serializing_if = "is_blank")]
    pub website_url: Option<String>,
    /// Base64 image without the `data:` prefix.
    pub body: String,
    /// Up to nine images; only used by the `number` module.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub module: Option<String>,
    /// Confidence threshold between 0.8 and 1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageToTextSolution {
    pub text: String,
    /// Per-image results for the `number` module.
    pub answers: Vec<String>,
}

impl CaptchaTask for ImageToTextTask {
    type Solution = ImageToTextSolution;

    fn task_type(&self) -> &str {
        "ImageToTextTask"
    }
}
