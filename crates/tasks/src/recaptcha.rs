//! Google reCAPTCHA: v2 image classification, v2 tokens, and v3 tokens.

use protocol::CaptchaTask;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{is_blank, is_false, proxy_variant};

// ---------------------------------------------------------------------------
// v2 classification
// ---------------------------------------------------------------------------

/// The object a reCAPTCHA v2 grid asks the user to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReCaptchaQuestion {
    #[serde(rename = "/m/0pg52")]
    Taxis,
    #[serde(rename = "/m/01bjv")]
    Bus,
    #[serde(rename = "/m/02yvhj")]
    SchoolBus,
    #[serde(rename = "/m/04_sv")]
    Motorcycles,
    #[serde(rename = "/m/013xlm")]
    Tractors,
    #[serde(rename = "/m/01jk_4")]
    Chimneys,
    #[serde(rename = "/m/014xcs")]
    Crosswalks,
    #[serde(rename = "/m/015qff")]
    TrafficLights,
    #[serde(rename = "/m/0199g")]
    Bicycles,
    #[serde(rename = "/m/015qbp")]
    ParkingMeters,
    #[serde(rename = "/m/0k4j")]
    Cars,
    #[serde(rename = "/m/015kr")]
    Bridges,
    #[serde(rename = "/m/019jd")]
    Boats,
    #[serde(rename = "/m/0cdl1")]
    PalmTrees,
    #[serde(rename = "/m/09d_r")]
    MountainsOrHills,
    #[serde(rename = "/m/01pns0")]
    FireHydrant,
    #[serde(rename = "/m/01lynh")]
    Stairs,
}

/// Classifies a reCAPTCHA v2 grid image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReCaptchaV2ClassificationTask {
    #[serde(rename = "websiteURL", skip_serializing_if = "is_blank")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub website_key: Option<String>,
    /// Base64 image without the `data:` prefix.
    pub image: String,
    pub question: ReCaptchaQuestion,
}

/// Whether the grid was a single 4x4 image or a 3x3 set of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReCaptchaType {
    Single,
    Multi,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReCaptchaV2ClassificationSolution {
    #[serde(rename = "type")]
    pub kind: ReCaptchaType,
    /// Indexes of matching tiles (multi).
    #[serde(default)]
    pub objects: Vec<u32>,
    /// Whether the object is present (single).
    #[serde(default)]
    pub has_object: bool,
    /// Number of tiles per side.
    #[serde(default)]
    pub size: u32,
}

impl CaptchaTask for ReCaptchaV2ClassificationTask {
    type Solution = ReCaptchaV2ClassificationSolution;

    fn task_type(&self) -> &str {
        "ReCaptchaV2Classification"
    }
}

// ---------------------------------------------------------------------------
// v2 token
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReCaptchaV2Task {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    pub website_key: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub proxy: Option<String>,
    /// The `sa` parameter of the `/anchor` request.
    #[serde(skip_serializing_if = "is_blank")]
    pub page_action: Option<String>,
    /// Enterprise `s` token and related values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enterprise_payload: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_invisible: bool,
    /// Session mode; the solution then carries `recaptcha-ca-t`.
    #[serde(skip_serializing_if = "is_false")]
    pub is_session: bool,
    #[serde(skip_serializing_if = "is_blank")]
    pub api_domain: Option<String>,
}

impl ReCaptchaV2Task {
    pub fn new(website_url: impl Into<String>, website_key: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            website_key: website_key.into(),
            ..Default::default()
        }
    }
}

/// Token solution shared by reCAPTCHA v2 and v3.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReCaptchaTokenSolution {
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Token creation time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub create_time: i64,
    pub g_recaptcha_response: String,
    #[serde(rename = "recaptcha-ca-t", default)]
    pub recaptcha_ca_t: Option<String>,
    #[serde(rename = "recaptcha-ca-e", default)]
    pub recaptcha_ca_e: Option<String>,
}

pub type ReCaptchaV2Solution = ReCaptchaTokenSolution;
pub type ReCaptchaV3Solution = ReCaptchaTokenSolution;

impl CaptchaTask for ReCaptchaV2Task {
    type Solution = ReCaptchaV2Solution;

    fn task_type(&self) -> &str {
        proxy_variant(&self.proxy, "ReCaptchaV2Task", "ReCaptchaV2TaskProxyLess")
    }
}

// ---------------------------------------------------------------------------
// v3 token
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReCaptchaV3Task {
    #[serde(rename = "websiteURL")]
    pub website_url: String,
    pub website_key: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub proxy: Option<String>,
    /// The action passed to `grecaptcha.execute`.
    #[serde(skip_serializing_if = "is_blank")]
    pub page_action: Option<String>,
    /// Selects the enterprise task kinds when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enterprise_payload: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_session: bool,
    #[serde(skip_serializing_if = "is_blank")]
    pub api_domain: Option<String>,
}

impl ReCaptchaV3Task {
    pub fn new(website_url: impl Into<String>, website_key: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            website_key: website_key.into(),
            ..Default::default()
        }
    }
}

impl CaptchaTask for ReCaptchaV3Task {
    type Solution = ReCaptchaV3Solution;

    fn task_type(&self) -> &str {
        if self.enterprise_payload.is_some() {
            proxy_variant(
                &self.proxy,
                "ReCaptchaV3EnterpriseTask",
                "ReCaptchaV3EnterpriseTaskProxyLess",
            )
        } else {
            proxy_variant(&self.proxy, "ReCaptchaV3Task", "ReCaptchaV3TaskProxyLess")
        }
    }
}
