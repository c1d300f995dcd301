//! Task registry for the CapSolver client.
//!
//! Every supported captcha variant is a pair of plain data types: a task
//! (what is sent to `/createTask`) and a solution (what comes back in the
//! `solution` payload). Each task implements [`protocol::CaptchaTask`], whose
//! `task_type` picks the wire discriminator from the task's own fields, so a
//! caller never sets `type` by hand:
//!
//! ```ignore
//! let solution = solver
//!     .solve(&ReCaptchaV2Task::new("https://example.com", "site-key"))
//!     .await?;
//! println!("{}", solution.g_recaptcha_response);
//! ```
//!
//! ## Module Layout
//!
//! | Module | Tasks |
//! |--------|-------|
//! | [`aws_waf`] | `AwsWafClassificationTask`, `AntiAwsWafTask` |
//! | [`cloudflare`] | `AntiTurnstileTask` |
//! | [`datadome`] | `DataDomeSliderTask` |
//! | [`geetest`] | `GeeTestTask` |
//! | [`image_to_text`] | `ImageToTextTask` |
//! | [`mtcaptcha`] | `MtCaptchaTask` |
//! | [`recaptcha`] | `ReCaptchaV2ClassificationTask`, `ReCaptchaV2Task`, `ReCaptchaV3Task` |
//! | [`vision_engine`] | `VisionEngineTask` |
//! | [`raw`] | `RawTask` for task types without a dedicated shape |

pub mod aws_waf;
pub mod cloudflare;
pub mod datadome;
pub mod geetest;
pub mod image_to_text;
pub mod mtcaptcha;
pub mod raw;
pub mod recaptcha;
pub mod vision_engine;

pub use aws_waf::{
    AntiAwsWafSolution, AntiAwsWafTask, AwsWafClassificationSolution, AwsWafClassificationTask,
};
pub use cloudflare::{AntiTurnstileSolution, AntiTurnstileTask};
pub use datadome::{DataDomeSliderTask, DataDomeSolution};
pub use geetest::{GeeTestSolution, GeeTestTask};
pub use image_to_text::{ImageToTextSolution, ImageToTextTask};
pub use mtcaptcha::{MtCaptchaSolution, MtCaptchaTask};
pub use raw::RawTask;
pub use recaptcha::{
    ReCaptchaQuestion, ReCaptchaTokenSolution, ReCaptchaType, ReCaptchaV2ClassificationSolution,
    ReCaptchaV2ClassificationTask, ReCaptchaV2Solution, ReCaptchaV2Task, ReCaptchaV3Solution,
    ReCaptchaV3Task,
};
pub use vision_engine::{Rect, VisionEngineModule, VisionEngineSolution, VisionEngineTask};

// ---------------------------------------------------------------------------
// Serde helpers shared by the task shapes.
// ---------------------------------------------------------------------------

/// `None` and `Some("")` are both "not set" on the wire.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Picks between the proxy and proxy-less discriminator of a task kind.
pub(crate) fn proxy_variant<'a>(
    proxy: &Option<String>,
    with_proxy: &'a str,
    proxy_less: &'a str,
) -> &'a str {
    if is_blank(proxy) {
        proxy_less
    } else {
        with_proxy
    }
}
