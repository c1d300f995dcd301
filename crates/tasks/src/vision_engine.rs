//! VisionEngine: sliders, rotations, and image selection puzzles.

use protocol::CaptchaTask;
use serde::{Deserialize, Serialize};

use crate::is_blank;

/// The recognition model to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisionEngineModule {
    #[serde(rename = "slider_1")]
    Slider1,
    #[serde(rename = "rotate_1")]
    Rotate1,
    #[serde(rename = "rotate_2")]
    Rotate2,
    Shein,
    ShopReceipt,
    /// Counting; requires a question.
    SpaceDetection,
    SliderTemuPlus,
    SelectTemu,
}

/// Runs a VisionEngine model over a puzzle image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionEngineTask {
    pub module: VisionEngineModule,
    #[serde(rename = "websiteURL", skip_serializing_if = "is_blank")]
    pub website_url: Option<String>,
    /// Base64 foreground image without the `data:` prefix.
    pub image: String,
    /// Base64 background image.
    pub image_background: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub question: Option<String>,
}

/// A rectangle given by its top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// Which fields are populated depends on the module.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisionEngineSolution {
    /// Slide distance (slider modules).
    pub distance: f64,
    /// Rotation angle (rotate modules).
    pub angle: f64,
    pub rects: Vec<Rect>,
    /// Single bounding box (`space_detection`).
    #[serde(rename = "box")]
    pub box_: Vec<f64>,
    pub text: String,
    /// Indexes of matching tiles (selection modules).
    pub objects: Vec<u32>,
}

impl CaptchaTask for VisionEngineTask {
    type Solution = VisionEngineSolution;

    fn task_type(&self) -> &str {
        "VisionEngine"
    }
}
