// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Result types for MoveNet inference output.
//!
//! A decode call produces plain owned values: [`BodyPart`] for each keypoint
//! and [`Person`] for each detected pose. [`Results`] bundles the people found
//! in one image with its shape and timing information.

use serde::Serialize;

use crate::error::{InferenceError, Result};
use crate::keypoint::Keypoint;
use crate::task::Task;

/// Timing information for inference operations (in milliseconds).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Speed {
    /// Time spent on preprocessing.
    pub preprocess: Option<f64>,
    /// Time spent on model inference.
    pub inference: Option<f64>,
    /// Time spent on postprocessing.
    pub postprocess: Option<f64>,
}

impl Speed {
    /// Create a new Speed instance with all timings.
    #[must_use]
    pub const fn new(preprocess: f64, inference: f64, postprocess: f64) -> Self {
        Self {
            preprocess: Some(preprocess),
            inference: Some(inference),
            postprocess: Some(postprocess),
        }
    }

    /// Get total time.
    ///
    /// # Returns
    ///
    /// * Sum of preprocess, inference, and postprocess times in milliseconds.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.preprocess.unwrap_or(0.0)
            + self.inference.unwrap_or(0.0)
            + self.postprocess.unwrap_or(0.0)
    }
}

/// One decoded keypoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPart {
    /// Keypoint index, 0 to 16.
    pub id: usize,
    /// Keypoint name, e.g. `leftWrist`.
    pub label: &'static str,
    /// Keypoint confidence.
    pub score: f32,
    /// Normalized x coordinate in model input space.
    pub x_raw: f32,
    /// Normalized y coordinate in model input space.
    pub y_raw: f32,
    /// Pixel x coordinate in the original image, truncated.
    pub x: i32,
    /// Pixel y coordinate in the original image, truncated.
    pub y: i32,
}

impl BodyPart {
    /// Build a part from normalized coordinates, scaling to an image of the
    /// given `(height, width)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn new(kind: Keypoint, score: f32, x_raw: f32, y_raw: f32, orig_shape: (u32, u32)) -> Self {
        let (height, width) = orig_shape;
        Self {
            id: kind.index(),
            label: kind.label(),
            score,
            x_raw,
            y_raw,
            x: (x_raw * width as f32) as i32,
            y: (y_raw * height as f32) as i32,
        }
    }

    /// The typed keypoint for this part.
    #[must_use]
    pub fn keypoint(&self) -> Option<Keypoint> {
        Keypoint::from_index(self.id)
    }
}

/// One detected pose.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Row index in the model output.
    pub id: usize,
    /// Instance confidence.
    pub score: f32,
    /// Bounding box in normalized coordinates, `[x, y, width, height]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_raw: Option<[f32; 4]>,
    /// Bounding box in original image pixels, `[x, y, width, height]`.
    #[serde(rename = "box", skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[i32; 4]>,
    /// All 17 keypoints in model output order.
    pub parts: Vec<BodyPart>,
}

impl Person {
    /// Find a part by label.
    #[must_use]
    pub fn part(&self, label: &str) -> Option<&BodyPart> {
        self.parts.iter().find(|p| p.label == label)
    }

    /// Find a part by keypoint.
    #[must_use]
    pub fn keypoint(&self, kind: Keypoint) -> Option<&BodyPart> {
        self.part(kind.label())
    }

    /// Mean confidence over all parts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_confidence(&self) -> f32 {
        if self.parts.is_empty() {
            return 0.0;
        }
        self.parts.iter().map(|p| p.score).sum::<f32>() / self.parts.len() as f32
    }
}

/// Results container for one image.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    /// Path to the source image.
    pub path: String,
    /// Original image shape (height, width).
    pub orig_shape: (u32, u32),
    /// Model input tensor shape (height, width).
    pub input_shape: (u32, u32),
    /// Model variant that produced these results.
    pub task: Task,
    /// Detected people, in model output order.
    pub persons: Vec<Person>,
    /// Inference timing information.
    pub speed: Speed,
}

impl Results {
    /// Create a new Results instance.
    #[must_use]
    pub const fn new(
        path: String,
        orig_shape: (u32, u32),
        input_shape: (u32, u32),
        task: Task,
        persons: Vec<Person>,
        speed: Speed,
    ) -> Self {
        Self {
            path,
            orig_shape,
            input_shape,
            task,
            persons,
            speed,
        }
    }

    /// Get the number of detected people.
    #[must_use]
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// Check if nobody was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Short summary like `"2 persons"`.
    #[must_use]
    pub fn verbose(&self) -> String {
        match self.len() {
            0 => "(no detections)".to_string(),
            1 => "1 person".to_string(),
            n => format!("{n} persons"),
        }
    }

    /// Serialize the results as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| InferenceError::InferenceError(format!("Failed to serialize results: {e}")))
    }
}
