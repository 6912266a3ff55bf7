// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Inference configuration.
//!
//! This module defines the [`InferenceConfig`] struct, which controls the
//! multi-pose confidence threshold, model input sizing and the ONNX Runtime
//! session options.

use crate::task::Task;

/// Default minimum instance score for multi-pose detections.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.2;

/// Input size used when the model declares a dynamic spatial dimension.
pub const DEFAULT_INPUT_SIZE: usize = 256;

/// Configuration for MoveNet inference.
///
/// # Example
///
/// ```rust
/// use movenet_inference::{InferenceConfig, Task};
///
/// let config = InferenceConfig::new()
///     .with_min_confidence(0.3)
///     .with_imgsz(256)
///     .with_task(Task::MultiPose);
/// ```
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Minimum instance score (0.0 to 1.0) for a multi-pose row to be kept.
    /// Rows scoring exactly this value are kept.
    pub min_confidence: f32,
    /// Explicit square input size.
    /// If `None`, the size declared by the model is used, falling back to
    /// [`DEFAULT_INPUT_SIZE`] for dynamic models.
    pub imgsz: Option<usize>,
    /// Number of intra-op threads for ONNX Runtime.
    /// Setting this to `0` allows ONNX Runtime to choose.
    pub num_threads: usize,
    /// Force a model variant instead of inferring it from the output shape.
    pub task: Option<Task>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            imgsz: None,
            num_threads: 0,
            task: None,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum instance score for multi-pose detections.
    #[must_use]
    pub const fn with_min_confidence(mut self, threshold: f32) -> Self {
        self.min_confidence = threshold;
        self
    }

    /// Set the square model input size.
    #[must_use]
    pub const fn with_imgsz(mut self, size: usize) -> Self {
        self.imgsz = Some(size);
        self
    }

    /// Set the number of threads for inference.
    ///
    /// # Arguments
    ///
    /// * `threads` - The number of intra-op threads. Set to `0` for auto-configuration.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }

    /// Force the model variant.
    #[must_use]
    pub const fn with_task(mut self, task: Task) -> Self {
        self.task = Some(task);
        self
    }
}
