// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! MoveNet model loading and inference.
//!
//! This module provides the [`PoseModel`] struct for loading MoveNet ONNX
//! models and running them on images.

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::tensor::TensorElementType;
use ort::value::{DynValue, Tensor};

use crate::error::{InferenceError, Result};
use crate::inference::{DEFAULT_INPUT_SIZE, InferenceConfig};
use crate::postprocessing::postprocess;
use crate::preprocessing::{InputType, TensorData, preprocess_image};
use crate::results::{Results, Speed};
use crate::task::Task;

/// MoveNet model for inference.
///
/// Wraps an ONNX Runtime session together with the input layout it expects.
///
/// # Example
///
/// ```no_run
/// use movenet_inference::PoseModel;
///
/// let mut model = PoseModel::load("movenet-lightning.onnx")?;
/// let results = model.predict("image.jpg")?;
/// println!("Found {}", results.verbose());
/// # Ok::<(), movenet_inference::InferenceError>(())
/// ```
pub struct PoseModel {
    /// ONNX Runtime session.
    session: Session,
    /// Input tensor name.
    input_name: String,
    /// Output tensor name.
    output_name: String,
    /// Element type of the input tensor.
    input_type: InputType,
    /// Square input size.
    input_size: usize,
    /// Model variant, if known before the first run.
    task: Option<Task>,
    /// Inference configuration.
    config: InferenceConfig,
    /// Whether model has been warmed up.
    warmed_up: bool,
}

impl PoseModel {
    /// Load a MoveNet model from an ONNX file.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file doesn't exist or can't be loaded.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_config(path, InferenceConfig::default())
    }

    /// Load a MoveNet model with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file doesn't exist, can't be loaded, or
    /// has an input layout other than `[1, H, W, 3]` of `int32`/`float32`.
    pub fn load_with_config<P: AsRef<Path>>(path: P, config: InferenceConfig) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(InferenceError::ModelLoadError(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::ModelLoadError(format!("Failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::ModelLoadError(format!("Failed to set optimization level: {e}")))?
            .with_intra_threads(config.num_threads)
            .map_err(|e| InferenceError::ModelLoadError(format!("Failed to set intra-thread count: {e}")))?
            .commit_from_file(path)
            .map_err(|e| InferenceError::ModelLoadError(format!("Failed to load model: {e}")))?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| InferenceError::ModelLoadError("Model has no inputs".to_string()))?;
        let output = session
            .outputs
            .first()
            .ok_or_else(|| InferenceError::ModelLoadError("Model has no outputs".to_string()))?;

        let input_type = match input.input_type.tensor_type() {
            Some(TensorElementType::Int32) => InputType::Int32,
            Some(TensorElementType::Float32) => InputType::Float32,
            other => {
                return Err(InferenceError::ModelLoadError(format!(
                    "Unsupported model input type: {other:?}"
                )));
            }
        };

        // NHWC: [1, height, width, 3]; dynamic dims are reported as -1
        let model_size = input
            .input_type
            .tensor_shape()
            .and_then(|shape| shape.get(2).copied())
            .and_then(|d| usize::try_from(d).ok())
            .filter(|&d| d > 0);
        let input_size = config
            .imgsz
            .or(model_size)
            .unwrap_or(DEFAULT_INPUT_SIZE);

        let output_shape: Option<Vec<usize>> = output
            .output_type
            .tensor_shape()
            .map(|shape| shape.iter().map(|&d| usize::try_from(d).unwrap_or(0)).collect());
        let task = config
            .task
            .or_else(|| output_shape.as_deref().and_then(Task::from_output_shape));

        let input_name = input.name.clone();
        let output_name = output.name.clone();

        Ok(Self {
            session,
            input_name,
            output_name,
            input_type,
            input_size,
            task,
            config,
            warmed_up: false,
        })
    }

    /// Warm up the model by running inference with a zero input.
    ///
    /// Warmup is automatically called on first predict so the reported
    /// inference time excludes one-off graph initialization.
    ///
    /// # Errors
    ///
    /// Returns an error if the dummy inference fails.
    pub fn warmup(&mut self) -> Result<()> {
        if self.warmed_up {
            return Ok(());
        }

        let shape = (1, self.input_size, self.input_size, 3);
        let dummy = match self.input_type {
            InputType::Int32 => TensorData::Int32(ndarray::Array4::zeros(shape)),
            InputType::Float32 => TensorData::Float32(ndarray::Array4::zeros(shape)),
        };
        let _ = self.run_inference(dummy)?;

        self.warmed_up = true;
        Ok(())
    }

    /// Run inference on an image file.
    ///
    /// # Errors
    ///
    /// Returns an error if the image doesn't exist, can't be decoded, or
    /// inference or decoding fails.
    pub fn predict<P: AsRef<Path>>(&mut self, path: P) -> Result<Results> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(InferenceError::ImageError(format!(
                "Image file not found: {}",
                path.display()
            )));
        }

        let img = image::open(path).map_err(|e| {
            InferenceError::ImageError(format!("Failed to load image {}: {e}", path.display()))
        })?;

        self.predict_image(&img, path.to_string_lossy().to_string())
    }

    /// Run inference on a `DynamicImage`.
    ///
    /// # Arguments
    ///
    /// * `image` - The image to run inference on.
    /// * `path` - Path/identifier recorded in the results.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing, inference or decoding fails.
    pub fn predict_image(&mut self, image: &DynamicImage, path: String) -> Result<Results> {
        if !self.warmed_up {
            self.warmup()?;
        }

        let start_preprocess = Instant::now();
        let preprocessed = preprocess_image(image, self.input_size, self.input_type)?;
        let preprocess_time = start_preprocess.elapsed().as_secs_f64() * 1000.0;

        let orig_shape = preprocessed.orig_shape;
        let input_shape = preprocessed.input_shape();

        let start_inference = Instant::now();
        let (output, output_shape) = self.run_inference(preprocessed.tensor)?;
        let inference_time = start_inference.elapsed().as_secs_f64() * 1000.0;

        let start_postprocess = Instant::now();
        let task = self
            .task
            .or_else(|| Task::from_output_shape(&output_shape))
            .ok_or_else(|| InferenceError::ShapeMismatch {
                expected: "[1, 1, 17, 3] or [1, N, 56]".to_string(),
                actual: output_shape.clone(),
            })?;
        let persons = postprocess(&output, &output_shape, task, orig_shape, &self.config)?;
        let postprocess_time = start_postprocess.elapsed().as_secs_f64() * 1000.0;

        Ok(Results::new(
            path,
            orig_shape,
            input_shape,
            task,
            persons,
            Speed::new(preprocess_time, inference_time, postprocess_time),
        ))
    }

    /// Run the ONNX model and return the first output as (data, shape).
    fn run_inference(&mut self, input: TensorData) -> Result<(Vec<f32>, Vec<usize>)> {
        let input_value: DynValue = match input {
            TensorData::Int32(t) => Tensor::from_array(t)
                .map_err(|e| InferenceError::InferenceError(format!("Failed to create input tensor: {e}")))?
                .into_dyn(),
            TensorData::Float32(t) => Tensor::from_array(t)
                .map_err(|e| InferenceError::InferenceError(format!("Failed to create input tensor: {e}")))?
                .into_dyn(),
        };

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .map_err(|e| InferenceError::InferenceError(format!("Inference failed: {e}")))?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            InferenceError::InferenceError(format!("Output '{}' not found", self.output_name))
        })?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::InferenceError(format!("Failed to extract output: {e}")))?;

        let shape_vec: Vec<usize> = shape
            .iter()
            .map(|&d| usize::try_from(d).unwrap_or(0))
            .collect();

        Ok((data.to_vec(), shape_vec))
    }

    /// Get the model variant, if it could be determined at load time.
    #[must_use]
    pub const fn task(&self) -> Option<Task> {
        self.task
    }

    /// Get the square model input size.
    #[must_use]
    pub const fn input_size(&self) -> usize {
        self.input_size
    }

    /// Get the input element type.
    #[must_use]
    pub const fn input_type(&self) -> InputType {
        self.input_type
    }

    /// Get the input tensor name.
    #[must_use]
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Get the output tensor name.
    #[must_use]
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Get the inference configuration.
    #[must_use]
    pub const fn config(&self) -> &InferenceConfig {
        &self.config
    }
}

impl std::fmt::Debug for PoseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseModel")
            .field("task", &self.task)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("input_type", &self.input_type)
            .field("input_size", &self.input_size)
            .finish()
    }
}
