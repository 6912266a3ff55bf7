// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # MoveNet Inference Library
//!
//! Pose estimation with MoveNet ONNX models: runs the single-pose (Lightning,
//! Thunder) and multi-pose variants and decodes their raw output tensors into
//! people made of 17 named body parts in original-image pixel coordinates.
//!
//! ## Features
//!
//! - **Both variants** - `[1, 1, 17, 3]` single-pose and `[1, N, 56]` multi-pose outputs
//! - **ONNX Runtime** - `int32` and `float32` NHWC inputs, input size read from the model
//! - **Skeleton rendering** - labelled parts and colored limb segments saved as JPEG
//! - **JSON output** - results serialize with `serde`
//!
//! ## Quick Start (Library)
//!
//! ```no_run
//! use movenet_inference::PoseModel;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut model = PoseModel::load("movenet-multipose.onnx")?;
//!     let results = model.predict("people.jpg")?;
//!
//!     for person in &results.persons {
//!         println!("person {} score {:.2}", person.id, person.score);
//!         for part in &person.parts {
//!             println!("  {} ({}, {}) {:.2}", part.label, part.x, part.y, part.score);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Decoding Raw Outputs
//!
//! The decoders work on any flat `f32` buffer, without a model:
//!
//! ```rust
//! use movenet_inference::decode_single_pose;
//!
//! let output = vec![0.5_f32; 51];
//! let parts = decode_single_pose(&output, &[1, 1, 17, 3], (480, 640))?;
//! assert_eq!(parts.len(), 17);
//! assert_eq!((parts[0].x, parts[0].y), (320, 240));
//! # Ok::<(), movenet_inference::InferenceError>(())
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! movenet-inference predict --model movenet-lightning.onnx --source person.jpg
//! movenet-inference predict -m movenet-multipose.onnx -s crowd.jpg --conf 0.3 --json
//! ```
//!
//! | Option | Short | Description | Default |
//! |--------|-------|-------------|---------|
//! | `--model` | `-m` | Path to ONNX model | `movenet-lightning.onnx` |
//! | `--source` | `-s` | Input image | required |
//! | `--task` | | `single` or `multi` | from output shape |
//! | `--conf` | | Minimum multi-pose person score | `0.2` |
//! | `--imgsz` | | Inference image size | from model, else `256` |
//! | `--threads` | | ONNX Runtime intra-op threads | runtime default |
//! | `--output` | `-o` | Directory for annotated images | `outputs` |
//! | `--save` | | Save annotated image | `true` |
//! | `--json` | | Print results as JSON | `false` |
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`model`] | [`PoseModel`] for loading models and running inference |
//! | [`postprocessing`] | Output tensor decoders |
//! | [`results`] | Output types ([`Results`], [`Person`], [`BodyPart`]) |
//! | [`keypoint`] | The 17 body parts ([`Keypoint`]) |
//! | [`inference`] | [`InferenceConfig`] |
//! | [`task`] | Model variants ([`Task`]) |
//! | [`preprocessing`] | Image to NHWC tensor |
//! | [`visualizer`] | Skeleton segments and colors |
//! | [`error`] | Error types ([`InferenceError`], [`Result`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `annotate` | Image annotation and saving (default) |

// Modules
#[cfg(feature = "annotate")]
pub mod annotate;
pub mod cli;
pub mod error;
pub mod inference;
pub mod keypoint;
pub mod model;
pub mod postprocessing;
pub mod preprocessing;
pub mod results;
pub mod task;
pub mod visualizer;

// Re-export main types for convenience
pub use error::{InferenceError, Result};
pub use inference::InferenceConfig;
pub use keypoint::{BODY_PARTS, Keypoint, NUM_KEYPOINTS};
pub use model::PoseModel;
pub use results::{BodyPart, Person, Results, Speed};
pub use task::Task;

// Re-export decoding and preprocessing utilities
pub use postprocessing::{decode_multi_pose, decode_single_pose, postprocess};
pub use preprocessing::{InputType, PreprocessResult, TensorData, preprocess_image};
pub use visualizer::{SKELETON, Segment};

#[cfg(feature = "annotate")]
pub use annotate::{annotate_image, save_annotated};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
