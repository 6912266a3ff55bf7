// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the inference library.

use std::fmt;

/// Result type alias for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;

/// Main error type for the inference library.
#[derive(Debug)]
pub enum InferenceError {
    /// Error loading the ONNX model.
    ModelLoadError(String),
    /// Error during model inference.
    InferenceError(String),
    /// Error loading, resizing or encoding images.
    ImageError(String),
    /// Invalid configuration provided.
    ConfigError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
    /// Model output does not have the layout the decoder expects.
    ShapeMismatch {
        /// Human readable description of the expected layout.
        expected: String,
        /// Shape actually received.
        actual: Vec<usize>,
    },
    /// Image width or height is zero.
    InvalidDimensions {
        /// Supplied width.
        width: u32,
        /// Supplied height.
        height: u32,
    },
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelLoadError(msg) => write!(f, "Model load error: {msg}"),
            Self::InferenceError(msg) => write!(f, "Inference error: {msg}"),
            Self::ImageError(msg) => write!(f, "Image error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "Shape mismatch: expected {expected}, got {actual:?}")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid image dimensions: {width}x{height}")
            }
        }
    }
}

impl std::error::Error for InferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InferenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for InferenceError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InferenceError::ModelLoadError("test".to_string());
        assert_eq!(err.to_string(), "Model load error: test");

        let err = InferenceError::InvalidDimensions {
            width: 0,
            height: 480,
        };
        assert_eq!(err.to_string(), "Invalid image dimensions: 0x480");
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = InferenceError::ShapeMismatch {
            expected: "[1, 1, 17, 3]".to_string(),
            actual: vec![1, 6, 56],
        };
        assert_eq!(
            err.to_string(),
            "Shape mismatch: expected [1, 1, 17, 3], got [1, 6, 56]"
        );
    }

    #[test]
    fn test_io_source() {
        use std::error::Error;

        let err = InferenceError::from(std::io::Error::other("boom"));
        assert!(err.source().is_some());
        assert!(InferenceError::ConfigError("x".into()).source().is_none());
    }
}
