// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! MoveNet model variants.
//!
//! The single-pose (Lightning/Thunder) and multi-pose models share the same
//! keypoint encoding but differ in output tensor layout.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::keypoint::NUM_KEYPOINTS;
use crate::postprocessing::{KEYPOINT_STRIDE, MULTI_POSE_ROW};

/// MoveNet model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    /// One person per image, output shape `[1, 1, 17, 3]`.
    SinglePose,
    /// Up to N people per image, output shape `[1, N, 56]`.
    MultiPose,
}

impl Task {
    /// Returns the short name used on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SinglePose => "single",
            Self::MultiPose => "multi",
        }
    }

    /// Infer the variant from a model output shape.
    ///
    /// Returns `None` if the shape matches neither layout.
    #[must_use]
    pub fn from_output_shape(shape: &[usize]) -> Option<Self> {
        match shape {
            [.., NUM_KEYPOINTS, KEYPOINT_STRIDE] => Some(Self::SinglePose),
            [.., MULTI_POSE_ROW] => Some(Self::MultiPose),
            _ => None,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Task {
    type Err = TaskParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "singlepose" | "single-pose" | "lightning" | "thunder" => {
                Ok(Self::SinglePose)
            }
            "multi" | "multipose" | "multi-pose" => Ok(Self::MultiPose),
            _ => Err(TaskParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid task string.
#[derive(Debug, Clone)]
pub struct TaskParseError(String);

impl fmt::Display for TaskParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid task '{}', expected one of: single, multi",
            self.0
        )
    }
}

impl std::error::Error for TaskParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_from_str() {
        assert_eq!("single".parse::<Task>().unwrap(), Task::SinglePose);
        assert_eq!("Thunder".parse::<Task>().unwrap(), Task::SinglePose);
        assert_eq!("multi".parse::<Task>().unwrap(), Task::MultiPose);
        assert_eq!("multi-pose".parse::<Task>().unwrap(), Task::MultiPose);
        assert!("detect".parse::<Task>().is_err());
    }

    #[test]
    fn test_task_display() {
        assert_eq!(Task::SinglePose.to_string(), "single");
        assert_eq!(Task::MultiPose.to_string(), "multi");
    }

    #[test]
    fn test_from_output_shape() {
        assert_eq!(Task::from_output_shape(&[1, 1, 17, 3]), Some(Task::SinglePose));
        assert_eq!(Task::from_output_shape(&[17, 3]), Some(Task::SinglePose));
        assert_eq!(Task::from_output_shape(&[1, 6, 56]), Some(Task::MultiPose));
        assert_eq!(Task::from_output_shape(&[1, 84, 8400]), None);
        assert_eq!(Task::from_output_shape(&[]), None);
    }
}
