// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Post-processing for MoveNet model outputs.
//!
//! Both model variants encode each keypoint as a `(y, x, score)` triple with
//! coordinates normalized to the model input. Single-pose models emit one
//! `[1, 1, 17, 3]` block; multi-pose models emit `[1, N, 56]` rows made of 17
//! triples followed by `(ymin, xmin, ymax, xmax, instance_score)`.

use crate::error::{InferenceError, Result};
use crate::inference::InferenceConfig;
use crate::keypoint::{Keypoint, NUM_KEYPOINTS};
use crate::results::{BodyPart, Person};
use crate::task::Task;

/// Values per keypoint: y, x, score.
pub const KEYPOINT_STRIDE: usize = 3;

/// Values occupied by the keypoint triples of one pose.
pub const KEYPOINT_VALUES: usize = NUM_KEYPOINTS * KEYPOINT_STRIDE;

/// Offset of the box values within a multi-pose row.
pub const BOX_OFFSET: usize = KEYPOINT_VALUES;

/// Offset of the instance score within a multi-pose row.
pub const INSTANCE_SCORE_OFFSET: usize = BOX_OFFSET + 4;

/// Width of one multi-pose row.
pub const MULTI_POSE_ROW: usize = INSTANCE_SCORE_OFFSET + 1;

const Y_OFFSET: usize = 0;
const X_OFFSET: usize = 1;
const SCORE_OFFSET: usize = 2;

/// Decode raw model output into people for the given task.
///
/// Single-pose output is wrapped in one person with `id` 0, no box, and a
/// score equal to the mean part confidence.
///
/// # Arguments
///
/// * `output` - Flat model output.
/// * `shape` - Shape of `output`.
/// * `task` - Model variant that produced `output`.
/// * `orig_shape` - Original image shape (height, width).
/// * `config` - Inference configuration (provides the multi-pose threshold).
///
/// # Errors
///
/// Returns [`InferenceError::ShapeMismatch`] or [`InferenceError::InvalidDimensions`].
pub fn postprocess(
    output: &[f32],
    shape: &[usize],
    task: Task,
    orig_shape: (u32, u32),
    config: &InferenceConfig,
) -> Result<Vec<Person>> {
    match task {
        Task::SinglePose => {
            let parts = decode_single_pose(output, shape, orig_shape)?;
            let mut person = Person {
                id: 0,
                score: 0.0,
                box_raw: None,
                bbox: None,
                parts,
            };
            person.score = person.average_confidence();
            Ok(vec![person])
        }
        Task::MultiPose => decode_multi_pose(output, shape, orig_shape, config.min_confidence),
    }
}

/// Decode a single-pose output of shape `[1, 1, 17, 3]`.
///
/// Every keypoint is returned regardless of its score, in model output order.
///
/// # Errors
///
/// Returns [`InferenceError::ShapeMismatch`] if the output is not 17 triples,
/// or [`InferenceError::InvalidDimensions`] if `orig_shape` has a zero side.
pub fn decode_single_pose(
    output: &[f32],
    shape: &[usize],
    orig_shape: (u32, u32),
) -> Result<Vec<BodyPart>> {
    check_dimensions(orig_shape)?;

    let valid_shape = matches!(shape, [leading @ .., NUM_KEYPOINTS, KEYPOINT_STRIDE] if leading.iter().all(|&d| d == 1));
    if !valid_shape || output.len() != KEYPOINT_VALUES {
        return Err(InferenceError::ShapeMismatch {
            expected: format!("[1, 1, {NUM_KEYPOINTS}, {KEYPOINT_STRIDE}]"),
            actual: shape.to_vec(),
        });
    }

    Ok(decode_keypoints(output, orig_shape))
}

/// Decode a multi-pose output of shape `[1, N, 56]`.
///
/// Rows whose instance score is below `min_confidence` are dropped. Kept
/// people retain their original row index as `id`.
///
/// # Errors
///
/// Returns [`InferenceError::ShapeMismatch`] if rows are not 56 wide or the
/// buffer length does not match the shape, or
/// [`InferenceError::InvalidDimensions`] if `orig_shape` has a zero side.
pub fn decode_multi_pose(
    output: &[f32],
    shape: &[usize],
    orig_shape: (u32, u32),
    min_confidence: f32,
) -> Result<Vec<Person>> {
    check_dimensions(orig_shape)?;

    let num_rows = match shape {
        [leading @ .., n, MULTI_POSE_ROW] if leading.iter().all(|&d| d == 1) => Some(*n),
        _ => None,
    };
    let Some(num_rows) =
        num_rows.filter(|&n| n.checked_mul(MULTI_POSE_ROW) == Some(output.len()))
    else {
        return Err(InferenceError::ShapeMismatch {
            expected: format!("[1, N, {MULTI_POSE_ROW}]"),
            actual: shape.to_vec(),
        });
    };

    let (height, width) = orig_shape;
    let people = output
        .chunks_exact(MULTI_POSE_ROW)
        .take(num_rows)
        .enumerate()
        .filter_map(|(id, row)| {
            let score = row[INSTANCE_SCORE_OFFSET];
            if score < min_confidence {
                return None;
            }

            let parts = decode_keypoints(&row[..KEYPOINT_VALUES], orig_shape);

            let ymin = row[BOX_OFFSET];
            let xmin = row[BOX_OFFSET + 1];
            let ymax = row[BOX_OFFSET + 2];
            let xmax = row[BOX_OFFSET + 3];
            let box_raw = [xmin, ymin, xmax - xmin, ymax - ymin];
            Some(Person {
                id,
                score,
                box_raw: Some(box_raw),
                bbox: Some(scale_box(&box_raw, width, height)),
                parts,
            })
        })
        .collect();

    Ok(people)
}

/// Decode 17 `(y, x, score)` triples.
fn decode_keypoints(values: &[f32], orig_shape: (u32, u32)) -> Vec<BodyPart> {
    Keypoint::ALL
        .iter()
        .zip(values.chunks_exact(KEYPOINT_STRIDE))
        .map(|(&kind, triple)| {
            BodyPart::new(
                kind,
                triple[SCORE_OFFSET],
                triple[X_OFFSET],
                triple[Y_OFFSET],
                orig_shape,
            )
        })
        .collect()
}

/// Scale an `[x, y, width, height]` box to pixels, x-axis values by image
/// width and y-axis values by image height.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn scale_box(box_raw: &[f32; 4], width: u32, height: u32) -> [i32; 4] {
    let (w, h) = (width as f32, height as f32);
    [
        (box_raw[0] * w) as i32,
        (box_raw[1] * h) as i32,
        (box_raw[2] * w) as i32,
        (box_raw[3] * h) as i32,
    ]
}

const fn check_dimensions(orig_shape: (u32, u32)) -> Result<()> {
    let (height, width) = orig_shape;
    if width == 0 || height == 0 {
        return Err(InferenceError::InvalidDimensions { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-pose buffer where part `i` sits at `(y, x) = (i / 100, i / 50)`.
    fn single_pose_output() -> Vec<f32> {
        let mut output = Vec::with_capacity(KEYPOINT_VALUES);
        for i in 0..NUM_KEYPOINTS {
            #[allow(clippy::cast_precision_loss)]
            let i = i as f32;
            output.extend_from_slice(&[i / 100.0, i / 50.0, 0.5]);
        }
        output
    }

    fn multi_pose_row(instance_score: f32) -> Vec<f32> {
        let mut row = vec![0.0; MULTI_POSE_ROW];
        for k in 0..NUM_KEYPOINTS {
            row[k * KEYPOINT_STRIDE] = 0.25; // y
            row[k * KEYPOINT_STRIDE + 1] = 0.5; // x
            row[k * KEYPOINT_STRIDE + 2] = 0.8; // score
        }
        row[BOX_OFFSET] = 0.125; // ymin
        row[BOX_OFFSET + 1] = 0.25; // xmin
        row[BOX_OFFSET + 2] = 0.625; // ymax
        row[BOX_OFFSET + 3] = 0.75; // xmax
        row[INSTANCE_SCORE_OFFSET] = instance_score;
        row
    }

    #[test]
    fn test_offsets() {
        assert_eq!(KEYPOINT_VALUES, 51);
        assert_eq!(INSTANCE_SCORE_OFFSET, 55);
        assert_eq!(MULTI_POSE_ROW, 56);
    }

    #[test]
    fn test_single_pose_order_and_count() {
        let parts = decode_single_pose(&single_pose_output(), &[1, 1, 17, 3], (480, 640)).unwrap();
        assert_eq!(parts.len(), 17);
        for (i, part) in parts.iter().enumerate() {
            assert_eq!(part.id, i);
            assert_eq!(part.label, crate::keypoint::BODY_PARTS[i]);
            assert!((part.score - 0.5).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_single_pose_axis_swap() {
        // Width != height so swapping axes would change pixel values.
        let mut output = vec![0.0; KEYPOINT_VALUES];
        output[0] = 0.25; // y
        output[1] = 0.5; // x
        output[2] = 0.9;
        let parts = decode_single_pose(&output, &[1, 1, 17, 3], (480, 640)).unwrap();
        let nose = &parts[0];
        assert!((nose.y_raw - 0.25).abs() < f32::EPSILON);
        assert!((nose.x_raw - 0.5).abs() < f32::EPSILON);
        assert_eq!(nose.x, 320);
        assert_eq!(nose.y, 120);
    }

    #[test]
    fn test_single_pose_keeps_low_scores() {
        let output = vec![0.0; KEYPOINT_VALUES];
        let parts = decode_single_pose(&output, &[17, 3], (10, 10)).unwrap();
        assert_eq!(parts.len(), 17);
        assert!(parts.iter().all(|p| p.score == 0.0));
    }

    #[test]
    fn test_single_pose_shape_mismatch() {
        let output = vec![0.0; 48];
        let err = decode_single_pose(&output, &[1, 1, 16, 3], (480, 640)).unwrap_err();
        assert!(matches!(err, InferenceError::ShapeMismatch { .. }));

        // Shape says 17x3 but buffer is short.
        let err = decode_single_pose(&output, &[1, 1, 17, 3], (480, 640)).unwrap_err();
        assert!(matches!(err, InferenceError::ShapeMismatch { .. }));

        // Multi-pose layout is rejected.
        let err = decode_single_pose(&[0.0; 56], &[1, 1, 56], (480, 640)).unwrap_err();
        assert!(matches!(err, InferenceError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = decode_single_pose(&single_pose_output(), &[1, 1, 17, 3], (0, 640)).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::InvalidDimensions { width: 640, height: 0 }
        ));

        let err = decode_multi_pose(&multi_pose_row(0.9), &[1, 1, 56], (480, 0), 0.2).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_multi_pose_filtering() {
        // Six rows, only row 2 above threshold.
        let mut output = Vec::new();
        for row in 0..6 {
            output.extend(multi_pose_row(if row == 2 { 0.5 } else { 0.0 }));
        }
        let people = decode_multi_pose(&output, &[1, 6, 56], (480, 640), 0.2).unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].id, 2);
        assert!((people[0].score - 0.5).abs() < f32::EPSILON);
        assert_eq!(people[0].parts.len(), 17);
    }

    #[test]
    fn test_multi_pose_threshold_inclusive() {
        let people = decode_multi_pose(&multi_pose_row(0.2), &[1, 1, 56], (480, 640), 0.2).unwrap();
        assert_eq!(people.len(), 1);

        let people =
            decode_multi_pose(&multi_pose_row(0.199), &[1, 1, 56], (480, 640), 0.2).unwrap();
        assert!(people.is_empty());
    }

    #[test]
    fn test_multi_pose_preserves_row_order() {
        let mut output = multi_pose_row(0.3);
        output.extend(multi_pose_row(0.9));
        output.extend(multi_pose_row(0.6));
        let people = decode_multi_pose(&output, &[1, 3, 56], (480, 640), 0.2).unwrap();
        let ids: Vec<usize> = people.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_multi_pose_keypoints_and_box() {
        let people = decode_multi_pose(&multi_pose_row(0.9), &[1, 1, 56], (480, 640), 0.2).unwrap();
        let person = &people[0];

        let nose = &person.parts[0];
        assert_eq!(nose.x, 320);
        assert_eq!(nose.y, 120);
        assert!((nose.score - 0.8).abs() < f32::EPSILON);

        let box_raw = person.box_raw.unwrap();
        assert!((box_raw[0] - 0.25).abs() < 1e-6); // xmin
        assert!((box_raw[1] - 0.125).abs() < 1e-6); // ymin
        assert!((box_raw[2] - 0.5).abs() < 1e-6); // width
        assert!((box_raw[3] - 0.5).abs() < 1e-6); // height

        // x values scale by 640, y values by 480
        assert_eq!(person.bbox, Some([160, 60, 320, 240]));
    }

    #[test]
    fn test_multi_pose_shape_mismatch() {
        let output = vec![0.0; 6 * 55];
        let err = decode_multi_pose(&output, &[1, 6, 55], (480, 640), 0.2).unwrap_err();
        assert!(matches!(err, InferenceError::ShapeMismatch { .. }));

        // Row count disagrees with buffer length.
        let output = vec![0.0; 5 * 56];
        let err = decode_multi_pose(&output, &[1, 6, 56], (480, 640), 0.2).unwrap_err();
        assert!(matches!(err, InferenceError::ShapeMismatch { .. }));

        // Batch > 1 is not supported.
        let output = vec![0.0; 2 * 6 * 56];
        let err = decode_multi_pose(&output, &[2, 6, 56], (480, 640), 0.2).unwrap_err();
        assert!(matches!(err, InferenceError::ShapeMismatch { .. }));

        // Row count so large that rows * 56 overflows.
        let err = decode_multi_pose(&[], &[1, usize::MAX / 8, 56], (480, 640), 0.2).unwrap_err();
        assert!(matches!(err, InferenceError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_multi_pose_empty_output() {
        let people = decode_multi_pose(&[], &[1, 0, 56], (480, 640), 0.2).unwrap();
        assert!(people.is_empty());
    }

    #[test]
    fn test_decode_is_idempotent() {
        let mut output = multi_pose_row(0.7);
        output.extend(multi_pose_row(0.1));
        let first = decode_multi_pose(&output, &[1, 2, 56], (300, 500), 0.2).unwrap();
        let second = decode_multi_pose(&output, &[1, 2, 56], (300, 500), 0.2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_postprocess_single_pose_wraps_person() {
        let config = InferenceConfig::default();
        let people = postprocess(
            &single_pose_output(),
            &[1, 1, 17, 3],
            Task::SinglePose,
            (480, 640),
            &config,
        )
        .unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].id, 0);
        assert!(people[0].bbox.is_none());
        assert!((people[0].score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_postprocess_multi_pose_uses_config_threshold() {
        let config = InferenceConfig::default().with_min_confidence(0.8);
        let people = postprocess(
            &multi_pose_row(0.7),
            &[1, 1, 56],
            Task::MultiPose,
            (480, 640),
            &config,
        )
        .unwrap();
        assert!(people.is_empty());
    }
}
